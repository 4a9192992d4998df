//! Struct model shared by the generator and the recovery parser.

use std::collections::HashMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, RsbError};
use crate::scalar::ScalarType;

/// Category of a struct member or function argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Signed integer.
    Int,
    /// Unsigned integer.
    UInt,
    /// IEEE float.
    Float,
    /// Pointer to another struct.
    Pointer,
    /// Struct embedded by value.
    Struc,
}

impl FieldKind {
    /// Every kind, in generator draw order.
    pub const ALL: [FieldKind; 5] = [
        FieldKind::Int,
        FieldKind::UInt,
        FieldKind::Float,
        FieldKind::Pointer,
        FieldKind::Struc,
    ];

    /// Kinds that are passed through `use` directly.
    pub const SCALARS: [FieldKind; 3] = [FieldKind::Int, FieldKind::UInt, FieldKind::Float];

    /// Whether the kind names another struct.
    pub fn references_struc(self) -> bool {
        matches!(self, FieldKind::Pointer | FieldKind::Struc)
    }
}

/// Identifier of a struct, as it appears after the `rs_` prefix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrucId(String);

impl StrucId {
    /// Wraps a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Identifier of the `index`-th generated struct.
    pub fn from_index(index: usize) -> Self {
        Self(index.to_string())
    }

    /// Raw identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// C++ struct name, `rs_<id>`.
    pub fn struc_name(&self) -> String {
        format!("rs_{}", self.0)
    }
}

impl Display for StrucId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single struct member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Member name, `_<n>` for generated structs.
    pub name: String,
    /// Member category.
    pub kind: FieldKind,
    /// Size in bytes; zero for embedded structs.
    pub size: usize,
    /// Struct behind a pointer or embedded member; `None` for `void*`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<StrucId>,
}

impl Field {
    /// Field with an explicit kind and size.
    pub fn new(name: impl Into<String>, kind: FieldKind, size: usize, target: Option<StrucId>) -> Self {
        Self {
            name: name.into(),
            kind,
            size,
            target,
        }
    }

    /// Scalar field of the given type.
    pub fn scalar(name: impl Into<String>, ty: ScalarType) -> Self {
        let kind = match ty {
            ScalarType::F32 | ScalarType::F64 => FieldKind::Float,
            ScalarType::U8 | ScalarType::U16 | ScalarType::U32 | ScalarType::U64 => FieldKind::UInt,
            _ => FieldKind::Int,
        };
        Self::new(name, kind, ty.size(), None)
    }

    /// The scalar type for Int/UInt/Float members.
    pub fn scalar_type(&self) -> Option<ScalarType> {
        let ty = match (self.kind, self.size) {
            (FieldKind::Int, 1) => ScalarType::I8,
            (FieldKind::Int, 2) => ScalarType::I16,
            (FieldKind::Int, 4) => ScalarType::I32,
            (FieldKind::Int, 8) => ScalarType::I64,
            (FieldKind::UInt, 1) => ScalarType::U8,
            (FieldKind::UInt, 2) => ScalarType::U16,
            (FieldKind::UInt, 4) => ScalarType::U32,
            (FieldKind::UInt, 8) => ScalarType::U64,
            (FieldKind::Float, 4) => ScalarType::F32,
            (FieldKind::Float, 8) => ScalarType::F64,
            _ => return None,
        };
        Some(ty)
    }

    /// C++ spelling of the member's type.
    pub fn type_name(&self) -> String {
        type_name(self.kind, self.size, self.target.as_ref())
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {};", self.type_name(), self.name)
    }
}

/// C++ spelling for a member or argument type.
pub fn type_name(kind: FieldKind, size: usize, target: Option<&StrucId>) -> String {
    match kind {
        FieldKind::Int => format!("int{}_t", size * 8),
        FieldKind::UInt => format!("uint{}_t", size * 8),
        FieldKind::Float => format!("f{}_t", size * 8),
        FieldKind::Pointer => match target {
            Some(id) => format!("{}*", id.struc_name()),
            None => "void*".to_string(),
        },
        FieldKind::Struc => match target {
            Some(id) => id.struc_name(),
            None => "void".to_string(),
        },
    }
}

/// Member slot that only occupies space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Padding {
    /// Index into [`Struc::fields`] before which the padding sits.
    pub before: usize,
    /// Bytes skipped.
    pub size: usize,
}

/// A struct definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Struc {
    /// Identifier after the `rs_` prefix.
    pub id: StrucId,
    /// Members in declaration order.
    pub fields: Vec<Field>,
    /// Explicit padding, only present in recovered structs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub padding: Vec<Padding>,
}

impl Struc {
    /// Empty struct.
    pub fn new(id: StrucId) -> Self {
        Self {
            id,
            fields: Vec::new(),
            padding: Vec::new(),
        }
    }

    /// C++ name, `rs_<id>`.
    pub fn name(&self) -> String {
        self.id.struc_name()
    }

    /// Appends a member.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Records `size` bytes of padding ahead of the next field.
    pub fn add_padding(&mut self, size: usize) {
        self.padding.push(Padding {
            before: self.fields.len(),
            size,
        });
    }
}

impl Display for Struc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "struct {} {{", self.name())?;
        for field in &self.fields {
            writeln!(f, "    {field}")?;
        }
        writeln!(f, "}};")
    }
}

/// Insertion-ordered collection of structs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Struc>", into = "Vec<Struc>")]
pub struct StrucTable {
    strucs: Vec<Struc>,
    index: HashMap<StrucId, usize>,
}

impl StrucTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of structs, placeholders included.
    pub fn len(&self) -> usize {
        self.strucs.len()
    }

    /// Whether the table holds no structs.
    pub fn is_empty(&self) -> bool {
        self.strucs.is_empty()
    }

    /// Structs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Struc> + '_ {
        self.strucs.iter()
    }

    /// Identifiers in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &StrucId> + '_ {
        self.strucs.iter().map(|struc| &struc.id)
    }

    /// Looks up a struct by identifier.
    pub fn get(&self, id: &StrucId) -> Option<&Struc> {
        self.index.get(id).map(|&idx| &self.strucs[idx])
    }

    /// Looks up `id`, reporting a layout error when it is absent.
    pub fn require(&self, id: &StrucId) -> Result<&Struc, RsbError> {
        self.get(id).ok_or_else(|| {
            RsbError::Layout(
                ErrorInfo::new("unknown-struc", "struct is not defined")
                    .with_context("id", id.to_string()),
            )
        })
    }

    /// Inserts or replaces a struct, keeping its original position on replace.
    pub fn insert(&mut self, struc: Struc) {
        match self.index.get(&struc.id) {
            Some(&idx) => self.strucs[idx] = struc,
            None => {
                self.index.insert(struc.id.clone(), self.strucs.len());
                self.strucs.push(struc);
            }
        }
    }

    /// Returns the struct for `id`, appending an empty placeholder if needed.
    pub fn get_or_insert(&mut self, id: &StrucId) -> &mut Struc {
        let idx = match self.index.get(id) {
            Some(&idx) => idx,
            None => {
                self.index.insert(id.clone(), self.strucs.len());
                self.strucs.push(Struc::new(id.clone()));
                self.strucs.len() - 1
            }
        };
        &mut self.strucs[idx]
    }
}

impl From<Vec<Struc>> for StrucTable {
    fn from(strucs: Vec<Struc>) -> Self {
        let mut table = StrucTable::new();
        for struc in strucs {
            table.insert(struc);
        }
        table
    }
}

impl From<StrucTable> for Vec<Struc> {
    fn from(table: StrucTable) -> Self {
        table.strucs
    }
}
