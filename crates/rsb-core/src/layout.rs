//! Natural C layout and layout fingerprints.
//!
//! Generated and recovered structs are compared by the shape of their
//! flattened layout: every scalar or pointer slot with its byte offset and
//! width. Embedded structs are inlined; pointee identities are dropped
//! because the recovery tool names structs differently.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{ErrorInfo, RsbError};
use crate::model::{FieldKind, StrucId, StrucTable};

const POINTER_SIZE: usize = 8;

/// One occupied slot of a flattened struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    /// Byte offset from the start of the outermost struct.
    pub offset: usize,
    /// Scalar or pointer category; never [`FieldKind::Struc`].
    pub kind: FieldKind,
    /// Width in bytes.
    pub size: usize,
}

/// Size, alignment and slots of a struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Total size including tail padding.
    pub size: usize,
    /// Alignment of the widest member.
    pub align: usize,
    /// Occupied slots in offset order.
    pub slots: Vec<Slot>,
}

fn align_up(offset: usize, align: usize) -> usize {
    offset.div_ceil(align) * align
}

/// Computes the natural layout of `id`.
pub fn layout(table: &StrucTable, id: &StrucId) -> Result<Layout, RsbError> {
    let mut visiting = BTreeSet::new();
    layout_inner(table, id, &mut visiting)
}

fn layout_inner(
    table: &StrucTable,
    id: &StrucId,
    visiting: &mut BTreeSet<StrucId>,
) -> Result<Layout, RsbError> {
    if !visiting.insert(id.clone()) {
        return Err(RsbError::Layout(
            ErrorInfo::new("embedding-cycle", "struct embeds itself by value")
                .with_context("id", id.to_string()),
        ));
    }
    let struc = table.require(id)?;
    let mut cursor = 0usize;
    let mut align = 1usize;
    let mut slots = Vec::with_capacity(struc.fields.len());
    let mut padding = struc.padding.iter().peekable();

    for (idx, field) in struc.fields.iter().enumerate() {
        while let Some(pad) = padding.next_if(|pad| pad.before <= idx) {
            cursor += pad.size;
        }
        match field.kind {
            FieldKind::Int | FieldKind::UInt | FieldKind::Float | FieldKind::Pointer => {
                let size = if field.kind == FieldKind::Pointer {
                    POINTER_SIZE
                } else {
                    field.size
                };
                if size == 0 {
                    return Err(RsbError::Layout(
                        ErrorInfo::new("zero-size", "scalar member has no width")
                            .with_context("id", id.to_string())
                            .with_context("field", field.name.clone()),
                    ));
                }
                cursor = align_up(cursor, size);
                slots.push(Slot {
                    offset: cursor,
                    kind: field.kind,
                    size,
                });
                cursor += size;
                align = align.max(size);
            }
            FieldKind::Struc => {
                let target = field.target.as_ref().ok_or_else(|| {
                    RsbError::Layout(
                        ErrorInfo::new("missing-target", "embedded member has no struct type")
                            .with_context("id", id.to_string())
                            .with_context("field", field.name.clone()),
                    )
                })?;
                let inner = layout_inner(table, target, visiting)?;
                cursor = align_up(cursor, inner.align);
                slots.extend(inner.slots.iter().map(|slot| Slot {
                    offset: cursor + slot.offset,
                    ..*slot
                }));
                cursor += inner.size;
                align = align.max(inner.align);
            }
        }
    }
    // Trailing padding still counts toward the recorded end of the struct.
    for pad in padding {
        cursor += pad.size;
    }

    visiting.remove(id);
    Ok(Layout {
        size: align_up(cursor, align),
        align,
        slots,
    })
}

/// Lowercase hex SHA-256 over the canonical JSON of the flattened slots.
pub fn fingerprint(table: &StrucTable, id: &StrucId) -> Result<String, RsbError> {
    let layout = layout(table, id)?;
    let bytes = serde_json::to_vec(&layout.slots)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}

/// Fingerprints of every struct in the table.
pub fn fingerprints(table: &StrucTable) -> Result<BTreeSet<String>, RsbError> {
    table.ids().map(|id| fingerprint(table, id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, Struc};
    use crate::scalar::ScalarType;

    fn table_with(strucs: Vec<Struc>) -> StrucTable {
        StrucTable::from(strucs)
    }

    #[test]
    fn scalars_are_naturally_aligned() {
        let mut s = Struc::new(StrucId::from_index(1));
        s.add_field(Field::scalar("_0", ScalarType::U8));
        s.add_field(Field::scalar("_1", ScalarType::I32));
        s.add_field(Field::scalar("_2", ScalarType::U16));
        let table = table_with(vec![s]);
        let layout = layout(&table, &StrucId::from_index(1)).unwrap();
        let offsets: Vec<_> = layout.slots.iter().map(|slot| slot.offset).collect();
        assert_eq!(offsets, [0, 4, 8]);
        assert_eq!(layout.size, 12);
        assert_eq!(layout.align, 4);
    }

    #[test]
    fn embedded_struct_keeps_tail_padding() {
        let mut inner = Struc::new(StrucId::from_index(1));
        inner.add_field(Field::scalar("_0", ScalarType::I64));
        inner.add_field(Field::scalar("_1", ScalarType::I8));
        let mut outer = Struc::new(StrucId::from_index(2));
        outer.add_field(Field::new("_0", FieldKind::Struc, 0, Some(StrucId::from_index(1))));
        outer.add_field(Field::scalar("_1", ScalarType::I8));
        let table = table_with(vec![inner, outer]);
        let layout = layout(&table, &StrucId::from_index(2)).unwrap();
        let offsets: Vec<_> = layout.slots.iter().map(|slot| slot.offset).collect();
        assert_eq!(offsets, [0, 8, 16]);
        assert_eq!(layout.size, 24);
    }

    #[test]
    fn explicit_padding_matches_natural_layout() {
        let mut natural = Struc::new(StrucId::from_index(1));
        natural.add_field(Field::scalar("_0", ScalarType::U8));
        natural.add_field(Field::scalar("_1", ScalarType::F64));
        let mut padded = Struc::new(StrucId::new("ff"));
        padded.add_field(Field::scalar("field_0", ScalarType::U8));
        padded.add_padding(7);
        padded.add_field(Field::scalar("field_8", ScalarType::F64));
        let table = table_with(vec![natural, padded]);
        assert_eq!(
            fingerprint(&table, &StrucId::from_index(1)).unwrap(),
            fingerprint(&table, &StrucId::new("ff")).unwrap()
        );
    }

    #[test]
    fn pointer_targets_do_not_change_fingerprint() {
        let mut a = Struc::new(StrucId::from_index(1));
        a.add_field(Field::new("_0", FieldKind::Pointer, 8, Some(StrucId::from_index(1))));
        let mut b = Struc::new(StrucId::from_index(2));
        b.add_field(Field::new("_0", FieldKind::Pointer, 8, Some(StrucId::from_index(9))));
        let table = table_with(vec![a, b]);
        assert_eq!(
            fingerprint(&table, &StrucId::from_index(1)).unwrap(),
            fingerprint(&table, &StrucId::from_index(2)).unwrap()
        );
    }

    #[test]
    fn signedness_changes_fingerprint() {
        let mut a = Struc::new(StrucId::from_index(1));
        a.add_field(Field::scalar("_0", ScalarType::I32));
        let mut b = Struc::new(StrucId::from_index(2));
        b.add_field(Field::scalar("_0", ScalarType::U32));
        let table = table_with(vec![a, b]);
        assert_eq!(fingerprints(&table).unwrap().len(), 2);
    }

    #[test]
    fn self_embedding_is_rejected() {
        let mut a = Struc::new(StrucId::from_index(1));
        a.add_field(Field::new("_0", FieldKind::Struc, 0, Some(StrucId::from_index(1))));
        let table = table_with(vec![a]);
        let err = layout(&table, &StrucId::from_index(1)).unwrap_err();
        assert_eq!(err.info().code, "embedding-cycle");
    }
}
