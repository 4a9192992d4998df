//! Generated program model and its C++ rendering.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use rsb_core::errors::RsbError;
use rsb_core::model::{Field, FieldKind, Struc, StrucTable};
use serde::{Deserialize, Serialize};

use crate::options::GenOptions;

/// A call from one generated function to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Index of the called function.
    pub callee: usize,
    /// Argument expressions, one per callee parameter.
    pub args: Vec<String>,
}

/// A generated `void f_<id>(...)` function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Func {
    /// Index of the function; also its name suffix.
    pub id: usize,
    /// Parameters, named `a<n>`.
    pub args: Vec<Field>,
    /// C type name -> lvalue expressions of that type reachable from the
    /// arguments.
    #[serde(default)]
    pub type_dict: BTreeMap<String, Vec<String>>,
    /// Calls emitted after the `use` statements.
    #[serde(default)]
    pub calls: Vec<Call>,
}

impl Func {
    /// Function without arguments or calls.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            args: Vec::new(),
            type_dict: BTreeMap::new(),
            calls: Vec::new(),
        }
    }

    /// C++ name, `f_<id>`.
    pub fn name(&self) -> String {
        func_name(self.id)
    }

    /// Appends an argument and registers every expression it exposes.
    pub fn add_argument(&mut self, arg: Field, strucs: &StrucTable) {
        self.type_dict
            .entry(arg.type_name())
            .or_default()
            .push(arg.name.clone());
        if let Some(target) = arg.target.as_ref().and_then(|id| strucs.get(id)) {
            self.add_types(&format!("{}->", arg.name), target, strucs);
        }
        self.args.push(arg);
    }

    fn add_types(&mut self, prefix: &str, struc: &Struc, strucs: &StrucTable) {
        for field in &struc.fields {
            let expr = format!("{prefix}{}", field.name);
            self.type_dict
                .entry(field.type_name())
                .or_default()
                .push(expr.clone());
            let Some(target) = field.target.as_ref().and_then(|id| strucs.get(id)) else {
                continue;
            };
            let accessor = if field.kind == FieldKind::Pointer { "->" } else { "." };
            self.add_types(&format!("{expr}{accessor}"), target, strucs);
        }
    }

    /// Expressions of the given C type, if any are reachable.
    pub fn candidates(&self, type_name: &str) -> &[String] {
        self.type_dict
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `void f_<id>(<type> <name>, ...)`
    pub fn signature(&self) -> String {
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| format!("{} {}", arg.type_name(), arg.name))
            .collect();
        format!("void {}({})", self.name(), args.join(", "))
    }

    fn render(&self, strucs: &StrucTable, out: &mut String) {
        out.push_str(&self.signature());
        out.push_str(" {\n");
        for arg in &self.args {
            match (arg.kind, arg.target.as_ref().and_then(|id| strucs.get(id))) {
                (FieldKind::Pointer, Some(target)) => {
                    render_struc_usage(target, &format!("{}->", arg.name), strucs, out)
                }
                (FieldKind::Pointer, None) => {}
                _ => render_use(&arg.name, out),
            }
        }
        render_calls(&self.calls, out);
        out.push_str("}\n");
    }
}

pub(crate) fn func_name(id: usize) -> String {
    format!("f_{id}")
}

fn render_use(expr: &str, out: &mut String) {
    let _ = writeln!(out, "    {expr} = use({expr});");
}

fn render_struc_usage(struc: &Struc, prefix: &str, strucs: &StrucTable, out: &mut String) {
    for field in &struc.fields {
        let expr = format!("{prefix}{}", field.name);
        let target = field.target.as_ref().and_then(|id| strucs.get(id));
        match (field.kind, target) {
            (FieldKind::Pointer, Some(target)) => {
                render_struc_usage(target, &format!("{expr}->"), strucs, out)
            }
            (FieldKind::Struc, Some(target)) => {
                render_struc_usage(target, &format!("{expr}."), strucs, out)
            }
            (FieldKind::Pointer | FieldKind::Struc, None) => {}
            _ => render_use(&expr, out),
        }
    }
}

fn render_calls(calls: &[Call], out: &mut String) {
    for call in calls {
        let _ = writeln!(out, "    {}({});", func_name(call.callee), call.args.join(", "));
    }
}

/// Literal passed for an argument when the caller has nothing of its type.
pub fn default_argument(arg: &Field) -> String {
    match arg.kind {
        FieldKind::Int | FieldKind::UInt => "0".to_string(),
        FieldKind::Float if arg.size == 4 => "0.0f".to_string(),
        FieldKind::Float => "0.0".to_string(),
        FieldKind::Pointer => "nullptr".to_string(),
        FieldKind::Struc => match &arg.target {
            Some(id) => format!("{}()", id.struc_name()),
            None => "{}".to_string(),
        },
    }
}

/// A complete generated benchmark program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Options the program was generated with.
    pub options: GenOptions,
    /// Generated structs in definition order.
    pub strucs: StrucTable,
    /// Generated functions in definition order.
    pub funcs: Vec<Func>,
}

impl Program {
    /// Calls emitted by `main`: every function with default arguments.
    pub fn main_calls(&self) -> Vec<Call> {
        self.funcs
            .iter()
            .map(|func| Call {
                callee: func.id,
                args: func.args.iter().map(default_argument).collect(),
            })
            .collect()
    }

    /// Renders the C++ translation unit after `preamble`.
    pub fn render(&self, preamble: &str) -> String {
        let mut out = String::with_capacity(preamble.len() + 256 * self.funcs.len());
        out.push_str(preamble);
        out.push('\n');
        let strucs: Vec<String> = self.strucs.iter().map(ToString::to_string).collect();
        out.push_str(&strucs.join("\n"));
        out.push('\n');
        for func in &self.funcs {
            let _ = writeln!(out, "{};", func.signature());
        }
        out.push('\n');
        for (idx, func) in self.funcs.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            func.render(&self.strucs, &mut out);
        }
        out.push('\n');
        out.push_str("int main() {\n");
        render_calls(&self.main_calls(), &mut out);
        out.push_str("    return 0;\n}\n");
        out
    }

    /// Writes the C++ source to `path` and the JSON manifest next to it.
    pub fn write(&self, path: &Path, preamble: &str) -> Result<(), RsbError> {
        std::fs::write(path, self.render(preamble)).map_err(|err| RsbError::io(path, err))?;
        let manifest = manifest_path(path);
        let bytes = serde_json::to_vec_pretty(self)?;
        std::fs::write(&manifest, bytes).map_err(|err| RsbError::io(&manifest, err))?;
        log::debug!(
            "wrote {} structs and {} functions to {}",
            self.strucs.len(),
            self.funcs.len(),
            path.display()
        );
        Ok(())
    }

    /// Reads a manifest written by [`Program::write`].
    pub fn load(manifest: &Path) -> Result<Self, RsbError> {
        let bytes = std::fs::read(manifest).map_err(|err| RsbError::io(manifest, err))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// `test.cxx` -> `test.cxx.json`
pub fn manifest_path(source: &Path) -> std::path::PathBuf {
    let mut name = source.as_os_str().to_owned();
    name.push(".json");
    name.into()
}
