//! Parser for the C++ header printed by the recovery tool.
//!
//! Only struct bodies are interpreted. Everything outside `struct ... {`/`};`
//! pairs (statistics comments, typedefs, blank lines) is skipped.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use rsb_core::errors::{ErrorInfo, RsbError};
use rsb_core::model::{Field, FieldKind, Struc, StrucId, StrucTable};
use rsb_core::scalar::ScalarType;

const STATS_PREFIX: &str = "// ";

static STRUC_ID: OnceLock<Regex> = OnceLock::new();
static ARRAY_LEN: OnceLock<Regex> = OnceLock::new();

fn struc_id_regex() -> &'static Regex {
    STRUC_ID.get_or_init(|| Regex::new(r"rs_(?P<rs>[0-9a-f_]+)").expect("valid struct id regex"))
}

fn array_len_regex() -> &'static Regex {
    ARRAY_LEN.get_or_init(|| Regex::new(r"\[(?P<len>\d+)\]").expect("valid array length regex"))
}

fn parse_error(code: &str, message: impl Into<String>, line_no: usize, line: &str) -> RsbError {
    RsbError::Parse(
        ErrorInfo::new(code, message)
            .with_context("line", line_no.to_string())
            .with_context("text", line.trim()),
    )
}

/// Leading `// ` statistics lines, prefix removed.
pub fn stats_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map_while(|line| line.strip_prefix(STATS_PREFIX))
        .collect()
}

/// Parses every struct definition in `text`.
///
/// Pointer members may name structs defined later; those get an empty
/// placeholder that the definition fills in place.
pub fn parse_recovered(text: &str) -> Result<StrucTable, RsbError> {
    let mut table = StrucTable::new();
    let mut defined: HashSet<StrucId> = HashSet::new();
    let mut current: Option<Struc> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        if raw.starts_with("struct") {
            if current.is_some() {
                return Err(parse_error("nested-struc", "struct opened before the previous one closed", line_no, raw));
            }
            let captures = struc_id_regex()
                .captures(raw)
                .ok_or_else(|| parse_error("missing-struc-id", "struct name does not match rs_<id>", line_no, raw))?;
            let id = StrucId::new(&captures["rs"]);
            if !defined.insert(id.clone()) {
                return Err(parse_error("duplicate-struc", "struct defined twice", line_no, raw));
            }
            current = Some(Struc::new(id));
        } else if raw.starts_with("};") {
            let struc = current
                .take()
                .ok_or_else(|| parse_error("unbalanced-close", "`};` without an open struct", line_no, raw))?;
            table.insert(struc);
        } else if let Some(struc) = current.as_mut() {
            parse_member(struc, &mut table, raw, line_no)?;
        }
    }

    if let Some(struc) = current {
        return Err(RsbError::Parse(
            ErrorInfo::new("unterminated-struc", "input ended inside a struct")
                .with_context("id", struc.id.to_string()),
        ));
    }
    log::debug!("parsed {} recovered structs", table.len());
    Ok(table)
}

fn parse_member(
    struc: &mut Struc,
    table: &mut StrucTable,
    raw: &str,
    line_no: usize,
) -> Result<(), RsbError> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with("//") {
        return Ok(());
    }
    let (ty, rest) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| parse_error("malformed-member", "expected `<type> <name>;`", line_no, raw))?;
    let decl = rest
        .trim()
        .split_once(';')
        .map(|(decl, _)| decl.trim())
        .ok_or_else(|| parse_error("malformed-member", "member is missing `;`", line_no, raw))?;

    let count = match array_len_regex().captures(decl) {
        Some(captures) => captures["len"]
            .parse::<usize>()
            .map_err(|err| parse_error("malformed-member", err.to_string(), line_no, raw))?,
        None => 1,
    };

    if decl.contains("_padding_") {
        let elem = ScalarType::from_c_name(ty).map(ScalarType::size).unwrap_or(1);
        struc.add_padding(elem * count);
        return Ok(());
    }

    let field = member_field(struc, table, ty, line_no, raw)?;
    let Some((name, _)) = decl.split_once('[') else {
        struc.add_field(Field {
            name: decl.to_string(),
            ..field
        });
        return Ok(());
    };
    if count == 0 || array_len_regex().find(decl).is_none() {
        return Err(parse_error("malformed-member", "array member needs a positive length", line_no, raw));
    }
    let name = name.trim();
    // Arrays become one field per element so later offsets stay aligned.
    for idx in 0..count {
        struc.add_field(Field {
            name: format!("{name}[{idx}]"),
            ..field.clone()
        });
    }
    Ok(())
}

/// Resolves a member type to an unnamed field template.
fn member_field(
    struc: &Struc,
    table: &mut StrucTable,
    ty: &str,
    line_no: usize,
    raw: &str,
) -> Result<Field, RsbError> {
    if let Some(scalar) = ScalarType::from_c_name(ty) {
        return Ok(Field::scalar(String::new(), scalar));
    }
    if let Some(base) = ty.strip_suffix('*') {
        let target = match base.strip_prefix("rs_") {
            Some(raw_id) => {
                let id = StrucId::new(raw_id);
                if id != struc.id {
                    table.get_or_insert(&id);
                }
                Some(id)
            }
            None if base == "void" => None,
            None => {
                return Err(parse_error("unknown-type", format!("unsupported pointer type {ty:?}"), line_no, raw))
            }
        };
        return Ok(Field::new(String::new(), FieldKind::Pointer, 8, target));
    }
    if let Some(raw_id) = ty.strip_prefix("rs_") {
        let id = StrucId::new(raw_id);
        table.get_or_insert(&id);
        return Ok(Field::new(String::new(), FieldKind::Struc, 0, Some(id)));
    }
    Err(parse_error("unknown-type", format!("unsupported member type {ty:?}"), line_no, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "// structs: 2\n\
// functions: 14\n\
#pragma once\n\
\n\
struct rs_1a {\n\
\x20   uint8_t field_0;\n\
\x20   uint8_t _padding_1[7];\n\
\x20   double field_8;\n\
\x20   rs_2b* field_10;\n\
};\n\
\n\
struct rs_2b {\n\
\x20   float field_0;\n\
\x20   int64_t field_8;\n\
};\n";

    #[test]
    fn stats_are_leading_comment_lines() {
        assert_eq!(stats_lines(SAMPLE), ["structs: 2", "functions: 14"]);
        assert!(stats_lines("struct rs_1 {\n// x\n").is_empty());
    }

    #[test]
    fn parses_members_padding_and_forward_pointers() {
        let table = parse_recovered(SAMPLE).unwrap();
        assert_eq!(table.len(), 2);
        let ids: Vec<_> = table.ids().map(StrucId::as_str).collect();
        assert_eq!(ids, ["2b", "1a"]);

        let first = table.get(&StrucId::new("1a")).unwrap();
        assert_eq!(first.fields.len(), 3);
        assert_eq!(first.fields[1].scalar_type(), Some(ScalarType::F64));
        assert_eq!(first.fields[2].kind, FieldKind::Pointer);
        assert_eq!(first.fields[2].target, Some(StrucId::new("2b")));
        assert_eq!(first.padding.len(), 1);
        assert_eq!(first.padding[0].size, 7);

        let second = table.get(&StrucId::new("2b")).unwrap();
        assert_eq!(second.fields.len(), 2);
    }

    #[test]
    fn malformed_input_reports_line() {
        let err = parse_recovered("struct rs_1 {\n    int8_t a\n};\n").unwrap_err();
        assert_eq!(err.info().code, "malformed-member");
        assert_eq!(err.info().context.get("line").map(String::as_str), Some("2"));

        let err = parse_recovered("struct rs_1 {\n    wchar_t a;\n};\n").unwrap_err();
        assert_eq!(err.info().code, "unknown-type");

        let err = parse_recovered("struct rs_1 {\nstruct rs_2 {\n").unwrap_err();
        assert_eq!(err.info().code, "nested-struc");

        let err = parse_recovered("};\n").unwrap_err();
        assert_eq!(err.info().code, "unbalanced-close");

        let err = parse_recovered("struct rs_1 {\n    int8_t a;\n").unwrap_err();
        assert_eq!(err.info().code, "unterminated-struc");

        let err = parse_recovered("struct rs_1 {\n};\nstruct rs_1 {\n};\n").unwrap_err();
        assert_eq!(err.info().code, "duplicate-struc");

        let err = parse_recovered("struct rs_1 {\n    int32_t a[0];\n};\n").unwrap_err();
        assert_eq!(err.info().code, "malformed-member");

        let err = parse_recovered("struct rs_1 {\n    int32_t a[];\n};\n").unwrap_err();
        assert_eq!(err.info().code, "malformed-member");
    }

    #[test]
    fn array_members_expand_to_one_field_per_element() {
        let table = parse_recovered(
            "struct rs_1 {\n    int32_t field_0[4];\n    int64_t field_10;\n    rs_2* field_18[2];\n};\n",
        )
        .unwrap();
        let struc = table.get(&StrucId::new("1")).unwrap();
        let names: Vec<_> = struc.fields.iter().map(|field| field.name.as_str()).collect();
        assert_eq!(
            names,
            ["field_0[0]", "field_0[1]", "field_0[2]", "field_0[3]", "field_10", "field_18[0]", "field_18[1]"]
        );
        assert!(struc.fields[5..].iter().all(|field| field.target == Some(StrucId::new("2"))));

        let offsets: Vec<_> = rsb_core::layout::layout(&table, &StrucId::new("1"))
            .unwrap()
            .slots
            .iter()
            .map(|slot| slot.offset)
            .collect();
        assert_eq!(offsets, [0, 4, 8, 12, 16, 24, 32]);
    }
}
