//! Renders generated structs the way the recovery tool prints them
//! (flattened, explicit padding, `float`/`double`) and checks the scorer
//! recognises them.

use std::fmt::Write as _;

use rsb_core::layout::layout;
use rsb_core::model::{FieldKind, StrucTable};
use rsb_eval::{evaluate, parse_recovered, stats_lines};
use rsb_gen::{generate, GenOptions};

fn render_recovered(table: &StrucTable, skip: Option<usize>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// recovered structs: {}", table.len());
    out.push('\n');
    for (idx, struc) in table.iter().enumerate() {
        if Some(idx) == skip {
            continue;
        }
        let layout = layout(table, &struc.id).expect("layout");
        let _ = writeln!(out, "struct rs_{:x} {{", idx + 0x100);
        let mut cursor = 0;
        for (n, slot) in layout.slots.iter().enumerate() {
            if slot.offset > cursor {
                let _ = writeln!(out, "    uint8_t _padding_{n}[{}];", slot.offset - cursor);
            }
            let ty = match (slot.kind, slot.size) {
                (FieldKind::Int, size) => format!("int{}_t", size * 8),
                (FieldKind::UInt, size) => format!("uint{}_t", size * 8),
                (FieldKind::Float, 4) => "float".to_string(),
                (FieldKind::Float, _) => "double".to_string(),
                (FieldKind::Pointer, _) => "rs_ff*".to_string(),
                (FieldKind::Struc, _) => unreachable!("layouts are flattened"),
            };
            let _ = writeln!(out, "    {ty} field_{:x};", slot.offset);
            cursor = slot.offset + slot.size;
        }
        out.push_str("};\n\n");
    }
    out
}

#[test]
fn faithful_recovery_scores_one() {
    let program = generate(12, 0, &GenOptions { seed: 5, ..GenOptions::default() }).expect("generate");
    let text = render_recovered(&program.strucs, None);
    assert_eq!(stats_lines(&text), ["recovered structs: 12"]);

    let recovered = parse_recovered(&text).expect("parse");
    let report = evaluate(&program.strucs, &recovered).expect("evaluate");
    assert_eq!(report.matched, report.generated);
    assert_eq!(report.recovered_ratio, 1.0);
    assert_eq!(report.garbage_ratio, 0.0);
}

#[test]
fn missing_struct_lowers_the_score() {
    let program = generate(1, 0, &GenOptions { seed: 11, ..GenOptions::default() }).expect("generate");
    let text = render_recovered(&program.strucs, Some(0));
    let recovered = parse_recovered(&text).expect("parse");
    let report = evaluate(&program.strucs, &recovered).expect("evaluate");
    assert_eq!(report.matched, 0);
    assert_eq!(report.to_string(), "0.0,1.0");
}
