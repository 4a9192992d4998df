use rsb_core::errors::RsbError;
use rsb_core::model::{Field, FieldKind, Struc, StrucId, StrucTable};
use rsb_core::rng::RngHandle;

use crate::options::GenOptions;
use crate::program::{default_argument, Call, Func, Program};

const STRUC_STREAM: u64 = 0;
const FUNC_STREAM: u64 = 1;
const CALL_STREAM: u64 = 2;

const ARG_KINDS: [FieldKind; 4] = [
    FieldKind::Int,
    FieldKind::UInt,
    FieldKind::Float,
    FieldKind::Pointer,
];

/// Generates `struc_count` structs and `func_count` functions.
///
/// Identical options produce identical programs.
pub fn generate(struc_count: usize, func_count: usize, options: &GenOptions) -> Result<Program, RsbError> {
    options.validate()?;

    let mut rng = RngHandle::substream(options.seed, STRUC_STREAM);
    let mut strucs = StrucTable::new();
    for _ in 0..struc_count {
        let struc = generate_struc(&strucs, options, &mut rng);
        strucs.insert(struc);
    }

    let mut rng = RngHandle::substream(options.seed, FUNC_STREAM);
    let mut funcs = Vec::with_capacity(func_count);
    for idx in 0..func_count {
        funcs.push(generate_func(idx + 1, &strucs, options, &mut rng));
    }

    let mut rng = RngHandle::substream(options.seed, CALL_STREAM);
    let calls: Vec<Vec<Call>> = funcs
        .iter()
        .map(|caller| wire_calls(caller, &funcs, &mut rng))
        .collect();
    for (func, calls) in funcs.iter_mut().zip(calls) {
        func.calls = calls;
    }

    log::info!(
        "generated {} structs and {} functions (seed {})",
        strucs.len(),
        funcs.len(),
        options.seed
    );
    Ok(Program {
        options: options.clone(),
        strucs,
        funcs,
    })
}

fn random_size(kind: FieldKind, rng: &mut RngHandle) -> usize {
    match kind {
        FieldKind::Int | FieldKind::UInt => 1 << rng.range_inclusive(0, 3),
        FieldKind::Float => 1 << rng.range_inclusive(2, 3),
        FieldKind::Pointer => 8,
        FieldKind::Struc => 0,
    }
}

fn allowed(kind: FieldKind, options: &GenOptions) -> bool {
    match kind {
        FieldKind::Pointer => options.pointers,
        FieldKind::Struc => options.embedded,
        _ => true,
    }
}

fn generate_struc(existing: &StrucTable, options: &GenOptions, rng: &mut RngHandle) -> Struc {
    let id = StrucId::from_index(existing.len() + 1);
    let mut struc = Struc::new(id);
    let earlier: Vec<&StrucId> = existing.ids().collect();
    // The first struct has nothing to point at or embed.
    let kinds: Vec<FieldKind> = if earlier.is_empty() {
        FieldKind::SCALARS.to_vec()
    } else {
        FieldKind::ALL
            .into_iter()
            .filter(|kind| allowed(*kind, options))
            .collect()
    };

    let field_count = rng.range_inclusive(options.min_fields, options.max_fields);
    for idx in 0..field_count {
        let kind = *rng.choose(&kinds).unwrap_or(&FieldKind::Int);
        let size = random_size(kind, rng);
        let target = if kind.references_struc() {
            rng.choose(&earlier).map(|id| (*id).clone())
        } else {
            None
        };
        struc.add_field(Field::new(format!("_{idx}"), kind, size, target));
    }
    struc
}

fn generate_func(id: usize, strucs: &StrucTable, options: &GenOptions, rng: &mut RngHandle) -> Func {
    let mut func = Func::new(id);
    let targets: Vec<&StrucId> = strucs.ids().collect();
    let kinds: Vec<FieldKind> = ARG_KINDS
        .into_iter()
        .filter(|kind| *kind != FieldKind::Pointer || (options.pointers && !targets.is_empty()))
        .collect();

    let arg_count = rng.range_inclusive(options.min_args, options.max_args);
    for idx in 0..arg_count {
        let kind = *rng.choose(&kinds).unwrap_or(&FieldKind::Int);
        let size = random_size(kind, rng);
        let target = if kind == FieldKind::Pointer {
            rng.choose(&targets).map(|id| (*id).clone())
        } else {
            None
        };
        func.add_argument(Field::new(format!("_{idx}"), kind, size, target), strucs);
    }
    func
}

/// One call to every other function, reusing the caller's expressions where
/// the types line up.
fn wire_calls(caller: &Func, funcs: &[Func], rng: &mut RngHandle) -> Vec<Call> {
    funcs
        .iter()
        .filter(|callee| callee.id != caller.id)
        .map(|callee| Call {
            callee: callee.id,
            args: callee
                .args
                .iter()
                .map(|arg| match rng.choose(caller.candidates(&arg.type_name())) {
                    Some(expr) => expr.clone(),
                    None => default_argument(arg),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_struct_is_scalar_only() {
        let program = generate(5, 0, &GenOptions::default()).unwrap();
        let first = program.strucs.iter().next().unwrap();
        assert!(first.fields.iter().all(|f| !f.kind.references_struc()));
    }

    #[test]
    fn references_point_backwards() {
        let program = generate(30, 0, &GenOptions { seed: 3, ..GenOptions::default() }).unwrap();
        for (idx, struc) in program.strucs.iter().enumerate() {
            for field in &struc.fields {
                if let Some(target) = &field.target {
                    let target_idx: usize = target.as_str().parse().unwrap();
                    assert!(target_idx >= 1 && target_idx <= idx);
                }
            }
        }
    }

    #[test]
    fn no_structs_means_no_pointer_arguments() {
        let program = generate(0, 20, &GenOptions::default()).unwrap();
        for func in &program.funcs {
            assert!(func.args.iter().all(|a| a.kind != FieldKind::Pointer));
        }
    }

    #[test]
    fn every_function_calls_every_other() {
        let program = generate(3, 6, &GenOptions::default()).unwrap();
        for func in &program.funcs {
            assert_eq!(func.calls.len(), 5);
            assert!(func.calls.iter().all(|call| call.callee != func.id));
            for call in &func.calls {
                let callee = &program.funcs[call.callee - 1];
                assert_eq!(call.args.len(), callee.args.len());
            }
        }
    }

    #[test]
    fn disabled_kinds_never_appear() {
        let options = GenOptions {
            pointers: false,
            embedded: false,
            ..GenOptions::default()
        };
        let program = generate(20, 10, &options).unwrap();
        for struc in program.strucs.iter() {
            assert!(struc.fields.iter().all(|f| !f.kind.references_struc()));
        }
    }
}
