use proptest::prelude::*;
use rsb_core::{lcg_step, mix, LCG_INCREMENT, LCG_MULTIPLIER};

fn reference(v: u64) -> u64 {
    ((u128::from(v) * u128::from(LCG_MULTIPLIER) + u128::from(LCG_INCREMENT)) % (1u128 << 64)) as u64
}

proptest! {
    #[test]
    fn u64_is_a_single_lcg_step(v in any::<u64>()) {
        prop_assert_eq!(mix(v), reference(v));
        prop_assert_eq!(lcg_step(v), reference(v));
    }

    #[test]
    fn i32_sign_extends_then_truncates(v in any::<i32>()) {
        let widened = v as i64 as u64;
        prop_assert_eq!(mix(v) as u32, reference(widened) as u32);
    }

    #[test]
    fn u32_zero_extends_then_truncates(v in any::<u32>()) {
        prop_assert_eq!(mix(v), reference(u64::from(v)) as u32);
    }

    #[test]
    fn f32_mixes_its_bit_pattern(bits in any::<u32>()) {
        let out = mix(f32::from_bits(bits));
        prop_assert_eq!(out.to_bits(), reference(u64::from(bits)) as u32);
    }

    #[test]
    fn f64_mixes_its_bit_pattern(bits in any::<u64>()) {
        let out = mix(f64::from_bits(bits));
        prop_assert_eq!(out.to_bits(), reference(bits));
    }

    #[test]
    fn repeated_calls_are_bit_identical(bits in any::<u64>()) {
        let x = f64::from_bits(bits);
        prop_assert_eq!(mix(x).to_bits(), mix(x).to_bits());
        prop_assert_eq!(mix(bits as i16), mix(bits as i16));
    }
}

#[test]
fn mix_is_callable_from_many_threads() {
    let handles: Vec<_> = (0..4u64)
        .map(|t| std::thread::spawn(move || (0..1000u64).map(|i| mix(t * 1000 + i)).collect::<Vec<_>>()))
        .collect();
    for (t, handle) in handles.into_iter().enumerate() {
        let values = handle.join().expect("thread");
        for (i, value) in values.into_iter().enumerate() {
            assert_eq!(value, reference(t as u64 * 1000 + i as u64));
        }
    }
}
