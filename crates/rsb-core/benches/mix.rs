use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rsb_core::mix;

fn mix_bench(c: &mut Criterion) {
    c.bench_function("mix_u64", |b| {
        b.iter(|| mix(black_box(0x0123_4567_89ab_cdefu64)));
    });
    c.bench_function("mix_f32", |b| {
        b.iter(|| mix(black_box(1.0f32)));
    });
    c.bench_function("mix_f64", |b| {
        b.iter(|| mix(black_box(0.0f64)));
    });
}

criterion_group!(benches, mix_bench);
criterion_main!(benches);
