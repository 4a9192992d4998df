use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rsb_gen::{generate, GenOptions, PREAMBLE};

fn generate_bench(c: &mut Criterion) {
    let options = GenOptions {
        seed: 42,
        ..GenOptions::default()
    };
    c.bench_function("generate_10x100", |b| {
        b.iter(|| {
            let program = generate(10, 100, &options).unwrap();
            black_box(program);
        });
    });
    let program = generate(10, 100, &options).unwrap();
    c.bench_function("render_10x100", |b| {
        b.iter(|| black_box(program.render(PREAMBLE)));
    });
}

criterion_group!(benches, generate_bench);
criterion_main!(benches);
