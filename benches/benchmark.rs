use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eqsolve::Engine;

fn bench_tokenize(c: &mut Criterion) {
    let engine = Engine::default();
    c.bench_function("tokenize polynomial", |b| {
        b.iter(|| engine.tokenize(black_box("3*x^4 - 2*x^3 + sin(x)/2 - sqrt(x + 1) = 7")))
    });
}

fn bench_parse(c: &mut Criterion) {
    let engine = Engine::default();
    c.bench_function("parse nested", |b| {
        b.iter(|| engine.parse(black_box("((x + 1)*(x - 2))^2 / (3*x + [4 - x]) = ln(x)")))
    });
}

fn bench_solve(c: &mut Criterion) {
    let engine = Engine::default();
    let mut group = c.benchmark_group("solve");
    group.bench_function("linear", |b| b.iter(|| engine.solve(black_box("3*x + 7 = 22"), None)));
    group.bench_function("quadratic", |b| {
        b.iter(|| engine.solve(black_box("2*x^2 - x - 1 = 0"), None))
    });
    group.bench_function("numeric cubic", |b| {
        b.iter(|| engine.solve(black_box("x^3 - 2*x - 5 = 0"), None))
    });
    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_parse, bench_solve);
criterion_main!(benches);
