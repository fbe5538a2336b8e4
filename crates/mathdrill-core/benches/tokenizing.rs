use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mathdrill_core::evaluator::evaluate;
use mathdrill_core::input::caret_to_markup;
use mathdrill_core::model::ExponentStyle;
use mathdrill_core::tokenizer::Tokenizer;

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    let simple = "12 cm";
    let markup = "1,5 * 10<sup>21</sup> m/s";
    let text = "Paris";
    let long = {
        let mut s = String::new();
        for i in 1..50 {
            s.push_str(&format!("{i} + "));
        }
        s.push_str("50 km/h");
        s
    };

    let power = Tokenizer::new(ExponentStyle::Power);
    let scientific = Tokenizer::new(ExponentStyle::Scientific);

    group.bench_function("simple", |b| b.iter(|| power.tokenize(black_box(simple))));

    group.bench_function("markup_power", |b| {
        b.iter(|| power.tokenize(black_box(markup)))
    });

    group.bench_function("markup_scientific", |b| {
        b.iter(|| scientific.tokenize(black_box(markup)))
    });

    group.bench_function("text", |b| b.iter(|| power.tokenize(black_box(text))));

    group.bench_function("long_sum", |b| b.iter(|| power.tokenize(black_box(&long))));

    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let tokens = Tokenizer::default().tokenize("1.5 * 1000 + 20 / 4 - 3 m").numeric;

    c.bench_function("evaluate_expression", |b| {
        b.iter(|| evaluate(black_box(&tokens)))
    });
}

fn bench_caret(c: &mut Criterion) {
    c.bench_function("caret_to_markup", |b| {
        b.iter(|| caret_to_markup(black_box("6,67 * 10^-11 m^{3} kg^-1 s^-2")))
    });
}

criterion_group!(benches, bench_tokenize, bench_evaluate, bench_caret);
criterion_main!(benches);
