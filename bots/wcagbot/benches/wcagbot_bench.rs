// SPDX-License-Identifier: PMPL-1.0-or-later
//! Benchmarks for wcagbot analysis and evaluation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wcagbot::catalog::{self, Level};
use wcagbot::evaluator::Evaluator;
use wcagbot::markup;
use wcagbot::rules;

const PAGE: &str = include_str!("../tests/fixtures/inaccessible.html");

fn bench_analyze(c: &mut Criterion) {
    c.bench_function("analyze_markup", |b| b.iter(|| markup::analyze(black_box(PAGE))));
}

fn bench_rules(c: &mut Criterion) {
    let doc = markup::analyze(PAGE);
    let registry = rules::builtin();

    c.bench_function("builtin_rules", |b| b.iter(|| registry.run(black_box(&doc))));
}

fn bench_evaluate(c: &mut Criterion) {
    let doc = markup::analyze(PAGE);
    let catalog = catalog::global().expect("embedded catalog");
    let evaluator = Evaluator::new(catalog, rules::builtin());

    c.bench_function("evaluate_aaa", |b| {
        b.iter(|| evaluator.evaluate(black_box(&doc), Level::AAA))
    });
}

fn bench_search(c: &mut Criterion) {
    let catalog = catalog::global().expect("embedded catalog");

    c.bench_function("catalog_search", |b| b.iter(|| catalog.search(black_box("focus"))));
}

criterion_group!(benches, bench_analyze, bench_rules, bench_evaluate, bench_search);
criterion_main!(benches);
