//! Benchmarks for the per-element color hot path.
//!
//! Every audited element parses two or more color strings, flattens its
//! background stack, and measures at least one contrast ratio.
//!
//! Run with: cargo bench -p lumen-color --bench contrast_bench

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use lumen_color::{
    Color, Deficiency, ParseCache, check_visibility_under_deficiency, contrast_ratio, flatten,
    parse, suggest_foreground,
};

const INPUTS: [&str; 6] = [
    "#336699",
    "rgb(12 200 99 / 50%)",
    "hsl(210deg 40% 30%)",
    "rebeccapurple",
    "255, 255, 255",
    "rgba(0, 0, 0, 0.25)",
];

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("color/parse");

    group.bench_function("uncached", |b| {
        b.iter(|| {
            for input in INPUTS {
                let _ = black_box(parse(black_box(input)));
            }
        })
    });

    group.bench_function("cached", |b| {
        let mut cache = ParseCache::new();
        b.iter(|| {
            for input in INPUTS {
                let _ = black_box(cache.parse(black_box(input)));
            }
        })
    });

    group.finish();
}

fn bench_contrast(c: &mut Criterion) {
    let mut group = c.benchmark_group("color/contrast");
    let fg = Color::rgb(0x77, 0x77, 0x77);
    let layers = [
        Color::rgba(0, 0, 255, 0.2),
        Color::rgba(255, 0, 0, 0.1),
        Color::rgb(250, 250, 250),
    ];

    group.bench_function("ratio", |b| {
        b.iter(|| black_box(contrast_ratio(black_box(fg), black_box(Color::WHITE))))
    });

    group.bench_function("flatten_then_ratio", |b| {
        b.iter(|| {
            let bg = flatten(black_box(layers));
            black_box(contrast_ratio(fg, bg))
        })
    });

    group.bench_function("suggest_foreground", |b| {
        b.iter(|| black_box(suggest_foreground(black_box(fg), Color::WHITE, 7.0)))
    });

    group.bench_function("all_deficiencies", |b| {
        b.iter(|| {
            for d in Deficiency::ALL {
                black_box(check_visibility_under_deficiency(fg, Color::WHITE, d, 4.5));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_contrast);
criterion_main!(benches);
