// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the natural-order sort used on every folder
// listing.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use bindwerk_document::sort_natural;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Sort 1000 mixed scan/chapter names, shuffled deterministically.
fn bench_sort_natural(c: &mut Criterion) {
    let mut names: Vec<String> = (0..1000u32)
        .map(|i| {
            let n = (i * 7919) % 1000;
            match n % 3 {
                0 => format!("Scan {n}.jpg"),
                1 => format!("chapter{n}_part{}.pdf", n % 12),
                _ => format!("IMG_{n:05}.png"),
            }
        })
        .collect();
    names.push("README".into());

    c.bench_function("sort_natural (1000 names)", |b| {
        b.iter(|| {
            let mut batch = black_box(names.clone());
            sort_natural(&mut batch);
            black_box(batch);
        });
    });
}

criterion_group!(benches, bench_sort_natural);
criterion_main!(benches);
