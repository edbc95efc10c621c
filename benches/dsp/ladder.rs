//! Ladder filter block processing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use groovekit::dsp::ladder::LadderFilter;

use crate::BLOCK_SIZES;

pub fn bench_ladder(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/ladder");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.1f32; size];

        let mut filter = LadderFilter::new(1_000.0);
        group.bench_with_input(BenchmarkId::new("clean", size), &size, |b, _| {
            b.iter(|| {
                filter.render(black_box(&mut buffer), 48_000.0);
            })
        });

        // Resonant and driven: same math, hotter tanh inputs.
        let mut filter = LadderFilter::new(1_000.0);
        filter.set_resonance(3.5);
        filter.set_drive(3.0);
        group.bench_with_input(BenchmarkId::new("resonant", size), &size, |b, _| {
            b.iter(|| {
                filter.render(black_box(&mut buffer), 48_000.0);
            })
        });
    }

    group.finish();
}
