//! Delay line feedback processing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use groovekit::timeline::DelayFx;

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.1f32; size];

        let mut delay = DelayFx::new(96_000, 12_000, 0.4, 0.5);
        group.bench_with_input(BenchmarkId::new("feedback", size), &size, |b, _| {
            b.iter(|| {
                delay.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
