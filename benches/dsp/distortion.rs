//! Waveshaping transfer curves.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use groovekit::dsp::distortion::{process_buffer, DistortionMode};

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.5f32; size];

        for (name, mode) in [
            ("hard", DistortionMode::Hard),
            ("soft", DistortionMode::Soft),
            ("tanh", DistortionMode::Tanh),
        ] {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    process_buffer(black_box(&mut buffer), mode, 3.0, 0.8);
                })
            });
        }
    }

    group.finish();
}
