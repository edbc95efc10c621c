//! Envelope application.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use groovekit::dsp::envelope::AdsrEnvelope;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![1.0f32; size];

        // Sustaining: the steady-state cost.
        let mut env = AdsrEnvelope::new(48_000.0);
        env.note_on();
        let mut warmup = vec![1.0f32; 48_000];
        env.apply(&mut warmup);
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| {
                env.apply(black_box(&mut buffer));
            })
        });

        // Idle short-circuit: what silent voices cost.
        let mut env = AdsrEnvelope::new(48_000.0);
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| {
                env.apply(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
