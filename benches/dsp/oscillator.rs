//! Oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use groovekit::dsp::oscillator::{Oscillator, Waveform};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - transcendental per sample
        let mut osc = Oscillator::new();
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), Waveform::Sine, 440.0, 48_000.0);
            })
        });

        // Saw - linear ramp
        let mut osc = Oscillator::new();
        group.bench_with_input(BenchmarkId::new("saw", size), &size, |b, _| {
            b.iter(|| {
                osc.render(black_box(&mut buffer), Waveform::Saw, 440.0, 48_000.0);
            })
        });

        // Pulse - branch per sample
        let mut osc = Oscillator::new();
        group.bench_with_input(BenchmarkId::new("pulse", size), &size, |b, _| {
            b.iter(|| {
                osc.render(
                    black_box(&mut buffer),
                    Waveform::Pulse { duty: 0.5 },
                    440.0,
                    48_000.0,
                );
            })
        });

        // Sub - pulse with a scaled increment
        let mut osc = Oscillator::new();
        group.bench_with_input(BenchmarkId::new("sub", size), &size, |b, _| {
            b.iter(|| {
                osc.render(
                    black_box(&mut buffer),
                    Waveform::Sub {
                        duty: 0.5,
                        offset_semitones: -12.0,
                    },
                    440.0,
                    48_000.0,
                );
            })
        });
    }

    group.finish();
}
