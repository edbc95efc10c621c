//! Whole-voice rendering: three oscillators, ladder, envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use groovekit::graph::{AudioNode, RenderCtx};
use groovekit::rt::BlockArena;
use groovekit::synth::PolySynth;

use crate::BLOCK_SIZES;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        for voices in [1usize, 4, 8] {
            let mut synth = PolySynth::new(48_000.0, voices);
            for i in 0..voices {
                synth.note_on(48 + (i as u8) * 5);
            }
            let mut arena = BlockArena::new();
            let mut buffer = vec![0.0f32; size];

            group.bench_with_input(
                BenchmarkId::new(format!("{voices}_voices"), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        arena.begin_block();
                        let ctx = RenderCtx::new(48_000.0, 120.0, &arena);
                        synth.process(&ctx, black_box(&mut buffer));
                    })
                },
            );
        }
    }

    group.finish();
}
