//! Full-timeline pulls: several tracks with effect chains, driver included.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use groovekit::dsp::distortion::DistortionMode;
use groovekit::engine::{engine_pair, EngineConfig};
use groovekit::timeline::PluginState;

use crate::BLOCK_SIZES;

pub fn bench_timeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/timeline");

    for &size in BLOCK_SIZES {
        let (mut engine, mut handle) = engine_pair(EngineConfig::default());
        let mut buffer = vec![0.0f32; size];

        for track in 0..4usize {
            handle.add_track();
            handle.add_plugin(track, PluginState::ladder(1_200.0));
            handle.add_plugin(
                track,
                PluginState::distortion(DistortionMode::Tanh, 2.0, 0.6),
            );
        }
        engine.process(&mut buffer);
        for note in [48u8, 55, 60, 64] {
            handle.note_on(note);
        }
        engine.process(&mut buffer);

        group.bench_with_input(
            BenchmarkId::new("4_tracks_with_fx", size),
            &size,
            |b, _| {
                b.iter(|| {
                    engine.process(black_box(&mut buffer));
                })
            },
        );
    }

    group.finish();
}
