//! Minimal polyphony tour: a synth, a chord, and a rendered block.
//!
//! Run with: cargo run --example simple_poly

use groovekit::graph::{AudioNode, RenderCtx};
use groovekit::rt::BlockArena;
use groovekit::synth::PolySynth;

fn main() {
    let sample_rate = 48_000.0;
    let mut synth = PolySynth::new(sample_rate, 4);
    let mut arena = BlockArena::new();

    println!("playing a C-major chord on {} voices", 4);
    synth.note_on(60);
    synth.note_on(64);
    synth.note_on(67);

    let mut buffer = vec![0.0f32; 256];
    arena.begin_block();
    let ctx = RenderCtx::new(sample_rate, 120.0, &arena);
    synth.process(&ctx, &mut buffer);

    let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
    println!("rendered {} samples, peak {peak:.3}", buffer.len());

    synth.note_off(64);
    arena.begin_block();
    let ctx = RenderCtx::new(sample_rate, 120.0, &arena);
    synth.process(&ctx, &mut buffer);
    println!("released E4; {} voices still sounding", synth.active_voices());
}
