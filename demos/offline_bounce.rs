//! Render a short phrase through the full engine without an audio device.
//!
//! Authors a bar of notes directly into a track's note list, arms playback,
//! and pulls blocks by hand - the same path the realtime callback takes.
//!
//! Run with: cargo run --example offline_bounce

use groovekit::engine::{engine_pair, EngineConfig};
use groovekit::sequencing::{beats_to_frames, NoteRecord};
use groovekit::timeline::PluginState;

fn main() {
    let config = EngineConfig::default();
    let (mut engine, mut handle) = engine_pair(config);
    let sr = config.sample_rate as f64;
    let bpm = config.bpm as f64;

    handle.add_track();
    handle.add_plugin(0, PluginState::ladder(1_500.0));
    handle.toggle_play();

    // One block so the ops land before we author notes against the track.
    let mut block = vec![0.0f32; 256];
    engine.process(&mut block);
    handle.reset();

    // A C-minor arpeggio, one note per beat.
    let notes = [60u8, 63, 67, 72];
    for (i, &note) in notes.iter().enumerate() {
        let start = beats_to_frames(i as f64, bpm, sr);
        let end = beats_to_frames(i as f64 + 0.9, bpm, sr);
        engine
            .timeline_mut()
            .track_mut(0)
            .expect("track 0 was added above")
            .notes_mut()
            .insert(NoteRecord { start, end, note });
    }

    // Bounce two bars.
    let total = beats_to_frames(8.0, bpm, sr) as usize;
    let mut bounce = Vec::with_capacity(total);
    while bounce.len() < total {
        let frames = (total - bounce.len()).min(block.len());
        engine.process(&mut block[..frames]);
        bounce.extend_from_slice(&block[..frames]);
    }

    let peak = bounce.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    let rms = (bounce.iter().map(|&s| s as f64 * s as f64).sum::<f64>() / bounce.len() as f64)
        .sqrt();
    println!("bounced {} frames", bounce.len());
    println!("peak {peak:.3}, rms {rms:.3}");

    handle.shutdown();
    handle.collect_garbage();
}
