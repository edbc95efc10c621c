//! End-to-end scenarios through the public engine surface.
//!
//! These exercise the whole stack - rings, driver, timeline, synth, chains -
//! the way the realtime callback does, asserting on rendered samples.

use groovekit::dsp::EnvelopeStage;
use groovekit::engine::{engine_pair, EngineConfig, EngineStatus};
use groovekit::graph::{AudioNode, RenderCtx};
use groovekit::rt::BlockArena;
use groovekit::sequencing::NoteRecord;
use groovekit::synth::SynthParams;
use groovekit::timeline::{PluginKind, PluginState, Timeline};

fn pump(engine: &mut groovekit::AudioEngine, blocks: usize, block_len: usize) -> Vec<f32> {
    let mut out = vec![0.0; block_len];
    let mut all = Vec::with_capacity(blocks * block_len);
    for _ in 0..blocks {
        engine.process(&mut out);
        all.extend_from_slice(&out);
    }
    all
}

#[test]
fn silent_by_default() {
    // Two live tracks, no notes, no held keys: one second of exact zeros.
    let mut timeline = Timeline::new(48_000.0);
    timeline.add_track().unwrap();
    timeline.add_track().unwrap();

    let mut arena = BlockArena::new();
    let mut out = vec![0.0f32; 512];
    let mut rendered = 0;
    while rendered < 48_000 {
        arena.begin_block();
        let ctx = RenderCtx::new(48_000.0, 120.0, &arena);
        timeline.process(&ctx, &mut out);
        assert!(
            out.iter().all(|&s| s == 0.0),
            "silence must be bit-exact zero at frame {rendered}"
        );
        rendered += out.len();
    }
}

#[test]
fn chain_swap_under_load_keeps_audio_continuous() {
    let (mut engine, mut handle) = engine_pair(EngineConfig::default());
    handle.add_track();
    pump(&mut engine, 1, 512);

    // A steady tone, settled past the attack.
    handle.note_on(57);
    let before = pump(&mut engine, 8, 512);
    assert!(before.iter().any(|&s| s != 0.0), "tone should be sounding");

    // Toggle the filter in; render straight across the swap.
    handle.add_plugin(0, PluginState::ladder(1_000.0));
    let across = pump(&mut engine, 8, 512);
    handle.remove_plugin(0, 0);
    let after = pump(&mut engine, 8, 512);

    for (i, s) in before
        .iter()
        .chain(across.iter())
        .chain(after.iter())
        .enumerate()
    {
        assert!(s.is_finite(), "sample {i} not finite across swaps");
    }

    // The block boundary at each swap stays within a per-sample continuity
    // bound: filter state is preserved, nothing restarts.
    // A freshly inserted filter starts from rest, so the boundary step is
    // bounded by the signal scale - what must never happen is a
    // full-scale pop or a restarted voice.
    let jump_in = (across[0] - before[before.len() - 1]).abs();
    let jump_out = (after[0] - across[across.len() - 1]).abs();
    assert!(jump_in < 1.0, "swap-in discontinuity {jump_in}");
    assert!(jump_out < 1.0, "swap-out discontinuity {jump_out}");

    pump(&mut engine, 1, 512);
    assert_eq!(handle.collect_garbage(), 1, "removed filter state freed once");
}

#[test]
fn scheduler_fires_once_per_boundary_under_the_driver() {
    let (mut engine, mut handle) = engine_pair(EngineConfig::default());
    handle.add_track();
    pump(&mut engine, 1, 256); // track op lands; transport still stopped at 0

    engine
        .timeline_mut()
        .track_mut(0)
        .unwrap()
        .notes_mut()
        .insert(NoteRecord {
            start: 1000,
            end: 2000,
            note: 60,
        });
    handle.toggle_play();

    // Track voice activity per block; the note must start sounding in the
    // block covering frame 1000 and release in the one covering 2000.
    let mut first_active_block = None;
    let mut first_release_block = None;
    for block in 0..16 {
        pump(&mut engine, 1, 256);
        let synth = engine.timeline().track(0).unwrap().synth();
        let any_on = synth
            .voices()
            .iter()
            .any(|v| v.note().is_some() && v.envelope().stage() != EnvelopeStage::Release);
        let any_release = synth
            .voices()
            .iter()
            .any(|v| v.envelope().stage() == EnvelopeStage::Release);
        if any_on && first_active_block.is_none() {
            first_active_block = Some(block);
        }
        if any_release && first_release_block.is_none() {
            first_release_block = Some(block);
        }
    }

    assert_eq!(
        first_active_block,
        Some(3),
        "frame 1000 lies in block 3 ([768, 1024))"
    );
    assert_eq!(
        first_release_block,
        Some(7),
        "frame 2000 lies in block 7 ([1792, 2048))"
    );
}

#[test]
fn voice_stealing_scenario() {
    use groovekit::synth::PolySynth;

    let mut synth = PolySynth::new(48_000.0, 2);
    let initial_ptr = synth.next_idx();

    synth.note_on(60);
    synth.note_on(62);
    synth.note_on(64);

    // Both voices sounding, and exactly one steal advanced the pointer.
    assert_eq!(synth.active_voices(), 2);
    assert_eq!(synth.next_idx(), (initial_ptr + 1) % 2);

    synth.note_off(60);
    let held: Vec<u8> = synth.voices().iter().filter_map(|v| v.note()).collect();
    assert!(
        held.iter().all(|&n| n >= 60),
        "remaining notes are the later-assigned ones: {held:?}"
    );
    assert!(held.contains(&62) && held.contains(&64));
}

#[test]
fn record_then_playback_roundtrip() {
    let (mut engine, mut handle) = engine_pair(EngineConfig::default());
    handle.add_track();
    handle.toggle_record(0);
    handle.toggle_play();
    // A short release so quiesced voices free up within one block.
    let mut params = SynthParams::default();
    params.release = 0.005;
    handle.publish_params(0, params);
    pump(&mut engine, 1, 512); // ops land; playhead -> 512

    handle.note_on(65);
    pump(&mut engine, 2, 512); // on at 512; playhead -> 1536
    handle.note_off(65);
    pump(&mut engine, 1, 512); // off at 1536

    let records = engine.timeline().track(0).unwrap().notes().records().to_vec();
    assert_eq!(
        records,
        vec![NoteRecord {
            start: 512,
            end: 1536,
            note: 65
        }]
    );

    // Disarm, rewind, and let the recorded take play itself back.
    handle.toggle_record(0);
    handle.reset();
    pump(&mut engine, 1, 512); // block [0, 512): nothing yet
    assert_eq!(
        engine.timeline().track(0).unwrap().synth().active_voices(),
        0,
        "note starts exactly at its recorded frame"
    );
    pump(&mut engine, 1, 512); // block [512, 1024): note-on fires
    assert_eq!(
        engine.timeline().track(0).unwrap().synth().active_voices(),
        1
    );
}

#[test]
fn params_published_by_the_handle_reach_the_synth() {
    let (mut engine, mut handle) = engine_pair(EngineConfig::default());
    handle.add_track();
    pump(&mut engine, 1, 128);

    let mut params = SynthParams::default();
    params.cutoff_hz = 321.0;
    params.level = 0.9;
    handle.publish_params(0, params);
    pump(&mut engine, 1, 128);

    let applied = engine.timeline().track(0).unwrap().synth().params();
    assert_eq!(applied.cutoff_hz, 321.0);
    assert_eq!(applied.level, 0.9);
}

#[test]
fn capacity_rejections_leave_the_engine_sounding() {
    let (mut engine, mut handle) = engine_pair(EngineConfig::default());
    handle.add_track();
    pump(&mut engine, 1, 256);
    handle.note_on(60);

    // Overfill the chain: the ninth plugin is rejected and trashed.
    for _ in 0..9 {
        handle.add_plugin(0, PluginState::gain(1.0));
    }
    let out = pump(&mut engine, 4, 256);

    assert_eq!(
        engine.timeline().track(0).unwrap().plugin_kinds().len(),
        8,
        "chain capped at its capacity"
    );
    assert!(engine.timeline().track(0).unwrap().chains_mirrored());
    assert!(out.iter().any(|&s| s != 0.0), "audio keeps flowing");
    assert_eq!(handle.collect_garbage(), 1, "the rejected state was freed");

    // Same story for tracks.
    for _ in 0..10 {
        handle.add_track();
    }
    pump(&mut engine, 1, 256);
    assert_eq!(engine.timeline().track_count(), 8);
}

#[test]
fn status_stream_tracks_the_transport() {
    let (mut engine, mut handle) = engine_pair(EngineConfig::default());
    handle.add_track();
    handle.toggle_play();
    pump(&mut engine, 4, 256);

    let status: EngineStatus = handle.latest_status().unwrap();
    assert!(status.playing);
    assert_eq!(status.playhead, 4 * 256);
    assert_eq!(status.track_count, 1);

    handle.toggle_play();
    pump(&mut engine, 1, 256);
    let status = handle.latest_status().unwrap();
    assert!(!status.playing);
    assert_eq!(status.playhead, 4 * 256, "paused playhead holds still");
}

#[test]
fn gate_toggle_mutes_and_unmutes() {
    let (mut engine, mut handle) = engine_pair(EngineConfig::default());
    handle.add_track();
    pump(&mut engine, 1, 256);
    handle.note_on(60);
    handle.add_plugin(0, PluginState::gate());
    pump(&mut engine, 1, 256);

    let open = pump(&mut engine, 2, 256);
    assert!(open.iter().any(|&s| s != 0.0));

    handle.set_plugin_param(
        0,
        0,
        groovekit::timeline::PluginParam::Open,
        0.0,
    );
    pump(&mut engine, 1, 256);
    let muted = pump(&mut engine, 2, 256);
    assert!(muted.iter().all(|&s| s == 0.0), "closed gate silences");
    assert_eq!(
        engine.timeline().track(0).unwrap().plugin_kinds(),
        vec![PluginKind::Gate]
    );
}
