//! The realtime driver and its control-side handle.
//!
//! [`engine_pair`] builds the two halves at once: the [`AudioEngine`] moves
//! onto the audio thread and renders blocks; the [`EngineHandle`] stays
//! with the UI and feeds it notes, ops, and parameter snapshots. Everything
//! between them is a wait-free ring or an atomic.

pub mod ops;

pub use ops::{EngineOp, EngineStatus, NoteMessage};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::graph::{AudioNode, RenderCtx};
use crate::rt::{ring, BlockArena, Consumer, ParamSnapshot, Producer};
use crate::sequencing::{Frame, NoteEvent, NoteRecord};
use crate::synth::SynthParams;
use crate::timeline::{PluginState, Timeline, MAX_TRACKS};

/// Note ring capacity; live playing bursts stay well below this.
const NOTE_RING_CAP: usize = 256;
/// Op ring capacity.
const OP_RING_CAP: usize = 64;
/// Trash ring capacity. Sized so a full timeline teardown fits.
const TRASH_RING_CAP: usize = MAX_TRACKS * crate::timeline::MAX_PLUGINS;
/// Status ring capacity; the UI drains it every tick and stale entries are
/// simply superseded.
const STATUS_RING_CAP: usize = 128;
/// Scheduler events honored per track per block.
const MAX_BLOCK_EVENTS: usize = 64;

/// Stream-wide constants, read once at stream open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: u32,
    pub bpm: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            bpm: 120.0,
        }
    }
}

struct SharedParams([ParamSnapshot<SynthParams>; MAX_TRACKS]);

/// Build a connected engine/handle pair. All allocation for the session's
/// cross-thread plumbing happens here.
pub fn engine_pair(config: EngineConfig) -> (AudioEngine, EngineHandle) {
    assert!(config.sample_rate > 0, "sample rate must be positive");
    assert!(config.bpm > 0.0, "tempo must be positive");

    let (note_tx, note_rx) = ring(NOTE_RING_CAP);
    let (op_tx, op_rx) = ring(OP_RING_CAP);
    let (trash_tx, trash_rx) = ring(TRASH_RING_CAP);
    let (status_tx, status_rx) = ring(STATUS_RING_CAP);
    let params = Arc::new(SharedParams(std::array::from_fn(|_| {
        ParamSnapshot::new(SynthParams::default())
    })));
    let shutdown = Arc::new(AtomicBool::new(false));

    let engine = AudioEngine {
        sample_rate: config.sample_rate as f32,
        bpm: config.bpm,
        arena: BlockArena::new(),
        timeline: Timeline::new(config.sample_rate as f32),
        note_rx,
        op_rx,
        trash_tx,
        status_tx,
        params: Arc::clone(&params),
        shutdown: Arc::clone(&shutdown),
        playhead: 0,
        playing: false,
        recording: None,
        live_track: 0,
        held_starts: [None; 128],
    };
    let handle = EngineHandle {
        note_tx,
        op_tx,
        trash_rx,
        status_rx,
        params,
        shutdown,
        sample_rate: config.sample_rate,
    };
    (engine, handle)
}

/*
Per-Block Driver
================

One `process` call renders one block. In order:

  1. bail to silence if shutdown was signaled
  2. reset the scratch arena
  3. drain the note ring into the live track's synth (and, when recording,
     into the armed track's note list)
  4. drain the op ring - transport, track, and topology changes
  5. copy each live track's parameter snapshot into its synth
  6. pull the timeline root into the output block
  7. if playing, schedule each track's notes over
     [playhead, playhead + block) and advance the playhead
  8. publish a status record for the UI

Steps 3-7 run entirely on the audio thread with no allocation, no locks,
and no unbounded loops: ring drains are bounded by ring capacity, and the
graph walk is bounded by the fixed topology.
*/

/// The audio-thread half: owns the timeline and renders blocks.
pub struct AudioEngine {
    sample_rate: f32,
    bpm: f32,
    arena: BlockArena,
    timeline: Timeline,

    note_rx: Consumer<NoteMessage>,
    op_rx: Consumer<EngineOp>,
    trash_tx: Producer<Box<PluginState>>,
    status_tx: Producer<EngineStatus>,
    params: Arc<SharedParams>,
    shutdown: Arc<AtomicBool>,

    playhead: Frame,
    playing: bool,
    recording: Option<usize>,
    live_track: usize,
    /// Remembered note-on frames while recording, indexed by note number.
    held_starts: [Option<Frame>; 128],
}

impl AudioEngine {
    /// Render one mono block. The host (or harness) fans it out to the
    /// device's channels.
    pub fn process(&mut self, out: &mut [f32]) {
        if self.shutdown.load(Ordering::Acquire) {
            out.fill(0.0);
            return;
        }

        self.arena.begin_block();
        self.drain_notes();
        self.drain_ops();
        self.apply_param_snapshots();

        {
            let ctx = RenderCtx::new(self.sample_rate, self.bpm, &self.arena);
            self.timeline.process(&ctx, out);
        }

        if self.playing {
            self.schedule_block(out.len() as Frame);
            self.playhead += out.len() as Frame;
        }

        let peak = out.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        let _ = self.status_tx.push(EngineStatus {
            playhead: self.playhead,
            playing: self.playing,
            recording: self.recording,
            live_track: self.live_track,
            track_count: self.timeline.track_count(),
            peak,
        });
    }

    pub fn playhead(&self) -> Frame {
        self.playhead
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Direct timeline access for offline use (authoring note lists before
    /// the stream starts, tests, bounces).
    pub fn timeline_mut(&mut self) -> &mut Timeline {
        &mut self.timeline
    }

    fn drain_notes(&mut self) {
        while let Some(msg) = self.note_rx.pop() {
            match msg {
                NoteMessage::On { note } => {
                    if let Some(track) = self.timeline.track_mut(self.live_track) {
                        track.note_on(note);
                    }
                    if self.recording.is_some() {
                        self.held_starts[note as usize] = Some(self.playhead);
                    }
                }
                NoteMessage::Off { note } => {
                    if let Some(track) = self.timeline.track_mut(self.live_track) {
                        track.note_off(note);
                    }
                    if let Some(armed) = self.recording {
                        if let Some(start) = self.held_starts[note as usize].take() {
                            if let Some(track) = self.timeline.track_mut(armed) {
                                track.notes_mut().insert(NoteRecord {
                                    start,
                                    end: self.playhead,
                                    note,
                                });
                            }
                        }
                    }
                }
            }
        }
    }

    fn drain_ops(&mut self) {
        while let Some(op) = self.op_rx.pop() {
            match op {
                EngineOp::TogglePlay => {
                    self.quiesce();
                    self.playing = !self.playing;
                }
                EngineOp::Reset => {
                    self.quiesce();
                    self.playhead = 0;
                }
                EngineOp::Seek(frame) => {
                    self.quiesce();
                    self.playhead = frame;
                }
                EngineOp::ToggleRecord { track } => {
                    if self.recording == Some(track) {
                        self.recording = None;
                        self.held_starts = [None; 128];
                    } else if track < self.timeline.track_count() {
                        self.recording = Some(track);
                    }
                }
                EngineOp::SelectTrack { track } => {
                    if track < self.timeline.track_count() {
                        self.live_track = track;
                    }
                }
                EngineOp::AddTrack => {
                    // A full timeline rejects the op; the sound continues.
                    let _ = self.timeline.add_track();
                }
                EngineOp::RemoveTrack { track } => {
                    let trash = &mut self.trash_tx;
                    let _ = self
                        .timeline
                        .remove_track(track, &mut |state| drop(trash.push(state)));
                    if self.recording == Some(track) {
                        self.recording = None;
                    } else if let Some(armed) = self.recording {
                        if armed > track {
                            self.recording = Some(armed - 1);
                        }
                    }
                    if self.live_track >= track && self.live_track > 0 {
                        self.live_track -= 1;
                    }
                }
                EngineOp::AddPlugin { track, state } => {
                    match self.timeline.track_mut(track) {
                        Some(t) => {
                            if let Err(rejected) = t.add_plugin(state) {
                                let _ = self.trash_tx.push(rejected);
                            }
                        }
                        None => {
                            let _ = self.trash_tx.push(state);
                        }
                    }
                }
                EngineOp::RemovePlugin { track, slot } => {
                    if let Some(t) = self.timeline.track_mut(track) {
                        if let Some(state) = t.remove_plugin(slot) {
                            let _ = self.trash_tx.push(state);
                        }
                    }
                }
                EngineOp::SetPluginParam {
                    track,
                    slot,
                    param,
                    value,
                } => {
                    if let Some(t) = self.timeline.track_mut(track) {
                        t.set_plugin_param(slot, param, value);
                    }
                }
            }
        }
    }

    fn apply_param_snapshots(&mut self) {
        let params = &self.params;
        for (index, track) in self.timeline.tracks_mut().enumerate() {
            track.synth_mut().set_params(params.0[index].read());
        }
    }

    fn schedule_block(&mut self, block_len: Frame) {
        let start = self.playhead;
        let end = start + block_len;
        let mut events = [NoteEvent::On(0); MAX_BLOCK_EVENTS];

        for track in self.timeline.tracks_mut() {
            let count = track.notes().collect_block(start, end, &mut events);
            for event in &events[..count] {
                match *event {
                    NoteEvent::On(note) => track.note_on(note),
                    NoteEvent::Off(note) => track.note_off(note),
                }
            }
        }
    }

    /// Release every sounding note on every live track and forget pending
    /// record starts.
    fn quiesce(&mut self) {
        for track in self.timeline.tracks_mut() {
            track.synth_mut().all_notes_off();
        }
        self.held_starts = [None; 128];
    }
}

/// The control-thread half: pushes notes and ops, publishes parameters,
/// drains status and trash.
pub struct EngineHandle {
    note_tx: Producer<NoteMessage>,
    op_tx: Producer<EngineOp>,
    trash_rx: Consumer<Box<PluginState>>,
    status_rx: Consumer<EngineStatus>,
    params: Arc<SharedParams>,
    shutdown: Arc<AtomicBool>,
    sample_rate: u32,
}

impl EngineHandle {
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Push a live note-on. Returns false when the ring is full; the caller
    /// decides whether to retry or drop.
    pub fn note_on(&mut self, note: u8) -> bool {
        self.note_tx.push(NoteMessage::On { note }).is_ok()
    }

    pub fn note_off(&mut self, note: u8) -> bool {
        self.note_tx.push(NoteMessage::Off { note }).is_ok()
    }

    /// Push a control op; hands the op back when the ring is full.
    pub fn send(&mut self, op: EngineOp) -> Result<(), EngineOp> {
        self.op_tx.push(op).map_err(|full| full.into_inner())
    }

    pub fn toggle_play(&mut self) -> bool {
        self.send(EngineOp::TogglePlay).is_ok()
    }

    pub fn reset(&mut self) -> bool {
        self.send(EngineOp::Reset).is_ok()
    }

    pub fn seek(&mut self, frame: Frame) -> bool {
        self.send(EngineOp::Seek(frame)).is_ok()
    }

    pub fn toggle_record(&mut self, track: usize) -> bool {
        self.send(EngineOp::ToggleRecord { track }).is_ok()
    }

    pub fn select_track(&mut self, track: usize) -> bool {
        self.send(EngineOp::SelectTrack { track }).is_ok()
    }

    pub fn add_track(&mut self) -> bool {
        self.send(EngineOp::AddTrack).is_ok()
    }

    pub fn remove_track(&mut self, track: usize) -> bool {
        self.send(EngineOp::RemoveTrack { track }).is_ok()
    }

    /// Install a plugin. The state (and any buffer inside it) is allocated
    /// here, on the control thread; the driver only links it in.
    pub fn add_plugin(&mut self, track: usize, state: PluginState) -> bool {
        self.send(EngineOp::AddPlugin {
            track,
            state: Box::new(state),
        })
        .is_ok()
    }

    pub fn remove_plugin(&mut self, track: usize, slot: usize) -> bool {
        self.send(EngineOp::RemovePlugin { track, slot }).is_ok()
    }

    pub fn set_plugin_param(
        &mut self,
        track: usize,
        slot: usize,
        param: crate::timeline::PluginParam,
        value: f32,
    ) -> bool {
        self.send(EngineOp::SetPluginParam {
            track,
            slot,
            param,
            value,
        })
        .is_ok()
    }

    /// Publish a track's synth parameters; the driver copies them at its
    /// next block.
    pub fn publish_params(&self, track: usize, params: SynthParams) {
        if track < MAX_TRACKS {
            self.params.0[track].publish(params);
        }
    }

    /// Latest driver status, draining anything older.
    pub fn latest_status(&mut self) -> Option<EngineStatus> {
        let mut latest = None;
        while let Some(status) = self.status_rx.pop() {
            latest = Some(status);
        }
        latest
    }

    /// Drop plugin state the driver has retired. Call periodically from the
    /// UI loop; returns how many states were freed.
    pub fn collect_garbage(&mut self) -> usize {
        let mut freed = 0;
        while let Some(state) = self.trash_rx.pop() {
            drop(state);
            freed += 1;
        }
        freed
    }

    /// Signal the driver to go silent. Takes effect at its next block.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }
}
