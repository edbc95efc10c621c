#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Absolute sample index since time zero.
pub type Frame = u64;

/// One note on the timeline: sounding over `[start, end)` frames.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteRecord {
    pub start: Frame,
    pub end: Frame,
    /// MIDI note number, 0..=127; 69 is A440.
    pub note: u8,
}

/// Scheduler output: what to tell a synth during one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEvent {
    On(u8),
    Off(u8),
}

/// Convert a beat position to frames:
/// `frame = round(beats * 60 * sample_rate / tempo)`.
pub fn beats_to_frames(beats: f64, bpm: f64, sample_rate: f64) -> Frame {
    debug_assert!(bpm > 0.0 && sample_rate > 0.0);
    (beats * 60.0 * sample_rate / bpm).round() as Frame
}
