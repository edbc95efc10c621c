//! groovekit - a small realtime DAW core.
//!
//! A pull-based audio graph driven by the host callback, a polyphonic
//! subtractive synthesizer, per-track effect chains that can be reshaped
//! without interrupting audio, and the lock-free plumbing that connects a
//! control/UI thread to the realtime audio thread.
//!
//! The crate splits into layers, leaves first:
//!
//! - [`rt`] - wait-free cross-thread primitives (SPSC ring, parameter
//!   snapshot, per-callback scratch arena).
//! - [`dsp`] - allocation-free signal primitives (oscillator, ladder filter,
//!   envelope, delay, distortion).
//! - [`graph`] - the node contract shared by everything that renders blocks.
//! - [`synth`] - voices and the polyphonic synth built from the primitives.
//! - [`timeline`] - tracks, effect chains with atomic topology swaps, and
//!   the master mix.
//! - [`sequencing`] - frame-indexed note records and per-block scheduling.
//! - [`engine`] - the realtime driver and its control-side handle.

pub mod dsp;
pub mod engine;
pub mod error;
pub mod graph;
pub mod rt;
pub mod sequencing;
pub mod synth;
pub mod timeline;

pub use engine::{AudioEngine, EngineConfig, EngineHandle};
pub use error::EngineError;

/// Largest block length a single `process` call will see. The harness chunks
/// whatever the host asks for into pieces of at most this size.
pub const MAX_BLOCK_SIZE: usize = 512;

/// Voices per track synth.
pub const NUM_VOICES: usize = 8;
