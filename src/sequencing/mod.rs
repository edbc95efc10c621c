//! Frame-indexed note storage and per-block scheduling.
//!
//! Notes are recorded against absolute frame positions rather than musical
//! ticks, so seeking the playhead is a cheap lookup instead of a replay.
//! Beat arithmetic is available for authoring, converted once at entry.

pub mod notes;
pub mod scheduler;

pub use notes::{beats_to_frames, Frame, NoteEvent, NoteRecord};
pub use scheduler::{NoteScheduler, MAX_NOTES};
