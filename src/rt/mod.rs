//! Wait-free primitives connecting the control thread to the audio thread.
//!
//! Exactly two threads touch these: the control/UI thread and the realtime
//! audio thread. Nothing here blocks, allocates after construction, or makes
//! a system call on the audio path.

/// Per-callback bump scratch for graph temporaries.
pub mod arena;
/// Double-buffered publication of plain-old-data parameter records.
pub mod snapshot;
/// Bounded single-producer/single-consumer ring queue.
pub mod spsc;

pub use arena::BlockArena;
pub use snapshot::ParamSnapshot;
pub use spsc::{ring, Consumer, Producer};
