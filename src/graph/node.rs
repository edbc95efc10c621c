use crate::rt::BlockArena;

/// Context passed down the graph during one block of rendering.
///
/// Carries the stream-wide constants and the scratch arena that nodes rent
/// temporary buffers from. Arena buffers are valid only until the driver
/// resets it at the top of the next callback.
pub struct RenderCtx<'a> {
    /// Audio sample rate in Hz. Read once at stream open; never changes
    /// during a session.
    pub sample_rate: f32,
    /// Session tempo in beats per minute.
    pub bpm: f32,
    /// Per-callback scratch for intermediate blocks.
    pub arena: &'a BlockArena,
}

impl<'a> RenderCtx<'a> {
    pub fn new(sample_rate: f32, bpm: f32, arena: &'a BlockArena) -> Self {
        Self {
            sample_rate,
            bpm,
            arena,
        }
    }
}

/// A node in the pull graph.
///
/// `process` writes exactly `out.len()` samples. A node with upstream
/// sources rents a temporary from `ctx.arena`, pulls each source into it,
/// and produces into `out`. Dispatch happens once per block per node, never
/// per sample.
pub trait AudioNode: Send {
    fn process(&mut self, ctx: &RenderCtx, out: &mut [f32]);
}
