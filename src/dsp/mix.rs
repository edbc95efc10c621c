//! Gain and accumulation helpers for the pull traversal.
//!
//! Mixers follow one pattern: pull each input into an arena temporary, then
//! accumulate it into the output with a weight. These free functions are
//! that pattern's inner loops.

/// Multiply a block by a constant gain.
#[inline]
pub fn apply_gain(buffer: &mut [f32], gain: f32) {
    for sample in buffer.iter_mut() {
        *sample *= gain;
    }
}

/// Accumulate `src` into `out` with a weight.
#[inline]
pub fn mix_into(out: &mut [f32], src: &[f32], gain: f32) {
    debug_assert_eq!(out.len(), src.len());
    for (o, &s) in out.iter_mut().zip(src) {
        *o += s * gain;
    }
}
