#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete parameter record for a track's synth.
///
/// The control thread publishes the whole record through a
/// [`ParamSnapshot`]; the audio thread copies one consistent snapshot per
/// block. Plain old data by construction - no references, no heap.
///
/// [`ParamSnapshot`]: crate::rt::ParamSnapshot
#[repr(C)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    /// Sawtooth oscillator level into the voice mixer.
    pub saw_level: f32,
    /// Pulse oscillator level.
    pub pulse_level: f32,
    /// Sub oscillator level.
    pub sub_level: f32,
    /// Pulse duty cycle in (0, 1).
    pub pulse_duty: f32,
    /// Sub oscillator duty cycle in (0, 1).
    pub sub_duty: f32,
    /// Sub oscillator pitch offset in semitones (usually -12).
    pub sub_offset_semitones: f32,

    /// Ladder filter cutoff in Hz.
    pub cutoff_hz: f32,
    /// Ladder filter resonance, 0 to 4.
    pub resonance: f32,
    /// Ladder filter input drive.
    pub drive: f32,

    /// Envelope times in seconds, sustain as a level.
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,

    /// Synth output level after voice summation.
    pub level: f32,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            saw_level: 0.5,
            pulse_level: 0.4,
            sub_level: 0.3,
            pulse_duty: 0.5,
            sub_duty: 0.5,
            sub_offset_semitones: -12.0,
            cutoff_hz: 2_000.0,
            resonance: 0.3,
            drive: 1.0,
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.3,
            level: 0.5,
        }
    }
}
