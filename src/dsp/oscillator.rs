#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/*
Oscillator Implementation
=========================

An oscillator traces a repeating waveform - the raw material of subtractive
synthesis. Phase is stored normalized:

  phase       Position in the cycle, in [0, 1). One full cycle = 1.0.

  phase_inc   Advance per sample:  phase_inc = frequency / sample_rate.
              At 440 Hz and 48 kHz, phase advances ~0.00917 per sample and
              completes 440 cycles per second.

  wrap        When phase reaches 1.0 it wraps by subtraction. The increment
              is always below 1 for audible frequencies, so a single
              subtraction suffices; the loop form keeps the invariant even
              for pathological inputs.

Waveforms, all in [-1, +1]:

  SINE    sin(TAU * phase). Pure tone, fundamental only.

  SAW     2*phase - 1. Linear ramp, all harmonics; the classic subtractive
          starting point.

  PULSE   +1 while phase < duty, else -1. duty=0.5 gives a square; other
          duty cycles thin the pulse and shift the harmonic balance.

  SUB     Pulse-shaped, but the increment is scaled by 2^(offset/12) so the
          sub oscillator tracks the voice pitch a fixed number of semitones
          away (typically -12: one octave down).

No band-limiting: the naive shapes alias above a few kHz, which is accepted
for this synth's character.
*/

/// Waveform selector, carrying the shape parameters alongside the tag.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Sine,
    Saw,
    /// Pulse wave; `duty` in (0, 1) is the fraction of the cycle spent high.
    Pulse { duty: f32 },
    /// Pulse-shaped sub oscillator offset from the voice pitch in semitones.
    Sub { duty: f32, offset_semitones: f32 },
}

/// A single oscillator. Holds only its phase; waveform and pitch arrive per
/// block so parameter changes take effect at block boundaries.
#[derive(Debug, Clone, Default)]
pub struct Oscillator {
    phase: f32,
}

impl Oscillator {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Snap the phase back to zero. Note-on resets all of a voice's
    /// oscillators so retriggered notes start phase-coherent.
    pub fn reset_phase(&mut self) {
        self.phase = 0.0;
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Render one block at the given frequency.
    pub fn render(&mut self, out: &mut [f32], waveform: Waveform, freq: f32, sample_rate: f32) {
        if sample_rate <= 0.0 {
            out.fill(0.0);
            return;
        }

        let inc = match waveform {
            Waveform::Sub {
                offset_semitones, ..
            } => freq * (offset_semitones / 12.0).exp2() / sample_rate,
            _ => freq / sample_rate,
        };

        for sample in out.iter_mut() {
            *sample = match waveform {
                Waveform::Sine => (TAU * self.phase).sin(),
                Waveform::Saw => 2.0 * self.phase - 1.0,
                Waveform::Pulse { duty } | Waveform::Sub { duty, .. } => {
                    if self.phase < duty {
                        1.0
                    } else {
                        -1.0
                    }
                }
            };

            self.phase += inc;
            while self.phase >= 1.0 {
                self.phase -= 1.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_stays_normalized() {
        let mut osc = Oscillator::new();
        let mut buffer = [0.0; 4096];

        for &freq in &[27.5, 440.0, 8_000.0, 23_900.0] {
            osc.reset_phase();
            osc.render(&mut buffer, Waveform::Saw, freq, 48_000.0);
            assert!(
                (0.0..1.0).contains(&osc.phase()),
                "phase {} escaped [0,1) at {freq} Hz",
                osc.phase()
            );
        }
    }

    #[test]
    fn saw_matches_closed_form() {
        let sample_rate = 48_000.0;
        let freq = 440.0;
        let mut osc = Oscillator::new();
        let mut buffer = [0.0; 100];
        osc.render(&mut buffer, Waveform::Saw, freq, sample_rate);

        let mut phase = 0.0f32;
        for (i, &actual) in buffer.iter().enumerate() {
            let expected = 2.0 * phase - 1.0;
            assert!(
                (actual - expected).abs() < 1e-6,
                "sample {i}: expected {expected}, got {actual}"
            );
            phase += freq / sample_rate;
            while phase >= 1.0 {
                phase -= 1.0;
            }
        }
    }

    #[test]
    fn sine_starts_at_zero_phase() {
        let mut osc = Oscillator::new();
        let mut buffer = [0.0; 16];
        osc.render(&mut buffer, Waveform::Sine, 440.0, 48_000.0);
        assert!(buffer[0].abs() < 1e-6);
        // sample 12 = sin(TAU * 12 * 440 / 48000)
        let expected = (TAU * 12.0 * 440.0 / 48_000.0).sin();
        assert!((buffer[12] - expected).abs() < 1e-5);
    }

    #[test]
    fn pulse_respects_duty_cycle() {
        let mut osc = Oscillator::new();
        let mut buffer = [0.0; 1000];
        // 48 Hz at 48 kHz: exactly one cycle over the buffer.
        osc.render(&mut buffer, Waveform::Pulse { duty: 0.25 }, 48.0, 48_000.0);

        let high = buffer.iter().filter(|&&s| s > 0.0).count();
        assert!(
            (high as i64 - 250).abs() <= 1,
            "expected ~250 high samples at duty 0.25, got {high}"
        );
    }

    #[test]
    fn sub_tracks_an_octave_down() {
        let sample_rate = 48_000.0;
        let mut osc = Oscillator::new();
        let mut buffer = [0.0; 2000];
        // -12 semitones halves the increment: 48 Hz voice pitch renders a
        // 24 Hz pulse, i.e. one cycle over 2000 samples.
        osc.render(
            &mut buffer,
            Waveform::Sub {
                duty: 0.5,
                offset_semitones: -12.0,
            },
            48.0,
            sample_rate,
        );

        let high = buffer.iter().filter(|&&s| s > 0.0).count();
        assert!(
            (high as i64 - 1000).abs() <= 1,
            "expected ~1000 high samples for the halved increment, got {high}"
        );
    }

    #[test]
    fn reset_phase_restarts_the_cycle() {
        let mut osc = Oscillator::new();
        let mut buffer = [0.0; 37];
        osc.render(&mut buffer, Waveform::Saw, 440.0, 48_000.0);
        assert!(osc.phase() > 0.0);

        osc.reset_phase();
        assert_eq!(osc.phase(), 0.0);
    }
}
