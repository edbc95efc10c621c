/*
Transistor-Ladder Low-Pass Filter
=================================

The classic Moog lowpass: four one-pole stages in series, each built around
a transistor pair whose tanh transfer curve saturates musically, with
negative feedback from the last stage back to the input for resonance.

This is the D'Angelo/Valimaki discretization: each stage keeps its voltage
V, its last derivative dV (for trapezoidal integration), and the
precomputed tanh of V (reused by the next stage and the next sample).

Vocabulary
----------

  VT          Transistor thermal voltage. Sets the scale at which the tanh
              nonlinearity bites; 0.312 here, matching the doubled-voltage
              convention of the reference derivation.

  cutoff      Corner frequency in Hz. Signal above it falls off at about
              24 dB/octave (6 dB per stage).

  resonance   Feedback gain from stage 4 to the input. 0 = none; around 4
              the filter self-oscillates.

  drive       Input gain into the first tanh. Past unity it pushes the
              ladder into saturation.

  g           Per-stage integrator gain for the current cutoff:

                x = pi * cutoff / sample_rate
                g = 4 * pi * VT * cutoff * (1 - x) / (1 + x)

              The (1-x)/(1+x) factor corrects the frequency warping of the
              discrete integrator as the cutoff approaches Nyquist.

Per sample, with input u and stages i = 0..3:

  dV0 = -g * (tanh((drive*u + resonance*V3) / 2VT) + tanh(V0 / 2VT))
  dVi =  g * (tanh(V[i-1] / 2VT) - tanh(Vi / 2VT))        for i >= 1
  Vi += (dVi + dVi_prev) / (2 * sample_rate)              (trapezoid)

Output is V3. Coefficients are computed once per block; cutoff, resonance
and drive therefore move at block boundaries only. Stage state persists for
the life of the filter, including across effect-chain topology swaps.
*/

use std::f32::consts::PI;

/// Transistor thermal voltage of the ladder model.
pub const THERMAL_VOLTAGE: f32 = 0.312;

/// Four-stage ladder low-pass filter with drive and resonance.
#[derive(Debug, Clone)]
pub struct LadderFilter {
    v: [f32; 4],
    dv: [f32; 4],
    tv: [f32; 4],

    cutoff_hz: f32,
    resonance: f32,
    drive: f32,
}

impl LadderFilter {
    pub fn new(cutoff_hz: f32) -> Self {
        Self {
            v: [0.0; 4],
            dv: [0.0; 4],
            tv: [0.0; 4],
            cutoff_hz,
            resonance: 0.1,
            drive: 1.0,
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    pub fn drive(&self) -> f32 {
        self.drive
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz.max(1.0);
    }

    /// Resonance feedback gain; self-oscillates near 4.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance.clamp(0.0, 4.0);
    }

    pub fn set_drive(&mut self, drive: f32) {
        self.drive = drive.max(0.0);
    }

    /// Zero all stage state.
    pub fn reset(&mut self) {
        self.v = [0.0; 4];
        self.dv = [0.0; 4];
        self.tv = [0.0; 4];
    }

    /// Filter one block in place.
    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        if sample_rate <= 0.0 {
            return;
        }

        // Keep the cutoff safely below Nyquist so g stays positive.
        let cutoff = self.cutoff_hz.min(sample_rate * 0.49);
        let x = PI * cutoff / sample_rate;
        let g = 4.0 * PI * THERMAL_VOLTAGE * cutoff * (1.0 - x) / (1.0 + x);

        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, g, sample_rate);
        }
    }

    #[inline]
    fn next_sample(&mut self, input: f32, g: f32, sample_rate: f32) -> f32 {
        let half_step = 1.0 / (2.0 * sample_rate);
        let two_vt = 2.0 * THERMAL_VOLTAGE;

        let dv0 = -g
            * (((self.drive * input + self.resonance * self.v[3]) / two_vt).tanh() + self.tv[0]);
        self.v[0] += (dv0 + self.dv[0]) * half_step;
        self.dv[0] = dv0;
        self.tv[0] = (self.v[0] / two_vt).tanh();

        for i in 1..4 {
            let dvi = g * (self.tv[i - 1] - self.tv[i]);
            self.v[i] += (dvi + self.dv[i]) * half_step;
            self.dv[i] = dvi;
            self.tv[i] = (self.v[i] / two_vt).tanh();
        }

        self.v[3]
    }
}
