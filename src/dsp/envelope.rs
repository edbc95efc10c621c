/*
Level
  1.0 |     /\________
      |    /  \       \
  0.7 |   /    \_______\___
      |  /              \  \
  0.0 +-/----------------\--\-> Time
      Attack Decay Sustain Release

Attack:   0 -> 1        at 1/(attack*sr) per sample
Decay:    1 -> sustain  at (1-sustain)/(decay*sr) per sample
Sustain:  hold
Release:  current -> 0  at sustain/(release*sr) per sample

Each call returns the level BEFORE advancing, so sample 0 of an attack is
exactly 0 and the level reaches 1.0 exactly attack*sr samples in. When a
ramp crosses its target the level clamps to the target and the stage
advances.

Idle is the resting state: output is zero and the owner can skip all
upstream work for the block. Note-off moves any non-idle stage to Release;
note-on retriggers Attack from the current level, whatever the stage.
*/

/// Envelope stage. `Idle` means silent and skippable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeStage {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

/// ADSR envelope generator. Times are in seconds, sustain is a level in
/// [0, 1]. Parameters may change at block boundaries.
#[derive(Debug, Clone)]
pub struct AdsrEnvelope {
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,

    stage: EnvelopeStage,
    value: f32,
    sample_rate: f32,
}

impl AdsrEnvelope {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            attack: 0.01,
            decay: 0.1,
            sustain: 0.7,
            release: 0.3,
            stage: EnvelopeStage::Idle,
            value: 0.0,
            sample_rate,
        }
    }

    pub fn set_params(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.attack = attack.max(0.0);
        self.decay = decay.max(0.0);
        self.sustain = sustain.clamp(0.0, 1.0);
        self.release = release.max(0.0);
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn is_idle(&self) -> bool {
        self.stage == EnvelopeStage::Idle
    }

    /// Retrigger from the current level.
    pub fn note_on(&mut self) {
        self.stage = EnvelopeStage::Attack;
    }

    pub fn note_off(&mut self) {
        if self.stage != EnvelopeStage::Idle {
            self.stage = EnvelopeStage::Release;
        }
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeStage::Idle;
        self.value = 0.0;
    }

    /// Current level, then advance one sample.
    pub fn next_sample(&mut self) -> f32 {
        let out = self.value;

        match self.stage {
            EnvelopeStage::Idle => {
                self.value = 0.0;
                return 0.0;
            }
            EnvelopeStage::Attack => {
                let samples = self.attack * self.sample_rate;
                if samples <= 1.0 {
                    self.value = 1.0;
                    self.stage = EnvelopeStage::Decay;
                } else {
                    self.value += 1.0 / samples;
                    if self.value >= 1.0 {
                        self.value = 1.0;
                        self.stage = EnvelopeStage::Decay;
                    }
                }
            }
            EnvelopeStage::Decay => {
                let samples = self.decay * self.sample_rate;
                if samples <= 1.0 {
                    self.value = self.sustain;
                    self.stage = EnvelopeStage::Sustain;
                } else {
                    self.value -= (1.0 - self.sustain) / samples;
                    if self.value <= self.sustain {
                        self.value = self.sustain;
                        self.stage = EnvelopeStage::Sustain;
                    }
                }
            }
            EnvelopeStage::Sustain => {
                self.value = self.sustain;
            }
            EnvelopeStage::Release => {
                let samples = self.release * self.sample_rate;
                // A zero sustain or zero release makes the slope degenerate;
                // fall straight to silence.
                let rate = if samples <= 1.0 || self.sustain <= 0.0 {
                    1.0
                } else {
                    self.sustain / samples
                };
                self.value -= rate;
                if self.value <= 0.0 {
                    self.value = 0.0;
                    self.stage = EnvelopeStage::Idle;
                }
            }
        }

        out
    }

    /// Multiply a block by the envelope, advancing one level per sample.
    pub fn apply(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample *= self.next_sample();
        }
    }

    /// Write the raw envelope into a block.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }
}
