use crate::dsp::delay::DelayLine;
use crate::dsp::distortion::{self, DistortionMode};
use crate::dsp::ladder::LadderFilter;
use crate::dsp::mix::apply_gain;
use crate::graph::RenderCtx;

/// Most plugins a single chain holds.
pub const MAX_PLUGINS: usize = 8;

/// Tag identifying a plugin's kind. Both copies of a track's chain must
/// agree on the tag sequence slot-for-slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginKind {
    Ladder,
    Gain,
    Distortion,
    Gate,
    Delay,
}

/// Parameter selector for [`PluginState::set_param`]. Selectors that do not
/// apply to a plugin's kind are ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PluginParam {
    /// Ladder cutoff in Hz.
    Cutoff,
    /// Ladder resonance.
    Resonance,
    /// Ladder or distortion input drive.
    Drive,
    /// Gain level.
    Level,
    /// Distortion or delay wet mix.
    Mix,
    /// Delay time in samples.
    DelayTime,
    /// Delay feedback.
    Feedback,
    /// Gate open (nonzero) or closed (zero).
    Open,
}

/// A delay effect: line plus its block-rate parameters.
///
/// The line is allocated once, on the control thread, when the effect is
/// built; `delay_samples` may move freely below the line length.
#[derive(Debug, Clone)]
pub struct DelayFx {
    line: DelayLine,
    delay_samples: usize,
    feedback: f32,
    mix: f32,
}

impl DelayFx {
    pub fn new(buffer_len: usize, delay_samples: usize, feedback: f32, mix: f32) -> Self {
        debug_assert!(
            delay_samples < buffer_len,
            "delay {delay_samples} must be shorter than its buffer {buffer_len}"
        );
        Self {
            line: DelayLine::new(buffer_len),
            delay_samples: delay_samples.min(buffer_len.saturating_sub(1)),
            feedback: feedback.clamp(0.0, 0.95),
            mix: mix.clamp(0.0, 1.0),
        }
    }

    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }

    pub fn set_delay_samples(&mut self, delay_samples: usize) {
        self.delay_samples = delay_samples.min(self.line.len() - 1);
    }

    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(0.0, 0.95);
    }

    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.0, 1.0);
    }

    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            let dry = *sample;
            let delayed = self.line.tick(dry, self.delay_samples, self.feedback);
            *sample = dry * (1.0 - self.mix) + delayed * self.mix;
        }
    }
}

/// A plugin's complete identity: kind-specific parameters and DSP state in
/// one tagged value.
///
/// Built on the control thread (this is where any buffer is allocated),
/// carried into the engine inside an op, executed by the audio thread, and
/// finally shipped back over the trash ring to be dropped on the control
/// thread once both chain copies have let go of it.
#[derive(Debug)]
pub enum PluginState {
    Ladder(LadderFilter),
    Gain { level: f32 },
    Distortion { mode: DistortionMode, drive: f32, mix: f32 },
    Gate { open: bool },
    Delay(DelayFx),
}

impl PluginState {
    pub fn ladder(cutoff_hz: f32) -> Self {
        PluginState::Ladder(LadderFilter::new(cutoff_hz))
    }

    pub fn gain(level: f32) -> Self {
        PluginState::Gain { level }
    }

    pub fn distortion(mode: DistortionMode, drive: f32, mix: f32) -> Self {
        PluginState::Distortion {
            mode,
            drive: drive.max(0.0),
            mix: mix.clamp(0.0, 1.0),
        }
    }

    /// A gate starts open (pass-through).
    pub fn gate() -> Self {
        PluginState::Gate { open: true }
    }

    pub fn delay(buffer_len: usize, delay_samples: usize, feedback: f32, mix: f32) -> Self {
        PluginState::Delay(DelayFx::new(buffer_len, delay_samples, feedback, mix))
    }

    pub fn kind(&self) -> PluginKind {
        match self {
            PluginState::Ladder(_) => PluginKind::Ladder,
            PluginState::Gain { .. } => PluginKind::Gain,
            PluginState::Distortion { .. } => PluginKind::Distortion,
            PluginState::Gate { .. } => PluginKind::Gate,
            PluginState::Delay(_) => PluginKind::Delay,
        }
    }

    /// True when the plugin blocks its input entirely (closed gate); the
    /// chain zeroes the block and skips the upstream pull.
    pub fn mutes_input(&self) -> bool {
        matches!(self, PluginState::Gate { open: false })
    }

    /// Transform one block in place.
    pub fn process(&mut self, ctx: &RenderCtx, out: &mut [f32]) {
        match self {
            PluginState::Ladder(filter) => filter.render(out, ctx.sample_rate),
            PluginState::Gain { level } => apply_gain(out, *level),
            PluginState::Distortion { mode, drive, mix } => {
                distortion::process_buffer(out, *mode, *drive, *mix)
            }
            // An open gate passes through; a closed one never gets here.
            PluginState::Gate { .. } => {}
            PluginState::Delay(delay) => delay.render(out),
        }
    }

    /// Apply a parameter change at a block boundary. Selectors for another
    /// kind are ignored.
    pub fn set_param(&mut self, param: PluginParam, value: f32) {
        match (self, param) {
            (PluginState::Ladder(f), PluginParam::Cutoff) => f.set_cutoff(value),
            (PluginState::Ladder(f), PluginParam::Resonance) => f.set_resonance(value),
            (PluginState::Ladder(f), PluginParam::Drive) => f.set_drive(value),
            (PluginState::Gain { level }, PluginParam::Level) => *level = value,
            (PluginState::Distortion { drive, .. }, PluginParam::Drive) => {
                *drive = value.max(0.0)
            }
            (PluginState::Distortion { mix, .. }, PluginParam::Mix) => {
                *mix = value.clamp(0.0, 1.0)
            }
            (PluginState::Gate { open }, PluginParam::Open) => *open = value != 0.0,
            (PluginState::Delay(d), PluginParam::DelayTime) => {
                d.set_delay_samples(value.max(0.0) as usize)
            }
            (PluginState::Delay(d), PluginParam::Feedback) => d.set_feedback(value),
            (PluginState::Delay(d), PluginParam::Mix) => d.set_mix(value),
            _ => {}
        }
    }
}
