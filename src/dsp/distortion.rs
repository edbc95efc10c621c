#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Distortion / Waveshaping
========================

Each sample is pushed through a transfer function after pre-gain:

    shaped = f(drive * x)

HARD   clamp(drive*x, -1, +1). Squared-off peaks, buzzy odd harmonics.

SOFT   y = dx - (dx)^3 / 3. The cubic soft clip: linear at small levels,
       progressively compressing toward the knee. Unbounded past |dx| = 1,
       so it is meant for moderate drive.

TANH   y = tanh(drive*x). Smooth saturation that approaches +/-1
       asymptotically; the warmest of the three.

After shaping, dividing by the drive (when above unity) gives rough makeup
so cranking the drive changes the character more than the level. Dry/wet
blends linearly:

    out = x + (shaped - x) * mix        mix in [0, 1]
*/

/// Transfer-curve selector.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistortionMode {
    Hard,
    Soft,
    Tanh,
}

/// Shape a single sample, including drive makeup.
#[inline]
pub fn shape(sample: f32, mode: DistortionMode, drive: f32) -> f32 {
    let x = sample * drive;
    let shaped = match mode {
        DistortionMode::Hard => x.clamp(-1.0, 1.0),
        DistortionMode::Soft => x - x * x * x / 3.0,
        DistortionMode::Tanh => x.tanh(),
    };
    if drive > 1.0 {
        shaped / drive
    } else {
        shaped
    }
}

/// Shape a block in place with a dry/wet blend.
pub fn process_buffer(buffer: &mut [f32], mode: DistortionMode, drive: f32, mix: f32) {
    let mix = mix.clamp(0.0, 1.0);
    for sample in buffer.iter_mut() {
        let dry = *sample;
        let wet = shape(dry, mode, drive);
        *sample = dry + (wet - dry) * mix;
    }
}
