use std::f32::consts::PI;

/// Added to detector magnitudes so the dB conversion never sees zero.
pub const DETECTOR_EPS: f32 = 1.0e-6;

/// Floor returned by `gain_to_db` for silent or non-positive gains.
pub const MIN_DB: f32 = -100.0;

#[inline(always)]
pub fn lerp(x: f32, a: f32, b: f32) -> f32 {
    a + x * (b - a)
}

#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    (10.0f32).powf(db / 20.0)
}

#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    if gain > 0.0 {
        (20.0 * gain.log10()).max(MIN_DB)
    } else {
        MIN_DB
    }
}

/// One-pole smoothing coefficient for a time constant in milliseconds.
/// Closer to 1.0 means slower smoothing.
#[inline]
pub fn time_constant_coeff(ms: f32, sample_rate: f32) -> f32 {
    (-1.0 / (0.001 * ms * sample_rate)).exp()
}

/// One-pole low-pass coefficient for a corner frequency in Hz.
#[inline]
pub fn one_pole_lowpass_coeff(cutoff_hz: f32, sample_rate: f32) -> f32 {
    (-2.0 * PI * cutoff_hz / sample_rate).exp()
}
