//! Asymmetric envelope follower shared by the compressor and de-esser detectors.
//!
//! A one-pole smoother `y = c*y + (1-c)*x` whose coefficient switches between an
//! attack value (signal rising above the envelope) and a release value
//! (signal at or below it). Coefficients come from
//! [`time_constant_coeff`](crate::dsp::utils::time_constant_coeff).
//!
//! The follower itself holds no state: the envelope lives in
//! [`ChannelState`](crate::dsp::ChannelState) so each channel keeps its own memory.

/// Advance an envelope by one sample toward `magnitude`.
#[inline(always)]
pub fn follow(envelope: f32, magnitude: f32, attack_coeff: f32, release_coeff: f32) -> f32 {
    let coeff = if magnitude > envelope {
        attack_coeff
    } else {
        release_coeff
    };
    coeff * envelope + (1.0 - coeff) * magnitude
}
