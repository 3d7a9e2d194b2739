use crate::dsp::envelope::follow;
use crate::dsp::utils::{db_to_gain, gain_to_db, DETECTOR_EPS};
use crate::dsp::{ChannelState, SampleStage};
use crate::macro_controller::CoefficientBundle;

/// Wideband de-esser keyed from the band above a fixed one-pole split.
///
/// The high band is `sample - lowpass(sample)`. When its envelope exceeds the
/// threshold, the whole sample is attenuated by the overshoot, capped at the
/// bundle's maximum reduction. Below threshold the sample passes untouched; there
/// is no gain smoothing, reduction drops to zero as soon as the envelope does.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeEsser;

impl DeEsser {
    /// Reduction in dB (>= 0) for a high-band envelope.
    #[inline]
    pub fn reduction_db(envelope: f32, coeffs: &CoefficientBundle) -> f32 {
        let over = gain_to_db(envelope) - coeffs.de_esser_threshold_db;
        if over <= 0.0 {
            0.0
        } else {
            over.clamp(0.0, coeffs.de_esser_max_reduction_db)
        }
    }
}

impl SampleStage for DeEsser {
    #[inline]
    fn apply(&self, state: &mut ChannelState, coeffs: &CoefficientBundle, sample: f32) -> f32 {
        let c = coeffs.de_esser_lowpass_coeff;
        state.de_esser_low = c * state.de_esser_low + (1.0 - c) * sample;

        let high = sample - state.de_esser_low;
        state.de_esser_envelope = follow(
            state.de_esser_envelope,
            high.abs() + DETECTOR_EPS,
            coeffs.de_esser_attack_coeff,
            coeffs.de_esser_release_coeff,
        );

        let reduction_db = Self::reduction_db(state.de_esser_envelope, coeffs);
        if reduction_db <= 0.0 {
            return sample;
        }
        sample * db_to_gain(-reduction_db)
    }
}
