pub mod compressor;
pub mod de_esser;
pub mod envelope;
pub mod utils;

pub use compressor::Compressor;
pub use de_esser::DeEsser;

use crate::macro_controller::CoefficientBundle;

/// Per-channel detector memory. Zero on creation; lives as long as the session.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChannelState {
    /// Compressor detector envelope (linear magnitude).
    pub envelope: f32,
    /// De-esser detector envelope on the high band.
    pub de_esser_envelope: f32,
    /// Running one-pole low-pass output; the high band is the input minus this.
    pub de_esser_low: f32,
}

impl ChannelState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A processing stage that transforms one sample given the channel's state.
pub trait SampleStage {
    fn apply(&self, state: &mut ChannelState, coeffs: &CoefficientBundle, sample: f32) -> f32;
}

/// Gain -> compressor -> optional de-esser, for one channel at a time.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChannelPipeline {
    compressor: Compressor,
    de_esser: DeEsser,
}

impl ChannelPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn process_sample(
        &self,
        state: &mut ChannelState,
        coeffs: &CoefficientBundle,
        sample: f32,
    ) -> f32 {
        let mut out = sample * coeffs.input_gain_linear;
        out = self.compressor.apply(state, coeffs, out);

        if coeffs.de_esser_enabled {
            out = self.de_esser.apply(state, coeffs, out);
        }

        out
    }

    pub fn process_slice(
        &self,
        state: &mut ChannelState,
        coeffs: &CoefficientBundle,
        samples: &mut [f32],
    ) {
        for sample in samples.iter_mut() {
            *sample = self.process_sample(state, coeffs, *sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macro_controller::{derive_coefficients, ParameterSnapshot};

    #[test]
    fn test_gain_applied_before_compressor() {
        let mut snapshot = ParameterSnapshot::new(48000.0);
        snapshot.gain_db = 12.0;
        snapshot.compression_amount = 0.0;
        let coeffs = derive_coefficients(&snapshot);

        let pipeline = ChannelPipeline::new();
        let mut state = ChannelState::default();
        let mut out = 0.0;
        for _ in 0..48_000 {
            out = pipeline.process_sample(&mut state, &coeffs, 0.25);
        }

        // 0.25 * 4 ~= 1.0 (0 dB) drives the detector, 10 dB over a -10 dB threshold.
        assert!((state.envelope - 0.25 * coeffs.input_gain_linear).abs() < 1e-3);
        let expected = 0.25 * coeffs.input_gain_linear
            * crate::dsp::utils::db_to_gain(-Compressor::reduction_db(state.envelope, &coeffs));
        assert!((out - expected).abs() < 1e-6);
        assert!(out < 0.25 * coeffs.input_gain_linear);
    }

    #[test]
    fn test_disabled_de_esser_leaves_its_state_alone() {
        let coeffs = derive_coefficients(&ParameterSnapshot::new(44100.0));
        let pipeline = ChannelPipeline::new();
        let mut state = ChannelState::default();

        let mut samples = [0.9f32, -0.8, 0.7, -0.6];
        pipeline.process_slice(&mut state, &coeffs, &mut samples);

        assert!(state.envelope > 0.0);
        assert_eq!(state.de_esser_low, 0.0);
        assert_eq!(state.de_esser_envelope, 0.0);
    }

    #[test]
    fn test_reset_zeroes_state() {
        let mut state = ChannelState {
            envelope: 0.5,
            de_esser_envelope: 0.1,
            de_esser_low: -0.2,
        };
        state.reset();
        assert_eq!(state, ChannelState::default());
    }
}
