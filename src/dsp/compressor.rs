//! Opto-style Compressor (Leveler)
//!
//! # Perceptual Contract
//! - **Target Source**: Any single track (vocals, bass, buses).
//! - **Intended Effect**: Smooth leveling driven by one macro control; more
//!   compression lowers the threshold, raises the ratio, speeds up attack and
//!   slows down release, the way an optical cell behaves when pushed.
//! - **Failure Modes**:
//!   - Pumping on dense material at high amounts (release up to 600 ms).
//! - **Will Not Do**:
//!   - Look-ahead or brickwall limiting.
//!   - Soft knee or makeup gain.
//!   - Stereo linking (each channel detects on its own).
//!
//! # Detector
//! Feed-forward, log domain: peak magnitude (plus [`DETECTOR_EPS`]) drives an
//! asymmetric one-pole envelope, the envelope is converted to dB and compared with
//! the threshold. Gain reduction is `over * (1 - 1/ratio)`, capped at
//! [`MAX_REDUCTION_DB`].

use crate::dsp::envelope::follow;
use crate::dsp::utils::{db_to_gain, gain_to_db, DETECTOR_EPS};
use crate::dsp::{ChannelState, SampleStage};
use crate::macro_controller::CoefficientBundle;

/// Hard ceiling on gain reduction regardless of ratio and threshold.
pub const MAX_REDUCTION_DB: f32 = 24.0;

#[derive(Clone, Copy, Debug, Default)]
pub struct Compressor;

impl Compressor {
    /// Gain reduction in dB (>= 0) for a detector envelope.
    #[inline]
    pub fn reduction_db(envelope: f32, coeffs: &CoefficientBundle) -> f32 {
        let over_db = gain_to_db(envelope) - coeffs.threshold_db;
        if over_db > 0.0 {
            let slope = 1.0 - 1.0 / coeffs.ratio.max(1.0);
            (over_db * slope).clamp(0.0, MAX_REDUCTION_DB)
        } else {
            0.0
        }
    }
}

impl SampleStage for Compressor {
    #[inline]
    fn apply(&self, state: &mut ChannelState, coeffs: &CoefficientBundle, sample: f32) -> f32 {
        let magnitude = sample.abs() + DETECTOR_EPS;
        state.envelope = follow(
            state.envelope,
            magnitude,
            coeffs.attack_coeff,
            coeffs.release_coeff,
        );

        let reduction_db = Self::reduction_db(state.envelope, coeffs);
        sample * db_to_gain(-reduction_db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macro_controller::{derive_coefficients, ParameterSnapshot};

    fn coeffs(amount: f32, sr: f32) -> CoefficientBundle {
        derive_coefficients(&ParameterSnapshot {
            gain_db: 0.0,
            compression_amount: amount,
            de_esser_enabled: false,
            sample_rate: sr,
        })
    }

    #[test]
    fn test_constant_input_settles() {
        let c = coeffs(0.5, 44100.0);
        let mut state = ChannelState::default();

        let mut out = 0.0;
        for _ in 0..10_000 {
            out = Compressor.apply(&mut state, &c, 0.5);
        }

        assert!((state.envelope - 0.5).abs() < 1e-4);
        let level_db = gain_to_db(state.envelope);
        assert!((level_db + 6.02).abs() < 0.01);
        let reduction = Compressor::reduction_db(state.envelope, &c);
        assert!((reduction - 13.18).abs() < 0.01);
        assert!((out - 0.1097).abs() < 1e-3);
    }

    #[test]
    fn test_below_threshold_is_unity() {
        let c = coeffs(0.0, 48000.0);
        let mut state = ChannelState::default();

        // -40 dBFS never crosses a -10 dB threshold.
        for i in 0..4800 {
            let x = if i % 2 == 0 { 0.01 } else { -0.01 };
            assert_eq!(Compressor.apply(&mut state, &c, x), x);
        }
    }

    #[test]
    fn test_zero_input_stays_zero() {
        let c = coeffs(0.0, 48000.0);
        let mut state = ChannelState {
            envelope: 0.9,
            ..ChannelState::default()
        };

        for _ in 0..48_000 {
            assert_eq!(Compressor.apply(&mut state, &c, 0.0), 0.0);
        }
        // Envelope decays toward the epsilon floor.
        assert!(state.envelope < 1e-3);
        assert!(state.envelope >= DETECTOR_EPS * 0.5);
    }

    #[test]
    fn test_reduction_ceiling() {
        let mut c = coeffs(1.0, 48000.0);
        c.ratio = 1000.0;
        c.threshold_db = -60.0;

        assert_eq!(Compressor::reduction_db(1.0, &c), MAX_REDUCTION_DB);
        assert_eq!(Compressor::reduction_db(8.0, &c), MAX_REDUCTION_DB);
    }

    #[test]
    fn test_ratio_below_one_is_clamped() {
        let mut c = coeffs(0.5, 48000.0);
        c.ratio = 0.5;
        // slope = 1 - 1/max(1, 0.5) = 0, so no reduction.
        assert_eq!(Compressor::reduction_db(1.0, &c), 0.0);
    }

    #[test]
    fn test_reduction_monotonic_in_level() {
        let c = coeffs(0.7, 48000.0);
        let mut prev = 0.0;
        let mut level = 0.01;
        for _ in 0..12 {
            let r = Compressor::reduction_db(level, &c);
            assert!(r >= prev);
            assert!(r <= MAX_REDUCTION_DB);
            prev = r;
            level *= 2.0;
        }
        assert!(prev > 0.0);
    }
}
