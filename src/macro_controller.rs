//! Macro Controller (coefficient deriver)
//!
//! Contract:
//! - Two knobs (gain, compression amount) and one toggle drive every internal coefficient
//! - Pure function of the snapshot, no state
//! - Evaluated once per block on the audio thread, never per sample
//!
//! Several curves are inverted on purpose: as the compression amount rises the
//! threshold falls, the de-esser threshold falls, attack gets faster and release
//! gets slower.

use crate::dsp::utils::{db_to_gain, lerp, one_pole_lowpass_coeff, time_constant_coeff};

// Parameter ranges and defaults (shared with the nih-plug parameter declarations).
pub const GAIN_MIN_DB: f32 = -24.0;
pub const GAIN_MAX_DB: f32 = 24.0;
pub const GAIN_DEFAULT_DB: f32 = 0.0;
pub const COMPRESSION_MIN: f32 = 0.0;
pub const COMPRESSION_MAX: f32 = 1.0;
pub const COMPRESSION_DEFAULT: f32 = 0.5;

pub const DEFAULT_SAMPLE_RATE: f32 = 44100.0;

// Curve endpoints as (amount = 0, amount = 1).
const THRESHOLD_DB: (f32, f32) = (-10.0, -35.0);
const RATIO: (f32, f32) = (2.0, 8.0);
const ATTACK_MS: (f32, f32) = (10.0, 3.0);
const RELEASE_MS: (f32, f32) = (120.0, 600.0);
const DE_ESSER_THRESHOLD_DB: (f32, f32) = (-18.0, -30.0);
const DE_ESSER_MAX_REDUCTION_DB: (f32, f32) = (6.0, 14.0);

// Fixed de-esser timing and band split.
const DE_ESSER_SPLIT_HZ: f32 = 3500.0;
const DE_ESSER_ATTACK_MS: f32 = 5.0;
const DE_ESSER_RELEASE_MS: f32 = 80.0;

/// Control values read from the parameter store once per block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterSnapshot {
    /// Input gain in dB, [-24, 24].
    pub gain_db: f32,
    /// Compression macro, [0, 1]. Not a literal ratio.
    pub compression_amount: f32,
    pub de_esser_enabled: bool,
    /// Fixed for the lifetime of a configured session.
    pub sample_rate: f32,
}

impl ParameterSnapshot {
    /// Default control values at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            gain_db: GAIN_DEFAULT_DB,
            compression_amount: COMPRESSION_DEFAULT,
            de_esser_enabled: false,
            sample_rate,
        }
    }
}

impl Default for ParameterSnapshot {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

/// Derived constants for one block. Rebuilt every block, never stored per channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoefficientBundle {
    pub input_gain_linear: f32,
    pub threshold_db: f32,
    pub ratio: f32,
    pub attack_coeff: f32,
    pub release_coeff: f32,
    pub de_esser_enabled: bool,
    pub de_esser_lowpass_coeff: f32,
    pub de_esser_attack_coeff: f32,
    pub de_esser_release_coeff: f32,
    pub de_esser_threshold_db: f32,
    pub de_esser_max_reduction_db: f32,
}

pub fn derive_coefficients(snapshot: &ParameterSnapshot) -> CoefficientBundle {
    let x = snapshot.compression_amount;
    let sr = snapshot.sample_rate;

    let attack_ms = lerp(x, ATTACK_MS.0, ATTACK_MS.1);
    let release_ms = lerp(x, RELEASE_MS.0, RELEASE_MS.1);

    CoefficientBundle {
        input_gain_linear: db_to_gain(snapshot.gain_db),
        threshold_db: lerp(x, THRESHOLD_DB.0, THRESHOLD_DB.1),
        ratio: lerp(x, RATIO.0, RATIO.1),
        attack_coeff: time_constant_coeff(attack_ms, sr),
        release_coeff: time_constant_coeff(release_ms, sr),
        de_esser_enabled: snapshot.de_esser_enabled,
        de_esser_lowpass_coeff: one_pole_lowpass_coeff(DE_ESSER_SPLIT_HZ, sr),
        de_esser_attack_coeff: time_constant_coeff(DE_ESSER_ATTACK_MS, sr),
        de_esser_release_coeff: time_constant_coeff(DE_ESSER_RELEASE_MS, sr),
        de_esser_threshold_db: lerp(x, DE_ESSER_THRESHOLD_DB.0, DE_ESSER_THRESHOLD_DB.1),
        de_esser_max_reduction_db: lerp(
            x,
            DE_ESSER_MAX_REDUCTION_DB.0,
            DE_ESSER_MAX_REDUCTION_DB.1,
        ),
    }
}
