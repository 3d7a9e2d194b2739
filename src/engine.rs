//! Block-level orchestration: owns the per-channel state and runs the sample
//! pipeline over host buffers in place.
//!
//! The coefficient bundle is derived once per block from the parameter snapshot;
//! parameter changes inside a block are not seen until the next one.

use crate::dsp::{ChannelPipeline, ChannelState, Compressor, DeEsser};
use crate::macro_controller::{derive_coefficients, CoefficientBundle, ParameterSnapshot};

/// Gain reduction left on the detectors at the end of a block, for metering.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BlockReport {
    /// Largest compressor reduction over the active channels (dB).
    pub compressor_reduction_db: f32,
    /// Largest de-esser reduction over the active channels (dB), 0 when disabled.
    pub de_esser_reduction_db: f32,
}

pub struct LevelerEngine {
    sample_rate: f32,
    states: Vec<ChannelState>,
    pipeline: ChannelPipeline,
}

impl Default for LevelerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelerEngine {
    /// An unconfigured engine. `configure` must run before the first block.
    pub fn new() -> Self {
        Self {
            sample_rate: 0.0,
            states: Vec::new(),
            pipeline: ChannelPipeline::new(),
        }
    }

    /// Start a new processing session. Allocates, so call it off the audio thread.
    pub fn configure(&mut self, sample_rate: f32, max_channels: usize) {
        assert!(
            sample_rate > 0.0 && sample_rate.is_finite(),
            "sample rate must be positive and finite, got {sample_rate}"
        );
        self.sample_rate = sample_rate;
        self.ensure_channels(max_channels);
        self.reset();

        log::debug!(
            "leveler configured: {} Hz, {} channel states",
            sample_rate,
            self.states.len()
        );
    }

    /// Grow the state storage to at least `channels`. Existing states are kept,
    /// new ones start at zero, and the storage never shrinks.
    pub fn ensure_channels(&mut self, channels: usize) {
        if self.states.len() < channels {
            self.states.resize(channels, ChannelState::default());
        }
    }

    /// Zero every channel's detector memory.
    pub fn reset(&mut self) {
        for state in &mut self.states {
            state.reset();
        }
    }

    pub fn is_configured(&self) -> bool {
        self.sample_rate > 0.0
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn channel_capacity(&self) -> usize {
        self.states.len()
    }

    pub fn channel_state(&self, channel: usize) -> Option<&ChannelState> {
        self.states.get(channel)
    }

    /// Process one block in place. Channels at index `active_inputs` and above
    /// are output-only and get silenced.
    pub fn process_block(
        &mut self,
        channels: &mut [&mut [f32]],
        active_inputs: usize,
        snapshot: &ParameterSnapshot,
    ) -> BlockReport {
        let active = active_inputs.min(channels.len());
        let coeffs = self.begin_block(active, snapshot);

        for extra in channels.iter_mut().skip(active) {
            extra.fill(0.0);
        }

        for (samples, state) in channels.iter_mut().take(active).zip(self.states.iter_mut()) {
            self.pipeline.process_slice(state, &coeffs, samples);
        }

        self.report(&coeffs, active)
    }

    /// Wide-format variant: samples are narrowed to `f32` for the pipeline and
    /// widened back, so the result carries single precision.
    pub fn process_block_f64(
        &mut self,
        channels: &mut [&mut [f64]],
        active_inputs: usize,
        snapshot: &ParameterSnapshot,
    ) -> BlockReport {
        let active = active_inputs.min(channels.len());
        let coeffs = self.begin_block(active, snapshot);

        for extra in channels.iter_mut().skip(active) {
            extra.fill(0.0);
        }

        for (samples, state) in channels.iter_mut().take(active).zip(self.states.iter_mut()) {
            for sample in samples.iter_mut() {
                *sample = self.pipeline.process_sample(state, &coeffs, *sample as f32) as f64;
            }
        }

        self.report(&coeffs, active)
    }

    fn begin_block(&self, active: usize, snapshot: &ParameterSnapshot) -> CoefficientBundle {
        assert!(self.is_configured(), "process_block called before configure");
        assert!(
            active <= self.states.len(),
            "{active} active channels but only {} configured",
            self.states.len()
        );
        debug_assert_eq!(snapshot.sample_rate, self.sample_rate);

        derive_coefficients(snapshot)
    }

    fn report(&self, coeffs: &CoefficientBundle, active: usize) -> BlockReport {
        let mut report = BlockReport::default();
        for state in &self.states[..active] {
            report.compressor_reduction_db = report
                .compressor_reduction_db
                .max(Compressor::reduction_db(state.envelope, coeffs));
            if coeffs.de_esser_enabled {
                report.de_esser_reduction_db = report
                    .de_esser_reduction_db
                    .max(DeEsser::reduction_db(state.de_esser_envelope, coeffs));
            }
        }
        report
    }
}
