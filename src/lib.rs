//! OptoLeveler: input gain, opto-style compression and an optional de-esser,
//! driven by two knobs and a toggle.
//!
//! The DSP core (`macro_controller`, `dsp`, `engine`) knows nothing about the host.
//! This file wires it to nih-plug: parameter declarations, session lifecycle and
//! the per-block `process` call.

mod debug;
pub mod dsp;
pub mod engine;
pub mod macro_controller;
pub mod meters;

use crate::engine::LevelerEngine;
use crate::macro_controller::{
    ParameterSnapshot, COMPRESSION_DEFAULT, COMPRESSION_MAX, COMPRESSION_MIN, GAIN_DEFAULT_DB,
    GAIN_MAX_DB, GAIN_MIN_DB,
};
use crate::meters::Meters;
use nih_plug::formatters;
use nih_plug::prelude::*;
use std::sync::Arc;

// -----------------------------------------------------------------------------
// PARAMETERS
// -----------------------------------------------------------------------------
// Ids are persisted by hosts; do not rename.
#[derive(Params)]
pub struct LevelerParams {
    #[id = "inputGain"]
    pub input_gain: FloatParam,

    #[id = "compression"]
    pub compression: FloatParam,

    #[id = "deEsser"]
    pub de_esser: BoolParam,
}

impl Default for LevelerParams {
    fn default() -> Self {
        Self {
            input_gain: FloatParam::new(
                "Gain",
                GAIN_DEFAULT_DB,
                FloatRange::Linear {
                    min: GAIN_MIN_DB,
                    max: GAIN_MAX_DB,
                },
            )
            .with_value_to_string(Arc::new(format_db))
            .with_string_to_value(Arc::new(parse_db)),

            compression: FloatParam::new(
                "Comp",
                COMPRESSION_DEFAULT,
                FloatRange::Linear {
                    min: COMPRESSION_MIN,
                    max: COMPRESSION_MAX,
                },
            )
            .with_value_to_string(Arc::new(format_percent))
            .with_string_to_value(formatters::s2v_f32_percentage()),

            de_esser: BoolParam::new("De-esser", false),
        }
    }
}

impl LevelerParams {
    /// Read the current values once. No smoothing: the block sees one value.
    pub fn snapshot(&self, sample_rate: f32) -> ParameterSnapshot {
        ParameterSnapshot {
            gain_db: self.input_gain.value(),
            compression_amount: self.compression.value(),
            de_esser_enabled: self.de_esser.value(),
            sample_rate,
        }
    }
}

// Helper to format values as "50%" for the DAW display
fn format_percent(v: f32) -> String {
    format!("{:.0}%", v * 100.0)
}

// Helper to format gain in dB
fn format_db(v: f32) -> String {
    format!("{:.1} dB", v)
}

// Accepts "3.5", "3.5dB" and "3.5 dB"
fn parse_db(s: &str) -> Option<f32> {
    let s = s.trim();
    let s = s
        .strip_suffix("dB")
        .or_else(|| s.strip_suffix("db"))
        .unwrap_or(s);
    s.trim().parse().ok()
}

// -----------------------------------------------------------------------------
// PLUGIN STRUCT
// -----------------------------------------------------------------------------
struct OptoLeveler {
    params: Arc<LevelerParams>,
    engine: LevelerEngine,
    meters: Arc<Meters>,
    active_inputs: usize,
    last_snapshot: Option<ParameterSnapshot>,
}

impl Default for OptoLeveler {
    fn default() -> Self {
        Self {
            params: Arc::new(LevelerParams::default()),
            engine: LevelerEngine::new(),
            meters: Arc::new(Meters::new()),
            active_inputs: 0,
            last_snapshot: None,
        }
    }
}

impl Plugin for OptoLeveler {
    const NAME: &'static str = "OptoLeveler";
    const VENDOR: &'static str = "Andrzej Marczewski";
    const URL: &'static str = "";
    const EMAIL: &'static str = "";
    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),
            ..AudioIOLayout::const_default()
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),
            ..AudioIOLayout::const_default()
        },
    ];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;
    const SAMPLE_ACCURATE_AUTOMATION: bool = false;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn initialize(
        &mut self,
        audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        let inputs = audio_io_layout
            .main_input_channels
            .map(NonZeroU32::get)
            .unwrap_or(0) as usize;
        let outputs = audio_io_layout
            .main_output_channels
            .map(NonZeroU32::get)
            .unwrap_or(0) as usize;

        self.start_session(buffer_config.sample_rate, inputs, outputs);

        log::info!(
            "OptoLeveler initialized: {} Hz, {} in / {} out, max block {}",
            buffer_config.sample_rate,
            inputs,
            outputs,
            buffer_config.max_buffer_size
        );
        true
    }

    fn reset(&mut self) {
        self.engine.reset();
        self.meters.reset();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        self.process_channels(buffer.as_slice());
        ProcessStatus::Normal
    }
}

impl OptoLeveler {
    fn start_session(&mut self, sample_rate: f32, inputs: usize, outputs: usize) {
        self.active_inputs = inputs.min(outputs);
        self.engine.configure(sample_rate, outputs.max(inputs));
        self.meters.reset();
        self.last_snapshot = None;
    }

    fn process_channels(&mut self, channels: &mut [&mut [f32]]) {
        let snapshot = self.params.snapshot(self.engine.sample_rate());

        if self.last_snapshot != Some(snapshot) {
            crate::ol_log!(
                "parameters: gain {:.2} dB, comp {:.2}, de-esser {}",
                snapshot.gain_db,
                snapshot.compression_amount,
                snapshot.de_esser_enabled
            );
            self.last_snapshot = Some(snapshot);
        }

        let report = self
            .engine
            .process_block(channels, self.active_inputs, &snapshot);
        self.meters.publish(&report);
    }
}

impl ClapPlugin for OptoLeveler {
    const CLAP_ID: &'static str = "com.andrzej.optoleveler";
    const CLAP_DESCRIPTION: Option<&'static str> = Some("Opto-style leveler with de-esser");
    const CLAP_MANUAL_URL: Option<&'static str> = None;
    const CLAP_SUPPORT_URL: Option<&'static str> = None;
    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Compressor,
        ClapFeature::Mono,
        ClapFeature::Stereo,
    ];
}

impl Vst3Plugin for OptoLeveler {
    const VST3_CLASS_ID: [u8; 16] = *b"OptoLeveler_Amp1";
    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Dynamics];
}

nih_export_clap!(OptoLeveler);
nih_export_vst3!(OptoLeveler);
