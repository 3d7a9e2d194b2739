//! Thread-safe metering for the leveler.
//!
//! Gain reduction is published once per block from the audio thread as `f32` bits
//! in atomics, so any other thread can read it without locks.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::engine::BlockReport;

#[derive(Default)]
pub struct Meters {
    gain_reduction_db: AtomicU32,
    de_esser_reduction_db: AtomicU32,
}

impl Meters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, report: &BlockReport) {
        self.set_gain_reduction_db(report.compressor_reduction_db);
        self.set_de_esser_reduction_db(report.de_esser_reduction_db);
    }

    pub fn reset(&self) {
        self.publish(&BlockReport::default());
    }

    pub fn set_gain_reduction_db(&self, val: f32) {
        self.gain_reduction_db.store(val.to_bits(), Ordering::Relaxed);
    }

    pub fn set_de_esser_reduction_db(&self, val: f32) {
        self.de_esser_reduction_db
            .store(val.to_bits(), Ordering::Relaxed);
    }

    pub fn get_gain_reduction_db(&self) -> f32 {
        f32::from_bits(self.gain_reduction_db.load(Ordering::Relaxed))
    }

    pub fn get_de_esser_reduction_db(&self) -> f32 {
        f32::from_bits(self.de_esser_reduction_db.load(Ordering::Relaxed))
    }
}
