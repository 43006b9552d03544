//! Recording session: start/stop lifecycle around one shared aggregator.
//!
//! The capture side holds a [`SharedAggregator`] obtained from [`Session::sink`]
//! and feeds it readings; the control side starts and stops the session.
//! Stopping finalizes the aggregator and analyses the melody.

use crate::aggregator::{AggregatorConfig, SharedAggregator};
use crate::analysis::{analyze, Analysis, HarmonySettings};
use crate::config::Config;
use crate::sampler::PitchReading;

pub struct Session {
    aggregator: SharedAggregator,
    settings: HarmonySettings,
    recording: bool,
    last: Option<Analysis>,
}

impl Session {
    pub fn new(aggregator: AggregatorConfig, settings: HarmonySettings) -> Self {
        Self {
            aggregator: SharedAggregator::new(aggregator),
            settings,
            recording: false,
            last: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.aggregator(), config.harmony())
    }

    /// Handle for the capture side
    pub fn sink(&self) -> SharedAggregator {
        self.aggregator.clone()
    }

    /// Feed a reading directly. Ignored unless recording.
    pub fn push(&self, reading: PitchReading) {
        if self.recording {
            self.aggregator.add(reading.frequency, reading.amplitude);
        }
    }

    pub fn settings(&self) -> &HarmonySettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: HarmonySettings) {
        self.settings = settings;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Result of the most recent `stop()`, cleared by `start()`.
    pub fn last_analysis(&self) -> Option<&Analysis> {
        self.last.as_ref()
    }

    /// Begin a new recording. Anything the sink collected while idle is dropped.
    pub fn start(&mut self) {
        if self.recording {
            return;
        }
        let stale = self.aggregator.finalize();
        if !stale.is_empty() {
            log::debug!(target: "session", "discarded {} notes captured while idle", stale.len());
        }
        self.last = None;
        self.recording = true;
        log::info!(target: "session", "recording started");
    }

    /// Finish the recording and analyse it. None if not recording.
    pub fn stop(&mut self) -> Option<&Analysis> {
        if !self.recording {
            return None;
        }
        self.recording = false;
        let notes = self.aggregator.finalize();
        log::info!(target: "session", "recording stopped with {} notes", notes.len());
        self.last = Some(analyze(notes, &self.settings));
        self.last.as_ref()
    }

    /// Stop when recording, start otherwise.
    pub fn toggle(&mut self) -> Option<&Analysis> {
        if self.recording {
            self.stop()
        } else {
            self.start();
            None
        }
    }

    /// Abandon the recording without analysing it.
    pub fn cancel(&mut self) {
        if self.recording {
            let dropped = self.aggregator.finalize();
            self.recording = false;
            log::info!(target: "session", "recording cancelled, {} notes dropped", dropped.len());
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AggregatorConfig::default(), HarmonySettings::default())
    }
}
