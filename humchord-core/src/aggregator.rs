//! Note aggregation: collapses a fixed-rate stream of pitch readings into notes.
//!
//! Each reading covers one `sample_interval`. Consecutive readings with the
//! same pitch class extend the open note; a different pitch class starts a new
//! one; an out-of-range frequency or a quiet reading closes the open note
//! without starting another. Bad readings are dropped, never reported.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::types::{Note, PitchClass};

/// Aggregator constants. See `config.toml` for the shipped values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatorConfig {
    /// Seconds covered by one reading
    pub sample_interval: f64,
    /// Lowest admissible frequency in Hz (inclusive)
    pub min_frequency: f32,
    /// Highest admissible frequency in Hz (inclusive)
    pub max_frequency: f32,
    /// Readings must be strictly louder than this
    pub amplitude_gate: f32,
    /// Frequency of A4 (MIDI 69)
    pub reference_a4: f32,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            sample_interval: 0.1,
            min_frequency: 20.0,
            max_frequency: 4200.0,
            amplitude_gate: 0.01,
            reference_a4: 440.0,
        }
    }
}

/// Nearest pitch class for a frequency: `round(12 * log2(f / a4) + 69) mod 12`.
/// Returns None when the result is not a finite number.
pub fn pitch_class_for(frequency: f32, reference_a4: f32) -> Option<PitchClass> {
    let midi = 12.0 * (frequency as f64 / reference_a4 as f64).log2() + 69.0;
    if !midi.is_finite() {
        return None;
    }
    Some(PitchClass::from_index(midi.round() as i32))
}

/// Single-owner aggregator. Wrap in [`SharedAggregator`] when the capture
/// callback and the control path live on different threads.
#[derive(Debug, Clone)]
pub struct NoteAggregator {
    config: AggregatorConfig,
    current: Option<Note>,
    collected: Vec<Note>,
}

impl NoteAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self {
            config,
            current: None,
            collected: Vec::new(),
        }
    }

    /// Feed one reading.
    pub fn add(&mut self, frequency: f32, amplitude: f32) {
        let in_range =
            frequency >= self.config.min_frequency && frequency <= self.config.max_frequency;
        let audible = amplitude > self.config.amplitude_gate;
        if !in_range || !audible {
            self.close_current();
            return;
        }

        let Some(pitch_class) = pitch_class_for(frequency, self.config.reference_a4) else {
            return;
        };

        let dt = self.config.sample_interval;
        if let Some(note) = self.current.as_mut() {
            if note.pitch_class == pitch_class {
                note.duration += dt;
                return;
            }
        }
        self.close_current();
        self.current = Some(Note::new(pitch_class, dt));
    }

    /// Close any open note, return everything collected and reset for reuse.
    pub fn finalize(&mut self) -> Vec<Note> {
        self.close_current();
        let notes = std::mem::take(&mut self.collected);
        log::debug!(target: "aggregator", "finalized {} notes", notes.len());
        notes
    }

    /// No open note and nothing collected
    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.collected.is_empty()
    }

    fn close_current(&mut self) {
        if let Some(note) = self.current.take() {
            log::debug!(
                target: "aggregator",
                "note {} held {:.2}s",
                note.pitch_class,
                note.duration
            );
            self.collected.push(note);
        }
    }
}

impl Default for NoteAggregator {
    fn default() -> Self {
        Self::new(AggregatorConfig::default())
    }
}

/// Cloneable handle serializing `add()` and `finalize()` across threads.
///
/// Every call holds the lock only for O(1) work, so it is safe to call `add()`
/// from a capture callback while the control thread finalizes.
#[derive(Debug, Clone)]
pub struct SharedAggregator {
    inner: Arc<Mutex<NoteAggregator>>,
}

impl SharedAggregator {
    pub fn new(config: AggregatorConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(NoteAggregator::new(config))),
        }
    }

    pub fn add(&self, frequency: f32, amplitude: f32) {
        self.lock().add(frequency, amplitude);
    }

    pub fn finalize(&self) -> Vec<Note> {
        self.lock().finalize()
    }

    pub fn is_idle(&self) -> bool {
        self.lock().is_idle()
    }

    // A panic mid-call cannot leave the aggregator half-updated, so a
    // poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, NoteAggregator> {
        self.inner.lock().unwrap_or_else(|poisoned| {
            log::warn!(target: "aggregator", "recovering poisoned aggregator lock");
            poisoned.into_inner()
        })
    }
}

impl Default for SharedAggregator {
    fn default() -> Self {
        Self::new(AggregatorConfig::default())
    }
}
