//! Key detection and harmonization over one finalized melody.

use serde::Serialize;

use crate::harmonize::{harmonize_measures, HarmonizedMeasure};
use crate::key_detect::find_key;
use crate::types::{Chord, Key, Note, TimeSignature};

/// Tempo and meter for harmonization, plus an optional forced key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonySettings {
    pub bpm: f64,
    pub time_signature: TimeSignature,
    /// Harmonize in this key instead of detecting one
    pub key_override: Option<Key>,
}

impl Default for HarmonySettings {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            time_signature: TimeSignature::default(),
            key_override: None,
        }
    }
}

/// Result of analysing one recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub notes: Vec<Note>,
    pub key: Option<Key>,
    pub measures: Vec<HarmonizedMeasure>,
}

impl Analysis {
    /// The chord progression, one chord per populated measure.
    pub fn progression(&self) -> Vec<Chord> {
        self.measures.iter().filter_map(|m| m.chord).collect()
    }

    /// Nothing was sung
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// Detect the key (unless overridden) and harmonize in it.
pub fn analyze(notes: Vec<Note>, settings: &HarmonySettings) -> Analysis {
    let key = match settings.key_override {
        Some(key) if !notes.is_empty() => Some(key),
        Some(_) => None,
        None => find_key(&notes),
    };

    let measures = match key {
        Some(key) => harmonize_measures(&notes, key, settings.bpm, settings.time_signature),
        None => Vec::new(),
    };

    log::info!(
        target: "analysis",
        "{} notes, key {}, {} measures",
        notes.len(),
        key.map(|k| k.to_string()).unwrap_or_else(|| "none".into()),
        measures.len()
    );

    Analysis {
        notes,
        key,
        measures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChordQuality, PitchClass};

    fn melody() -> Vec<Note> {
        use PitchClass::*;
        vec![
            Note::new(C, 1.0),
            Note::new(G, 1.0),
            Note::new(A, 1.0),
            Note::new(F, 1.0),
        ]
    }

    #[test]
    fn empty_recording_has_no_key_or_chords() {
        let analysis = analyze(Vec::new(), &HarmonySettings::default());
        assert!(analysis.is_empty());
        assert_eq!(analysis.key, None);
        assert!(analysis.progression().is_empty());
    }

    #[test]
    fn key_override_skips_detection() {
        let settings = HarmonySettings {
            key_override: Some(Key::minor(PitchClass::A)),
            ..HarmonySettings::default()
        };
        let analysis = analyze(melody(), &settings);
        assert_eq!(analysis.key, Some(Key::minor(PitchClass::A)));
        assert_eq!(analysis.measures.len(), 2);
    }

    #[test]
    fn key_override_on_empty_recording_is_still_none() {
        let settings = HarmonySettings {
            key_override: Some(Key::major(PitchClass::D)),
            ..HarmonySettings::default()
        };
        assert_eq!(analyze(Vec::new(), &settings).key, None);
    }

    #[test]
    fn progression_uses_detected_key() {
        let analysis = analyze(melody(), &HarmonySettings::default());
        let key = analysis.key.unwrap();
        for chord in analysis.progression() {
            assert!(key.degree_of(&chord).is_some());
        }
        assert_eq!(analysis.progression().len(), 2);
        assert!(analysis
            .progression()
            .iter()
            .all(|c| c.quality != ChordQuality::Diminished));
    }
}
