//! Chord harmonization: diatonic triads, candidate filtering and
//! measure-by-measure progression building.

pub mod scoring;
pub mod segment;

pub use scoring::{score_chord, select_chord};
pub use segment::{measure_duration, segment};

use serde::Serialize;

use crate::types::{Chord, Key, Note, PitchClass, TimeSignature};

/// The seven triads of a key in scale-degree order.
pub fn diatonic_chords(key: Key) -> [Chord; 7] {
    let intervals = key.quality.scale_intervals();
    let qualities = key.quality.chord_qualities();
    std::array::from_fn(|i| Chord::new(key.root.transpose(intervals[i] as i32), qualities[i]))
}

/// Diatonic chords whose triad contains the note.
pub fn candidate_chords(note: &Note, key: Key) -> Vec<Chord> {
    candidate_chords_for(&[note.pitch_class], key)
}

/// Diatonic chords sharing at least one tone with `pitch_classes`.
pub fn candidate_chords_for(pitch_classes: &[PitchClass], key: Key) -> Vec<Chord> {
    diatonic_chords(key)
        .into_iter()
        .filter(|chord| pitch_classes.iter().any(|&pc| chord.contains(pc)))
        .collect()
}

/// One measure of the melody and the chord chosen for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonizedMeasure {
    pub notes: Vec<Note>,
    /// None when nothing fit and there was no earlier chord to hold
    pub chord: Option<Chord>,
}

/// Segment the melody and pick a chord per measure.
///
/// Empty for an empty melody or a non-positive tempo. A measure with no
/// diatonic candidate holds the previous chord.
pub fn harmonize_measures(
    melody: &[Note],
    key: Key,
    bpm: f64,
    time_signature: TimeSignature,
) -> Vec<HarmonizedMeasure> {
    if melody.is_empty() || !(bpm > 0.0) {
        return Vec::new();
    }

    let measures = segment(melody, measure_duration(bpm, time_signature));
    let mut out: Vec<HarmonizedMeasure> = Vec::with_capacity(measures.len());
    let mut previous: Option<Chord> = None;

    for (index, notes) in measures.into_iter().enumerate() {
        let pitch_classes: Vec<PitchClass> = notes.iter().map(|n| n.pitch_class).collect();
        let candidates = candidate_chords_for(&pitch_classes, key);

        let chord = match select_chord(&candidates, &notes, previous.as_ref(), key) {
            Some(chord) => {
                log::debug!(
                    target: "harmonize",
                    "measure {}: {} of {} candidates",
                    index + 1,
                    chord,
                    candidates.len()
                );
                Some(chord)
            }
            None => {
                log::debug!(
                    target: "harmonize",
                    "measure {}: no diatonic candidate, holding {:?}",
                    index + 1,
                    previous.map(|c| c.name())
                );
                previous
            }
        };

        if chord.is_some() {
            previous = chord;
        }
        out.push(HarmonizedMeasure { notes, chord });
    }
    out
}

/// One chord per measure that produced a chord, in melody order.
pub fn harmonize(melody: &[Note], key: Key, bpm: f64, time_signature: TimeSignature) -> Vec<Chord> {
    harmonize_measures(melody, key, bpm, time_signature)
        .into_iter()
        .filter_map(|m| m.chord)
        .collect()
}

/// Stateless harmonizer, mirroring the free functions as methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChordHarmonizer;

impl ChordHarmonizer {
    pub fn diatonic_chords(&self, key: Key) -> [Chord; 7] {
        diatonic_chords(key)
    }

    pub fn candidate_chords(&self, note: &Note, key: Key) -> Vec<Chord> {
        candidate_chords(note, key)
    }

    pub fn harmonize(
        &self,
        melody: &[Note],
        key: Key,
        bpm: f64,
        time_signature: TimeSignature,
    ) -> Vec<Chord> {
        harmonize(melody, key, bpm, time_signature)
    }
}
