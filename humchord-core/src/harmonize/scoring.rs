//! Chord scoring for a single measure.
//!
//! A candidate's score is the sum of four independent terms: how many of the
//! measure's pitch classes it covers, whether it contains the downbeat note,
//! how well it follows the previous chord, and a fixed weight per scale degree.

use crate::types::{Chord, Key, Note, PitchClass};

/// Bonus when the triad contains the measure's first note
pub const DOWNBEAT_BONUS: f64 = 1.5;

/// Distinct pitch classes shared by the triad and the measure.
pub fn note_coverage(chord: &Chord, pitch_classes: &[PitchClass]) -> f64 {
    chord
        .constituent_notes()
        .iter()
        .filter(|pc| pitch_classes.contains(pc))
        .count() as f64
}

pub fn beat_strength(chord: &Chord, downbeat: Option<PitchClass>) -> f64 {
    match downbeat {
        Some(pc) if chord.contains(pc) => DOWNBEAT_BONUS,
        _ => 0.0,
    }
}

/// Transition weight from the previous chord. 0 without a previous chord or
/// when either chord falls outside the key.
pub fn progression_fit(previous: Option<&Chord>, chord: &Chord, key: Key) -> f64 {
    let Some(previous) = previous else {
        return 0.0;
    };
    match (key.degree_of(previous), key.degree_of(chord)) {
        (Some(from), Some(to)) => transition_weight(from.get(), to.get()),
        _ => 0.0,
    }
}

fn transition_weight(from: u8, to: u8) -> f64 {
    match (from, to) {
        (5, 1) => 2.0,
        (4, 5) | (2, 5) => 1.5,
        (6, 2) | (1, 4) => 1.0,
        (5, 4) => -1.0,
        _ => 0.5,
    }
}

/// Primary triads weigh most, then ii and vi, then iii and vii.
pub fn static_weight(chord: &Chord, key: Key) -> f64 {
    match key.degree_of(chord).map(|d| d.get()) {
        Some(1) | Some(4) | Some(5) => 0.5,
        Some(2) | Some(6) => 0.2,
        _ => 0.1,
    }
}

pub fn score_chord(chord: &Chord, measure: &[Note], previous: Option<&Chord>, key: Key) -> f64 {
    let pitch_classes: Vec<PitchClass> = measure.iter().map(|n| n.pitch_class).collect();
    let downbeat = measure.first().map(|n| n.pitch_class);

    note_coverage(chord, &pitch_classes)
        + beat_strength(chord, downbeat)
        + progression_fit(previous, chord, key)
        + static_weight(chord, key)
}

/// Highest-scoring candidate; the earliest candidate wins a tie.
pub fn select_chord(
    candidates: &[Chord],
    measure: &[Note],
    previous: Option<&Chord>,
    key: Key,
) -> Option<Chord> {
    let mut best: Option<(Chord, f64)> = None;
    for chord in candidates {
        let score = score_chord(chord, measure, previous, key);
        let is_better = match best {
            None => true,
            Some((_, prev_score)) => score > prev_score,
        };
        if is_better {
            best = Some((*chord, score));
        }
    }
    best.map(|(chord, _)| chord)
}
