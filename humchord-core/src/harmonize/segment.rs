//! Measure segmentation.

use crate::types::{Note, TimeSignature};

// Float slack for boundary tests. Durations built from 0.1 s readings rarely
// sum to an exact measure length.
const EPSILON: f64 = 1e-9;

/// Upper bound on measures per melody. Splitting stops here and the rest of
/// the melody lands in the last measure.
pub const MAX_MEASURES: usize = 10_000;

/// Length of one measure in seconds. `bpm` counts quarter notes.
pub fn measure_duration(bpm: f64, time_signature: TimeSignature) -> f64 {
    let quarter = 60.0 / bpm;
    let beat = quarter * 4.0 / time_signature.note_value as f64;
    beat * time_signature.beats as f64
}

/// Split a melody into measures of `measure_duration` seconds.
///
/// A note crossing a bar line is cut in two (or more) pieces with the same
/// pitch class. A non-positive or non-finite measure length puts the whole
/// melody in one measure. Notes with a negative or non-finite duration are
/// skipped. At most [`MAX_MEASURES`] measures are produced.
pub fn segment(notes: &[Note], measure_duration: f64) -> Vec<Vec<Note>> {
    if notes.is_empty() {
        return Vec::new();
    }
    if !(measure_duration.is_finite() && measure_duration > EPSILON) {
        return vec![notes.to_vec()];
    }

    let mut measures = Vec::new();
    let mut current: Vec<Note> = Vec::new();
    let mut filled = 0.0;

    for note in notes {
        if !(note.duration.is_finite() && note.duration >= 0.0) {
            log::debug!(
                target: "harmonize",
                "skipping {} with duration {}",
                note.pitch_class,
                note.duration
            );
            continue;
        }
        let mut remaining = note.duration;

        while filled + remaining > measure_duration + EPSILON
            && measures.len() + 1 < MAX_MEASURES
        {
            let capacity = measure_duration - filled;
            if capacity > EPSILON {
                current.push(Note::new(note.pitch_class, capacity));
                remaining -= capacity;
            }
            if !current.is_empty() {
                measures.push(std::mem::take(&mut current));
            }
            filled = 0.0;
        }

        current.push(Note::new(note.pitch_class, remaining));
        filled += remaining;
    }

    if !current.is_empty() {
        measures.push(current);
    }
    measures
}
