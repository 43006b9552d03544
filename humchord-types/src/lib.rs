//! # humchord-types
//!
//! Shared type definitions for the humchord workspace.
//! Pitch classes, notes, keys, chords and meter: the vocabulary passed between
//! the note aggregator, key detection and harmonization in `humchord-core`
//! and rendered by the `humchord` binary.
//!
//! Everything here is a value type. Derived data (chord triads, scale tables)
//! is computed on demand and never stored.

mod chord;
mod key;
mod meter;
mod pitch;

pub use chord::{Chord, ChordQuality};
pub use key::{Key, KeyQuality, ScaleDegree};
pub use meter::TimeSignature;
pub use pitch::{Note, PitchClass};
