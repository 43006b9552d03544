use serde::{Deserialize, Serialize};

use crate::pitch::PitchClass;

/// Triad quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
}

impl ChordQuality {
    /// Suffix appended to the root name: "", "m", "°"
    pub fn suffix(&self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "°",
        }
    }

    /// (third, fifth) in semitones above the root
    pub fn intervals(&self) -> (i32, i32) {
        match self {
            ChordQuality::Major => (4, 7),
            ChordQuality::Minor => (3, 7),
            ChordQuality::Diminished => (3, 6),
        }
    }
}

/// A triad identified by root and quality. Equality and hashing ignore the
/// constituent notes, which are derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chord {
    pub root: PitchClass,
    pub quality: ChordQuality,
}

impl Chord {
    pub fn new(root: PitchClass, quality: ChordQuality) -> Self {
        Self { root, quality }
    }

    /// Root, third and fifth
    pub fn constituent_notes(&self) -> [PitchClass; 3] {
        let (third, fifth) = self.quality.intervals();
        [
            self.root,
            self.root.transpose(third),
            self.root.transpose(fifth),
        ]
    }

    pub fn contains(&self, pitch_class: PitchClass) -> bool {
        self.constituent_notes().contains(&pitch_class)
    }

    /// Lead-sheet name: "C", "Dm", "B°"
    pub fn name(&self) -> String {
        format!("{}{}", self.root.name(), self.quality.suffix())
    }
}

impl std::fmt::Display for Chord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.root.name(), self.quality.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn c_major_triad() {
        let chord = Chord::new(PitchClass::C, ChordQuality::Major);
        assert_eq!(
            chord.constituent_notes(),
            [PitchClass::C, PitchClass::E, PitchClass::G]
        );
    }

    #[test]
    fn a_minor_triad() {
        let chord = Chord::new(PitchClass::A, ChordQuality::Minor);
        assert_eq!(
            chord.constituent_notes(),
            [PitchClass::A, PitchClass::C, PitchClass::E]
        );
    }

    #[test]
    fn b_diminished_triad_wraps() {
        let chord = Chord::new(PitchClass::B, ChordQuality::Diminished);
        assert_eq!(
            chord.constituent_notes(),
            [PitchClass::B, PitchClass::D, PitchClass::F]
        );
    }

    #[test]
    fn equality_is_by_root_and_quality() {
        let mut set = HashSet::new();
        set.insert(Chord::new(PitchClass::G, ChordQuality::Major));
        set.insert(Chord::new(PitchClass::G, ChordQuality::Major));
        set.insert(Chord::new(PitchClass::G, ChordQuality::Minor));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn contains_checks_all_three_tones() {
        let chord = Chord::new(PitchClass::D, ChordQuality::Minor);
        assert!(chord.contains(PitchClass::D));
        assert!(chord.contains(PitchClass::F));
        assert!(chord.contains(PitchClass::A));
        assert!(!chord.contains(PitchClass::Fs));
    }

    #[test]
    fn chord_names() {
        assert_eq!(Chord::new(PitchClass::C, ChordQuality::Major).name(), "C");
        assert_eq!(Chord::new(PitchClass::D, ChordQuality::Minor).name(), "Dm");
        assert_eq!(
            Chord::new(PitchClass::Fs, ChordQuality::Diminished).to_string(),
            "F#°"
        );
    }

    #[test]
    fn chord_serde_roundtrip() {
        let chord = Chord::new(PitchClass::As, ChordQuality::Minor);
        let json = serde_json::to_string(&chord).unwrap();
        let back: Chord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chord);
    }
}
