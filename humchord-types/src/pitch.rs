use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pitch class (note name without octave)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Semitones above C (0-11)
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// Pitch class for any semitone count, reduced mod 12.
    pub fn from_index(semitones: i32) -> PitchClass {
        Self::ALL[semitones.rem_euclid(12) as usize]
    }

    pub fn transpose(&self, semitones: i32) -> PitchClass {
        Self::from_index(self.index() as i32 + semitones)
    }

    /// Upward distance in semitones from `other` to `self` (0-11).
    pub fn interval_from(&self, other: PitchClass) -> u8 {
        (12 + self.index() - other.index()) % 12
    }
}

impl std::fmt::Display for PitchClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PitchClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let letter = chars
            .next()
            .ok_or_else(|| "empty pitch class".to_string())?;
        let natural = match letter.to_ascii_uppercase() {
            'C' => PitchClass::C,
            'D' => PitchClass::D,
            'E' => PitchClass::E,
            'F' => PitchClass::F,
            'G' => PitchClass::G,
            'A' => PitchClass::A,
            'B' => PitchClass::B,
            _ => return Err(format!("unknown pitch class: {}", s)),
        };
        let accidental = match chars.as_str() {
            "" => 0,
            "#" | "s" | "♯" => 1,
            "b" | "♭" => -1,
            _ => return Err(format!("unknown pitch class: {}", s)),
        };
        Ok(natural.transpose(accidental))
    }
}

/// A sung note: pitch class plus how long it was held, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub pitch_class: PitchClass,
    pub duration: f64,
}

impl Note {
    pub fn new(pitch_class: PitchClass, duration: f64) -> Self {
        Self {
            pitch_class,
            duration,
        }
    }
}
