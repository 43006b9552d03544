use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chord::{Chord, ChordQuality};
use crate::pitch::PitchClass;

/// Key quality (mode). Minor is natural minor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyQuality {
    Major,
    Minor,
}

impl KeyQuality {
    pub const ALL: [KeyQuality; 2] = [KeyQuality::Major, KeyQuality::Minor];

    pub fn name(&self) -> &'static str {
        match self {
            KeyQuality::Major => "major",
            KeyQuality::Minor => "minor",
        }
    }

    /// Semitone intervals from the tonic for the seven scale degrees
    pub fn scale_intervals(&self) -> &'static [u8; 7] {
        match self {
            KeyQuality::Major => &[0, 2, 4, 5, 7, 9, 11],
            KeyQuality::Minor => &[0, 2, 3, 5, 7, 8, 10],
        }
    }

    /// Triad quality built on each scale degree
    pub fn chord_qualities(&self) -> &'static [ChordQuality; 7] {
        use ChordQuality::*;
        match self {
            KeyQuality::Major => &[Major, Minor, Minor, Major, Major, Minor, Diminished],
            KeyQuality::Minor => &[Minor, Diminished, Major, Minor, Minor, Major, Major],
        }
    }
}

/// Musical key: tonic plus mode. 24 possible values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub root: PitchClass,
    pub quality: KeyQuality,
}

impl Key {
    /// All keys in tie-break order: ascending root, major before minor.
    pub const ALL: [Key; 24] = {
        let mut keys = [Key::new(PitchClass::C, KeyQuality::Major); 24];
        let mut i = 0;
        while i < 12 {
            keys[i * 2] = Key::new(PitchClass::ALL[i], KeyQuality::Major);
            keys[i * 2 + 1] = Key::new(PitchClass::ALL[i], KeyQuality::Minor);
            i += 1;
        }
        keys
    };

    pub const fn new(root: PitchClass, quality: KeyQuality) -> Self {
        Self { root, quality }
    }

    pub const fn major(root: PitchClass) -> Self {
        Self::new(root, KeyQuality::Major)
    }

    pub const fn minor(root: PitchClass) -> Self {
        Self::new(root, KeyQuality::Minor)
    }

    /// Compact name: "C", "F#m"
    pub fn short_name(&self) -> String {
        match self.quality {
            KeyQuality::Major => self.root.name().to_string(),
            KeyQuality::Minor => format!("{}m", self.root.name()),
        }
    }

    /// Scale degree of a chord root, or None if the root is not in the scale.
    pub fn degree_of(&self, chord: &Chord) -> Option<ScaleDegree> {
        let distance = chord.root.interval_from(self.root);
        self.quality
            .scale_intervals()
            .iter()
            .position(|&step| step == distance)
            .map(|i| ScaleDegree(i as u8 + 1))
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.root.name(), self.quality.name())
    }
}

impl FromStr for Key {
    type Err = String;

    /// Accepts "C", "Am", "F#m", "Bb major", "a minor", "Cmaj".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut root_len = s.chars().next().map(char::len_utf8).unwrap_or(0);
        if let Some(c) = s[root_len..].chars().next() {
            if matches!(c, '#' | 's' | 'b' | '♯' | '♭') {
                root_len += c.len_utf8();
            }
        }
        let root: PitchClass = s[..root_len]
            .parse()
            .map_err(|_| format!("unknown key: {}", s))?;
        let quality = match s[root_len..].trim().to_lowercase().as_str() {
            "" | "maj" | "major" => KeyQuality::Major,
            "m" | "min" | "minor" => KeyQuality::Minor,
            _ => return Err(format!("unknown key: {}", s)),
        };
        Ok(Key::new(root, quality))
    }
}

/// 1-based position of a chord root within a key's scale (I..VII).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScaleDegree(pub u8);

impl ScaleDegree {
    pub const TONIC: ScaleDegree = ScaleDegree(1);
    pub const SUPERTONIC: ScaleDegree = ScaleDegree(2);
    pub const MEDIANT: ScaleDegree = ScaleDegree(3);
    pub const SUBDOMINANT: ScaleDegree = ScaleDegree(4);
    pub const DOMINANT: ScaleDegree = ScaleDegree(5);
    pub const SUBMEDIANT: ScaleDegree = ScaleDegree(6);
    pub const LEADING: ScaleDegree = ScaleDegree(7);

    pub fn get(self) -> u8 {
        self.0
    }

    /// Roman numeral, lowercase for minor and diminished triads.
    pub fn roman(self, quality: ChordQuality) -> String {
        const NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];
        let base = NUMERALS
            .get((self.0 as usize).wrapping_sub(1))
            .copied()
            .unwrap_or("?");
        match quality {
            ChordQuality::Major => base.to_string(),
            ChordQuality::Minor => base.to_lowercase(),
            ChordQuality::Diminished => format!("{}°", base.to_lowercase()),
        }
    }
}
