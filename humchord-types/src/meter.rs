use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Time signature: `beats` per measure of `note_value` notes (4/4, 3/4, 6/8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSignature {
    pub beats: u32,
    pub note_value: u32,
}

impl TimeSignature {
    pub fn new(beats: u32, note_value: u32) -> Self {
        Self { beats, note_value }
    }

    /// Both fields positive
    pub fn is_valid(&self) -> bool {
        self.beats > 0 && self.note_value > 0
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

impl std::fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.beats, self.note_value)
    }
}

impl FromStr for TimeSignature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (beats, note_value) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| format!("time signature must look like 4/4: {}", s))?;
        let beats: u32 = beats
            .trim()
            .parse()
            .map_err(|e| format!("bad beat count in {}: {}", s, e))?;
        let note_value: u32 = note_value
            .trim()
            .parse()
            .map_err(|e| format!("bad note value in {}: {}", s, e))?;
        let ts = TimeSignature::new(beats, note_value);
        if !ts.is_valid() {
            return Err(format!("time signature fields must be positive: {}", s));
        }
        Ok(ts)
    }
}
