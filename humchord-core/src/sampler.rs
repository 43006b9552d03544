//! Readings handed over by an external pitch tracker.

/// One pitch-tracker reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchReading {
    pub frequency: f32,
    pub amplitude: f32,
}

impl PitchReading {
    pub fn new(frequency: f32, amplitude: f32) -> Self {
        Self {
            frequency,
            amplitude,
        }
    }

    /// Collapse a multi-channel tracker frame: mean pitch, peak amplitude.
    /// None when either slice is empty.
    pub fn from_channels(pitches: &[f32], amplitudes: &[f32]) -> Option<Self> {
        if pitches.is_empty() {
            return None;
        }
        let amplitude = amplitudes.iter().copied().reduce(f32::max)?;
        let frequency = pitches.iter().sum::<f32>() / pitches.len() as f32;
        Some(Self::new(frequency, amplitude))
    }
}
