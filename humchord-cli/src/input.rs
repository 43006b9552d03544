//! Reading files: one pitch-tracker frame per line.
//!
//! ```text
//! # frequency amplitude
//! 440.0 0.52
//! # several channels: pitches then amplitudes, comma separated
//! 438.0,442.0 0.2,0.6
//! ```

use std::io::Read;
use std::path::Path;

use humchord_core::sampler::PitchReading;

/// Read a readings file, or stdin when `path` is `-`.
pub fn read_readings(path: &Path) -> Result<Vec<PitchReading>, String> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("cannot read stdin: {}", e))?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {}", path.display(), e))?
    };
    parse_readings(&contents)
}

pub fn parse_readings(contents: &str) -> Result<Vec<PitchReading>, String> {
    let mut readings = Vec::new();
    for (i, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let reading = parse_line(line).map_err(|e| format!("line {}: {}", i + 1, e))?;
        readings.push(reading);
    }
    log::debug!("parsed {} readings", readings.len());
    Ok(readings)
}

fn parse_line(line: &str) -> Result<PitchReading, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [pitches, amplitudes] = fields.as_slice() else {
        return Err(format!("expected `frequency amplitude`, got `{}`", line));
    };
    let pitches = parse_list(pitches)?;
    let amplitudes = parse_list(amplitudes)?;
    PitchReading::from_channels(&pitches, &amplitudes)
        .ok_or_else(|| format!("empty reading: `{}`", line))
}

fn parse_list(field: &str) -> Result<Vec<f32>, String> {
    field
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f32>()
                .map_err(|e| format!("bad number `{}`: {}", s, e))
        })
        .collect()
}
