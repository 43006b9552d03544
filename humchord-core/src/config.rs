use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::aggregator::AggregatorConfig;
use crate::analysis::HarmonySettings;
use crate::types::TimeSignature;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    aggregator: AggregatorSection,
    #[serde(default)]
    harmony: HarmonySection,
}

#[derive(Deserialize, Default)]
struct AggregatorSection {
    sample_interval: Option<f64>,
    min_frequency: Option<f32>,
    max_frequency: Option<f32>,
    amplitude_gate: Option<f32>,
    reference_a4: Option<f32>,
}

#[derive(Deserialize, Default)]
struct HarmonySection {
    bpm: Option<f64>,
    time_signature: Option<[u32; 2]>,
}

pub struct Config {
    aggregator: AggregatorSection,
    harmony: HarmonySection,
}

impl Config {
    /// Embedded defaults merged with `<config_dir>/humchord/config.toml`, if present.
    pub fn load() -> Self {
        Self::load_layered(user_config_path().as_deref())
    }

    /// Embedded defaults merged with an explicit override file.
    pub fn load_from(path: &Path) -> Self {
        Self::load_layered(Some(path))
    }

    fn load_layered(user_path: Option<&Path>) -> Self {
        let mut base: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            log::error!(target: "config", "embedded config.toml is invalid: {}", e);
            ConfigFile::default()
        });

        if let Some(path) = user_path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => {
                            merge_aggregator(&mut base.aggregator, user.aggregator);
                            merge_harmony(&mut base.harmony, user.harmony);
                            log::debug!(target: "config", "loaded overrides from {}", path.display());
                        }
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            aggregator: base.aggregator,
            harmony: base.harmony,
        }
    }

    /// Aggregator parameters. Out-of-domain values fall back to the built-in defaults.
    pub fn aggregator(&self) -> AggregatorConfig {
        let fallback = AggregatorConfig::default();
        let section = &self.aggregator;

        let sample_interval = section
            .sample_interval
            .filter(|v| v.is_finite() && *v > 0.0)
            .unwrap_or(fallback.sample_interval);

        let (min_frequency, max_frequency) = match (section.min_frequency, section.max_frequency) {
            (Some(lo), Some(hi)) if lo.is_finite() && hi.is_finite() && 0.0 < lo && lo < hi => {
                (lo, hi)
            }
            _ => (fallback.min_frequency, fallback.max_frequency),
        };

        AggregatorConfig {
            sample_interval,
            min_frequency,
            max_frequency,
            amplitude_gate: section
                .amplitude_gate
                .filter(|v| v.is_finite() && *v >= 0.0)
                .unwrap_or(fallback.amplitude_gate),
            reference_a4: section
                .reference_a4
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(fallback.reference_a4),
        }
    }

    /// Tempo and meter used for harmonization unless the caller overrides them.
    pub fn harmony(&self) -> HarmonySettings {
        let fallback = HarmonySettings::default();
        HarmonySettings {
            bpm: self
                .harmony
                .bpm
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(fallback.bpm),
            time_signature: self
                .harmony
                .time_signature
                .map(|ts| TimeSignature::new(ts[0], ts[1]))
                .filter(TimeSignature::is_valid)
                .unwrap_or(fallback.time_signature),
            key_override: None,
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("humchord").join("config.toml"))
}

fn merge_aggregator(base: &mut AggregatorSection, user: AggregatorSection) {
    if user.sample_interval.is_some() {
        base.sample_interval = user.sample_interval;
    }
    if user.min_frequency.is_some() {
        base.min_frequency = user.min_frequency;
    }
    if user.max_frequency.is_some() {
        base.max_frequency = user.max_frequency;
    }
    if user.amplitude_gate.is_some() {
        base.amplitude_gate = user.amplitude_gate;
    }
    if user.reference_a4.is_some() {
        base.reference_a4 = user.reference_a4;
    }
}

fn merge_harmony(base: &mut HarmonySection, user: HarmonySection) {
    if user.bpm.is_some() {
        base.bpm = user.bpm;
    }
    if user.time_signature.is_some() {
        base.time_signature = user.time_signature;
    }
}
