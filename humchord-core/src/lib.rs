//! # humchord-core
//!
//! Turns a hummed melody into a key and a chord progression. Independent of
//! any audio backend: the host supplies `(frequency, amplitude)` readings from
//! its own pitch tracker at a fixed cadence.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use humchord_core::config::Config;
//! use humchord_core::session::Session;
//!
//! let config = Config::load();
//! let mut session = Session::from_config(&config);
//!
//! // Capture side (e.g. an audio callback thread)
//! let sink = session.sink();
//!
//! session.start();
//! // sink.add(frequency, amplitude) once per reading...
//! if let Some(analysis) = session.stop() {
//!     println!("{:?} {:?}", analysis.key, analysis.progression());
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`aggregator`]: `NoteAggregator` (readings → notes) and the thread-safe
//!   `SharedAggregator` handle
//! - [`key_detect`]: pitch-class profile, Pearson correlation, `find_key`
//! - [`harmonize`]: diatonic triads, candidate filtering, measure
//!   segmentation, chord scoring, `harmonize`
//! - [`analysis`]: `analyze()` runs key detection then harmonization
//! - [`session`]: start/stop recording lifecycle
//! - [`worker`]: `AnalysisHandle`, background analysis thread
//! - [`sampler`]: multi-channel reading reduction
//! - [`config`]: TOML configuration (embedded defaults + user override)

pub use humchord_types as types;

pub mod aggregator;
pub mod analysis;
pub mod config;
pub mod harmonize;
pub mod key_detect;
pub mod sampler;
pub mod session;
pub mod worker;

pub use aggregator::{NoteAggregator, SharedAggregator};
pub use analysis::{analyze, Analysis, HarmonySettings};
pub use harmonize::ChordHarmonizer;
pub use key_detect::KeyDetector;
