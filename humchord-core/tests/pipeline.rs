//! End-to-end: tracker readings → notes → key → progression.

use std::thread;
use std::time::Duration;

use humchord_core::aggregator::SharedAggregator;
use humchord_core::analysis::HarmonySettings;
use humchord_core::harmonize::{diatonic_chords, harmonize};
use humchord_core::key_detect::find_key;
use humchord_core::sampler::PitchReading;
use humchord_core::session::Session;
use humchord_core::types::{Chord, ChordQuality, Key, PitchClass, TimeSignature};
use humchord_core::worker::AnalysisHandle;

/// Equal-tempered frequency for a MIDI note, detuned by `cents`.
fn freq(midi: i32, cents: f32) -> f32 {
    440.0 * 2.0_f32.powf((midi as f32 - 69.0 + cents / 100.0) / 12.0)
}

/// (midi note, number of 0.1 s readings)
const TUNE: [(i32, usize); 9] = [
    (60, 10), // C
    (64, 5),  // E
    (67, 5),  // G
    (65, 10), // F
    (69, 10), // A
    (67, 10), // G
    (71, 5),  // B
    (74, 5),  // D (upper octave)
    (72, 20), // C (upper octave)
];

fn tune_readings() -> Vec<PitchReading> {
    let mut readings = Vec::new();
    // Leading silence and tracker garbage
    readings.push(PitchReading::new(0.0, 0.0));
    readings.push(PitchReading::new(9000.0, 0.4));
    readings.push(PitchReading::new(220.0, 0.001));
    for (i, &(midi, count)) in TUNE.iter().enumerate() {
        for j in 0..count {
            // Wobble within +-15 cents, never enough to change pitch class
            let cents = if (i + j) % 2 == 0 { 12.0 } else { -15.0 };
            readings.push(PitchReading::new(freq(midi, cents), 0.3));
        }
    }
    // Trailing silence
    readings.push(PitchReading::new(5.0, 0.0));
    readings
}

fn maj(root: PitchClass) -> Chord {
    Chord::new(root, ChordQuality::Major)
}

#[test]
fn hummed_tune_is_harmonized() {
    let aggregator = SharedAggregator::default();
    let producer = aggregator.clone();
    let readings = tune_readings();

    let capture = thread::spawn(move || {
        for r in readings {
            producer.add(r.frequency, r.amplitude);
        }
    });
    capture.join().unwrap();

    let notes = aggregator.finalize();
    assert_eq!(notes.len(), TUNE.len());
    let total: f64 = notes.iter().map(|n| n.duration).sum();
    assert!((total - 8.0).abs() < 1e-6);

    let key = find_key(&notes).unwrap();
    assert_eq!(key, Key::major(PitchClass::C));

    let progression = harmonize(&notes, key, 120.0, TimeSignature::new(4, 4));
    use PitchClass::*;
    assert_eq!(progression, vec![maj(C), maj(F), maj(G), maj(C)]);

    let diatonic = diatonic_chords(key);
    assert!(progression.iter().all(|c| diatonic.contains(c)));
}

#[test]
fn slower_tempo_gives_fewer_measures() {
    let aggregator = SharedAggregator::default();
    for r in tune_readings() {
        aggregator.add(r.frequency, r.amplitude);
    }
    let notes = aggregator.finalize();
    // 60 bpm in 4/4: one 4 s measure per half of the tune
    let progression = harmonize(&notes, Key::major(PitchClass::C), 60.0, TimeSignature::new(4, 4));
    assert_eq!(progression.len(), 2);
    assert_eq!(progression[0], maj(PitchClass::C));
}

#[test]
fn session_matches_direct_pipeline() {
    let mut session = Session::default();
    session.start();
    let sink = session.sink();
    for r in tune_readings() {
        sink.add(r.frequency, r.amplitude);
    }
    let analysis = session.stop().unwrap().clone();

    assert_eq!(analysis.key, Some(Key::major(PitchClass::C)));
    assert_eq!(analysis.measures.len(), 4);
    assert_eq!(
        analysis.progression(),
        harmonize(&analysis.notes, Key::major(PitchClass::C), 120.0, TimeSignature::default())
    );
}

#[test]
fn background_worker_agrees_with_session() {
    let mut session = Session::default();
    session.start();
    for r in tune_readings() {
        session.push(r);
    }
    let expected = session.stop().unwrap().clone();

    let mut worker = AnalysisHandle::new();
    let analysis = worker
        .analyze_blocking(
            expected.notes.clone(),
            HarmonySettings::default(),
            Duration::from_secs(5),
        )
        .unwrap();
    assert_eq!(analysis, expected);
}

#[test]
fn three_four_meter_regroups_the_tune() {
    let aggregator = SharedAggregator::default();
    for r in tune_readings() {
        aggregator.add(r.frequency, r.amplitude);
    }
    let notes = aggregator.finalize();
    let settings = HarmonySettings {
        time_signature: TimeSignature::new(3, 4),
        ..HarmonySettings::default()
    };
    let analysis = humchord_core::analyze(notes, &settings);
    // 8 s of melody in 1.5 s measures
    assert_eq!(analysis.measures.len(), 6);
    let total: f64 = analysis
        .measures
        .iter()
        .flat_map(|m| m.notes.iter())
        .map(|n| n.duration)
        .sum();
    assert!((total - 8.0).abs() < 1e-6);
}
