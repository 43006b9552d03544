//! Key detection by pitch-class-profile correlation.
//!
//! The melody is reduced to a duration-weighted 12-bin histogram and compared
//! (Pearson correlation) against a major and a minor tonal-hierarchy template
//! rotated to each of the 12 roots. The best-correlated key wins.

use crate::types::{Key, KeyQuality, Note};

/// Krumhansl-Kessler major profile, tonic at index 0
const MAJOR_PROFILE: [f64; 12] = [
    6.35, 2.23, 3.48, 2.33, 4.38, 4.09, 2.52, 5.19, 2.39, 3.66, 2.29, 2.88,
];

/// Krumhansl-Kessler minor profile, tonic at index 0
const MINOR_PROFILE: [f64; 12] = [
    6.33, 2.68, 3.52, 5.38, 2.60, 3.53, 2.54, 4.75, 3.98, 2.69, 3.34, 3.17,
];

/// Duration-weighted pitch-class histogram.
pub fn calculate_pcp(notes: &[Note]) -> [f64; 12] {
    let mut pcp = [0.0; 12];
    for note in notes {
        pcp[note.pitch_class.index() as usize] += note.duration;
    }
    pcp
}

/// Pearson correlation coefficient. 0 for empty or mismatched inputs and for
/// zero-variance vectors.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut sq_a = 0.0;
    let mut sq_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        numerator += dx * dy;
        sq_a += dx * dx;
        sq_b += dy * dy;
    }

    let denominator = (sq_a * sq_b).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

/// Reference profile for a key: the quality's template rotated so that its
/// tonic weight lands on the key's root.
pub fn key_profile(key: Key) -> [f64; 12] {
    let template = match key.quality {
        KeyQuality::Major => &MAJOR_PROFILE,
        KeyQuality::Minor => &MINOR_PROFILE,
    };
    let root = key.root.index() as usize;
    let mut profile = [0.0; 12];
    for (pc, weight) in profile.iter_mut().enumerate() {
        *weight = template[(pc + 12 - root) % 12];
    }
    profile
}

/// Every key with its correlation, best first. Equal coefficients keep
/// [`Key::ALL`] order.
pub fn rank_keys(notes: &[Note]) -> Vec<(Key, f64)> {
    let pcp = calculate_pcp(notes);
    let mut ranked: Vec<(Key, f64)> = Key::ALL
        .iter()
        .map(|&key| (key, pearson_correlation(&pcp, &key_profile(key))))
        .collect();
    // sort_by is stable, so ties stay in Key::ALL order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// Most plausible key for the melody, or None for an empty melody.
///
/// Ties go to the lowest root, then major before minor.
pub fn find_key(notes: &[Note]) -> Option<Key> {
    if notes.is_empty() {
        return None;
    }

    let pcp = calculate_pcp(notes);
    let mut best: Option<(Key, f64)> = None;
    for &key in Key::ALL.iter() {
        let r = pearson_correlation(&pcp, &key_profile(key));
        let is_better = match best {
            None => true,
            Some((_, prev)) => r > prev,
        };
        if is_better {
            best = Some((key, r));
        }
    }

    if let Some((key, r)) = best {
        log::debug!(target: "key_detect", "detected {} (r = {:.3})", key, r);
    }
    best.map(|(key, _)| key)
}

/// Stateless key detector, for hosts that hold their analysis stages as values.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyDetector;

impl KeyDetector {
    pub fn calculate_pcp(&self, notes: &[Note]) -> [f64; 12] {
        calculate_pcp(notes)
    }

    pub fn pearson_correlation(&self, a: &[f64], b: &[f64]) -> f64 {
        pearson_correlation(a, b)
    }

    pub fn find_key(&self, notes: &[Note]) -> Option<Key> {
        find_key(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PitchClass;

    fn scale(pcs: &[PitchClass]) -> Vec<Note> {
        pcs.iter().map(|&pc| Note::new(pc, 1.0)).collect()
    }

    #[test]
    fn pcp_is_duration_weighted() {
        let notes = [Note::new(PitchClass::C, 1.5), Note::new(PitchClass::G, 0.5)];
        let pcp = calculate_pcp(&notes);
        assert_eq!(pcp, [1.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn pcp_accumulates_repeated_pitch_classes() {
        let notes = [
            Note::new(PitchClass::E, 0.25),
            Note::new(PitchClass::D, 1.0),
            Note::new(PitchClass::E, 0.75),
        ];
        let pcp = calculate_pcp(&notes);
        assert!((pcp[4] - 1.0).abs() < 1e-12);
        assert!((pcp[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_known_vectors() {
        let a = [1.0, 2.0, 3.0];
        assert!((pearson_correlation(&a, &[1.0, 2.0, 3.0]) - 1.0).abs() < 1e-9);
        assert!((pearson_correlation(&a, &[3.0, 2.0, 1.0]) + 1.0).abs() < 1e-9);
        let r = pearson_correlation(&a, &[100.0, 73.0, 21.0]);
        assert!(r < -0.9 && r > -1.0);
    }

    #[test]
    fn pearson_degenerate_inputs_are_zero() {
        assert_eq!(pearson_correlation(&[], &[]), 0.0);
        assert_eq!(pearson_correlation(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(pearson_correlation(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn profiles_rotate_with_root() {
        let c = key_profile(Key::major(PitchClass::C));
        let d = key_profile(Key::major(PitchClass::D));
        assert_eq!(c, MAJOR_PROFILE);
        assert_eq!(d[2], 6.35);
        assert_eq!(d[9], 5.19);
        let a_minor = key_profile(Key::minor(PitchClass::A));
        assert_eq!(a_minor[9], 6.33);
        assert_eq!(a_minor[0], 5.38);
    }

    #[test]
    fn empty_melody_has_no_key() {
        assert_eq!(find_key(&[]), None);
    }

    #[test]
    fn c_major_scale() {
        use PitchClass::*;
        let notes = scale(&[C, D, E, F, G, A, B]);
        assert_eq!(find_key(&notes), Some(Key::major(C)));
    }

    #[test]
    fn a_minor_with_raised_seventh() {
        use PitchClass::*;
        let notes = scale(&[A, B, C, D, E, F, Gs]);
        assert_eq!(find_key(&notes), Some(Key::minor(A)));
    }

    #[test]
    fn g_major_scale() {
        use PitchClass::*;
        let notes = scale(&[G, A, B, C, D, E, Fs]);
        assert_eq!(find_key(&notes), Some(Key::major(G)));
    }

    #[test]
    fn d_minor_arpeggio_weighted_on_tonic() {
        use PitchClass::*;
        let notes = vec![
            Note::new(D, 2.0),
            Note::new(F, 1.0),
            Note::new(A, 1.0),
            Note::new(D, 1.0),
        ];
        assert_eq!(find_key(&notes), Some(Key::minor(D)));
    }

    #[test]
    fn zero_variance_profile_ties_to_first_key() {
        // Every pitch class equally long: all coefficients are 0.
        let notes: Vec<Note> = PitchClass::ALL.iter().map(|&pc| Note::new(pc, 1.0)).collect();
        assert_eq!(find_key(&notes), Some(Key::major(PitchClass::C)));
    }

    #[test]
    fn zero_duration_notes_tie_to_first_key() {
        let notes = [Note::new(PitchClass::Fs, 0.0)];
        assert_eq!(find_key(&notes), Some(Key::major(PitchClass::C)));
    }

    #[test]
    fn rank_keys_agrees_with_find_key() {
        use PitchClass::*;
        let notes = scale(&[G, A, B, C, D, E, Fs]);
        let ranked = rank_keys(&notes);
        assert_eq!(ranked.len(), 24);
        assert_eq!(ranked[0].0, Key::major(G));
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn detector_struct_delegates() {
        use PitchClass::*;
        let detector = KeyDetector;
        let notes = scale(&[C, D, E, F, G, A, B]);
        assert_eq!(detector.find_key(&notes), Some(Key::major(C)));
        assert_eq!(detector.calculate_pcp(&notes)[0], 1.0);
        assert_eq!(detector.pearson_correlation(&[1.0, 2.0], &[2.0, 4.0]), 1.0);
    }
}
