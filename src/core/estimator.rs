//! Empirical estimators over a sample of first-place times.
//!
//! [`target_time`] answers "what time do I need to beat the field with
//! probability p?", and [`win_probability`] answers the inverse question for a
//! given time. Both treat lower times as better.

use crate::domain::model::Millis;

pub const TARGET_PROB_PRESETS: [f64; 3] = [0.7, 0.8, 0.9];

const PRESET_TOLERANCE: f64 = 1e-6;

// Absorbs binary rounding in products like (1 - 0.8) * 5.
const INDEX_EPSILON: f64 = 1e-9;

/// The preset `target_prob` corresponds to, if any.
pub fn matching_preset(target_prob: f64) -> Option<f64> {
    TARGET_PROB_PRESETS
        .iter()
        .copied()
        .find(|p| (p - target_prob).abs() < PRESET_TOLERANCE)
}

pub fn is_preset(target_prob: f64) -> bool {
    matching_preset(target_prob).is_some()
}

/// Time at index `floor((1 - p) * n)` of the ascending sample, clamped to the
/// sample bounds. A fraction `p` of historical races finished at this time or
/// slower.
///
/// `target_prob` is expected in (0, 1]; callers validate it.
pub fn target_time(sample: &[Millis], target_prob: f64) -> Option<Millis> {
    if sample.is_empty() {
        return None;
    }
    let mut sorted = sample.to_vec();
    sorted.sort_unstable();

    let n = sorted.len();
    let raw = ((1.0 - target_prob) * n as f64 + INDEX_EPSILON).floor();
    let idx = if raw <= 0.0 {
        0
    } else {
        (raw as usize).min(n - 1)
    };
    Some(sorted[idx])
}

/// Fraction of the sample that `candidate_ms` would beat or tie.
pub fn win_probability(sample: &[Millis], candidate_ms: f64) -> Option<f64> {
    if sample.is_empty() || !candidate_ms.is_finite() || candidate_ms < 0.0 {
        return None;
    }
    let wins = sample.iter().filter(|&&t| candidate_ms <= t as f64).count();
    Some(wins as f64 / sample.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [Millis; 5] = [1_400, 1_000, 1_300, 1_100, 1_200];

    #[test]
    fn test_target_time_picks_percentile_index() {
        assert_eq!(target_time(&SAMPLE, 0.8), Some(1_100));
        assert_eq!(target_time(&SAMPLE, 0.7), Some(1_100));
        assert_eq!(target_time(&SAMPLE, 0.9), Some(1_000));
        assert_eq!(target_time(&SAMPLE, 1.0), Some(1_000));
    }

    #[test]
    fn test_target_time_clamps_index() {
        assert_eq!(target_time(&SAMPLE, 0.01), Some(1_400));
        assert_eq!(target_time(&[5_000], 0.8), Some(5_000));
        assert_eq!(target_time(&[], 0.8), None);
    }

    #[test]
    fn test_target_time_with_ten_races() {
        let sample: Vec<Millis> = (1..=10).map(|i| i * 100).collect();
        // floor(0.2 * 10) = 2
        assert_eq!(target_time(&sample, 0.8), Some(300));
        assert_eq!(target_time(&sample, 0.7), Some(400));
        assert_eq!(target_time(&sample, 0.9), Some(200));
    }

    #[test]
    fn test_win_probability() {
        let p = win_probability(&[1_000, 1_100, 1_200], 1_150.0).unwrap();
        assert!((p - 2.0 / 3.0).abs() < 1e-12);

        assert_eq!(win_probability(&[1_000, 1_100], 1_100.0), Some(0.5));
        assert_eq!(win_probability(&[1_000, 1_100], 500.0), Some(1.0));
        assert_eq!(win_probability(&[1_000, 1_100], 5_000.0), Some(0.0));
    }

    #[test]
    fn test_win_probability_undefined_inputs() {
        assert_eq!(win_probability(&[], 1_000.0), None);
        assert_eq!(win_probability(&[1_000], -1.0), None);
        assert_eq!(win_probability(&[1_000], f64::NAN), None);
        assert_eq!(win_probability(&[1_000], f64::INFINITY), None);
    }

    #[test]
    fn test_estimators_agree_on_direction() {
        let sample: Vec<Millis> = SAMPLE.to_vec();
        for p in TARGET_PROB_PRESETS {
            let target = target_time(&sample, p).unwrap();
            let achieved = win_probability(&sample, target as f64).unwrap();
            assert!(achieved >= p - 1e-9, "p = {}, achieved = {}", p, achieved);
        }
    }

    #[test]
    fn test_presets() {
        assert!(is_preset(0.8));
        assert!(is_preset(0.7000000001));
        assert!(!is_preset(0.75));
        assert_eq!(matching_preset(0.9000000001), Some(0.9));
        assert_eq!(matching_preset(0.85), None);
    }
}
