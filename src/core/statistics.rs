//! Descriptive statistics over a group's races.

use crate::core::entries::first_place_sample;
use crate::domain::model::{Millis, Race};
use serde::Serialize;

/// Aggregates for one group. Time-based fields are `None` when no race has a
/// first-place time; counts are always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupStats {
    pub race_count: usize,
    pub total_participants: u64,
    pub total_finishers: u64,
    pub completion_rate: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub stddev: Option<f64>,
    pub best: Option<Millis>,
    pub worst: Option<Millis>,
    /// Quantized first-place times in insertion order.
    pub sample: Vec<Millis>,
}

pub fn compute_group_stats(races: &[Race]) -> GroupStats {
    let total_participants: u64 = races.iter().map(|r| u64::from(r.participants)).sum();
    let total_finishers: u64 = races.iter().map(|r| u64::from(r.finishes)).sum();
    let completion_rate =
        (total_participants > 0).then(|| total_finishers as f64 / total_participants as f64);

    let sample = first_place_sample(races);
    let mean = mean(&sample);

    GroupStats {
        race_count: races.len(),
        total_participants,
        total_finishers,
        completion_rate,
        mean,
        median: median(&sample),
        stddev: std_dev(&sample, mean),
        best: sample.iter().copied().min(),
        worst: sample.iter().copied().max(),
        sample,
    }
}

pub fn mean(sample: &[Millis]) -> Option<f64> {
    if sample.is_empty() {
        return None;
    }
    let sum: f64 = sample.iter().map(|&t| t as f64).sum();
    Some(sum / sample.len() as f64)
}

/// Middle value after an ascending sort; the average of the two middle values
/// for even-sized samples.
pub fn median(sample: &[Millis]) -> Option<f64> {
    if sample.is_empty() {
        return None;
    }
    let mut sorted = sample.to_vec();
    sorted.sort_unstable();

    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 0 {
        Some((sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0)
    } else {
        Some(sorted[mid] as f64)
    }
}

/// Population standard deviation (divisor `n`). Pass a precomputed mean to
/// avoid a second pass, or `None` to compute it here.
pub fn std_dev(sample: &[Millis], mean_hint: Option<f64>) -> Option<f64> {
    let m = mean_hint.or_else(|| mean(sample))?;
    if sample.is_empty() {
        return None;
    }
    let variance = sample
        .iter()
        .map(|&t| {
            let d = t as f64 - m;
            d * d
        })
        .sum::<f64>()
        / sample.len() as f64;
    Some(variance.sqrt())
}
