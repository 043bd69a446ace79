//! Normalized views over a race list.
//!
//! These are the only places that ask a race for its first-place time, so
//! the legacy fallback and the 10 ms quantization happen exactly once.

use crate::core::time_codec::quantize;
use crate::domain::model::{Millis, Race};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A race that has a first-place time, with that time already quantized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedRace {
    pub race_id: String,
    pub time: Millis,
    pub raced_at: DateTime<Utc>,
    pub participants: u32,
    pub finishes: u32,
}

/// Quantized first-place times in insertion order.
pub fn first_place_sample(races: &[Race]) -> Vec<Millis> {
    races
        .iter()
        .filter_map(Race::first_place_time)
        .map(|t| quantize(t as f64))
        .collect()
}

/// Every race with a first-place time, in insertion order.
pub fn timed_races(races: &[Race]) -> Vec<TimedRace> {
    races
        .iter()
        .filter_map(|race| {
            race.first_place_time().map(|t| TimedRace {
                race_id: race.id.clone(),
                time: quantize(t as f64),
                raced_at: race.created_at,
                participants: race.participants,
                finishes: race.finishes,
            })
        })
        .collect()
}
