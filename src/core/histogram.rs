//! Fixed-width binning of first-place times for the distribution view.

use crate::core::entries::{timed_races, TimedRace};
use crate::domain::model::{Millis, Race};
use serde::Serialize;

pub const DEFAULT_BIN_SECONDS: f64 = 0.5;
pub const MIN_BIN_SECONDS: f64 = 0.01;
pub const MIN_BINS: usize = 5;
pub const MAX_BINS: usize = 40;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub index: usize,
    /// Inclusive lower bound in milliseconds.
    pub start: f64,
    /// Exclusive upper bound in milliseconds (inclusive for the last bin).
    pub end: f64,
    pub entries: Vec<TimedRace>,
}

impl HistogramBin {
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Entries sorted by time for drill-down display.
    pub fn entries_by_time(&self) -> Vec<&TimedRace> {
        let mut entries: Vec<&TimedRace> = self.entries.iter().collect();
        entries.sort_by_key(|e| e.time);
        entries
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    /// Smallest observed time; the left edge of bin 0.
    pub start: Millis,
    pub bin_size_ms: f64,
    /// `max(bin_size_ms, max - min)`.
    pub range: f64,
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// No data: there were no races with a first-place time.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.bins.iter().map(HistogramBin::count).collect()
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(HistogramBin::count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(HistogramBin::count).max().unwrap_or(0)
    }

    pub fn bin(&self, index: usize) -> Option<&HistogramBin> {
        self.bins.get(index)
    }

    /// Axis extent for rendering: `start .. start + range`.
    pub fn span(&self) -> (f64, f64) {
        let start = self.start as f64;
        (start, start + self.range)
    }
}

/// Bin width in milliseconds, never narrower than [`MIN_BIN_SECONDS`].
pub fn bin_size_ms(bin_seconds: f64) -> f64 {
    bin_seconds.max(MIN_BIN_SECONDS) * 1000.0
}

/// `ceil(range / bin)` clamped to `[MIN_BINS, MAX_BINS]`.
pub fn bin_count(range_ms: f64, bin_size_ms: f64) -> usize {
    ((range_ms / bin_size_ms).ceil() as usize).clamp(MIN_BINS, MAX_BINS)
}

pub fn build_histogram(races: &[Race], bin_seconds: f64) -> Histogram {
    histogram_from_entries(timed_races(races), bin_seconds)
}

pub fn histogram_from_entries(entries: Vec<TimedRace>, bin_seconds: f64) -> Histogram {
    let (Some(min), Some(max)) = (
        entries.iter().map(|e| e.time).min(),
        entries.iter().map(|e| e.time).max(),
    ) else {
        return Histogram {
            bin_size_ms: bin_size_ms(bin_seconds),
            ..Histogram::default()
        };
    };

    let bin_size = bin_size_ms(bin_seconds);
    let range = bin_size.max(max as f64 - min as f64);
    let count = bin_count(range, bin_size);

    let mut bins: Vec<HistogramBin> = (0..count)
        .map(|i| {
            let start = min as f64 + i as f64 * bin_size;
            HistogramBin {
                index: i,
                start,
                end: start + bin_size,
                entries: Vec::new(),
            }
        })
        .collect();

    for entry in entries {
        let idx = bin_index(entry.time, min, bin_size, count);
        bins[idx].entries.push(entry);
    }

    tracing::debug!(
        "Built histogram: {} bins of {} ms starting at {} ms",
        count,
        bin_size,
        min
    );

    Histogram {
        start: min,
        bin_size_ms: bin_size,
        range,
        bins,
    }
}

fn bin_index(time: Millis, min: Millis, bin_size: f64, count: usize) -> usize {
    let raw = ((time as f64 - min as f64) / bin_size).floor();
    if raw <= 0.0 {
        0
    } else {
        // 超出範圍的值落在最後一格
        (raw as usize).min(count - 1)
    }
}
