pub mod adapters;
#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::storage::JsonFileStorage;
pub use config::Settings;
pub use crate::core::estimator::{target_time, win_probability};
pub use crate::core::histogram::{build_histogram, Histogram};
pub use crate::core::ranking::{build_ranking, RankingEntry};
pub use crate::core::statistics::{compute_group_stats, GroupStats};
pub use crate::core::time_codec::{format_time, parse_seconds, quantize};
pub use domain::model::{AppState, Group, Millis, Race, RaceTiming};
pub use utils::error::{RaceError, Result};
