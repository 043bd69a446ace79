pub mod entries;
pub mod estimator;
pub mod export;
pub mod histogram;
pub mod ranking;
pub mod statistics;
pub mod stopwatch;
pub mod time_codec;

pub use crate::domain::model::{AppState, Group, Millis, Race, RaceTiming};
pub use crate::domain::ports::{Clock, ConfigProvider, Storage};
pub use crate::utils::error::Result;
