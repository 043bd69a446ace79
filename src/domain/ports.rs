use crate::domain::model::AppState;
use crate::utils::error::Result;
use std::time::Duration;

/// Durable home of the application state. Callers drive an explicit
/// load -> compute -> save cycle; nothing is cached between calls.
pub trait Storage: Send + Sync {
    fn load(&self) -> Result<AppState>;
    fn save(&self, state: &AppState) -> Result<()>;
}

/// Monotonic time source for the stopwatch.
pub trait Clock {
    /// Time elapsed since an arbitrary, fixed origin.
    fn now(&self) -> Duration;
}

pub trait ConfigProvider: Send + Sync {
    fn data_path(&self) -> &str;
    fn ranking_size(&self) -> usize;
    fn histogram_bin_seconds(&self) -> f64;
    fn default_target_prob(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}
