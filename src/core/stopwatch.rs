//! Start/stop stopwatch over an injectable [`Clock`].
//!
//! The stopwatch never schedules anything itself; whoever displays it polls
//! [`Stopwatch::elapsed`] at whatever rate suits them.

use crate::core::time_codec::quantize;
use crate::domain::model::Millis;
use crate::domain::ports::Clock;
use std::time::{Duration, Instant};

/// [`Clock`] backed by `std::time::Instant`.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[derive(Debug)]
pub struct Stopwatch<C: Clock = MonotonicClock> {
    clock: C,
    started_at: Option<Duration>,
    accumulated: Duration,
}

impl<C: Clock> Stopwatch<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            started_at: None,
            accumulated: Duration::ZERO,
        }
    }

    /// Starts or resumes. No-op while already running.
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(self.clock.now());
        }
    }

    /// Freezes the elapsed time. No-op while stopped.
    pub fn stop(&mut self) {
        if let Some(started) = self.started_at.take() {
            self.accumulated += self.clock.now().saturating_sub(started);
        }
    }

    pub fn reset(&mut self) {
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started) => self.accumulated + self.clock.now().saturating_sub(started),
            None => self.accumulated,
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }

    /// Elapsed time quantized to the recording resolution.
    pub fn capture(&self) -> Millis {
        quantize(self.elapsed_ms())
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct ManualClock(Cell<Duration>);

    impl ManualClock {
        fn advance(&self, ms: u64) {
            self.0.set(self.0.get() + Duration::from_millis(ms));
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Duration {
            self.0.get()
        }
    }

    #[test]
    fn test_elapsed_tracks_running_time() {
        let clock = ManualClock::default();
        clock.advance(5_000);
        let mut sw = Stopwatch::new(&clock);
        assert_eq!(sw.elapsed(), Duration::ZERO);

        sw.start();
        clock.advance(1_234);
        assert!(sw.is_running());
        assert_eq!(sw.elapsed(), Duration::from_millis(1_234));

        sw.stop();
        clock.advance(10_000);
        assert!(!sw.is_running());
        assert_eq!(sw.elapsed(), Duration::from_millis(1_234));
        assert_eq!(sw.capture(), 1_230);
    }

    #[test]
    fn test_start_resumes_and_is_idempotent() {
        let clock = ManualClock::default();
        let mut sw = Stopwatch::new(&clock);

        sw.start();
        clock.advance(1_000);
        sw.start();
        clock.advance(500);
        sw.stop();
        sw.stop();
        assert_eq!(sw.elapsed(), Duration::from_millis(1_500));

        clock.advance(60_000);
        sw.start();
        clock.advance(250);
        assert_eq!(sw.elapsed(), Duration::from_millis(1_750));
    }

    #[test]
    fn test_reset_clears_state() {
        let clock = ManualClock::default();
        let mut sw = Stopwatch::new(&clock);
        sw.start();
        clock.advance(2_000);
        sw.reset();

        assert!(!sw.is_running());
        assert_eq!(sw.elapsed(), Duration::ZERO);
        assert_eq!(sw.capture(), 0);
    }

    #[test]
    fn test_monotonic_clock_advances() {
        let sw = {
            let mut sw = Stopwatch::new(MonotonicClock::new());
            sw.start();
            sw
        };
        std::thread::sleep(Duration::from_millis(5));
        assert!(sw.elapsed() >= Duration::from_millis(5));
    }
}
