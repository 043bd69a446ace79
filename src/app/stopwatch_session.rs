//! Interactive stopwatch: Enter starts, Enter stops.
//!
//! The display refresh is a plain tokio interval that polls the stopwatch;
//! the stopwatch itself knows nothing about it.

use crate::core::stopwatch::Stopwatch;
use crate::core::time_codec::{format_millis, format_time};
use crate::domain::model::Millis;
use crate::domain::ports::Clock;
use crate::utils::error::{RaceError, Result};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::MissedTickBehavior;

/// Runs one timing session and returns the captured, quantized time.
///
/// Input closing before the stopwatch is stopped cancels the session.
pub async fn run_stopwatch<R, W, C>(
    input: R,
    mut out: W,
    mut stopwatch: Stopwatch<C>,
    tick: Duration,
) -> Result<Millis>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    C: Clock,
{
    let mut lines = input.lines();

    writeln!(out, "Press Enter to start the stopwatch")?;
    if lines.next_line().await?.is_none() {
        return Err(RaceError::StopwatchCancelled);
    }
    stopwatch.start();
    tracing::debug!("Stopwatch started");
    writeln!(out, "Running... press Enter to stop")?;

    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            line = lines.next_line() => {
                match line? {
                    Some(_) => break,
                    None => return Err(RaceError::StopwatchCancelled),
                }
            }
            _ = interval.tick() => {
                write!(out, "\r{}", format_time(stopwatch.elapsed_ms()))?;
                out.flush()?;
            }
        }
    }

    stopwatch.stop();
    let captured = stopwatch.capture();
    writeln!(out, "\rRecorded: {}", format_millis(captured))?;
    tracing::debug!("Stopwatch stopped at {} ms", captured);
    Ok(captured)
}
