//! One load -> mutate/compute -> save cycle per CLI command.

use crate::app::render::{self, GroupReport};
use crate::app::stopwatch_session::run_stopwatch;
use crate::config::cli::{Command, GroupCommand, RaceCommand};
use crate::config::Settings;
use crate::core::entries::first_place_sample;
use crate::core::estimator::{target_time, win_probability};
use crate::core::export::export_races_csv;
use crate::core::histogram::build_histogram;
use crate::core::ranking::build_ranking;
use crate::core::statistics::compute_group_stats;
use crate::core::stopwatch::{MonotonicClock, Stopwatch};
use crate::core::time_codec::{format_millis, parse_seconds};
use crate::domain::model::Millis;
use crate::domain::ports::{ConfigProvider, Storage};
use crate::domain::services::{self, RaceDraft, RaceEdit};
use crate::utils::error::{RaceError, Result};
use crate::utils::validation::validate_bin_seconds;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

const STOPWATCH_TICK: Duration = Duration::from_millis(50);

pub struct App<S: Storage> {
    storage: S,
    settings: Settings,
}

impl<S: Storage> App<S> {
    pub fn new(storage: S, settings: Settings) -> Self {
        Self { storage, settings }
    }

    pub async fn run<W: Write>(&self, command: Command, out: &mut W) -> Result<()> {
        match command {
            Command::Group(cmd) => self.run_group(cmd, out),
            Command::Race(cmd) => self.run_race(cmd, out).await,
            Command::WinProb { group, time } => self.win_prob(&group, &time, out),
            Command::Histogram {
                group,
                bin_seconds,
                bin,
            } => self.histogram(&group, bin_seconds, bin, out),
            Command::Export { group, output } => self.export(&group, &output, out),
        }
    }

    fn run_group<W: Write>(&self, command: GroupCommand, out: &mut W) -> Result<()> {
        let mut state = self.storage.load()?;

        match command {
            GroupCommand::Create { name, target } => {
                let target_prob = match target {
                    Some(text) => parse_probability(&text)?,
                    None => self.settings.default_target_prob(),
                };
                let id = services::create_group(&mut state, &name, target_prob)?;
                self.storage.save(&state)?;
                tracing::info!("Created group '{}' ({})", name.trim(), id);
                writeln!(out, "Created group {} ({})", name.trim(), id)?;
            }
            GroupCommand::List => {
                render::group_list(out, &services::list_groups(&state))?;
            }
            GroupCommand::Show { group, json } => {
                let group = services::find_group(&state, &group)?;
                let stats = compute_group_stats(&group.races);
                let ranking = build_ranking(&group.races, self.settings.ranking_size());
                let report = GroupReport {
                    id: &group.id,
                    name: &group.name,
                    created_at: group.created_at,
                    target_prob: group.target_prob,
                    target_time: target_time(&stats.sample, group.target_prob),
                    stats: &stats,
                    ranking: &ranking,
                };
                if json {
                    serde_json::to_writer_pretty(&mut *out, &report)?;
                    writeln!(out)?;
                } else {
                    render::group_detail(out, &report)?;
                }
            }
            GroupCommand::Delete { group } => {
                let id = services::find_group(&state, &group)?.id.clone();
                let removed = services::delete_group(&mut state, &id)?;
                self.storage.save(&state)?;
                tracing::info!("Deleted group '{}' ({})", removed.name, id);
                writeln!(
                    out,
                    "Deleted group {} and its {} races",
                    removed.name,
                    removed.races.len()
                )?;
            }
            GroupCommand::Target { group, probability } => {
                let p = parse_probability(&probability)?;
                let id = services::find_group(&state, &group)?.id.clone();
                services::set_target_prob(&mut state, &id, p)?;
                self.storage.save(&state)?;
                writeln!(out, "Target probability set to {:.0}%", p * 100.0)?;
            }
        }
        Ok(())
    }

    async fn run_race<W: Write>(&self, command: RaceCommand, out: &mut W) -> Result<()> {
        let mut state = self.storage.load()?;

        match command {
            RaceCommand::Add {
                group,
                participants,
                finishes,
                time,
                stopwatch,
            } => {
                let group_id = services::find_group(&state, &group)?.id.clone();
                let first_time_ms = if stopwatch && finishes > 0 {
                    Some(capture_with_stopwatch().await?)
                } else {
                    time.as_deref().map(parse_time).transpose()?
                };

                let race_id = services::add_race(
                    &mut state,
                    &group_id,
                    RaceDraft {
                        participants,
                        finishes,
                        first_time_ms,
                    },
                )?;
                self.storage.save(&state)?;
                tracing::info!("Recorded race {} in group {}", race_id, group_id);
                writeln!(out, "Recorded race {}", race_id)?;
            }
            RaceCommand::Edit {
                group,
                race,
                participants,
                finishes,
                time,
            } => {
                let group_id = services::find_group(&state, &group)?.id.clone();
                let edit = RaceEdit {
                    participants,
                    finishes,
                    first_time_ms: time.as_deref().map(parse_time).transpose()?,
                };
                services::edit_race(&mut state, &group_id, &race, edit)?;
                self.storage.save(&state)?;
                writeln!(out, "Updated race {}", race)?;
            }
            RaceCommand::Delete { group, race } => {
                let group_id = services::find_group(&state, &group)?.id.clone();
                services::delete_race(&mut state, &group_id, &race)?;
                self.storage.save(&state)?;
                writeln!(out, "Deleted race {}", race)?;
            }
            RaceCommand::List { group } => {
                let group = services::find_group(&state, &group)?;
                render::race_list(out, &services::races_newest_first(group))?;
            }
        }
        Ok(())
    }

    fn win_prob<W: Write>(&self, group: &str, time: &str, out: &mut W) -> Result<()> {
        let state = self.storage.load()?;
        let group = services::find_group(&state, group)?;
        let candidate = parse_time(time)?;

        let sample = first_place_sample(&group.races);
        let probability = win_probability(&sample, candidate as f64);
        render::win_probability(out, candidate, probability, sample.len())?;
        Ok(())
    }

    fn histogram<W: Write>(
        &self,
        group: &str,
        bin_seconds: Option<f64>,
        bin: Option<usize>,
        out: &mut W,
    ) -> Result<()> {
        let bin_seconds = bin_seconds.unwrap_or(self.settings.histogram_bin_seconds());
        validate_bin_seconds("bin_seconds", bin_seconds)?;

        let state = self.storage.load()?;
        let group = services::find_group(&state, group)?;
        let stats = compute_group_stats(&group.races);
        let hist = build_histogram(&group.races, bin_seconds);

        writeln!(out, "{}", group.name)?;
        render::summary_line(out, &stats)?;
        render::histogram(out, &hist)?;

        if let Some(index) = bin {
            let selected = hist.bin(index).ok_or_else(|| {
                RaceError::validation(format!(
                    "bin {} does not exist ({} bins)",
                    index,
                    hist.bins.len()
                ))
            })?;
            writeln!(out)?;
            render::bin_detail(out, selected)?;
        }
        Ok(())
    }

    fn export<W: Write>(&self, group: &str, output: &Path, out: &mut W) -> Result<()> {
        let state = self.storage.load()?;
        let group = services::find_group(&state, group)?;
        let rows = export_races_csv(group, output)?;
        writeln!(out, "Wrote {} races to {}", rows, output.display())?;
        Ok(())
    }
}

async fn capture_with_stopwatch() -> Result<Millis> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let time = run_stopwatch(
        stdin,
        std::io::stderr(),
        Stopwatch::new(MonotonicClock::new()),
        STOPWATCH_TICK,
    )
    .await?;
    tracing::debug!("Captured first-place time {}", format_millis(time));
    Ok(time)
}

pub fn parse_time(text: &str) -> Result<Millis> {
    parse_seconds(text).ok_or_else(|| {
        RaceError::validation(format!(
            "'{}' is not a valid time; use seconds (12.34) or MM:SS.hh",
            text
        ))
    })
}

/// Accepts `0.8`, `80%` or `80`.
pub fn parse_probability(text: &str) -> Result<f64> {
    let text = text.trim();
    let (number, is_percent) = match text.strip_suffix('%') {
        Some(number) => (number.trim(), true),
        None => (text, false),
    };
    let value: f64 = number
        .parse()
        .map_err(|_| RaceError::validation(format!("'{}' is not a probability", text)))?;

    let p = if is_percent || value > 1.0 {
        value / 100.0
    } else {
        value
    };
    crate::utils::validation::validate_target_probability("target_prob", p)?;
    Ok(p)
}
