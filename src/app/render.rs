//! Plain-text rendering of the computed analytics.

use crate::core::entries::TimedRace;
use crate::core::estimator::{is_preset, matching_preset, TARGET_PROB_PRESETS};
use crate::core::histogram::{Histogram, HistogramBin};
use crate::core::ranking::RankingEntry;
use crate::core::statistics::GroupStats;
use crate::core::time_codec::{format_millis, format_option, format_time};
use crate::domain::model::{Group, Millis, Race};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::io::{self, Write};

const BAR_WIDTH: usize = 40;

/// Everything shown on a group's detail page, also used for `--json` output.
#[derive(Debug, Serialize)]
pub struct GroupReport<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub created_at: Option<DateTime<Utc>>,
    pub target_prob: f64,
    pub target_time: Option<Millis>,
    pub stats: &'a GroupStats,
    pub ranking: &'a [RankingEntry],
}

fn local_time(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn percent(p: f64) -> String {
    format!("{}%", (p * 100.0).round() as i64)
}

pub fn group_list<W: Write>(out: &mut W, groups: &[&Group]) -> io::Result<()> {
    if groups.is_empty() {
        return writeln!(out, "No groups yet. Create one with `group create <name>`.");
    }
    for group in groups {
        writeln!(
            out,
            "{:<14} {:<24} races: {}",
            group.id,
            group.name,
            group.races.len()
        )?;
    }
    Ok(())
}

pub fn group_detail<W: Write>(out: &mut W, report: &GroupReport<'_>) -> io::Result<()> {
    let stats = report.stats;
    writeln!(out, "Group: {} ({})", report.name, report.id)?;
    if let Some(created) = &report.created_at {
        writeln!(out, "Created: {}", local_time(created))?;
    }
    writeln!(out)?;

    let completion = stats
        .completion_rate
        .map_or_else(|| "-".to_string(), |r| format!("{:.1}%", r * 100.0));
    let rows = [
        ("Races", stats.race_count.to_string()),
        ("Participants", stats.total_participants.to_string()),
        ("Finishers", stats.total_finishers.to_string()),
        ("Completion rate", completion),
        ("Mean first time", format_option(stats.mean)),
        ("Median", format_option(stats.median)),
        ("Std deviation", format_option(stats.stddev)),
        ("Best", format_option(stats.best.map(|t| t as f64))),
        ("Worst", format_option(stats.worst.map(|t| t as f64))),
    ];
    for (label, value) in rows {
        writeln!(out, "  {:<18}{}", label, value)?;
    }

    let active = matching_preset(report.target_prob);
    let mut presets: Vec<String> = TARGET_PROB_PRESETS
        .iter()
        .map(|&p| {
            if active == Some(p) {
                format!("[{}]", percent(p))
            } else {
                percent(p)
            }
        })
        .collect();
    if !is_preset(report.target_prob) {
        presets.push(format!("[custom {}]", percent(report.target_prob)));
    }
    writeln!(
        out,
        "  {:<18}{}   {}",
        format!("Target ({})", percent(report.target_prob)),
        format_option(report.target_time.map(|t| t as f64)),
        presets.join(" ")
    )?;

    writeln!(out)?;
    ranking(out, report.ranking)
}

pub fn ranking<W: Write>(out: &mut W, entries: &[RankingEntry]) -> io::Result<()> {
    writeln!(out, "Best times")?;
    if entries.is_empty() {
        return writeln!(
            out,
            "  No ranking yet (needs a finished race with a first-place time)"
        );
    }
    for entry in entries {
        writeln!(
            out,
            "  #{:<3} {}  {}",
            entry.position,
            format_millis(entry.time),
            local_time(&entry.raced_at)
        )?;
    }
    Ok(())
}

pub fn race_list<W: Write>(out: &mut W, races: &[&Race]) -> io::Result<()> {
    if races.is_empty() {
        return writeln!(out, "No races recorded.");
    }
    for race in races {
        writeln!(
            out,
            "{:<14} {}  participants: {} finishers: {}  best: {}",
            race.id,
            local_time(&race.created_at),
            race.participants,
            race.finishes,
            format_option(race.first_place_time().map(|t| t as f64))
        )?;
    }
    Ok(())
}

pub fn summary_line<W: Write>(out: &mut W, stats: &GroupStats) -> io::Result<()> {
    writeln!(
        out,
        "count: {} mean: {} median: {} σ: {} best: {} worst: {}",
        stats.sample.len(),
        format_option(stats.mean),
        format_option(stats.median),
        format_option(stats.stddev),
        format_option(stats.best.map(|t| t as f64)),
        format_option(stats.worst.map(|t| t as f64)),
    )
}

pub fn histogram<W: Write>(out: &mut W, hist: &Histogram) -> io::Result<()> {
    if hist.is_empty() {
        return writeln!(
            out,
            "No data (needs finished races with a first-place time)"
        );
    }

    let max = hist.max_count().max(1);
    for bin in &hist.bins {
        let len = bin.count() * BAR_WIDTH / max;
        writeln!(
            out,
            "{:>2} {} - {} | {:<width$} {}",
            bin.index,
            format_time(bin.start),
            format_time(bin.end),
            "#".repeat(len),
            bin.count(),
            width = BAR_WIDTH
        )?;
    }

    let (from, to) = hist.span();
    writeln!(
        out,
        "axis: {} .. {} .. {}",
        format_time(from),
        format_time((from + to) / 2.0),
        format_time(to)
    )
}

pub fn bin_detail<W: Write>(out: &mut W, bin: &HistogramBin) -> io::Result<()> {
    writeln!(
        out,
        "Range: {} - {} ({} races)",
        format_time(bin.start),
        format_time(bin.end),
        bin.count()
    )?;
    let entries: Vec<&TimedRace> = bin.entries_by_time();
    if entries.is_empty() {
        return writeln!(out, "  No races in this range");
    }
    for entry in entries {
        writeln!(
            out,
            "  {}  participants: {} finishers: {}  {}",
            local_time(&entry.raced_at),
            entry.participants,
            entry.finishes,
            format_millis(entry.time)
        )?;
    }
    Ok(())
}

pub fn win_probability<W: Write>(
    out: &mut W,
    candidate: Millis,
    probability: Option<f64>,
    sample_size: usize,
) -> io::Result<()> {
    match probability {
        Some(p) => writeln!(
            out,
            "Expected time {} would have won {:.1}% of {} recorded races",
            format_millis(candidate),
            p * 100.0,
            sample_size
        ),
        None => writeln!(
            out,
            "Expected time {}: win probability -",
            format_millis(candidate)
        ),
    }
}
