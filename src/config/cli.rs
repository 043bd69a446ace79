use crate::config::Settings;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "race-analyzer")]
#[command(about = "Log mini 4WD races and analyze first-place times")]
pub struct CliConfig {
    /// Path to the JSON race data file
    #[arg(long, global = true)]
    pub data: Option<String>,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create, inspect and delete groups
    #[command(subcommand)]
    Group(GroupCommand),

    /// Record, edit and delete races
    #[command(subcommand)]
    Race(RaceCommand),

    /// Share of past races an expected time would have won
    WinProb {
        group: String,
        /// Expected time, in seconds (12.34) or MM:SS.hh
        time: String,
    },

    /// First-place time distribution
    Histogram {
        group: String,
        /// Bin width in seconds
        #[arg(long)]
        bin_seconds: Option<f64>,
        /// Show the races inside one bin (0-based)
        #[arg(long)]
        bin: Option<usize>,
    },

    /// Write a group's races to CSV
    Export { group: String, output: PathBuf },
}

#[derive(Debug, Clone, Subcommand)]
pub enum GroupCommand {
    Create {
        name: String,
        /// Target probability for the group (0-1 or a percentage like 80%)
        #[arg(long)]
        target: Option<String>,
    },
    List,
    Show {
        group: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    Delete {
        group: String,
    },
    /// Set the target probability (presets: 70%, 80%, 90%)
    Target {
        group: String,
        probability: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum RaceCommand {
    Add {
        group: String,
        #[arg(short, long, default_value_t = 4)]
        participants: u32,
        #[arg(short, long, default_value_t = 0)]
        finishes: u32,
        /// First-place time in seconds (12.34) or MM:SS.hh
        #[arg(long, conflicts_with = "stopwatch")]
        time: Option<String>,
        /// Time the winner with an interactive stopwatch
        #[arg(long)]
        stopwatch: bool,
    },
    Edit {
        group: String,
        race: String,
        #[arg(short, long)]
        participants: Option<u32>,
        #[arg(short, long)]
        finishes: Option<u32>,
        #[arg(long)]
        time: Option<String>,
    },
    Delete {
        group: String,
        race: String,
    },
    List {
        group: String,
    },
}

impl CliConfig {
    /// 命令列參數優先於設定檔
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(data) = &self.data {
            settings.data_path = data.clone();
        }
        if self.log_json {
            settings.log_json = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_race_add() {
        let cli = CliConfig::parse_from([
            "race-analyzer",
            "--data",
            "/tmp/r.json",
            "race",
            "add",
            "club",
            "-p",
            "5",
            "-f",
            "2",
            "--time",
            "12.34",
        ]);

        assert_eq!(cli.data.as_deref(), Some("/tmp/r.json"));
        match cli.command {
            Command::Race(RaceCommand::Add {
                group,
                participants,
                finishes,
                time,
                stopwatch,
            }) => {
                assert_eq!(group, "club");
                assert_eq!(participants, 5);
                assert_eq!(finishes, 2);
                assert_eq!(time.as_deref(), Some("12.34"));
                assert!(!stopwatch);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_time_conflicts_with_stopwatch() {
        let result = CliConfig::try_parse_from([
            "race-analyzer",
            "race",
            "add",
            "club",
            "--time",
            "10",
            "--stopwatch",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_settings() {
        let cli = CliConfig::parse_from([
            "race-analyzer",
            "group",
            "list",
            "--data",
            "elsewhere.json",
            "--log-json",
        ]);
        let mut settings = Settings::default();
        cli.apply_to(&mut settings);

        assert_eq!(settings.data_path, "elsewhere.json");
        assert!(settings.log_json);
    }
}
