#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::histogram::DEFAULT_BIN_SECONDS;
use crate::core::ranking::DEFAULT_RANKING_SIZE;
use crate::domain::model::DEFAULT_TARGET_PROB;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use toml_config::TomlConfig;

pub const DEFAULT_DATA_PATH: &str = "./race-analyzer.json";

/// Effective settings after merging defaults, the TOML file and CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_path: String,
    pub ranking_size: usize,
    pub histogram_bin_seconds: f64,
    pub default_target_prob: f64,
    pub log_level: Option<String>,
    pub log_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: DEFAULT_DATA_PATH.to_string(),
            ranking_size: DEFAULT_RANKING_SIZE,
            histogram_bin_seconds: DEFAULT_BIN_SECONDS,
            default_target_prob: DEFAULT_TARGET_PROB,
            log_level: None,
            log_json: false,
        }
    }
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            data_path: config.storage.path.clone().unwrap_or(defaults.data_path),
            ranking_size: config
                .analysis
                .ranking_size
                .unwrap_or(defaults.ranking_size),
            histogram_bin_seconds: config
                .analysis
                .histogram_bin_seconds
                .unwrap_or(defaults.histogram_bin_seconds),
            default_target_prob: config
                .analysis
                .default_target_prob
                .unwrap_or(defaults.default_target_prob),
            log_level: config.log_level().map(str::to_string),
            log_json: config.log_json(),
        }
    }
}

impl ConfigProvider for Settings {
    fn data_path(&self) -> &str {
        &self.data_path
    }

    fn ranking_size(&self) -> usize {
        self.ranking_size
    }

    fn histogram_bin_seconds(&self) -> f64 {
        self.histogram_bin_seconds
    }

    fn default_target_prob(&self) -> f64 {
        self.default_target_prob
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_path("data_path", &self.data_path)?;
        validate_positive_number("ranking_size", self.ranking_size, 1)?;
        validate_bin_seconds("histogram_bin_seconds", self.histogram_bin_seconds)?;
        validate_target_probability("default_target_prob", self.default_target_prob)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.ranking_size(), 10);
        assert_eq!(settings.histogram_bin_seconds(), 0.5);
        assert_eq!(settings.default_target_prob(), 0.8);
    }

    #[test]
    fn test_from_toml_overrides_defaults() {
        let config = TomlConfig::from_toml_str(
            r#"
[storage]
path = "/var/lib/races.json"

[analysis]
ranking_size = 3
"#,
        )
        .unwrap();
        let settings = Settings::from_toml(&config);

        assert_eq!(settings.data_path(), "/var/lib/races.json");
        assert_eq!(settings.ranking_size(), 3);
        assert_eq!(settings.histogram_bin_seconds(), DEFAULT_BIN_SECONDS);
        assert!(!settings.log_json);
    }
}
