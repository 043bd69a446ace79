use crate::utils::error::{RaceError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub ranking_size: Option<usize>,
    pub histogram_bin_seconds: Option<f64>,
    pub default_target_prob: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RaceError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RaceError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${HOME})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RaceError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        use crate::utils::validation::*;

        if let Some(path) = &self.storage.path {
            validate_path("storage.path", path)?;
        }

        if let Some(size) = self.analysis.ranking_size {
            validate_positive_number("analysis.ranking_size", size, 1)?;
        }

        if let Some(bin) = self.analysis.histogram_bin_seconds {
            validate_bin_seconds("analysis.histogram_bin_seconds", bin)?;
        }

        if let Some(prob) = self.analysis.default_target_prob {
            validate_target_probability("analysis.default_target_prob", prob)?;
        }

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level) {
                return Err(RaceError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[storage]
path = "./data/races.json"

[analysis]
ranking_size = 5
histogram_bin_seconds = 0.25
default_target_prob = 0.9

[logging]
level = "debug"
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.storage.path.as_deref(), Some("./data/races.json"));
        assert_eq!(config.analysis.ranking_size, Some(5));
        assert_eq!(config.analysis.histogram_bin_seconds, Some(0.25));
        assert_eq!(config.analysis.default_target_prob, Some(0.9));
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.log_json());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config, TomlConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RACE_ANALYZER_TEST_DIR", "/tmp/race-test");

        let config = TomlConfig::from_toml_str(
            r#"
[storage]
path = "${RACE_ANALYZER_TEST_DIR}/races.json"
"#,
        )
        .unwrap();

        assert_eq!(
            config.storage.path.as_deref(),
            Some("/tmp/race-test/races.json")
        );
    }

    #[test]
    fn test_unknown_env_var_left_in_place() {
        let config = TomlConfig::from_toml_str(
            r#"
[storage]
path = "${RACE_ANALYZER_SURELY_UNSET_VAR}/races.json"
"#,
        )
        .unwrap();
        assert_eq!(
            config.storage.path.as_deref(),
            Some("${RACE_ANALYZER_SURELY_UNSET_VAR}/races.json")
        );
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = TomlConfig::default();
        config.analysis.default_target_prob = Some(1.5);
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.analysis.ranking_size = Some(0);
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.analysis.histogram_bin_seconds = Some(0.0);
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.logging = Some(LoggingConfig {
            level: Some("loud".to_string()),
            json: None,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[analysis\nranking_size = ").unwrap_err();
        assert!(matches!(err, RaceError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\nranking_size = 3").unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.analysis.ranking_size, Some(3));
    }
}
