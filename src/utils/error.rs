use thiserror::Error;

#[derive(Error, Debug)]
pub enum RaceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Group not found: {query}")]
    GroupNotFound { query: String },

    #[error("Race not found: {race_id} (group {group_id})")]
    RaceNotFound { group_id: String, race_id: String },

    #[error("Stopwatch cancelled before a time was captured")]
    StopwatchCancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Storage,
    Configuration,
    Input,
    Lookup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RaceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorCategory::Storage
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. } | Self::StopwatchCancelled => ErrorCategory::Input,
            Self::GroupNotFound { .. } | Self::RaceNotFound { .. } => ErrorCategory::Lookup,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::StopwatchCancelled => ErrorSeverity::Low,
            Self::GroupNotFound { .. } | Self::RaceNotFound { .. } => ErrorSeverity::Medium,
            Self::ValidationError { .. }
            | Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError(e) => format!("Could not access the race data file: {}", e),
            Self::SerializationError(e) => format!("Race data could not be encoded: {}", e),
            Self::CsvError(e) => format!("Export failed: {}", e),
            Self::GroupNotFound { query } => format!("No group matches '{}'", query),
            Self::RaceNotFound { race_id, .. } => format!("No race with id '{}'", race_id),
            Self::StopwatchCancelled => "Stopwatch stopped without recording a time".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Storage => "Check that the data path exists and is writable",
            ErrorCategory::Configuration => "Review the configuration file and CLI flags",
            ErrorCategory::Input => {
                "Participants must be 1-5, finishers 0-participants, and a time is required when someone finished"
            }
            ErrorCategory::Lookup => "Run `group list` or `race list <group>` to see valid ids",
        }
    }
}

pub type Result<T> = std::result::Result<T, RaceError>;
