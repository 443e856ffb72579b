//! Configuration model definitions.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Main configuration structure for the extraction engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Gazetteer sources
    pub gazetteer: GazetteerConfig,

    /// Date normalization behavior
    pub dates: DateConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Validate the configuration, returning an error message if invalid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(1..=12).contains(&self.dates.fiscal_year_start_month) {
            return Err(format!(
                "fiscal_year_start_month must be 1-12, got {}",
                self.dates.fiscal_year_start_month
            ));
        }
        if !self.gazetteer.use_builtin && self.gazetteer.paths.is_empty() {
            return Err(
                "gazetteer has no sources: builtin disabled and no files configured".to_string(),
            );
        }
        Ok(())
    }
}

/// Where gazetteer entries come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GazetteerConfig {
    /// Whether to include the compiled-in default entries
    pub use_builtin: bool,
    /// Additional gazetteer files (JSON arrays of entries), loaded in order
    pub paths: Vec<PathBuf>,
}

impl Default for GazetteerConfig {
    fn default() -> Self {
        Self {
            use_builtin: true,
            paths: Vec::new(),
        }
    }
}

/// Date normalization behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DateConfig {
    /// Month the fiscal year starts in (1 = calendar-year accounting).
    /// Dates on or after this month roll into the fiscal year labeled by the
    /// ending calendar year.
    pub fiscal_year_start_month: u32,
    /// Fixed processing-time anchor for past/future classification.
    /// Defaults to the current date at processing time when unset.
    pub reference_date: Option<NaiveDate>,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            fiscal_year_start_month: 1,
            reference_date: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum level to emit
    pub level: LogLevel,
    /// Output format
    pub format: LogFormat,
    /// Whether to log to stdout
    pub stdout: bool,
    /// Optional log file path; takes precedence over stdout when set
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            stdout: true,
            file: None,
        }
    }
}

/// Log severity levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by the env-filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Log output formats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}
