//! Configuration builder.
//!
//! Builder-pattern API for assembling an [`EngineConfig`] in code.

use std::path::Path;

use chrono::NaiveDate;

use super::{models::*, ConfigError, Result};

/// Builder for creating [`EngineConfig`] instances.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: EngineConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with default values.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Create a builder seeded with defaults (alias for `new`).
    pub fn defaults() -> Self {
        Self::new()
    }

    /// Add a gazetteer file to load in addition to earlier sources.
    pub fn with_gazetteer_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.gazetteer.paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable the compiled-in default gazetteer.
    pub fn with_builtin_gazetteer(mut self, enabled: bool) -> Self {
        self.config.gazetteer.use_builtin = enabled;
        self
    }

    /// Set the fiscal-year start month (1 = calendar-year accounting).
    pub fn with_fiscal_year_start_month(mut self, month: u32) -> Self {
        self.config.dates.fiscal_year_start_month = month;
        self
    }

    /// Pin the processing-time anchor used for past/future classification.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.config.dates.reference_date = Some(date);
        self
    }

    /// Set the log level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Set the log output format.
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.config.logging.format = format;
        self
    }

    /// Send log output to a file instead of stdout.
    pub fn with_log_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.logging.file = Some(path.as_ref().to_path_buf());
        self.config.logging.stdout = false;
        self
    }

    /// Validate and produce the configuration.
    pub fn build(self) -> Result<EngineConfig> {
        self.config
            .validate()
            .map_err(ConfigError::ValidationError)?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_defaults() {
        let config = ConfigBuilder::new().build().unwrap();
        assert!(config.gazetteer.use_builtin);
        assert_eq!(config.dates.fiscal_year_start_month, 1);
    }

    #[test]
    fn accumulates_gazetteer_files() {
        let config = ConfigBuilder::new()
            .with_gazetteer_file("a.json")
            .with_gazetteer_file("b.json")
            .build()
            .unwrap();
        assert_eq!(config.gazetteer.paths.len(), 2);
    }

    #[test]
    fn rejects_invalid_combinations_at_build_time() {
        let result = ConfigBuilder::new().with_fiscal_year_start_month(0).build();
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
