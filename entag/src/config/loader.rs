//! Configuration loader.
//!
//! Merges configuration from defaults, files, and environment variables, in
//! that precedence order.

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};

use super::{models::*, ConfigError, Result, DEFAULT_CONFIG_FILES, ENV_PREFIX};

/// Configuration loader that handles loading from multiple sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    figment: Figment,
}

impl ConfigLoader {
    /// Create a new configuration loader seeded with default values.
    pub fn new() -> Self {
        let figment = Figment::new().merge(Serialized::defaults(EngineConfig::default()));
        Self { figment }
    }

    /// Load configuration from a file.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileLoadError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => {
                let figment = std::mem::take(&mut self.figment).merge(Toml::file(path));
                self.figment = figment;
            }
            Some("json") => {
                let figment = std::mem::take(&mut self.figment).merge(Json::file(path));
                self.figment = figment;
            }
            _ => {
                return Err(ConfigError::FileLoadError(format!(
                    "Unsupported file format: {}",
                    path.display()
                )));
            }
        }

        Ok(self)
    }

    /// Attempt to load from default configuration file locations.
    pub fn load_default_files(&mut self) -> &mut Self {
        for file in DEFAULT_CONFIG_FILES {
            let path = Path::new(file);
            if path.exists() {
                // Best effort: a malformed default file surfaces at extract().
                let _ = self.load_file(path);
            }
        }
        self
    }

    /// Merge `ENTAG_`-prefixed environment variables.
    pub fn load_env(&mut self) -> &mut Self {
        let figment =
            std::mem::take(&mut self.figment).merge(Env::prefixed(ENV_PREFIX).split("__"));
        self.figment = figment;
        self
    }

    /// Extract and validate the final configuration.
    pub fn extract(&self) -> Result<EngineConfig> {
        let config: EngineConfig = self
            .figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate().map_err(ConfigError::ValidationError)?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_extract_cleanly() {
        let config = ConfigLoader::new().extract().unwrap();
        assert!(config.gazetteer.use_builtin);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[dates]\nfiscal_year_start_month = 10").unwrap();

        let mut loader = ConfigLoader::new();
        loader.load_file(file.path()).unwrap();
        let config = loader.extract().unwrap();
        assert_eq!(config.dates.fiscal_year_start_month, 10);
    }

    #[test]
    fn missing_files_are_an_error() {
        let mut loader = ConfigLoader::new();
        assert!(matches!(
            loader.load_file("/nonexistent/entag.toml"),
            Err(ConfigError::FileLoadError(_))
        ));
    }

    #[test]
    fn invalid_merged_config_fails_extraction() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[dates]\nfiscal_year_start_month = 42").unwrap();

        let mut loader = ConfigLoader::new();
        loader.load_file(file.path()).unwrap();
        assert!(matches!(
            loader.extract(),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
