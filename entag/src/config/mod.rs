//! Configuration system for the extraction engine.
//!
//! Supports loading from files and environment variables with defaults and
//! validation. Configuration problems are fatal at startup, never
//! per-document.

mod builder;
mod loader;
mod models;

pub use builder::ConfigBuilder;
pub use loader::ConfigLoader;
pub use models::*;

/// Default configuration file names the loader will look for
pub const DEFAULT_CONFIG_FILES: &[&str] = &[
    "entag.toml",
    "entag.json",
    ".entag/config.toml",
    ".entag/config.json",
];

/// Environment variable prefix for engine configuration
pub const ENV_PREFIX: &str = "ENTAG_";

/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error occurred during file loading
    #[error("Failed to load configuration file: {0}")]
    FileLoadError(String),

    /// Error occurred during environment loading
    #[error("Failed to load environment variables: {0}")]
    EnvLoadError(String),

    /// Error occurred during validation
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// Error occurred during parsing
    #[error("Configuration parsing error: {0}")]
    ParseError(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
