//! # Entag
//!
//! Entity extraction and normalization engine for plain-text documents.
//! Scans a document for typed entities (people, organizations, places, dates,
//! money, measurements, phone numbers, regulatory citations, percentages,
//! URLs), deduplicates and canonicalizes them, resolves classification
//! conflicts, and rewrites the text with stable entity references while
//! preserving the original wording.
//!
//! ## Quick Start
//!
//! ```rust
//! use entag::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = ConfigBuilder::new().build()?;
//!     let context = ExtractionContext::new(config)?;
//!
//!     let report = context.process_document(
//!         "OSHA requires guardrails within 30 feet (9.1 meters). Call (800) 321-6742.",
//!     )?;
//!
//!     // Tags preserve the original wording; converted values live in metadata.
//!     assert!(report.tagged_text.contains("||30 feet||"));
//!     for entity in &report.entities {
//!         println!("{} -> {}", entity.id, entity.normalized);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Matchers**: a gazetteer automaton and a fixed compiled pattern table,
//!   built once into an immutable [`ExtractionContext`] and shared read-only
//!   across documents.
//! - **Canonicalizer**: per-type normalization (unit conversion, phone
//!   formatting, date arithmetic, currency parsing, citation decomposition)
//!   with deterministic conflict resolution for competing classifications.
//! - **Tagger**: offset-safe single-pass rewriting; the non-replaced text is
//!   byte-for-byte identical to the source.
//!
//! Processing is stateless across documents: entity ids are per-type
//! sequences scoped to a single call and never global keys.

pub mod canonical;
pub mod config;
pub mod dictionary;
pub mod engine;
pub mod gazetteer;
pub mod logging;
pub mod overlap;
pub mod patterns;
pub mod report;
pub mod tagger;
pub mod types;

/// The prelude re-exports commonly used types for convenience
pub mod prelude {
    pub use crate::config::{ConfigBuilder, ConfigLoader, EngineConfig, LogFormat, LogLevel};
    pub use crate::engine::ExtractionContext;
    pub use crate::gazetteer::{Gazetteer, GazetteerEntry};
    pub use crate::report::{ExtractionReport, ExtractionSummary};
    pub use crate::types::{
        CanonicalEntity, EntityMetadata, EntityType, Mention, RawMatch, Span,
    };
    pub use crate::{EntagError, Result};
}

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error type for engine operations
#[derive(Debug, thiserror::Error)]
pub enum EntagError {
    /// Configuration error, fatal at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Gazetteer loading or compilation error, fatal at startup
    #[error("Gazetteer error: {0}")]
    Gazetteer(#[from] gazetteer::GazetteerError),

    /// Logging setup error
    #[error("Logging error: {0}")]
    Logging(#[from] logging::LogError),

    /// A recorded mention span no longer matches the live text; processing
    /// aborts for this document rather than writing at wrong offsets
    #[error("Span integrity violation at {start}..{end}: expected {expected:?}")]
    SpanIntegrity {
        start: usize,
        end: usize,
        expected: String,
    },

    /// Text rewriting failed
    #[error("Tagging error: {0}")]
    Tagging(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for EntagError {
    fn from(err: config::ConfigError) -> Self {
        EntagError::Configuration(err.to_string())
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EntagError>;

/// Build a ready-to-use extraction context with default configuration.
///
/// Initializes logging per the default logging section; loading failures for
/// the gazetteer or pattern table are fatal here, at startup.
pub fn init_with_defaults() -> Result<engine::ExtractionContext> {
    let config = config::ConfigBuilder::defaults().build()?;
    init(config)
}

/// Build a ready-to-use extraction context with the provided configuration.
pub fn init(config: config::EngineConfig) -> Result<engine::ExtractionContext> {
    let _ = logging::init(&config.logging);
    engine::ExtractionContext::new(config)
}
