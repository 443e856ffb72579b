//! Gazetteer management: curated entity lists with subcategory labels.
//!
//! A gazetteer is loaded once at process start and never mutated afterward;
//! the dictionary matcher compiles it into an automaton and only reads it.

mod builtin;
mod loader;

pub use builtin::builtin_entries;
pub use loader::load_entries;

use serde::{Deserialize, Serialize};

use crate::types::EntityType;

/// Error type for gazetteer loading and validation.
///
/// All variants are fatal at startup; a document is never processed against
/// a partially loaded gazetteer.
#[derive(Debug, thiserror::Error)]
pub enum GazetteerError {
    /// Gazetteer file could not be read
    #[error("Failed to read gazetteer file {path}: {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },

    /// Gazetteer file is not valid UTF-8
    #[error("Gazetteer file {path} is not valid UTF-8")]
    InvalidEncoding { path: String },

    /// Gazetteer file could not be parsed
    #[error("Failed to parse gazetteer file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    /// An entry failed validation
    #[error("Invalid gazetteer entry {index}: {reason}")]
    InvalidEntry { index: usize, reason: String },

    /// The compiled automaton could not be built
    #[error("Failed to build gazetteer automaton: {0}")]
    Automaton(String),
}

/// One gazetteer entry: a literal with its type and subcategory label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GazetteerEntry {
    /// The literal to match, case-insensitively
    pub literal: String,
    /// Coarse entity type this literal belongs to
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Fine-grained classification, e.g. "us_states"
    pub subcategory: String,
}

impl GazetteerEntry {
    /// Create a new entry.
    pub fn new(literal: impl Into<String>, entity_type: EntityType, subcategory: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
            entity_type,
            subcategory: subcategory.into(),
        }
    }
}

/// Fixed priority weight for a subcategory, used by the conflict resolver.
///
/// Higher weight wins when one span falls into more than one gazetteer list;
/// ties are broken by gazetteer list order.
pub fn subcategory_weight(subcategory: &str) -> u8 {
    match subcategory {
        "government_agencies" => 10,
        "countries" => 6,
        "us_states" | "provinces" => 5,
        "major_cities" => 4,
        "international_organizations" => 3,
        "regions" => 2,
        _ => 1,
    }
}

/// Political or geographic level implied by a subcategory.
pub fn subcategory_level(subcategory: &str) -> &'static str {
    match subcategory {
        "government_agencies" => "agency",
        "countries" => "country",
        "us_states" | "provinces" => "state",
        "major_cities" => "city",
        "international_organizations" => "organization",
        "regions" => "region",
        "landmarks" => "landmark",
        _ => "other",
    }
}

/// An immutable, validated collection of gazetteer entries.
///
/// Entry order is preserved: it is the deterministic tie-breaker for
/// conflicting classifications.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    entries: Vec<GazetteerEntry>,
}

impl Gazetteer {
    /// Build a gazetteer from already-validated entries.
    pub fn new(entries: Vec<GazetteerEntry>) -> Result<Self, GazetteerError> {
        for (index, entry) in entries.iter().enumerate() {
            if entry.literal.trim().is_empty() {
                return Err(GazetteerError::InvalidEntry {
                    index,
                    reason: "empty literal".to_string(),
                });
            }
            match entry.entity_type {
                EntityType::Person
                | EntityType::Organization
                | EntityType::Gpe
                | EntityType::Location => {}
                other => {
                    return Err(GazetteerError::InvalidEntry {
                        index,
                        reason: format!("type {other} is pattern-matched, not dictionary-matched"),
                    });
                }
            }
        }
        Ok(Self { entries })
    }

    /// The compiled-in default gazetteer.
    pub fn builtin() -> Self {
        // Builtin entries are validated by construction.
        Self {
            entries: builtin_entries(),
        }
    }

    /// Load a gazetteer from the builtin set plus zero or more JSON files.
    ///
    /// File entries are appended after the builtin set so user lists lose
    /// order-based ties against the curated defaults only when weights tie.
    pub fn load<P: AsRef<std::path::Path>>(
        use_builtin: bool,
        paths: &[P],
    ) -> Result<Self, GazetteerError> {
        let mut entries = if use_builtin {
            builtin_entries()
        } else {
            Vec::new()
        };
        for path in paths {
            entries.extend(load_entries(path.as_ref())?);
        }
        Self::new(entries)
    }

    /// All entries, in load order.
    pub fn entries(&self) -> &[GazetteerEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the gazetteer is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_literals() {
        let entries = vec![GazetteerEntry::new("  ", EntityType::Gpe, "countries")];
        assert!(matches!(
            Gazetteer::new(entries),
            Err(GazetteerError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn rejects_pattern_matched_types() {
        let entries = vec![GazetteerEntry::new("42 feet", EntityType::Measurement, "lengths")];
        assert!(matches!(
            Gazetteer::new(entries),
            Err(GazetteerError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn agency_outranks_country_outranks_state_outranks_city() {
        assert!(subcategory_weight("government_agencies") > subcategory_weight("countries"));
        assert!(subcategory_weight("countries") > subcategory_weight("us_states"));
        assert!(subcategory_weight("us_states") > subcategory_weight("major_cities"));
        assert!(subcategory_weight("major_cities") > subcategory_weight("surnames"));
    }

    #[test]
    fn builtin_gazetteer_is_valid() {
        let gazetteer = Gazetteer::builtin();
        assert!(!gazetteer.is_empty());
        Gazetteer::new(gazetteer.entries().to_vec()).unwrap();
    }
}
