//! Output contract: everything downstream consumers persist as sidecar
//! metadata next to the tagged document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{CanonicalEntity, RawMatch};

/// The full result of processing one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// The source text with every mention replaced by an entity marker
    pub tagged_text: String,
    /// The consumed raw matches, grouped by entity type
    pub raw_matches: BTreeMap<String, Vec<RawMatch>>,
    /// Canonical entities in id-assignment order
    pub entities: Vec<CanonicalEntity>,
    /// Summary counts
    pub summary: ExtractionSummary,
}

/// Summary counts for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSummary {
    /// Raw matches consumed by canonicalization
    pub raw_match_count: usize,
    /// Matches discarded by the overlap pre-pass
    pub suppressed_overlaps: usize,
    /// Consumed raw matches per entity type
    pub matches_by_type: BTreeMap<String, usize>,
    /// Canonical entities per entity type
    pub entities_by_type: BTreeMap<String, usize>,
    /// Total canonical entities after deduplication
    pub entity_count: usize,
    /// Wall-clock processing time for the document
    pub processing_time_ms: u64,
}

impl ExtractionReport {
    /// Assemble a report from pipeline output.
    pub fn new(
        tagged_text: String,
        consumed: Vec<RawMatch>,
        entities: Vec<CanonicalEntity>,
        suppressed_overlaps: usize,
        processing_time_ms: u64,
    ) -> Self {
        let mut raw_matches: BTreeMap<String, Vec<RawMatch>> = BTreeMap::new();
        let mut matches_by_type: BTreeMap<String, usize> = BTreeMap::new();
        for m in consumed {
            let type_name = m.entity_type.as_str().to_string();
            *matches_by_type.entry(type_name.clone()).or_default() += 1;
            raw_matches.entry(type_name).or_default().push(m);
        }

        let mut entities_by_type: BTreeMap<String, usize> = BTreeMap::new();
        for entity in &entities {
            *entities_by_type
                .entry(entity.entity_type.as_str().to_string())
                .or_default() += 1;
        }

        let summary = ExtractionSummary {
            raw_match_count: raw_matches.values().map(Vec::len).sum(),
            suppressed_overlaps,
            matches_by_type,
            entities_by_type,
            entity_count: entities.len(),
            processing_time_ms,
        };

        Self {
            tagged_text,
            raw_matches,
            entities,
            summary,
        }
    }
}
