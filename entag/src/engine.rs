//! The extraction engine: an immutable, process-wide context plus a
//! per-document pipeline.
//!
//! The context owns the compiled gazetteer automaton and pattern table. It is
//! built once at startup, passed explicitly (never a hidden global), and only
//! read afterwards, so any number of documents may be processed concurrently
//! against one context. Within a document the stages are strictly ordered;
//! only the two matchers run in parallel, sharing read-only state.

use std::time::Instant;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::canonical;
use crate::config::EngineConfig;
use crate::dictionary::DictionaryMatcher;
use crate::gazetteer::Gazetteer;
use crate::overlap;
use crate::patterns::PatternSet;
use crate::report::ExtractionReport;
use crate::tagger;
use crate::types::{PatternKind, RawMatch};
use crate::{EntagError, Result};

/// Immutable compiled state shared by every document-processing call.
#[derive(Debug)]
pub struct ExtractionContext {
    config: EngineConfig,
    dictionary: DictionaryMatcher,
    patterns: PatternSet,
}

impl ExtractionContext {
    /// Build a context from configuration, loading gazetteers per its
    /// gazetteer section. Any loading failure is fatal here, at startup.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate().map_err(EntagError::Configuration)?;
        let gazetteer =
            Gazetteer::load(config.gazetteer.use_builtin, &config.gazetteer.paths)?;
        Self::with_gazetteer(config, gazetteer)
    }

    /// Build a context around an already-loaded gazetteer.
    pub fn with_gazetteer(config: EngineConfig, gazetteer: Gazetteer) -> Result<Self> {
        config.validate().map_err(EntagError::Configuration)?;
        let dictionary = DictionaryMatcher::new(gazetteer)?;
        let patterns =
            PatternSet::new().map_err(|e| EntagError::Configuration(e.to_string()))?;

        info!(
            gazetteer_entries = dictionary.pattern_count(),
            subtype_patterns = patterns.len(),
            "extraction context ready"
        );

        Ok(Self {
            config,
            dictionary,
            patterns,
        })
    }

    /// The configuration this context was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline over one document.
    ///
    /// Stateless across calls: every entity and id is fresh per document, and
    /// each stage produces immutable output consumed wholesale by the next.
    pub fn process_document(&self, text: &str) -> Result<ExtractionReport> {
        let started = Instant::now();

        // The two matchers have no dependency on each other and share only
        // read-only state.
        let (dictionary_matches, pattern_matches) = rayon::join(
            || self.dictionary.find_matches(text),
            || self.patterns.find_matches(text),
        );
        debug!(
            dictionary = dictionary_matches.len(),
            pattern = pattern_matches.len(),
            "matcher passes complete"
        );

        let mut merged: Vec<RawMatch> = dictionary_matches;
        merged.extend(pattern_matches);

        // Range indicators are side-channel annotations for the range join;
        // they never become entities and never compete for spans.
        let (indicators, taggable): (Vec<RawMatch>, Vec<RawMatch>) = merged
            .into_iter()
            .partition(|m| m.subtype == Some(PatternKind::RangeIndicator));

        let resolution = overlap::resolve_overlaps(taggable);
        let suppressed = resolution.suppressed;

        let output = canonical::canonicalize(
            resolution.kept,
            &indicators,
            text,
            self.reference_date(),
            self.config.dates.fiscal_year_start_month,
        );

        let tagged_text = tagger::tag_text(text, &output.entities)?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let report = ExtractionReport::new(
            tagged_text,
            output.consumed,
            output.entities,
            suppressed,
            elapsed_ms,
        );
        info!(
            raw_matches = report.summary.raw_match_count,
            entities = report.summary.entity_count,
            suppressed,
            elapsed_ms,
            "document processed"
        );

        Ok(report)
    }

    /// Processing-time anchor for relative date classification.
    fn reference_date(&self) -> NaiveDate {
        self.config
            .dates
            .reference_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    fn context() -> ExtractionContext {
        let config = ConfigBuilder::new()
            .with_reference_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .build()
            .unwrap();
        ExtractionContext::new(config).unwrap()
    }

    #[test]
    fn processes_a_document_end_to_end() {
        let report = context()
            .process_document("OSHA requires guardrails within 30 feet (9.1 meters).")
            .unwrap();
        assert!(report.summary.entity_count >= 3);
        assert!(report.tagged_text.contains("||30 feet||"));
        assert!(report.tagged_text.contains("||OSHA||"));
    }

    #[test]
    fn empty_documents_produce_empty_reports() {
        let report = context().process_document("").unwrap();
        assert_eq!(report.summary.raw_match_count, 0);
        assert_eq!(report.summary.entity_count, 0);
        assert_eq!(report.tagged_text, "");
    }

    #[test]
    fn repeated_processing_is_stateless() {
        let context = context();
        let first = context.process_document("contact John Smith").unwrap();
        let second = context.process_document("contact John Smith").unwrap();
        let ids = |r: &ExtractionReport| -> Vec<String> {
            r.entities.iter().map(|e| e.id.clone()).collect()
        };
        assert_eq!(ids(&first), ids(&second));
    }
}
