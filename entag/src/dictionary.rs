//! Dictionary matcher: multi-pattern search over the gazetteer.
//!
//! Built once at process start from the loaded gazetteer and shared read-only
//! across documents. All overlapping hits at a span are returned; choosing
//! between competing classifications is the conflict resolver's job, not ours.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use tracing::trace;

use crate::gazetteer::{Gazetteer, GazetteerError};
use crate::types::{RawMatch, Span};

/// Case-insensitive multi-pattern matcher over gazetteer literals.
#[derive(Debug)]
pub struct DictionaryMatcher {
    automaton: AhoCorasick,
    gazetteer: Gazetteer,
}

impl DictionaryMatcher {
    /// Compile the gazetteer into an automaton.
    ///
    /// One-time initialization; the resulting matcher is immutable and may be
    /// shared across threads.
    pub fn new(gazetteer: Gazetteer) -> Result<Self, GazetteerError> {
        let literals: Vec<&str> = gazetteer.entries().iter().map(|e| e.literal.as_str()).collect();

        let automaton = AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .build(&literals)
            .map_err(|e| GazetteerError::Automaton(e.to_string()))?;

        Ok(Self {
            automaton,
            gazetteer,
        })
    }

    /// Number of compiled patterns.
    pub fn pattern_count(&self) -> usize {
        self.gazetteer.len()
    }

    /// Find every gazetteer occurrence in `text`.
    ///
    /// Word boundaries are enforced at match time: a hit whose first or last
    /// character adjoins an alphanumeric character is discarded, so a literal
    /// can never be pulled out of the middle of a longer word.
    pub fn find_matches(&self, text: &str) -> Vec<RawMatch> {
        let mut matches = Vec::new();

        for hit in self.automaton.find_overlapping_iter(text) {
            let span = Span::new(hit.start(), hit.end());
            if !is_word_bounded(text, &span) {
                continue;
            }

            let entry = &self.gazetteer.entries()[hit.pattern().as_usize()];
            trace!(
                literal = %entry.literal,
                subcategory = %entry.subcategory,
                start = span.start,
                "dictionary hit"
            );

            matches.push(RawMatch::dictionary(
                entry.entity_type,
                text[span.start..span.end].to_string(),
                span,
                entry.subcategory.clone(),
            ));
        }

        matches
    }
}

/// Check that a span starts and ends on word boundaries of the live text.
fn is_word_bounded(text: &str, span: &Span) -> bool {
    let before_ok = text[..span.start]
        .chars()
        .next_back()
        .is_none_or(|c| !c.is_alphanumeric());
    let after_ok = text[span.end..]
        .chars()
        .next()
        .is_none_or(|c| !c.is_alphanumeric());
    before_ok && after_ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityType;

    fn matcher() -> DictionaryMatcher {
        DictionaryMatcher::new(Gazetteer::builtin()).unwrap()
    }

    #[test]
    fn finds_case_insensitive_matches() {
        let matches = matcher().find_matches("inspections by osha and the EPA");
        let subcats: Vec<_> = matches.iter().filter_map(|m| m.subcategory.as_deref()).collect();
        assert_eq!(matches.len(), 2);
        assert!(subcats.iter().all(|s| *s == "government_agencies"));
        assert_eq!(matches[0].text, "osha");
        assert_eq!(matches[1].text, "EPA");
    }

    #[test]
    fn respects_word_boundaries() {
        // "Oregon" must not be pulled out of "Oregonian"; "India" not out of "Indiana".
        let matches = matcher().find_matches("An Oregonian newspaper");
        assert!(matches.is_empty());

        let matches = matcher().find_matches("moved to Indiana last year");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "Indiana");
    }

    #[test]
    fn returns_all_overlapping_classifications() {
        // "Georgia" is both a country and a US state; both candidates surface.
        let matches = matcher().find_matches("offices in Georgia");
        let subcats: Vec<_> = matches.iter().filter_map(|m| m.subcategory.as_deref()).collect();
        assert!(subcats.contains(&"countries"));
        assert!(subcats.contains(&"us_states"));
    }

    #[test]
    fn returns_nested_spans_for_later_resolution() {
        // "New York" (state) nests inside "New York City"; the overlap
        // pre-pass, not the matcher, picks the survivor.
        let matches = matcher().find_matches("headquartered in New York City");
        let texts: Vec<_> = matches.iter().map(|m| m.text.as_str()).collect();
        assert!(texts.contains(&"New York"));
        assert!(texts.contains(&"New York City"));
    }

    #[test]
    fn spans_index_the_live_text() {
        let text = "filed with the Department of Labor in Washington";
        for m in matcher().find_matches(text) {
            assert_eq!(&text[m.span.start..m.span.end], m.text);
            assert_eq!(m.entity_type, EntityType::Gpe);
        }
    }
}
