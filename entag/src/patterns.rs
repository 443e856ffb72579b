//! Pattern extractor: a fixed, ordered table of compiled structured patterns.
//!
//! One compiled pattern per subtype. Every numeric pattern anchors both the
//! numeral and the unit token with word boundaries and allows only whitespace
//! between them; a measurement can never match a bare number, and a unit can
//! never be pulled out of the middle of a word. Patterns are independent of
//! one another; overlapping subtype matches are legal and resolved downstream.

use regex::Regex;
use tracing::trace;

use crate::types::{PatternKind, RawMatch, Span};

/// Month-name date forms. Two-digit years are rejected rather than guessed.
const DATE_PATTERN: &str = r"\b(?:(?i:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s+\d{4}|\d{1,2}[/-]\d{1,2}[/-]\d{4}|\d{4}-\d{2}-\d{2})\b";

/// Month-name date ranges, captured whole so the canonicalizer can split them.
const DATE_RANGE_PATTERN: &str = r"\b((?i:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec))\.?\s+(\d{1,2})\s*(?:[-–—]|(?i:through|to))\s*(\d{1,2}),?\s+(\d{4})\b";

/// The fixed pattern table, compiled once per context.
///
/// Immutable after construction and shared read-only across documents.
#[derive(Debug)]
pub struct PatternSet {
    table: Vec<(PatternKind, Regex)>,
}

impl PatternSet {
    /// Compile the fixed pattern table.
    ///
    /// A compile failure here is a configuration defect and is fatal at
    /// startup, never per-document.
    pub fn new() -> Result<Self, regex::Error> {
        let definitions: &[(PatternKind, &str)] = &[
            (
                PatternKind::Regulation,
                r"(?i)\b(\d{1,2})\s+C\.?\s?F\.?\s?R\.?\s+(?:part\s+)?§?\s*(\d+)(?:\.(\d+))?\b",
            ),
            (
                PatternKind::Money,
                r"(?:[$€£¥]\s?\d+(?:,\d{3})*(?:\.\d+)?(?:\s?(?i:thousand|million|billion|trillion))?\b)|(?:\b\d+(?:,\d{3})*(?:\.\d+)?(?:\s?(?i:thousand|million|billion|trillion))?\s?(?i:USD|EUR|GBP|JPY|dollars|dollar|euros|euro|pounds|pound|yen)\b)",
            ),
            (PatternKind::DateRange, DATE_RANGE_PATTERN),
            (PatternKind::Date, DATE_PATTERN),
            (
                PatternKind::Time,
                r"\b(?:[01]?[0-9]|2[0-3]):[0-5][0-9](?:\s?(?i:AM|PM))?\b|\b(?:[1-9]|1[0-2])\s?(?i:AM|PM)\b",
            ),
            (
                PatternKind::Phone,
                r"\+?1?[-.\s]?\(?[2-9]\d{2}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b|\+\d{1,3}[-.\s]?\d{3,4}[-.\s]?\d{3}[-.\s]?\d{4}\b",
            ),
            (
                PatternKind::Email,
                r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
            ),
            (
                PatternKind::Url,
                r#"\bhttps?://[^\s<>()"']*[^\s<>()"'.,;:!?]|\bwww\.[^\s<>()"']*[^\s<>()"'.,;:!?]"#,
            ),
            (
                PatternKind::Length,
                r"(?i)\b(\d+(?:\.\d+)?)\s*(inches|inch|feet|foot|ft|yards|yard|yd|miles|mile|mi|millimeters|millimeter|mm|centimeters|centimeter|cm|kilometers|kilometer|km|meters|meter|metres|metre|m)\b",
            ),
            (
                PatternKind::Weight,
                r"(?i)\b(\d+(?:\.\d+)?)\s*(pounds|pound|lbs|lb|ounces|ounce|oz|kilograms|kilogram|kg|milligrams|milligram|mg|grams|gram|g|tonnes|tonne|tons|ton)\b",
            ),
            (
                PatternKind::Duration,
                r"(?i)\b(\d+(?:\.\d+)?)\s*(seconds|second|secs|sec|minutes|minute|mins|min|hours|hour|hrs|hr|days|day|weeks|week)\b",
            ),
            (
                PatternKind::Temperature,
                r"(-?\b\d+(?:\.\d+)?)\s*(?:°\s*([FCfc])\b|(?i:degrees?)\s+((?i:fahrenheit|celsius))\b)",
            ),
            (
                PatternKind::Volume,
                r"(?i)\b(\d+(?:\.\d+)?)\s*(fluid\s+ounces|fluid\s+ounce|fl\s*oz|gallons|gallon|gal|milliliters|milliliter|ml|liters|liter|litres|litre|l|quarts|quart|qt|pints|pint|pt)\b",
            ),
            (
                PatternKind::Percentage,
                r"\b(\d+(?:\.\d+)?)\s*(%|(?i:percent)\b)",
            ),
            // The capture group is the reported span; the digit anchors on
            // either side only establish that this indicator sits between
            // two numerals (the regex crate has no look-around).
            (
                PatternKind::RangeIndicator,
                r"(?i)[0-9]\s*((?:to|through)\b|[-–—])\s*[0-9]",
            ),
        ];

        let mut table = Vec::with_capacity(definitions.len());
        for (kind, pattern) in definitions {
            table.push((*kind, Regex::new(pattern)?));
        }
        Ok(Self { table })
    }

    /// Number of compiled subtype patterns.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Apply every subtype pattern to `text` and collect the raw matches.
    ///
    /// Output order follows the table, then offset; callers must not rely on
    /// mutual exclusivity between subtypes.
    pub fn find_matches(&self, text: &str) -> Vec<RawMatch> {
        let mut matches = Vec::new();

        for (kind, regex) in &self.table {
            for caps in regex.captures_iter(text) {
                // Range indicators report the indicator token alone, not the
                // digit anchors around it.
                let m = if *kind == PatternKind::RangeIndicator {
                    match caps.get(1) {
                        Some(m) => m,
                        None => continue,
                    }
                } else {
                    caps.get(0).expect("capture group 0 always participates")
                };

                // Separator classes can pull a leading space into the match
                // (phone forms); keep spans tight around the visible token.
                let leading = m.as_str().len() - m.as_str().trim_start().len();
                let trailing = m.as_str().len() - m.as_str().trim_end().len();
                let span = Span::new(m.start() + leading, m.end() - trailing);
                if span.is_empty() {
                    continue;
                }
                let surface = &text[span.start..span.end];
                trace!(subtype = kind.as_str(), start = span.start, text = surface, "pattern hit");
                matches.push(RawMatch::pattern(*kind, surface.to_string(), span));
            }
        }

        matches
    }
}
