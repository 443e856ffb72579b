//! Core data model for entity extraction: spans, raw matches, and canonical entities.

use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` byte-offset range into the source text.
///
/// Offsets are always computed against exactly the text handed to the engine;
/// every consumer re-validates them against the live text before slicing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check whether two spans share at least one byte.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Check whether this span fully contains another.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Types of entities the engine can detect.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Person names (e.g., "John Smith")
    Person,
    /// Organizations (e.g., "Acme Corporation")
    Organization,
    /// Geopolitical entities (countries, states, cities, agencies)
    Gpe,
    /// Non-political geography (regions, landmarks)
    Location,
    /// Calendar dates
    Date,
    /// Times of day
    Time,
    /// Monetary amounts
    Money,
    /// Phone numbers
    Phone,
    /// Email addresses
    Email,
    /// URLs
    Url,
    /// Regulatory citations (e.g., "29 CFR 1910.132")
    Regulation,
    /// Measurements with units, including percentages
    Measurement,
}

impl EntityType {
    /// String representation used in reports and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "person",
            EntityType::Organization => "organization",
            EntityType::Gpe => "gpe",
            EntityType::Location => "location",
            EntityType::Date => "date",
            EntityType::Time => "time",
            EntityType::Money => "money",
            EntityType::Phone => "phone",
            EntityType::Email => "email",
            EntityType::Url => "url",
            EntityType::Regulation => "regulation",
            EntityType::Measurement => "measurement",
        }
    }

    /// Prefix used when assigning per-type sequential entity ids.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            EntityType::Person => "p",
            EntityType::Organization => "org",
            EntityType::Gpe => "gpe",
            EntityType::Location => "loc",
            EntityType::Date => "d",
            EntityType::Time => "t",
            EntityType::Money => "mon",
            EntityType::Phone => "ph",
            EntityType::Email => "em",
            EntityType::Url => "url",
            EntityType::Regulation => "reg",
            EntityType::Measurement => "meas",
        }
    }

    /// Whether tags for this type show the original surface text.
    ///
    /// Money and phone markers show a canonical form instead; everything else
    /// preserves the user's original wording verbatim.
    pub fn preserves_original(&self) -> bool {
        !matches!(self, EntityType::Money | EntityType::Phone)
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which matcher produced a raw match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// Gazetteer automaton
    Dictionary,
    /// Compiled structured pattern
    Pattern,
}

/// Structured-pattern subtypes, one compiled pattern per subtype.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Length measurements (feet, meters, ...)
    Length,
    /// Weight measurements (pounds, kilograms, ...)
    Weight,
    /// Time-span measurements (seconds, hours, ...)
    Duration,
    /// Temperatures (°F, degrees Celsius, ...)
    Temperature,
    /// Volume measurements (gallons, liters, ...)
    Volume,
    /// Percentages
    Percentage,
    /// Range indicators between two numerals (`to`, `through`, `-`)
    RangeIndicator,
    /// Monetary amounts
    Money,
    /// Single calendar dates
    Date,
    /// Month-name date ranges ("August 15-20, 2024")
    DateRange,
    /// Times of day
    Time,
    /// Phone numbers
    Phone,
    /// Email addresses
    Email,
    /// URLs
    Url,
    /// Regulatory citations
    Regulation,
}

impl PatternKind {
    /// String representation used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::Length => "length",
            PatternKind::Weight => "weight",
            PatternKind::Duration => "duration",
            PatternKind::Temperature => "temperature",
            PatternKind::Volume => "volume",
            PatternKind::Percentage => "percentage",
            PatternKind::RangeIndicator => "range_indicator",
            PatternKind::Money => "money",
            PatternKind::Date => "date",
            PatternKind::DateRange => "date_range",
            PatternKind::Time => "time",
            PatternKind::Phone => "phone",
            PatternKind::Email => "email",
            PatternKind::Url => "url",
            PatternKind::Regulation => "regulation",
        }
    }

    /// The coarse entity type this subtype reports under.
    pub fn entity_type(&self) -> EntityType {
        match self {
            PatternKind::Length
            | PatternKind::Weight
            | PatternKind::Duration
            | PatternKind::Temperature
            | PatternKind::Volume
            | PatternKind::Percentage
            | PatternKind::RangeIndicator => EntityType::Measurement,
            PatternKind::Money => EntityType::Money,
            PatternKind::Date | PatternKind::DateRange => EntityType::Date,
            PatternKind::Time => EntityType::Time,
            PatternKind::Phone => EntityType::Phone,
            PatternKind::Email => EntityType::Email,
            PatternKind::Url => EntityType::Url,
            PatternKind::Regulation => EntityType::Regulation,
        }
    }
}

/// An unresolved detection produced by one of the two matchers.
///
/// Raw matches are never mutated after the matcher emits them; the
/// canonicalizer consumes them wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawMatch {
    /// Coarse entity type
    pub entity_type: EntityType,
    /// Pattern subtype, present only for pattern-sourced matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<PatternKind>,
    /// The matched surface text, verbatim
    pub text: String,
    /// Where the match sits in the source text
    pub span: Span,
    /// Gazetteer subcategory, present only for dictionary-sourced matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Which matcher produced this match
    pub source: MatchSource,
}

impl RawMatch {
    /// Create a dictionary-sourced match.
    pub fn dictionary(
        entity_type: EntityType,
        text: String,
        span: Span,
        subcategory: String,
    ) -> Self {
        Self {
            entity_type,
            subtype: None,
            text,
            span,
            subcategory: Some(subcategory),
            source: MatchSource::Dictionary,
        }
    }

    /// Create a pattern-sourced match.
    pub fn pattern(kind: PatternKind, text: String, span: Span) -> Self {
        Self {
            entity_type: kind.entity_type(),
            subtype: Some(kind),
            text,
            span,
            subcategory: None,
            source: MatchSource::Pattern,
        }
    }
}

/// One occurrence of an entity in the source text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mention {
    /// Original surface text of the occurrence
    pub text: String,
    /// Where the occurrence sits in the source text
    pub span: Span,
}

/// The deduplicated, normalized representation of one or more raw matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CanonicalEntity {
    /// Per-type sequential id, stable within one document (e.g. `meas008`)
    pub id: String,
    /// Coarse entity type
    pub entity_type: EntityType,
    /// Canonical scalar representation (type-dependent)
    pub normalized: String,
    /// Distinct surface variants beyond the first mention's text
    pub aliases: Vec<String>,
    /// Every raw match that collapsed into this entity
    pub mentions: Vec<Mention>,
    /// Type-specific structured fields
    pub metadata: EntityMetadata,
}

impl CanonicalEntity {
    /// Number of times this entity was mentioned.
    pub fn count(&self) -> usize {
        self.mentions.len()
    }
}

/// Type-specific metadata carried by a canonical entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityMetadata {
    /// Measurement with unit conversion
    Measurement(MeasurementMetadata),
    /// Phone number components
    Phone(PhoneMetadata),
    /// Calendar-date components
    Date(DateMetadata),
    /// Monetary amount components
    Money(MoneyMetadata),
    /// Regulatory-citation components
    Regulation(RegulationMetadata),
    /// Geopolitical/location classification
    Geo(GeoMetadata),
    /// Person/organization mention bookkeeping
    Name(NameMetadata),
    /// No structured fields (email, URL, time)
    Plain,
    /// Type-specific parsing failed; the match is kept with verbatim text
    Unparsed(UnparsedMetadata),
}

/// Kinds of measurement, each with its own SI target unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKind {
    Length,
    Weight,
    Duration,
    Temperature,
    Volume,
    Percentage,
}

impl MeasurementKind {
    /// String representation used in metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementKind::Length => "length",
            MeasurementKind::Weight => "weight",
            MeasurementKind::Duration => "duration",
            MeasurementKind::Temperature => "temperature",
            MeasurementKind::Volume => "volume",
            MeasurementKind::Percentage => "percentage",
        }
    }
}

/// Measurement metadata.
///
/// `display_value` always carries the original surface text; the converted
/// value lives only in `si_value` and must never replace the user-facing form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasurementMetadata {
    /// Original numeric value, exactly as written
    pub value: f64,
    /// Original unit token, normalized for lookup (e.g. "feet" -> "ft")
    pub unit: String,
    /// Value converted to the SI target unit
    pub si_value: f64,
    /// SI target unit (meters, kilograms, seconds, liters, celsius)
    pub si_unit: String,
    /// Which measurement family this belongs to
    pub measurement_type: MeasurementKind,
    /// Original surface text shown in tags
    pub display_value: String,
    /// Id of the other endpoint when this value is one bound of a range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_of: Option<String>,
}

/// Classification of a phone number's area code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PhoneType {
    TollFree,
    Landline,
}

/// Phone number metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhoneMetadata {
    /// Country calling code, without the leading `+`
    pub country_code: String,
    /// Three-digit area code
    pub area_code: String,
    /// Seven-digit local number
    pub local_number: String,
    /// Toll-free vs landline classification
    pub phone_type: PhoneType,
    /// Human-readable national format, e.g. "(800) 321-6742"
    pub national_format: String,
    /// Whether the digit count checked out
    pub valid: bool,
}

/// Whether a date is before or after processing time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelativeReference {
    Past,
    Future,
}

/// Calendar-date metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateMetadata {
    /// Full weekday name, e.g. "Thursday"
    pub day_of_week: String,
    /// Calendar quarter, 1-4
    pub quarter: u8,
    /// Fiscal year under the configured fiscal-year-start rule
    pub fiscal_year: i32,
    /// Seconds since the Unix epoch at midnight UTC
    pub epoch_timestamp: i64,
    /// Past or future relative to processing time
    pub relative_reference: RelativeReference,
    /// Id of the other endpoint when this date is one bound of a range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_of: Option<String>,
}

/// Monetary-amount metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoneyMetadata {
    /// ISO currency code, e.g. "USD"
    pub currency: String,
    /// Numeric value before the magnitude multiplier
    pub original_value: f64,
    /// Magnitude word if present ("thousand", "million", "billion")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<String>,
    /// Multiplier implied by the magnitude word (1 when absent)
    pub multiplier: f64,
    /// Canonical human-readable form, e.g. "$2,500,000"
    pub formatted: String,
}

/// Regulatory-citation metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegulationMetadata {
    /// CFR title number
    pub title: u32,
    /// Part number
    pub part: u32,
    /// Section number within the part, when cited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<u32>,
    /// Issuing authority for the title
    pub authority: String,
    /// Subject area of the title
    pub subject_area: String,
    /// Standard citation form, e.g. "29 CFR 1910.132"
    pub full_citation: String,
    /// eCFR link for the cited part or section
    pub url: String,
}

/// Geopolitical/location metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoMetadata {
    /// Winning gazetteer subcategory
    pub subcategory: String,
    /// Political or geographic level implied by the subcategory
    pub level: String,
    /// 1.0 for a single candidate; lower when priority or list order had to decide
    pub normalization_confidence: f32,
    /// Non-winning subcategories for the same span
    pub alternative_classifications: Vec<String>,
}

/// Person/organization metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NameMetadata {
    /// Number of exact mentions collapsed into this entity
    pub count: usize,
}

/// Metadata for a match whose type-specific parsing failed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnparsedMetadata {
    /// Always true; downstream consumers filter on this flag
    pub parse_failed: bool,
    /// Short human-readable reason
    pub reason: String,
}

impl UnparsedMetadata {
    /// Flag a parse failure with a reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            parse_failed: true,
            reason: reason.into(),
        }
    }
}
