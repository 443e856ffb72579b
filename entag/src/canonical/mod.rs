//! Canonicalization: collapsing raw matches into deduplicated, normalized
//! canonical entities with per-type sequential ids.
//!
//! The canonicalizer consumes the non-overlapping match set from the overlap
//! pre-pass, delegates competing gazetteer classifications to the conflict
//! resolver, joins range indicators with their endpoint matches, and emits
//! one entity per distinct normalized identity. No match is ever dropped
//! silently: anything that fails type-specific parsing is kept with its
//! verbatim text and a parse-failed flag.

pub mod date;
pub mod geo;
pub mod measurement;
pub mod money;
pub mod phone;
pub mod regulation;

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::types::{
    CanonicalEntity, EntityMetadata, EntityType, MatchSource, Mention, NameMetadata, PatternKind,
    RawMatch, Span, UnparsedMetadata,
};

/// A per-type normalization result: the identity key matches group under,
/// the canonical scalar form, and the structured metadata.
#[derive(Debug)]
pub struct Normalized {
    pub key: String,
    pub normalized: String,
    pub metadata: EntityMetadata,
}

/// Output of canonicalization, consumed wholesale by the tagger and report.
#[derive(Debug)]
pub struct CanonicalOutput {
    /// Canonical entities in id-assignment order
    pub entities: Vec<CanonicalEntity>,
    /// Lookup from every consumed mention span to its owning entity id
    pub span_index: HashMap<Span, String>,
    /// The raw matches that became mentions, including synthesized range
    /// endpoints, in offset order
    pub consumed: Vec<RawMatch>,
}

/// Render a numeric value without trailing decimal noise.
pub(crate) fn format_number(value: f64) -> String {
    format!("{value}")
}

/// Canonicalize the resolved match set for one document.
///
/// `indicators` are the side-channel range-indicator matches; they produce no
/// entities themselves and are consumed only by the range join.
pub fn canonicalize(
    kept: Vec<RawMatch>,
    indicators: &[RawMatch],
    text: &str,
    reference: NaiveDate,
    fiscal_year_start_month: u32,
) -> CanonicalOutput {
    // Cluster identical spans; BTreeMap iteration gives document order, which
    // is what makes id assignment first-seen.
    let mut clusters: BTreeMap<Span, Vec<RawMatch>> = BTreeMap::new();
    for m in kept {
        clusters.entry(m.span).or_default().push(m);
    }

    // Join range indicators with adjacent measurement matches, synthesizing
    // the bare-numeral endpoint ("30-37 inches" has no unit on the 30).
    let joins = join_measurement_ranges(&clusters, indicators, text);
    let mut synthesized_units: HashMap<Span, String> = HashMap::new();
    for join in &joins {
        clusters
            .entry(join.endpoint.span)
            .or_default()
            .push(join.endpoint.clone());
        synthesized_units.insert(join.endpoint.span, join.unit.clone());
    }

    let mut table = EntityTable::default();
    let range_links: Vec<(Span, Span)> = joins
        .iter()
        .map(|j| (j.endpoint.span, j.partner))
        .collect();

    for (span, cluster) in &clusters {
        let patterns: Vec<&RawMatch> = cluster
            .iter()
            .filter(|m| m.source == MatchSource::Pattern)
            .collect();

        if let Some(m) = patterns.first().copied() {
            if cluster.len() > 1 {
                debug!(
                    span = ?span,
                    discarded = cluster.len() - 1,
                    "pattern match outranks other candidates at the same span"
                );
            }
            canonicalize_pattern(&mut table, m, &synthesized_units, reference, fiscal_year_start_month);
        } else {
            canonicalize_dictionary(&mut table, cluster);
        }
    }

    link_measurement_ranges(&mut table, &range_links);
    table.finish()
}

/// A synthesized range endpoint: the bare numeral on the open side of an
/// indicator, carrying the unit of its partner match.
#[derive(Debug)]
struct RangeJoin {
    endpoint: RawMatch,
    partner: Span,
    unit: String,
}

fn join_measurement_ranges(
    clusters: &BTreeMap<Span, Vec<RawMatch>>,
    indicators: &[RawMatch],
    text: &str,
) -> Vec<RangeJoin> {
    let mut joins = Vec::new();

    for indicator in indicators {
        // Indicators embedded in another match (phone separators, ISO dates,
        // date ranges) are that match's business, not a measurement range.
        if clusters.keys().any(|s| s.contains(&indicator.span)) {
            continue;
        }

        // The right endpoint must be a unit-bearing measurement starting
        // immediately after the indicator, across whitespace only.
        let Some(right) = clusters
            .values()
            .flatten()
            .find(|m| {
                m.span.start >= indicator.span.end
                    && text[indicator.span.end..m.span.start].trim().is_empty()
                    && m.span.start - indicator.span.end <= 2
                    && is_unit_bearing(m)
            })
        else {
            continue;
        };

        let Some((_, unit)) = measurement::split_surface(&right.text) else {
            continue;
        };

        // The left endpoint is a bare numeral directly before the indicator.
        let Some(numeral_span) = bare_numeral_before(text, indicator.span.start) else {
            continue;
        };
        if clusters.keys().any(|s| s.overlaps(&numeral_span)) {
            continue;
        }

        let kind = right
            .subtype
            .expect("unit-bearing matches are pattern-sourced");
        joins.push(RangeJoin {
            endpoint: RawMatch::pattern(
                kind,
                text[numeral_span.start..numeral_span.end].to_string(),
                numeral_span,
            ),
            partner: right.span,
            unit,
        });
    }

    joins
}

fn is_unit_bearing(m: &RawMatch) -> bool {
    matches!(
        m.subtype,
        Some(
            PatternKind::Length
                | PatternKind::Weight
                | PatternKind::Duration
                | PatternKind::Temperature
                | PatternKind::Volume
        )
    )
}

/// Scan backwards from `end` for a contiguous numeral adjacent across
/// whitespace only.
fn bare_numeral_before(text: &str, end: usize) -> Option<Span> {
    let bytes = text.as_bytes();
    let mut stop = end;
    while stop > 0 && bytes[stop - 1].is_ascii_whitespace() {
        stop -= 1;
    }
    let mut start = stop;
    while start > 0 && (bytes[start - 1].is_ascii_digit() || bytes[start - 1] == b'.') {
        start -= 1;
    }
    // Trim a leading dot so "v1.30" style fragments do not parse.
    while start < stop && bytes[start] == b'.' {
        start += 1;
    }
    if start < stop && bytes[start..stop].iter().any(|b| b.is_ascii_digit()) {
        Some(Span::new(start, stop))
    } else {
        None
    }
}

fn canonicalize_dictionary(table: &mut EntityTable, cluster: &[RawMatch]) {
    let candidates: Vec<geo::Candidate> = cluster
        .iter()
        .map(|m| geo::Candidate {
            entity_type: m.entity_type,
            subcategory: m
                .subcategory
                .clone()
                .unwrap_or_else(|| "unclassified".to_string()),
        })
        .collect();
    let resolution = geo::resolve(&candidates);

    let winner = cluster
        .iter()
        .find(|m| m.subcategory.as_deref() == Some(resolution.subcategory.as_str()))
        .unwrap_or(&cluster[0]);
    let mention = Mention {
        text: winner.text.clone(),
        span: winner.span,
    };

    let (key, metadata) = match resolution.entity_type {
        EntityType::Person | EntityType::Organization => {
            // Exact string identity only; no fuzzy merging of names.
            (winner.text.clone(), EntityMetadata::Name(NameMetadata { count: 0 }))
        }
        _ => (
            winner.text.to_lowercase(),
            EntityMetadata::Geo(crate::types::GeoMetadata {
                subcategory: resolution.subcategory,
                level: resolution.level,
                normalization_confidence: resolution.confidence,
                alternative_classifications: resolution.alternatives,
            }),
        ),
    };

    table.consumed.push(winner.clone());
    table.upsert(
        resolution.entity_type,
        key,
        winner.text.clone(),
        metadata,
        Some(mention),
    );
}

/// Canonicalize one pattern-sourced match.
fn canonicalize_pattern(
    table: &mut EntityTable,
    m: &RawMatch,
    synthesized_units: &HashMap<Span, String>,
    reference: NaiveDate,
    fiscal_year_start_month: u32,
) {
    let kind = m.subtype.expect("pattern matches always carry a subtype");
    let mention = Mention {
        text: m.text.clone(),
        span: m.span,
    };

    if kind == PatternKind::DateRange {
        table.consumed.push(m.clone());
        canonicalize_date_range(table, m, mention, reference, fiscal_year_start_month);
        return;
    }

    let normalized = match kind {
        PatternKind::Length
        | PatternKind::Weight
        | PatternKind::Duration
        | PatternKind::Temperature
        | PatternKind::Volume
        | PatternKind::Percentage => match synthesized_units.get(&m.span) {
            Some(unit) => measurement::normalize_parts(&m.text, unit, &m.text),
            None => measurement::normalize(&m.text),
        },
        PatternKind::Money => money::normalize(&m.text),
        PatternKind::Date => date::normalize(&m.text, reference, fiscal_year_start_month),
        PatternKind::Phone => phone::normalize(&m.text),
        PatternKind::Regulation => regulation::normalize(&m.text),
        PatternKind::Email => Some(Normalized {
            key: m.text.to_lowercase(),
            normalized: m.text.to_lowercase(),
            metadata: EntityMetadata::Plain,
        }),
        PatternKind::Url | PatternKind::Time => Some(Normalized {
            key: m.text.clone(),
            normalized: m.text.clone(),
            metadata: EntityMetadata::Plain,
        }),
        PatternKind::RangeIndicator | PatternKind::DateRange => None,
    };

    table.consumed.push(m.clone());
    match normalized {
        Some(n) => {
            table.upsert(m.entity_type, n.key, n.normalized, n.metadata, Some(mention));
        }
        None => {
            warn!(text = %m.text, subtype = kind.as_str(), "parse failed; keeping verbatim");
            table.upsert(
                m.entity_type,
                format!("unparsed:{}", m.text),
                m.text.clone(),
                EntityMetadata::Unparsed(UnparsedMetadata::new(format!(
                    "no {} normalization rule matched",
                    kind.as_str()
                ))),
                Some(mention),
            );
        }
    }
}

/// Split a date-range match into two endpoint entities linked by `range_of`.
///
/// The single surface span is owned by the start endpoint; the end endpoint
/// carries the link but no mention of its own.
fn canonicalize_date_range(
    table: &mut EntityTable,
    m: &RawMatch,
    mention: Mention,
    reference: NaiveDate,
    fiscal_year_start_month: u32,
) {
    let Some((start, end)) = date::parse_range(&m.text) else {
        warn!(text = %m.text, "date range parse failed; keeping verbatim");
        table.upsert(
            EntityType::Date,
            format!("unparsed:{}", m.text),
            m.text.clone(),
            EntityMetadata::Unparsed(UnparsedMetadata::new("no date_range normalization rule matched")),
            Some(mention),
        );
        return;
    };

    let start_iso = start.format("%Y-%m-%d").to_string();
    let end_iso = end.format("%Y-%m-%d").to_string();

    let start_index = table.upsert(
        EntityType::Date,
        start_iso.clone(),
        start_iso,
        EntityMetadata::Date(date::metadata(start, reference, fiscal_year_start_month)),
        Some(mention),
    );
    let end_index = table.upsert(
        EntityType::Date,
        end_iso.clone(),
        end_iso,
        EntityMetadata::Date(date::metadata(end, reference, fiscal_year_start_month)),
        None,
    );

    let start_id = table.entities[start_index].id.clone();
    let end_id = table.entities[end_index].id.clone();
    if let EntityMetadata::Date(meta) = &mut table.entities[start_index].metadata {
        meta.range_of = Some(end_id);
    }
    if let EntityMetadata::Date(meta) = &mut table.entities[end_index].metadata {
        meta.range_of = Some(start_id);
    }
}

fn link_measurement_ranges(table: &mut EntityTable, links: &[(Span, Span)]) {
    for (left, right) in links {
        let (Some(left_id), Some(right_id)) =
            (table.span_index.get(left).cloned(), table.span_index.get(right).cloned())
        else {
            continue;
        };
        table.set_measurement_range(&left_id, right_id.clone());
        table.set_measurement_range(&right_id, left_id);
    }
}

/// Accumulates entities, per-type id counters, and the span index.
#[derive(Debug, Default)]
struct EntityTable {
    entities: Vec<CanonicalEntity>,
    index: HashMap<(EntityType, String), usize>,
    counters: HashMap<EntityType, usize>,
    span_index: HashMap<Span, String>,
    consumed: Vec<RawMatch>,
}

impl EntityTable {
    /// Merge a match into an existing entity or mint a new one, returning the
    /// entity's position.
    fn upsert(
        &mut self,
        entity_type: EntityType,
        key: String,
        normalized: String,
        metadata: EntityMetadata,
        mention: Option<Mention>,
    ) -> usize {
        let index = match self.index.get(&(entity_type, key.clone())) {
            Some(&index) => index,
            None => {
                let sequence = self.counters.entry(entity_type).or_insert(0);
                *sequence += 1;
                let id = format!("{}{:03}", entity_type.id_prefix(), sequence);
                self.entities.push(CanonicalEntity {
                    id,
                    entity_type,
                    normalized,
                    aliases: Vec::new(),
                    mentions: Vec::new(),
                    metadata,
                });
                let index = self.entities.len() - 1;
                self.index.insert((entity_type, key), index);
                index
            }
        };

        if let Some(mention) = mention {
            let entity = &mut self.entities[index];
            self.span_index.insert(mention.span, entity.id.clone());
            let is_variant = !entity.mentions.is_empty()
                && entity.mentions[0].text != mention.text
                && !entity.aliases.contains(&mention.text);
            if is_variant {
                entity.aliases.push(mention.text.clone());
            }
            entity.mentions.push(mention);
        }

        index
    }

    fn set_measurement_range(&mut self, id: &str, other: String) {
        if let Some(entity) = self.entities.iter_mut().find(|e| e.id == id)
            && let EntityMetadata::Measurement(meta) = &mut entity.metadata
        {
            meta.range_of = Some(other);
        }
    }

    fn finish(mut self) -> CanonicalOutput {
        // Mention counts for name entities track the mention list.
        for entity in &mut self.entities {
            if let EntityMetadata::Name(meta) = &mut entity.metadata {
                meta.count = entity.mentions.len();
            }
        }
        self.consumed.sort_by_key(|m| m.span);
        CanonicalOutput {
            entities: self.entities,
            span_index: self.span_index,
            consumed: self.consumed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn run(text: &str, matches: Vec<RawMatch>, indicators: Vec<RawMatch>) -> CanonicalOutput {
        canonicalize(matches, &indicators, text, reference(), 1)
    }

    fn pattern_at(text: &str, kind: PatternKind, surface: &str) -> RawMatch {
        let start = text.find(surface).expect("surface present");
        RawMatch::pattern(kind, surface.to_string(), Span::new(start, start + surface.len()))
    }

    #[test]
    fn repeated_mentions_collapse_into_one_entity() {
        let text = "29 CFR 1910.132 and again 29 CFR 1910.132";
        let first = pattern_at(text, PatternKind::Regulation, "29 CFR 1910.132");
        let second = RawMatch::pattern(
            PatternKind::Regulation,
            "29 CFR 1910.132".to_string(),
            Span::new(26, 41),
        );
        let output = run(text, vec![first, second], vec![]);
        assert_eq!(output.entities.len(), 1);
        assert_eq!(output.entities[0].mentions.len(), 2);
        assert_eq!(output.entities[0].id, "reg001");
    }

    #[test]
    fn ids_are_assigned_in_first_seen_order() {
        let text = "9.1 meters beyond 30 feet";
        let a = pattern_at(text, PatternKind::Length, "9.1 meters");
        let b = pattern_at(text, PatternKind::Length, "30 feet");
        // Input order is scrambled; span order decides.
        let output = run(text, vec![b, a], vec![]);
        assert_eq!(output.entities[0].normalized, "9.1");
        assert_eq!(output.entities[0].id, "meas001");
        assert_eq!(output.entities[1].id, "meas002");
    }

    #[test]
    fn unparseable_match_is_kept_with_flag() {
        let text = "due February 30, 2024";
        let m = pattern_at(text, PatternKind::Date, "February 30, 2024");
        let output = run(text, vec![m], vec![]);
        assert_eq!(output.entities.len(), 1);
        assert_eq!(output.entities[0].normalized, "February 30, 2024");
        match &output.entities[0].metadata {
            EntityMetadata::Unparsed(meta) => assert!(meta.parse_failed),
            other => panic!("expected unparsed metadata, got {other:?}"),
        }
    }

    #[test]
    fn measurement_range_produces_linked_endpoints() {
        let text = "guardrails 30-37 inches above the surface";
        let right = pattern_at(text, PatternKind::Length, "37 inches");
        let dash = text.find('-').unwrap();
        let indicator = RawMatch::pattern(
            PatternKind::RangeIndicator,
            "-".to_string(),
            Span::new(dash, dash + 1),
        );
        let output = run(text, vec![right], vec![indicator]);

        assert_eq!(output.entities.len(), 2);
        assert_eq!(output.consumed.len(), 2);
        let low = &output.entities[0];
        let high = &output.entities[1];
        assert_eq!(low.normalized, "30");
        assert_eq!(high.normalized, "37");
        match (&low.metadata, &high.metadata) {
            (EntityMetadata::Measurement(a), EntityMetadata::Measurement(b)) => {
                assert_eq!(a.range_of.as_deref(), Some(high.id.as_str()));
                assert_eq!(b.range_of.as_deref(), Some(low.id.as_str()));
                assert_eq!(a.unit, "inches");
                assert_eq!(a.display_value, "30");
            }
            other => panic!("expected measurement metadata, got {other:?}"),
        }
    }

    #[test]
    fn date_range_splits_with_mention_on_start() {
        let text = "closed August 15-20, 2024 for repairs";
        let m = pattern_at(text, PatternKind::DateRange, "August 15-20, 2024");
        let output = run(text, vec![m], vec![]);

        assert_eq!(output.entities.len(), 2);
        let start = &output.entities[0];
        let end = &output.entities[1];
        assert_eq!(start.normalized, "2024-08-15");
        assert_eq!(end.normalized, "2024-08-20");
        assert_eq!(start.mentions.len(), 1);
        assert!(end.mentions.is_empty());
        match (&start.metadata, &end.metadata) {
            (EntityMetadata::Date(a), EntityMetadata::Date(b)) => {
                assert_eq!(a.range_of.as_deref(), Some(end.id.as_str()));
                assert_eq!(b.range_of.as_deref(), Some(start.id.as_str()));
            }
            other => panic!("expected date metadata, got {other:?}"),
        }
        // One raw match, one mention: nothing lost, nothing duplicated.
        assert_eq!(output.consumed.len(), 1);
    }

    #[test]
    fn competing_classifications_resolve_with_alternatives() {
        let text = "relocating to Georgia";
        let start = text.find("Georgia").unwrap();
        let span = Span::new(start, start + "Georgia".len());
        let matches = vec![
            RawMatch::dictionary(EntityType::Gpe, "Georgia".into(), span, "countries".into()),
            RawMatch::dictionary(EntityType::Gpe, "Georgia".into(), span, "us_states".into()),
        ];
        let output = run(text, matches, vec![]);

        assert_eq!(output.entities.len(), 1);
        match &output.entities[0].metadata {
            EntityMetadata::Geo(meta) => {
                assert_eq!(meta.subcategory, "countries");
                assert_eq!(meta.alternative_classifications, vec!["us_states"]);
            }
            other => panic!("expected geo metadata, got {other:?}"),
        }
        assert_eq!(output.consumed.len(), 1);
    }

    #[test]
    fn exact_name_identity_counts_mentions() {
        let text = "Smith met Smith";
        let matches = vec![
            RawMatch::dictionary(EntityType::Person, "Smith".into(), Span::new(0, 5), "surnames".into()),
            RawMatch::dictionary(EntityType::Person, "Smith".into(), Span::new(10, 15), "surnames".into()),
        ];
        let output = run(text, matches, vec![]);
        assert_eq!(output.entities.len(), 1);
        assert_eq!(output.entities[0].id, "p001");
        match &output.entities[0].metadata {
            EntityMetadata::Name(meta) => assert_eq!(meta.count, 2),
            other => panic!("expected name metadata, got {other:?}"),
        }
    }
}
