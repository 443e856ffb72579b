//! Text tagger: rewrites the source text with stable entity references.
//!
//! Every mention span is replaced by a `||<display>||<id>||` marker in a
//! single pass over descending offsets, so earlier replacements never shift
//! the coordinates of later ones. The tagger trusts nothing: spans are
//! re-verified against the live text and any mismatch or overlap aborts the
//! document rather than writing at wrong offsets.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{CanonicalEntity, EntityMetadata, EntityType, Span};
use crate::{EntagError, Result};

/// Marker delimiter.
const DELIM: &str = "||";

lazy_static! {
    static ref MARKER: Regex =
        Regex::new(r"\|\|(.*?)\|\|([a-z]+\d{3,})\|\|").expect("static marker pattern");
}

/// Replace every mention span with a marker referencing its entity id.
///
/// Display text preserves the original wording for most types; money and
/// phone markers show the canonical form instead.
pub fn tag_text(text: &str, entities: &[CanonicalEntity]) -> Result<String> {
    let mut replacements: Vec<(Span, String, &str)> = Vec::new();
    for entity in entities {
        for mention in &entity.mentions {
            verify_span(text, &mention.span, &mention.text)?;
            replacements.push((mention.span, display_text(entity, &mention.text), &entity.id));
        }
    }

    replacements.sort_by_key(|(span, _, _)| *span);
    for pair in replacements.windows(2) {
        if pair[0].0.overlaps(&pair[1].0) {
            return Err(EntagError::Tagging(format!(
                "overlapping mention spans reached the tagger: {:?} and {:?}",
                pair[0].0, pair[1].0
            )));
        }
    }

    // Descending offsets: replacements never invalidate pending coordinates.
    let mut tagged = text.to_string();
    for (span, display, id) in replacements.iter().rev() {
        let marker = format!("{DELIM}{display}{DELIM}{id}{DELIM}");
        tagged.replace_range(span.start..span.end, &marker);
    }

    Ok(tagged)
}

/// Reconstruct the original text from tagged output and the entity table.
///
/// Markers whose display is canonical rather than original (money, phone)
/// are resolved through the entity's mentions, consumed in offset order.
pub fn untag(tagged: &str, entities: &[CanonicalEntity]) -> Result<String> {
    let mut mentions: Vec<(Span, &str, &str)> = entities
        .iter()
        .flat_map(|e| {
            e.mentions
                .iter()
                .map(|m| (m.span, m.text.as_str(), e.id.as_str()))
        })
        .collect();
    mentions.sort_by_key(|(span, _, _)| *span);

    let mut restored = String::with_capacity(tagged.len());
    let mut cursor = 0;
    let mut next = 0;

    for caps in MARKER.captures_iter(tagged) {
        let whole = caps.get(0).expect("capture group 0 always participates");
        let id = &caps[2];

        let Some(&(_, original, expected_id)) = mentions.get(next) else {
            return Err(EntagError::Tagging(format!(
                "marker {id} has no corresponding mention"
            )));
        };
        if expected_id != id {
            return Err(EntagError::Tagging(format!(
                "marker order mismatch: found {id}, expected {expected_id}"
            )));
        }

        restored.push_str(&tagged[cursor..whole.start()]);
        restored.push_str(original);
        cursor = whole.end();
        next += 1;
    }

    restored.push_str(&tagged[cursor..]);
    Ok(restored)
}

/// The text a tag displays for one mention of an entity.
fn display_text(entity: &CanonicalEntity, original: &str) -> String {
    if entity.entity_type.preserves_original() {
        return original.to_string();
    }
    match (&entity.entity_type, &entity.metadata) {
        (EntityType::Money, EntityMetadata::Money(meta)) => meta.formatted.clone(),
        _ => entity.normalized.clone(),
    }
}

/// Fail loudly when a recorded span no longer matches the live text.
fn verify_span(text: &str, span: &Span, expected: &str) -> Result<()> {
    let valid = span.start < span.end
        && span.end <= text.len()
        && text.is_char_boundary(span.start)
        && text.is_char_boundary(span.end)
        && &text[span.start..span.end] == expected;
    if valid {
        Ok(())
    } else {
        Err(EntagError::SpanIntegrity {
            start: span.start,
            end: span.end,
            expected: expected.to_string(),
        })
    }
}
