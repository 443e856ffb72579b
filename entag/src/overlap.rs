//! Overlap resolution: an explicit pre-pass producing a non-overlapping span
//! set before canonicalization.
//!
//! Interval scheduling, longest span first, earliest start on ties. Matches
//! sharing an identical span (competing classifications for one literal) are
//! kept together as one cluster; picking between them is the conflict
//! resolver's job. The tagger downstream must never see partially
//! overlapping spans.

use std::collections::BTreeMap;

use tracing::debug;

use crate::types::{RawMatch, Span};

/// Result of the overlap pre-pass.
#[derive(Debug)]
pub struct OverlapResolution {
    /// Surviving matches, sorted by start offset; identical spans stay adjacent
    pub kept: Vec<RawMatch>,
    /// Number of matches discarded for partially overlapping a longer span
    pub suppressed: usize,
}

/// Reduce raw matches to a non-overlapping span set.
///
/// Two matches claiming overlapping ranges are resolved by keeping the longer
/// span; equal lengths fall back to the earlier start. Identical spans do not
/// conflict with each other.
pub fn resolve_overlaps(matches: Vec<RawMatch>) -> OverlapResolution {
    let total = matches.len();

    // Cluster identical spans so competing classifications survive together.
    let mut clusters: BTreeMap<Span, Vec<RawMatch>> = BTreeMap::new();
    for m in matches {
        clusters.entry(m.span).or_default().push(m);
    }

    let mut spans: Vec<Span> = clusters.keys().copied().collect();
    spans.sort_by(|a, b| b.len().cmp(&a.len()).then(a.start.cmp(&b.start)));

    let mut kept_spans: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        if kept_spans.iter().all(|k| !k.overlaps(&span)) {
            kept_spans.push(span);
        }
    }
    kept_spans.sort();

    let mut kept = Vec::new();
    for span in &kept_spans {
        kept.extend(clusters.remove(span).expect("kept span came from clusters"));
    }

    let suppressed = total - kept.len();
    if suppressed > 0 {
        debug!(total, suppressed, "suppressed partially overlapping matches");
    }

    OverlapResolution { kept, suppressed }
}
