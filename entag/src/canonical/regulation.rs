//! Regulatory-citation decomposition: `<title> CFR <part>[.<section>]`.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use super::Normalized;
use crate::types::{EntityMetadata, RegulationMetadata};

lazy_static! {
    static ref CITATION: Regex = Regex::new(
        r"(?i)^(\d{1,2})\s+C\.?\s?F\.?\s?R\.?\s+(?:part\s+)?§?\s*(\d+)(?:\.(\d+))?$"
    )
    .expect("static citation pattern");

    /// CFR title -> (issuing authority, subject area).
    static ref TITLE_AUTHORITIES: HashMap<u32, (&'static str, &'static str)> = {
        let rows: &[(u32, &str, &str)] = &[
            (7, "Department of Agriculture", "Agriculture"),
            (10, "Department of Energy", "Energy"),
            (14, "Department of Transportation", "Aeronautics and Space"),
            (21, "Food and Drug Administration", "Food and Drugs"),
            (26, "Department of the Treasury", "Internal Revenue"),
            (29, "Department of Labor", "Labor"),
            (40, "Environmental Protection Agency", "Protection of Environment"),
            (47, "Federal Communications Commission", "Telecommunication"),
            (49, "Department of Transportation", "Transportation"),
        ];
        rows.iter().map(|(t, a, s)| (*t, (*a, *s))).collect()
    };
}

/// Normalize a citation surface form like `"29 CFR 1910.132"`.
pub fn normalize(surface: &str) -> Option<Normalized> {
    let caps = CITATION.captures(surface.trim())?;
    let title: u32 = caps[1].parse().ok()?;
    let part: u32 = caps[2].parse().ok()?;
    let section: Option<u32> = caps.get(3).and_then(|m| m.as_str().parse().ok());

    let (authority, subject_area) = TITLE_AUTHORITIES
        .get(&title)
        .copied()
        .unwrap_or(("Federal Government", "General"));

    let (normalized, full_citation, url) = match section {
        Some(section) => (
            format!("CFR-{title}-{part}-{section}"),
            format!("{title} CFR {part}.{section}"),
            format!("https://www.ecfr.gov/current/title-{title}/section-{part}.{section}"),
        ),
        None => (
            format!("CFR-{title}-{part}"),
            format!("{title} CFR {part}"),
            format!("https://www.ecfr.gov/current/title-{title}/part-{part}"),
        ),
    };

    Some(Normalized {
        key: normalized.clone(),
        normalized,
        metadata: EntityMetadata::Regulation(RegulationMetadata {
            title,
            part,
            section,
            authority: authority.to_string(),
            subject_area: subject_area.to_string(),
            full_citation,
            url,
        }),
    })
}
