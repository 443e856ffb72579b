//! Calendar-date normalization to ISO-8601 with derived components.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

use super::Normalized;
use crate::types::{DateMetadata, EntityMetadata, RelativeReference};

lazy_static! {
    static ref MONTHS: HashMap<&'static str, u32> = {
        let mut map = HashMap::new();
        let names: &[(&str, u32)] = &[
            ("january", 1), ("february", 2), ("march", 3), ("april", 4),
            ("may", 5), ("june", 6), ("july", 7), ("august", 8),
            ("september", 9), ("october", 10), ("november", 11), ("december", 12),
            ("jan", 1), ("feb", 2), ("mar", 3), ("apr", 4), ("jun", 6),
            ("jul", 7), ("aug", 8), ("sep", 9), ("sept", 9), ("oct", 10),
            ("nov", 11), ("dec", 12),
        ];
        map.extend(names.iter().copied());
        map
    };

    static ref MONTH_NAME_DATE: Regex = Regex::new(
        r"(?i)^([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})$"
    ).expect("static date pattern");

    static ref NUMERIC_DATE: Regex =
        Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4})$").expect("static date pattern");

    static ref MONTH_NAME_RANGE: Regex = Regex::new(
        r"(?i)^([a-z]+)\.?\s+(\d{1,2})\s*(?:[-–—]|through|to)\s*(\d{1,2}),?\s+(\d{4})$"
    ).expect("static date pattern");
}

/// Parse one date surface form into a calendar date.
///
/// Accepts month-name forms ("January 15, 2024"), numeric month-first forms
/// ("1/15/2024"), and ISO ("2024-01-15"). Impossible dates return `None`.
pub fn parse(surface: &str) -> Option<NaiveDate> {
    let trimmed = surface.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Some(caps) = NUMERIC_DATE.captures(trimmed) {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = MONTH_NAME_DATE.captures(trimmed) {
        let month = month_number(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

/// Parse a month-name range ("August 15-20, 2024") into its two endpoints.
pub fn parse_range(surface: &str) -> Option<(NaiveDate, NaiveDate)> {
    let caps = MONTH_NAME_RANGE.captures(surface.trim())?;
    let month = month_number(&caps[1])?;
    let start_day: u32 = caps[2].parse().ok()?;
    let end_day: u32 = caps[3].parse().ok()?;
    let year: i32 = caps[4].parse().ok()?;

    let start = NaiveDate::from_ymd_opt(year, month, start_day)?;
    let end = NaiveDate::from_ymd_opt(year, month, end_day)?;
    Some((start, end))
}

fn month_number(name: &str) -> Option<u32> {
    MONTHS.get(name.to_lowercase().as_str()).copied()
}

/// Derive the structured metadata for a parsed date.
///
/// `fiscal_year_start_month` is an explicit parameter: with a non-January
/// start, dates on or after the start month belong to the fiscal year labeled
/// by the ending calendar year.
pub fn metadata(date: NaiveDate, reference: NaiveDate, fiscal_year_start_month: u32) -> DateMetadata {
    let fiscal_year = if fiscal_year_start_month <= 1 {
        date.year()
    } else if date.month() >= fiscal_year_start_month {
        date.year() + 1
    } else {
        date.year()
    };

    let epoch_timestamp = date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default();

    let relative_reference = if date > reference {
        RelativeReference::Future
    } else {
        RelativeReference::Past
    };

    DateMetadata {
        day_of_week: date.format("%A").to_string(),
        quarter: ((date.month() - 1) / 3 + 1) as u8,
        fiscal_year,
        epoch_timestamp,
        relative_reference,
        range_of: None,
    }
}

/// Normalize one date surface form.
pub fn normalize(
    surface: &str,
    reference: NaiveDate,
    fiscal_year_start_month: u32,
) -> Option<Normalized> {
    let date = parse(surface)?;
    let normalized = date.format("%Y-%m-%d").to_string();
    Some(Normalized {
        key: normalized.clone(),
        normalized,
        metadata: EntityMetadata::Date(metadata(date, reference, fiscal_year_start_month)),
    })
}
