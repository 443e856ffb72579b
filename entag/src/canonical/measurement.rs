//! Measurement normalization: `<number><unit>` parsing and SI conversion.
//!
//! The conversion table is fixed: length to meters, weight to kilograms,
//! durations to seconds, volume to liters. The converted value lives only in
//! `si_value`; the canonical form and the display always keep the user's
//! original number and unit.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use super::{format_number, Normalized};
use crate::types::{EntityMetadata, MeasurementKind, MeasurementMetadata};

/// One row of the unit conversion table.
#[derive(Debug, Clone, Copy)]
struct UnitInfo {
    canonical: &'static str,
    kind: MeasurementKind,
    si_factor: f64,
    si_unit: &'static str,
}

lazy_static! {
    static ref UNIT_TABLE: HashMap<&'static str, UnitInfo> = {
        let mut table = HashMap::new();
        let rows: &[(&[&str], &str, MeasurementKind, f64, &str)] = &[
            // Length -> meters
            (&["inch", "inches"], "in", MeasurementKind::Length, 0.0254, "meters"),
            (&["foot", "feet", "ft"], "ft", MeasurementKind::Length, 0.3048, "meters"),
            (&["yard", "yards", "yd"], "yd", MeasurementKind::Length, 0.9144, "meters"),
            (&["mile", "miles", "mi"], "mi", MeasurementKind::Length, 1609.344, "meters"),
            (&["millimeter", "millimeters", "mm"], "mm", MeasurementKind::Length, 0.001, "meters"),
            (&["centimeter", "centimeters", "cm"], "cm", MeasurementKind::Length, 0.01, "meters"),
            (&["meter", "meters", "metre", "metres", "m"], "m", MeasurementKind::Length, 1.0, "meters"),
            (&["kilometer", "kilometers", "km"], "km", MeasurementKind::Length, 1000.0, "meters"),
            // Weight -> kilograms
            (&["pound", "pounds", "lb", "lbs"], "lb", MeasurementKind::Weight, 0.453592, "kilograms"),
            (&["ounce", "ounces", "oz"], "oz", MeasurementKind::Weight, 0.0283495, "kilograms"),
            (&["kilogram", "kilograms", "kg"], "kg", MeasurementKind::Weight, 1.0, "kilograms"),
            (&["gram", "grams", "g"], "g", MeasurementKind::Weight, 0.001, "kilograms"),
            (&["milligram", "milligrams", "mg"], "mg", MeasurementKind::Weight, 1e-6, "kilograms"),
            (&["ton", "tons"], "ton", MeasurementKind::Weight, 907.18474, "kilograms"),
            (&["tonne", "tonnes"], "tonne", MeasurementKind::Weight, 1000.0, "kilograms"),
            // Duration -> seconds
            (&["second", "seconds", "sec", "secs"], "s", MeasurementKind::Duration, 1.0, "seconds"),
            (&["minute", "minutes", "min", "mins"], "min", MeasurementKind::Duration, 60.0, "seconds"),
            (&["hour", "hours", "hr", "hrs"], "hr", MeasurementKind::Duration, 3600.0, "seconds"),
            (&["day", "days"], "day", MeasurementKind::Duration, 86400.0, "seconds"),
            (&["week", "weeks"], "week", MeasurementKind::Duration, 604800.0, "seconds"),
            // Volume -> liters
            (&["gallon", "gallons", "gal"], "gal", MeasurementKind::Volume, 3.78541, "liters"),
            (&["liter", "liters", "litre", "litres", "l"], "l", MeasurementKind::Volume, 1.0, "liters"),
            (&["milliliter", "milliliters", "ml"], "ml", MeasurementKind::Volume, 0.001, "liters"),
            (&["quart", "quarts", "qt"], "qt", MeasurementKind::Volume, 0.946353, "liters"),
            (&["pint", "pints", "pt"], "pt", MeasurementKind::Volume, 0.473176, "liters"),
            (&["fluid ounce", "fluid ounces", "fl oz"], "fl oz", MeasurementKind::Volume, 0.0295735, "liters"),
        ];
        for (aliases, canonical, kind, si_factor, si_unit) in rows {
            for alias in *aliases {
                table.insert(*alias, UnitInfo {
                    canonical,
                    kind: *kind,
                    si_factor: *si_factor,
                    si_unit,
                });
            }
        }
        table
    };

    static ref VALUE_UNIT: Regex =
        Regex::new(r"^(-?\d+(?:\.\d+)?)\s*(.+)$").expect("static measurement pattern");
}

/// Normalize a measurement surface form like `"30 feet"` or `"85%"`.
///
/// Returns `None` when the numeral or unit cannot be interpreted; the caller
/// keeps the match with a parse-failed flag.
pub fn normalize(surface: &str) -> Option<Normalized> {
    let caps = VALUE_UNIT.captures(surface.trim())?;
    let value_text = caps.get(1)?.as_str();
    let unit_text = caps.get(2)?.as_str();
    normalize_parts(value_text, unit_text, surface)
}

/// Split a measurement surface form into its numeral and unit tokens.
pub fn split_surface(surface: &str) -> Option<(String, String)> {
    let caps = VALUE_UNIT.captures(surface.trim())?;
    Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
}

/// Normalize a measurement from already-separated numeral and unit tokens.
///
/// `display` carries the surface text that tags will show; for a synthesized
/// range endpoint that is just the bare numeral.
pub fn normalize_parts(value_text: &str, unit_text: &str, display: &str) -> Option<Normalized> {
    let value: f64 = value_text.parse().ok()?;
    let unit_token = clean_unit(unit_text);

    // Temperatures convert by formula, not factor.
    if let Some((unit, si_value)) = temperature(&unit_token, value) {
        let key = format!(
            "temperature:{}:{}",
            format_number(value),
            unit.to_lowercase()
        );
        return Some(build(
            value,
            unit,
            si_value,
            "celsius",
            MeasurementKind::Temperature,
            display,
            &key,
        ));
    }

    if unit_token == "%" || unit_token == "percent" {
        return Some(build(
            value,
            "%",
            value,
            "%",
            MeasurementKind::Percentage,
            display,
            &format!("percentage:{}", format_number(value)),
        ));
    }

    let info = UNIT_TABLE.get(unit_token.as_str())?;
    let si_value = round6(value * info.si_factor);
    let key = format!(
        "{}:{}:{}",
        info.kind.as_str(),
        format_number(value),
        info.canonical
    );
    Some(build(
        value,
        unit_text.trim(),
        si_value,
        info.si_unit,
        info.kind,
        display,
        &key,
    ))
}

fn build(
    value: f64,
    unit: &str,
    si_value: f64,
    si_unit: &str,
    kind: MeasurementKind,
    display: &str,
    key: &str,
) -> Normalized {
    Normalized {
        key: key.to_string(),
        normalized: format_number(value),
        metadata: EntityMetadata::Measurement(MeasurementMetadata {
            value,
            unit: unit.to_string(),
            si_value,
            si_unit: si_unit.to_string(),
            measurement_type: kind,
            display_value: display.to_string(),
            range_of: None,
        }),
    }
}

/// Lowercase, strip a trailing period, and collapse inner whitespace.
fn clean_unit(unit: &str) -> String {
    let lowered = unit.trim().trim_end_matches('.').to_lowercase();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Interpret a temperature unit token, returning the display unit and the
/// value converted to Celsius.
fn temperature(unit_token: &str, value: f64) -> Option<(&'static str, f64)> {
    match unit_token {
        "f" | "°f" | "° f" | "fahrenheit" | "degrees fahrenheit" | "degree fahrenheit" => {
            Some(("°F", round6((value - 32.0) * 5.0 / 9.0)))
        }
        "c" | "°c" | "° c" | "celsius" | "degrees celsius" | "degree celsius" => {
            Some(("°C", value))
        }
        _ => None,
    }
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}
