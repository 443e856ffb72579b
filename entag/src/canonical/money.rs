//! Monetary-amount normalization: currency, numeral, and magnitude words.

use lazy_static::lazy_static;
use regex::Regex;

use super::{format_number, Normalized};
use crate::types::{EntityMetadata, MoneyMetadata};

lazy_static! {
    static ref MONEY_FORM: Regex = Regex::new(
        r"(?i)^([$€£¥])?\s*(\d+(?:,\d{3})*(?:\.\d+)?)\s*(thousand|million|billion|trillion)?\s*(usd|eur|gbp|jpy|dollars?|euros?|pounds?|yen)?$"
    )
    .expect("static money pattern");
}

/// Normalize a money surface form like `"$2.5 million"` or `"500 dollars"`.
pub fn normalize(surface: &str) -> Option<Normalized> {
    let caps = MONEY_FORM.captures(surface.trim())?;

    let symbol = caps.get(1).map(|m| m.as_str());
    let number_text = caps.get(2)?.as_str();
    let magnitude = caps.get(3).map(|m| m.as_str().to_lowercase());
    let code = caps.get(4).map(|m| m.as_str());

    // Bare numbers never reach this module, but the form still requires an
    // explicit currency marker on at least one side.
    if symbol.is_none() && code.is_none() {
        return None;
    }

    let original_value: f64 = number_text.replace(',', "").parse().ok()?;
    let multiplier = match magnitude.as_deref() {
        Some("thousand") => 1e3,
        Some("million") => 1e6,
        Some("billion") => 1e9,
        Some("trillion") => 1e12,
        _ => 1.0,
    };
    let total = original_value * multiplier;

    let currency = code
        .map(currency_from_code)
        .or_else(|| symbol.map(currency_from_symbol))
        .unwrap_or("USD");

    let normalized = format_number(total);
    let formatted = format!("{}{}", display_symbol(currency), group_thousands(&normalized));

    Some(Normalized {
        key: format!("{currency}:{normalized}"),
        normalized,
        metadata: EntityMetadata::Money(MoneyMetadata {
            currency: currency.to_string(),
            original_value,
            magnitude,
            multiplier,
            formatted,
        }),
    })
}

fn currency_from_symbol(symbol: &str) -> &'static str {
    match symbol {
        "€" => "EUR",
        "£" => "GBP",
        "¥" => "JPY",
        _ => "USD",
    }
}

fn currency_from_code(code: &str) -> &'static str {
    match code.to_lowercase().as_str() {
        "eur" | "euro" | "euros" => "EUR",
        "gbp" | "pound" | "pounds" => "GBP",
        "jpy" | "yen" => "JPY",
        _ => "USD",
    }
}

fn display_symbol(currency: &str) -> &'static str {
    match currency {
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        _ => "$",
    }
}

/// Insert thousands separators into the integer part of a decimal string.
fn group_thousands(decimal: &str) -> String {
    let (int_part, frac_part) = match decimal.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (decimal, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    let digits: Vec<char> = int_part.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}
