//! Phone number normalization to E.164 with component breakdown.

use std::collections::HashSet;

use lazy_static::lazy_static;

use super::Normalized;
use crate::types::{EntityMetadata, PhoneMetadata, PhoneType};

lazy_static! {
    /// North American toll-free area codes.
    static ref TOLL_FREE_AREA_CODES: HashSet<&'static str> =
        ["800", "888", "877", "866", "855", "844", "833"].into_iter().collect();
}

/// Normalize a phone surface form like `"(800) 321-6742"`.
///
/// Country code defaults to 1 unless an explicit `+<cc>` prefix is present.
/// A wrong digit count does not reject the match; it is kept with
/// `valid: false` so downstream tagging stays complete.
pub fn normalize(surface: &str) -> Option<Normalized> {
    let digits: String = surface.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let explicit_cc = surface.trim_start().starts_with('+');
    let (country_code, national) = if explicit_cc && digits.len() > 10 {
        let split = digits.len() - 10;
        (digits[..split].to_string(), digits[split..].to_string())
    } else if !explicit_cc && digits.len() == 11 && digits.starts_with('1') {
        ("1".to_string(), digits[1..].to_string())
    } else {
        ("1".to_string(), digits)
    };

    let valid = national.len() == 10;
    let (area_code, local_number) = if valid {
        (national[..3].to_string(), national[3..].to_string())
    } else {
        let split = national.len().min(3);
        (national[..split].to_string(), national[split..].to_string())
    };

    let phone_type = if TOLL_FREE_AREA_CODES.contains(area_code.as_str()) {
        PhoneType::TollFree
    } else {
        PhoneType::Landline
    };

    let national_format = if valid {
        format!(
            "({}) {}-{}",
            area_code,
            &local_number[..3],
            &local_number[3..]
        )
    } else {
        surface.trim().to_string()
    };

    let normalized = format!("+{country_code}{national}");

    Some(Normalized {
        key: normalized.clone(),
        normalized,
        metadata: EntityMetadata::Phone(PhoneMetadata {
            country_code,
            area_code,
            local_number,
            phone_type,
            national_format,
            valid,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(normalized: &Normalized) -> &PhoneMetadata {
        match &normalized.metadata {
            EntityMetadata::Phone(m) => m,
            other => panic!("expected phone metadata, got {other:?}"),
        }
    }

    #[test]
    fn toll_free_number_normalizes_to_e164() {
        let n = normalize("(800) 321-6742").unwrap();
        assert_eq!(n.normalized, "+18003216742");
        let m = meta(&n);
        assert_eq!(m.phone_type, PhoneType::TollFree);
        assert_eq!(m.country_code, "1");
        assert_eq!(m.area_code, "800");
        assert_eq!(m.local_number, "3216742");
        assert_eq!(m.national_format, "(800) 321-6742");
        assert!(m.valid);
    }

    #[test]
    fn formatting_variants_share_a_key() {
        let a = normalize("(555) 123-4567").unwrap();
        let b = normalize("555.123.4567").unwrap();
        let c = normalize("1-555-123-4567").unwrap();
        assert_eq!(a.key, b.key);
        assert_eq!(b.key, c.key);
        assert_eq!(meta(&a).phone_type, PhoneType::Landline);
    }

    #[test]
    fn explicit_country_code_is_respected() {
        let n = normalize("+44 20 7946 0958").unwrap();
        assert_eq!(n.normalized, "+442079460958");
        assert_eq!(meta(&n).country_code, "44");
    }

    #[test]
    fn short_numbers_are_kept_but_flagged() {
        let n = normalize("123-4567").unwrap();
        let m = meta(&n);
        assert!(!m.valid);
        assert_eq!(m.national_format, "123-4567");
    }
}
