//! End-to-end tests for the extraction pipeline.
//!
//! Covers the full path from raw text through matching, overlap resolution,
//! canonicalization, conflict resolution, and tagging, including the
//! round-trip and no-loss laws the engine guarantees.

use chrono::NaiveDate;
use entag::config::ConfigBuilder;
use entag::prelude::*;
use entag::tagger;
use entag::types::{EntityMetadata, MeasurementKind, PhoneType};

fn context() -> ExtractionContext {
    let config = ConfigBuilder::new()
        .with_reference_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
        .build()
        .unwrap();
    ExtractionContext::new(config).unwrap()
}

fn entities_of_type(report: &ExtractionReport, entity_type: EntityType) -> Vec<&CanonicalEntity> {
    report
        .entities
        .iter()
        .filter(|e| e.entity_type == entity_type)
        .collect()
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn parenthesized_metric_equivalents_become_two_entities() {
        let report = context()
            .process_document("Safety nets within 30 feet (9.1 meters)")
            .unwrap();

        let measurements = entities_of_type(&report, EntityType::Measurement);
        assert_eq!(measurements.len(), 2);

        match (&measurements[0].metadata, &measurements[1].metadata) {
            (EntityMetadata::Measurement(feet), EntityMetadata::Measurement(meters)) => {
                assert_eq!(feet.value, 30.0);
                assert_eq!(feet.unit, "feet");
                assert_eq!(feet.si_value, 9.144);
                assert_eq!(feet.si_unit, "meters");
                assert_eq!(meters.value, 9.1);
                assert_eq!(meters.unit, "meters");
                assert_eq!(meters.si_value, 9.1);
            }
            other => panic!("expected measurement metadata, got {other:?}"),
        }

        let a = &measurements[0].id;
        let b = &measurements[1].id;
        assert_eq!(
            report.tagged_text,
            format!("Safety nets within ||30 feet||{a}|| (||9.1 meters||{b}||)")
        );
    }

    #[test]
    fn toll_free_phone_number_normalizes_to_e164() {
        let report = context()
            .process_document("Report emergencies to (800) 321-6742 immediately.")
            .unwrap();

        let phones = entities_of_type(&report, EntityType::Phone);
        assert_eq!(phones.len(), 1);
        assert_eq!(phones[0].normalized, "+18003216742");
        match &phones[0].metadata {
            EntityMetadata::Phone(meta) => {
                assert_eq!(meta.phone_type, PhoneType::TollFree);
                assert!(meta.valid);
            }
            other => panic!("expected phone metadata, got {other:?}"),
        }
    }

    #[test]
    fn cfr_citation_decomposes_with_authority() {
        let report = context()
            .process_document("PPE requirements appear in 29 CFR 1910.132 of the standard.")
            .unwrap();

        let regulations = entities_of_type(&report, EntityType::Regulation);
        assert_eq!(regulations.len(), 1);
        assert_eq!(regulations[0].normalized, "CFR-29-1910-132");
        match &regulations[0].metadata {
            EntityMetadata::Regulation(meta) => {
                assert_eq!(meta.authority, "Department of Labor");
                assert_eq!(meta.title, 29);
                assert_eq!(meta.part, 1910);
                assert_eq!(meta.section, Some(132));
            }
            other => panic!("expected regulation metadata, got {other:?}"),
        }
    }

    #[test]
    fn city_and_state_stay_distinct_entities() {
        let report = context()
            .process_document("The New York City office reports to New York regulators.")
            .unwrap();

        let geo = entities_of_type(&report, EntityType::Gpe);
        assert_eq!(geo.len(), 2);

        let subcategory = |e: &CanonicalEntity| match &e.metadata {
            EntityMetadata::Geo(meta) => meta.subcategory.clone(),
            other => panic!("expected geo metadata, got {other:?}"),
        };
        let city = geo.iter().find(|e| e.normalized == "New York City").unwrap();
        let state = geo.iter().find(|e| e.normalized == "New York").unwrap();
        assert_eq!(subcategory(city), "major_cities");
        assert_eq!(subcategory(state), "us_states");
    }

    #[test]
    fn no_phantom_measurements_near_long_words() {
        let report = context()
            .process_document("The server has 8 GB of memory for geopolitical analysis.")
            .unwrap();

        assert!(entities_of_type(&report, EntityType::Measurement).is_empty());
    }

    #[test]
    fn measurement_range_links_two_endpoint_entities() {
        let report = context()
            .process_document("Guardrails must be 30-37 inches above the walking surface.")
            .unwrap();

        let measurements = entities_of_type(&report, EntityType::Measurement);
        assert_eq!(measurements.len(), 2);
        match (&measurements[0].metadata, &measurements[1].metadata) {
            (EntityMetadata::Measurement(low), EntityMetadata::Measurement(high)) => {
                assert_eq!(low.value, 30.0);
                assert_eq!(high.value, 37.0);
                assert_eq!(low.range_of.as_deref(), Some(measurements[1].id.as_str()));
                assert_eq!(high.range_of.as_deref(), Some(measurements[0].id.as_str()));
                assert_eq!(low.measurement_type, MeasurementKind::Length);
            }
            other => panic!("expected measurement metadata, got {other:?}"),
        }
    }

    #[test]
    fn date_range_emits_linked_endpoint_dates() {
        let report = context()
            .process_document("The inspection window runs August 15-20, 2024.")
            .unwrap();

        let dates = entities_of_type(&report, EntityType::Date);
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0].normalized, "2024-08-15");
        assert_eq!(dates[1].normalized, "2024-08-20");
        match (&dates[0].metadata, &dates[1].metadata) {
            (EntityMetadata::Date(start), EntityMetadata::Date(end)) => {
                assert_eq!(start.range_of.as_deref(), Some(dates[1].id.as_str()));
                assert_eq!(end.range_of.as_deref(), Some(dates[0].id.as_str()));
            }
            other => panic!("expected date metadata, got {other:?}"),
        }
        assert_eq!(dates[0].mentions.len(), 1);
        assert!(dates[1].mentions.is_empty());
    }

    #[test]
    fn fiscal_year_start_month_is_honored_end_to_end() {
        let config = ConfigBuilder::new()
            .with_reference_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .with_fiscal_year_start_month(10)
            .build()
            .unwrap();
        let report = ExtractionContext::new(config)
            .unwrap()
            .process_document("The audit closed on November 5, 2024.")
            .unwrap();

        let dates = entities_of_type(&report, EntityType::Date);
        assert_eq!(dates.len(), 1);
        match &dates[0].metadata {
            EntityMetadata::Date(meta) => assert_eq!(meta.fiscal_year, 2025),
            other => panic!("expected date metadata, got {other:?}"),
        }
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;

    const MIXED_DOCUMENT: &str = "OSHA cited Acme Corporation under 29 CFR 1910.132 on \
        January 15, 2024. Guardrails were 30-37 inches instead of the required 42 inches \
        (1.07 meters). The $2.5 million settlement is due by 3/1/2025; call (800) 321-6742 \
        or email compliance@acme.example.com. Offices in Georgia and New York City are \
        affected, per https://www.osha.gov/laws-regs.";

    #[test]
    fn no_match_is_lost() {
        let report = context().process_document(MIXED_DOCUMENT).unwrap();

        let mention_total: usize = report.entities.iter().map(|e| e.mentions.len()).sum();
        assert_eq!(mention_total, report.summary.raw_match_count);
        assert!(report.summary.raw_match_count > 8);
    }

    #[test]
    fn tagged_text_round_trips_to_the_original() {
        let report = context().process_document(MIXED_DOCUMENT).unwrap();
        let restored = tagger::untag(&report.tagged_text, &report.entities).unwrap();
        assert_eq!(restored, MIXED_DOCUMENT);
    }

    #[test]
    fn tags_preserve_original_units_verbatim() {
        let report = context().process_document(MIXED_DOCUMENT).unwrap();

        assert!(report.tagged_text.contains("||42 inches||"));
        assert!(!report.tagged_text.contains("||1.07||"));
        for entity in entities_of_type(&report, EntityType::Measurement) {
            if let EntityMetadata::Measurement(meta) = &entity.metadata {
                let first_mention = entity.mentions.first();
                if let Some(mention) = first_mention {
                    assert!(mention.text.contains(&meta.display_value)
                        || meta.display_value.contains(&mention.text));
                }
            }
        }
    }

    #[test]
    fn entity_ids_are_unique_within_a_document() {
        let report = context().process_document(MIXED_DOCUMENT).unwrap();
        let mut ids: Vec<&str> = report.entities.iter().map(|e| e.id.as_str()).collect();
        let before = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn conflict_resolution_is_deterministic() {
        let context = context();
        let first = context.process_document(MIXED_DOCUMENT).unwrap();
        for _ in 0..5 {
            let next = context.process_document(MIXED_DOCUMENT).unwrap();
            assert_eq!(first.entities, next.entities);
            assert_eq!(first.tagged_text, next.tagged_text);
        }
    }

    #[test]
    fn non_replaced_text_is_untouched() {
        let report = context().process_document(MIXED_DOCUMENT).unwrap();
        // Words with no entity in them survive byte-for-byte.
        assert!(report.tagged_text.contains("cited"));
        assert!(report.tagged_text.contains("instead of the required"));
        assert!(report.tagged_text.contains("settlement is due by"));
    }
}
