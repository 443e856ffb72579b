//! Conflict resolver for competing gazetteer classifications of one span.
//!
//! A pure scoring function: no state, no randomness. The same candidate set
//! always yields the same winner.

use tracing::debug;

use crate::gazetteer::{subcategory_level, subcategory_weight};
use crate::types::EntityType;

/// One candidate classification for a span.
///
/// Candidates arrive in gazetteer list order, which is the deterministic
/// tie-breaker when priority weights are equal.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Entity type the gazetteer list assigns
    pub entity_type: EntityType,
    /// Gazetteer subcategory
    pub subcategory: String,
}

/// The resolved classification for a span.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Winning entity type
    pub entity_type: EntityType,
    /// Winning subcategory
    pub subcategory: String,
    /// Political or geographic level of the winner
    pub level: String,
    /// 1.0 for a single candidate; lower when priority or list order decided
    pub confidence: f32,
    /// Non-winning subcategories, in candidate order
    pub alternatives: Vec<String>,
}

/// Pick the winning classification from one or more candidates.
///
/// Highest fixed priority weight wins; ties go to the earliest candidate in
/// gazetteer list order and are logged as low-confidence rather than treated
/// as an error.
pub fn resolve(candidates: &[Candidate]) -> Resolution {
    debug_assert!(!candidates.is_empty());

    let mut winner_index = 0;
    let mut winner_weight = subcategory_weight(&candidates[0].subcategory);
    let mut tied = false;

    for (index, candidate) in candidates.iter().enumerate().skip(1) {
        let weight = subcategory_weight(&candidate.subcategory);
        if weight > winner_weight {
            winner_index = index;
            winner_weight = weight;
            tied = false;
        } else if weight == winner_weight {
            tied = true;
        }
    }

    let winner = &candidates[winner_index];
    let alternatives: Vec<String> = candidates
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != winner_index)
        .map(|(_, c)| c.subcategory.clone())
        .collect();

    let confidence = if candidates.len() == 1 {
        1.0
    } else if tied {
        debug!(
            subcategory = %winner.subcategory,
            alternatives = ?alternatives,
            "ambiguous classification resolved by gazetteer list order"
        );
        0.6
    } else {
        0.9
    };

    Resolution {
        entity_type: winner.entity_type,
        subcategory: winner.subcategory.clone(),
        level: subcategory_level(&winner.subcategory).to_string(),
        confidence,
        alternatives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(entity_type: EntityType, subcategory: &str) -> Candidate {
        Candidate {
            entity_type,
            subcategory: subcategory.to_string(),
        }
    }

    #[test]
    fn higher_priority_subcategory_wins() {
        // A country listing outranks a state listing for the same literal.
        let resolution = resolve(&[
            candidate(EntityType::Gpe, "countries"),
            candidate(EntityType::Gpe, "us_states"),
        ]);
        assert_eq!(resolution.subcategory, "countries");
        assert_eq!(resolution.level, "country");
        assert_eq!(resolution.alternatives, vec!["us_states"]);
        assert!((resolution.confidence - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn agency_outranks_everything() {
        let resolution = resolve(&[
            candidate(EntityType::Gpe, "major_cities"),
            candidate(EntityType::Gpe, "government_agencies"),
            candidate(EntityType::Person, "surnames"),
        ]);
        assert_eq!(resolution.subcategory, "government_agencies");
        assert_eq!(resolution.entity_type, EntityType::Gpe);
        assert_eq!(resolution.alternatives, vec!["major_cities", "surnames"]);
    }

    #[test]
    fn ties_break_by_list_order_deterministically() {
        let candidates = [
            candidate(EntityType::Gpe, "us_states"),
            candidate(EntityType::Gpe, "provinces"),
        ];
        for _ in 0..10 {
            let resolution = resolve(&candidates);
            assert_eq!(resolution.subcategory, "us_states");
            assert!((resolution.confidence - 0.6).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn single_candidate_is_fully_confident() {
        let resolution = resolve(&[candidate(EntityType::Location, "regions")]);
        assert!((resolution.confidence - 1.0).abs() < f32::EPSILON);
        assert!(resolution.alternatives.is_empty());
        assert_eq!(resolution.level, "region");
    }
}
