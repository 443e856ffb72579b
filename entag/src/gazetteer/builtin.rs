//! Compiled-in default gazetteer.
//!
//! A compact curated set covering the subcategories the conflict resolver
//! knows about. File-based gazetteers extend or replace it at load time.

use super::GazetteerEntry;
use crate::types::EntityType;

const COUNTRIES: &[&str] = &[
    "United States",
    "United States of America",
    "Canada",
    "Mexico",
    "United Kingdom",
    "France",
    "Germany",
    "Italy",
    "Spain",
    "China",
    "Japan",
    "India",
    "Brazil",
    "Australia",
    "Russia",
    "South Korea",
    "Netherlands",
    "Switzerland",
    "Sweden",
    "Norway",
    "Ireland",
    "New Zealand",
    "Georgia",
];

const US_STATES: &[&str] = &[
    "Alabama",
    "Alaska",
    "Arizona",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Illinois",
    "Indiana",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Missouri",
    "Nevada",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Tennessee",
    "Texas",
    "Utah",
    "Virginia",
    "Washington",
    "Wisconsin",
];

const MAJOR_CITIES: &[&str] = &[
    "New York City",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Phoenix",
    "Philadelphia",
    "San Antonio",
    "San Diego",
    "Dallas",
    "San Francisco",
    "Seattle",
    "Denver",
    "Boston",
    "Atlanta",
    "Miami",
    "Detroit",
    "Portland",
    "London",
    "Paris",
    "Berlin",
    "Tokyo",
    "Beijing",
    "Toronto",
    "Sydney",
];

const GOVERNMENT_AGENCIES: &[&str] = &[
    "OSHA",
    "Occupational Safety and Health Administration",
    "EPA",
    "Environmental Protection Agency",
    "FDA",
    "Food and Drug Administration",
    "CDC",
    "Centers for Disease Control and Prevention",
    "NIOSH",
    "Department of Labor",
    "Department of Transportation",
    "Department of Energy",
    "Federal Aviation Administration",
    "FAA",
    "Securities and Exchange Commission",
    "SEC",
    "Internal Revenue Service",
    "IRS",
    "Federal Communications Commission",
    "FCC",
];

const INTERNATIONAL_ORGANIZATIONS: &[&str] = &[
    "European Union",
    "United Nations",
    "World Health Organization",
    "NATO",
    "World Trade Organization",
    "International Monetary Fund",
    "World Bank",
];

const REGIONS: &[&str] = &[
    "Pacific Northwest",
    "Midwest",
    "New England",
    "Gulf Coast",
    "Bay Area",
    "East Coast",
    "West Coast",
    "Middle East",
    "Southeast Asia",
    "Latin America",
    "Scandinavia",
];

const LANDMARKS: &[&str] = &[
    "Grand Canyon",
    "Mount Rainier",
    "Mississippi River",
    "Lake Michigan",
    "Rocky Mountains",
    "Appalachian Mountains",
];

const GIVEN_NAMES: &[&str] = &[
    "John",
    "Jane",
    "Mary",
    "James",
    "Robert",
    "Michael",
    "William",
    "David",
    "Richard",
    "Susan",
    "Jennifer",
    "Elizabeth",
    "Sarah",
    "Karen",
    "Daniel",
    "Maria",
];

const SURNAMES: &[&str] = &[
    "Smith",
    "Johnson",
    "Williams",
    "Brown",
    "Jones",
    "Garcia",
    "Miller",
    "Davis",
    "Rodriguez",
    "Martinez",
    "Anderson",
    "Taylor",
    "Thomas",
    "Moore",
    "Jackson",
];

const ORGANIZATIONS: &[&str] = &[
    "Acme Corporation",
    "General Electric",
    "Boeing",
    "Lockheed Martin",
    "Caterpillar",
    "John Deere",
    "DuPont",
    "Dow Chemical",
    "Exxon Mobil",
    "Chevron",
    "Union Pacific",
    "National Safety Council",
    "American National Standards Institute",
    "ANSI",
];

/// The default entries, in fixed list order.
///
/// Order matters: it is the deterministic tie-breaker when two subcategories
/// carry the same priority weight for one span.
pub fn builtin_entries() -> Vec<GazetteerEntry> {
    let mut entries = Vec::new();

    let lists: &[(&[&str], EntityType, &str)] = &[
        (GOVERNMENT_AGENCIES, EntityType::Gpe, "government_agencies"),
        (COUNTRIES, EntityType::Gpe, "countries"),
        (US_STATES, EntityType::Gpe, "us_states"),
        (MAJOR_CITIES, EntityType::Gpe, "major_cities"),
        (
            INTERNATIONAL_ORGANIZATIONS,
            EntityType::Gpe,
            "international_organizations",
        ),
        (REGIONS, EntityType::Location, "regions"),
        (LANDMARKS, EntityType::Location, "landmarks"),
        (GIVEN_NAMES, EntityType::Person, "given_names"),
        (SURNAMES, EntityType::Person, "surnames"),
        (ORGANIZATIONS, EntityType::Organization, "organizations"),
    ];

    for (literals, entity_type, subcategory) in lists {
        for literal in *literals {
            entries.push(GazetteerEntry::new(*literal, *entity_type, *subcategory));
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn georgia_is_both_country_and_state() {
        let entries = builtin_entries();
        let classifications: Vec<&str> = entries
            .iter()
            .filter(|e| e.literal == "Georgia")
            .map(|e| e.subcategory.as_str())
            .collect();
        assert_eq!(classifications, vec!["countries", "us_states"]);
    }

    #[test]
    fn agencies_precede_countries_in_list_order() {
        let entries = builtin_entries();
        let first_agency = entries
            .iter()
            .position(|e| e.subcategory == "government_agencies")
            .unwrap();
        let first_country = entries
            .iter()
            .position(|e| e.subcategory == "countries")
            .unwrap();
        assert!(first_agency < first_country);
    }
}
