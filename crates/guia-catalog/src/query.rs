//! Read-only catalog queries
//!
//! Predicate filtering over cuisine, price, voucher acceptance, diets and
//! accessibility. Results keep catalog order; there is no ranking.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use guia_core::{PriceLevel, RestaurantRecord, TriState};

use crate::Catalog;

/// Default number of results returned by a filter
pub const DEFAULT_LIMIT: usize = 5;

/// Stance on a yes/no attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    /// No constraint
    #[default]
    Any,
    /// The record must state `true`
    Required,
    /// The record must not state `true`
    Excluded,
}

impl Preference {
    /// Whether a record value satisfies this preference
    ///
    /// `Excluded` admits unknown values; only a stated `true` is rejected.
    pub fn admits(&self, value: TriState) -> bool {
        match self {
            Self::Any => true,
            Self::Required => value == TriState::Yes,
            Self::Excluded => value != TriState::Yes,
        }
    }
}

impl FromStr for Preference {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "any" | "indiferente" => Ok(Self::Any),
            "yes" | "required" | "sim" => Ok(Self::Required),
            "no" | "excluded" | "nao" | "não" => Ok(Self::Excluded),
            _ => Err(format!("Unknown preference: {s}")),
        }
    }
}

/// Criteria for selecting restaurants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestaurantFilter {
    /// Any overlap matches (case-insensitive); empty means any cuisine
    pub cuisines: Vec<String>,
    /// Exact price level
    pub price_level: Option<PriceLevel>,
    pub voucher: Preference,
    /// Every listed diet must be offered (case-insensitive)
    pub diets: Vec<String>,
    pub accessibility: Preference,
    /// Maximum results; `None` means [`DEFAULT_LIMIT`]
    pub limit: Option<usize>,
}

impl RestaurantFilter {
    /// Whether a single record satisfies every criterion
    pub fn matches(&self, record: &RestaurantRecord) -> bool {
        if !self.cuisines.is_empty() {
            let offered: Vec<String> = record.cuisine.iter().map(|c| c.to_lowercase()).collect();
            if !self
                .cuisines
                .iter()
                .any(|c| offered.contains(&c.to_lowercase()))
            {
                return false;
            }
        }

        if let Some(price) = self.price_level {
            if record.price_level != Some(price) {
                return false;
            }
        }

        if !self.voucher.admits(record.accepts_voucher) {
            return false;
        }

        if !self.diets.is_empty() {
            let offered: Vec<String> = record
                .diet_options
                .iter()
                .map(|d| d.to_lowercase())
                .collect();
            if !self
                .diets
                .iter()
                .all(|d| offered.contains(&d.to_lowercase()))
            {
                return false;
            }
        }

        self.accessibility.admits(record.accessibility)
    }

    /// Matching records in catalog order, up to the limit
    pub fn filter<'a>(&self, catalog: &'a Catalog) -> Vec<&'a RestaurantRecord> {
        catalog
            .iter()
            .filter(|record| self.matches(record))
            .take(self.limit.unwrap_or(DEFAULT_LIMIT))
            .collect()
    }
}

/// Distinct values offered across the catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Facets {
    pub cuisines: Vec<String>,
    pub diets: Vec<String>,
}

/// Sorted unique cuisines and diet options
pub fn facets(catalog: &Catalog) -> Facets {
    let mut cuisines = BTreeSet::new();
    let mut diets = BTreeSet::new();

    for record in catalog.iter() {
        cuisines.extend(record.cuisine.iter().filter(|c| !c.is_empty()).cloned());
        diets.extend(record.diet_options.iter().filter(|d| !d.is_empty()).cloned());
    }

    Facets {
        cuisines: cuisines.into_iter().collect(),
        diets: diets.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        name: &str,
        cuisine: &[&str],
        price: Option<PriceLevel>,
        voucher: TriState,
        diets: &[&str],
        accessibility: TriState,
    ) -> RestaurantRecord {
        RestaurantRecord {
            cuisine: cuisine.iter().map(|s| s.to_string()).collect(),
            price_level: price,
            accepts_voucher: voucher,
            diet_options: diets.iter().map(|s| s.to_string()).collect(),
            accessibility,
            ..RestaurantRecord::new(name, "Pinheiros")
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            record(
                "Arlete Bar e Mercearia",
                &["bar"],
                Some(PriceLevel::Moderate),
                TriState::Yes,
                &["vegetariana"],
                TriState::Unknown,
            ),
            record(
                "Momokuri",
                &["Japonesa"],
                Some(PriceLevel::Upscale),
                TriState::No,
                &["vegetariana", "sem glúten"],
                TriState::Yes,
            ),
            record(
                "Jojo Ramen",
                &["japonesa", "lamen"],
                Some(PriceLevel::Moderate),
                TriState::Unknown,
                &[],
                TriState::No,
            ),
        ])
        .unwrap()
    }

    fn names(records: Vec<&RestaurantRecord>) -> Vec<&str> {
        records.into_iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_order() {
        let catalog = catalog();
        let result = RestaurantFilter::default().filter(&catalog);
        assert_eq!(
            names(result),
            vec!["Arlete Bar e Mercearia", "Momokuri", "Jojo Ramen"]
        );
    }

    #[test]
    fn test_cuisine_overlap_is_case_insensitive() {
        let catalog = catalog();
        let filter = RestaurantFilter {
            cuisines: vec!["JAPONESA".to_string(), "italiana".to_string()],
            ..Default::default()
        };
        assert_eq!(names(filter.filter(&catalog)), vec!["Momokuri", "Jojo Ramen"]);
    }

    #[test]
    fn test_tri_state_preferences() {
        let catalog = catalog();

        let required = RestaurantFilter {
            voucher: Preference::Required,
            ..Default::default()
        };
        assert_eq!(names(required.filter(&catalog)), vec!["Arlete Bar e Mercearia"]);

        // Unknown is not a stated "yes", so it survives an exclusion
        let excluded = RestaurantFilter {
            voucher: Preference::Excluded,
            ..Default::default()
        };
        assert_eq!(names(excluded.filter(&catalog)), vec!["Momokuri", "Jojo Ramen"]);

        let accessible = RestaurantFilter {
            accessibility: Preference::Required,
            ..Default::default()
        };
        assert_eq!(names(accessible.filter(&catalog)), vec!["Momokuri"]);
    }

    #[test]
    fn test_diets_require_all_and_price_is_exact() {
        let catalog = catalog();
        let filter = RestaurantFilter {
            diets: vec!["Vegetariana".to_string(), "sem glúten".to_string()],
            ..Default::default()
        };
        assert_eq!(names(filter.filter(&catalog)), vec!["Momokuri"]);

        let filter = RestaurantFilter {
            price_level: Some(PriceLevel::Moderate),
            limit: Some(1),
            ..Default::default()
        };
        assert_eq!(names(filter.filter(&catalog)), vec!["Arlete Bar e Mercearia"]);
    }

    #[test]
    fn test_facets_sorted_unique() {
        let facets = facets(&catalog());
        assert_eq!(facets.cuisines, vec!["Japonesa", "bar", "japonesa", "lamen"]);
        assert_eq!(facets.diets, vec!["sem glúten", "vegetariana"]);
    }

    #[test]
    fn test_preference_parsing() {
        assert_eq!("sim".parse::<Preference>().unwrap(), Preference::Required);
        assert_eq!("Não".parse::<Preference>().unwrap(), Preference::Excluded);
        assert_eq!("any".parse::<Preference>().unwrap(), Preference::Any);
        assert!("talvez".parse::<Preference>().is_err());
    }
}
