//! Field-level merge of an extraction into a catalog record
//!
//! Precedence rules:
//! - scalars (address, neighborhood, price level, description, hours): a
//!   stated incoming value wins, an unknown one preserves the existing value
//! - tri-states: a stated incoming value wins, `Unknown` never downgrades
//! - lists (cuisine, diet options, highlights): union on the folded form,
//!   existing entries first, never shrinking
//! - name: the existing display name is kept
//!
//! A defaulted neighborhood counts as unknown when merging into an existing
//! record, so it cannot move a restaurant the text never placed.

use serde::Serialize;

use guia_core::{
    fold_key, name_key, ExtractedFields, Field, GuiaError, RestaurantRecord, Result, TriState,
    DEFAULT_NEIGHBORHOOD,
};

// ============================================================================
// Merge Report
// ============================================================================

/// What a merge did to one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldOutcome {
    /// Field was unresolved and now holds a value
    Added,
    /// Stated value replaced a different one
    Overwritten,
    /// Stated value equals the existing one
    Unchanged,
    /// Incoming value unknown, existing value kept
    Preserved,
    /// List gained new entries
    Unioned,
    /// Unknown on both sides
    Unresolved,
}

impl FieldOutcome {
    /// Whether the record differs from before in this field
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Added | Self::Overwritten | Self::Unioned)
    }
}

/// Per-record account of a merge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeReport {
    pub record_key: String,
    pub name: String,
    pub created: bool,
    pub changes: Vec<(Field, FieldOutcome)>,
}

impl MergeReport {
    /// Whether applying the merge changes the catalog
    pub fn has_changes(&self) -> bool {
        self.created || self.changes.iter().any(|(_, outcome)| outcome.is_change())
    }

    /// Outcome recorded for a field
    pub fn outcome(&self, field: Field) -> Option<FieldOutcome> {
        self.changes
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, outcome)| *outcome)
    }

    /// Fields whose value changed
    pub fn changed_fields(&self) -> Vec<Field> {
        self.changes
            .iter()
            .filter(|(_, outcome)| outcome.is_change())
            .map(|(field, _)| *field)
            .collect()
    }
}

// ============================================================================
// Merge
// ============================================================================

/// Merge incoming fields into an existing record, or create a new one
///
/// Returns `GuiaError::ParseAmbiguous` when the incoming fields carry no name.
pub fn merge(
    existing: Option<&RestaurantRecord>,
    incoming: &ExtractedFields,
) -> Result<(RestaurantRecord, MergeReport)> {
    let incoming_name = incoming
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| GuiaError::ParseAmbiguous("extraction carries no name".to_string()))?;

    match existing {
        Some(record) => Ok(merge_into(record, incoming)),
        None => Ok(create(incoming_name, incoming)),
    }
}

fn create(name: &str, incoming: &ExtractedFields) -> (RestaurantRecord, MergeReport) {
    let neighborhood = incoming
        .neighborhood
        .clone()
        .unwrap_or_else(|| DEFAULT_NEIGHBORHOOD.to_string());

    let record = RestaurantRecord {
        name: name.to_string(),
        address: incoming.address.clone(),
        neighborhood,
        cuisine: union(&[], &incoming.cuisine),
        price_level: incoming.price_level,
        accepts_voucher: incoming.accepts_voucher,
        diet_options: union(&[], &incoming.diet_options),
        accessibility: incoming.accessibility,
        highlights: union(&[], &incoming.highlights),
        description: incoming.description.clone(),
        hours: incoming.hours.clone(),
    };

    let changes = Field::ALL
        .iter()
        .map(|&field| {
            let outcome = if field == Field::Neighborhood || incoming.is_known(field) {
                FieldOutcome::Added
            } else {
                FieldOutcome::Unresolved
            };
            (field, outcome)
        })
        .collect();

    let report = MergeReport {
        record_key: name_key(&record.name),
        name: record.name.clone(),
        created: true,
        changes,
    };
    (record, report)
}

fn merge_into(
    existing: &RestaurantRecord,
    incoming: &ExtractedFields,
) -> (RestaurantRecord, MergeReport) {
    let mut record = existing.clone();
    let mut changes = vec![(Field::Name, FieldOutcome::Unchanged)];

    let address = merge_scalar(&mut record.address, &incoming.address);
    changes.push((Field::Address, address));

    let stated_neighborhood = incoming
        .neighborhood
        .clone()
        .filter(|_| !incoming.neighborhood_defaulted);
    let mut neighborhood = Some(record.neighborhood.clone());
    let outcome = merge_scalar(&mut neighborhood, &stated_neighborhood);
    if let Some(value) = neighborhood {
        record.neighborhood = value;
    }
    changes.push((Field::Neighborhood, outcome));

    changes.push((Field::Cuisine, merge_list(&mut record.cuisine, &incoming.cuisine)));
    changes.push((
        Field::PriceLevel,
        merge_scalar(&mut record.price_level, &incoming.price_level),
    ));
    changes.push((
        Field::AcceptsVoucher,
        merge_tri(&mut record.accepts_voucher, incoming.accepts_voucher),
    ));
    changes.push((
        Field::DietOptions,
        merge_list(&mut record.diet_options, &incoming.diet_options),
    ));
    changes.push((
        Field::Accessibility,
        merge_tri(&mut record.accessibility, incoming.accessibility),
    ));
    changes.push((
        Field::Highlights,
        merge_list(&mut record.highlights, &incoming.highlights),
    ));
    changes.push((
        Field::Description,
        merge_scalar(&mut record.description, &incoming.description),
    ));
    changes.push((Field::Hours, merge_scalar(&mut record.hours, &incoming.hours)));

    let report = MergeReport {
        record_key: existing.key(),
        name: existing.name.clone(),
        created: false,
        changes,
    };
    (record, report)
}

fn merge_scalar<T: Clone + PartialEq>(current: &mut Option<T>, incoming: &Option<T>) -> FieldOutcome {
    let Some(value) = incoming else {
        return if current.is_some() {
            FieldOutcome::Preserved
        } else {
            FieldOutcome::Unresolved
        };
    };

    let outcome = match current.as_ref() {
        None => FieldOutcome::Added,
        Some(old) if old == value => return FieldOutcome::Unchanged,
        Some(_) => FieldOutcome::Overwritten,
    };
    *current = Some(value.clone());
    outcome
}

fn merge_tri(current: &mut TriState, incoming: TriState) -> FieldOutcome {
    match (current.is_known(), incoming.is_known()) {
        (true, false) => FieldOutcome::Preserved,
        (false, false) => FieldOutcome::Unresolved,
        (false, true) => {
            *current = incoming;
            FieldOutcome::Added
        }
        (true, true) if *current == incoming => FieldOutcome::Unchanged,
        (true, true) => {
            *current = incoming;
            FieldOutcome::Overwritten
        }
    }
}

fn merge_list(current: &mut Vec<String>, incoming: &[String]) -> FieldOutcome {
    let merged = union(current, incoming);
    let outcome = match (current.is_empty(), merged.len() > current.len()) {
        (true, true) => FieldOutcome::Added,
        (false, true) => FieldOutcome::Unioned,
        (true, false) => FieldOutcome::Unresolved,
        (false, false) if incoming.is_empty() => FieldOutcome::Preserved,
        (false, false) => FieldOutcome::Unchanged,
    };
    *current = merged;
    outcome
}

/// Existing entries untouched, then incoming entries not yet present
fn union(existing: &[String], incoming: &[String]) -> Vec<String> {
    let mut keys: Vec<String> = existing.iter().map(|v| fold_key(v)).collect();
    let mut merged = existing.to_vec();

    for value in incoming {
        let key = fold_key(value);
        if key.is_empty() || keys.contains(&key) {
            continue;
        }
        keys.push(key);
        merged.push(value.trim().to_string());
    }

    merged
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use guia_core::PriceLevel;
    use proptest::prelude::*;

    fn arlete() -> RestaurantRecord {
        RestaurantRecord {
            address: Some("Rua Vupabussu, 101".to_string()),
            cuisine: vec!["bar".to_string()],
            price_level: Some(PriceLevel::Moderate),
            accepts_voucher: TriState::Yes,
            diet_options: vec!["vegetariana".to_string()],
            description: Some("Bar descolado com petiscos.".to_string()),
            ..RestaurantRecord::new("Arlete Bar e Mercearia", "Pinheiros")
        }
    }

    #[test]
    fn test_create_from_sparse_fields() {
        let incoming = ExtractedFields {
            cuisine: vec!["japonesa".to_string()],
            neighborhood: Some("Pinheiros".to_string()),
            neighborhood_defaulted: true,
            ..ExtractedFields::named("Momokuri")
        };

        let (record, report) = merge(None, &incoming).unwrap();
        assert!(report.created);
        assert!(report.has_changes());
        assert_eq!(record.name, "Momokuri");
        assert_eq!(record.neighborhood, "Pinheiros");
        assert_eq!(record.accepts_voucher, TriState::Unknown);
        assert_eq!(record.price_level, None);
        assert_eq!(report.outcome(Field::Cuisine), Some(FieldOutcome::Added));
        assert_eq!(report.outcome(Field::Hours), Some(FieldOutcome::Unresolved));
    }

    #[test]
    fn test_unknown_never_overwrites() {
        let existing = arlete();
        let incoming = ExtractedFields::named("arlete bar e mercearia");

        let (record, report) = merge(Some(&existing), &incoming).unwrap();
        assert_eq!(record, existing);
        assert!(!report.has_changes());
        assert_eq!(
            report.outcome(Field::AcceptsVoucher),
            Some(FieldOutcome::Preserved)
        );
        assert_eq!(
            report.outcome(Field::Accessibility),
            Some(FieldOutcome::Unresolved)
        );
    }

    #[test]
    fn test_stated_values_overwrite() {
        let existing = arlete();
        let incoming = ExtractedFields {
            price_level: Some(PriceLevel::Upscale),
            accepts_voucher: TriState::No,
            accessibility: TriState::Yes,
            ..ExtractedFields::named("Arlete Bar e Mercearia")
        };

        let (record, report) = merge(Some(&existing), &incoming).unwrap();
        assert_eq!(record.price_level, Some(PriceLevel::Upscale));
        assert_eq!(record.accepts_voucher, TriState::No);
        assert_eq!(record.accessibility, TriState::Yes);
        assert_eq!(
            report.changed_fields(),
            vec![Field::PriceLevel, Field::AcceptsVoucher, Field::Accessibility]
        );
    }

    #[test]
    fn test_lists_union_without_shrinking() {
        let existing = arlete();
        let incoming = ExtractedFields {
            diet_options: vec!["Vegetariana".to_string(), "vegana".to_string()],
            ..ExtractedFields::named("Arlete Bar e Mercearia")
        };

        let (record, report) = merge(Some(&existing), &incoming).unwrap();
        assert_eq!(record.diet_options, vec!["vegetariana", "vegana"]);
        assert_eq!(record.cuisine, vec!["bar"]);
        assert_eq!(
            report.outcome(Field::DietOptions),
            Some(FieldOutcome::Unioned)
        );
        assert_eq!(report.outcome(Field::Cuisine), Some(FieldOutcome::Preserved));
    }

    #[test]
    fn test_name_and_neighborhood_handling() {
        let existing = RestaurantRecord::new("Arlete Bar e Mercearia", "Vila Madalena");

        let defaulted = ExtractedFields {
            neighborhood: Some("Pinheiros".to_string()),
            neighborhood_defaulted: true,
            ..ExtractedFields::named("ARLETE bar e mercearia")
        };
        let (record, _) = merge(Some(&existing), &defaulted).unwrap();
        assert_eq!(record.name, "Arlete Bar e Mercearia");
        assert_eq!(record.neighborhood, "Vila Madalena");

        let stated = ExtractedFields {
            neighborhood: Some("Pinheiros".to_string()),
            ..ExtractedFields::named("Arlete Bar e Mercearia")
        };
        let (record, report) = merge(Some(&existing), &stated).unwrap();
        assert_eq!(record.neighborhood, "Pinheiros");
        assert_eq!(
            report.outcome(Field::Neighborhood),
            Some(FieldOutcome::Overwritten)
        );
    }

    #[test]
    fn test_nameless_extraction_is_ambiguous() {
        let incoming = ExtractedFields {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            merge(None, &incoming),
            Err(GuiaError::ParseAmbiguous(_))
        ));
    }

    // ------------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------------

    fn opt_text() -> impl Strategy<Value = Option<String>> {
        proptest::option::of("[a-z]{1,6}")
    }

    fn list() -> impl Strategy<Value = Vec<String>> {
        proptest::collection::vec("[a-zA-Z]{1,5}", 0..4)
    }

    fn tri() -> impl Strategy<Value = TriState> {
        any::<Option<bool>>().prop_map(TriState::from)
    }

    fn price() -> impl Strategy<Value = Option<PriceLevel>> {
        proptest::option::of(prop_oneof![
            Just(PriceLevel::Budget),
            Just(PriceLevel::Moderate),
            Just(PriceLevel::Upscale),
        ])
    }

    fn arb_incoming() -> impl Strategy<Value = ExtractedFields> {
        (
            (opt_text(), opt_text(), any::<bool>()),
            (list(), list(), list()),
            (price(), tri(), tri()),
            (opt_text(), opt_text()),
        )
            .prop_map(
                |(
                    (address, neighborhood, defaulted),
                    (cuisine, diet_options, highlights),
                    (price_level, accepts_voucher, accessibility),
                    (description, hours),
                )| ExtractedFields {
                    name: Some("Momokuri".to_string()),
                    address,
                    neighborhood_defaulted: defaulted && neighborhood.is_some(),
                    neighborhood,
                    cuisine,
                    price_level,
                    accepts_voucher,
                    diet_options,
                    accessibility,
                    highlights,
                    description,
                    hours,
                },
            )
    }

    fn arb_existing() -> impl Strategy<Value = Option<RestaurantRecord>> {
        proptest::option::of(arb_incoming().prop_filter_map("named", |fields| {
            merge(None, &fields).ok().map(|(record, _)| record)
        }))
    }

    proptest! {
        #[test]
        fn prop_merge_is_idempotent(existing in arb_existing(), incoming in arb_incoming()) {
            let (once, _) = merge(existing.as_ref(), &incoming).unwrap();
            let (twice, report) = merge(Some(&once), &incoming).unwrap();
            prop_assert_eq!(&once, &twice);
            prop_assert!(!report.has_changes());
        }

        #[test]
        fn prop_lists_never_shrink(existing in arb_existing(), incoming in arb_incoming()) {
            let (merged, _) = merge(existing.as_ref(), &incoming).unwrap();
            if let Some(before) = existing {
                prop_assert!(merged.cuisine.starts_with(&before.cuisine));
                prop_assert!(merged.diet_options.starts_with(&before.diet_options));
                prop_assert!(merged.highlights.starts_with(&before.highlights));
            }
        }

        #[test]
        fn prop_unknown_never_downgrades(existing in arb_existing(), incoming in arb_incoming()) {
            let (merged, _) = merge(existing.as_ref(), &incoming).unwrap();
            if let Some(before) = existing {
                if before.accepts_voucher.is_known() {
                    prop_assert!(merged.accepts_voucher.is_known());
                }
                if before.accessibility.is_known() {
                    prop_assert!(merged.accessibility.is_known());
                }
                if before.price_level.is_some() {
                    prop_assert!(merged.price_level.is_some());
                }
                if before.address.is_some() {
                    prop_assert!(merged.address.is_some());
                }
            }
        }
    }
}
