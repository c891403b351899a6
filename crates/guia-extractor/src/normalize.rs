//! Normalization of extracted fields
//!
//! Runs on the output of either extraction strategy, so matching and merging
//! see the same canonical values regardless of where they came from.

use guia_core::{collapse_whitespace, fold_key, ExtractedFields, DEFAULT_NEIGHBORHOOD};

/// Canonicalizes extracted values; idempotent
#[derive(Debug, Clone)]
pub struct Normalizer {
    target_neighborhood: String,
}

impl Normalizer {
    /// Create a normalizer that defaults to the given neighborhood
    pub fn new(target_neighborhood: impl Into<String>) -> Self {
        Self {
            target_neighborhood: collapse_whitespace(&target_neighborhood.into()),
        }
    }

    /// The neighborhood assigned when the text names none
    pub fn target_neighborhood(&self) -> &str {
        &self.target_neighborhood
    }

    /// Normalize one extraction
    ///
    /// - whitespace is trimmed and collapsed in every string, blanks become unknown
    /// - trailing sentence punctuation is dropped from address and hours
    /// - list fields are deduplicated on their folded form, first spelling kept
    /// - a missing neighborhood becomes the target one; an explicitly named
    ///   different neighborhood is kept
    pub fn normalize(&self, fields: ExtractedFields) -> ExtractedFields {
        let mut normalized = ExtractedFields {
            name: clean(fields.name),
            address: clean(fields.address).and_then(strip_terminal),
            neighborhood: clean(fields.neighborhood),
            neighborhood_defaulted: fields.neighborhood_defaulted,
            cuisine: dedup(fields.cuisine),
            price_level: fields.price_level,
            accepts_voucher: fields.accepts_voucher,
            diet_options: dedup(fields.diet_options),
            accessibility: fields.accessibility,
            highlights: dedup(fields.highlights),
            description: clean(fields.description),
            hours: clean(fields.hours).and_then(strip_terminal),
        };

        match normalized.neighborhood.as_deref() {
            None => {
                normalized.neighborhood = Some(self.target_neighborhood.clone());
                normalized.neighborhood_defaulted = true;
            }
            Some(named) if fold_key(named) == fold_key(&self.target_neighborhood) => {
                normalized.neighborhood = Some(self.target_neighborhood.clone());
            }
            Some(_) => {}
        }

        normalized
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_NEIGHBORHOOD)
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| collapse_whitespace(&v))
        .filter(|v| !v.is_empty())
}

fn strip_terminal(value: String) -> Option<String> {
    let stripped = value
        .trim_end_matches(|c: char| matches!(c, '.' | ';' | ',' | '!' | '?') || c.is_whitespace());
    (!stripped.is_empty()).then(|| stripped.to_string())
}

/// Case- and accent-insensitive dedup keeping the first spelling seen
pub fn dedup(values: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut result = Vec::new();

    for value in values {
        let value = collapse_whitespace(&value);
        if value.is_empty() {
            continue;
        }
        let key = fold_key(&value);
        if !seen.contains(&key) {
            seen.push(key);
            result.push(value);
        }
    }

    result
}

// ============================================================================
// Tests
// ============================================================================
