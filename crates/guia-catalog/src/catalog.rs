//! In-memory catalog

use std::collections::HashMap;

use guia_core::{GuiaError, RestaurantRecord, Result};

/// Ordered collection of restaurant records, unique on the name key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    records: Vec<RestaurantRecord>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from records, rejecting blank names and duplicate keys
    pub fn from_records(records: Vec<RestaurantRecord>) -> Result<Self> {
        let mut catalog = Self::new();

        for (position, record) in records.into_iter().enumerate() {
            let key = record.key();
            if key.is_empty() {
                return Err(GuiaError::CatalogCorrupted(format!(
                    "record #{position} has a blank name"
                )));
            }
            if let Some(first) = catalog.index.get(&key) {
                return Err(GuiaError::CatalogCorrupted(format!(
                    "records #{first} and #{position} share the name key '{key}'"
                )));
            }
            catalog.index.insert(key, catalog.records.len());
            catalog.records.push(record);
        }

        Ok(catalog)
    }

    /// Look up a record by its normalized name key
    pub fn get(&self, key: &str) -> Option<&RestaurantRecord> {
        self.index.get(key).map(|&i| &self.records[i])
    }

    /// Insert a new record or replace the one with the same key in place
    ///
    /// Returns `true` when the record was new.
    pub fn upsert(&mut self, record: RestaurantRecord) -> bool {
        let key = record.key();
        match self.index.get(&key) {
            Some(&i) => {
                self.records[i] = record;
                false
            }
            None => {
                self.index.insert(key, self.records.len());
                self.records.push(record);
                true
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RestaurantRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[RestaurantRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
