//! Record identity matching
//!
//! Identity is the exact normalized name key. Spelling variants beyond case,
//! accents and spacing ("Jojo Ramen" vs "Jojo Ramen Pinheiros") are treated as
//! different restaurants.

use guia_core::{name_key, RestaurantRecord};

use crate::Catalog;

/// Find the catalog record a restaurant name refers to
pub fn find_match<'a>(name: &str, catalog: &'a Catalog) -> Option<&'a RestaurantRecord> {
    let key = name_key(name);
    if key.is_empty() {
        return None;
    }
    catalog.get(&key)
}
