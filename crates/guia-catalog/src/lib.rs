//! Guia Catalog - The persisted restaurant collection
//!
//! Everything downstream of extraction lives here:
//! - [`Catalog`]: ordered records with unique name keys
//! - [`matcher`]: identity lookup on the normalized name key
//! - [`merge`]: field-level precedence rules and merge reports
//! - [`store`]: load before a run, one atomic commit after
//! - [`import`]: the split, extract, normalize, match, merge pipeline
//! - [`query`]: read-only filtering and facet listing

pub mod catalog;
pub mod import;
pub mod matcher;
pub mod merge;
pub mod query;
pub mod store;

pub use catalog::Catalog;
pub use import::{ImportPlan, Importer, IssueKind, ParagraphIssue, RunReport};
pub use matcher::find_match;
pub use merge::{merge, FieldOutcome, MergeReport};
pub use query::{facets, Facets, Preference, RestaurantFilter};
pub use store::{CatalogStore, JsonCatalogStore, MemoryCatalogStore};
