//! Guia Extractor - Description-to-fields extraction
//!
//! Two interchangeable strategies share one contract:
//! - Pattern-based: regex rules + vocabularies, no network
//! - LLM-based: a fixed prompt/response contract with strict validation
//!
//! Whichever strategy runs, its output goes through the same
//! [`normalize::Normalizer`] before matching and merging.

use guia_core::{Extraction, Result};

/// Trait for paragraph field extractors
#[async_trait::async_trait]
pub trait FieldExtractor: Send + Sync {
    /// Extract the fields of one paragraph
    ///
    /// Returns `GuiaError::ParseAmbiguous` when no restaurant name can be
    /// recognized.
    async fn extract(&self, paragraph: &str) -> Result<Extraction>;

    /// Get extractor name for logging
    fn name(&self) -> &str;
}

pub mod llm;
pub mod normalize;
pub mod pattern;

pub use llm::{LlmExtractor, LlmExtractorConfig};
pub use normalize::Normalizer;
pub use pattern::PatternExtractor;
