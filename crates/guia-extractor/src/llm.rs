//! LLM-backed field extraction
//!
//! Sends the paragraph plus a fixed schema instruction to an [`LlmClient`]
//! and validates the reply before accepting any of it. A reply that does not
//! conform to the schema is rejected as a whole.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::FieldExtractor;
use guia_core::{
    ExtractedFields, Extraction, GuiaError, LlmClient, LlmConfig, PriceLevel, Result, TriState,
};

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for LLM-based extraction
#[derive(Debug, Clone)]
pub struct LlmExtractorConfig {
    /// Instruction describing the target schema
    pub system_prompt: String,
    /// Per-call timeout
    pub timeout: Duration,
    /// Additional attempts after a timeout or service failure
    pub max_retries: u32,
}

impl Default for LlmExtractorConfig {
    fn default() -> Self {
        Self {
            system_prompt: include_str!("prompts/extraction_system.txt").to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }
}

impl From<&LlmConfig> for LlmExtractorConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
            ..Self::default()
        }
    }
}

// ============================================================================
// Response Schema
// ============================================================================

/// Reply shape expected from the model
///
/// Omitted keys and nulls are both "unknown"; unknown keys and wrong types
/// fail deserialization.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LlmRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    neighborhood: Option<String>,
    #[serde(default)]
    cuisine: Option<Vec<String>>,
    #[serde(default)]
    price_level: Option<PriceLevel>,
    #[serde(default)]
    accepts_voucher: Option<bool>,
    #[serde(default)]
    diet_options: Option<Vec<String>>,
    #[serde(default)]
    accessibility: Option<bool>,
    #[serde(default)]
    highlights: Option<Vec<String>>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    hours: Option<String>,
}

impl From<LlmRecord> for ExtractedFields {
    fn from(record: LlmRecord) -> Self {
        Self {
            name: non_blank(record.name),
            address: non_blank(record.address),
            neighborhood: non_blank(record.neighborhood),
            neighborhood_defaulted: false,
            cuisine: record.cuisine.unwrap_or_default(),
            price_level: record.price_level,
            accepts_voucher: TriState::from(record.accepts_voucher),
            diet_options: record.diet_options.unwrap_or_default(),
            accessibility: TriState::from(record.accessibility),
            highlights: record.highlights.unwrap_or_default(),
            description: non_blank(record.description),
            hours: non_blank(record.hours),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// LLM Extractor
// ============================================================================

/// LLM-based field extractor
pub struct LlmExtractor {
    client: Arc<dyn LlmClient>,
    pub config: LlmExtractorConfig,
}

impl LlmExtractor {
    /// Create a new LLM extractor with default config
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            config: LlmExtractorConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(client: Arc<dyn LlmClient>, config: LlmExtractorConfig) -> Self {
        Self { client, config }
    }

    /// Build the extraction prompt
    pub fn build_prompt(&self, paragraph: &str) -> String {
        format!(
            "{}\n\nText:\n{}\n\nJSON:",
            self.config.system_prompt.trim_end(),
            paragraph.trim()
        )
    }

    /// Validate a model reply and turn it into an extraction
    pub fn parse_response(&self, response: &str) -> Result<Extraction> {
        let body = strip_code_fence(response);

        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| GuiaError::SchemaValidation(format!("reply is not JSON: {e}")))?;

        if !value.is_object() {
            return Err(GuiaError::SchemaValidation(
                "reply is not a single JSON object".to_string(),
            ));
        }

        let record: LlmRecord = serde_json::from_value(value)
            .map_err(|e| GuiaError::SchemaValidation(e.to_string()))?;

        let fields = ExtractedFields::from(record);
        if fields.name.is_none() {
            return Err(GuiaError::ParseAmbiguous(
                "model reply carries no restaurant name".to_string(),
            ));
        }

        Ok(Extraction::from_fields(fields))
    }

    /// Call the model with a per-attempt timeout and bounded retries
    async fn generate_with_retry(&self, prompt: &str) -> Result<String> {
        let attempts = self.config.max_retries + 1;
        let mut timed_out = false;
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match tokio::time::timeout(self.config.timeout, self.client.generate(prompt)).await {
                Ok(Ok(reply)) => return Ok(reply),
                Ok(Err(e)) => {
                    tracing::warn!(attempt, model = self.client.model(), "LLM call failed: {}", e);
                    timed_out = false;
                    last_error = e.to_string();
                }
                Err(_) => {
                    tracing::warn!(attempt, model = self.client.model(), "LLM call timed out");
                    timed_out = true;
                }
            }
        }

        if timed_out {
            Err(GuiaError::ExtractionTimeout {
                attempts,
                timeout_secs: self.config.timeout.as_secs(),
            })
        } else {
            Err(GuiaError::ExtractionUnavailable(last_error))
        }
    }
}

#[async_trait::async_trait]
impl FieldExtractor for LlmExtractor {
    async fn extract(&self, paragraph: &str) -> Result<Extraction> {
        let prompt = self.build_prompt(paragraph);
        let reply = self.generate_with_retry(&prompt).await?;
        self.parse_response(&reply)
    }

    fn name(&self) -> &str {
        "llm"
    }
}

/// Drop one surrounding Markdown code fence, if any
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Skip the info string (`json`) on the opening line
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

// ============================================================================
// Tests
// ============================================================================
