//! Guia Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout the guide:
//! - Restaurant records and the sparse fields extracted from prose
//! - Tri-state and price-level value types
//! - Normalized name keys used for identity matching
//! - Common error types
//! - The LLM client trait used by the model-backed extractor
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, CatalogConfig, ConfigError, ExtractionConfig, LlmConfig, LlmProvider,
    LoggingConfig,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Neighborhood every record belongs to unless the text names another one
pub const DEFAULT_NEIGHBORHOOD: &str = "Pinheiros";

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for guide operations
#[derive(Error, Debug)]
pub enum GuiaError {
    #[error("No recognizable restaurant name: {0}")]
    ParseAmbiguous(String),

    #[error("Extraction response failed schema validation: {0}")]
    SchemaValidation(String),

    #[error("Extraction timed out after {attempts} attempt(s) of {timeout_secs}s")]
    ExtractionTimeout { attempts: u32, timeout_secs: u64 },

    #[error("Extraction service unavailable: {0}")]
    ExtractionUnavailable(String),

    #[error("Failed to persist catalog to {path}: {reason}")]
    PersistenceFailed { path: String, reason: String },

    #[error("Catalog is corrupted: {0}")]
    CatalogCorrupted(String),

    #[error("Restaurant not found: {0}")]
    NotFound(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GuiaError>;

// ============================================================================
// Text Keys
// ============================================================================

/// Trim and collapse every run of whitespace into a single space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-folded, accent-stripped, whitespace-collapsed form of a string
///
/// Used as the identity key for restaurant names and as the dedup key for
/// list fields, so `"Arlete Bar e Mercearia"` and `"arlete  bar e mercearia"`
/// fold to the same value.
pub fn fold_key(text: &str) -> String {
    let stripped: String = text
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect();
    collapse_whitespace(&stripped.to_lowercase())
}

/// Normalized identity key of a restaurant name
pub fn name_key(name: &str) -> String {
    fold_key(name)
}

// ============================================================================
// Value Types
// ============================================================================

/// A boolean fact that may not have been stated at all
///
/// `Unknown` is never conflated with `No`: it serializes as `null` and a merge
/// never lets it replace a known value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TriState {
    Yes,
    No,
    #[default]
    Unknown,
}

impl TriState {
    /// Whether a value was stated
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Convert to an optional boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Yes => Some(true),
            Self::No => Some(false),
            Self::Unknown => None,
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Yes,
            Some(false) => Self::No,
            None => Self::Unknown,
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

impl Serialize for TriState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.as_bool().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TriState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(Self::from)
    }
}

impl std::fmt::Display for TriState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "yes"),
            Self::No => write!(f, "no"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Price range of a restaurant, written as `$`, `$$` or `$$$`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceLevel {
    #[serde(rename = "$")]
    Budget,
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Upscale,
}

impl PriceLevel {
    /// Parse a literal price token
    ///
    /// Any token outside `$`, `$$`, `$$$` is unknown rather than an error.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            "$" => Some(Self::Budget),
            "$$" => Some(Self::Moderate),
            "$$$" => Some(Self::Upscale),
            _ => None,
        }
    }

    /// Get the literal token
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Budget => "$",
            Self::Moderate => "$$",
            Self::Upscale => "$$$",
        }
    }
}

impl std::fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Names of the fields of a restaurant record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Address,
    Neighborhood,
    Cuisine,
    PriceLevel,
    AcceptsVoucher,
    DietOptions,
    Accessibility,
    Highlights,
    Description,
    Hours,
}

impl Field {
    /// Every field in persisted-schema order
    pub const ALL: [Field; 11] = [
        Field::Name,
        Field::Address,
        Field::Neighborhood,
        Field::Cuisine,
        Field::PriceLevel,
        Field::AcceptsVoucher,
        Field::DietOptions,
        Field::Accessibility,
        Field::Highlights,
        Field::Description,
        Field::Hours,
    ];

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Address => "address",
            Self::Neighborhood => "neighborhood",
            Self::Cuisine => "cuisine",
            Self::PriceLevel => "price_level",
            Self::AcceptsVoucher => "accepts_voucher",
            Self::DietOptions => "diet_options",
            Self::Accessibility => "accessibility",
            Self::Highlights => "highlights",
            Self::Description => "description",
            Self::Hours => "hours",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Extraction Models
// ============================================================================

/// Sparse set of attributes recognized in one paragraph
///
/// A field absent from the text stays `None`, `Unknown` or empty; it is never
/// coerced to a false default that would overwrite prior knowledge on merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub name: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<String>,
    /// Set when the neighborhood was filled in rather than read from the text
    #[serde(skip)]
    pub neighborhood_defaulted: bool,
    pub cuisine: Vec<String>,
    pub price_level: Option<PriceLevel>,
    pub accepts_voucher: TriState,
    pub diet_options: Vec<String>,
    pub accessibility: TriState,
    pub highlights: Vec<String>,
    pub description: Option<String>,
    pub hours: Option<String>,
}

impl ExtractedFields {
    /// Create fields carrying only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Whether a field holds a stated value
    pub fn is_known(&self, field: Field) -> bool {
        match field {
            Field::Name => self.name.is_some(),
            Field::Address => self.address.is_some(),
            Field::Neighborhood => self.neighborhood.is_some() && !self.neighborhood_defaulted,
            Field::Cuisine => !self.cuisine.is_empty(),
            Field::PriceLevel => self.price_level.is_some(),
            Field::AcceptsVoucher => self.accepts_voucher.is_known(),
            Field::DietOptions => !self.diet_options.is_empty(),
            Field::Accessibility => self.accessibility.is_known(),
            Field::Highlights => !self.highlights.is_empty(),
            Field::Description => self.description.is_some(),
            Field::Hours => self.hours.is_some(),
        }
    }

    /// Fields without a stated value
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|f| !self.is_known(*f))
            .collect()
    }
}

/// Output of a field extractor: the fields plus what it could not find
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub fields: ExtractedFields,
    pub missing: Vec<Field>,
}

impl Extraction {
    /// Build from fields, deriving the missing list
    pub fn from_fields(fields: ExtractedFields) -> Self {
        let missing = fields.missing_fields();
        Self { fields, missing }
    }

    /// Fraction of the non-name fields that were recognized (0.0 - 1.0)
    pub fn completeness(&self) -> f32 {
        let total = Field::ALL.len() - 1;
        let missing = self.missing.iter().filter(|f| **f != Field::Name).count();
        (total - missing.min(total)) as f32 / total as f32
    }
}

// ============================================================================
// Catalog Models
// ============================================================================

/// A restaurant as persisted in the catalog
///
/// `name` and `neighborhood` are mandatory; everything else may stay
/// unresolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRecord {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub neighborhood: String,
    #[serde(default)]
    pub cuisine: Vec<String>,
    #[serde(default)]
    pub price_level: Option<PriceLevel>,
    #[serde(default)]
    pub accepts_voucher: TriState,
    #[serde(default)]
    pub diet_options: Vec<String>,
    #[serde(default)]
    pub accessibility: TriState,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hours: Option<String>,
}

impl RestaurantRecord {
    /// Create a record with every optional field unresolved
    pub fn new(name: impl Into<String>, neighborhood: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
            neighborhood: neighborhood.into(),
            cuisine: Vec::new(),
            price_level: None,
            accepts_voucher: TriState::Unknown,
            diet_options: Vec::new(),
            accessibility: TriState::Unknown,
            highlights: Vec::new(),
            description: None,
            hours: None,
        }
    }

    /// Normalized identity key
    pub fn key(&self) -> String {
        name_key(&self.name)
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Trait for LLM clients
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get model name for logging
    fn model(&self) -> &str;
}

// ============================================================================
// Tests
// ============================================================================
