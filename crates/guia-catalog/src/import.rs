//! Import runs
//!
//! One run takes raw text through split, extract, normalize, match and merge.
//! Paragraphs are processed in input order against a working copy of the
//! loaded catalog: each one sees the merges that completed before it, and the
//! loaded snapshot itself is never touched. Failures stay local to their
//! paragraph and are reported; only a failed commit aborts the run.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use guia_core::{GuiaError, RestaurantRecord, Result};
use guia_extractor::{FieldExtractor, Normalizer};
use guia_parser::{split_paragraphs, RawDescription};

use crate::{find_match, merge, Catalog, CatalogStore, MergeReport};

// ============================================================================
// Run Report
// ============================================================================

/// Category of a per-paragraph failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// No restaurant name could be recognized
    ParseAmbiguous,
    /// The model reply did not conform to the schema
    SchemaValidationFailed,
    /// The model did not answer within the retry budget
    ExtractionTimeout,
    /// The model service failed
    ExtractionUnavailable,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseAmbiguous => write!(f, "parse_ambiguous"),
            Self::SchemaValidationFailed => write!(f, "schema_validation_failed"),
            Self::ExtractionTimeout => write!(f, "extraction_timeout"),
            Self::ExtractionUnavailable => write!(f, "extraction_unavailable"),
        }
    }
}

/// A paragraph that produced no merge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphIssue {
    pub index: usize,
    pub source: String,
    pub kind: IssueKind,
    pub detail: String,
}

impl ParagraphIssue {
    fn from_error(paragraph: &RawDescription, error: &GuiaError) -> Self {
        let kind = match error {
            GuiaError::ParseAmbiguous(_) => IssueKind::ParseAmbiguous,
            GuiaError::SchemaValidation(_) => IssueKind::SchemaValidationFailed,
            GuiaError::ExtractionTimeout { .. } => IssueKind::ExtractionTimeout,
            _ => IssueKind::ExtractionUnavailable,
        };

        Self {
            index: paragraph.index,
            source: paragraph.source.clone(),
            kind,
            detail: error.to_string(),
        }
    }
}

/// Summary of one import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub paragraphs: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub issues: Vec<ParagraphIssue>,
    /// Whether the plan was written to the store
    pub committed: bool,
}

impl RunReport {
    fn start() -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now,
            paragraphs: 0,
            created: 0,
            updated: 0,
            unchanged: 0,
            issues: Vec::new(),
            committed: false,
        }
    }

    /// Paragraphs that reached the merge step
    pub fn merged(&self) -> usize {
        self.created + self.updated + self.unchanged
    }

    /// Whether every paragraph was merged
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

// ============================================================================
// Import Plan
// ============================================================================

/// Computed but not yet committed result of a run
#[derive(Debug, Clone)]
pub struct ImportPlan {
    /// Working catalog with every completed merge applied
    pub catalog: Catalog,
    pub merges: Vec<MergeReport>,
    pub report: RunReport,
}

impl ImportPlan {
    /// Whether committing would change the stored catalog
    pub fn has_changes(&self) -> bool {
        self.merges.iter().any(MergeReport::has_changes)
    }
}

// ============================================================================
// Importer
// ============================================================================

/// Runs descriptions through extraction and merging
pub struct Importer {
    extractor: Arc<dyn FieldExtractor>,
    normalizer: Normalizer,
}

impl Importer {
    /// Create an importer defaulting records to the given neighborhood
    pub fn new(extractor: Arc<dyn FieldExtractor>, target_neighborhood: impl Into<String>) -> Self {
        Self {
            extractor,
            normalizer: Normalizer::new(target_neighborhood),
        }
    }

    /// Name of the extraction strategy in use
    pub fn extractor_name(&self) -> &str {
        self.extractor.name()
    }

    /// Compute the merges for a batch without writing anything
    pub async fn plan(&self, snapshot: &Catalog, paragraphs: &[RawDescription]) -> ImportPlan {
        let mut report = RunReport::start();
        let mut working = snapshot.clone();
        let mut merges = Vec::new();

        tracing::info!(
            run_id = %report.run_id,
            paragraphs = paragraphs.len(),
            extractor = self.extractor.name(),
            "Starting import"
        );

        for paragraph in paragraphs {
            report.paragraphs += 1;

            match self.process(&working, paragraph).await {
                Ok((record, merge_report)) => {
                    tracing::debug!(
                        index = paragraph.index,
                        record = %merge_report.name,
                        created = merge_report.created,
                        changed = ?merge_report.changed_fields(),
                        "Paragraph merged"
                    );

                    if merge_report.created {
                        report.created += 1;
                    } else if merge_report.has_changes() {
                        report.updated += 1;
                    } else {
                        report.unchanged += 1;
                    }

                    if merge_report.has_changes() {
                        working.upsert(record);
                    }
                    merges.push(merge_report);
                }
                Err(e) => {
                    let issue = ParagraphIssue::from_error(paragraph, &e);
                    tracing::warn!(
                        index = issue.index,
                        source = %issue.source,
                        kind = %issue.kind,
                        "Paragraph skipped: {}",
                        issue.detail
                    );
                    report.issues.push(issue);
                }
            }
        }

        report.finished_at = Utc::now();
        tracing::info!(
            run_id = %report.run_id,
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            issues = report.issues.len(),
            "Import planned"
        );

        ImportPlan {
            catalog: working,
            merges,
            report,
        }
    }

    /// Load, plan and commit once
    ///
    /// With `dry_run` or when nothing changed the store is left alone. A
    /// failed commit discards the plan and returns `PersistenceFailed`.
    pub async fn run(
        &self,
        store: &dyn CatalogStore,
        text: &str,
        source: &str,
        dry_run: bool,
    ) -> Result<ImportPlan> {
        let snapshot = store.load()?;
        let paragraphs = split_paragraphs(text, source);
        let mut plan = self.plan(&snapshot, &paragraphs).await;

        if dry_run {
            tracing::info!(run_id = %plan.report.run_id, "Dry run, catalog not written");
        } else if plan.has_changes() {
            store.commit(&plan.catalog)?;
            plan.report.committed = true;
        } else {
            tracing::info!(run_id = %plan.report.run_id, "No changes to commit");
        }

        Ok(plan)
    }

    async fn process(
        &self,
        working: &Catalog,
        paragraph: &RawDescription,
    ) -> Result<(RestaurantRecord, MergeReport)> {
        let extraction = self.extractor.extract(&paragraph.text).await?;
        let fields = self.normalizer.normalize(extraction.fields);

        let existing = fields
            .name
            .as_deref()
            .and_then(|name| find_match(name, working));

        merge(existing, &fields)
    }
}

// ============================================================================
// Tests
// ============================================================================
