//! MetHb Miner Core Library
//!
//! Rule-based mining of methemoglobinemia case reports.
//!
//! # Architecture
//!
//! ```text
//! abstracts/*.txt, *.pdf → Corpus (load + dedupe) → documents CSV
//!                                                       │
//!                                               FeatureExtractor
//!                                                       │
//!                                         records CSV + run manifest
//!                                                       │
//!                                   ┌───────────────────┴───────────────────┐
//!                                   ▼                                       ▼
//!                               Validation                            Cohort stats
//!                    (issues CSV, spot-check sample)
//! ```
//!
//! # Core Principle
//!
//! **Extraction never fails.** A field that cannot be found gets its sentinel
//! (`Unknown`, `None specified`, `Not mentioned`); doubtful values are left for
//! the validator to flag.
//!
//! # Modules
//!
//! - [`models`]: Domain types (CaseRecord, vocabularies, SourceDocument)
//! - [`extractor`]: Keyword and regex feature extraction
//! - [`corpus`]: Directory loading, de-duplication, documents CSV
//! - [`export`]: Batch extraction, records CSV, run manifest
//! - [`validation`]: Post-hoc record checks and spot-check sampling
//! - [`analysis`]: Cohort statistics

pub mod analysis;
pub mod corpus;
pub mod export;
pub mod extractor;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use analysis::CohortStats;
pub use corpus::{dedupe, load_directory};
pub use export::{extract_corpus, CaseRow, ExtractionSummary, RunManifest};
pub use extractor::{extract, FeatureExtractor};
pub use models::{
    CaseRecord, G6pdStatus, Gender, Outcome, Route, SourceDocument, SourceType, Symptom, Symptoms,
    Treatment, Treatments, Trigger,
};
pub use validation::{ValidationIssue, ValidationReport, ValidationThresholds, Validator};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MethbError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<export::ExportError> for MethbError {
    fn from(e: export::ExportError) -> Self {
        match e {
            export::ExportError::Io(e) => MethbError::IoError(e.to_string()),
            other => MethbError::InvalidInput(other.to_string()),
        }
    }
}

// =========================================================================
// Exported Functions
// =========================================================================

/// Extract a structured case record from the text of one report.
#[uniffi::export]
pub fn extract_case_report(id: String, text: String) -> FfiCaseRecord {
    extract(&text, &id).into()
}

/// Validate a records CSV (as produced by the batch export) with default thresholds.
#[uniffi::export]
pub fn validate_records_csv(csv: String) -> Result<Vec<FfiValidationIssue>, MethbError> {
    let rows = export::read_records(csv.as_bytes())?;
    let report = Validator::default().validate(&rows);
    Ok(report.issues.into_iter().map(|i| i.into()).collect())
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe case record. Categorical fields carry their persisted labels.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCaseRecord {
    pub id: String,
    pub methb_level: Option<f64>,
    pub trigger: String,
    pub trigger_route: String,
    pub treatment: String,
    pub methylene_blue_dose: Option<String>,
    pub symptoms: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub g6pd_status: String,
    pub time_to_improvement: Option<String>,
    pub outcome: String,
    pub data_quality_score: u8,
}

impl From<CaseRecord> for FfiCaseRecord {
    fn from(record: CaseRecord) -> Self {
        Self {
            id: record.id,
            methb_level: record.methb_level,
            trigger: record.trigger.to_string(),
            trigger_route: record.trigger_route.to_string(),
            treatment: record.treatment.to_string(),
            methylene_blue_dose: record.methylene_blue_dose,
            symptoms: record.symptoms.to_string(),
            age: record.age,
            gender: record.gender.map(|g| g.to_string()),
            g6pd_status: record.g6pd_status.to_string(),
            time_to_improvement: record.time_to_improvement,
            outcome: record.outcome.to_string(),
            data_quality_score: record.data_quality_score,
        }
    }
}

/// FFI-safe validation issue.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiValidationIssue {
    pub id: String,
    pub issue_type: String,
    pub value: String,
    pub message: String,
}

impl From<ValidationIssue> for FfiValidationIssue {
    fn from(issue: ValidationIssue) -> Self {
        Self {
            id: issue.id,
            issue_type: issue.kind.to_string(),
            value: issue.value,
            message: issue.message,
        }
    }
}
