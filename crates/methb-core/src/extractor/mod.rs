//! Rule-based feature extractor for methemoglobinemia case reports.
//!
//! Pipeline: Lowercase → Per-field keyword/regex scans → Quality score
//!
//! Every sub-extraction is a pure function over static tables and returns
//! its field's sentinel when nothing matches, so `extract` never fails.

mod lexicon;
mod measurements;
mod rules;
mod text;
mod trigger;

pub use lexicon::*;
pub use measurements::*;
pub use rules::*;
pub use trigger::*;

use crate::models::{CaseRecord, Route, Symptoms, Treatments};

/// Turns the raw text of one case report into a [`CaseRecord`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract every field from `text`, tagging the record with `id`.
    pub fn extract(&self, text: &str, id: &str) -> CaseRecord {
        let lower = text.to_lowercase();

        let mut record = CaseRecord {
            id: id.to_string(),
            methb_level: methb_level(&lower),
            // Trigger attribution works on the case section of the original text
            trigger: extract_trigger(text),
            trigger_route: first_present::<Route>(&lower).unwrap_or(Route::Unknown),
            treatment: Treatments::new(all_present(&lower)),
            methylene_blue_dose: methylene_blue_dose(&lower),
            symptoms: Symptoms::new(all_present(&lower)),
            age: age(&lower),
            gender: gender(&lower),
            g6pd_status: g6pd_status(&lower),
            time_to_improvement: time_to_improvement(&lower),
            outcome: outcome(&lower),
            data_quality_score: 0,
        };
        record.data_quality_score = CaseRecord::quality_score(record.populated_key_fields());

        tracing::debug!(
            id,
            trigger = %record.trigger,
            methb_level = ?record.methb_level,
            score = record.data_quality_score,
            "extracted case features"
        );

        record
    }
}

/// Extract a [`CaseRecord`] with a default [`FeatureExtractor`].
pub fn extract(text: &str, id: &str) -> CaseRecord {
    FeatureExtractor::new().extract(text, id)
}
