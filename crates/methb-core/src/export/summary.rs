//! Extraction summary and run manifest.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::SourceType;

use super::{CaseRow, ExportResult};

/// How many records had each headline field extracted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSummary {
    pub total: usize,
    pub abstracts: usize,
    pub pdfs: usize,
    pub methb_found: usize,
    pub triggers_found: usize,
    pub treatments_found: usize,
    pub ages_found: usize,
    pub genders_found: usize,
    pub mean_quality: f64,
}

impl ExtractionSummary {
    pub fn from_rows(rows: &[CaseRow]) -> Self {
        let mean_quality = if rows.is_empty() {
            0.0
        } else {
            rows.iter().map(|r| f64::from(r.data_quality_score)).sum::<f64>() / rows.len() as f64
        };

        Self {
            total: rows.len(),
            abstracts: count(rows, |r| r.source_type == SourceType::Abstract),
            pdfs: count(rows, |r| r.source_type == SourceType::Pdf),
            methb_found: count(rows, |r| r.methb_level.is_some()),
            triggers_found: count(rows, |r| r.trigger.is_known()),
            treatments_found: count(rows, |r| !r.treatment.is_empty()),
            ages_found: count(rows, |r| r.age.is_some()),
            genders_found: count(rows, |r| r.gender.is_some()),
            mean_quality,
        }
    }

    /// `count` as a percentage of all records.
    pub fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.total as f64
        }
    }
}

impl fmt::Display for ExtractionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total documents processed: {}", self.total)?;
        writeln!(f, "  Abstracts: {}", self.abstracts)?;
        writeln!(f, "  PDFs: {}", self.pdfs)?;

        let lines = [
            ("MetHb levels found", self.methb_found),
            ("Triggers identified", self.triggers_found),
            ("Treatments found", self.treatments_found),
            ("Ages extracted", self.ages_found),
            ("Genders identified", self.genders_found),
        ];
        for (label, count) in lines {
            writeln!(f, "{label}: {count} ({:.1}%)", self.percent(count))?;
        }

        write!(f, "Average data quality score: {:.1}/100", self.mean_quality)
    }
}

fn count(rows: &[CaseRow], pred: impl Fn(&CaseRow) -> bool) -> usize {
    rows.iter().filter(|&r| pred(r)).count()
}

/// Record of one extraction run, written next to the records CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    /// Unique run id (UUID v4)
    pub run_id: String,
    /// RFC 3339 timestamp
    pub created_at: String,
    /// Documents CSV the run read
    pub input: String,
    /// Records CSV the run wrote
    pub output: String,
    pub summary: ExtractionSummary,
}

impl RunManifest {
    pub fn new(input: &Path, output: &Path, summary: ExtractionSummary) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            input: input.display().to_string(),
            output: output.display().to_string(),
            summary,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the manifest as JSON to `path`.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> ExportResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::extract_corpus;
    use crate::models::SourceDocument;

    fn rows() -> Vec<CaseRow> {
        extract_corpus(&[
            SourceDocument::new(
                "1",
                "abstract_1.txt",
                SourceType::Abstract,
                "A 34-year-old man presented after dapsone overdose. Methemoglobin 38%. \
                 Treated with methylene blue 1.5 mg/kg. He recovered fully.",
            ),
            SourceDocument::new("2", "abstract_2.txt", SourceType::Abstract, ""),
            SourceDocument::new("3", "PMC3.pdf", SourceType::Pdf, "A 60-year-old woman. She died."),
            SourceDocument::new("4", "abstract_4.txt", SourceType::Abstract, "No details."),
        ])
    }

    #[test]
    fn test_summary_counts() {
        let summary = ExtractionSummary::from_rows(&rows());

        assert_eq!(summary.total, 4);
        assert_eq!(summary.abstracts, 3);
        assert_eq!(summary.pdfs, 1);
        assert_eq!(summary.methb_found, 1);
        assert_eq!(summary.triggers_found, 1);
        assert_eq!(summary.ages_found, 2);
        assert_eq!(summary.genders_found, 2);
        assert_eq!(summary.percent(summary.ages_found), 50.0);
    }

    #[test]
    fn test_summary_of_nothing() {
        let summary = ExtractionSummary::from_rows(&[]);
        assert_eq!(summary.mean_quality, 0.0);
        assert_eq!(summary.percent(0), 0.0);
        assert!(summary.to_string().contains("Total documents processed: 0"));
    }

    #[test]
    fn test_manifest_json() {
        let manifest = RunManifest::new(
            Path::new("texts.csv"),
            Path::new("records.csv"),
            ExtractionSummary::from_rows(&rows()),
        );
        let json = manifest.to_json().unwrap();

        assert!(json.contains("\"input\": \"texts.csv\""));
        assert!(json.contains("\"total\": 4"));
        assert_eq!(uuid::Uuid::parse_str(&manifest.run_id).unwrap().get_version_num(), 4);
    }

    #[test]
    fn test_manifest_written_to_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("manifest.json");
        let manifest = RunManifest::new(Path::new("a"), Path::new("b"), ExtractionSummary::default());

        manifest.write_json(&path).unwrap();

        let back: RunManifest = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.run_id, manifest.run_id);
    }
}
