//! Flagged issues and the issues CSV (`id,issue_type,value,message`).

use std::fmt;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ValidationResult;

/// Kind of problem found in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueKind {
    #[serde(rename = "Invalid MetHb Range")]
    InvalidMethbRange,
    #[serde(rename = "Unusually High MetHb")]
    UnusuallyHighMethb,
    #[serde(rename = "Low MetHb Level")]
    LowMethbLevel,
    #[serde(rename = "Invalid Age")]
    InvalidAge,
    /// Methylene blue given to a G6PD-deficient patient (contraindicated)
    #[serde(rename = "G6PD + Methylene Blue")]
    G6pdMethyleneBlue,
    /// Genetic methemoglobinemia rarely responds to methylene blue
    #[serde(rename = "Genetic + Methylene Blue")]
    GeneticMethyleneBlue,
    /// MetHb value that looks like an hour count lifted from the text
    #[serde(rename = "Possible Time Value")]
    PossibleTimeValue,
}

impl IssueKind {
    pub fn label(self) -> &'static str {
        match self {
            IssueKind::InvalidMethbRange => "Invalid MetHb Range",
            IssueKind::UnusuallyHighMethb => "Unusually High MetHb",
            IssueKind::LowMethbLevel => "Low MetHb Level",
            IssueKind::InvalidAge => "Invalid Age",
            IssueKind::G6pdMethyleneBlue => "G6PD + Methylene Blue",
            IssueKind::GeneticMethyleneBlue => "Genetic + Methylene Blue",
            IssueKind::PossibleTimeValue => "Possible Time Value",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One flagged problem in one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Record id
    pub id: String,
    #[serde(rename = "issue_type")]
    pub kind: IssueKind,
    /// Offending value as displayed
    pub value: String,
    /// Human-readable explanation
    pub message: String,
}

impl ValidationIssue {
    pub fn new(id: &str, kind: IssueKind, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            kind,
            value: value.into(),
            message: message.into(),
        }
    }
}

/// Write issues as CSV to any writer.
pub fn write_issues<W: io::Write>(writer: W, issues: &[ValidationIssue]) -> ValidationResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for issue in issues {
        writer.serialize(issue)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the issues CSV to `path`.
pub fn write_issues_csv<P: AsRef<Path>>(path: P, issues: &[ValidationIssue]) -> ValidationResult<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_issues(file, issues)?;
    tracing::info!(count = issues.len(), "wrote {}", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issues_csv_layout() {
        let issues = vec![ValidationIssue::new(
            "42",
            IssueKind::G6pdMethyleneBlue,
            "G6PD: Deficient, Treatment: Methylene Blue",
            "contraindicated",
        )];

        let mut buf = Vec::new();
        write_issues(&mut buf, &issues).unwrap();
        let csv = String::from_utf8(buf).unwrap();

        assert_eq!(
            csv,
            "id,issue_type,value,message\n\
             42,G6PD + Methylene Blue,\"G6PD: Deficient, Treatment: Methylene Blue\",contraindicated\n"
        );
    }

    #[test]
    fn test_kind_label_matches_serde() {
        let json = serde_json::to_string(&IssueKind::PossibleTimeValue).unwrap();
        assert_eq!(json, format!("\"{}\"", IssueKind::PossibleTimeValue));
    }
}
