//! Source documents fed to the extractor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a document's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// PubMed abstract saved as plain text
    Abstract,
    /// Full-text article
    Pdf,
}

/// A single `(id, text)` pair plus its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// PMID, PMC number or a generated `PDF_<n>` id
    pub id: String,
    /// File name the text was read from
    pub source_file: String,
    /// Abstract or PDF
    pub source_type: SourceType,
    /// Full document text
    pub text: String,
}

impl SourceDocument {
    pub fn new(id: impl Into<String>, source_file: impl Into<String>, source_type: SourceType, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_file: source_file.into(),
            source_type,
            text: text.into(),
        }
    }

    /// Text length in characters.
    pub fn text_length(&self) -> usize {
        self.text.chars().count()
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceType::Abstract => "abstract",
            SourceType::Pdf => "pdf",
        })
    }
}
