//! Content-hash de-duplication.
//!
//! The same report often arrives both as an abstract and inside a PDF, or
//! twice under different file names.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

use crate::models::SourceDocument;

/// SHA-256 hex digest of the whitespace-normalised, lowercased text.
pub fn fingerprint(text: &str) -> String {
    let normalized = text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

/// Documents surviving de-duplication plus the ids that were dropped.
#[derive(Debug, Default)]
pub struct Deduplicated {
    pub documents: Vec<SourceDocument>,
    pub dropped_ids: Vec<String>,
}

/// Keep the first document of each fingerprint, preserving input order.
pub fn dedupe(documents: Vec<SourceDocument>) -> Deduplicated {
    let mut seen = HashSet::new();
    let mut result = Deduplicated::default();

    for document in documents {
        if seen.insert(fingerprint(&document.text)) {
            result.documents.push(document);
        } else {
            tracing::debug!(id = %document.id, "dropping duplicate document");
            result.dropped_ids.push(document.id);
        }
    }

    if !result.dropped_ids.is_empty() {
        tracing::info!(dropped = result.dropped_ids.len(), "removed duplicate documents");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceType;

    fn doc(id: &str, text: &str) -> SourceDocument {
        SourceDocument::new(id, format!("abstract_{id}.txt"), SourceType::Abstract, text)
    }

    #[test]
    fn test_fingerprint_ignores_case_and_spacing() {
        assert_eq!(
            fingerprint("Methemoglobin  level\n45%"),
            fingerprint("methemoglobin level 45%")
        );
        assert_ne!(fingerprint("level 45%"), fingerprint("level 46%"));
        assert_eq!(fingerprint("x").len(), 64);
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let result = dedupe(vec![
            doc("1", "Dapsone case."),
            doc("2", "Benzocaine case."),
            doc("3", "dapsone   CASE."),
        ]);

        let ids: Vec<&str> = result.documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(result.dropped_ids, vec!["3".to_string()]);
    }
}
