//! Load case-report texts from a directory of abstracts and PDFs.
//!
//! Abstracts are saved as `abstract_<pmid>.txt`. PDFs carry their id in the
//! file stem (`PMID_<n>.pdf`, `PMC<n>.pdf`) or get a generated `PDF_<i>`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{SourceDocument, SourceType};

use super::{CorpusError, CorpusResult};

const ABSTRACT_PREFIX: &str = "abstract_";

/// A file that could not be turned into a document.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of loading a directory: the documents read and the files skipped.
#[derive(Debug, Default)]
pub struct CorpusLoad {
    pub documents: Vec<SourceDocument>,
    pub failures: Vec<LoadFailure>,
}

impl CorpusLoad {
    pub fn abstract_count(&self) -> usize {
        self.count(SourceType::Abstract)
    }

    pub fn pdf_count(&self) -> usize {
        self.count(SourceType::Pdf)
    }

    fn count(&self, source_type: SourceType) -> usize {
        self.documents
            .iter()
            .filter(|d| d.source_type == source_type)
            .count()
    }

    fn record(&mut self, path: &Path, result: CorpusResult<SourceDocument>) {
        match result {
            Ok(document) => {
                tracing::debug!(id = %document.id, chars = document.text_length(), "loaded document");
                self.documents.push(document);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping document");
                self.failures.push(LoadFailure {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        }
    }
}

/// Load every abstract and PDF in `dir`.
///
/// Files are visited in sorted order, abstracts first. A file that cannot be
/// read is recorded as a [`LoadFailure`] and the load continues; only a
/// failure to list the directory itself is an error.
pub fn load_directory<P: AsRef<Path>>(dir: P) -> CorpusResult<CorpusLoad> {
    let mut paths = fs::read_dir(dir.as_ref())?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    paths.sort();

    let abstracts: Vec<&PathBuf> = paths.iter().filter(|p| abstract_pmid(p).is_some()).collect();
    let pdfs: Vec<&PathBuf> = paths.iter().filter(|p| is_pdf(p)).collect();

    let mut load = CorpusLoad::default();

    for path in abstracts {
        let result = read_abstract(path);
        load.record(path, result);
    }

    for (i, path) in pdfs.into_iter().enumerate() {
        let result = read_pdf(path, i + 1);
        load.record(path, result);
    }

    tracing::info!(
        abstracts = load.abstract_count(),
        pdfs = load.pdf_count(),
        failures = load.failures.len(),
        "loaded corpus from {}",
        dir.as_ref().display()
    );

    Ok(load)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn abstract_pmid(path: &Path) -> Option<String> {
    if path.extension()? != "txt" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix(ABSTRACT_PREFIX).map(str::to_string)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Document id for a PDF from its file stem, falling back to `PDF_<index>`.
pub fn pdf_document_id(stem: &str, index: usize) -> String {
    if stem.contains("PMID") || stem.contains("PMC") {
        stem.replace("PMID_", "").replace("PMC", "")
    } else {
        format!("PDF_{index}")
    }
}

fn non_empty(text: String) -> CorpusResult<String> {
    if text.trim().is_empty() {
        Err(CorpusError::EmptyText)
    } else {
        Ok(text)
    }
}

fn read_abstract(path: &Path) -> CorpusResult<SourceDocument> {
    let pmid = abstract_pmid(path).unwrap_or_default();
    let text = non_empty(fs::read_to_string(path)?)?;
    Ok(SourceDocument::new(pmid, file_name(path), SourceType::Abstract, text))
}

fn read_pdf(path: &Path, index: usize) -> CorpusResult<SourceDocument> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let text = non_empty(pdf_text(path)?)?;
    Ok(SourceDocument::new(
        pdf_document_id(&stem, index),
        file_name(path),
        SourceType::Pdf,
        text,
    ))
}

#[cfg(feature = "pdf")]
fn pdf_text(path: &Path) -> CorpusResult<String> {
    let bytes = fs::read(path)?;
    let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
        .map_err(|e| CorpusError::Pdf(e.to_string()))?;
    Ok(pages.join("\n"))
}

#[cfg(not(feature = "pdf"))]
fn pdf_text(_path: &Path) -> CorpusResult<String> {
    Err(CorpusError::PdfUnsupported)
}
