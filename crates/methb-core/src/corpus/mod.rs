//! Document corpus: loading source texts, de-duplication and the documents CSV.

mod dedupe;
mod loader;
mod table;

pub use dedupe::*;
pub use loader::*;
pub use table::*;

use thiserror::Error;

/// Corpus errors.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("PDF support not compiled in (enable the `pdf` feature)")]
    PdfUnsupported,

    #[error("No text extracted")]
    EmptyText,
}

pub type CorpusResult<T> = Result<T, CorpusError>;
