//! Documents CSV: `pmid,source_file,source_type,text_length,text`.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::{SourceDocument, SourceType};

use super::CorpusResult;

/// One row of the documents CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentRow {
    pmid: String,
    source_file: String,
    source_type: SourceType,
    text_length: usize,
    text: String,
}

impl From<&SourceDocument> for DocumentRow {
    fn from(doc: &SourceDocument) -> Self {
        Self {
            pmid: doc.id.clone(),
            source_file: doc.source_file.clone(),
            source_type: doc.source_type,
            text_length: doc.text_length(),
            text: doc.text.clone(),
        }
    }
}

impl From<DocumentRow> for SourceDocument {
    fn from(row: DocumentRow) -> Self {
        SourceDocument::new(row.pmid, row.source_file, row.source_type, row.text)
    }
}

/// Write documents as CSV to any writer.
pub fn write_documents<W: io::Write>(writer: W, documents: &[SourceDocument]) -> CorpusResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for document in documents {
        writer.serialize(DocumentRow::from(document))?;
    }
    writer.flush()?;
    Ok(())
}

/// Read documents from CSV. `text_length` is recomputed, not trusted.
pub fn read_documents<R: io::Read>(reader: R) -> CorpusResult<Vec<SourceDocument>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut documents = Vec::new();
    for row in reader.deserialize::<DocumentRow>() {
        documents.push(row?.into());
    }
    Ok(documents)
}

/// Write the documents CSV to `path`.
pub fn write_documents_csv<P: AsRef<Path>>(path: P, documents: &[SourceDocument]) -> CorpusResult<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_documents(file, documents)?;
    tracing::info!(count = documents.len(), "wrote {}", path.as_ref().display());
    Ok(())
}

/// Read the documents CSV at `path`.
pub fn read_documents_csv<P: AsRef<Path>>(path: P) -> CorpusResult<Vec<SourceDocument>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_documents(file)
}
