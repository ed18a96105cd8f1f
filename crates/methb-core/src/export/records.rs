//! Records CSV: one row per extracted case, sentinels written literally.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::extractor::FeatureExtractor;
use crate::models::{
    CaseRecord, G6pdStatus, Gender, Outcome, Route, SourceDocument, SourceType, Symptoms,
    Treatments, Trigger,
};

use super::ExportResult;

/// A [`CaseRecord`] plus the provenance of its source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRow {
    pub id: String,
    pub methb_level: Option<f64>,
    pub trigger: Trigger,
    pub trigger_route: Route,
    pub treatment: Treatments,
    pub methylene_blue_dose: Option<String>,
    pub symptoms: Symptoms,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub g6pd_status: G6pdStatus,
    pub time_to_improvement: Option<String>,
    pub outcome: Outcome,
    pub data_quality_score: u8,
    pub source_file: String,
    pub source_type: SourceType,
}

impl CaseRow {
    /// Attach provenance to an extracted record.
    pub fn from_record(record: CaseRecord, source_file: impl Into<String>, source_type: SourceType) -> Self {
        Self {
            id: record.id,
            methb_level: record.methb_level,
            trigger: record.trigger,
            trigger_route: record.trigger_route,
            treatment: record.treatment,
            methylene_blue_dose: record.methylene_blue_dose,
            symptoms: record.symptoms,
            age: record.age,
            gender: record.gender,
            g6pd_status: record.g6pd_status,
            time_to_improvement: record.time_to_improvement,
            outcome: record.outcome,
            data_quality_score: record.data_quality_score,
            source_file: source_file.into(),
            source_type,
        }
    }

    /// Drop provenance.
    pub fn into_record(self) -> CaseRecord {
        CaseRecord {
            id: self.id,
            methb_level: self.methb_level,
            trigger: self.trigger,
            trigger_route: self.trigger_route,
            treatment: self.treatment,
            methylene_blue_dose: self.methylene_blue_dose,
            symptoms: self.symptoms,
            age: self.age,
            gender: self.gender,
            g6pd_status: self.g6pd_status,
            time_to_improvement: self.time_to_improvement,
            outcome: self.outcome,
            data_quality_score: self.data_quality_score,
        }
    }
}

/// Extract every document in order.
pub fn extract_corpus(documents: &[SourceDocument]) -> Vec<CaseRow> {
    let extractor = FeatureExtractor::new();

    let rows: Vec<CaseRow> = documents
        .iter()
        .map(|doc| {
            let record = extractor.extract(&doc.text, &doc.id);
            CaseRow::from_record(record, doc.source_file.clone(), doc.source_type)
        })
        .collect();

    tracing::info!(documents = rows.len(), "extracted case records");
    rows
}

/// Write case rows as CSV to any writer.
pub fn write_records<W: io::Write>(writer: W, rows: &[CaseRow]) -> ExportResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read case rows from CSV.
pub fn read_records<R: io::Read>(reader: R) -> ExportResult<Vec<CaseRow>> {
    let mut reader = csv::Reader::from_reader(reader);
    let rows = reader.deserialize().collect::<Result<Vec<CaseRow>, _>>()?;
    Ok(rows)
}

/// Write the records CSV to `path`.
pub fn write_records_csv<P: AsRef<Path>>(path: P, rows: &[CaseRow]) -> ExportResult<()> {
    let file = std::fs::File::create(path.as_ref())?;
    write_records(file, rows)?;
    tracing::info!(count = rows.len(), "wrote {}", path.as_ref().display());
    Ok(())
}

/// Read the records CSV at `path`.
pub fn read_records_csv<P: AsRef<Path>>(path: P) -> ExportResult<Vec<CaseRow>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_records(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<SourceDocument> {
        vec![
            SourceDocument::new(
                "101",
                "abstract_101.txt",
                SourceType::Abstract,
                "A 34-year-old man presented after dapsone overdose. Methemoglobin 38%. \
                 Treated with methylene blue 1.5 mg/kg. He recovered fully.",
            ),
            SourceDocument::new("PDF_1", "review.pdf", SourceType::Pdf, "Nothing clinical here."),
        ]
    }

    #[test]
    fn test_extract_corpus_keeps_provenance() {
        let rows = extract_corpus(&corpus());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "101");
        assert_eq!(rows[0].trigger, Trigger::Dapsone);
        assert_eq!(rows[1].source_file, "review.pdf");
        assert_eq!(rows[1].source_type, SourceType::Pdf);
        assert_eq!(rows[1].trigger, Trigger::Unknown);
    }

    #[test]
    fn test_sentinels_written_literally() {
        let rows = extract_corpus(&corpus());

        let mut buf = Vec::new();
        write_records(&mut buf, &rows).unwrap();
        let csv = String::from_utf8(buf).unwrap();

        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,methb_level,trigger,trigger_route,treatment,methylene_blue_dose,symptoms,age,\
             gender,g6pd_status,time_to_improvement,outcome,data_quality_score,source_file,source_type"
        );
        let empty_row = lines.nth(1).unwrap();
        assert_eq!(
            empty_row,
            "PDF_1,,Unknown,Unknown,Unknown,,None specified,,,Not mentioned,,Unknown,0,review.pdf,pdf"
        );
    }

    #[test]
    fn test_records_read_back() {
        let rows = extract_corpus(&corpus());

        let mut buf = Vec::new();
        write_records(&mut buf, &rows).unwrap();
        let back = read_records(buf.as_slice()).unwrap();

        assert_eq!(back, rows);
        assert_eq!(back[0].clone().into_record().methylene_blue_dose.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_read_rejects_free_text_labels() {
        let csv = "id,methb_level,trigger,trigger_route,treatment,methylene_blue_dose,symptoms,age,\
                   gender,g6pd_status,time_to_improvement,outcome,data_quality_score,source_file,source_type\n\
                   1,,Aspirin,Unknown,Unknown,,None specified,,,Not mentioned,,Unknown,0,a.txt,abstract\n";
        assert!(read_records(csv.as_bytes()).is_err());
    }
}
