//! Rule checks over extracted records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::export::CaseRow;
use crate::models::{G6pdStatus, SourceType, Treatment, Trigger};

use super::{IssueKind, ValidationIssue};

/// MetHb values that are more likely hour counts than percentages.
const TIME_LIKE_VALUES: [f64; 4] = [24.0, 48.0, 72.0, 96.0];

/// Limits used by the range checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationThresholds {
    /// MetHb above this is flagged as unusually high (often fatal)
    pub high_methb: f64,
    /// MetHb below this is unusually low for a published case
    pub low_methb: f64,
    /// Oldest plausible age
    pub max_age: u32,
    /// Records scoring below this need manual review
    pub low_quality: u8,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            high_methb: 70.0,
            low_methb: 10.0,
            max_age: 120,
            low_quality: 50,
        }
    }
}

/// A record lacking one or more of MetHb level, trigger and treatment.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingCritical {
    pub id: String,
    pub missing_fields: Vec<&'static str>,
    pub data_quality_score: u8,
}

/// A record whose quality score is below the review threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct LowQuality {
    pub id: String,
    pub data_quality_score: u8,
    pub source_type: SourceType,
}

/// Everything the validator found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub total_records: usize,
    pub issues: Vec<ValidationIssue>,
    pub missing_critical: Vec<MissingCritical>,
    pub low_quality: Vec<LowQuality>,
}

impl ValidationReport {
    /// No issues and no record below the quality threshold.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.low_quality.is_empty()
    }

    /// Issues of one kind.
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total records: {}", self.total_records)?;
        writeln!(f, "Total issues found: {}", self.issues.len())?;
        writeln!(f, "Records needing review: {}", self.low_quality.len())?;
        write!(f, "Records missing critical data: {}", self.missing_critical.len())?;

        for issue in &self.issues {
            write!(f, "\n  - {} [{}]: {}", issue.id, issue.kind, issue.message)?;
        }
        for missing in &self.missing_critical {
            write!(
                f,
                "\n  - {}: missing {} (quality {}/100)",
                missing.id,
                missing.missing_fields.join(", "),
                missing.data_quality_score
            )?;
        }
        for record in &self.low_quality {
            write!(
                f,
                "\n  - {}: quality {}/100 ({})",
                record.id, record.data_quality_score, record.source_type
            )?;
        }
        Ok(())
    }
}

/// Runs every check over a set of records.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    thresholds: ValidationThresholds,
}

impl Validator {
    pub fn new(thresholds: ValidationThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ValidationThresholds {
        &self.thresholds
    }

    /// Validate all rows. Issues are grouped by check, in row order within each.
    pub fn validate(&self, rows: &[CaseRow]) -> ValidationReport {
        let checks: [fn(&Self, &CaseRow) -> Vec<ValidationIssue>; 4] = [
            Self::check_methb,
            Self::check_age,
            Self::check_contraindications,
            Self::check_extraction_errors,
        ];

        let issues: Vec<ValidationIssue> = checks
            .iter()
            .flat_map(|check| rows.iter().flat_map(move |row| check(self, row)))
            .collect();

        let report = ValidationReport {
            total_records: rows.len(),
            issues,
            missing_critical: rows.iter().filter_map(missing_critical).collect(),
            low_quality: rows
                .iter()
                .filter(|r| r.data_quality_score < self.thresholds.low_quality)
                .map(|r| LowQuality {
                    id: r.id.clone(),
                    data_quality_score: r.data_quality_score,
                    source_type: r.source_type,
                })
                .collect(),
        };

        tracing::info!(
            records = report.total_records,
            issues = report.issues.len(),
            low_quality = report.low_quality.len(),
            "validated records"
        );

        report
    }

    fn check_methb(&self, row: &CaseRow) -> Vec<ValidationIssue> {
        let Some(level) = row.methb_level else {
            return Vec::new();
        };

        let issue = if !(0.0..=100.0).contains(&level) {
            Some((
                IssueKind::InvalidMethbRange,
                format!("MetHb {level}% is outside valid range (0-100%)"),
            ))
        } else if level > self.thresholds.high_methb {
            Some((
                IssueKind::UnusuallyHighMethb,
                format!(
                    "MetHb {level}% is very high (>{}% often fatal), verify this is correct",
                    self.thresholds.high_methb
                ),
            ))
        } else if level < self.thresholds.low_methb {
            Some((
                IssueKind::LowMethbLevel,
                format!("MetHb {level}% is low for a clinical case report, verify extraction"),
            ))
        } else {
            None
        };

        issue
            .map(|(kind, message)| ValidationIssue::new(&row.id, kind, level.to_string(), message))
            .into_iter()
            .collect()
    }

    fn check_age(&self, row: &CaseRow) -> Vec<ValidationIssue> {
        match row.age {
            Some(age) if age > self.thresholds.max_age => vec![ValidationIssue::new(
                &row.id,
                IssueKind::InvalidAge,
                age.to_string(),
                format!("Age {age} is outside valid range"),
            )],
            _ => Vec::new(),
        }
    }

    fn check_contraindications(&self, row: &CaseRow) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if !row.treatment.contains(Treatment::MethyleneBlue) {
            return issues;
        }

        if row.g6pd_status == G6pdStatus::Deficient {
            issues.push(ValidationIssue::new(
                &row.id,
                IssueKind::G6pdMethyleneBlue,
                format!("G6PD: {}, Treatment: {}", row.g6pd_status, row.treatment),
                "G6PD deficient patient given methylene blue (contraindicated), verify extraction",
            ));
        }

        if row.trigger == Trigger::Genetic {
            issues.push(ValidationIssue::new(
                &row.id,
                IssueKind::GeneticMethyleneBlue,
                format!("Trigger: {}, Treatment: {}", row.trigger, row.treatment),
                "Genetic methemoglobinemia rarely responds to methylene blue, verify this case",
            ));
        }

        issues
    }

    fn check_extraction_errors(&self, row: &CaseRow) -> Vec<ValidationIssue> {
        match row.methb_level {
            Some(level) if TIME_LIKE_VALUES.contains(&level) => vec![ValidationIssue::new(
                &row.id,
                IssueKind::PossibleTimeValue,
                format!("MetHb: {level}%"),
                format!("MetHb {level}% might be a time value (72 hours, etc.), verify"),
            )],
            _ => Vec::new(),
        }
    }
}

fn missing_critical(row: &CaseRow) -> Option<MissingCritical> {
    let mut missing_fields = Vec::new();
    if row.methb_level.is_none() {
        missing_fields.push("methb_level");
    }
    if !row.trigger.is_known() {
        missing_fields.push("trigger");
    }
    if row.treatment.is_empty() {
        missing_fields.push("treatment");
    }

    (!missing_fields.is_empty()).then(|| MissingCritical {
        id: row.id.clone(),
        missing_fields,
        data_quality_score: row.data_quality_score,
    })
}
