//! Structured case record produced by the feature extractor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::vocabulary::{LabelError, Route, Symptoms, Treatments, Trigger, UNKNOWN};

/// Patient gender as stated in the report introduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// G6PD status mentioned in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum G6pdStatus {
    Deficient,
    Normal,
    /// G6PD is discussed but no status could be read
    Mentioned,
    /// G6PD never comes up in the text
    #[serde(rename = "Not mentioned")]
    NotMentioned,
}

/// Patient outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Recovered,
    Fatal,
    Admitted,
    Unknown,
}

/// One structured record per case report.
///
/// Created once by the extractor and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Document identifier (PMID or file-derived id)
    pub id: String,
    /// Peak methemoglobin percentage, in (0, 100]
    pub methb_level: Option<f64>,
    /// Causative agent
    pub trigger: Trigger,
    /// Route of exposure
    pub trigger_route: Route,
    /// Treatments given
    pub treatment: Treatments,
    /// Raw methylene blue dose expression, e.g. "1-2" (mg/kg)
    pub methylene_blue_dose: Option<String>,
    /// Presenting symptoms
    pub symptoms: Symptoms,
    /// Patient age in years
    pub age: Option<u32>,
    /// Patient gender
    pub gender: Option<Gender>,
    /// G6PD status
    pub g6pd_status: G6pdStatus,
    /// Raw "<n> <unit>" time from treatment to improvement
    pub time_to_improvement: Option<String>,
    /// Patient outcome
    pub outcome: Outcome,
    /// Completeness of the key fields, 0-100
    pub data_quality_score: u8,
}

/// Number of key fields the data-quality score is computed over.
pub const KEY_FIELD_COUNT: usize = 7;

impl CaseRecord {
    /// Count key fields holding a real value (not absent, not a sentinel).
    pub fn populated_key_fields(&self) -> usize {
        [
            self.methb_level.is_some(),
            self.trigger.is_known(),
            !self.treatment.is_empty(),
            self.age.is_some(),
            self.gender.is_some(),
            !self.symptoms.is_empty(),
            self.outcome != Outcome::Unknown,
        ]
        .iter()
        .filter(|populated| **populated)
        .count()
    }

    /// Data-quality score for a populated-field count, rounded to the nearest integer.
    pub fn quality_score(populated: usize) -> u8 {
        let populated = populated.min(KEY_FIELD_COUNT);
        (100.0 * populated as f64 / KEY_FIELD_COUNT as f64).round() as u8
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        })
    }
}

impl fmt::Display for G6pdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            G6pdStatus::Deficient => "Deficient",
            G6pdStatus::Normal => "Normal",
            G6pdStatus::Mentioned => "Mentioned",
            G6pdStatus::NotMentioned => "Not mentioned",
        })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Recovered => "Recovered",
            Outcome::Fatal => "Fatal",
            Outcome::Admitted => "Admitted",
            Outcome::Unknown => UNKNOWN,
        })
    }
}

impl FromStr for Outcome {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recovered" => Ok(Outcome::Recovered),
            "fatal" => Ok(Outcome::Fatal),
            "admitted" => Ok(Outcome::Admitted),
            "unknown" | "" => Ok(Outcome::Unknown),
            _ => Err(LabelError {
                kind: "outcome",
                label: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_record() -> CaseRecord {
        CaseRecord {
            id: "1".into(),
            methb_level: None,
            trigger: Trigger::Unknown,
            trigger_route: Route::Unknown,
            treatment: Treatments::default(),
            methylene_blue_dose: None,
            symptoms: Symptoms::default(),
            age: None,
            gender: None,
            g6pd_status: G6pdStatus::NotMentioned,
            time_to_improvement: None,
            outcome: Outcome::Unknown,
            data_quality_score: 0,
        }
    }

    #[test]
    fn test_quality_score_rounding() {
        let expected = [0, 14, 29, 43, 57, 71, 86, 100];
        for (populated, score) in expected.iter().enumerate() {
            assert_eq!(CaseRecord::quality_score(populated), *score);
        }
        // Clamped
        assert_eq!(CaseRecord::quality_score(12), 100);
    }

    #[test]
    fn test_sentinels_do_not_count() {
        let mut record = empty_record();
        assert_eq!(record.populated_key_fields(), 0);

        // Route, G6PD and dose are not key fields
        record.trigger_route = Route::Oral;
        record.g6pd_status = G6pdStatus::Deficient;
        record.methylene_blue_dose = Some("2".into());
        assert_eq!(record.populated_key_fields(), 0);

        record.trigger = Trigger::Dapsone;
        record.gender = Some(Gender::Female);
        assert_eq!(record.populated_key_fields(), 2);
    }

    #[test]
    fn test_status_rendering() {
        assert_eq!(G6pdStatus::NotMentioned.to_string(), "Not mentioned");
        assert_eq!(
            serde_json::to_string(&G6pdStatus::NotMentioned).unwrap(),
            "\"Not mentioned\""
        );
        assert_eq!(Outcome::Unknown.to_string(), "Unknown");
        assert_eq!("Fatal".parse::<Outcome>().unwrap(), Outcome::Fatal);
        assert!("Cured".parse::<Outcome>().is_err());
    }
}
