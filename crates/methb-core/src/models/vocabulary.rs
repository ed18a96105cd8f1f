//! Closed vocabularies for the categorical fields of a case record.
//!
//! Every categorical field is an enum, so an extracted record can never carry
//! free text. Labels render exactly as they are persisted in CSV output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel written for a trigger, route, treatment or outcome that could not be extracted.
pub const UNKNOWN: &str = "Unknown";

/// Sentinel written when no symptom keyword matched.
pub const NONE_SPECIFIED: &str = "None specified";

/// Error for a label outside its vocabulary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognised {kind} label: {label:?}")]
pub struct LabelError {
    pub kind: &'static str,
    pub label: String,
}

/// A fixed, ordered vocabulary of canonical labels.
pub trait Vocabulary: Copy + Eq + 'static {
    /// Field name used in error messages.
    const KIND: &'static str;

    /// Every canonical label in declaration order (sentinels excluded).
    const ALL: &'static [Self];

    /// Label as persisted.
    fn label(self) -> &'static str;
}

fn parse_label<T: Vocabulary>(s: &str) -> Result<T, LabelError> {
    let wanted = s.trim();
    T::ALL
        .iter()
        .copied()
        .find(|v| v.label().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| LabelError {
            kind: T::KIND,
            label: s.to_string(),
        })
}

// =========================================================================
// Trigger
// =========================================================================

/// Causative agent or exposure associated with a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Trigger {
    Acetaminophen,
    Benzocaine,
    Dapsone,
    Lidocaine,
    Nitrates,
    Phenazopyridine,
    Aniline,
    Metoclopramide,
    Primaquine,
    Sulfonamides,
    Chloroquine,
    Rasburicase,
    Genetic,
    Unknown,
}

impl Vocabulary for Trigger {
    const KIND: &'static str = "trigger";

    const ALL: &'static [Self] = &[
        Trigger::Acetaminophen,
        Trigger::Benzocaine,
        Trigger::Dapsone,
        Trigger::Lidocaine,
        Trigger::Nitrates,
        Trigger::Phenazopyridine,
        Trigger::Aniline,
        Trigger::Metoclopramide,
        Trigger::Primaquine,
        Trigger::Sulfonamides,
        Trigger::Chloroquine,
        Trigger::Rasburicase,
        Trigger::Genetic,
    ];

    fn label(self) -> &'static str {
        match self {
            Trigger::Acetaminophen => "Acetaminophen",
            Trigger::Benzocaine => "Benzocaine",
            Trigger::Dapsone => "Dapsone",
            Trigger::Lidocaine => "Lidocaine",
            Trigger::Nitrates => "Nitrates",
            Trigger::Phenazopyridine => "Phenazopyridine",
            Trigger::Aniline => "Aniline",
            Trigger::Metoclopramide => "Metoclopramide",
            Trigger::Primaquine => "Primaquine",
            Trigger::Sulfonamides => "Sulfonamides",
            Trigger::Chloroquine => "Chloroquine",
            Trigger::Rasburicase => "Rasburicase",
            Trigger::Genetic => "Genetic",
            Trigger::Unknown => UNKNOWN,
        }
    }
}

impl Trigger {
    pub fn is_known(self) -> bool {
        self != Trigger::Unknown
    }
}

impl FromStr for Trigger {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() || s.trim().eq_ignore_ascii_case(UNKNOWN) {
            return Ok(Trigger::Unknown);
        }
        parse_label(s)
    }
}

// =========================================================================
// Route
// =========================================================================

/// Route of exposure or administration of the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Route {
    Topical,
    Oral,
    Intravenous,
    Inhalation,
    Subcutaneous,
    Unknown,
}

impl Vocabulary for Route {
    const KIND: &'static str = "route";

    const ALL: &'static [Self] = &[
        Route::Topical,
        Route::Oral,
        Route::Intravenous,
        Route::Inhalation,
        Route::Subcutaneous,
    ];

    fn label(self) -> &'static str {
        match self {
            Route::Topical => "Topical",
            Route::Oral => "Oral",
            Route::Intravenous => "Intravenous",
            Route::Inhalation => "Inhalation",
            Route::Subcutaneous => "Subcutaneous",
            Route::Unknown => UNKNOWN,
        }
    }
}

impl FromStr for Route {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() || s.trim().eq_ignore_ascii_case(UNKNOWN) {
            return Ok(Route::Unknown);
        }
        parse_label(s)
    }
}

// =========================================================================
// Treatment
// =========================================================================

/// A treatment modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Treatment {
    MethyleneBlue,
    VitaminC,
    ExchangeTransfusion,
    Oxygen,
    Supportive,
}

impl Vocabulary for Treatment {
    const KIND: &'static str = "treatment";

    const ALL: &'static [Self] = &[
        Treatment::MethyleneBlue,
        Treatment::VitaminC,
        Treatment::ExchangeTransfusion,
        Treatment::Oxygen,
        Treatment::Supportive,
    ];

    fn label(self) -> &'static str {
        match self {
            Treatment::MethyleneBlue => "Methylene Blue",
            Treatment::VitaminC => "Vitamin C",
            Treatment::ExchangeTransfusion => "Exchange Transfusion",
            Treatment::Oxygen => "Oxygen",
            Treatment::Supportive => "Supportive",
        }
    }
}

impl FromStr for Treatment {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(s)
    }
}

/// Treatments found in a document, in vocabulary order.
///
/// Renders as a comma-joined list, or `"Unknown"` when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Treatments(Vec<Treatment>);

impl Treatments {
    pub fn new(mut items: Vec<Treatment>) -> Self {
        items.sort_by_key(|t| Treatment::ALL.iter().position(|x| x == t));
        items.dedup();
        Self(items)
    }

    pub fn items(&self) -> &[Treatment] {
        &self.0
    }

    pub fn contains(&self, treatment: Treatment) -> bool {
        self.0.contains(&treatment)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Treatments {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNKNOWN) {
            return Ok(Self::default());
        }
        let items = trimmed
            .split(',')
            .map(|part| part.parse::<Treatment>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(items))
    }
}

impl fmt::Display for Treatments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str(UNKNOWN);
        }
        f.write_str(&join_labels(&self.0))
    }
}

// =========================================================================
// Symptom
// =========================================================================

/// A presenting symptom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symptom {
    Cyanosis,
    Dyspnea,
    AlteredMentalStatus,
    Headache,
    Dizziness,
    Nausea,
    Seizure,
    ChestPain,
}

impl Vocabulary for Symptom {
    const KIND: &'static str = "symptom";

    const ALL: &'static [Self] = &[
        Symptom::Cyanosis,
        Symptom::Dyspnea,
        Symptom::AlteredMentalStatus,
        Symptom::Headache,
        Symptom::Dizziness,
        Symptom::Nausea,
        Symptom::Seizure,
        Symptom::ChestPain,
    ];

    fn label(self) -> &'static str {
        match self {
            Symptom::Cyanosis => "Cyanosis",
            Symptom::Dyspnea => "Dyspnea",
            Symptom::AlteredMentalStatus => "Altered Mental Status",
            Symptom::Headache => "Headache",
            Symptom::Dizziness => "Dizziness",
            Symptom::Nausea => "Nausea",
            Symptom::Seizure => "Seizure",
            Symptom::ChestPain => "Chest Pain",
        }
    }
}

impl FromStr for Symptom {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(s)
    }
}

/// Symptoms found in a document, in vocabulary order.
///
/// Renders as a comma-joined list, or `"None specified"` when empty. That
/// sentinel means no symptom was reported, which is not the same as a field
/// that could not be extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symptoms(Vec<Symptom>);

impl Symptoms {
    pub fn new(mut items: Vec<Symptom>) -> Self {
        items.sort_by_key(|s| Symptom::ALL.iter().position(|x| x == s));
        items.dedup();
        Self(items)
    }

    pub fn items(&self) -> &[Symptom] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Symptoms {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NONE_SPECIFIED) {
            return Ok(Self::default());
        }
        let items = trimmed
            .split(',')
            .map(|part| part.parse::<Symptom>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(items))
    }
}

impl fmt::Display for Symptoms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str(NONE_SPECIFIED);
        }
        f.write_str(&join_labels(&self.0))
    }
}

fn join_labels<T: Vocabulary>(items: &[T]) -> String {
    items
        .iter()
        .map(|v| v.label())
        .collect::<Vec<_>>()
        .join(", ")
}

// =========================================================================
// String conversions (Display / serde)
// =========================================================================

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Treatment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Trigger> for String {
    fn from(value: Trigger) -> Self {
        value.label().to_string()
    }
}

impl TryFrom<String> for Trigger {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Route> for String {
    fn from(value: Route) -> Self {
        value.label().to_string()
    }
}

impl TryFrom<String> for Route {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Treatments> for String {
    fn from(value: Treatments) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Treatments {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Symptoms> for String {
    fn from(value: Symptoms) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Symptoms {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for trigger in Trigger::ALL {
            assert_eq!(trigger.label().parse::<Trigger>().unwrap(), *trigger);
        }
        for symptom in Symptom::ALL {
            assert_eq!(symptom.label().parse::<Symptom>().unwrap(), *symptom);
        }
        assert_eq!("unknown".parse::<Trigger>().unwrap(), Trigger::Unknown);
        assert_eq!("".parse::<Route>().unwrap(), Route::Unknown);
    }

    #[test]
    fn test_free_text_rejected() {
        let err = "Aspirin".parse::<Trigger>().unwrap_err();
        assert_eq!(err.kind, "trigger");
        assert!("Leeches".parse::<Treatments>().is_err());
    }

    #[test]
    fn test_treatments_sentinel() {
        assert_eq!(Treatments::default().to_string(), "Unknown");
        assert!("Unknown".parse::<Treatments>().unwrap().is_empty());

        let parsed: Treatments = "Oxygen, Methylene Blue".parse().unwrap();
        // Declaration order is restored
        assert_eq!(parsed.to_string(), "Methylene Blue, Oxygen");
    }

    #[test]
    fn test_symptoms_sentinel() {
        assert_eq!(Symptoms::default().to_string(), "None specified");
        assert!("None specified".parse::<Symptoms>().unwrap().is_empty());

        let symptoms = Symptoms::new(vec![Symptom::ChestPain, Symptom::Cyanosis, Symptom::Cyanosis]);
        assert_eq!(symptoms.to_string(), "Cyanosis, Chest Pain");
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Trigger::Dapsone).unwrap();
        assert_eq!(json, "\"Dapsone\"");

        let treatments: Treatments = serde_json::from_str("\"Methylene Blue, Vitamin C\"").unwrap();
        assert!(treatments.contains(Treatment::VitaminC));
    }
}
