//! Synonym tables for the closed vocabularies.
//!
//! Each canonical label maps to lowercase surface forms. Tables are `const`
//! data, so they are initialised once and never mutated.

use crate::models::{Route, Symptom, Treatment, Trigger, Vocabulary};

use super::text::contains_term;

/// A vocabulary whose labels can be spotted in text by synonym.
pub trait Lexicon: Vocabulary {
    /// Lowercase surface forms for this label.
    fn synonyms(self) -> &'static [&'static str];

    /// Whether any synonym occurs in the lowercased text.
    fn found_in(self, text_lower: &str) -> bool {
        self.synonyms()
            .iter()
            .any(|term| contains_term(text_lower, term))
    }
}

/// Every label found in the text, in declaration order.
pub fn all_present<T: Lexicon>(text_lower: &str) -> Vec<T> {
    T::ALL
        .iter()
        .copied()
        .filter(|label| label.found_in(text_lower))
        .collect()
}

/// The first label found in the text, in declaration order.
pub fn first_present<T: Lexicon>(text_lower: &str) -> Option<T> {
    T::ALL.iter().copied().find(|label| label.found_in(text_lower))
}

impl Lexicon for Trigger {
    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Trigger::Acetaminophen => &["acetaminophen", "paracetamol", "apap", "tylenol"],
            Trigger::Benzocaine => &["benzocaine", "hurricane spray", "orajel"],
            Trigger::Dapsone => &["dapsone", "aczone"],
            Trigger::Lidocaine => &["lidocaine", "xylocaine", "lignocaine"],
            Trigger::Nitrates => &["nitrate", "nitrite", "sodium nitrite", "nitrous"],
            Trigger::Phenazopyridine => &["phenazopyridine", "pyridium", "azo"],
            Trigger::Aniline => &["aniline dye", "aniline"],
            Trigger::Metoclopramide => &["metoclopramide", "reglan"],
            Trigger::Primaquine => &["primaquine"],
            Trigger::Sulfonamides => &["sulfamethoxazole", "trimethoprim", "sulfa"],
            Trigger::Chloroquine => &["chloroquine"],
            Trigger::Rasburicase => &["rasburicase", "elitek"],
            Trigger::Genetic => &[
                "genetic",
                "hereditary",
                "congenital",
                "nadh",
                "cytochrome b5",
                "familial",
            ],
            Trigger::Unknown => &[],
        }
    }
}

impl Lexicon for Treatment {
    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Treatment::MethyleneBlue => &["methylene blue", "methylthioninium", "mb", "urolene blue"],
            Treatment::VitaminC => &["vitamin c", "ascorbic acid", "ascorbate"],
            Treatment::ExchangeTransfusion => &["exchange transfusion", "blood exchange"],
            Treatment::Oxygen => &["oxygen therapy", "supplemental oxygen", "high-flow oxygen"],
            Treatment::Supportive => &["supportive care", "observation", "conservative"],
        }
    }
}

impl Lexicon for Symptom {
    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Symptom::Cyanosis => &["cyanosis", "cyanotic", "blue", "bluish"],
            Symptom::Dyspnea => &[
                "dyspnea",
                "shortness of breath",
                "difficulty breathing",
                "respiratory distress",
            ],
            Symptom::AlteredMentalStatus => &[
                "confusion",
                "altered mental",
                "lethargy",
                "lethargic",
                "unconscious",
                "coma",
            ],
            Symptom::Headache => &["headache", "head ache"],
            Symptom::Dizziness => &["dizziness", "dizzy", "lightheaded"],
            Symptom::Nausea => &["nausea", "vomiting", "nauseous"],
            Symptom::Seizure => &["seizure", "convulsion"],
            Symptom::ChestPain => &["chest pain", "angina"],
        }
    }
}

impl Lexicon for Route {
    fn synonyms(self) -> &'static [&'static str] {
        match self {
            Route::Topical => &["topical", "spray", "applied", "gel"],
            Route::Oral => &["oral", "ingested", "swallowed", "po"],
            Route::Intravenous => &["intravenous", "iv", "infusion"],
            Route::Inhalation => &["inhaled", "inhalation", "gas"],
            Route::Subcutaneous => &["subcutaneous", "sc", "subq"],
            Route::Unknown => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_label_has_synonyms() {
        for trigger in Trigger::ALL {
            assert!(!trigger.synonyms().is_empty(), "{trigger} has no synonyms");
        }
        for treatment in Treatment::ALL {
            assert!(!treatment.synonyms().is_empty());
        }
        for symptom in Symptom::ALL {
            assert!(!symptom.synonyms().is_empty());
        }
        for route in Route::ALL {
            assert!(!route.synonyms().is_empty());
        }
    }

    #[test]
    fn test_synonyms_are_lowercase() {
        let tables = Trigger::ALL
            .iter()
            .flat_map(|t| t.synonyms())
            .chain(Treatment::ALL.iter().flat_map(|t| t.synonyms()))
            .chain(Symptom::ALL.iter().flat_map(|s| s.synonyms()))
            .chain(Route::ALL.iter().flat_map(|r| r.synonyms()));

        for term in tables {
            assert_eq!(*term, term.to_lowercase());
        }
    }

    #[test]
    fn test_all_present_keeps_declaration_order() {
        let found: Vec<Treatment> =
            all_present("given supplemental oxygen, then methylene blue and ascorbic acid");
        assert_eq!(
            found,
            vec![Treatment::MethyleneBlue, Treatment::VitaminC, Treatment::Oxygen]
        );
    }

    #[test]
    fn test_first_present_route() {
        // Topical is declared before Oral, so it wins when both appear
        assert_eq!(
            first_present::<Route>("benzocaine spray; later the tablet was swallowed"),
            Some(Route::Topical)
        );
        assert_eq!(first_present::<Route>("nothing relevant"), None);
    }
}
