//! Property tests for the extractor and corpus fingerprinting.

use methb_core::corpus::fingerprint;
use methb_core::extractor::{case_section, extract, methb_level};
use methb_core::models::{CaseRecord, Route, Symptom, Treatment, Trigger, Vocabulary, KEY_FIELD_COUNT};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_methb_level_in_range(text in "\\PC{0,300}") {
        if let Some(level) = methb_level(&text.to_lowercase()) {
            prop_assert!(level > 0.0 && level <= 100.0, "MetHb {} out of range", level);
        }
    }

    #[test]
    fn test_methb_level_reads_reported_value(whole in 1u32..100, tenths in 0u32..10) {
        let text = format!("the methemoglobin level was {whole}.{tenths}% on admission");
        let expected = whole as f64 + tenths as f64 / 10.0;

        let level = methb_level(&text);
        prop_assert!(level.is_some());
        prop_assert!((level.unwrap() - expected).abs() < 1e-9, "got {:?}, expected {}", level, expected);
    }

    #[test]
    fn test_quality_score_matches_populated_fields(text in "\\PC{0,300}") {
        let record = extract(&text, "p");
        let expected = (100.0 * record.populated_key_fields() as f64 / KEY_FIELD_COUNT as f64).round() as u8;

        prop_assert_eq!(record.data_quality_score, expected);
        prop_assert!(record.data_quality_score <= 100);
    }

    #[test]
    fn test_extraction_is_deterministic(text in "\\PC{0,300}") {
        prop_assert_eq!(extract(&text, "d"), extract(&text, "d"));
    }

    #[test]
    fn test_case_section_is_prefix_or_suffix(text in "\\PC{0,300}") {
        let section = case_section(&text);
        prop_assert!(
            text.ends_with(section) || text.starts_with(section),
            "section {:?} is neither head nor tail of {:?}", section, text
        );
    }

    #[test]
    fn test_fingerprint_ignores_case_and_spacing(words in prop::collection::vec("[a-z]{1,8}", 1..12)) {
        let plain = words.join(" ");
        let noisy = format!("  {}\n", words.join("  \t").to_uppercase());

        prop_assert_eq!(fingerprint(&plain), fingerprint(&noisy));
    }

    #[test]
    fn test_trigger_labels_parse_back(trigger in prop::sample::select(Trigger::ALL.to_vec())) {
        prop_assert_eq!(trigger.label().parse::<Trigger>().ok(), Some(trigger));
    }

    #[test]
    fn test_categorical_fields_stay_in_vocabulary(text in "\\PC{0,300}") {
        let record: CaseRecord = extract(&text, "v");

        // ALL excludes the Unknown sentinel
        prop_assert!(record.trigger == Trigger::Unknown || Trigger::ALL.contains(&record.trigger));
        prop_assert!(record.trigger_route == Route::Unknown || Route::ALL.contains(&record.trigger_route));
        prop_assert!(record.treatment.items().iter().all(|t| Treatment::ALL.contains(t)));
        prop_assert!(record.symptoms.items().iter().all(|s| Symptom::ALL.contains(s)));
    }
}
