//! Trigger attribution.
//!
//! Background and discussion paragraphs often name drugs that have nothing
//! to do with the patient, so attribution only looks at the case narrative
//! and rewards mentions framed as a cause ("after dapsone", "benzocaine
//! induced").

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Trigger, Vocabulary};

use super::lexicon::Lexicon;
use super::text::{prefix_chars, term_positions, window_after, window_before};

/// Score for a bare mention.
pub const BASE_SCORE: u32 = 1;
/// Bonus when a cause phrase precedes the mention.
pub const LEADING_BONUS: u32 = 5;
/// Bonus when a cause phrase follows the mention.
pub const TRAILING_BONUS: u32 = 3;

const LEADING_WINDOW: usize = 50;
const TRAILING_WINDOW: usize = 30;

const LEADING_CAUSE_PHRASES: &[&str] = &[
    "after",
    "following",
    "induced by",
    "caused by",
    "due to",
    "secondary to",
    "associated with",
    "exposure to",
    "ingestion of",
    "overdose",
    "administration of",
    "use of",
    "received",
];

const TRAILING_CAUSE_PHRASES: &[&str] = &[
    "induced",
    "overdose",
    "toxicity",
    "poisoning",
    "exposure",
    "ingestion",
    "associated",
    "related",
];

/// Markers for the start of the clinical narrative.
static CASE_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)case\s+presentation",
        r"(?i)case\s+report",
        r"(?i)case\s+description",
        r"(?i)patient\s+presented",
        r"(?i)\bwe\s+report",
        r"(?i)\bwe\s+present",
        r"(?i)\ban?\s+\d{1,3}[-\s–]*(?:years?|months?|weeks?|days?)[-\s–]*old\b[^.]*?\b(?:patient|man|woman|male|female|boy|girl|infant|child|neonate)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid case marker"))
    .collect()
});

/// The slice of `text` most likely to hold the case narrative.
///
/// Starts at the earliest case marker and runs to the end. Without any
/// marker it is the first half of the document by characters. Either way
/// the result is a contiguous slice of the input.
pub fn case_section(text: &str) -> &str {
    let earliest = CASE_MARKERS
        .iter()
        .filter_map(|marker| marker.find(text))
        .map(|m| m.start())
        .min();

    match earliest {
        Some(start) => &text[start..],
        None => prefix_chars(text, text.chars().count() / 2),
    }
}

fn occurrence_score(section_lower: &str, start: usize, len: usize) -> u32 {
    let before = window_before(section_lower, start, LEADING_WINDOW);
    let after = window_after(section_lower, start + len, TRAILING_WINDOW);

    let mut score = BASE_SCORE;
    if LEADING_CAUSE_PHRASES.iter().any(|p| before.contains(p)) {
        score += LEADING_BONUS;
    }
    if TRAILING_CAUSE_PHRASES.iter().any(|p| after.contains(p)) {
        score += TRAILING_BONUS;
    }
    score
}

/// Best context score of every trigger mentioned in the lowercased section,
/// in declaration order.
pub fn score_triggers(section_lower: &str) -> Vec<(Trigger, u32)> {
    Trigger::ALL
        .iter()
        .copied()
        .filter_map(|trigger| {
            let best = trigger
                .synonyms()
                .iter()
                .flat_map(|term| {
                    term_positions(section_lower, term)
                        .map(move |pos| occurrence_score(section_lower, pos, term.len()))
                })
                .max()?;
            Some((trigger, best))
        })
        .collect()
}

/// Pick the winner from `score_triggers` output.
///
/// Ties go to the trigger declared first. A bare mention only counts when
/// it is the sole trigger in the section.
pub fn select_trigger(scores: &[(Trigger, u32)]) -> Trigger {
    let mut best: Option<(Trigger, u32)> = None;
    for &(trigger, score) in scores {
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((trigger, score));
        }
    }

    match best {
        Some((trigger, score)) if score > BASE_SCORE || scores.len() == 1 => trigger,
        _ => Trigger::Unknown,
    }
}

/// Attribute a trigger to the case described in `text`.
pub fn extract_trigger(text: &str) -> Trigger {
    let section = case_section(text).to_lowercase();
    select_trigger(&score_triggers(&section))
}
