//! Priority cascades for gender, outcome and G6PD status.
//!
//! Each cascade is an ordered rule list evaluated first-match-wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{G6pdStatus, Gender, Outcome};

use super::text::prefix_chars;

/// Characters of the document searched for the patient's gender.
pub const GENDER_WINDOW: usize = 500;

/// Fires when `require` matches and `reject` (if any) does not.
struct Rule<T> {
    require: Regex,
    reject: Option<Regex>,
    result: T,
}

impl<T: Copy> Rule<T> {
    fn new(require: &str, reject: Option<&str>, result: T) -> Self {
        Self {
            require: Regex::new(require).expect("valid rule pattern"),
            reject: reject.map(|p| Regex::new(p).expect("valid rule pattern")),
            result,
        }
    }

    fn apply(&self, text: &str) -> Option<T> {
        let rejected = self.reject.as_ref().is_some_and(|r| r.is_match(text));
        (self.require.is_match(text) && !rejected).then_some(self.result)
    }
}

fn first_match<T: Copy>(rules: &[Rule<T>], text: &str) -> Option<T> {
    rules.iter().find_map(|rule| rule.apply(text))
}

static GENDER_RULES: LazyLock<Vec<Rule<Gender>>> = LazyLock::new(|| {
    vec![
        Rule::new(r"\bmale\b", Some(r"\bfemale\b"), Gender::Male),
        Rule::new(r"\bfemale\b", None, Gender::Female),
        Rule::new(r"\b(?:man|men|boy)\b", None, Gender::Male),
        Rule::new(r"\b(?:woman|women|girl)\b", None, Gender::Female),
    ]
});

static OUTCOME_RULES: LazyLock<Vec<Rule<Outcome>>> = LazyLock::new(|| {
    vec![
        Rule::new(
            r"recovered|discharged|improved|resolved|uneventful recovery",
            None,
            Outcome::Recovered,
        ),
        Rule::new(r"died|death|fatal|expired|mortality", None, Outcome::Fatal),
        Rule::new(r"transferred|admitted", None, Outcome::Admitted),
    ]
});

static G6PD_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"g6pd|g-6-pd|glucose-6-phosphate dehydrogenase").expect("valid g6pd pattern")
});

static G6PD_RULES: LazyLock<Vec<Rule<G6pdStatus>>> = LazyLock::new(|| {
    vec![
        Rule::new(r"deficien(?:cy|t)", None, G6pdStatus::Deficient),
        Rule::new(r"normal", None, G6pdStatus::Normal),
    ]
});

/// Gender from the opening of the lowercased text, where the patient is introduced.
pub fn gender(text_lower: &str) -> Option<Gender> {
    let intro = prefix_chars(text_lower, GENDER_WINDOW);
    first_match(&GENDER_RULES, intro)
}

/// Outcome from the full lowercased text.
pub fn outcome(text_lower: &str) -> Outcome {
    first_match(&OUTCOME_RULES, text_lower).unwrap_or(Outcome::Unknown)
}

/// G6PD status from the full lowercased text.
pub fn g6pd_status(text_lower: &str) -> G6pdStatus {
    if !G6PD_MENTION.is_match(text_lower) {
        return G6pdStatus::NotMentioned;
    }
    first_match(&G6PD_RULES, text_lower).unwrap_or(G6pdStatus::Mentioned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_precedence() {
        assert_eq!(gender("a male patient"), Some(Gender::Male));
        // "female" contains "male" but only as a substring
        assert_eq!(gender("a female patient"), Some(Gender::Female));
        assert_eq!(gender("male and female twins"), Some(Gender::Female));
        assert_eq!(gender("a 34-year-old man"), Some(Gender::Male));
        assert_eq!(gender("a young woman"), Some(Gender::Female));
        assert_eq!(gender("the patient"), None);
    }

    #[test]
    fn test_gender_ignores_late_mentions() {
        let text = format!("{} a woman", "x".repeat(GENDER_WINDOW));
        assert_eq!(gender(&text), None);
    }

    #[test]
    fn test_gender_word_boundaries() {
        // "manage" and "human" must not count as "man"
        assert_eq!(gender("we manage human exposure"), None);
    }

    #[test]
    fn test_outcome_priority() {
        assert_eq!(outcome("she recovered fully"), Outcome::Recovered);
        // Recovery terms outrank death terms
        assert_eq!(outcome("mortality is high, but he was discharged"), Outcome::Recovered);
        assert_eq!(outcome("the patient died on day 3"), Outcome::Fatal);
        assert_eq!(outcome("transferred to the icu"), Outcome::Admitted);
        assert_eq!(outcome("no follow-up"), Outcome::Unknown);
    }

    #[test]
    fn test_g6pd_status() {
        assert_eq!(g6pd_status("known g6pd deficiency"), G6pdStatus::Deficient);
        assert_eq!(
            g6pd_status("glucose-6-phosphate dehydrogenase activity was normal"),
            G6pdStatus::Normal
        );
        assert_eq!(g6pd_status("g6pd testing was sent"), G6pdStatus::Mentioned);
        assert_eq!(g6pd_status("normal saline was given"), G6pdStatus::NotMentioned);
    }
}
