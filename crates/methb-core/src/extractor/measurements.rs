//! Numeric fields: methemoglobin level, methylene blue dose, age and time to
//! improvement.
//!
//! Every function takes lowercased text and returns `None` when nothing
//! usable is found. Numbers that fail to parse are skipped.

use std::sync::LazyLock;

use regex::Regex;

/// Methemoglobin percentages, each capture group 1 holding the number.
static METHB_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"methemoglobin[^.]*?(?:level|concentration|measured|was|of|at)[^.]*?(\d+(?:\.\d+)?)\s*%",
        r"meth(?:b|hb)[^.]*?(?:level|concentration|was|of|at)[^.]*?(\d+(?:\.\d+)?)\s*%",
        r"methb[^.]*?(\d+(?:\.\d+)?)\s*%",
        r"methemoglobin[^.\d%]*(\d+(?:\.\d+)?)\s*%",
        r"(\d+(?:\.\d+)?)\s*%\s*methemoglobin",
        r"measured\s+(?:at\s+)?(\d+(?:\.\d+)?)\s*%",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid methb pattern"))
    .collect()
});

static DOSE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?(?:\s*[-–]\s*\d+(?:\.\d+)?)?)\s*mg\s*/\s*kg").expect("valid dose pattern")
});

/// Age patterns in priority order.
static AGE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(\d+)\s*(?:[-–]\s*)?years?[-\s]+old",
        r"(\d+)\s*y(?:ear)?[-\s.]?o(?:ld)?\b",
        r"\bage[:\s]+(\d+)",
        r"\baged\s+(\d+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid age pattern"))
    .collect()
});

static TIME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:improved|improvement|resolved|resolution)\s+(?:within|after|in)\s+(\d+)\s*(hour|hr|minute|min)",
        r"(\d+)\s*(hour|hr|minute|min)s?\s+(?:after|post)\s+(?:treatment|administration)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid time pattern"))
    .collect()
});

/// Peak methemoglobin percentage across every pattern, restricted to (0, 100].
pub fn methb_level(text_lower: &str) -> Option<f64> {
    METHB_PATTERNS
        .iter()
        .flat_map(|pattern| pattern.captures_iter(text_lower))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .filter(|value| *value > 0.0 && *value <= 100.0)
        .reduce(f64::max)
}

/// First `N` or `N-M` immediately followed by `mg/kg`, verbatim.
pub fn methylene_blue_dose(text_lower: &str) -> Option<String> {
    DOSE_PATTERN
        .captures(text_lower)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Patient age in years from the first pattern that yields a parseable number.
pub fn age(text_lower: &str) -> Option<u32> {
    AGE_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(text_lower)
            .and_then(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
    })
}

/// Time from treatment to improvement as `"<n> <unit>"`.
pub fn time_to_improvement(text_lower: &str) -> Option<String> {
    TIME_PATTERNS.iter().find_map(|pattern| {
        let caps = pattern.captures(text_lower)?;
        Some(format!("{} {}", caps.get(1)?.as_str(), caps.get(2)?.as_str()))
    })
}
