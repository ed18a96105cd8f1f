//! Small string-search helpers shared by the sub-extractors.
//!
//! All offsets are byte offsets into the searched string and always land on
//! char boundaries.

/// Terms of this length or shorter are abbreviations (`mb`, `po`, `iv`) and
/// only match as whole words.
pub const ABBREVIATION_MAX_LEN: usize = 3;

/// Byte offsets of every occurrence of `term` in `haystack`.
pub fn term_positions<'a>(haystack: &'a str, term: &'a str) -> impl Iterator<Item = usize> + 'a {
    let whole_word = term.len() <= ABBREVIATION_MAX_LEN;
    haystack
        .match_indices(term)
        .map(|(pos, _)| pos)
        .filter(move |&pos| !whole_word || is_word_bounded(haystack, pos, term.len()))
}

/// Whether `term` occurs in `haystack`.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    term_positions(haystack, term).next().is_some()
}

fn is_word_bounded(haystack: &str, start: usize, len: usize) -> bool {
    let before = haystack[..start].chars().next_back();
    let after = haystack[start + len..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// The first `max_chars` characters of `text`.
pub fn prefix_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Up to `max_chars` characters ending at `end`, cut back to the current sentence.
pub fn window_before(text: &str, end: usize, max_chars: usize) -> &str {
    let head = &text[..end];
    let start = head
        .char_indices()
        .rev()
        .take(max_chars)
        .last()
        .map_or(end, |(i, _)| i);
    let window = &head[start..];
    match window.rfind('.') {
        Some(dot) => &window[dot + 1..],
        None => window,
    }
}

/// Up to `max_chars` characters starting at `start`, cut at the end of the sentence.
pub fn window_after(text: &str, start: usize, max_chars: usize) -> &str {
    let tail = &text[start..];
    let end = tail.char_indices().nth(max_chars).map_or(tail.len(), |(i, _)| i);
    let window = &tail[..end];
    match window.find('.') {
        Some(dot) => &window[..dot],
        None => window,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviations_need_word_boundaries() {
        assert!(contains_term("given 2 mg po daily", "po"));
        assert!(!contains_term("hypoxia was noted", "po"));
        assert!(contains_term("mb (1 mg/kg) was given", "mb"));
        assert!(!contains_term("pulmonary embolism", "mb"));
        // Longer terms are plain substrings
        assert!(contains_term("cyanotic lips", "cyanotic"));
        assert!(contains_term("nitrates and nitrites", "nitrite"));
    }

    #[test]
    fn test_term_positions() {
        let positions: Vec<usize> = term_positions("iv then iv again, ivy", "iv").collect();
        assert_eq!(positions, vec![0, 8]);
    }

    #[test]
    fn test_prefix_chars_respects_char_boundaries() {
        assert_eq!(prefix_chars("héllo", 2), "hé");
        assert_eq!(prefix_chars("abc", 10), "abc");
        assert_eq!(prefix_chars("", 5), "");
    }

    #[test]
    fn test_windows_stop_at_sentence_end() {
        let text = "she was well. after taking dapsone she became cyanotic. later";
        let pos = text.find("dapsone").unwrap();
        assert_eq!(window_before(text, pos, 50), " after taking ");
        assert_eq!(window_after(text, pos + "dapsone".len(), 30), " she became cyanotic");
        assert_eq!(window_before(text, pos, 5), "king ");
    }
}
