//! Phrase matching utilities
//!
//! Trigger and stop phrases are matched on whole words, optionally with a
//! Levenshtein tolerance for transcription errors.

/// Fuzzy match using Levenshtein distance, allows ~30% errors
pub fn fuzzy_match(expected: &str, actual: &str) -> bool {
    if expected == actual {
        return true;
    }
    let max_dist = (expected.chars().count() / 3).max(1);
    strsim::levenshtein(expected, actual) <= max_dist
}

/// Clean text for matching: lowercase and remove non-alphabetic characters
pub fn clean_for_matching(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '\''
}

/// Byte offset of the first occurrence of `phrase` in `text` that starts and
/// ends on a word boundary
pub fn find_phrase(text: &str, phrase: &str) -> Option<usize> {
    if phrase.is_empty() {
        return None;
    }
    let mut from = 0;
    while let Some(rel) = text[from..].find(phrase) {
        let start = from + rel;
        let end = start + phrase.len();
        let before_ok = text[..start].chars().next_back().is_none_or(|c| !is_word_char(c));
        let after_ok = text[end..].chars().next().is_none_or(|c| !is_word_char(c));
        if before_ok && after_ok {
            return Some(start);
        }
        // step past the first char of this hit
        from = start + text[start..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Whether `phrase` occurs in `text` as whole words
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
    find_phrase(text, phrase).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(fuzzy_match("stop", "stop"));
        assert!(fuzzy_match("stop dictating", "stop dictating"));
    }

    #[test]
    fn test_fuzzy_match() {
        assert!(fuzzy_match("stop", "stap"));
        assert!(fuzzy_match("stop dictating", "stop dictation"));
    }

    #[test]
    fn test_no_match() {
        assert!(!fuzzy_match("stop", "start"));
        assert!(!fuzzy_match("stop", "go"));
    }

    #[test]
    fn test_clean_for_matching() {
        assert_eq!(clean_for_matching("Stop."), "stop");
        assert_eq!(clean_for_matching("Stop,  dictating!"), "stop dictating");
    }

    #[test]
    fn test_find_phrase_respects_word_boundaries() {
        assert_eq!(find_phrase("go to line", "go"), Some(0));
        assert_eq!(find_phrase("good morning", "go"), None);
        assert_eq!(find_phrase("let us go", "go"), Some(7));
        assert_eq!(find_phrase("a gopher can go", "go"), Some(13));
        assert_eq!(find_phrase("anything", ""), None);
    }

    #[test]
    fn test_contains_phrase_multiword() {
        assert!(contains_phrase("please stop dictating now", "stop dictating"));
        assert!(!contains_phrase("nonstop dictating", "stop dictating"));
        assert!(!contains_phrase("stop dictatingly", "stop dictating"));
    }
}
