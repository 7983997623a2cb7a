//! Argument normalization
//!
//! Raw argument text becomes a list of raw tokens: canonical codes, digit
//! strings and free-text fragments. Each command substitutes only the
//! vocabularies in its [`Profile`], so "for" stays a word for GO but becomes
//! `FOR` for NEW.

use crate::keywords::{Category, CodeObject, EditorObject, KeywordTables};
use crate::token::{self, Token};
use std::str::FromStr;

/// Which object nouns a profile substitutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectFilter {
    All,
    EditorOnly,
    CodeOnly,
}

/// Vocabularies a command's arguments are normalized against
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    pub categories: &'static [Category],
    pub objects: ObjectFilter,
}

impl Profile {
    pub const GO: Profile = Profile {
        categories: &[Category::Directions, Category::ObjectNouns],
        objects: ObjectFilter::EditorOnly,
    };
    pub const SELECT: Profile = Profile {
        categories: &[Category::Directions, Category::ObjectNouns, Category::Selectors],
        objects: ObjectFilter::EditorOnly,
    };
    pub const NEW: Profile = Profile {
        categories: &[Category::ObjectNouns],
        objects: ObjectFilter::CodeOnly,
    };
    pub const ADD: Profile = Profile {
        categories: &[Category::ObjectNouns],
        objects: ObjectFilter::All,
    };
    pub const SUGGESTION: Profile = Profile {
        categories: &[Category::SuggestionQualifiers],
        objects: ObjectFilter::All,
    };
    pub const TERMINAL: Profile = Profile {
        categories: &[Category::TerminalActions],
        objects: ObjectFilter::All,
    };

    fn admits(&self, category: Category, code: &str) -> bool {
        if category != Category::ObjectNouns {
            return true;
        }
        match self.objects {
            ObjectFilter::All => true,
            ObjectFilter::EditorOnly => EditorObject::from_str(code).is_ok(),
            ObjectFilter::CodeOnly => CodeObject::from_str(code).is_ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Piece {
    Code(String),
    Number(String),
    Special(String),
    Word(String),
}

#[derive(Debug, Clone)]
enum Replacement {
    Code(String),
    Number(u64),
    Special(String),
}

/// Phrase table flattened into word lists, longest phrase first
struct Phrases {
    entries: Vec<(Vec<String>, Replacement)>,
}

impl Phrases {
    fn new() -> Self {
        Phrases { entries: Vec::new() }
    }

    fn add(&mut self, phrase: &str, replacement: Replacement) {
        let words: Vec<String> = phrase.split_whitespace().map(str::to_lowercase).collect();
        if !words.is_empty() {
            self.entries.push((words, replacement));
        }
    }

    fn finish(mut self) -> Self {
        self.entries.sort_by(|(a, _), (b, _)| {
            b.len()
                .cmp(&a.len())
                .then_with(|| b.join(" ").len().cmp(&a.join(" ").len()))
        });
        self
    }

    /// Longest phrase starting at `words[at]`, with its word count
    fn longest_at(&self, words: &[String], at: usize) -> Option<(usize, &Replacement)> {
        self.entries.iter().find_map(|(phrase, replacement)| {
            let end = at + phrase.len();
            (end <= words.len() && words[at..end] == phrase[..]).then_some((phrase.len(), replacement))
        })
    }
}

const TRAILING_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

/// Strip trailing punctuation and collapse whitespace, keeping case
pub fn collapse_transcript(text: &str) -> String {
    text.trim()
        .trim_end_matches(TRAILING_PUNCTUATION)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase, strip trailing punctuation and collapse whitespace
pub fn normalize_transcript(text: &str) -> String {
    collapse_transcript(text).to_lowercase()
}

fn match_key(word: &str) -> String {
    word.to_lowercase().trim_end_matches(TRAILING_PUNCTUATION).to_string()
}

fn add_numbers(phrases: &mut Phrases, tables: &KeywordTables) {
    for (phrase, value) in &tables.number_words {
        phrases.add(phrase, Replacement::Number(*value));
    }
}

/// Scan words left to right, replacing the longest phrase at each position
fn substitute(text: &str, phrases: &Phrases) -> Vec<Piece> {
    let originals: Vec<&str> = text.split_whitespace().collect();
    let keys: Vec<String> = originals.iter().map(|w| match_key(w)).collect();
    let mut pieces = Vec::with_capacity(originals.len());
    let mut i = 0;
    while i < originals.len() {
        if let Some((len, replacement)) = phrases.longest_at(&keys, i) {
            pieces.push(match replacement {
                Replacement::Code(c) => Piece::Code(c.clone()),
                Replacement::Number(n) => Piece::Number(n.to_string()),
                Replacement::Special(s) => Piece::Special(s.clone()),
            });
            i += len;
            continue;
        }
        let key = &keys[i];
        if !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) {
            pieces.push(Piece::Number(key.clone()));
        } else {
            pieces.push(Piece::Word(originals[i].to_string()));
        }
        i += 1;
    }
    merge_numbers(pieces)
}

fn is_tens(digits: &str) -> bool {
    matches!(digits.parse::<u64>(), Ok(n) if (20..=90).contains(&n) && n % 10 == 0)
}

fn is_unit(digits: &str) -> bool {
    matches!(digits.parse::<u64>(), Ok(n) if (1..=9).contains(&n))
}

/// Adjacent numbers merge: tens + unit adds, anything else concatenates
fn merge_numbers(pieces: Vec<Piece>) -> Vec<Piece> {
    let mut merged: Vec<Piece> = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if let (Some(Piece::Number(prev)), Piece::Number(cur)) = (merged.last_mut(), &piece) {
            if is_tens(prev) && is_unit(cur) {
                *prev = format!("{}{}", &prev[..prev.len() - 1], cur);
            } else {
                prev.push_str(cur);
            }
            continue;
        }
        merged.push(piece);
    }
    merged
}

fn strip_fillers<'a>(words: &'a [String], fillers: &[String]) -> &'a [String] {
    let skip = words
        .iter()
        .take_while(|w| fillers.iter().any(|f| f.eq_ignore_ascii_case(w)))
        .count();
    &words[skip..]
}

/// Normalize raw argument text into raw token strings
pub fn normalize_arguments(raw: &str, profile: &Profile, tables: &KeywordTables) -> Vec<String> {
    let mut phrases = Phrases::new();
    for &category in profile.categories {
        for (phrase, code) in tables.phrases(category) {
            if profile.admits(category, code) {
                phrases.add(phrase, Replacement::Code(code.clone()));
            }
        }
    }
    add_numbers(&mut phrases, tables);
    let phrases = phrases.finish();

    let mut out = Vec::new();
    let mut fragment: Vec<String> = Vec::new();
    let flush = |fragment: &mut Vec<String>, out: &mut Vec<String>| {
        let kept = strip_fillers(fragment, &tables.filler_words);
        if !kept.is_empty() {
            out.push(kept.join(" "));
        }
        fragment.clear();
    };

    for piece in substitute(&normalize_transcript(raw), &phrases) {
        match piece {
            Piece::Word(w) => fragment.push(w),
            Piece::Code(s) | Piece::Number(s) | Piece::Special(s) => {
                flush(&mut fragment, &mut out);
                out.push(s);
            }
        }
    }
    flush(&mut fragment, &mut out);
    log::debug!("normalized {:?} -> {:?}", raw, out);
    out
}

/// Normalize and classify in one step
pub fn tokenize(raw: &str, profile: &Profile, tables: &KeywordTables) -> Vec<Token> {
    token::classify_all(&normalize_arguments(raw, profile, tables), tables)
}

/// Dictated text with spoken numbers and special characters rendered
///
/// A special character absorbs the whitespace around it; its replacement
/// carries any spacing it needs.
pub fn format_dictation(text: &str, tables: &KeywordTables) -> String {
    let mut phrases = Phrases::new();
    for (phrase, replacement) in &tables.special_characters {
        phrases.add(phrase, Replacement::Special(replacement.clone()));
    }
    add_numbers(&mut phrases, tables);
    let phrases = phrases.finish();

    let mut out = String::new();
    let mut glue = false;
    for piece in substitute(text, &phrases) {
        match piece {
            Piece::Special(s) => {
                out.push_str(&s);
                glue = true;
            }
            Piece::Word(s) | Piece::Number(s) | Piece::Code(s) => {
                if !out.is_empty() && !glue {
                    out.push(' ');
                }
                out.push_str(&s);
                glue = false;
            }
        }
    }
    collapse_spaces(&out)
}

fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == ' ' && out.ends_with(' ') {
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn tables() -> KeywordTables {
        KeywordTables::builtin()
    }

    #[test]
    fn test_normalize_transcript() {
        assert_eq!(normalize_transcript("  Go To Line Five. "), "go to line five");
        assert_eq!(normalize_transcript("Save!?"), "save");
        assert_eq!(collapse_transcript("  Snake  Case Hello World. "), "Snake Case Hello World");
    }

    #[test]
    fn test_go_arguments() {
        let t = tables();
        assert_eq!(
            normalize_arguments("line twenty three", &Profile::GO, &t),
            vec!["LINE", "23"]
        );
        assert_eq!(
            normalize_arguments("three lines up", &Profile::GO, &t),
            vec!["3", "LINE", "UP"]
        );
        assert_eq!(
            normalize_arguments("down 5", &Profile::GO, &t),
            vec!["DOWN", "5"]
        );
    }

    #[test]
    fn test_longest_phrase_wins() {
        let t = tables();
        assert_eq!(
            normalize_arguments("blank line down", &Profile::GO, &t),
            vec!["BLANK_LINE", "DOWN"]
        );
        assert_eq!(
            normalize_arguments("else if", &Profile::NEW, &t),
            vec!["ELIF"]
        );
    }

    #[test]
    fn test_profile_limits_substitution() {
        let t = tables();
        // "for" is a code object only for creation commands
        assert_eq!(
            normalize_arguments("down for three", &Profile::GO, &t),
            vec!["DOWN", "for", "3"]
        );
        assert_eq!(normalize_arguments("for", &Profile::NEW, &t), vec!["FOR"]);
        assert_eq!(normalize_arguments("line", &Profile::NEW, &t), vec!["line"]);
    }

    #[test]
    fn test_adjacent_numbers() {
        let t = tables();
        assert_eq!(normalize_arguments("two three", &Profile::GO, &t), vec!["23"]);
        assert_eq!(normalize_arguments("twenty 3", &Profile::GO, &t), vec!["23"]);
        assert_eq!(normalize_arguments("thirty", &Profile::GO, &t), vec!["30"]);
        assert_eq!(normalize_arguments("1 2 0", &Profile::GO, &t), vec!["120"]);
    }

    #[test]
    fn test_fragments_drop_leading_fillers() {
        let t = tables();
        assert_eq!(
            normalize_arguments("function called foo bar", &Profile::NEW, &t),
            vec!["FUNCTION", "foo bar"]
        );
        assert_eq!(
            normalize_arguments("a function named the thing", &Profile::NEW, &t),
            vec!["FUNCTION", "thing"]
        );
    }

    #[test]
    fn test_select_range_tokens() {
        let t = tables();
        let tokens = tokenize("from line 3 to line 5", &Profile::SELECT, &t);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenType::Selector,
                TokenType::ObjectNoun,
                TokenType::Number,
                TokenType::Selector,
                TokenType::ObjectNoun,
                TokenType::Number,
            ]
        );
    }

    #[test]
    fn test_format_dictation() {
        let t = tables();
        assert_eq!(format_dictation("two plus two", &t), "2+2");
        assert_eq!(format_dictation("hello comma world", &t), "hello, world");
        assert_eq!(
            format_dictation("print open paren x close paren", &t),
            "print(x)"
        );
        assert_eq!(format_dictation("Keep Case here", &t), "Keep Case here");
    }

    #[test]
    fn test_format_dictation_collapses_spaces() {
        let t = tables();
        assert_eq!(format_dictation("a comma space b", &t), "a, b");
    }
}
