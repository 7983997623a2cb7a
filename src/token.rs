//! Token classification
//!
//! A normalized argument string becomes a sequence of typed tokens. Number
//! detection wins over everything; canonical codes are looked up by category
//! in a fixed priority order so that a code shared by two categories always
//! lands in the same one.

use crate::keywords::{Category, KeywordTables};
use std::fmt;

/// Token categories, in the order the resolver reports them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenType {
    Number,
    Direction,
    ObjectNoun,
    Selector,
    SuggestionQualifier,
    Unclassified,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenType::Number => "Number",
            TokenType::Direction => "Direction",
            TokenType::ObjectNoun => "ObjectNoun",
            TokenType::Selector => "Selector",
            TokenType::SuggestionQualifier => "SuggestionQualifier",
            TokenType::Unclassified => "Unclassified",
        };
        write!(f, "{}", name)
    }
}

/// Category lookup order for non-numeric tokens
const PRIORITY: [(Category, TokenType); 4] = [
    (Category::Directions, TokenType::Direction),
    (Category::ObjectNouns, TokenType::ObjectNoun),
    (Category::Selectors, TokenType::Selector),
    (Category::SuggestionQualifiers, TokenType::SuggestionQualifier),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Number(usize),
    /// A canonical code such as `LINE` or `TO_START`
    Code(String),
    /// Free text (a name, a literal)
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: Value,
    pub kind: TokenType,
}

impl Token {
    pub fn number(n: usize) -> Self {
        Token { value: Value::Number(n), kind: TokenType::Number }
    }

    pub fn code(code: &str, kind: TokenType) -> Self {
        Token { value: Value::Code(code.to_string()), kind }
    }

    pub fn text(text: &str) -> Self {
        Token { value: Value::Text(text.to_string()), kind: TokenType::Unclassified }
    }

    pub fn as_number(&self) -> Option<usize> {
        match self.value {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    /// The canonical code, or `None` for numbers and free text
    pub fn as_code(&self) -> Option<&str> {
        match &self.value {
            Value::Code(c) => Some(c),
            _ => None,
        }
    }

    /// The token's text, whatever its kind
    pub fn text_value(&self) -> String {
        match &self.value {
            Value::Number(n) => n.to_string(),
            Value::Code(c) | Value::Text(c) => c.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.text_value())
    }
}

/// Classify one raw token
pub fn classify(raw: &str, tables: &KeywordTables) -> Token {
    if !raw.is_empty() && raw.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(n) = raw.parse::<usize>() {
            return Token::number(n);
        }
    }
    for (category, kind) in PRIORITY {
        if tables.has_code(category, raw) {
            return Token::code(raw, kind);
        }
    }
    Token::text(raw)
}

/// Classify a normalized token sequence
pub fn classify_all<S: AsRef<str>>(raws: &[S], tables: &KeywordTables) -> Vec<Token> {
    raws.iter().map(|r| classify(r.as_ref(), tables)).collect()
}

/// Render a type combination as `Number·ObjectNoun·Direction`
pub fn combination_key(kinds: &[TokenType]) -> String {
    kinds
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join("·")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_detection() {
        let t = KeywordTables::builtin();
        assert_eq!(classify("42", &t), Token::number(42));
        assert_eq!(classify("0", &t).kind, TokenType::Number);
        assert_eq!(classify("4a", &t).kind, TokenType::Unclassified);
    }

    #[test]
    fn test_code_categories() {
        let t = KeywordTables::builtin();
        assert_eq!(classify("UP", &t).kind, TokenType::Direction);
        assert_eq!(classify("LINE", &t).kind, TokenType::ObjectNoun);
        assert_eq!(classify("FUNCTION", &t).kind, TokenType::ObjectNoun);
        assert_eq!(classify("TO_START", &t).kind, TokenType::Selector);
        assert_eq!(classify("ACCEPT", &t).kind, TokenType::SuggestionQualifier);
        assert_eq!(classify("foo", &t).kind, TokenType::Unclassified);
    }

    #[test]
    fn test_shared_code_takes_first_category_in_priority() {
        let mut t = KeywordTables::builtin();
        t.selectors.insert("whole line".into(), "LINE".into());
        assert_eq!(classify("LINE", &t).kind, TokenType::ObjectNoun);
        t.suggestion_qualifiers.insert("more".into(), "MORE".into());
        assert_eq!(classify("MORE", &t).kind, TokenType::Selector);
    }

    #[test]
    fn test_lowercase_words_are_not_codes() {
        let t = KeywordTables::builtin();
        assert_eq!(classify("line", &t).kind, TokenType::Unclassified);
    }

    #[test]
    fn test_combination_key() {
        assert_eq!(
            combination_key(&[TokenType::Number, TokenType::ObjectNoun, TokenType::Direction]),
            "Number·ObjectNoun·Direction"
        );
    }
}
