//! Keyword tables and the canonical code vocabulary
//!
//! Every spoken phrase is normalized into an uppercase canonical code
//! (`LINE`, `UP`, `TO_START`, ...). The codes are the only thing the
//! classifier, the normalizer and the rule tables agree on, so they live
//! here as enums; the phrases that produce them are configurable.

use serde::Deserialize;
use std::collections::HashMap;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Cursor directions. `START`, `END`, `NEXT` and `PREVIOUS` are absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Start,
    End,
    Next,
    Previous,
}

impl Direction {
    /// Absolute directions name a destination, so a count never applies to them
    pub fn is_absolute(self) -> bool {
        matches!(
            self,
            Direction::Start | Direction::End | Direction::Next | Direction::Previous
        )
    }
}

/// Objects the editor itself knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EditorObject {
    Line,
    File,
    ViewPort,
    BlankLine,
    Tab,
    Definition,
    Page,
}

/// Python constructs that NEW and ADD can generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CodeObject {
    Class,
    Constant,
    Dictionary,
    Else,
    Elif,
    Float,
    Function,
    If,
    Import,
    Input,
    Integer,
    Key,
    List,
    Method,
    Print,
    String,
    Value,
    Variable,
    While,
    For,
    ForEach,
    Return,
    Tuple,
    Set,
    Range,
    Try,
    Except,
    Boolean,
    None,
    Type,
    Open,
    In,
    Parameter,
    Argument,
    Object,
}

/// Selection qualifiers, including the `FROM`/`TO` range delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Selector {
    All,
    More,
    Less,
    ToStart,
    ToEnd,
    From,
    To,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionQualifier {
    Show,
    Accept,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminalAction {
    New,
    Show,
    Hide,
    Clear,
    Kill,
    FocusNext,
    FocusPrevious,
    SelectAll,
    ScrollUp,
    ScrollDown,
}

/// Vocabulary categories that map phrases to canonical codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Directions,
    ObjectNouns,
    Selectors,
    SuggestionQualifiers,
    TerminalActions,
}

/// Phrase tables, one map per category
///
/// `Default` is empty; [`KeywordTables::builtin`] carries the English
/// vocabulary and configuration files extend it with [`KeywordTables::merge`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeywordTables {
    pub directions: HashMap<String, String>,
    pub object_nouns: HashMap<String, String>,
    pub selectors: HashMap<String, String>,
    pub suggestion_qualifiers: HashMap<String, String>,
    pub terminal_actions: HashMap<String, String>,
    pub number_words: HashMap<String, u64>,
    pub special_characters: HashMap<String, String>,
    pub command_triggers: HashMap<String, String>,
    pub parameterized_command_triggers: HashMap<String, String>,
    pub filler_words: Vec<String>,
}

fn insert_all(map: &mut HashMap<String, String>, phrases: &[&str], code: &str) {
    for phrase in phrases {
        map.insert(phrase.to_string(), code.to_string());
    }
}

impl KeywordTables {
    /// Built-in English vocabulary
    pub fn builtin() -> Self {
        let mut t = KeywordTables::default();

        let d = &mut t.directions;
        insert_all(d, &["up", "upwards"], "UP");
        insert_all(d, &["down", "downwards"], "DOWN");
        insert_all(d, &["left"], "LEFT");
        insert_all(d, &["right"], "RIGHT");
        insert_all(d, &["start", "beginning"], "START");
        insert_all(d, &["end"], "END");
        insert_all(d, &["next", "forward"], "NEXT");
        insert_all(d, &["previous", "back"], "PREVIOUS");

        let o = &mut t.object_nouns;
        insert_all(o, &["line", "lines", "row"], "LINE");
        insert_all(o, &["file", "document"], "FILE");
        insert_all(o, &["view port", "viewport", "screen"], "VIEW_PORT");
        insert_all(o, &["blank line", "blank lines", "empty line"], "BLANK_LINE");
        insert_all(o, &["tab", "tabs"], "TAB");
        insert_all(o, &["definition"], "DEFINITION");
        insert_all(o, &["page", "pages"], "PAGE");
        insert_all(o, &["class"], "CLASS");
        insert_all(o, &["constant"], "CONSTANT");
        insert_all(o, &["dictionary", "dict"], "DICTIONARY");
        insert_all(o, &["else"], "ELSE");
        insert_all(o, &["else if", "elif"], "ELIF");
        insert_all(o, &["float"], "FLOAT");
        insert_all(o, &["function"], "FUNCTION");
        insert_all(o, &["if"], "IF");
        insert_all(o, &["import"], "IMPORT");
        insert_all(o, &["input"], "INPUT");
        insert_all(o, &["integer"], "INTEGER");
        insert_all(o, &["key"], "KEY");
        insert_all(o, &["list"], "LIST");
        insert_all(o, &["method"], "METHOD");
        insert_all(o, &["print"], "PRINT");
        insert_all(o, &["string"], "STRING");
        insert_all(o, &["value"], "VALUE");
        insert_all(o, &["variable"], "VARIABLE");
        insert_all(o, &["while", "while loop"], "WHILE");
        insert_all(o, &["for", "for loop"], "FOR");
        insert_all(o, &["for each"], "FOR_EACH");
        insert_all(o, &["return"], "RETURN");
        insert_all(o, &["tuple"], "TUPLE");
        insert_all(o, &["set"], "SET");
        insert_all(o, &["range"], "RANGE");
        insert_all(o, &["try"], "TRY");
        insert_all(o, &["except"], "EXCEPT");
        insert_all(o, &["boolean"], "BOOLEAN");
        insert_all(o, &["none"], "NONE");
        insert_all(o, &["type"], "TYPE");
        insert_all(o, &["open"], "OPEN");
        insert_all(o, &["in"], "IN");
        insert_all(o, &["parameter"], "PARAMETER");
        insert_all(o, &["argument"], "ARGUMENT");
        insert_all(o, &["object"], "OBJECT");

        let s = &mut t.selectors;
        insert_all(s, &["all", "everything"], "ALL");
        insert_all(s, &["more", "grow"], "MORE");
        insert_all(s, &["less", "shrink"], "LESS");
        insert_all(s, &["to start", "to the start", "to beginning", "to the beginning"], "TO_START");
        insert_all(s, &["to end", "to the end"], "TO_END");
        insert_all(s, &["from"], "FROM");
        insert_all(s, &["to", "until"], "TO");

        let q = &mut t.suggestion_qualifiers;
        insert_all(q, &["show"], "SHOW");
        insert_all(q, &["accept", "take"], "ACCEPT");

        let a = &mut t.terminal_actions;
        insert_all(a, &["new"], "NEW");
        insert_all(a, &["show", "open"], "SHOW");
        insert_all(a, &["hide", "close"], "HIDE");
        insert_all(a, &["clear"], "CLEAR");
        insert_all(a, &["kill"], "KILL");
        insert_all(a, &["next"], "FOCUS_NEXT");
        insert_all(a, &["previous"], "FOCUS_PREVIOUS");
        insert_all(a, &["select all"], "SELECT_ALL");
        insert_all(a, &["scroll up"], "SCROLL_UP");
        insert_all(a, &["scroll down"], "SCROLL_DOWN");

        let units = [
            "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
            "ten", "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen",
            "seventeen", "eighteen", "nineteen",
        ];
        for (value, word) in units.iter().enumerate() {
            t.number_words.insert(word.to_string(), value as u64);
        }
        let tens = [
            "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
        ];
        for (i, word) in tens.iter().enumerate() {
            t.number_words.insert(word.to_string(), (i as u64 + 2) * 10);
        }

        let sc = &mut t.special_characters;
        for (phrase, replacement) in [
            ("plus", "+"),
            ("minus", "-"),
            ("times", "*"),
            ("asterisk", "*"),
            ("divided by", "/"),
            ("slash", "/"),
            ("backslash", "\\"),
            ("equals", "="),
            ("double equals", "=="),
            ("not equals", "!="),
            ("less than", "<"),
            ("greater than", ">"),
            ("percent", "%"),
            ("comma", ", "),
            ("period", ". "),
            ("dot", "."),
            ("colon", ":"),
            ("semicolon", ";"),
            ("question mark", "?"),
            ("exclamation mark", "!"),
            ("open paren", "("),
            ("close paren", ")"),
            ("open bracket", "["),
            ("close bracket", "]"),
            ("open brace", "{"),
            ("close brace", "}"),
            ("quote", "\""),
            ("single quote", "'"),
            ("underscore", "_"),
            ("hash", "#"),
            ("at sign", "@"),
            ("ampersand", "&"),
            ("pipe", "|"),
            ("tilde", "~"),
            ("caret", "^"),
            ("dollar sign", "$"),
            ("space", " "),
            ("new line", "\n"),
            ("tab key", "\t"),
        ] {
            sc.insert(phrase.to_string(), replacement.to_string());
        }

        let c = &mut t.command_triggers;
        insert_all(c, &["stop", "stop listening"], "STOP");
        insert_all(c, &["stop dictating", "end dictation"], "STOP_DICTATING");
        insert_all(c, &["dictate", "start dictating"], "DICTATE");
        insert_all(c, &["dictate plain", "plain dictation"], "DICTATE_WITHOUT_SPECIAL_CHARACTERS");
        insert_all(c, &["spell"], "SPELL");
        insert_all(c, &["spell uppercase", "spell capitals"], "SPELL_UPPERCASE");
        insert_all(c, &["save", "save file"], "SAVE_FILE");
        insert_all(c, &["save as", "save file as"], "SAVE_FILE_AS");
        insert_all(c, &["new file"], "NEW_FILE");
        insert_all(c, &["new window"], "NEW_WINDOW");
        insert_all(c, &["close tab"], "CLOSE_TAB");
        insert_all(c, &["close window"], "CLOSE_WINDOW");
        insert_all(c, &["open file"], "OPEN");
        insert_all(c, &["copy"], "COPY");
        insert_all(c, &["cut"], "CUT");
        insert_all(c, &["paste"], "PASTE");
        insert_all(c, &["undo"], "UNDO");
        insert_all(c, &["redo"], "REDO");
        insert_all(c, &["format", "format document"], "FORMAT");
        insert_all(c, &["breakpoint", "toggle breakpoint"], "BREAKPOINT");
        insert_all(c, &["settings", "open settings"], "SETTINGS");
        insert_all(c, &["delete"], "DELETE");

        let p = &mut t.parameterized_command_triggers;
        insert_all(p, &["go", "go to", "jump", "jump to", "move"], "GO");
        insert_all(p, &["select"], "SELECT");
        insert_all(p, &["new", "create"], "NEW");
        insert_all(p, &["add", "insert"], "ADD");
        insert_all(p, &["suggest", "suggestion", "suggestions"], "SUGGESTION");
        insert_all(p, &["terminal"], "TERMINAL");
        insert_all(p, &["snake case"], "SNAKE_CASE");
        insert_all(p, &["camel case"], "CAMEL_CASE");

        t.filler_words = ["to", "the", "of", "a", "an", "by", "called", "named"]
            .iter()
            .map(|w| w.to_string())
            .collect();

        t
    }

    /// Layer `other` on top of `self`; phrases present in both take `other`'s code
    pub fn merge(&mut self, other: KeywordTables) {
        self.directions.extend(other.directions);
        self.object_nouns.extend(other.object_nouns);
        self.selectors.extend(other.selectors);
        self.suggestion_qualifiers.extend(other.suggestion_qualifiers);
        self.terminal_actions.extend(other.terminal_actions);
        self.number_words.extend(other.number_words);
        self.special_characters.extend(other.special_characters);
        self.command_triggers.extend(other.command_triggers);
        self.parameterized_command_triggers
            .extend(other.parameterized_command_triggers);
        for word in other.filler_words {
            if !self.filler_words.contains(&word) {
                self.filler_words.push(word);
            }
        }
    }

    pub fn phrases(&self, category: Category) -> &HashMap<String, String> {
        match category {
            Category::Directions => &self.directions,
            Category::ObjectNouns => &self.object_nouns,
            Category::Selectors => &self.selectors,
            Category::SuggestionQualifiers => &self.suggestion_qualifiers,
            Category::TerminalActions => &self.terminal_actions,
        }
    }

    /// Whether `code` is a canonical code of `category`
    pub fn has_code(&self, category: Category, code: &str) -> bool {
        self.phrases(category).values().any(|c| c == code)
    }

    /// Phrases bound to a zero-argument command name (e.g. every phrase for `STOP`)
    pub fn triggers_for<'a>(&'a self, command: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.command_triggers
            .iter()
            .filter(move |(_, name)| name.as_str() == command)
            .map(|(phrase, _)| phrase.as_str())
    }
}
