//! Command handlers
//!
//! Every command name a trigger phrase can map to, and how its arguments are
//! built: none, free text, a token sequence for a rule table, or a
//! specialized lookup.

pub mod create;
pub mod go;
pub mod misc;
pub mod select;

use crate::editor::Editor;
use crate::grammar::Step;
use crate::keywords::KeywordTables;
use crate::normalize::{self, Profile};
use crate::outcome::Outcome;
use crate::state::Transition;
use crate::token::Token;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandName {
    Go,
    Select,
    New,
    Add,
    Suggestion,
    Terminal,
    SnakeCase,
    CamelCase,
    SaveFile,
    SaveFileAs,
    NewFile,
    NewWindow,
    CloseTab,
    CloseWindow,
    Open,
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    Format,
    Breakpoint,
    Settings,
    Delete,
    Dictate,
    DictateWithoutSpecialCharacters,
    Spell,
    SpellUppercase,
    Stop,
    StopDictating,
}

/// How a command's argument text is interpreted
#[derive(Debug, Clone, Copy)]
pub enum ArgumentGrammar {
    None,
    FreeText,
    TokenSequence(Profile),
    SpecializedLookup(Profile),
}

impl CommandName {
    pub fn grammar(self) -> ArgumentGrammar {
        use CommandName::*;
        match self {
            Go => ArgumentGrammar::TokenSequence(Profile::GO),
            Select => ArgumentGrammar::TokenSequence(Profile::SELECT),
            New => ArgumentGrammar::TokenSequence(Profile::NEW),
            Add => ArgumentGrammar::TokenSequence(Profile::ADD),
            Suggestion => ArgumentGrammar::SpecializedLookup(Profile::SUGGESTION),
            Terminal => ArgumentGrammar::SpecializedLookup(Profile::TERMINAL),
            SnakeCase | CamelCase => ArgumentGrammar::FreeText,
            _ => ArgumentGrammar::None,
        }
    }
}

/// What a command produced: an outcome and possibly a mode change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandReply {
    pub outcome: Outcome,
    pub transition: Option<Transition>,
}

impl From<Outcome> for CommandReply {
    fn from(outcome: Outcome) -> Self {
        CommandReply { outcome, transition: None }
    }
}

impl CommandReply {
    pub fn transition(transition: Transition) -> Self {
        CommandReply { outcome: Outcome::Success, transition: Some(transition) }
    }
}

/// Typed argument tokens for a token-sequence or lookup command
pub fn arguments(name: CommandName, raw: &str, tables: &KeywordTables) -> Vec<Token> {
    match name.grammar() {
        ArgumentGrammar::TokenSequence(profile) | ArgumentGrammar::SpecializedLookup(profile) => {
            normalize::tokenize(raw, &profile, tables)
        }
        ArgumentGrammar::None | ArgumentGrammar::FreeText => Vec::new(),
    }
}

/// Run `name` with the raw argument text that followed its trigger
pub fn execute(
    name: CommandName,
    raw: &str,
    tables: &KeywordTables,
    editor: &mut dyn Editor,
) -> CommandReply {
    let raw = raw.trim();
    match name.grammar() {
        ArgumentGrammar::None => {
            if !raw.is_empty() {
                log::warn!("{} takes no arguments, got {:?}", name, raw);
                return Outcome::InvalidArgument.into();
            }
            misc::without_arguments(name, editor)
        }
        ArgumentGrammar::FreeText => misc::convert_case(name, raw, editor).into(),
        ArgumentGrammar::TokenSequence(profile) => {
            let tokens = normalize::tokenize(raw, &profile, tables);
            log::debug!("{} tokens: {:?}", name, tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>());
            let outcome = match name {
                CommandName::Go => go::run(&tokens, editor),
                CommandName::Select => select::run(&tokens, editor),
                CommandName::New => create::run_new(&tokens, editor),
                CommandName::Add => create::run_add(&tokens, editor),
                _ => Outcome::FunctionNotFound,
            };
            outcome.into()
        }
        ArgumentGrammar::SpecializedLookup(profile) => {
            let outcome = match name {
                CommandName::Suggestion => {
                    misc::suggestion(&normalize::tokenize(raw, &profile, tables), editor)
                }
                CommandName::Terminal => {
                    misc::terminal(&normalize::normalize_arguments(raw, &profile, tables), editor)
                }
                _ => Outcome::FunctionNotFound,
            };
            outcome.into()
        }
    }
}

/// Parse a token's canonical code into one of the code enums
pub(crate) fn code<T: FromStr>(token: &Token) -> Option<T> {
    token.as_code().and_then(|c| T::from_str(c).ok())
}

/// Shared failure for a combination whose values have no action
pub(crate) fn invalid(tokens: &[&Token]) -> Step {
    log::warn!(
        "invalid arguments: {}",
        tokens.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" ")
    );
    Step::Failed(Outcome::InvalidArgument)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_name_parses_from_its_code() {
        for name in CommandName::iter() {
            assert_eq!(CommandName::from_str(&name.to_string()), Ok(name));
        }
        assert_eq!(
            CommandName::from_str("DICTATE_WITHOUT_SPECIAL_CHARACTERS"),
            Ok(CommandName::DictateWithoutSpecialCharacters)
        );
    }

    #[test]
    fn test_builtin_triggers_name_real_commands() {
        let t = KeywordTables::builtin();
        for name in t.command_triggers.values().chain(t.parameterized_command_triggers.values()) {
            assert!(CommandName::from_str(name).is_ok(), "unknown command {}", name);
        }
    }

    #[test]
    fn test_zero_argument_command_rejects_arguments() {
        let t = KeywordTables::builtin();
        let mut b = Buffer::default();
        assert_eq!(
            execute(CommandName::Undo, "twice", &t, &mut b).outcome,
            Outcome::InvalidArgument
        );
        assert_eq!(execute(CommandName::Undo, "", &t, &mut b).outcome, Outcome::Success);
    }

    #[test]
    fn test_execute_go_from_raw_text() {
        let t = KeywordTables::builtin();
        let mut b = Buffer::from_text("a\nb\nc");
        let reply = execute(CommandName::Go, "line three", &t, &mut b);
        assert_eq!(reply, CommandReply::from(Outcome::Success));
        assert_eq!(b.text(), "a\nb\nc");
        assert_eq!(crate::editor::Editor::cursor(&b).unwrap().line, 2);
    }

    #[test]
    fn test_arguments_for_explain() {
        let t = KeywordTables::builtin();
        let tokens = arguments(CommandName::New, "function called parse header", &t);
        assert_eq!(tokens, vec![Token::code("FUNCTION", crate::token::TokenType::ObjectNoun), Token::text("parse header")]);
        assert!(arguments(CommandName::Copy, "anything", &t).is_empty());
    }
}
