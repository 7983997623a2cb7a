//! Commands outside the rule tables: zero-argument editor commands, mode
//! switches, suggestions, the terminal and case conversion.

use super::{CommandName, CommandReply, code, create};
use crate::editor::{Editor, EditorCommand};
use crate::keywords::{SuggestionQualifier, TerminalAction};
use crate::outcome::{self, Outcome};
use crate::state::Transition;
use crate::token::{Token, TokenType};
use std::str::FromStr;

fn editor_command(name: CommandName) -> Option<EditorCommand> {
    let command = match name {
        CommandName::SaveFile => EditorCommand::SaveFile,
        CommandName::SaveFileAs => EditorCommand::SaveFileAs,
        CommandName::NewFile => EditorCommand::NewFile,
        CommandName::NewWindow => EditorCommand::NewWindow,
        CommandName::CloseTab => EditorCommand::CloseTab,
        CommandName::CloseWindow => EditorCommand::CloseWindow,
        CommandName::Open => EditorCommand::OpenFile,
        CommandName::Copy => EditorCommand::Copy,
        CommandName::Cut => EditorCommand::Cut,
        CommandName::Paste => EditorCommand::Paste,
        CommandName::Undo => EditorCommand::Undo,
        CommandName::Redo => EditorCommand::Redo,
        CommandName::Format => EditorCommand::Format,
        CommandName::Breakpoint => EditorCommand::ToggleBreakpoint,
        CommandName::Settings => EditorCommand::OpenSettings,
        CommandName::Delete => EditorCommand::Delete,
        _ => return None,
    };
    Some(command)
}

fn transition(name: CommandName) -> Option<Transition> {
    let transition = match name {
        CommandName::Dictate => Transition::Dictate { formatting: true },
        CommandName::DictateWithoutSpecialCharacters => Transition::Dictate { formatting: false },
        CommandName::Spell => Transition::Spell { uppercase: false },
        CommandName::SpellUppercase => Transition::Spell { uppercase: true },
        CommandName::StopDictating => Transition::StopDictating,
        CommandName::Stop => Transition::Stop,
        _ => return None,
    };
    Some(transition)
}

/// Commands that take no arguments
pub fn without_arguments(name: CommandName, editor: &mut dyn Editor) -> CommandReply {
    if let Some(transition) = transition(name) {
        return CommandReply::transition(transition);
    }
    match editor_command(name) {
        Some(command) => outcome::from_editor(editor.run(command)).into(),
        None => {
            log::error!("no handler for {}", name);
            Outcome::FunctionNotFound.into()
        }
    }
}

/// SUGGESTION: show by default, otherwise each qualifier in order
pub fn suggestion(tokens: &[Token], editor: &mut dyn Editor) -> Outcome {
    if tokens.is_empty() {
        return outcome::from_editor(editor.run(EditorCommand::ShowSuggestions));
    }
    for token in tokens {
        let command = match (token.kind, code::<SuggestionQualifier>(token)) {
            (TokenType::SuggestionQualifier, Some(SuggestionQualifier::Show)) => {
                EditorCommand::ShowSuggestions
            }
            (TokenType::SuggestionQualifier, Some(SuggestionQualifier::Accept)) => {
                EditorCommand::AcceptSuggestion
            }
            _ => {
                log::warn!("not a suggestion qualifier: {}", token);
                return Outcome::InvalidArgument;
            }
        };
        let outcome = outcome::from_editor(editor.run(command));
        if !outcome.is_success() {
            return outcome;
        }
    }
    Outcome::Success
}

/// TERMINAL: each action code in order
pub fn terminal(actions: &[String], editor: &mut dyn Editor) -> Outcome {
    if actions.is_empty() {
        log::warn!("TERMINAL needs an action");
        return Outcome::InvalidArgument;
    }
    for raw in actions {
        let Ok(action) = TerminalAction::from_str(raw) else {
            log::warn!("unknown terminal action: {}", raw);
            return Outcome::InvalidArgument;
        };
        let outcome = outcome::from_editor(editor.run(EditorCommand::Terminal(action)));
        if !outcome.is_success() {
            return outcome;
        }
    }
    Outcome::Success
}

/// SNAKE_CASE / CAMEL_CASE: insert the spoken words joined in that case
pub fn convert_case(name: CommandName, text: &str, editor: &mut dyn Editor) -> Outcome {
    if text.trim().is_empty() {
        log::warn!("{} needs words to convert", name);
        return Outcome::InvalidArgument;
    }
    let converted = match name {
        CommandName::SnakeCase => create::snake_case(text),
        CommandName::CamelCase => create::camel_case(text),
        _ => return Outcome::FunctionNotFound,
    };
    outcome::from_editor(editor.insert_text(&converted))
}
