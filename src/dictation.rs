//! Per-utterance interpretation under the current mode
//!
//! In command mode the dispatcher decides, and STOP or STOP_DICTATING must be
//! the whole utterance. While dictating or spelling, a stop phrase anywhere in
//! the utterance wins, so "stop" is never inserted as text. Otherwise
//! dictation is formatted and inserted, and spelling inserts initial letters.

use crate::commands::CommandName;
use crate::dispatch;
use crate::editor::Editor;
use crate::fuzzy;
use crate::keywords::KeywordTables;
use crate::normalize;
use crate::outcome::{self, Outcome};
use crate::state::{DictationState, Mode, Transition};

/// Result of interpreting one utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interpretation {
    /// Mode the utterance was interpreted in
    pub mode: Mode,
    pub outcome: Outcome,
    /// The session should end
    pub stop: bool,
}

/// Stop phrase contained in `utterance`, `STOP_DICTATING` before `STOP`
pub fn stop_transition(utterance: &str, tables: &KeywordTables, fuzzy_stop: bool) -> Option<Transition> {
    let text = fuzzy::clean_for_matching(utterance);
    if text.is_empty() {
        return None;
    }
    let candidates = [
        (CommandName::StopDictating, Transition::StopDictating),
        (CommandName::Stop, Transition::Stop),
    ];
    for (name, transition) in candidates {
        let code = name.to_string();
        let heard = tables.triggers_for(&code).any(|phrase| {
            let phrase = fuzzy::clean_for_matching(phrase);
            fuzzy::contains_phrase(&text, &phrase)
                || (fuzzy_stop && fuzzy::fuzzy_match(&phrase, &text))
        });
        if heard {
            return Some(transition);
        }
    }
    None
}

/// Initial letter of each word
pub fn spell(text: &str, uppercase: bool) -> String {
    let letters: String = text
        .split_whitespace()
        .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
        .collect();
    if uppercase {
        letters.to_uppercase()
    } else {
        letters.to_lowercase()
    }
}

/// Interpret one utterance and apply any mode change it requests
#[hotpath::measure]
pub fn interpret(
    utterance: &str,
    state: &mut DictationState,
    tables: &KeywordTables,
    fuzzy_stop: bool,
    editor: &mut dyn Editor,
) -> Interpretation {
    let mode = state.mode;
    let finish = |state: &mut DictationState, outcome: Outcome, transition: Option<Transition>| {
        let stop = transition.is_some_and(|t| state.apply(t));
        Interpretation { mode, outcome, stop }
    };

    if mode != Mode::Command {
        if let Some(transition) = stop_transition(utterance, tables, fuzzy_stop) {
            log::debug!("stop phrase in {:?}", utterance);
            return finish(state, Outcome::Success, Some(transition));
        }
    }

    let text = utterance.trim();
    if text.is_empty() {
        return finish(state, Outcome::NoCommandFound, None);
    }

    match mode {
        Mode::Command => {
            let reply = dispatch::dispatch(text, tables, editor);
            finish(state, reply.outcome, reply.transition)
        }
        Mode::Dictate => {
            let content = if state.formatting_enabled {
                normalize::format_dictation(text, tables)
            } else {
                text.to_string()
            };
            log::debug!("dictating {:?}", content);
            let outcome = outcome::from_editor(editor.replace_selection(&content));
            finish(state, outcome, None)
        }
        Mode::Spell => {
            let letters = spell(text, state.spelling_uppercase);
            if letters.is_empty() {
                return finish(state, Outcome::InvalidArgument, None);
            }
            log::debug!("spelling {:?}", letters);
            let outcome = outcome::from_editor(editor.replace_selection(&letters));
            finish(state, outcome, None)
        }
    }
}
