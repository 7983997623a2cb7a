//! Command dispatcher
//!
//! Maps a transcript to a command name in two tiers: the whole transcript
//! against the exact trigger table, then the longest parameterized trigger
//! found anywhere in it on word boundaries. Whatever follows that trigger is
//! the argument text.

use crate::commands::{self, CommandName, CommandReply};
use crate::editor::Editor;
use crate::fuzzy;
use crate::keywords::KeywordTables;
use crate::normalize;
use crate::outcome::Outcome;
use crate::token::Token;
use std::fmt;
use std::str::FromStr;

/// A trigger found in a transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub trigger: String,
    /// Command name as written in the trigger table
    pub command: String,
    /// Text after the trigger, trimmed
    pub arguments: String,
    pub exact: bool,
}

/// Find the command a transcript refers to
pub fn lookup(transcript: &str, tables: &KeywordTables) -> Option<Match> {
    let spoken = normalize::collapse_transcript(transcript);
    let text = spoken.to_lowercase();
    if text.is_empty() {
        return None;
    }

    if let Some(command) = tables.command_triggers.get(&text) {
        return Some(Match {
            trigger: text.clone(),
            command: command.clone(),
            arguments: String::new(),
            exact: true,
        });
    }

    // longest trigger wins; ties go to the earliest occurrence, then by phrase
    let (trigger, command, at) = tables
        .parameterized_command_triggers
        .iter()
        .filter_map(|(phrase, command)| {
            fuzzy::find_phrase(&text, phrase).map(|at| (phrase, command, at))
        })
        .max_by(|a, b| {
            a.0.chars()
                .count()
                .cmp(&b.0.chars().count())
                .then(b.2.cmp(&a.2))
                .then(b.0.cmp(a.0))
        })?;

    Some(Match {
        trigger: trigger.clone(),
        command: command.clone(),
        arguments: argument_text(&spoken, &text, at + trigger.len()),
        exact: false,
    })
}

/// Text after byte `end` of the lowercased transcript, in its spoken case
///
/// Falls back to the lowercased text when lowercasing moved byte offsets.
fn argument_text(spoken: &str, lowered: &str, end: usize) -> String {
    let rest = if spoken.len() == lowered.len() {
        spoken.get(end..)
    } else {
        None
    };
    rest.unwrap_or(&lowered[end..]).trim().to_string()
}

/// Look up and run the command for one transcript
pub fn dispatch(transcript: &str, tables: &KeywordTables, editor: &mut dyn Editor) -> CommandReply {
    let Some(found) = lookup(transcript, tables) else {
        log::info!("no command in {:?}", transcript);
        return Outcome::NoCommandFound.into();
    };
    log::debug!(
        "trigger {:?} -> {} (args {:?})",
        found.trigger,
        found.command,
        found.arguments
    );
    let Ok(name) = CommandName::from_str(&found.command) else {
        log::error!("trigger {:?} maps to unknown command {}", found.trigger, found.command);
        return Outcome::FunctionNotFound.into();
    };
    commands::execute(name, &found.arguments, tables, editor)
}

/// What the dispatcher would do with a transcript, without running it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub transcript: String,
    pub found: Option<Match>,
    pub command: Option<CommandName>,
    pub tokens: Vec<Token>,
}

pub fn explain(transcript: &str, tables: &KeywordTables) -> Explanation {
    let found = lookup(transcript, tables);
    let command = found
        .as_ref()
        .and_then(|m| CommandName::from_str(&m.command).ok());
    let tokens = match (&found, command) {
        (Some(m), Some(name)) => commands::arguments(name, &m.arguments, tables),
        _ => Vec::new(),
    };
    Explanation {
        transcript: normalize::normalize_transcript(transcript),
        found,
        command,
        tokens,
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "transcript: {:?}", self.transcript)?;
        let Some(found) = &self.found else {
            return writeln!(f, "command:    none ({})", Outcome::NoCommandFound);
        };
        let tier = if found.exact { "exact" } else { "parameterized" };
        writeln!(f, "trigger:    {:?} ({})", found.trigger, tier)?;
        match self.command {
            Some(name) => writeln!(f, "command:    {} ({:?})", name, name.grammar())?,
            None => writeln!(f, "command:    {} ({})", found.command, Outcome::FunctionNotFound)?,
        }
        writeln!(f, "arguments:  {:?}", found.arguments)?;
        if !self.tokens.is_empty() {
            let tokens: Vec<String> = self.tokens.iter().map(|t| t.to_string()).collect();
            writeln!(f, "tokens:     {}", tokens.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::editor::Editor;
    use crate::token::TokenType;

    fn tables(exact: &[(&str, &str)], parameterized: &[(&str, &str)]) -> KeywordTables {
        let mut t = KeywordTables::default();
        for (phrase, name) in exact {
            t.command_triggers.insert(phrase.to_string(), name.to_string());
        }
        for (phrase, name) in parameterized {
            t.parameterized_command_triggers.insert(phrase.to_string(), name.to_string());
        }
        t
    }

    #[test]
    fn test_longest_trigger_wins() {
        let t = tables(&[], &[("new", "CMD_A"), ("new function", "CMD_B")]);
        let found = lookup("create a new function called foo", &t).unwrap();
        assert_eq!(found.command, "CMD_B");
        assert_eq!(found.arguments, "called foo");
        assert!(!found.exact);
    }

    #[test]
    fn test_exact_table_first() {
        let t = tables(&[("new file", "NEW_FILE")], &[("new", "NEW")]);
        let found = lookup("New file.", &t).unwrap();
        assert_eq!(found.command, "NEW_FILE");
        assert!(found.exact);
        assert_eq!(lookup("new file please", &t).unwrap().command, "NEW");
    }

    #[test]
    fn test_triggers_match_whole_words() {
        let t = tables(&[], &[("go", "GO")]);
        assert!(lookup("good morning", &t).is_none());
        assert_eq!(lookup("please go up", &t).unwrap().arguments, "up");
    }

    #[test]
    fn test_arguments_keep_their_case() {
        let t = tables(&[], &[("go", "GO"), ("snake case", "SNAKE_CASE")]);
        assert_eq!(lookup("Please GO Up.", &t).unwrap().arguments, "Up");
        let found = lookup("Snake  Case Hello World", &t).unwrap();
        assert_eq!(found.trigger, "snake case");
        assert_eq!(found.arguments, "Hello World");
        // lowercasing "İ" grows it, so offsets fall back to the lowered text
        assert_eq!(lookup("go İstanbul", &t).unwrap().arguments, "i\u{307}stanbul");
    }

    #[test]
    fn test_huge_counts_do_not_panic() {
        let t = KeywordTables::builtin();
        let mut b = Buffer::from_text("abc\ndef");
        assert_eq!(dispatch("go down 18446744073709551615", &t, &mut b).outcome, Outcome::Success);
        assert_eq!(b.cursor().unwrap().line, 1);
        assert_eq!(dispatch("go right 300000000", &t, &mut b).outcome, Outcome::Success);
        assert_eq!(b.cursor().unwrap(), crate::editor::Position::new(1, 3));
    }

    #[test]
    fn test_no_command_found() {
        let t = KeywordTables::builtin();
        let mut b = Buffer::from_text("abc");
        assert_eq!(dispatch("the weather is nice", &t, &mut b).outcome, Outcome::NoCommandFound);
        assert_eq!(dispatch("", &t, &mut b).outcome, Outcome::NoCommandFound);
        assert_eq!(b.text(), "abc");
    }

    #[test]
    fn test_unknown_command_name() {
        let t = tables(&[("frobnicate", "FROBNICATE")], &[]);
        let mut b = Buffer::default();
        assert_eq!(dispatch("frobnicate", &t, &mut b).outcome, Outcome::FunctionNotFound);
    }

    #[test]
    fn test_dispatch_go() {
        let t = KeywordTables::builtin();
        let mut b = Buffer::from_text("one\ntwo\nthree\nfour");
        assert_eq!(dispatch("Go to line four.", &t, &mut b).outcome, Outcome::Success);
        assert_eq!(b.cursor().unwrap().line, 3);
        assert_eq!(dispatch("go to line forty", &t, &mut b).outcome, Outcome::InvalidArgument);
        assert_eq!(b.cursor().unwrap().line, 3);
    }

    #[test]
    fn test_dispatch_mode_command() {
        let t = KeywordTables::builtin();
        let mut b = Buffer::default();
        let reply = dispatch("dictate", &t, &mut b);
        assert_eq!(reply.outcome, Outcome::Success);
        assert!(reply.transition.is_some());
    }

    #[test]
    fn test_explain() {
        let t = KeywordTables::builtin();
        let e = explain("go three lines up", &t);
        assert_eq!(e.command, Some(CommandName::Go));
        assert_eq!(
            e.tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenType::Number, TokenType::ObjectNoun, TokenType::Direction]
        );
        let rendered = e.to_string();
        assert!(rendered.contains("GO"));
        assert!(rendered.contains("Number(3)"));

        let e = explain("hello there", &t);
        assert!(e.found.is_none());
        assert!(e.to_string().contains("no command found"));
    }
}
