//! User-visible result messages
//!
//! Reporting is fire-and-forget: a reporter cannot fail or slow the session
//! down. Diagnostics go through `log` instead.

use crate::dictation::Interpretation;
use crate::outcome::Outcome;
use crate::state::DictationState;

/// Something the user should hear about
#[derive(Debug, Clone, Copy)]
pub enum Report<'a> {
    Listening(&'a DictationState),
    Heard(&'a str),
    Interpreted { utterance: &'a str, result: &'a Interpretation },
    ModeChanged(&'a DictationState),
    SourceFailed(&'a anyhow::Error),
    Stopped,
}

pub trait Reporter {
    fn report(&mut self, report: Report<'_>);
}

/// One bracketed status line per report, like `[MODE] Dictate`
pub fn status_line(report: Report<'_>) -> Option<String> {
    let line = match report {
        Report::Listening(state) => format!("[LISTENING] mode: {}", state),
        Report::Heard(utterance) => format!("[HEARD] {}", utterance),
        Report::Interpreted { utterance, result } => match result.outcome {
            Outcome::Success => return None,
            Outcome::NoCommandFound => format!("[INFO] {}: {:?}", result.outcome, utterance),
            outcome => format!("[ERROR] {}: {:?}", outcome, utterance),
        },
        Report::ModeChanged(state) => format!("[MODE] {}", state),
        Report::SourceFailed(err) => format!("[ERROR] transcription failed: {:#}", err),
        Report::Stopped => "[STOPPED]".to_string(),
    };
    Some(line)
}

/// Writes status lines to stderr
#[derive(Debug, Default)]
pub struct StderrReporter {
    /// Echo every utterance as it is heard
    pub echo: bool,
}

impl Reporter for StderrReporter {
    fn report(&mut self, report: Report<'_>) {
        if matches!(report, Report::Heard(_)) && !self.echo {
            return;
        }
        if let Some(line) = status_line(report) {
            eprintln!("{}", line);
        }
    }
}

/// Keeps status lines in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub lines: Vec<String>,
}

impl Reporter for RecordingReporter {
    fn report(&mut self, report: Report<'_>) {
        self.lines.extend(status_line(report));
    }
}
