//! Interpretation state carried across utterances
//!
//! `DictationState` is owned by the loop driver and only changes between
//! utterances. `StopSignal` is the one piece shared with other threads
//! (the Ctrl-C handler).

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// How an utterance is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Utterances are commands (default)
    Command,
    /// Utterances are inserted as text
    Dictate,
    /// Utterances are reduced to initial letters
    Spell,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Command => write!(f, "Command"),
            Mode::Dictate => write!(f, "Dictate"),
            Mode::Spell => write!(f, "Spell"),
        }
    }
}

/// Mode change requested by a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Dictate { formatting: bool },
    Spell { uppercase: bool },
    /// Back to command mode, keep listening
    StopDictating,
    /// Back to command mode and end the session
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictationState {
    pub mode: Mode,
    /// Numbers and special characters are rendered while dictating
    pub formatting_enabled: bool,
    pub spelling_uppercase: bool,
}

impl Default for DictationState {
    fn default() -> Self {
        DictationState {
            mode: Mode::Command,
            formatting_enabled: true,
            spelling_uppercase: false,
        }
    }
}

impl DictationState {
    /// Apply a transition; returns true when the session should end
    pub fn apply(&mut self, transition: Transition) -> bool {
        let before = *self;
        let stop = match transition {
            Transition::Dictate { formatting } => {
                *self = DictationState { mode: Mode::Dictate, formatting_enabled: formatting, ..Default::default() };
                false
            }
            Transition::Spell { uppercase } => {
                *self = DictationState { mode: Mode::Spell, spelling_uppercase: uppercase, ..Default::default() };
                false
            }
            Transition::StopDictating => {
                *self = DictationState::default();
                false
            }
            Transition::Stop => {
                *self = DictationState::default();
                true
            }
        };
        if before != *self {
            log::info!("mode {} -> {}", before, self);
        }
        stop
    }
}

impl fmt::Display for DictationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Mode::Command => write!(f, "Command"),
            Mode::Dictate if self.formatting_enabled => write!(f, "Dictate"),
            Mode::Dictate => write!(f, "Dictate (plain)"),
            Mode::Spell if self.spelling_uppercase => write!(f, "Spell (uppercase)"),
            Mode::Spell => write!(f, "Spell"),
        }
    }
}

/// Cooperative cancellation flag, checked between utterances
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// The raw flag, for handlers that only take an `Arc<AtomicBool>`
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let s = DictationState::default();
        assert_eq!(s.mode, Mode::Command);
        assert!(s.formatting_enabled);
        assert!(!s.spelling_uppercase);
    }

    #[test]
    fn test_transitions() {
        let mut s = DictationState::default();
        assert!(!s.apply(Transition::Dictate { formatting: false }));
        assert_eq!(s.mode, Mode::Dictate);
        assert!(!s.formatting_enabled);

        assert!(!s.apply(Transition::Spell { uppercase: true }));
        assert_eq!(s.mode, Mode::Spell);
        assert!(s.spelling_uppercase);
        assert!(s.formatting_enabled);

        assert!(!s.apply(Transition::StopDictating));
        assert_eq!(s, DictationState::default());

        s.apply(Transition::Dictate { formatting: true });
        assert!(s.apply(Transition::Stop));
        assert_eq!(s, DictationState::default());
    }

    #[test]
    fn test_display() {
        let mut s = DictationState::default();
        assert_eq!(s.to_string(), "Command");
        s.apply(Transition::Spell { uppercase: true });
        assert_eq!(s.to_string(), "Spell (uppercase)");
    }

    #[test]
    fn test_stop_signal_is_shared() {
        let signal = StopSignal::new();
        let handle = signal.clone();
        assert!(!signal.is_stopped());
        handle.stop();
        assert!(signal.is_stopped());
        assert!(signal.flag().load(Ordering::SeqCst));
    }
}
