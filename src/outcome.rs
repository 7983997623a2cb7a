//! Result values shared by every layer of the engine
//!
//! Expected failures (bad arguments, no editor, a rejected edit) travel as
//! values, never as panics or `Err` control flow. Only process plumbing uses
//! `anyhow`.

use std::fmt;
use thiserror::Error;

/// Outcome of one dispatcher or resolver step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The requested action ran
    Success,
    /// No rule for the token combination, or a numeric target out of range
    InvalidArgument,
    /// An action needed an editor and none is focused
    NoActiveEditor,
    /// The editor rejected or failed the call
    ExecutionFailed,
    /// No trigger phrase matched (informational, not an error)
    NoCommandFound,
    /// A trigger matched but no handler exists for the command name
    FunctionNotFound,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }

    /// Outcomes surfaced to the user as errors rather than notices
    pub fn is_error(self) -> bool {
        !matches!(self, Outcome::Success | Outcome::NoCommandFound)
    }

    pub const ALL: [Outcome; 6] = [
        Outcome::Success,
        Outcome::InvalidArgument,
        Outcome::NoActiveEditor,
        Outcome::ExecutionFailed,
        Outcome::NoCommandFound,
        Outcome::FunctionNotFound,
    ];
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::InvalidArgument => write!(f, "invalid argument"),
            Outcome::NoActiveEditor => write!(f, "no active editor"),
            Outcome::ExecutionFailed => write!(f, "execution failed"),
            Outcome::NoCommandFound => write!(f, "no command found"),
            Outcome::FunctionNotFound => write!(f, "function not found"),
        }
    }
}

/// Error reported by an editor primitive
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("no active editor")]
    NoActiveEditor,
    #[error("target out of range: {0}")]
    OutOfRange(String),
    #[error("editor rejected the call: {0}")]
    Rejected(String),
}

impl From<EditorError> for Outcome {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::NoActiveEditor => Outcome::NoActiveEditor,
            EditorError::OutOfRange(_) => Outcome::InvalidArgument,
            EditorError::Rejected(_) => Outcome::ExecutionFailed,
        }
    }
}

/// Collapse an editor call into an outcome, logging the failure
pub fn from_editor<T>(result: Result<T, EditorError>) -> Outcome {
    match result {
        Ok(_) => Outcome::Success,
        Err(err) => {
            log::warn!("editor call failed: {}", err);
            err.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_error_mapping() {
        assert_eq!(
            Outcome::from(EditorError::NoActiveEditor),
            Outcome::NoActiveEditor
        );
        assert_eq!(
            Outcome::from(EditorError::OutOfRange("line 12".into())),
            Outcome::InvalidArgument
        );
        assert_eq!(
            Outcome::from(EditorError::Rejected("read-only".into())),
            Outcome::ExecutionFailed
        );
    }

    #[test]
    fn test_no_command_found_is_not_an_error() {
        assert!(!Outcome::NoCommandFound.is_error());
        assert!(!Outcome::Success.is_error());
        assert!(Outcome::FunctionNotFound.is_error());
        assert!(Outcome::InvalidArgument.is_error());
    }

    #[test]
    fn test_from_editor() {
        assert_eq!(from_editor(Ok::<(), EditorError>(())), Outcome::Success);
        assert_eq!(
            from_editor::<()>(Err(EditorError::NoActiveEditor)),
            Outcome::NoActiveEditor
        );
    }
}
