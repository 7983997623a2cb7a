//! Editor primitives
//!
//! The interpretation engine only decides which primitive to call; the
//! [`Editor`] implementation performs it. Positions are 0-indexed.

use crate::keywords::{Direction, TerminalAction};
use crate::outcome::EditorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

/// Selection with an anchor and an active end; the cursor is the active end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub fn caret(at: Position) -> Self {
        Selection { anchor: at, active: at }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }

    pub fn start(&self) -> Position {
        self.anchor.min(self.active)
    }

    pub fn end(&self) -> Position {
        self.anchor.max(self.active)
    }
}

/// Cursor destinations named by an object boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    LineStart,
    LineEnd,
    LineFirstNonWhitespace,
    LineLastNonWhitespace,
    FileStart,
    FileEnd,
    ViewPortTop,
    ViewPortBottom,
    PreviousBlankLine,
    NextBlankLine,
}

/// Editor and workbench commands without a position argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    NavigateBack,
    NavigateForward,
    NextTab,
    PreviousTab,
    ScrollPageUp,
    ScrollPageDown,
    RevealDefinition,
    SelectAll,
    ExpandSelection,
    ShrinkSelection,
    SaveFile,
    SaveFileAs,
    NewFile,
    NewWindow,
    CloseTab,
    CloseWindow,
    OpenFile,
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    Format,
    ToggleBreakpoint,
    OpenSettings,
    /// Delete the selection, or the character after the cursor
    Delete,
    ShowSuggestions,
    AcceptSuggestion,
    Terminal(TerminalAction),
}

/// Primitive operations a resolved command may invoke
///
/// Every call reports `EditorError::NoActiveEditor` when nothing is focused.
pub trait Editor {
    fn line_count(&self) -> Result<usize, EditorError>;

    /// Text of a line without its terminator
    fn line_text(&self, line: usize) -> Result<String, EditorError>;

    fn selection(&self) -> Result<Selection, EditorError>;

    fn cursor(&self) -> Result<Position, EditorError> {
        Ok(self.selection()?.active)
    }

    /// Character immediately left of the cursor, `None` at the start of a line
    fn char_before_cursor(&self) -> Result<Option<char>, EditorError> {
        let at = self.cursor()?;
        if at.column == 0 {
            return Ok(None);
        }
        Ok(self.line_text(at.line)?.chars().nth(at.column - 1))
    }

    /// Place a caret at the start of a 0-indexed line; beyond the last line is `OutOfRange`
    fn move_cursor_to_line(&mut self, line: usize) -> Result<(), EditorError>;

    /// Relative move; `UP`/`DOWN` by line, `LEFT`/`RIGHT` by character
    fn move_cursor_by(&mut self, direction: Direction, count: usize) -> Result<(), EditorError>;

    fn move_cursor_to(&mut self, target: Target) -> Result<(), EditorError>;

    fn set_selection(&mut self, anchor: Position, active: Position) -> Result<(), EditorError>;

    /// Insert at the cursor, leaving the cursor after the text
    fn insert_text(&mut self, text: &str) -> Result<(), EditorError>;

    /// Replace the selection (or insert at an empty one)
    fn replace_selection(&mut self, text: &str) -> Result<(), EditorError>;

    fn run(&mut self, command: EditorCommand) -> Result<(), EditorError>;
}
