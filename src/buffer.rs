//! In-memory text buffer implementing [`Editor`]
//!
//! Backs the CLI and the tests. Workbench-level commands that have no text
//! effect (tabs, windows, terminal) are recorded in [`Buffer::history`].

use crate::editor::{Editor, EditorCommand, Position, Selection, Target};
use crate::keywords::Direction;
use crate::outcome::EditorError;
use std::path::PathBuf;

const DEFAULT_VIEWPORT_HEIGHT: usize = 30;

#[derive(Debug, Clone)]
struct Snapshot {
    lines: Vec<String>,
    selection: Selection,
}

#[derive(Debug, Clone)]
pub struct Buffer {
    lines: Vec<String>,
    selection: Selection,
    focused: bool,
    path: Option<PathBuf>,
    clipboard: String,
    viewport_top: usize,
    viewport_height: usize,
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    history: Vec<EditorCommand>,
}

impl Default for Buffer {
    fn default() -> Self {
        Buffer::from_text("")
    }
}

/// Byte offset of the `column`th char, clamped to the end
fn byte_at(line: &str, column: usize) -> usize {
    line.char_indices().nth(column).map_or(line.len(), |(i, _)| i)
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

impl Buffer {
    pub fn from_text(text: &str) -> Self {
        let lines = text.split('\n').map(str::to_string).collect();
        Buffer {
            lines,
            selection: Selection::default(),
            focused: true,
            path: None,
            clipboard: String::new(),
            viewport_top: 0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            undo: Vec::new(),
            redo: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Bind a file path that `SaveFile` writes to
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// A buffer reporting that no editor is focused
    pub fn unfocused() -> Self {
        let mut buffer = Buffer::default();
        buffer.focused = false;
        buffer
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn history(&self) -> &[EditorCommand] {
        &self.history
    }

    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    /// Text covered by the current selection
    pub fn selected_text(&self) -> String {
        self.text_in(self.selection.start(), self.selection.end())
    }

    fn active(&self) -> Result<(), EditorError> {
        if self.focused {
            Ok(())
        } else {
            Err(EditorError::NoActiveEditor)
        }
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, |l| char_len(l))
    }

    fn last_line(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    fn end_of_file(&self) -> Position {
        let last = self.last_line();
        Position::new(last, self.line_len(last))
    }

    fn place_caret(&mut self, at: Position) {
        self.selection = Selection::caret(at);
        self.reveal(at.line);
    }

    fn reveal(&mut self, line: usize) {
        if line < self.viewport_top {
            self.viewport_top = line;
        } else if line >= self.viewport_top + self.viewport_height {
            self.viewport_top = line + 1 - self.viewport_height;
        }
    }

    fn check(&self, at: Position) -> Result<(), EditorError> {
        if at.line >= self.lines.len() || at.column > self.line_len(at.line) {
            return Err(EditorError::OutOfRange(format!(
                "{}:{}",
                at.line + 1,
                at.column + 1
            )));
        }
        Ok(())
    }

    fn checkpoint(&mut self) {
        self.undo.push(Snapshot { lines: self.lines.clone(), selection: self.selection });
        self.redo.clear();
    }

    fn text_in(&self, start: Position, end: Position) -> String {
        if start.line == end.line {
            let line = &self.lines[start.line];
            return line[byte_at(line, start.column)..byte_at(line, end.column)].to_string();
        }
        let mut out = String::new();
        let first = &self.lines[start.line];
        out.push_str(&first[byte_at(first, start.column)..]);
        for line in &self.lines[start.line + 1..end.line] {
            out.push('\n');
            out.push_str(line);
        }
        let last = &self.lines[end.line];
        out.push('\n');
        out.push_str(&last[..byte_at(last, end.column)]);
        out
    }

    fn delete_range(&mut self, start: Position, end: Position) {
        let head = {
            let line = &self.lines[start.line];
            line[..byte_at(line, start.column)].to_string()
        };
        let tail = {
            let line = &self.lines[end.line];
            line[byte_at(line, end.column)..].to_string()
        };
        self.lines.splice(start.line..=end.line, [head + &tail]);
    }

    /// Insert `text` at `at`, returning the position after it
    fn insert_at(&mut self, at: Position, text: &str) -> Position {
        let line = &self.lines[at.line];
        let split = byte_at(line, at.column);
        let head = line[..split].to_string();
        let tail = line[split..].to_string();

        let pieces: Vec<&str> = text.split('\n').collect();
        if pieces.len() == 1 {
            self.lines[at.line] = format!("{}{}{}", head, text, tail);
            return Position::new(at.line, at.column + char_len(text));
        }
        let last = pieces.len() - 1;
        let mut replacement = Vec::with_capacity(pieces.len());
        replacement.push(format!("{}{}", head, pieces[0]));
        replacement.extend(pieces[1..last].iter().map(|p| p.to_string()));
        replacement.push(format!("{}{}", pieces[last], tail));
        self.lines.splice(at.line..=at.line, replacement);
        Position::new(at.line + last, char_len(pieces[last]))
    }

    fn step_left(&self, at: Position) -> Position {
        if at.column > 0 {
            Position::new(at.line, at.column - 1)
        } else if at.line > 0 {
            Position::new(at.line - 1, self.line_len(at.line - 1))
        } else {
            at
        }
    }

    fn step_right(&self, at: Position) -> Position {
        if at.column < self.line_len(at.line) {
            Position::new(at.line, at.column + 1)
        } else if at.line < self.last_line() {
            Position::new(at.line + 1, 0)
        } else {
            at
        }
    }

    /// Repeat a one-character step, stopping early at a file boundary
    fn walk(&self, mut at: Position, count: usize, step: fn(&Self, Position) -> Position) -> Position {
        for _ in 0..count {
            let next = step(self, at);
            if next == at {
                break;
            }
            at = next;
        }
        at
    }

    fn is_blank(&self, line: usize) -> bool {
        self.lines[line].trim().is_empty()
    }

    fn save(&mut self) -> Result<(), EditorError> {
        if let Some(path) = &self.path {
            std::fs::write(path, self.text())
                .map_err(|e| EditorError::Rejected(format!("{}: {}", path.display(), e)))?;
            log::info!("saved {}", path.display());
        }
        Ok(())
    }
}

impl Editor for Buffer {
    fn line_count(&self) -> Result<usize, EditorError> {
        self.active()?;
        Ok(self.lines.len())
    }

    fn line_text(&self, line: usize) -> Result<String, EditorError> {
        self.active()?;
        self.lines
            .get(line)
            .cloned()
            .ok_or_else(|| EditorError::OutOfRange(format!("line {}", line + 1)))
    }

    fn selection(&self) -> Result<Selection, EditorError> {
        self.active()?;
        Ok(self.selection)
    }

    fn move_cursor_to_line(&mut self, line: usize) -> Result<(), EditorError> {
        self.active()?;
        if line >= self.lines.len() {
            return Err(EditorError::OutOfRange(format!(
                "line {} of {}",
                line + 1,
                self.lines.len()
            )));
        }
        self.place_caret(Position::new(line, 0));
        Ok(())
    }

    fn move_cursor_by(&mut self, direction: Direction, count: usize) -> Result<(), EditorError> {
        self.active()?;
        let at = self.selection.active;
        let to = match direction {
            Direction::Up => {
                let line = at.line.saturating_sub(count);
                Position::new(line, at.column.min(self.line_len(line)))
            }
            Direction::Down => {
                let line = at.line.saturating_add(count).min(self.last_line());
                Position::new(line, at.column.min(self.line_len(line)))
            }
            Direction::Left => self.walk(at, count, Self::step_left),
            Direction::Right => self.walk(at, count, Self::step_right),
            other => {
                return Err(EditorError::Rejected(format!("{} is not a relative direction", other)));
            }
        };
        self.place_caret(to);
        Ok(())
    }

    fn move_cursor_to(&mut self, target: Target) -> Result<(), EditorError> {
        self.active()?;
        let at = self.selection.active;
        let line = &self.lines[at.line];
        let to = match target {
            Target::LineStart => Position::new(at.line, 0),
            Target::LineEnd => Position::new(at.line, char_len(line)),
            Target::LineFirstNonWhitespace => {
                let indent = line.chars().take_while(|c| c.is_whitespace()).count();
                Position::new(at.line, indent)
            }
            Target::LineLastNonWhitespace => Position::new(at.line, char_len(line.trim_end())),
            Target::FileStart => Position::new(0, 0),
            Target::FileEnd => self.end_of_file(),
            Target::ViewPortTop => Position::new(self.viewport_top.min(self.last_line()), 0),
            Target::ViewPortBottom => {
                let bottom = (self.viewport_top + self.viewport_height - 1).min(self.last_line());
                Position::new(bottom, 0)
            }
            Target::PreviousBlankLine => {
                let line = (0..at.line).rev().find(|&l| self.is_blank(l)).unwrap_or(0);
                Position::new(line, 0)
            }
            Target::NextBlankLine => {
                let line = (at.line + 1..self.lines.len())
                    .find(|&l| self.is_blank(l))
                    .unwrap_or(self.last_line());
                Position::new(line, 0)
            }
        };
        self.place_caret(to);
        Ok(())
    }

    fn set_selection(&mut self, anchor: Position, active: Position) -> Result<(), EditorError> {
        self.active()?;
        self.check(anchor)?;
        self.check(active)?;
        self.selection = Selection { anchor, active };
        self.reveal(active.line);
        Ok(())
    }

    fn insert_text(&mut self, text: &str) -> Result<(), EditorError> {
        self.active()?;
        self.checkpoint();
        let after = self.insert_at(self.selection.active, text);
        self.place_caret(after);
        Ok(())
    }

    fn replace_selection(&mut self, text: &str) -> Result<(), EditorError> {
        self.active()?;
        self.checkpoint();
        let (start, end) = (self.selection.start(), self.selection.end());
        self.delete_range(start, end);
        let after = self.insert_at(start, text);
        self.place_caret(after);
        Ok(())
    }

    fn run(&mut self, command: EditorCommand) -> Result<(), EditorError> {
        self.active()?;
        self.history.push(command);
        match command {
            EditorCommand::ScrollPageUp => {
                self.viewport_top = self.viewport_top.saturating_sub(self.viewport_height);
                let line = self.selection.active.line.saturating_sub(self.viewport_height);
                self.place_caret(Position::new(line, 0));
            }
            EditorCommand::ScrollPageDown => {
                let line = (self.selection.active.line + self.viewport_height).min(self.last_line());
                self.viewport_top = (self.viewport_top + self.viewport_height).min(self.last_line());
                self.place_caret(Position::new(line, 0));
            }
            EditorCommand::SelectAll => {
                self.selection = Selection { anchor: Position::default(), active: self.end_of_file() };
            }
            EditorCommand::ExpandSelection => {
                let line = self.selection.active.line;
                let whole_line = Selection {
                    anchor: Position::new(line, 0),
                    active: Position::new(line, self.line_len(line)),
                };
                self.selection = if self.selection.is_empty() && self.line_len(line) > 0 {
                    whole_line
                } else {
                    Selection { anchor: Position::default(), active: self.end_of_file() }
                };
            }
            EditorCommand::ShrinkSelection => {
                self.selection = Selection::caret(self.selection.active);
            }
            EditorCommand::Copy => {
                self.clipboard = self.selected_text();
            }
            EditorCommand::Cut => {
                self.clipboard = self.selected_text();
                self.checkpoint();
                let (start, end) = (self.selection.start(), self.selection.end());
                self.delete_range(start, end);
                self.place_caret(start);
            }
            EditorCommand::Paste => {
                let text = self.clipboard.clone();
                self.replace_selection(&text)?;
            }
            EditorCommand::Delete => {
                let start = self.selection.start();
                let end = if self.selection.is_empty() {
                    self.step_right(start)
                } else {
                    self.selection.end()
                };
                if start != end {
                    self.checkpoint();
                    self.delete_range(start, end);
                }
                self.place_caret(start);
            }
            EditorCommand::Undo => {
                if let Some(snapshot) = self.undo.pop() {
                    self.redo.push(Snapshot { lines: self.lines.clone(), selection: self.selection });
                    self.lines = snapshot.lines;
                    self.selection = snapshot.selection;
                }
            }
            EditorCommand::Redo => {
                if let Some(snapshot) = self.redo.pop() {
                    self.undo.push(Snapshot { lines: self.lines.clone(), selection: self.selection });
                    self.lines = snapshot.lines;
                    self.selection = snapshot.selection;
                }
            }
            EditorCommand::Format => {
                self.checkpoint();
                for line in &mut self.lines {
                    let trimmed = line.trim_end().len();
                    line.truncate(trimmed);
                }
                let at = self.selection.active;
                self.place_caret(Position::new(at.line, at.column.min(self.line_len(at.line))));
            }
            EditorCommand::SaveFile | EditorCommand::SaveFileAs => self.save()?,
            // no text effect
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Buffer {
        Buffer::from_text("fn main() {\n    let x = 1;\n\n    println!(\"{}\", x);  \n}")
    }

    #[test]
    fn test_move_to_line() {
        let mut b = sample();
        b.move_cursor_to_line(3).unwrap();
        assert_eq!(b.cursor().unwrap(), Position::new(3, 0));
        assert!(matches!(b.move_cursor_to_line(5), Err(EditorError::OutOfRange(_))));
        assert_eq!(b.cursor().unwrap(), Position::new(3, 0));
    }

    #[test]
    fn test_relative_moves_clamp_and_wrap() {
        let mut b = sample();
        b.move_cursor_by(Direction::Down, 1).unwrap();
        b.move_cursor_by(Direction::Right, 14).unwrap();
        assert_eq!(b.cursor().unwrap(), Position::new(1, 14));
        b.move_cursor_by(Direction::Down, 1).unwrap();
        assert_eq!(b.cursor().unwrap(), Position::new(2, 0));
        b.move_cursor_by(Direction::Left, 1).unwrap();
        assert_eq!(b.cursor().unwrap(), Position::new(1, 14));
        b.move_cursor_by(Direction::Up, 10).unwrap();
        assert_eq!(b.cursor().unwrap(), Position::new(0, 11));
        assert!(b.move_cursor_by(Direction::Start, 1).is_err());
    }

    #[test]
    fn test_targets() {
        let mut b = sample();
        b.move_cursor_to_line(1).unwrap();
        b.move_cursor_to(Target::LineFirstNonWhitespace).unwrap();
        assert_eq!(b.cursor().unwrap(), Position::new(1, 4));
        b.move_cursor_to_line(3).unwrap();
        b.move_cursor_to(Target::LineLastNonWhitespace).unwrap();
        assert_eq!(b.cursor().unwrap(), Position::new(3, 22));
        b.move_cursor_to(Target::PreviousBlankLine).unwrap();
        assert_eq!(b.cursor().unwrap(), Position::new(2, 0));
        b.move_cursor_to(Target::FileEnd).unwrap();
        assert_eq!(b.cursor().unwrap(), Position::new(4, 1));
    }

    #[test]
    fn test_insert_multiline() {
        let mut b = Buffer::from_text("ab");
        b.set_selection(Position::new(0, 1), Position::new(0, 1)).unwrap();
        b.insert_text("1\n2\n3").unwrap();
        assert_eq!(b.text(), "a1\n2\n3b");
        assert_eq!(b.cursor().unwrap(), Position::new(2, 1));
    }

    #[test]
    fn test_replace_selection_across_lines() {
        let mut b = Buffer::from_text("one\ntwo\nthree");
        b.set_selection(Position::new(0, 1), Position::new(2, 2)).unwrap();
        assert_eq!(b.selected_text(), "ne\ntwo\nth");
        b.replace_selection("X").unwrap();
        assert_eq!(b.text(), "oXree");
    }

    #[test]
    fn test_undo_redo() {
        let mut b = Buffer::from_text("x");
        b.move_cursor_to(Target::LineEnd).unwrap();
        b.insert_text("yz").unwrap();
        b.run(EditorCommand::Undo).unwrap();
        assert_eq!(b.text(), "x");
        b.run(EditorCommand::Redo).unwrap();
        assert_eq!(b.text(), "xyz");
    }

    #[test]
    fn test_delete_and_clipboard() {
        let mut b = Buffer::from_text("hello\nworld");
        b.move_cursor_to(Target::LineEnd).unwrap();
        b.run(EditorCommand::Delete).unwrap();
        assert_eq!(b.text(), "helloworld");
        b.run(EditorCommand::SelectAll).unwrap();
        b.run(EditorCommand::Cut).unwrap();
        assert_eq!(b.text(), "");
        assert_eq!(b.clipboard(), "helloworld");
        b.run(EditorCommand::Paste).unwrap();
        assert_eq!(b.text(), "helloworld");
    }

    #[test]
    fn test_unfocused_reports_no_editor() {
        let mut b = Buffer::unfocused();
        assert_eq!(b.cursor(), Err(EditorError::NoActiveEditor));
        assert_eq!(b.insert_text("x"), Err(EditorError::NoActiveEditor));
        assert_eq!(b.run(EditorCommand::Copy), Err(EditorError::NoActiveEditor));
    }

    #[test]
    fn test_format_trims_trailing_whitespace() {
        let mut b = sample();
        b.run(EditorCommand::Format).unwrap();
        assert!(b.text().contains("x);\n}"));
        assert_eq!(b.history(), &[EditorCommand::Format]);
    }
}
