//! SELECT: selection
//!
//! Without arguments the selection grows. With `FROM`/`TO` delimiters each
//! run is resolved as a GO and the resulting cursor positions bound the
//! selection. Anything else goes through the selection rule table.

use super::{code, go, invalid};
use crate::editor::{Editor, EditorCommand, Position, Target};
use crate::grammar::{self, RuleTable, Step, editor_step};
use crate::keywords::{Direction, EditorObject, Selector};
use crate::outcome::{self, EditorError, Outcome};
use crate::token::{Token, TokenType};
use std::sync::LazyLock;

const ORDER: &[TokenType] = &[
    TokenType::Number,
    TokenType::Selector,
    TokenType::ObjectNoun,
    TokenType::Direction,
];

static TABLE: LazyLock<RuleTable> = LazyLock::new(|| {
    use TokenType::*;
    RuleTable::new("SELECT", ORDER)
        .rule(&[Number], select_numbered_line)
        .rule(&[Selector], select_by_selector)
        .rule(&[ObjectNoun], select_object)
        .rule(&[Direction], extend_by_direction)
        .rule(&[Number, ObjectNoun], select_numbered_object)
        .rule(&[Number, Direction], extend_by_count)
        .rule(&[Selector, ObjectNoun], select_qualified_object)
        .rule(&[ObjectNoun, Direction], extend_to_object)
});

pub fn table() -> &'static RuleTable {
    &TABLE
}

pub fn run(tokens: &[Token], editor: &mut dyn Editor) -> Outcome {
    if tokens.is_empty() {
        return outcome::from_editor(editor.run(EditorCommand::ExpandSelection));
    }
    if tokens.iter().any(|t| is_delimiter(t)) {
        return select_range(tokens, editor);
    }
    grammar::resolve(table(), tokens, editor).outcome
}

fn is_delimiter(token: &Token) -> bool {
    token.kind == TokenType::Selector
        && matches!(code::<Selector>(token), Some(Selector::From | Selector::To))
}

fn is_selector(token: &Token, selector: Selector) -> bool {
    token.kind == TokenType::Selector && code::<Selector>(token) == Some(selector)
}

/// `[FROM] <go tokens> [TO <go tokens>]`
fn select_range(tokens: &[Token], editor: &mut dyn Editor) -> Outcome {
    let (from_run, to_run) = match tokens.iter().position(|t| is_selector(t, Selector::To)) {
        Some(at) => (&tokens[..at], &tokens[at + 1..]),
        None => (tokens, &tokens[tokens.len()..]),
    };
    let from_run = match from_run.first() {
        Some(first) if is_selector(first, Selector::From) => &from_run[1..],
        _ => from_run,
    };
    if from_run.iter().chain(to_run).any(is_delimiter) {
        log::warn!("misplaced FROM/TO in selection range");
        return Outcome::InvalidArgument;
    }

    let previous = match editor.selection() {
        Ok(selection) => selection,
        Err(err) => return outcome::from_editor::<()>(Err(err)),
    };
    let start = match cursor_after(from_run, previous.active, editor) {
        Ok(at) => at,
        Err(outcome) => return outcome,
    };
    let end = match cursor_after(to_run, previous.end(), editor) {
        Ok(at) => at,
        Err(outcome) => return outcome,
    };
    log::debug!("selecting {:?} -> {:?}", start, end);
    outcome::from_editor(editor.set_selection(start, end))
}

/// Resolve a GO run and report where the cursor ended up
fn cursor_after(run: &[Token], default: Position, editor: &mut dyn Editor) -> Result<Position, Outcome> {
    if run.is_empty() {
        return Ok(default);
    }
    let outcome = go::run(run, editor);
    if !outcome.is_success() {
        return Err(outcome);
    }
    editor.cursor().map_err(Outcome::from)
}

fn line_range(line: usize, from_indent: bool, editor: &mut dyn Editor) -> Result<(), EditorError> {
    let text = editor.line_text(line)?;
    let start = if from_indent {
        text.chars().take_while(|c| c.is_whitespace()).count()
    } else {
        0
    };
    editor.set_selection(Position::new(line, start), Position::new(line, text.chars().count()))
}

/// Keep the anchor, let `motion` move the active end
fn extend(
    editor: &mut dyn Editor,
    motion: impl FnOnce(&mut dyn Editor) -> Result<(), EditorError>,
) -> Result<(), EditorError> {
    let anchor = editor.selection()?.anchor;
    motion(&mut *editor)?;
    let active = editor.cursor()?;
    editor.set_selection(anchor, active)
}

fn select_line_number(line: usize, editor: &mut dyn Editor) -> Step {
    if line == 0 {
        return Step::Failed(Outcome::InvalidArgument);
    }
    editor_step(line_range(line - 1, false, editor))
}

fn select_numbered_line(t: &[&Token], editor: &mut dyn Editor) -> Step {
    match t[0].as_number() {
        Some(line) => select_line_number(line, editor),
        None => invalid(t),
    }
}

fn select_by_selector(t: &[&Token], editor: &mut dyn Editor) -> Step {
    let result = match code::<Selector>(t[0]) {
        Some(Selector::All) => editor.run(EditorCommand::SelectAll),
        Some(Selector::More) => editor.run(EditorCommand::ExpandSelection),
        Some(Selector::Less) => editor.run(EditorCommand::ShrinkSelection),
        Some(Selector::ToStart) => extend(editor, |e| e.move_cursor_to(Target::LineStart)),
        Some(Selector::ToEnd) => extend(editor, |e| e.move_cursor_to(Target::LineEnd)),
        _ => return invalid(t),
    };
    editor_step(result)
}

fn select_object(t: &[&Token], editor: &mut dyn Editor) -> Step {
    let result = match code::<EditorObject>(t[0]) {
        Some(EditorObject::Line) => editor.cursor().and_then(|at| line_range(at.line, false, editor)),
        Some(EditorObject::File) => editor.run(EditorCommand::SelectAll),
        _ => return invalid(t),
    };
    editor_step(result)
}

fn extend_by_direction(t: &[&Token], editor: &mut dyn Editor) -> Step {
    let result = match code::<Direction>(t[0]) {
        Some(Direction::Start) => extend(editor, |e| e.move_cursor_to(Target::LineStart)),
        Some(Direction::End) => extend(editor, |e| e.move_cursor_to(Target::LineEnd)),
        Some(d) if !d.is_absolute() => extend(editor, |e| e.move_cursor_by(d, 1)),
        _ => return invalid(t),
    };
    editor_step(result)
}

fn select_numbered_object(t: &[&Token], editor: &mut dyn Editor) -> Step {
    match (t[0].as_number(), code::<EditorObject>(t[1])) {
        (Some(line), Some(EditorObject::Line)) => select_line_number(line, editor),
        _ => invalid(t),
    }
}

fn extend_by_count(t: &[&Token], editor: &mut dyn Editor) -> Step {
    let (Some(count), Some(direction)) = (t[0].as_number(), code::<Direction>(t[1])) else {
        return invalid(t);
    };
    if direction.is_absolute() {
        return Step::Declined;
    }
    editor_step(extend(editor, |e| e.move_cursor_by(direction, count)))
}

fn select_qualified_object(t: &[&Token], editor: &mut dyn Editor) -> Step {
    let (Some(selector), Some(object)) = (code::<Selector>(t[0]), code::<EditorObject>(t[1])) else {
        return invalid(t);
    };
    let boundary = match (selector, object) {
        (Selector::All, EditorObject::Line) => {
            return editor_step(editor.cursor().and_then(|at| line_range(at.line, true, editor)));
        }
        (Selector::All, EditorObject::File) => {
            return editor_step(editor.run(EditorCommand::SelectAll));
        }
        (Selector::ToStart, EditorObject::Line) => Target::LineStart,
        (Selector::ToEnd, EditorObject::Line) => Target::LineEnd,
        (Selector::ToStart, EditorObject::File) => Target::FileStart,
        (Selector::ToEnd, EditorObject::File) => Target::FileEnd,
        _ => return invalid(t),
    };
    editor_step(extend(editor, |e| e.move_cursor_to(boundary)))
}

fn extend_to_object(t: &[&Token], editor: &mut dyn Editor) -> Step {
    let (Some(object), Some(direction)) = (code::<EditorObject>(t[0]), code::<Direction>(t[1])) else {
        return invalid(t);
    };
    if matches!(object, EditorObject::Page | EditorObject::Tab) {
        return invalid(t);
    }
    let anchor = match editor.selection() {
        Ok(selection) => selection.anchor,
        Err(err) => return editor_step::<()>(Err(err)),
    };
    match go::object_direction(object, direction, editor) {
        Step::Done => editor_step(editor.cursor().and_then(|active| editor.set_selection(anchor, active))),
        other => other,
    }
}
