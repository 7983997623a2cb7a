//! GO: cursor movement
//!
//! | combination                  | effect                                       |
//! |------------------------------|----------------------------------------------|
//! | Number                       | jump to line (1-indexed)                     |
//! | Direction                    | one step, or line start/end, or navigate     |
//! | ObjectNoun                   | `DEFINITION` only                            |
//! | Number·Direction             | relative move by count                       |
//! | Number·ObjectNoun            | `LINE` only: jump to line                    |
//! | ObjectNoun·Direction         | object boundary or object step               |
//! | Number·ObjectNoun·Direction  | counted object step                          |

use super::{code, invalid};
use crate::editor::{Editor, EditorCommand, Target};
use crate::grammar::{self, RuleTable, Step, editor_step};
use crate::keywords::{Direction, EditorObject};
use crate::outcome::{EditorError, Outcome};
use crate::token::{Token, TokenType};
use std::sync::LazyLock;

/// Counts at or above this are not single-step toggles (page, blank line, tab)
const SINGLE_STEP_LIMIT: usize = 9;

const ORDER: &[TokenType] = &[TokenType::Number, TokenType::ObjectNoun, TokenType::Direction];

static TABLE: LazyLock<RuleTable> = LazyLock::new(|| {
    use TokenType::*;
    RuleTable::new("GO", ORDER)
        .rule(&[Number], goto_line)
        .rule(&[Direction], move_dir)
        .rule(&[ObjectNoun], move_obj)
        .rule(&[Number, Direction], move_num_dir)
        .rule(&[Number, ObjectNoun], move_num_obj)
        .rule(&[ObjectNoun, Direction], move_obj_dir)
        .rule(&[Number, ObjectNoun, Direction], move_num_obj_dir)
});

pub fn table() -> &'static RuleTable {
    &TABLE
}

pub fn run(tokens: &[Token], editor: &mut dyn Editor) -> Outcome {
    grammar::resolve(table(), tokens, editor).outcome
}

/// Caret to the start of a spoken (1-indexed) line
pub(crate) fn jump_to_line(line: usize, editor: &mut dyn Editor) -> Step {
    if line == 0 {
        log::warn!("line numbers start at 1");
        return Step::Failed(Outcome::InvalidArgument);
    }
    editor_step(editor.move_cursor_to_line(line - 1))
}

fn one_step(direction: Direction, editor: &mut dyn Editor) -> Result<(), EditorError> {
    match direction {
        Direction::Up | Direction::Down | Direction::Left | Direction::Right => {
            editor.move_cursor_by(direction, 1)
        }
        Direction::Start => editor.move_cursor_to(Target::LineStart),
        Direction::End => editor.move_cursor_to(Target::LineEnd),
        Direction::Next => editor.run(EditorCommand::NavigateForward),
        Direction::Previous => editor.run(EditorCommand::NavigateBack),
    }
}

/// Move relative to an object, e.g. `BLANK_LINE DOWN`, `LINE START`
pub(crate) fn object_direction(
    object: EditorObject,
    direction: Direction,
    editor: &mut dyn Editor,
) -> Step {
    use Direction::*;
    use EditorObject::*;
    let result = match (object, direction) {
        (Line, Start) => editor.move_cursor_to(Target::LineFirstNonWhitespace),
        (Line, End) => editor.move_cursor_to(Target::LineLastNonWhitespace),
        (Line, Up | Previous) => editor.move_cursor_by(Up, 1),
        (Line, Down | Next) => editor.move_cursor_by(Down, 1),
        (File, Start) => editor.move_cursor_to(Target::FileStart),
        (File, End) => editor.move_cursor_to(Target::FileEnd),
        (ViewPort, Start) => editor.move_cursor_to(Target::ViewPortTop),
        (ViewPort, End) => editor.move_cursor_to(Target::ViewPortBottom),
        (Page, Up | Previous) => editor.run(EditorCommand::ScrollPageUp),
        (Page, Down | Next) => editor.run(EditorCommand::ScrollPageDown),
        (BlankLine, Up | Previous) => editor.move_cursor_to(Target::PreviousBlankLine),
        (BlankLine, Down | Next) => editor.move_cursor_to(Target::NextBlankLine),
        (Tab, Right | Next) => editor.run(EditorCommand::NextTab),
        (Tab, Left | Previous) => editor.run(EditorCommand::PreviousTab),
        _ => {
            log::warn!("no movement for {} {}", object, direction);
            return Step::Failed(Outcome::InvalidArgument);
        }
    };
    editor_step(result)
}

fn goto_line(t: &[&Token], editor: &mut dyn Editor) -> Step {
    match t[0].as_number() {
        Some(line) => jump_to_line(line, editor),
        None => invalid(t),
    }
}

fn move_dir(t: &[&Token], editor: &mut dyn Editor) -> Step {
    match code::<Direction>(t[0]) {
        Some(direction) => editor_step(one_step(direction, editor)),
        None => invalid(t),
    }
}

fn move_obj(t: &[&Token], editor: &mut dyn Editor) -> Step {
    match code::<EditorObject>(t[0]) {
        Some(EditorObject::Definition) => editor_step(editor.run(EditorCommand::RevealDefinition)),
        _ => invalid(t),
    }
}

fn move_num_dir(t: &[&Token], editor: &mut dyn Editor) -> Step {
    let (Some(count), Some(direction)) = (t[0].as_number(), code::<Direction>(t[1])) else {
        return invalid(t);
    };
    if direction.is_absolute() {
        return Step::Declined;
    }
    editor_step(editor.move_cursor_by(direction, count))
}

fn move_num_obj(t: &[&Token], editor: &mut dyn Editor) -> Step {
    match (t[0].as_number(), code::<EditorObject>(t[1])) {
        (Some(line), Some(EditorObject::Line)) => jump_to_line(line, editor),
        _ => invalid(t),
    }
}

fn move_obj_dir(t: &[&Token], editor: &mut dyn Editor) -> Step {
    match (code::<EditorObject>(t[0]), code::<Direction>(t[1])) {
        (Some(object), Some(direction)) => object_direction(object, direction, editor),
        _ => invalid(t),
    }
}

fn move_num_obj_dir(t: &[&Token], editor: &mut dyn Editor) -> Step {
    let (Some(count), Some(object), Some(direction)) = (
        t[0].as_number(),
        code::<EditorObject>(t[1]),
        code::<Direction>(t[2]),
    ) else {
        return invalid(t);
    };
    // an absolute direction makes the count meaningless
    if direction.is_absolute() {
        return Step::Declined;
    }
    match object {
        EditorObject::Line if matches!(direction, Direction::Up | Direction::Down) => {
            editor_step(editor.move_cursor_by(direction, count))
        }
        EditorObject::Page | EditorObject::BlankLine | EditorObject::Tab => {
            if count < SINGLE_STEP_LIMIT {
                object_direction(object, direction, editor)
            } else {
                Step::Declined
            }
        }
        _ => invalid(t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::editor::Position;

    fn n(v: usize) -> Token {
        Token::number(v)
    }

    fn dir(code: &str) -> Token {
        Token::code(code, TokenType::Direction)
    }

    fn obj(code: &str) -> Token {
        Token::code(code, TokenType::ObjectNoun)
    }

    fn buffer() -> Buffer {
        let text: Vec<String> = (1..=20).map(|i| format!("    line {}", i)).collect();
        Buffer::from_text(&text.join("\n"))
    }

    #[test]
    fn test_goto_line_is_one_indexed() {
        let mut b = buffer();
        assert_eq!(run(&[n(5)], &mut b), Outcome::Success);
        assert_eq!(b.cursor().unwrap(), Position::new(4, 0));
        assert_eq!(run(&[n(5)], &mut b), Outcome::Success);
        assert_eq!(b.cursor().unwrap(), Position::new(4, 0));
    }

    #[test]
    fn test_out_of_range_line_leaves_cursor() {
        let mut b = buffer();
        run(&[n(3)], &mut b);
        assert_eq!(run(&[n(999999)], &mut b), Outcome::InvalidArgument);
        assert_eq!(run(&[n(0)], &mut b), Outcome::InvalidArgument);
        assert_eq!(b.cursor().unwrap(), Position::new(2, 0));
    }

    #[test]
    fn test_count_then_direction_any_order() {
        let mut b = buffer();
        assert_eq!(run(&[n(3), dir("DOWN")], &mut b), Outcome::Success);
        assert_eq!(b.cursor().unwrap().line, 3);
        assert_eq!(run(&[dir("UP"), n(2)], &mut b), Outcome::Success);
        assert_eq!(b.cursor().unwrap().line, 1);
    }

    #[test]
    fn test_absolute_direction_suppresses_count() {
        let mut b = buffer();
        run(&[n(10)], &mut b);
        let r = grammar::resolve(table(), &[n(3), obj("LINE"), dir("START")], &mut b);
        assert_eq!(r.outcome, Outcome::Success);
        let keys: Vec<_> = r.steps.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["Number", "ObjectNoun·Direction"]);
        assert_eq!(b.cursor().unwrap(), Position::new(2, 4));
    }

    #[test]
    fn test_standalone_direction_before_counted_move() {
        let mut b = buffer();
        run(&[n(2), dir("END")], &mut b);
        assert_eq!(b.cursor().unwrap(), Position::new(1, 10));
        let r = grammar::resolve(table(), &[dir("RIGHT"), n(5), dir("LEFT")], &mut b);
        assert_eq!(r.outcome, Outcome::Success);
        let keys: Vec<_> = r.steps.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["Direction", "Number·Direction"]);
        // RIGHT wraps to the next line start, LEFT 5 comes back onto line 2
        assert_eq!(b.cursor().unwrap(), Position::new(1, 6));
    }

    #[test]
    fn test_counted_line_move() {
        let mut b = buffer();
        assert_eq!(run(&[n(4), obj("LINE"), dir("DOWN")], &mut b), Outcome::Success);
        assert_eq!(b.cursor().unwrap().line, 4);
        assert_eq!(run(&[dir("UP"), n(2), obj("LINE")], &mut b), Outcome::Success);
        assert_eq!(b.cursor().unwrap().line, 2);
    }

    #[test]
    fn test_page_count_threshold() {
        let mut b = buffer();
        assert_eq!(run(&[n(2), obj("PAGE"), dir("DOWN")], &mut b), Outcome::Success);
        assert_eq!(b.history(), &[EditorCommand::ScrollPageDown]);

        // a large count is a line number, then one page step
        let mut b = buffer();
        assert_eq!(run(&[n(12), obj("PAGE"), dir("UP")], &mut b), Outcome::Success);
        assert_eq!(b.history(), &[EditorCommand::ScrollPageUp]);
    }

    #[test]
    fn test_object_boundaries() {
        let mut b = buffer();
        run(&[n(7)], &mut b);
        assert_eq!(run(&[obj("LINE"), dir("END")], &mut b), Outcome::Success);
        assert_eq!(b.cursor().unwrap(), Position::new(6, 10));
        assert_eq!(run(&[obj("FILE"), dir("END")], &mut b), Outcome::Success);
        assert_eq!(b.cursor().unwrap(), Position::new(19, 11));
        assert_eq!(run(&[obj("FILE"), dir("UP")], &mut b), Outcome::InvalidArgument);
    }

    #[test]
    fn test_navigation_and_definition() {
        let mut b = buffer();
        assert_eq!(run(&[dir("PREVIOUS")], &mut b), Outcome::Success);
        assert_eq!(run(&[obj("DEFINITION")], &mut b), Outcome::Success);
        assert_eq!(run(&[obj("TAB"), dir("NEXT")], &mut b), Outcome::Success);
        assert_eq!(
            b.history(),
            &[EditorCommand::NavigateBack, EditorCommand::RevealDefinition, EditorCommand::NextTab]
        );
        assert_eq!(run(&[obj("LINE")], &mut b), Outcome::InvalidArgument);
    }

    #[test]
    fn test_huge_counts_clamp_at_the_document_edges() {
        let mut b = buffer();
        assert_eq!(run(&[n(usize::MAX), dir("DOWN")], &mut b), Outcome::Success);
        assert_eq!(b.cursor().unwrap().line, 19);
        assert_eq!(run(&[dir("UP"), n(usize::MAX)], &mut b), Outcome::Success);
        assert_eq!(b.cursor().unwrap(), Position::new(0, 0));

        assert_eq!(run(&[n(usize::MAX), dir("RIGHT")], &mut b), Outcome::Success);
        assert_eq!(b.cursor().unwrap(), Position::new(19, 11));
        assert_eq!(run(&[n(usize::MAX), dir("LEFT")], &mut b), Outcome::Success);
        assert_eq!(b.cursor().unwrap(), Position::new(0, 0));
    }

    #[test]
    fn test_no_editor() {
        let mut b = Buffer::unfocused();
        assert_eq!(run(&[n(1)], &mut b), Outcome::NoActiveEditor);
        assert_eq!(run(&[dir("UP")], &mut b), Outcome::NoActiveEditor);
    }
}
