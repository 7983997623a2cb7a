//! NEW and ADD: code generation
//!
//! NEW writes a Python template on a fresh line below the cursor, indented
//! like the current line. ADD inserts an inline snippet at the cursor. Both
//! accept an optional name next to the object (`FUNCTION parse header`,
//! `parse header FUNCTION`).

use super::{code, invalid};
use crate::editor::{Editor, Target};
use crate::grammar::{self, RuleTable, Step, editor_step};
use crate::keywords::{CodeObject, Direction, EditorObject};
use crate::outcome::{EditorError, Outcome};
use crate::token::{Token, TokenType};
use std::sync::LazyLock;

const ORDER: &[TokenType] = &[TokenType::ObjectNoun, TokenType::Unclassified];

static NEW_TABLE: LazyLock<RuleTable> = LazyLock::new(|| {
    RuleTable::new("NEW", ORDER)
        .rule(&[TokenType::ObjectNoun], new_template)
        .rule(&[TokenType::ObjectNoun, TokenType::Unclassified], new_named_template)
});

static ADD_TABLE: LazyLock<RuleTable> = LazyLock::new(|| {
    RuleTable::new("ADD", ORDER)
        .rule(&[TokenType::ObjectNoun], add_snippet)
        .rule(&[TokenType::ObjectNoun, TokenType::Unclassified], add_named_snippet)
});

pub fn run_new(tokens: &[Token], editor: &mut dyn Editor) -> Outcome {
    grammar::resolve(&NEW_TABLE, tokens, editor).outcome
}

pub fn run_add(tokens: &[Token], editor: &mut dyn Editor) -> Outcome {
    grammar::resolve(&ADD_TABLE, tokens, editor).outcome
}

/// `parse header` -> `parse_header`
pub fn snake_case(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// `max retries` -> `MAX_RETRIES`
pub fn upper_snake_case(name: &str) -> String {
    snake_case(name).to_uppercase()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `http client` -> `HttpClient`
pub fn pascal_case(name: &str) -> String {
    name.split_whitespace().map(capitalize).collect()
}

/// `http client` -> `httpClient`
pub fn camel_case(name: &str) -> String {
    let mut words = name.split_whitespace();
    let first = words.next().map(str::to_lowercase).unwrap_or_default();
    words.fold(first, |mut acc, word| {
        acc.push_str(&capitalize(word));
        acc
    })
}

fn template(object: CodeObject) -> Option<&'static str> {
    let text = match object {
        CodeObject::Class => {
            "class MyClass:\n    def __init__(self):\n        pass\n\n    def method1(self):\n        pass"
        }
        CodeObject::Function => "def my_function():\n    pass",
        CodeObject::Method => "def my_method(self):\n    pass",
        CodeObject::Constant => "MY_CONSTANT = None",
        CodeObject::Dictionary => "my_dict = {}",
        CodeObject::If => "if condition:\n    pass",
        CodeObject::Elif => "elif condition:\n    pass",
        CodeObject::Else => "else:\n    pass",
        CodeObject::Try => "try:\n    pass\nexcept Exception:\n    pass",
        CodeObject::Import => "import module_name",
        CodeObject::Key => "my_dict['key'] = value",
        CodeObject::Value => "my_dict[key] = 'value'",
        CodeObject::List => "my_list = []",
        CodeObject::Print => "print(\"Hello, World!\")",
        CodeObject::Input => "user_input = input(\"Enter a value: \")",
        CodeObject::Return => "return value",
        CodeObject::Variable => "my_variable = None",
        CodeObject::While => "while condition:\n    pass",
        CodeObject::For => "for i in range(len(my_list)):\n    pass",
        CodeObject::ForEach => "for key, value in my_dict.items():\n    pass",
        _ => return None,
    };
    Some(text)
}

fn named_template(object: CodeObject, name: &str) -> Option<String> {
    let text = match object {
        CodeObject::Variable => format!("{} = None", snake_case(name)),
        CodeObject::Constant => format!("{} = None", upper_snake_case(name)),
        CodeObject::Dictionary => format!("{} = {{}}", snake_case(name)),
        CodeObject::List => format!("{} = []", snake_case(name)),
        CodeObject::Function => format!("def {}():\n    pass", snake_case(name)),
        CodeObject::Method => format!("def {}(self):\n    pass", snake_case(name)),
        CodeObject::Class => format!(
            "class {}:\n    def __init__(self):\n        pass",
            pascal_case(name)
        ),
        _ => return None,
    };
    Some(text)
}

/// Write `text` on new lines below the cursor, at the current indentation
fn insert_below(text: &str, editor: &mut dyn Editor) -> Result<(), EditorError> {
    let line = editor.cursor()?.line;
    let current = editor.line_text(line)?;
    let indent: String = current.chars().take_while(|c| c.is_whitespace()).collect();
    let body = text
        .lines()
        .map(|l| if l.is_empty() { String::new() } else { format!("{}{}", indent, l) })
        .collect::<Vec<_>>()
        .join("\n");
    editor.move_cursor_to(Target::LineEnd)?;
    editor.insert_text(&format!("\n{}", body))
}

fn new_template(t: &[&Token], editor: &mut dyn Editor) -> Step {
    match code::<CodeObject>(t[0]).and_then(template) {
        Some(text) => editor_step(insert_below(text, editor)),
        None => invalid(t),
    }
}

fn new_named_template(t: &[&Token], editor: &mut dyn Editor) -> Step {
    match code::<CodeObject>(t[0]).and_then(|o| named_template(o, &t[1].text_value())) {
        Some(text) => editor_step(insert_below(&text, editor)),
        None => invalid(t),
    }
}

/// Inline snippet, and how far the cursor backs up into it
fn snippet(object: CodeObject) -> Option<(&'static str, usize)> {
    let entry = match object {
        CodeObject::Import => ("import", 0),
        CodeObject::Return => ("return", 0),
        CodeObject::List => ("[]", 1),
        CodeObject::Tuple => ("()", 1),
        CodeObject::Dictionary | CodeObject::Set => ("{}", 1),
        CodeObject::If => ("if", 0),
        CodeObject::Elif => ("elif", 0),
        CodeObject::Else => ("else", 0),
        CodeObject::While => ("while", 0),
        CodeObject::ForEach => ("for element in iterable:", 0),
        CodeObject::For => ("for", 0),
        CodeObject::In => ("in", 0),
        CodeObject::Range => ("range()", 1),
        CodeObject::Print => ("print()", 1),
        CodeObject::Input => ("input()", 1),
        CodeObject::Open => ("open()", 1),
        CodeObject::Try => ("try:", 0),
        CodeObject::Except => ("except:", 0),
        CodeObject::Variable => ("variable", 0),
        CodeObject::Type => ("type()", 1),
        CodeObject::Integer => ("int", 0),
        CodeObject::Float => ("float", 0),
        CodeObject::String => ("str", 0),
        CodeObject::Boolean => ("bool", 0),
        CodeObject::None => ("None", 0),
        _ => return None,
    };
    Some(entry)
}

fn named_snippet(object: CodeObject, name: &str) -> Option<(String, usize)> {
    let entry = match object {
        CodeObject::Constant | CodeObject::Object => (upper_snake_case(name), 0),
        CodeObject::Class => (pascal_case(name), 0),
        CodeObject::Method | CodeObject::Function => (format!("{}()", snake_case(name)), 1),
        CodeObject::List | CodeObject::Tuple | CodeObject::Dictionary | CodeObject::Set => {
            (format!("{}[]", snake_case(name)), 1)
        }
        CodeObject::Parameter
        | CodeObject::Argument
        | CodeObject::Key
        | CodeObject::Value
        | CodeObject::Variable => (snake_case(name), 0),
        _ => return None,
    };
    Some(entry)
}

/// Insert at the cursor, separated from a preceding word by a space
fn add_inline(text: &str, back: usize, editor: &mut dyn Editor) -> Result<(), EditorError> {
    let needs_space = editor.selection()?.is_empty()
        && editor.char_before_cursor()?.is_some_and(|c| !c.is_whitespace());
    let text = if needs_space { format!(" {}", text) } else { text.to_string() };
    editor.replace_selection(&text)?;
    if back > 0 {
        editor.move_cursor_by(Direction::Left, back)?;
    }
    Ok(())
}

fn add_snippet(t: &[&Token], editor: &mut dyn Editor) -> Step {
    match code::<EditorObject>(t[0]) {
        Some(EditorObject::Line) => return editor_step(editor.replace_selection("\n")),
        Some(EditorObject::BlankLine) => return editor_step(editor.replace_selection("\n\n")),
        Some(_) => return invalid(t),
        None => {}
    }
    match code::<CodeObject>(t[0]).and_then(snippet) {
        Some((text, back)) => editor_step(add_inline(text, back, editor)),
        None => invalid(t),
    }
}

fn add_named_snippet(t: &[&Token], editor: &mut dyn Editor) -> Step {
    match code::<CodeObject>(t[0]).and_then(|o| named_snippet(o, &t[1].text_value())) {
        Some((text, back)) => editor_step(add_inline(&text, back, editor)),
        None => invalid(t),
    }
}
