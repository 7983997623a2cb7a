//! Grammar resolver
//!
//! Consumes a token list left to right, matching the longest combination of
//! 1 to 3 tokens that a command's [`RuleTable`] knows about. Rules are keyed
//! by token types in the table's canonical order, so `5 DOWN` and `DOWN 5`
//! hit the same rule; the remaining queue itself is never reordered.
//!
//! Precedence, checked in this order for each window:
//!
//! 1. three pairwise-distinct types form a triple
//! 2. when the second and third token share a type different from the
//!    first, the first token runs on its own
//! 3. two tokens of the same type: the first runs on its own
//! 4. an out-of-order pair whose second token starts an in-order pair with
//!    the third: the first runs on its own (`RIGHT 5 LEFT`)
//! 5. otherwise a pair, then a single
//!
//! An action may decline its combination (`3 LINE START`: the count does not
//! apply to an absolute direction). The combination is then split: its first
//! token in canonical order runs alone and the others run together.
//!
//! Every step consumes at least one token, so a pass over `n` tokens takes at
//! most `n` steps.

use crate::editor::Editor;
use crate::outcome::{self, EditorError, Outcome};
use crate::token::{self, Token, TokenType};
use std::collections::HashMap;

/// What an action made of its tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Done,
    /// One of the tokens does not apply to the others
    Declined,
    Failed(Outcome),
}

impl From<Outcome> for Step {
    fn from(outcome: Outcome) -> Self {
        if outcome.is_success() {
            Step::Done
        } else {
            Step::Failed(outcome)
        }
    }
}

/// Action bound to a type combination; receives its tokens in canonical order
pub type Action = fn(&[&Token], &mut dyn Editor) -> Step;

/// Per-command rules keyed by type combination
pub struct RuleTable {
    name: &'static str,
    order: &'static [TokenType],
    rules: HashMap<Vec<TokenType>, Action>,
}

impl RuleTable {
    /// `order` is the canonical type order; types missing from it sort last
    pub fn new(name: &'static str, order: &'static [TokenType]) -> Self {
        RuleTable { name, order, rules: HashMap::new() }
    }

    /// Bind an action to a type combination (given in any order)
    pub fn rule(mut self, kinds: &[TokenType], action: Action) -> Self {
        let mut key = kinds.to_vec();
        key.sort_by_key(|k| self.rank(*k));
        self.rules.insert(key, action);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn rank(&self, kind: TokenType) -> usize {
        self.order.iter().position(|k| *k == kind).unwrap_or(self.order.len())
    }

    /// Tokens reordered to canonical type order (stable)
    fn canonical<'a>(&self, tokens: &[&'a Token]) -> Vec<&'a Token> {
        let mut sorted = tokens.to_vec();
        sorted.sort_by_key(|t| self.rank(t.kind));
        sorted
    }

    fn lookup(&self, tokens: &[&Token]) -> Option<(Action, Vec<TokenType>)> {
        let mut key: Vec<TokenType> = tokens.iter().map(|t| t.kind).collect();
        key.sort_by_key(|k| self.rank(*k));
        self.rules.get(&key).map(|action| (*action, key))
    }

    fn has_rule(&self, tokens: &[&Token]) -> bool {
        self.lookup(tokens).is_some()
    }

    fn in_order(&self, a: TokenType, b: TokenType) -> bool {
        self.rank(a) <= self.rank(b)
    }

    /// Combination keys this table binds, for diagnostics
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.rules.keys().map(|k| token::combination_key(k)).collect();
        keys.sort();
        keys
    }
}

/// One executed resolver step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub key: String,
    pub consumed: usize,
}

/// Result of one resolver pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub outcome: Outcome,
    pub steps: Vec<Applied>,
}

enum Attempt {
    Ran(String),
    Declined,
    Failed(Outcome),
    NoRule,
}

fn attempt(table: &RuleTable, window: &[&Token], editor: &mut dyn Editor) -> Attempt {
    let Some((action, key)) = table.lookup(window) else {
        return Attempt::NoRule;
    };
    let key = token::combination_key(&key);
    let ordered = table.canonical(window);
    log::debug!(
        "[{}] {} <- {}",
        table.name,
        key,
        ordered.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(" ")
    );
    match action(&ordered, editor) {
        Step::Done => Attempt::Ran(key),
        Step::Declined => Attempt::Declined,
        Step::Failed(outcome) => Attempt::Failed(outcome),
    }
}

type StepResult = Result<Vec<Applied>, Outcome>;

/// Run `window` as one combination, splitting it when the action declines
fn combination(table: &RuleTable, window: &[&Token], editor: &mut dyn Editor) -> StepResult {
    match attempt(table, window, editor) {
        Attempt::Ran(key) => Ok(vec![Applied { key, consumed: window.len() }]),
        Attempt::Failed(outcome) => Err(outcome),
        Attempt::Declined if window.len() > 1 => split(table, window, editor),
        Attempt::Declined => Err(Outcome::InvalidArgument),
        Attempt::NoRule => {
            let kinds: Vec<TokenType> = window.iter().map(|t| t.kind).collect();
            log::warn!("[{}] no rule for {}", table.name, token::combination_key(&kinds));
            Err(Outcome::InvalidArgument)
        }
    }
}

/// The first token in canonical order runs alone, then the rest together
fn split(table: &RuleTable, window: &[&Token], editor: &mut dyn Editor) -> StepResult {
    let ordered = table.canonical(window);
    log::debug!("[{}] {} declined, splitting", table.name, ordered[0]);
    let mut applied = combination(table, &ordered[..1], editor)?;
    applied.extend(combination(table, &ordered[1..], editor)?);
    Ok(applied)
}

fn step(table: &RuleTable, rest: &[Token], editor: &mut dyn Editor) -> StepResult {
    let window: Vec<&Token> = rest.iter().take(3).collect();
    let kinds: Vec<TokenType> = window.iter().map(|t| t.kind).collect();

    if let [k0, k1, k2] = kinds[..] {
        if k0 != k1 && k1 != k2 && k0 != k2 && table.has_rule(&window) {
            return combination(table, &window, editor);
        }
        if k1 == k2 && k0 != k1 {
            return combination(table, &window[..1], editor);
        }
        if k0 != k1
            && !table.in_order(k0, k1)
            && table.in_order(k1, k2)
            && table.has_rule(&window[1..3])
        {
            return combination(table, &window[..1], editor);
        }
    }

    match kinds[..] {
        [k0, k1, ..] if k0 != k1 => combination(table, &window[..2], editor),
        _ => combination(table, &window[..1], editor),
    }
}

/// Resolve `tokens` against `table`, executing actions as they match
///
/// Side effects of steps that already ran stand when a later step fails.
pub fn resolve(table: &RuleTable, tokens: &[Token], editor: &mut dyn Editor) -> Resolution {
    let mut steps = Vec::new();
    if tokens.is_empty() {
        log::warn!("[{}] no arguments", table.name);
        return Resolution { outcome: Outcome::InvalidArgument, steps };
    }

    let mut at = 0;
    while at < tokens.len() {
        match step(table, &tokens[at..], editor) {
            Ok(applied) => {
                at += applied.iter().map(|a| a.consumed).sum::<usize>();
                steps.extend(applied);
            }
            Err(outcome) => return Resolution { outcome, steps },
        }
    }
    Resolution { outcome: Outcome::Success, steps }
}

/// Collapse an editor call into a step
pub fn editor_step<T>(result: Result<T, EditorError>) -> Step {
    outcome::from_editor(result).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    const ORDER: &[TokenType] = &[TokenType::Number, TokenType::ObjectNoun, TokenType::Direction];

    fn ok(_: &[&Token], _: &mut dyn Editor) -> Step {
        Step::Done
    }

    fn decline(_: &[&Token], _: &mut dyn Editor) -> Step {
        Step::Declined
    }

    fn fail(_: &[&Token], _: &mut dyn Editor) -> Step {
        Step::Failed(Outcome::ExecutionFailed)
    }

    fn expect_number_first(tokens: &[&Token], _: &mut dyn Editor) -> Step {
        assert_eq!(tokens[0].kind, TokenType::Number);
        Step::Done
    }

    fn table() -> RuleTable {
        use TokenType::*;
        RuleTable::new("test", ORDER)
            .rule(&[Number], ok)
            .rule(&[Direction], ok)
            .rule(&[Direction, Number], expect_number_first)
            .rule(&[Number, ObjectNoun], ok)
            .rule(&[ObjectNoun, Direction], ok)
            .rule(&[Number, ObjectNoun, Direction], expect_number_first)
    }

    fn n(v: usize) -> Token {
        Token::number(v)
    }

    fn dir(code: &str) -> Token {
        Token::code(code, TokenType::Direction)
    }

    fn obj(code: &str) -> Token {
        Token::code(code, TokenType::ObjectNoun)
    }

    fn keys(r: &Resolution) -> Vec<&str> {
        r.steps.iter().map(|s| s.key.as_str()).collect()
    }

    #[test]
    fn test_rules_are_order_insensitive() {
        let t = table();
        let mut b = Buffer::default();
        let r = resolve(&t, &[dir("DOWN"), n(5)], &mut b);
        assert_eq!(r.outcome, Outcome::Success);
        assert_eq!(keys(&r), vec!["Number·Direction"]);
    }

    #[test]
    fn test_triple_in_any_order() {
        let t = table();
        let mut b = Buffer::default();
        let r = resolve(&t, &[dir("UP"), n(3), obj("LINE")], &mut b);
        assert_eq!(keys(&r), vec!["Number·ObjectNoun·Direction"]);
        assert_eq!(r.steps[0].consumed, 3);
    }

    #[test]
    fn test_standalone_direction_before_count() {
        let t = table();
        let mut b = Buffer::default();
        let r = resolve(&t, &[dir("RIGHT"), n(5), dir("LEFT")], &mut b);
        assert_eq!(r.outcome, Outcome::Success);
        assert_eq!(keys(&r), vec!["Direction", "Number·Direction"]);
    }

    #[test]
    fn test_last_two_same_type_splits_first() {
        let t = table();
        let mut b = Buffer::default();
        let r = resolve(&t, &[n(2), dir("UP"), dir("DOWN")], &mut b);
        assert_eq!(keys(&r), vec!["Number", "Direction", "Direction"]);
    }

    #[test]
    fn test_declined_triple_runs_first_token_alone() {
        use TokenType::*;
        let t = RuleTable::new("test", ORDER)
            .rule(&[Number], ok)
            .rule(&[ObjectNoun, Direction], ok)
            .rule(&[Number, ObjectNoun, Direction], decline);
        let mut b = Buffer::default();
        let r = resolve(&t, &[n(3), obj("LINE"), dir("START")], &mut b);
        assert_eq!(r.outcome, Outcome::Success);
        assert_eq!(keys(&r), vec!["Number", "ObjectNoun·Direction"]);

        let r = resolve(&t, &[obj("LINE"), n(5), dir("END")], &mut b);
        assert_eq!(r.outcome, Outcome::Success);
        assert_eq!(keys(&r), vec!["Number", "ObjectNoun·Direction"]);
        assert_eq!(r.steps.iter().map(|s| s.consumed).sum::<usize>(), 3);
    }

    #[test]
    fn test_missing_rule_is_invalid_after_partial_progress() {
        let t = table();
        let mut b = Buffer::default();
        let r = resolve(&t, &[n(4), obj("LINE"), obj("FILE")], &mut b);
        assert_eq!(r.outcome, Outcome::InvalidArgument);
        assert_eq!(keys(&r), vec!["Number"]);

        let r = resolve(&t, &[dir("UP"), obj("FILE")], &mut b);
        assert_eq!(r.outcome, Outcome::Success);

        let r = resolve(&t, &[dir("UP"), Token::text("foo")], &mut b);
        assert_eq!(r.outcome, Outcome::InvalidArgument);
    }

    #[test]
    fn test_failure_stops_the_pass() {
        use TokenType::*;
        let t = RuleTable::new("test", ORDER).rule(&[Number], ok).rule(&[Direction], fail);
        let mut b = Buffer::default();
        let r = resolve(&t, &[n(1), dir("UP"), dir("DOWN")], &mut b);
        assert_eq!(r.outcome, Outcome::ExecutionFailed);
        assert_eq!(keys(&r), vec!["Number"]);
    }

    #[test]
    fn test_empty_is_invalid() {
        let mut b = Buffer::default();
        assert_eq!(resolve(&table(), &[], &mut b).outcome, Outcome::InvalidArgument);
    }

    #[test]
    fn test_keys_listing() {
        assert!(table().keys().contains(&"Number·ObjectNoun·Direction".to_string()));
    }
}
