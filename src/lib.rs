//! Voice-command interpretation for hands-free code editing
//!
//! A transcribed utterance is matched to a command, its arguments are
//! normalized into typed tokens, and a rule table resolves the tokens into
//! editor actions. Dictation and spelling modes insert text instead.

pub mod buffer;
pub mod commands;
pub mod config;
pub mod dictation;
pub mod dispatch;
pub mod editor;
pub mod fuzzy;
pub mod grammar;
pub mod keywords;
pub mod normalize;
pub mod outcome;
pub mod report;
pub mod session;
pub mod source;
pub mod state;
pub mod stats;
pub mod token;
