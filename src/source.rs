//! Transcription sources
//!
//! Speech recognition itself lives outside this crate; a source hands the
//! session one recognized utterance at a time.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// One result from a transcription source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Heard {
    Utterance(String),
    /// Nothing recognized in time
    Timeout,
    /// The source has no more input
    Closed,
}

#[async_trait]
pub trait TranscriptSource: Send {
    async fn listen(&mut self) -> Result<Heard>;
}

/// One utterance per line of standard input; a blank line is silence
pub struct StdinSource {
    lines: Lines<BufReader<Stdin>>,
    silence: Option<Duration>,
}

impl StdinSource {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            silence: None,
        }
    }

    /// Report a timeout when no line arrives within `silence`
    pub fn with_silence(mut self, silence: Duration) -> Self {
        self.silence = Some(silence);
        self
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

fn heard(line: Option<String>) -> Heard {
    match line {
        Some(line) if line.trim().is_empty() => Heard::Timeout,
        Some(line) => Heard::Utterance(line.trim().to_string()),
        None => Heard::Closed,
    }
}

#[async_trait]
impl TranscriptSource for StdinSource {
    async fn listen(&mut self) -> Result<Heard> {
        let next = match self.silence {
            Some(silence) => match tokio::time::timeout(silence, self.lines.next_line()).await {
                Ok(line) => line,
                Err(_) => return Ok(Heard::Timeout),
            },
            None => self.lines.next_line().await,
        };
        Ok(heard(next.context("reading stdin")?))
    }
}

/// Pre-recorded utterances, replayed in order
///
/// In a script file every line is one utterance; blank lines are silence and
/// lines starting with `#` are comments.
#[derive(Debug, Clone, Default)]
pub struct ScriptSource {
    pending: VecDeque<Heard>,
}

impl ScriptSource {
    pub fn new<I, S>(utterances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pending: utterances
                .into_iter()
                .map(|u| heard(Some(u.into())))
                .collect(),
        }
    }

    pub fn parse(script: &str) -> Self {
        Self::new(script.lines().filter(|l| !l.trim_start().starts_with('#')))
    }

    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let script = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading script {}", path.display()))?;
        Ok(Self::parse(&script))
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

#[async_trait]
impl TranscriptSource for ScriptSource {
    async fn listen(&mut self) -> Result<Heard> {
        Ok(self.pending.pop_front().unwrap_or(Heard::Closed))
    }
}
