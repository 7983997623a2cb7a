use crate::keywords::KeywordTables;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "handsfree.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Extra or overriding vocabulary, merged over the built-in tables
    #[serde(default)]
    pub keywords: KeywordTables,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub dictation: DictationConfig,
    #[serde(default)]
    pub listen: ListenConfig,
}

// ============================================================================
// Commands Config
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CommandsConfig {
    /// Whole-transcript triggers for zero-argument commands
    #[serde(default)]
    pub exact: HashMap<String, String>,

    /// Triggers found anywhere in a transcript; the rest is the argument text
    #[serde(default)]
    pub parameterized: HashMap<String, String>,
}

// ============================================================================
// Dictation Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DictationConfig {
    /// Also accept stop phrases within a small edit distance
    #[serde(default = "default_fuzzy_stop")]
    pub fuzzy_stop: bool,
}

impl Default for DictationConfig {
    fn default() -> Self {
        Self {
            fuzzy_stop: default_fuzzy_stop(),
        }
    }
}

fn default_fuzzy_stop() -> bool {
    false
}

// ============================================================================
// Listen Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListenConfig {
    /// Seconds without an utterance before the source reports a timeout (0 = wait forever)
    #[serde(default = "default_silence_secs")]
    pub silence_secs: u64,

    /// Echo each utterance as it is heard
    #[serde(default = "default_echo")]
    pub echo: bool,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            silence_secs: default_silence_secs(),
            echo: default_echo(),
        }
    }
}

fn default_silence_secs() -> u64 {
    0
}

fn default_echo() -> bool {
    true
}

impl ListenConfig {
    pub fn silence(&self) -> Option<Duration> {
        (self.silence_secs > 0).then(|| Duration::from_secs(self.silence_secs))
    }
}

fn lowercase_keys<V>(map: HashMap<String, V>) -> HashMap<String, V> {
    map.into_iter()
        .map(|(k, v)| (k.trim().to_lowercase(), v))
        .collect()
}

impl Config {
    /// Load `path`; a missing file gives the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Built-in tables extended by this config
    pub fn tables(&self) -> KeywordTables {
        let mut tables = KeywordTables::builtin();
        let mut extra = self.keywords.clone();
        extra.command_triggers.extend(self.commands.exact.clone());
        extra.parameterized_command_triggers.extend(self.commands.parameterized.clone());

        extra.directions = lowercase_keys(extra.directions);
        extra.object_nouns = lowercase_keys(extra.object_nouns);
        extra.selectors = lowercase_keys(extra.selectors);
        extra.suggestion_qualifiers = lowercase_keys(extra.suggestion_qualifiers);
        extra.terminal_actions = lowercase_keys(extra.terminal_actions);
        extra.special_characters = lowercase_keys(extra.special_characters);
        extra.number_words = lowercase_keys(extra.number_words);
        extra.command_triggers = lowercase_keys(extra.command_triggers);
        extra.parameterized_command_triggers = lowercase_keys(extra.parameterized_command_triggers);

        tables.merge(extra);
        tables
    }
}
