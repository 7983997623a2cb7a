//! Listen loop driver
//!
//! One utterance is interpreted to completion before the next is requested.
//! The session owns the dictation state and swaps keyword tables only between
//! utterances.

use crate::dictation::{self, Interpretation};
use crate::editor::Editor;
use crate::keywords::KeywordTables;
use crate::report::{Report, Reporter};
use crate::source::{Heard, TranscriptSource};
use crate::state::{DictationState, StopSignal};
use crate::stats::{SessionStats, Timer};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ended {
    /// A stop phrase was spoken
    Spoken,
    /// The stop signal was raised (Ctrl-C)
    Signal,
    /// The source ran out of input
    SourceClosed,
    /// The source kept failing
    SourceFailed,
}

const MAX_CONSECUTIVE_SOURCE_ERRORS: usize = 3;

pub struct Session {
    state: DictationState,
    tables: KeywordTables,
    fuzzy_stop: bool,
    stats: SessionStats,
    stop: StopSignal,
}

impl Session {
    pub fn new(tables: KeywordTables) -> Self {
        Self {
            state: DictationState::default(),
            tables,
            fuzzy_stop: false,
            stats: SessionStats::default(),
            stop: StopSignal::new(),
        }
    }

    pub fn with_fuzzy_stop(mut self, fuzzy_stop: bool) -> Self {
        self.fuzzy_stop = fuzzy_stop;
        self
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn state(&self) -> &DictationState {
        &self.state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn tables(&self) -> &KeywordTables {
        &self.tables
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Replace the keyword tables; takes effect from the next utterance
    pub fn reload_tables(&mut self, tables: KeywordTables) {
        log::info!("keyword tables reloaded");
        self.tables = tables;
    }

    /// Interpret a single utterance
    pub fn handle(
        &mut self,
        utterance: &str,
        editor: &mut dyn Editor,
        reporter: &mut dyn Reporter,
    ) -> Interpretation {
        reporter.report(Report::Heard(utterance));
        let before = self.state;
        let timer = Timer::start();
        let result = dictation::interpret(utterance, &mut self.state, &self.tables, self.fuzzy_stop, editor);
        timer.finish(&mut self.stats, &result);

        reporter.report(Report::Interpreted { utterance, result: &result });
        if self.state != before {
            reporter.report(Report::ModeChanged(&self.state));
        }
        result
    }

    /// Listen until a stop phrase, the stop signal, or the source closing
    pub async fn run(
        &mut self,
        source: &mut dyn TranscriptSource,
        editor: &mut dyn Editor,
        reporter: &mut dyn Reporter,
    ) -> Ended {
        reporter.report(Report::Listening(&self.state));
        let mut failures = 0;
        let ended = loop {
            if self.stop.is_stopped() {
                break Ended::Signal;
            }
            let heard = match source.listen().await {
                Ok(heard) => {
                    failures = 0;
                    heard
                }
                Err(err) => {
                    log::error!("transcription source failed: {:#}", err);
                    self.stats.record_source_error(self.state.mode);
                    reporter.report(Report::SourceFailed(&err));
                    failures += 1;
                    if failures >= MAX_CONSECUTIVE_SOURCE_ERRORS {
                        break Ended::SourceFailed;
                    }
                    continue;
                }
            };
            match heard {
                Heard::Utterance(text) => {
                    if self.handle(&text, editor, reporter).stop {
                        break Ended::Spoken;
                    }
                }
                Heard::Timeout => log::debug!("silence"),
                Heard::Closed => break Ended::SourceClosed,
            }
        };
        log::info!("session ended: {:?}", ended);
        reporter.report(Report::Stopped);
        ended
    }
}
