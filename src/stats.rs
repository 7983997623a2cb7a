//! Per-session counters and interpretation timings

use crate::dictation::Interpretation;
use crate::outcome::Outcome;
use crate::state::Mode;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub outcomes: HashMap<Outcome, usize>,
    pub modes: HashMap<Mode, usize>,
    pub interpretation: Vec<Duration>,
    pub source_errors: usize,
}

const MODES: [Mode; 3] = [Mode::Command, Mode::Dictate, Mode::Spell];

impl SessionStats {
    pub fn record(&mut self, result: &Interpretation, duration: Duration) {
        *self.outcomes.entry(result.outcome).or_default() += 1;
        *self.modes.entry(result.mode).or_default() += 1;
        self.interpretation.push(duration);
    }

    /// A source error counts as a failed utterance in the current mode
    pub fn record_source_error(&mut self, mode: Mode) {
        self.source_errors += 1;
        *self.outcomes.entry(Outcome::ExecutionFailed).or_default() += 1;
        *self.modes.entry(mode).or_default() += 1;
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn count_mode(&self, mode: Mode) -> usize {
        self.modes.get(&mode).copied().unwrap_or(0)
    }

    pub fn utterances(&self) -> usize {
        self.outcomes.values().sum()
    }

    pub fn summary(&self) -> String {
        let mut out = String::new();
        if self.utterances() == 0 {
            out.push_str("No utterances recorded.\n");
            return out;
        }

        out.push_str(&format!("Utterances: {}\n", self.utterances()));
        for outcome in Outcome::ALL {
            let n = self.count(outcome);
            if n > 0 {
                out.push_str(&format!("  {:<20} {}\n", outcome.to_string(), n));
            }
        }
        for mode in MODES {
            let n = self.count_mode(mode);
            if n > 0 {
                out.push_str(&format!("  {:<20} {}\n", format!("{} mode", mode), n));
            }
        }
        if self.source_errors > 0 {
            out.push_str(&format!("  {:<20} {}\n", "source errors", self.source_errors));
        }

        if let Some((avg, min, max, total)) = Self::calc(&self.interpretation) {
            out.push_str(&format!(
                "Interpretation (n={}): avg={:.2}ms min={:.2}ms max={:.2}ms total={:.1}ms\n",
                self.interpretation.len(),
                millis(avg),
                millis(min),
                millis(max),
                millis(total)
            ));
        }
        out
    }

    fn calc(samples: &[Duration]) -> Option<(Duration, Duration, Duration, Duration)> {
        let min = samples.iter().min().copied()?;
        let max = samples.iter().max().copied()?;
        let total: Duration = samples.iter().sum();
        let avg = total / samples.len() as u32;
        Some((avg, min, max, total))
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Measures one interpretation
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub fn finish(self, stats: &mut SessionStats, result: &Interpretation) {
        stats.record(result, self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(mode: Mode, outcome: Outcome) -> Interpretation {
        Interpretation { mode, outcome, stop: false }
    }

    #[test]
    fn test_counts() {
        let mut s = SessionStats::default();
        s.record(&result(Mode::Command, Outcome::Success), Duration::from_millis(2));
        s.record(&result(Mode::Command, Outcome::InvalidArgument), Duration::from_millis(4));
        s.record(&result(Mode::Dictate, Outcome::Success), Duration::from_millis(6));
        s.record_source_error(Mode::Dictate);

        assert_eq!(s.utterances(), 4);
        assert_eq!(s.count(Outcome::Success), 2);
        assert_eq!(s.count(Outcome::ExecutionFailed), 1);
        assert_eq!(s.count_mode(Mode::Dictate), 2);
        assert_eq!(s.count_mode(Mode::Spell), 0);
    }

    #[test]
    fn test_summary() {
        let mut s = SessionStats::default();
        assert_eq!(s.summary(), "No utterances recorded.\n");

        s.record(&result(Mode::Command, Outcome::Success), Duration::from_millis(2));
        s.record(&result(Mode::Command, Outcome::Success), Duration::from_millis(4));
        let summary = s.summary();
        assert!(summary.contains("Utterances: 2"));
        assert!(summary.contains("avg=3.00ms min=2.00ms max=4.00ms"));
        assert!(!summary.contains("invalid argument"));
    }
}
