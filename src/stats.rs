//! Per-request outcome counters.
//!
//! Soft failures never reach the host runner as errors, so they are counted
//! here. One [`TaskStats`] is shared by every simulated user.

use dashmap::DashMap;
use std::fmt::Display;

/// What happened to one invocation of a setup step or task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Skipped,
    Failed,
}

/// Counters for one request name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub succeeded: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl Counts {
    pub fn total(&self) -> u64 {
        self.succeeded + self.skipped + self.failed
    }
}

/// Outcome counters keyed by request name (`Get Owners`, `Create Pet`, ...).
#[derive(Debug, Default)]
pub struct TaskStats {
    counts: DashMap<&'static str, Counts>,
}

impl TaskStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: &'static str, outcome: Outcome) {
        let mut entry = self.counts.entry(name).or_default();
        match outcome {
            Outcome::Succeeded => entry.succeeded += 1,
            Outcome::Skipped => entry.skipped += 1,
            Outcome::Failed => entry.failed += 1,
        }
    }

    pub fn get(&self, name: &str) -> Counts {
        self.counts.get(name).map(|c| *c).unwrap_or_default()
    }

    /// All counters, sorted by name.
    pub fn snapshot(&self) -> Vec<(&'static str, Counts)> {
        let mut rows: Vec<_> = self
            .counts
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        rows.sort_by_key(|(name, _)| *name);
        rows
    }

    pub fn total_failed(&self) -> u64 {
        self.counts.iter().map(|entry| entry.value().failed).sum()
    }

    /// Plain-text table for the end-of-run summary.
    pub fn render(&self) -> String {
        let mut out = row("Request", "Succeeded", "Skipped", "Failed");
        let mut totals = Counts::default();
        for (name, counts) in self.snapshot() {
            out.push_str(&row(name, counts.succeeded, counts.skipped, counts.failed));
            totals.succeeded += counts.succeeded;
            totals.skipped += counts.skipped;
            totals.failed += counts.failed;
        }
        out.push_str(&row(
            "Aggregated",
            totals.succeeded,
            totals.skipped,
            totals.failed,
        ));
        out
    }
}

fn row(name: &str, succeeded: impl Display, skipped: impl Display, failed: impl Display) -> String {
    format!(
        "{:<14} {:>10} {:>10} {:>10}\n",
        name, succeeded, skipped, failed
    )
}
