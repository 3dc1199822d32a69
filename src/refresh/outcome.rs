//! Final result of one store's refresh-and-monitor run.

use std::time::Duration;

use super::trigger::TriggerError;
use crate::utils::format_elapsed;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    /// The store reached a refreshable status again.
    Completed { final_status: String },
    /// The maximum refresh duration passed first.
    TimedOut { elapsed: Duration },
    /// No request shape was accepted, so nothing was polled.
    TriggerFailed { error: TriggerError },
}

/// Produced exactly once per monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    pub store_id: String,
    pub store_name: String,
    pub kind: OutcomeKind,
    pub duration: Duration,
    /// Number of successful status fetches.
    pub iterations: u32,
    pub initial_chunks: i64,
    /// Chunk count from the last successful fetch, if any.
    pub final_chunks: Option<i64>,
}

impl RefreshOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.kind, OutcomeKind::Completed { .. })
    }

    pub fn final_status(&self) -> Option<&str> {
        match &self.kind {
            OutcomeKind::Completed { final_status } => Some(final_status),
            _ => None,
        }
    }

    /// Short failure reason for the summary, `None` on success.
    pub fn error_message(&self) -> Option<String> {
        match &self.kind {
            OutcomeKind::Completed { .. } => None,
            OutcomeKind::TimedOut { elapsed } => {
                Some(format!("Timeout after {}", format_elapsed(*elapsed)))
            }
            OutcomeKind::TriggerFailed { .. } => Some("Failed to trigger refresh".to_string()),
        }
    }

    /// Final minus initial chunk count, if a final count was observed.
    pub fn chunk_change(&self) -> Option<i64> {
        self.final_chunks.map(|last| last - self.initial_chunks)
    }
}
