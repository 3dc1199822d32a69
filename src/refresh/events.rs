//! Progress events emitted by the trigger, monitor and fleet.
//!
//! Core logic never prints. It hands events to a [`RefreshReporter`], which
//! the CLI renders to the terminal and tests record.

use std::time::Duration;

use super::monitor::PollSample;
use super::outcome::RefreshOutcome;
use super::trigger::TriggerError;
use crate::client::{ApiError, RefreshVariant};

#[derive(Debug, Clone)]
pub enum RefreshEvent {
    TriggerAttempt {
        store_id: String,
        variant: RefreshVariant,
    },
    TriggerAttemptFailed {
        store_id: String,
        variant: RefreshVariant,
        error: ApiError,
    },
    TriggerSucceeded {
        store_id: String,
        variant: RefreshVariant,
    },
    TriggerExhausted {
        store_name: String,
        error: TriggerError,
    },
    MonitorStarted {
        store_name: String,
        initial_chunks: i64,
    },
    PollFailed {
        store_name: String,
        error: ApiError,
    },
    Polled {
        store_name: String,
        sample: PollSample,
        next_check: Duration,
    },
    Finished {
        outcome: RefreshOutcome,
    },
}

impl RefreshEvent {
    /// Per-attempt trigger chatter, only interesting in debug mode.
    pub fn is_debug(&self) -> bool {
        matches!(
            self,
            RefreshEvent::TriggerAttempt { .. }
                | RefreshEvent::TriggerAttemptFailed { .. }
                | RefreshEvent::TriggerSucceeded { .. }
        )
    }
}

/// Receives progress events. Shared by all concurrently running monitors.
pub trait RefreshReporter: Send + Sync {
    fn report(&self, event: RefreshEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl RefreshReporter for NullReporter {
    fn report(&self, _event: RefreshEvent) {}
}
