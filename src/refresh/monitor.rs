//! Polling a store until its refresh settles.
//!
//! Each cycle first checks the overall deadline, then fetches the store. A
//! failed fetch is logged and retried after the poll interval; only the
//! deadline ends a monitor that never sees a refreshable status.

use std::time::{Duration, Instant};

use tracing::{trace, warn};

use super::events::RefreshEvent;
use super::outcome::{OutcomeKind, RefreshOutcome};
use super::trigger::TriggerError;
use super::RefreshContext;
use crate::models::{classify, DocumentStore, StatusBucket};

/// Default seconds between status checks.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;

/// Default maximum seconds to wait for a refresh.
pub const DEFAULT_MAX_REFRESH_SECS: u64 = 600;

/// Timing knobs for the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    pub poll_interval: Duration,
    pub max_duration: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_duration: Duration::from_secs(DEFAULT_MAX_REFRESH_SECS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Starting,
    Busy,
    Waiting,
    Unknown,
    Completed,
    TimedOut,
    TriggerFailed,
}

impl MonitorState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MonitorState::Completed | MonitorState::TimedOut | MonitorState::TriggerFailed
        )
    }
}

impl From<StatusBucket> for MonitorState {
    fn from(bucket: StatusBucket) -> Self {
        match bucket {
            StatusBucket::Refreshable => MonitorState::Completed,
            StatusBucket::Busy => MonitorState::Busy,
            StatusBucket::Waiting => MonitorState::Waiting,
            StatusBucket::Unknown => MonitorState::Unknown,
        }
    }
}

/// What one successful status fetch showed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSample {
    /// 1-based count of successful fetches.
    pub iteration: u32,
    /// Upper-cased status as reported.
    pub status: String,
    pub bucket: StatusBucket,
    pub chunks: i64,
    /// Change since the previous successful fetch; `None` for the first.
    pub delta: Option<i64>,
    /// Failed fetches between the previous successful fetch and this one.
    pub missed_polls: u32,
    /// Time since the monitor started, taken at the start of the cycle.
    pub elapsed: Duration,
}

/// Per-store session state. Owned by exactly one polling loop.
#[derive(Debug, Clone)]
pub struct RefreshMonitor {
    store: DocumentStore,
    started_at: Instant,
    state: MonitorState,
    iterations: u32,
    initial_chunks: i64,
    last_chunks: Option<i64>,
    missed_polls: u32,
    final_status: Option<String>,
    timed_out_after: Option<Duration>,
    trigger_error: Option<TriggerError>,
}

impl RefreshMonitor {
    pub fn new(store: DocumentStore, started_at: Instant) -> Self {
        let initial_chunks = store.chunks();
        Self {
            store,
            started_at,
            state: MonitorState::Starting,
            iterations: 0,
            initial_chunks,
            last_chunks: None,
            missed_polls: 0,
            final_status: None,
            timed_out_after: None,
            trigger_error: None,
        }
    }

    pub fn store_id(&self) -> &str {
        self.store.id_or_unknown()
    }

    pub fn store_name(&self) -> &str {
        self.store.display_name()
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn initial_chunks(&self) -> i64 {
        self.initial_chunks
    }

    pub fn last_chunks(&self) -> Option<i64> {
        self.last_chunks
    }

    /// A fetch failed; nothing was observed.
    pub fn record_fetch_failure(&mut self) {
        self.missed_polls += 1;
    }

    /// Apply a successful fetch and return what it showed.
    pub fn observe(&mut self, snapshot: &DocumentStore, elapsed: Duration) -> PollSample {
        debug_assert!(!self.is_terminal(), "observe() on a finished monitor");

        self.iterations += 1;

        let status = snapshot.status_or_unknown().to_uppercase();
        let bucket = classify(&status);
        let chunks = snapshot.chunks();
        let delta = self.last_chunks.map(|previous| chunks - previous);
        let missed_polls = std::mem::take(&mut self.missed_polls);

        self.last_chunks = Some(chunks);
        self.state = MonitorState::from(bucket);
        if bucket == StatusBucket::Refreshable {
            self.final_status = Some(status.clone());
        }

        PollSample {
            iteration: self.iterations,
            status,
            bucket,
            chunks,
            delta,
            missed_polls,
            elapsed,
        }
    }

    pub fn time_out(&mut self, elapsed: Duration) {
        self.state = MonitorState::TimedOut;
        self.timed_out_after = Some(elapsed);
    }

    pub fn fail_trigger(&mut self, error: TriggerError) {
        self.state = MonitorState::TriggerFailed;
        self.trigger_error = Some(error);
    }

    /// Consume a finished monitor. Returns `None` if it is still running.
    pub fn into_outcome(self, duration: Duration) -> Option<RefreshOutcome> {
        let store_id = self.store_id().to_string();
        let store_name = self.store_name().to_string();

        let kind = match self.state {
            MonitorState::Completed => OutcomeKind::Completed {
                final_status: self.final_status?,
            },
            MonitorState::TimedOut => OutcomeKind::TimedOut {
                elapsed: self.timed_out_after.unwrap_or(duration),
            },
            MonitorState::TriggerFailed => OutcomeKind::TriggerFailed {
                error: self.trigger_error?,
            },
            _ => return None,
        };

        Some(RefreshOutcome {
            store_id,
            store_name,
            kind,
            duration,
            iterations: self.iterations,
            initial_chunks: self.initial_chunks,
            final_chunks: self.last_chunks,
        })
    }
}

/// Poll until the store is refreshable again or the deadline passes.
pub async fn monitor_refresh(ctx: RefreshContext<'_>, mut monitor: RefreshMonitor) -> RefreshOutcome {
    let interval = ctx.settings.poll_interval;

    ctx.reporter.report(RefreshEvent::MonitorStarted {
        store_name: monitor.store_name().to_string(),
        initial_chunks: monitor.initial_chunks(),
    });

    while !monitor.is_terminal() {
        let elapsed = ctx.clock.now().saturating_duration_since(monitor.started_at());

        if elapsed > ctx.settings.max_duration {
            warn!(
                "{}: timed out after {:?} ({} checks)",
                monitor.store_name(),
                elapsed,
                monitor.iterations()
            );
            monitor.time_out(elapsed);
            break;
        }

        let snapshot = match ctx.api.get_store(monitor.store_id()).await {
            Ok(snapshot) => snapshot,
            Err(error) => {
                warn!(
                    "Failed to fetch status for store {}: {}",
                    monitor.store_id(),
                    error
                );
                monitor.record_fetch_failure();
                ctx.reporter.report(RefreshEvent::PollFailed {
                    store_name: monitor.store_name().to_string(),
                    error,
                });
                ctx.clock.sleep(interval).await;
                continue;
            }
        };

        let sample = monitor.observe(&snapshot, elapsed);
        trace!(
            "{}: {} [check #{}] chunks={} delta={:?}",
            monitor.store_name(),
            sample.status,
            sample.iteration,
            sample.chunks,
            sample.delta
        );

        ctx.reporter.report(RefreshEvent::Polled {
            store_name: monitor.store_name().to_string(),
            sample,
            next_check: interval,
        });

        if !monitor.is_terminal() {
            ctx.clock.sleep(interval).await;
        }
    }

    let duration = ctx.clock.now().saturating_duration_since(monitor.started_at());
    finish(ctx, monitor, duration)
}

/// Build the outcome of a terminal monitor and announce it.
pub(crate) fn finish(
    ctx: RefreshContext<'_>,
    monitor: RefreshMonitor,
    duration: Duration,
) -> RefreshOutcome {
    let store_id = monitor.store_id().to_string();
    let store_name = monitor.store_name().to_string();
    let iterations = monitor.iterations();
    let initial_chunks = monitor.initial_chunks();
    let final_chunks = monitor.last_chunks();

    // Callers only get here with a terminal monitor.
    let outcome = monitor.into_outcome(duration).unwrap_or(RefreshOutcome {
        store_id,
        store_name,
        kind: OutcomeKind::TimedOut { elapsed: duration },
        duration,
        iterations,
        initial_chunks,
        final_chunks,
    });

    ctx.reporter.report(RefreshEvent::Finished {
        outcome: outcome.clone(),
    });
    outcome
}
