//! Refresh-and-monitor lifecycle for document stores.
//!
//! A refresh is started with [`trigger_refresh`], followed by
//! [`monitor_refresh`] until the store settles. [`run_all`] does both for
//! many stores concurrently.

mod clock;
mod events;
mod fleet;
mod monitor;
mod outcome;
mod trigger;

#[cfg(test)]
pub(crate) mod test_support;

pub use clock::{Clock, ManualClock, TokioClock};
pub use events::{NullReporter, RefreshEvent, RefreshReporter};
pub use fleet::{refresh_and_monitor, run_all, FleetReport};
pub use monitor::{
    monitor_refresh, MonitorSettings, MonitorState, PollSample, RefreshMonitor,
    DEFAULT_MAX_REFRESH_SECS, DEFAULT_POLL_INTERVAL_SECS,
};
pub use outcome::{OutcomeKind, RefreshOutcome};
pub use trigger::{trigger_refresh, AttemptFailure, TriggerError, SERVER_ERROR_HINTS};

use crate::client::DocumentStoreApi;

/// Collaborators shared read-only by every pipeline in a run.
#[derive(Clone, Copy)]
pub struct RefreshContext<'a> {
    pub api: &'a dyn DocumentStoreApi,
    pub clock: &'a dyn Clock,
    pub reporter: &'a dyn RefreshReporter,
    pub settings: MonitorSettings,
}
