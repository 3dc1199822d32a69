//! Refreshing many stores at once.
//!
//! Every store gets its own trigger-then-monitor pipeline. All pipelines start
//! together and are joined on the calling task; none shares mutable state with
//! another and a failure in one never affects the rest.

use std::time::Duration;

use futures::future::join_all;
use tracing::info;

use super::events::RefreshEvent;
use super::monitor::{finish, monitor_refresh, RefreshMonitor};
use super::outcome::RefreshOutcome;
use super::trigger::trigger_refresh;
use super::RefreshContext;
use crate::models::DocumentStore;

/// Trigger a refresh for one store and monitor it to the end.
///
/// A rejected trigger short-circuits to a failed outcome without polling.
pub async fn refresh_and_monitor(ctx: RefreshContext<'_>, store: DocumentStore) -> RefreshOutcome {
    let mut monitor = RefreshMonitor::new(store, ctx.clock.now());

    match trigger_refresh(ctx.api, ctx.reporter, monitor.store_id()).await {
        Ok(variant) => {
            info!("Refresh started for {} ({})", monitor.store_name(), variant);
            monitor_refresh(ctx, monitor).await
        }
        Err(error) => {
            ctx.reporter.report(RefreshEvent::TriggerExhausted {
                store_name: monitor.store_name().to_string(),
                error: error.clone(),
            });
            monitor.fail_trigger(error);
            let duration = ctx.clock.now().saturating_duration_since(monitor.started_at());
            finish(ctx, monitor, duration)
        }
    }
}

/// Run every store's pipeline concurrently. One outcome per store, in input order.
pub async fn run_all(ctx: RefreshContext<'_>, stores: Vec<DocumentStore>) -> FleetReport {
    info!("Starting refresh for {} store(s)", stores.len());

    let outcomes = join_all(
        stores
            .into_iter()
            .map(|store| refresh_and_monitor(ctx, store)),
    )
    .await;

    FleetReport { outcomes }
}

/// Aggregated results of a fleet run.
#[derive(Debug, Clone, Default)]
pub struct FleetReport {
    pub outcomes: Vec<RefreshOutcome>,
}

impl FleetReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.successful()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    /// Sum of per-store chunk changes where a final count was observed.
    pub fn net_chunk_change(&self) -> i64 {
        self.outcomes.iter().filter_map(|o| o.chunk_change()).sum()
    }

    /// Wall time of the slowest pipeline.
    pub fn longest_duration(&self) -> Duration {
        self.outcomes
            .iter()
            .map(|o| o.duration)
            .max()
            .unwrap_or_default()
    }
}
