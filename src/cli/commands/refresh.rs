//! Non-interactive refresh by id, name or `--all`.

use console::style;

use docstore_refresher::client::DocumentStoreApi;
use docstore_refresher::config::Settings;
use docstore_refresher::models::{partition_refreshable, DocumentStore};
use docstore_refresher::refresh::{run_all, RefreshContext, TokioClock};
use docstore_refresher::selection::{find_stores_by_criteria, SelectionCriteria};

use super::list::{fetch_stores, print_compact_list, print_header};
use super::summary::print_summary;
use crate::cli::icons;
use crate::cli::progress::ConsoleReporter;

pub async fn cmd_refresh(
    settings: &Settings,
    api: &dyn DocumentStoreApi,
    criteria: SelectionCriteria,
    list_only: bool,
) -> anyhow::Result<()> {
    print_header("Document Store Refresh", settings);
    let stores = fetch_stores(api).await?;

    if stores.is_empty() {
        println!(
            "{} No document stores found. Please create some document stores first.",
            icons::warn()
        );
        return Ok(());
    }

    if list_only {
        print_compact_list(&stores);
        return Ok(());
    }

    if criteria.is_empty() {
        eprintln!(
            "{} No stores specified. Use --id, --name or --all (or --list to see stores).",
            icons::error()
        );
        std::process::exit(1);
    }

    let matched = find_stores_by_criteria(&stores, &criteria);
    if matched.is_empty() {
        eprintln!(
            "{} No document stores matched the given criteria.",
            icons::error()
        );
        std::process::exit(1);
    }

    let (refreshable, skipped) = partition_refreshable(matched);
    if !skipped.is_empty() {
        println!(
            "{} Skipping {} store(s) that are not ready for refresh:",
            icons::warn(),
            skipped.len()
        );
        for store in &skipped {
            println!(
                "   - {} (Status: {})",
                store.display_name(),
                store.status_or_unknown()
            );
        }
        println!();
    }

    if refreshable.is_empty() {
        println!("{} No stores to refresh.", icons::warn());
        return Ok(());
    }

    refresh_stores(settings, api, refreshable).await;
    Ok(())
}

/// Refresh and monitor `stores` concurrently, then print the summary.
pub(super) async fn refresh_stores(
    settings: &Settings,
    api: &dyn DocumentStoreApi,
    stores: Vec<DocumentStore>,
) {
    println!(
        "{} Refreshing {} store(s):",
        icons::info(),
        style(stores.len()).bold()
    );
    for store in &stores {
        println!("   - {}", store.short_label());
    }
    println!();

    let reporter = ConsoleReporter::new(stores.len(), settings.debug);
    let clock = TokioClock;
    let ctx = RefreshContext {
        api,
        clock: &clock,
        reporter: &reporter,
        settings: settings.monitor_settings(),
    };

    let report = run_all(ctx, stores).await;
    reporter.finish();
    print_summary(&report);
}
