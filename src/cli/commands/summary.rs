//! End-of-run summary.

use console::style;

use docstore_refresher::refresh::{FleetReport, RefreshOutcome};
use docstore_refresher::utils::{format_elapsed, format_number, format_signed};

use crate::cli::icons;

pub fn print_summary(report: &FleetReport) {
    for line in render_summary(report) {
        println!("{}", line);
    }
}

fn render_summary(report: &FleetReport) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        icons::heavy_rule(),
        style("REFRESH SUMMARY").bold().to_string(),
        icons::heavy_rule(),
    ];

    for outcome in &report.outcomes {
        lines.push(String::new());
        lines.extend(render_outcome(outcome));
    }

    lines.push(String::new());
    lines.push(icons::heavy_rule());
    lines.push(format!(
        "Total: {} | Successful: {} | Failed: {}",
        report.total(),
        style(report.successful()).green(),
        style(report.failed()).red()
    ));
    lines.push(format!(
        "Net Chunk Change: {} | Longest Run: {}",
        format_signed(report.net_chunk_change()),
        format_elapsed(report.longest_duration())
    ));
    lines.push(icons::heavy_rule());
    lines
}

fn render_outcome(outcome: &RefreshOutcome) -> Vec<String> {
    let icon = if outcome.is_success() {
        icons::success()
    } else {
        icons::error()
    };

    let final_chunks = outcome
        .final_chunks
        .map(format_number)
        .unwrap_or_else(|| "n/a".to_string());

    let mut lines = vec![
        format!("{} {}", icon, style(&outcome.store_name).bold()),
        format!("   Duration: {}", format_elapsed(outcome.duration)),
        format!("   Status Checks: {}", outcome.iterations),
        format!("   Initial Chunks: {}", format_number(outcome.initial_chunks)),
        format!("   Final Chunks: {}", final_chunks),
    ];

    match outcome.chunk_change() {
        Some(change) if change > 0 => {
            lines.push(format!("   Chunks Added: {}", format_signed(change)))
        }
        Some(change) if change < 0 => {
            lines.push(format!("   Chunks Changed: {}", format_signed(change)))
        }
        Some(_) => lines.push("   Chunks: No change".to_string()),
        None => {}
    }

    let result = match (outcome.final_status(), outcome.error_message()) {
        (Some(status), _) => style(format!("SUCCESS - Final Status: {}", status))
            .green()
            .to_string(),
        (None, Some(reason)) => style(format!("FAILED - {}", reason)).red().to_string(),
        (None, None) => style("FAILED").red().to_string(),
    };
    lines.push(format!("   Result: {}", result));
    lines
}
