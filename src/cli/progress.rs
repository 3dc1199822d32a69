//! Terminal rendering of refresh progress.
//!
//! Concurrent monitors report through one [`ConsoleReporter`]. Lines are
//! printed above a fleet progress bar that counts finished stores. Log
//! output goes through [`LogWriter`] so it lands above the bar as well.

use std::io;
use std::sync::{OnceLock, RwLock};
use std::time::Duration;

use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing_subscriber::fmt::MakeWriter;

use docstore_refresher::models::StatusBucket;
use docstore_refresher::refresh::{
    OutcomeKind, PollSample, RefreshEvent, RefreshOutcome, RefreshReporter, TriggerError,
};
use docstore_refresher::utils::{format_elapsed, format_number, format_signed};

use super::icons;

/// Progress display currently on screen, if any.
static ACTIVE_PROGRESS: OnceLock<RwLock<Option<MultiProgress>>> = OnceLock::new();

fn active_progress() -> &'static RwLock<Option<MultiProgress>> {
    ACTIVE_PROGRESS.get_or_init(|| RwLock::new(None))
}

fn set_active_progress(multi: Option<MultiProgress>) {
    if let Ok(mut guard) = active_progress().write() {
        *guard = multi;
    }
}

/// Print a diagnostic line above the active progress display.
/// Falls back to stderr when nothing is drawn.
fn progress_eprintln(message: &str) {
    if let Ok(guard) = active_progress().read() {
        if let Some(multi) = guard.as_ref().filter(|m| !m.is_hidden()) {
            let _ = multi.println(message);
            return;
        }
    }
    eprintln!("{}", message);
}

/// `tracing` writer that coordinates with the progress display.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogWriter;

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = LogLine;

    fn make_writer(&'a self) -> Self::Writer {
        LogLine::default()
    }
}

/// One formatted log event, emitted when dropped.
#[derive(Debug, Default)]
pub struct LogLine {
    buf: Vec<u8>,
}

impl io::Write for LogLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LogLine {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buf);
        let text = text.trim_end_matches('\n');
        if !text.is_empty() {
            progress_eprintln(text);
        }
    }
}

pub struct ConsoleReporter {
    multi: MultiProgress,
    bar: ProgressBar,
    debug: bool,
}

impl ConsoleReporter {
    /// Reporter for a run over `total` stores.
    pub fn new(total: usize, debug: bool) -> Self {
        let multi = MultiProgress::with_draw_target(ProgressDrawTarget::stdout());
        let bar = multi.add(ProgressBar::new(total as u64));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        bar.set_style(style);
        bar.set_message("Refreshing");
        bar.enable_steady_tick(Duration::from_millis(120));
        set_active_progress(Some(multi.clone()));

        Self { multi, bar, debug }
    }

    /// Remove the fleet bar once every store has finished.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
        set_active_progress(None);
    }

    fn println(&self, line: &str) {
        if self.multi.is_hidden() {
            println!("{}", line);
        } else {
            let _ = self.multi.println(line);
        }
    }
}

impl RefreshReporter for ConsoleReporter {
    fn report(&self, event: RefreshEvent) {
        if event.is_debug() && !self.debug {
            return;
        }
        for line in render_event(&event, self.debug) {
            self.println(&line);
        }
        if matches!(event, RefreshEvent::Finished { .. }) {
            self.bar.inc(1);
        }
    }
}

/// Lines printed for one event.
pub fn render_event(event: &RefreshEvent, debug: bool) -> Vec<String> {
    match event {
        RefreshEvent::TriggerAttempt { store_id, variant } => {
            let mut lines = vec![format!(
                "  DEBUG: {} attempting {}",
                store_id,
                variant.description()
            )];
            if let Some(body) = variant.body() {
                lines.push(format!("  DEBUG: Payload: {}", body));
            }
            lines
        }
        RefreshEvent::TriggerAttemptFailed {
            store_id,
            variant,
            error,
        } => vec![format!(
            "  DEBUG: {} failed with {}: {}",
            store_id,
            variant.description(),
            error
        )],
        RefreshEvent::TriggerSucceeded { store_id, variant } => vec![format!(
            "  DEBUG: {} accepted {}",
            store_id,
            variant.description()
        )],
        RefreshEvent::TriggerExhausted { store_name, error } => {
            render_trigger_failure(store_name, error)
        }
        RefreshEvent::MonitorStarted {
            store_name,
            initial_chunks,
        } => vec![
            icons::light_rule(),
            format!(
                "{} Started refresh for: {}",
                icons::info(),
                style(store_name).bold()
            ),
            format!("   Initial chunks: {}", format_number(*initial_chunks)),
            icons::light_rule(),
        ],
        RefreshEvent::PollFailed { store_name, error } => {
            let mut line = format!(
                "{} {}: Failed to fetch status, retrying...",
                icons::warn(),
                store_name
            );
            if debug {
                line.push_str(&format!(" ({})", error));
            }
            vec![line]
        }
        RefreshEvent::Polled {
            store_name,
            sample,
            next_check,
        } => render_sample(store_name, sample, *next_check),
        RefreshEvent::Finished { outcome } => render_finished(outcome),
    }
}

fn render_trigger_failure(store_name: &str, error: &TriggerError) -> Vec<String> {
    let mut lines = Vec::new();
    match error.last_status() {
        Some(status) => {
            lines.push(format!(
                "{} Failed to trigger refresh for {}: HTTP {}",
                icons::error(),
                store_name,
                status
            ));
            if let Some(body) = error.last_body().filter(|b| !b.is_empty()) {
                lines.push(format!("   API Response: {}", body));
            }
        }
        None => {
            let reason = error
                .last_failure()
                .map(|f| f.error.to_string())
                .unwrap_or_else(|| "no request was accepted".to_string());
            lines.push(format!(
                "{} Failed to trigger refresh for {}: {}",
                icons::error(),
                store_name,
                reason
            ));
        }
    }

    let hints = error.hints();
    if !hints.is_empty() {
        lines.push(format!(
            "{} Hint: HTTP 5xx indicates an internal server error.",
            style("→").yellow()
        ));
        lines.push("   Possible causes:".to_string());
        lines.extend(hints.iter().map(|cause| format!("   - {}", cause)));
    }
    lines
}

fn render_sample(store_name: &str, sample: &PollSample, next_check: Duration) -> Vec<String> {
    let check = style(format!("[Check #{}]", sample.iteration)).dim();
    let elapsed = format_elapsed(sample.elapsed);

    let plain_chunks = format!("   Chunks: {}", format_number(sample.chunks));
    let busy_chunks = match sample.delta {
        Some(delta) if delta != 0 => {
            let mut line = format!(
                "   Chunks: {} ({} since last check",
                format_number(sample.chunks),
                format_signed(delta)
            );
            if sample.missed_polls > 0 {
                line.push_str(&format!(", {} missed", sample.missed_polls));
            }
            line.push(')');
            line
        }
        _ => plain_chunks.clone(),
    };

    match sample.bucket {
        // The finished event prints the completion block.
        StatusBucket::Refreshable => Vec::new(),
        StatusBucket::Busy => vec![
            format!(
                "{} {}: {} {}",
                style("⟳").cyan(),
                store_name,
                style(&sample.status).cyan(),
                check
            ),
            busy_chunks,
            format!(
                "   Elapsed: {} | Next check in {}",
                elapsed,
                format_elapsed(next_check)
            ),
        ],
        StatusBucket::Waiting => vec![
            format!(
                "{} {}: {} (Awaiting update) {}",
                icons::warn(),
                store_name,
                style(&sample.status).yellow(),
                check
            ),
            plain_chunks,
            format!("   Elapsed: {}", elapsed),
        ],
        StatusBucket::Unknown => vec![
            format!(
                "{} {}: Status {} {}",
                style("?").dim(),
                store_name,
                sample.status,
                check
            ),
            plain_chunks,
            format!("   Elapsed: {}", elapsed),
        ],
    }
}

fn render_finished(outcome: &RefreshOutcome) -> Vec<String> {
    match &outcome.kind {
        OutcomeKind::Completed { final_status } => {
            let final_chunks = outcome.final_chunks.unwrap_or(outcome.initial_chunks);
            vec![
                format!(
                    "{} {}: Completed in {}",
                    icons::success(),
                    style(&outcome.store_name).bold(),
                    format_elapsed(outcome.duration)
                ),
                format!("   Final status: {}", final_status),
                format!(
                    "   Final chunks: {} (Initial: {})",
                    format_number(final_chunks),
                    format_number(outcome.initial_chunks)
                ),
                format!("   Total checks: {}", outcome.iterations),
                icons::light_rule(),
            ]
        }
        OutcomeKind::TimedOut { elapsed } => vec![
            format!(
                "{} {}: Timeout after {}",
                icons::error(),
                style(&outcome.store_name).bold(),
                format_elapsed(*elapsed)
            ),
            format!("   Total checks: {}", outcome.iterations),
            icons::light_rule(),
        ],
        // Already rendered by the exhausted trigger event.
        OutcomeKind::TriggerFailed { .. } => Vec::new(),
    }
}
