//! Interactive store selection.

use std::io::{self, BufRead, Write};

use console::style;

use docstore_refresher::client::DocumentStoreApi;
use docstore_refresher::config::Settings;
use docstore_refresher::models::{partition_refreshable, DocumentStore};
use docstore_refresher::selection::parse_selection;
use docstore_refresher::utils::{format_number, truncate};

use super::list::{fetch_stores, print_header};
use super::refresh::refresh_stores;
use crate::cli::icons;

/// Width at which loader sources are cut in the menu.
const SOURCE_WIDTH: usize = 50;

pub async fn cmd_select(settings: &Settings, api: &dyn DocumentStoreApi) -> anyhow::Result<()> {
    print_header("Document Store Refresh", settings);
    let stores = fetch_stores(api).await?;

    let (refreshable, others) = partition_refreshable(stores);
    if refreshable.is_empty() {
        println!(
            "{} No stores are ready for refresh (UPSERTED status required).",
            icons::warn()
        );
        if !others.is_empty() {
            println!("Current store statuses:");
            for store in &others {
                println!(
                    "   - {}: {}",
                    store.display_name(),
                    store.status_or_unknown()
                );
            }
        }
        return Ok(());
    }

    // Blocking stdin stays off the runtime so Ctrl+C is still observed.
    let (refreshable, picked) = tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        let picked = prompt_selection(&refreshable, &mut input, &mut output);
        (refreshable, picked)
    })
    .await?;

    let Some(indices) = picked? else {
        println!("Exiting.");
        return Ok(());
    };

    let chosen: Vec<DocumentStore> = indices
        .into_iter()
        .filter_map(|idx| refreshable.get(idx - 1).cloned())
        .collect();
    refresh_stores(settings, api, chosen).await;
    Ok(())
}

fn render_menu(stores: &[DocumentStore]) -> Vec<String> {
    let mut lines = vec![
        icons::heavy_rule(),
        style("Refreshable Document Stores (UPSERTED status only)")
            .bold()
            .to_string(),
        icons::heavy_rule(),
    ];

    for (idx, store) in stores.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!("{}. {}", idx + 1, style(store.display_name()).bold()));
        lines.push(format!("   ID: {}", store.id_or_unknown()));
        lines.push(format!("   Chunks: {}", format_number(store.chunks())));
        for loader in &store.loaders {
            let source = loader
                .config
                .as_ref()
                .and_then(|c| c.source.as_deref())
                .unwrap_or("-");
            lines.push(format!(
                "   Loader: {} ({})",
                loader.name_or_unknown(),
                truncate(source, SOURCE_WIDTH)
            ));
        }
    }

    lines.push(String::new());
    lines.push(icons::heavy_rule());
    lines
}

/// Ask until a non-empty selection is confirmed.
///
/// Returns 1-based menu indices; `None` on `q` or end of input.
fn prompt_selection<R: BufRead, W: Write>(
    stores: &[DocumentStore],
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<Vec<usize>>> {
    for line in render_menu(stores) {
        writeln!(output, "{}", line)?;
    }
    writeln!(
        output,
        "Enter store numbers (e.g. 1,3,5-7), 'all' for every store, or 'q' to quit."
    )?;

    loop {
        let Some(answer) = ask(input, output, "Your selection: ")? else {
            return Ok(None);
        };
        if matches!(answer.to_lowercase().as_str(), "q" | "quit" | "exit") {
            return Ok(None);
        }

        let parsed = parse_selection(&answer, stores.len());
        for rejected in &parsed.rejected {
            writeln!(output, "{} {}", icons::warn(), rejected)?;
        }
        if parsed.indices.is_empty() {
            writeln!(
                output,
                "{} No valid stores selected. Please try again.",
                icons::error()
            )?;
            continue;
        }

        writeln!(output)?;
        writeln!(output, "You selected {} store(s):", parsed.indices.len())?;
        for idx in &parsed.indices {
            writeln!(output, "   - {}", stores[idx - 1].short_label())?;
        }

        let Some(confirm) = ask(input, output, "Proceed with refresh? (y/n): ")? else {
            return Ok(None);
        };
        if matches!(confirm.to_lowercase().as_str(), "y" | "yes") {
            return Ok(Some(parsed.indices));
        }
        writeln!(output, "Selection cancelled. Choose again or 'q' to quit.")?;
    }
}

/// Print a prompt and read one trimmed line; `None` at end of input.
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
