//! Store listings.

use std::collections::BTreeMap;

use anyhow::Context;
use chrono::Local;
use console::style;

use docstore_refresher::client::DocumentStoreApi;
use docstore_refresher::config::Settings;
use docstore_refresher::models::DocumentStore;
use docstore_refresher::utils::{format_number, format_timestamp, truncate};

use crate::cli::icons;

/// List every store with full details.
pub async fn cmd_list(settings: &Settings, api: &dyn DocumentStoreApi) -> anyhow::Result<()> {
    print_header("Document Stores", settings);
    let stores = fetch_stores(api).await?;

    if stores.is_empty() {
        println!("{} No document stores found.", icons::warn());
        return Ok(());
    }

    println!(
        "{} Found {} document store(s)",
        icons::success(),
        stores.len()
    );
    println!();
    for line in render_status_summary(&stores) {
        println!("{}", line);
    }
    for (idx, store) in stores.iter().enumerate() {
        println!();
        for line in render_store_details(idx + 1, store) {
            println!("{}", line);
        }
    }
    println!();
    println!("{}", icons::heavy_rule());
    Ok(())
}

/// Banner printed before any command output.
pub(super) fn print_header(title: &str, settings: &Settings) {
    println!("{}", icons::heavy_rule());
    println!(
        "{:<50} Last updated: {}",
        style(title).bold(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("{}", icons::heavy_rule());
    println!("Base URL: {}", settings.base_url);
    println!();
}

/// Fetch the full listing. Failure here ends the command.
pub(super) async fn fetch_stores(api: &dyn DocumentStoreApi) -> anyhow::Result<Vec<DocumentStore>> {
    println!("{} Fetching document stores...", icons::info());
    api.list_stores()
        .await
        .context("Failed to fetch document stores")
}

/// Compact one-block-per-store listing.
pub(super) fn print_compact_list(stores: &[DocumentStore]) {
    println!("{}", icons::heavy_rule());
    println!("{}", style("Available Document Stores").bold());
    println!("{}", icons::heavy_rule());
    for (idx, store) in stores.iter().enumerate() {
        println!();
        println!("{}. {}", idx + 1, style(store.display_name()).bold());
        println!("   ID: {}", store.id_or_unknown());
        println!("   Status: {}", store.status_or_unknown());
        println!("   Chunks: {}", format_number(store.chunks()));
        println!("   Loaders: {}", store.loaders.len());
    }
    println!();
    println!("{}", icons::heavy_rule());
}

fn render_status_summary(stores: &[DocumentStore]) -> Vec<String> {
    let mut by_status: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for store in stores {
        by_status
            .entry(store.status_or_unknown())
            .or_default()
            .push(store.display_name());
    }

    let mut lines = vec![style("Summary by Status").bold().to_string()];
    for (status, names) in by_status {
        lines.push(format!("  {} ({}):", status, names.len()));
        lines.extend(names.into_iter().map(|name| format!("    - {}", name)));
    }
    lines
}

fn render_store_details(position: usize, store: &DocumentStore) -> Vec<String> {
    let mut lines = vec![
        icons::light_rule(),
        format!("{}. {}", position, style(store.display_name()).bold()),
        icons::light_rule(),
        format!("   ID: {}", store.id_or_unknown()),
        format!("   Status: {}", store.status_or_unknown()),
    ];

    if let Some(description) = store.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("   Description: {}", description));
    }
    lines.push(format!("   Total Chunks: {}", format_number(store.chunks())));
    lines.push(format!("   Total Characters: {}", format_number(store.chars())));

    if store.loaders.is_empty() {
        lines.push("   Loaders: none".to_string());
    } else {
        lines.push(format!("   Loaders ({}):", store.loaders.len()));
        for loader in &store.loaders {
            lines.push(format!(
                "     - {} [{}]",
                loader.name_or_unknown(),
                loader.status.as_deref().unwrap_or("UNKNOWN")
            ));
            let Some(config) = &loader.config else {
                continue;
            };
            let fields = [
                ("Source", config.source.clone()),
                ("Source Type", config.source_type.clone()),
                ("File Type", config.file_type.clone()),
                ("URL", config.url.clone()),
                ("Directory", config.directory_path.clone()),
                ("Recursive", config.recursive.map(|r| r.to_string())),
            ];
            for (label, value) in fields {
                if let Some(value) = value {
                    lines.push(format!("       {}: {}", label, truncate(&value, 70)));
                }
            }
            if let Some(splitter) = &config.text_splitter {
                let show = |v: &Option<serde_json::Value>| {
                    v.as_ref()
                        .map(|v| v.to_string().trim_matches('"').to_string())
                        .unwrap_or_else(|| "-".to_string())
                };
                lines.push(format!(
                    "       Chunk Size: {} | Overlap: {}",
                    show(&splitter.chunk_size),
                    show(&splitter.chunk_overlap)
                ));
            }
        }
    }

    if let Some(name) = store
        .vector_store_config
        .as_ref()
        .and_then(|v| v.name.as_deref())
    {
        lines.push(format!("   Vector Store: {}", name));
    }
    if let Some(name) = store
        .embedding_config
        .as_ref()
        .and_then(|e| e.name.as_deref())
    {
        lines.push(format!("   Embedding Model: {}", name));
    }
    if let Some(created) = &store.created_date {
        lines.push(format!("   Created: {}", format_timestamp(created)));
    }
    if let Some(updated) = &store.updated_date {
        lines.push(format!("   Updated: {}", format_timestamp(updated)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(lines: Vec<String>) -> String {
        console::strip_ansi_codes(&lines.join("\n")).to_string()
    }

    fn store(json: serde_json::Value) -> DocumentStore {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_status_summary_sorted_by_status() {
        let stores = vec![
            store(serde_json::json!({"name": "Wiki", "status": "UPSERTED"})),
            store(serde_json::json!({"name": "Handbook", "status": "STALE"})),
            store(serde_json::json!({"name": "Docs", "status": "UPSERTED"})),
            store(serde_json::json!({})),
        ];
        let text = text(render_status_summary(&stores));

        let stale = text.find("STALE (1):").unwrap();
        let unknown = text.find("UNKNOWN (1):").unwrap();
        let upserted = text.find("UPSERTED (2):").unwrap();
        assert!(stale < unknown && unknown < upserted, "{text}");
        assert!(text.contains("    - Unnamed Store"));
    }

    #[test]
    fn test_store_details() {
        let s = store(serde_json::json!({
            "id": "store-1",
            "name": "Handbook",
            "status": "UPSERTED",
            "description": "HR policies",
            "totalChunks": 12345,
            "totalChars": 987654,
            "loaders": [{
                "loaderName": "PDF File",
                "status": "SYNC",
                "config": {
                    "source": "handbook.pdf",
                    "recursive": true,
                    "textSplitter": {"chunkSize": 1000, "chunkOverlap": "200"}
                }
            }],
            "vectorStoreConfig": {"name": "pinecone"},
            "embeddingConfig": {"name": "openAIEmbeddings"},
            "createdDate": "2024-03-01T10:15:30.000Z"
        }));
        let text = text(render_store_details(2, &s));

        assert!(text.contains("2. Handbook"), "{text}");
        assert!(text.contains("Description: HR policies"));
        assert!(text.contains("Total Chunks: 12,345"));
        assert!(text.contains("Total Characters: 987,654"));
        assert!(text.contains("- PDF File [SYNC]"));
        assert!(text.contains("Source: handbook.pdf"));
        assert!(text.contains("Recursive: true"));
        assert!(text.contains("Chunk Size: 1000 | Overlap: 200"));
        assert!(text.contains("Vector Store: pinecone"));
        assert!(text.contains("Embedding Model: openAIEmbeddings"));
        assert!(text.contains("Created: 2024-03-01 10:15:30 UTC"));
        assert!(!text.contains("Updated:"));
    }

    #[test]
    fn test_store_without_loaders() {
        let text = text(render_store_details(1, &DocumentStore::default()));
        assert!(text.contains("Loaders: none"));
        assert!(text.contains("ID: unknown"));
    }
}
