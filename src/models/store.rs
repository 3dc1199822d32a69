//! Document store records as returned by the management API.
//!
//! Every field is optional on the wire. The accessors apply the display
//! fallbacks used throughout the CLI.

use serde::{Deserialize, Serialize};

use super::status::{classify, StatusBucket};

/// Name shown for stores without one.
pub const UNNAMED_STORE: &str = "Unnamed Store";

/// Read snapshot of a document store. Owned by the remote service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentStore {
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
    pub total_chunks: Option<i64>,
    pub total_chars: Option<i64>,
    pub description: Option<String>,
    pub loaders: Vec<Loader>,
    pub vector_store_config: Option<VectorStoreConfig>,
    pub embedding_config: Option<EmbeddingConfig>,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
}

/// A configured ingestion source attached to a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Loader {
    pub id: Option<String>,
    pub loader_name: Option<String>,
    pub status: Option<String>,
    pub config: Option<LoaderConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoaderConfig {
    pub source: Option<String>,
    pub source_type: Option<String>,
    pub file_type: Option<String>,
    pub url: Option<String>,
    pub directory_path: Option<String>,
    pub recursive: Option<bool>,
    pub text_splitter: Option<TextSplitter>,
}

/// Splitter settings. Values are kept as raw JSON since deployments
/// disagree on whether they are numbers or strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSplitter {
    pub chunk_size: Option<serde_json::Value>,
    pub chunk_overlap: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VectorStoreConfig {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmbeddingConfig {
    pub name: Option<String>,
}

impl DocumentStore {
    pub fn id_or_unknown(&self) -> &str {
        self.id.as_deref().unwrap_or("unknown")
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_STORE)
    }

    pub fn status_or_unknown(&self) -> &str {
        self.status.as_deref().unwrap_or("UNKNOWN")
    }

    pub fn chunks(&self) -> i64 {
        self.total_chunks.unwrap_or(0)
    }

    pub fn chars(&self) -> i64 {
        self.total_chars.unwrap_or(0)
    }

    /// Current status bucket of this snapshot.
    pub fn bucket(&self) -> StatusBucket {
        classify(self.status_or_unknown())
    }

    /// One-line label: `name (ID: abcd1234..., Status: UPSERTED)`.
    pub fn short_label(&self) -> String {
        let id: String = self.id_or_unknown().chars().take(8).collect();
        format!(
            "{} (ID: {}..., Status: {})",
            self.display_name(),
            id,
            self.status_or_unknown()
        )
    }
}

impl Loader {
    pub fn name_or_unknown(&self) -> &str {
        self.loader_name.as_deref().unwrap_or("Unknown")
    }
}
