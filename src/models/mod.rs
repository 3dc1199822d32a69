//! Data models for the document store API.

mod status;
mod store;

pub use status::{
    classify, filter_refreshable, partition_refreshable, StatusBucket, BUSY_STATUSES,
    REFRESHABLE_STATUSES, WAITING_STATUSES,
};
pub use store::{
    DocumentStore, EmbeddingConfig, Loader, LoaderConfig, TextSplitter, VectorStoreConfig,
    UNNAMED_STORE,
};
