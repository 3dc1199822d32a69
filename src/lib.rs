//! Document store refresher.
//!
//! Lists document stores on a document-ingestion management API, triggers
//! re-indexing ("refresh") of selected stores, and polls each one until the
//! refresh settles or times out.

pub mod client;
pub mod config;
pub mod models;
pub mod refresh;
pub mod selection;
pub mod utils;
