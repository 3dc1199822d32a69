//! Shared utility functions.

mod format;

pub use format::{format_elapsed, format_number, format_signed, format_timestamp, truncate};
