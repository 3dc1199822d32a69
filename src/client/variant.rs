//! Request shapes for starting a refresh.
//!
//! Deployments disagree on what the refresh endpoint accepts, so callers walk
//! [`RefreshVariant::FALLBACK_ORDER`] until one shape is accepted.

use std::fmt;

use reqwest::Method;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshVariant {
    PostNoBody,
    PostEmptyObject,
    PostEmptyItems,
    PutNoBody,
    PutEmptyObject,
}

impl RefreshVariant {
    /// Order in which the shapes are tried. Each is tried once.
    pub const FALLBACK_ORDER: [RefreshVariant; 5] = [
        RefreshVariant::PostNoBody,
        RefreshVariant::PostEmptyObject,
        RefreshVariant::PostEmptyItems,
        RefreshVariant::PutNoBody,
        RefreshVariant::PutEmptyObject,
    ];

    pub fn method(&self) -> Method {
        match self {
            Self::PostNoBody | Self::PostEmptyObject | Self::PostEmptyItems => Method::POST,
            Self::PutNoBody | Self::PutEmptyObject => Method::PUT,
        }
    }

    /// JSON body to send, `None` for an empty request body.
    pub fn body(&self) -> Option<Value> {
        match self {
            Self::PostNoBody | Self::PutNoBody => None,
            Self::PostEmptyObject | Self::PutEmptyObject => Some(json!({})),
            Self::PostEmptyItems => Some(json!({ "items": [] })),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::PostNoBody => "POST with no body",
            Self::PostEmptyObject => "POST with empty JSON object",
            Self::PostEmptyItems => "POST with empty items array",
            Self::PutNoBody => "PUT with no body",
            Self::PutEmptyObject => "PUT with empty JSON object",
        }
    }

    /// 1-based position in the fallback chain.
    pub fn position(&self) -> usize {
        Self::FALLBACK_ORDER
            .iter()
            .position(|v| v == self)
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

impl fmt::Display for RefreshVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
