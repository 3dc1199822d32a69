//! Errors from talking to the document store API.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("Network error: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("HTTP {status}{}", body_suffix(.body))]
    Status { status: u16, body: String },
    /// The response body was not the JSON we expected.
    #[error("Invalid response: {0}")]
    Decode(String),
    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(String),
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body)
    }
}

impl ApiError {
    /// HTTP status code, if the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body for status errors, or the error message otherwise.
    pub fn body(&self) -> String {
        match self {
            ApiError::Status { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self.status_code(), Some(500..=599))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if e.is_builder() {
            ApiError::Client(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}
