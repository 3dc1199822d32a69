//! Runtime settings.
//!
//! Values arrive from command-line flags or their environment variables
//! (optionally loaded from `.env`). [`Settings::new`] validates them before
//! any network call is made.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::client::{ApiError, HttpDocumentStoreClient};
use crate::refresh::{MonitorSettings, DEFAULT_MAX_REFRESH_SECS, DEFAULT_POLL_INTERVAL_SECS};

pub const BASE_URL_VAR: &str = "FLOWISE_BASE_URL";
pub const API_KEY_VAR: &str = "FLOWISE_API_KEY";
pub const POLL_INTERVAL_VAR: &str = "STATUS_CHECK_INTERVAL";
pub const MAX_REFRESH_VAR: &str = "MAX_REFRESH_TIMEOUT";
pub const REQUEST_TIMEOUT_VAR: &str = "REQUEST_TIMEOUT";
pub const DEBUG_VAR: &str = "DEBUG";

/// Default per-request HTTP timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("Invalid base URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },
}

/// Unvalidated values as collected from flags and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSettings {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub poll_interval_secs: u64,
    pub max_refresh_secs: u64,
    pub request_timeout_secs: u64,
    pub debug: bool,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            max_refresh_secs: DEFAULT_MAX_REFRESH_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            debug: false,
        }
    }
}

/// Validated settings.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL without trailing slash.
    pub base_url: String,
    pub api_key: String,
    pub poll_interval: Duration,
    pub max_refresh: Duration,
    pub request_timeout: Duration,
    pub debug: bool,
}

impl Settings {
    pub fn new(raw: RawSettings) -> Result<Self, ConfigError> {
        let base_url = non_blank(raw.base_url).ok_or(ConfigError::Missing(BASE_URL_VAR))?;
        let api_key = non_blank(raw.api_key).ok_or(ConfigError::Missing(API_KEY_VAR))?;
        let base_url = validate_base_url(&base_url)?;

        if raw.poll_interval_secs == 0 {
            return Err(ConfigError::Zero(POLL_INTERVAL_VAR));
        }
        if raw.request_timeout_secs == 0 {
            return Err(ConfigError::Zero(REQUEST_TIMEOUT_VAR));
        }

        Ok(Self {
            base_url,
            api_key,
            poll_interval: Duration::from_secs(raw.poll_interval_secs),
            max_refresh: Duration::from_secs(raw.max_refresh_secs),
            request_timeout: Duration::from_secs(raw.request_timeout_secs),
            debug: raw.debug,
        })
    }

    pub fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            poll_interval: self.poll_interval,
            max_duration: self.max_refresh,
        }
    }

    /// Build the shared API client.
    pub fn client(&self) -> Result<HttpDocumentStoreClient, ApiError> {
        HttpDocumentStoreClient::new(&self.base_url, &self.api_key, self.request_timeout)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("base_url", &self.base_url)
            .field("api_key", &"***")
            .field("poll_interval", &self.poll_interval)
            .field("max_refresh", &self.max_refresh)
            .field("request_timeout", &self.request_timeout)
            .field("debug", &self.debug)
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_base_url(value: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        value: value.to_string(),
        reason,
    };

    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    Ok(value.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(base_url: &str, api_key: &str) -> RawSettings {
        RawSettings {
            base_url: Some(base_url.to_string()),
            api_key: Some(api_key.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::new(raw("http://localhost:3000/", "secret")).unwrap();
        assert_eq!(settings.base_url, "http://localhost:3000");
        assert_eq!(settings.poll_interval, Duration::from_secs(15));
        assert_eq!(settings.max_refresh, Duration::from_secs(600));
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert!(!settings.debug);

        let monitor = settings.monitor_settings();
        assert_eq!(monitor, MonitorSettings::default());
    }

    #[test]
    fn test_missing_values() {
        let mut missing_url = raw("", "secret");
        missing_url.base_url = None;
        assert_eq!(
            Settings::new(missing_url),
            Err(ConfigError::Missing(BASE_URL_VAR))
        );

        assert_eq!(
            Settings::new(raw("http://localhost:3000", "   ")),
            Err(ConfigError::Missing(API_KEY_VAR))
        );
    }

    #[test]
    fn test_invalid_url() {
        for bad in ["localhost:3000", "ftp://example.com", "not a url"] {
            let err = Settings::new(raw(bad, "secret")).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidUrl { .. }),
                "{bad}: {err:?}"
            );
        }
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut r = raw("https://flow.example.com", "secret");
        r.poll_interval_secs = 0;
        assert_eq!(Settings::new(r), Err(ConfigError::Zero(POLL_INTERVAL_VAR)));
    }

    #[test]
    fn test_debug_output_hides_api_key() {
        let settings = Settings::new(raw("https://flow.example.com", "topsecret")).unwrap();
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("topsecret"));
        assert!(debug.contains("***"));
    }
}
