//! HTTP client for the document store management API.
//!
//! [`DocumentStoreApi`] is the seam the refresh pipeline talks to;
//! [`HttpDocumentStoreClient`] is the reqwest-backed implementation.

mod error;
mod variant;

pub use error::ApiError;
pub use variant::RefreshVariant;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use tracing::{info, trace, warn};

use crate::models::DocumentStore;

/// Path prefix of the document store endpoints.
pub const API_PREFIX: &str = "/api/v1/document-store";

/// Successful answer to a refresh request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshAck {
    pub status: u16,
    pub body: String,
}

/// Operations the refresh pipeline needs from the remote service.
///
/// Implementations are shared by reference between concurrently running
/// monitors and must not rely on exclusive access.
#[async_trait]
pub trait DocumentStoreApi: Send + Sync {
    /// Fetch every document store.
    async fn list_stores(&self) -> Result<Vec<DocumentStore>, ApiError>;

    /// Fetch a fresh snapshot of one store.
    async fn get_store(&self, store_id: &str) -> Result<DocumentStore, ApiError>;

    /// Send one refresh request using the given request shape.
    async fn request_refresh(
        &self,
        store_id: &str,
        variant: RefreshVariant,
    ) -> Result<RefreshAck, ApiError>;
}

/// reqwest-backed API client. Cheap to share; holds one connection pool.
#[derive(Clone)]
pub struct HttpDocumentStoreClient {
    client: Client,
    base_url: String,
}

impl HttpDocumentStoreClient {
    /// Create a client that authenticates every request with `api_key`.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| ApiError::Client(format!("invalid API key: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    /// Turn a non-success response into [`ApiError::Status`], keeping the body.
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl DocumentStoreApi for HttpDocumentStoreClient {
    async fn list_stores(&self) -> Result<Vec<DocumentStore>, ApiError> {
        let url = self.url("/store");
        info!("Fetching document stores from {}", url);

        let response = Self::check(self.client.get(&url).send().await?).await?;
        let data: serde_json::Value = response.json().await?;

        if !data.is_array() {
            warn!("Unexpected response format from {}: expected a JSON array", url);
            return Ok(Vec::new());
        }

        serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get_store(&self, store_id: &str) -> Result<DocumentStore, ApiError> {
        let url = self.url(&format!("/store/{}", store_id));
        trace!("Fetching status for store {}", store_id);

        let response = Self::check(self.client.get(&url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn request_refresh(
        &self,
        store_id: &str,
        variant: RefreshVariant,
    ) -> Result<RefreshAck, ApiError> {
        let url = self.url(&format!("/refresh/{}", store_id));
        trace!(%url, attempt = variant.position(), "{}", variant.description());

        let mut request = self.client.request(variant.method(), &url);
        if let Some(body) = variant.body() {
            request = request.json(&body);
        }

        let response = Self::check(request.send().await?).await?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        trace!(status, body = %body, "Refresh request accepted");

        Ok(RefreshAck { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building_trims_trailing_slash() {
        let client =
            HttpDocumentStoreClient::new("http://localhost:3000/", "key", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(
            client.url("/store/abc"),
            "http://localhost:3000/api/v1/document-store/store/abc"
        );
    }

    #[test]
    fn test_invalid_api_key_is_rejected() {
        let result =
            HttpDocumentStoreClient::new("http://localhost:3000", "bad\nkey", Duration::from_secs(5));
        assert!(matches!(result, Err(ApiError::Client(_))));
    }
}
