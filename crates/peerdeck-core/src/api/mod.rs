//! HTTP API client for the Peerdeck backend.
//!
//! All network access in Peerdeck funnels through [`ApiClient`]; no other
//! component issues requests. Every operation other than upload and
//! download follows the same standard contract:
//!
//! - the request payload, when present, is serialized as JSON;
//! - a 2xx response body is deserialized and returned unconditionally, and
//!   the caller inspects the payload's `success` flag for business-logic
//!   failures;
//! - a non-2xx response fails with [`Error::Request`] carrying the body's
//!   `message` field when one parses, else a generic message with the
//!   status code;
//! - transport failures are logged and re-signaled, never swallowed.
//!
//! There is no retry, timeout, or cancellation anywhere in the client; a
//! failed operation is retried only by the caller invoking it again.

mod types;
mod upload;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::{Error, Result};

pub use types::{
    AddPeerResponse, ApiResponse, FileDescriptor, FilesResponse, PeerDescriptor, PeersResponse,
    StatsResponse, StatsSnapshot,
};
pub use upload::UploadProgress;

/// Escape set for URL path segments, matching `encodeURIComponent`:
/// everything but `A-Za-z0-9 - _ . ! ~ * ' ( )` is percent-encoded.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode_component(raw: &str) -> String {
    percent_encoding::utf8_percent_encode(raw, COMPONENT).to_string()
}

/// Client for the backend HTTP API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// The configured backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Standard request/response exchange (everything but upload/download).
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(%method, endpoint, error = %e, "API request failed");
            Error::request(format!("request to {endpoint} failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| format!("HTTP error: status {}", status.as_u16()));
            tracing::error!(%method, endpoint, status = status.as_u16(), message = %message, "API request failed");
            return Err(Error::request(message));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!(%method, endpoint, error = %e, "API response was not valid JSON");
            Error::request(format!("invalid response from {endpoint}: {e}"))
        })
    }

    /// Fetch the backend's service description.
    pub async fn service_info(&self) -> Result<Value> {
        self.request(Method::GET, "/", None).await
    }

    /// Fetch the backend's health status.
    pub async fn health(&self) -> Result<Value> {
        self.request(Method::GET, "/api/health", None).await
    }

    /// List files in the backend's local storage.
    pub async fn list_files(&self) -> Result<FilesResponse> {
        self.request(Method::GET, "/api/files", None).await
    }

    /// Resolve the browser-facing download URL for a local file.
    #[must_use]
    pub fn download_url(&self, filename: &str) -> String {
        format!(
            "{}/api/files/download/{}",
            self.base_url,
            encode_component(filename)
        )
    }

    /// Trigger a download of a local file by handing its URL to the host
    /// environment.
    ///
    /// Fire-and-forget: the byte transfer happens outside this client's
    /// visibility, so only the triggering action can fail here.
    ///
    /// # Errors
    ///
    /// Returns an error if the host environment refuses to open the URL.
    pub fn download_file(&self, filename: &str) -> Result<()> {
        let url = self.download_url(filename);
        open::that_detached(&url)
            .map_err(|e| Error::request(format!("failed to open {url}: {e}")))
    }

    /// Delete a file from the backend's local storage.
    pub async fn delete_file(&self, filename: &str) -> Result<ApiResponse> {
        let endpoint = format!("/api/files/delete/{}", encode_component(filename));
        self.request(Method::DELETE, &endpoint, None).await
    }

    /// List all known peers along with the currently active subset.
    pub async fn list_peers(&self) -> Result<PeersResponse> {
        self.request(Method::GET, "/api/peers", None).await
    }

    /// Register a new peer by address.
    pub async fn add_peer(
        &self,
        ip: &str,
        port: u16,
        name: Option<&str>,
    ) -> Result<AddPeerResponse> {
        let mut body = json!({ "ip": ip, "port": port });
        if let Some(name) = name {
            body["name"] = json!(name);
        }
        self.request(Method::POST, "/api/peers/add", Some(body))
            .await
    }

    /// Remove a peer.
    pub async fn remove_peer(&self, peer_id: &str) -> Result<ApiResponse> {
        let endpoint = format!("/api/peers/remove/{}", encode_component(peer_id));
        self.request(Method::DELETE, &endpoint, None).await
    }

    /// Ask the backend to test reachability of a peer.
    pub async fn test_peer(&self, peer_id: &str) -> Result<ApiResponse> {
        let endpoint = format!("/api/peers/test/{}", encode_component(peer_id));
        self.request(Method::POST, &endpoint, None).await
    }

    /// List the files a peer is sharing.
    pub async fn peer_files(&self, peer_id: &str) -> Result<FilesResponse> {
        let endpoint = format!("/api/peers/{}/files", encode_component(peer_id));
        self.request(Method::GET, &endpoint, None).await
    }

    /// Ask the backend to fetch a peer's file into local storage.
    pub async fn download_from_peer(
        &self,
        peer_id: &str,
        filename: &str,
    ) -> Result<ApiResponse> {
        let body = json!({ "peer_id": peer_id, "filename": filename });
        self.request(Method::POST, "/api/peers/download", Some(body))
            .await
    }

    /// Force a refresh of peer liveness on the backend.
    pub async fn refresh_peers(&self) -> Result<ApiResponse> {
        self.request(Method::POST, "/api/peers/refresh", None).await
    }

    /// Fetch aggregate storage and peer counters.
    pub async fn stats(&self) -> Result<StatsResponse> {
        self.request(Method::GET, "/api/stats", None).await
    }
}

/// Minimal shape for extracting `message` from a non-2xx body.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}
