//! Outbound clients for the third-party data providers.
//!
//! Each client knows its provider's URL layout and wire format. Category
//! providers implement [`Provider`], which hands back already normalized
//! records; the geocoder is separate because locations are not cached by TTL.

pub mod darksky;
pub mod eventbrite;
pub mod geocode;
pub mod hiking;
pub mod tmdb;
pub mod yelp;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{service} request failed: {source}")]
    Request {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("{service} returned a malformed body: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    #[error("{service} rejected the request: {message}")]
    Rejected {
        service: &'static str,
        message: String,
    },

    #[error("{service} API key is not configured")]
    MissingCredential { service: &'static str },
}

impl ProviderError {
    #[must_use]
    pub const fn service(&self) -> &'static str {
        match self {
            Self::Request { service, .. }
            | Self::Status { service, .. }
            | Self::Decode { service, .. }
            | Self::Rejected { service, .. }
            | Self::MissingCredential { service } => service,
        }
    }
}

/// A category data source: one outbound call, normalized into records.
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    /// What the provider needs to locate data (coordinates, a query, ...).
    type Params: Send + Sync;

    type Record: Send;

    fn name(&self) -> &'static str;

    async fn fetch(&self, params: &Self::Params) -> Result<Vec<Self::Record>, ProviderError>;
}

/// Build the HTTP client shared by every provider.
/// One client keeps a single connection pool for all outbound calls.
pub fn build_http_client(timeout: Duration) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("CityExplorer/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// Returns the configured key, or `MissingCredential` when it is absent or blank.
pub(crate) fn require_key<'a>(
    service: &'static str,
    key: Option<&'a str>,
) -> Result<&'a str, ProviderError> {
    match key.map(str::trim) {
        Some(k) if !k.is_empty() => Ok(k),
        _ => Err(ProviderError::MissingCredential { service }),
    }
}

/// Send a request and decode the JSON body, mapping every failure to a
/// [`ProviderError`] tagged with `service`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    service: &'static str,
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|source| ProviderError::Request { service, source })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Status {
            service,
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|source| ProviderError::Request { service, source })?;

    debug!(service, bytes = bytes.len(), "Provider response received");

    serde_json::from_slice(&bytes).map_err(|e| ProviderError::Decode {
        service,
        message: e.to_string(),
    })
}

/// Strip a trailing slash so paths can be appended with `format!`.
pub(crate) fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
