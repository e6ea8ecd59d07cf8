use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{ProviderError, get_json, require_key, trim_base};

const SERVICE: &str = "Google Geocoding";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Forward geocoding: free text to candidate places, best match first.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeResult>, ProviderError>;
}

#[derive(Clone)]
pub struct GoogleGeocoder {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleGeocoder {
    #[must_use]
    pub fn new(client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeResult>, ProviderError> {
        let key = require_key(SERVICE, self.api_key.as_deref())?;
        let url = format!(
            "{}/maps/api/geocode/json?address={}&key={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(key)
        );

        let response: GeocodeResponse = get_json(SERVICE, self.client.get(&url)).await?;

        match response.status.as_str() {
            "OK" | "ZERO_RESULTS" => {
                debug!(query, results = response.results.len(), "Geocoded query");
                Ok(response.results)
            }
            other => Err(ProviderError::Rejected {
                service: SERVICE,
                message: response
                    .error_message
                    .unwrap_or_else(|| other.to_string()),
            }),
        }
    }
}
