use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// The `?data=` query parameter every endpoint takes.
#[derive(Debug, Deserialize)]
pub struct DataQuery {
    pub data: Option<String>,
}

/// Payload for the coordinate-based categories (`/weather`, `/trails`).
#[derive(Debug, Deserialize)]
pub struct CoordinatesRequest {
    pub id: i32,
    pub latitude: f64,
    pub longitude: f64,
}

/// Payload for `/events`.
#[derive(Debug, Deserialize)]
pub struct AddressRequest {
    pub id: i32,
    pub formatted_query: String,
}

/// Payload for the search-text categories (`/yelp`, `/movies`).
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub id: i32,
    pub search_query: String,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub version: String,
    pub uptime: u64,
    pub database: bool,
    /// Providers without an API key; their endpoints will fail with 502.
    pub missing_credentials: Vec<&'static str>,
}
