use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::clients::ProviderError;
use crate::services::{CacheError, LocationError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ExternalApiError { service: String, message: String },

    GatewayTimeout { service: String, message: String },

    ValidationError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ExternalApiError { service, message } => {
                write!(f, "{} error: {}", service, message)
            }
            ApiError::GatewayTimeout { service, message } => {
                write!(f, "{} timeout: {}", service, message)
            }
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::ExternalApiError { service, message } => {
                tracing::warn!("{} API error: {}", service, message);
                (
                    StatusCode::BAD_GATEWAY,
                    format!("{} service is unavailable", service),
                )
            }
            ApiError::GatewayTimeout { service, message } => {
                tracing::warn!("{} API timeout: {}", service, message);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    format!("{} service did not respond in time", service),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(format!("{err:#}"))
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        ApiError::ExternalApiError {
            service: err.service().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<CacheError> for ApiError {
    fn from(err: CacheError) -> Self {
        let message = err.to_string();
        match err {
            CacheError::Storage(msg) => ApiError::DatabaseError(msg),
            CacheError::UnknownLocation(_) => ApiError::NotFound(message),
            CacheError::Provider(e) => e.into(),
            CacheError::Timeout { service, .. } => ApiError::GatewayTimeout {
                service: service.to_string(),
                message,
            },
        }
    }
}

impl From<LocationError> for ApiError {
    fn from(err: LocationError) -> Self {
        let message = err.to_string();
        match err {
            LocationError::InvalidQuery => ApiError::ValidationError(message),
            LocationError::NoData(_) => ApiError::NotFound(message),
            LocationError::Storage(msg) => ApiError::DatabaseError(msg),
            LocationError::Provider(e) => e.into(),
            LocationError::Timeout(_) => ApiError::GatewayTimeout {
                service: "Geocoding".to_string(),
                message,
            },
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }
}
