use serde::de::DeserializeOwned;

use super::ApiError;
use crate::domain::Coordinates;

pub fn validate_location_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid location ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<Coordinates, ApiError> {
    let coordinates = Coordinates::new(latitude, longitude);
    if !coordinates.is_valid() {
        return Err(ApiError::validation(format!(
            "Invalid coordinates: {}, {}",
            latitude, longitude
        )));
    }
    Ok(coordinates)
}

pub fn validate_search_query(query: &str) -> Result<&str, ApiError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Search query cannot be empty"));
    }
    Ok(trimmed)
}

/// The raw `data` parameter, which must be present.
pub fn require_data(data: Option<&str>) -> Result<&str, ApiError> {
    data.ok_or_else(|| ApiError::validation("Missing 'data' query parameter"))
}

/// Decode the JSON carried in the `data` parameter. Unknown fields are ignored.
pub fn parse_data<T: DeserializeOwned>(data: Option<&str>) -> Result<T, ApiError> {
    let raw = require_data(data)?;
    serde_json::from_str(raw)
        .map_err(|e| ApiError::validation(format!("Invalid 'data' payload: {}", e)))
}
