use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::validation::{require_data, validate_search_query};
use super::{ApiError, AppState, DataQuery};
use crate::models::Location;

/// `GET /location?data=<place name>`
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DataQuery>,
) -> Result<Json<Location>, ApiError> {
    let search_query = validate_search_query(require_data(query.data.as_deref())?)?;

    let location = state.shared.locations.resolve(search_query).await?;
    Ok(Json(location))
}
