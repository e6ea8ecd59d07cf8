//! One handler per cached category. Each decodes the location carried in
//! `data` and hands it to that category's orchestrator.

use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::types::{AddressRequest, CoordinatesRequest, SearchRequest};
use super::validation::{
    parse_data, validate_coordinates, validate_location_id, validate_search_query,
};
use super::{ApiError, AppState, DataQuery};
use crate::domain::Coordinates;
use crate::models::{Cached, Event, Movie, Review, Trail, Weather};

fn coordinates_request(query: &DataQuery) -> Result<(i32, Coordinates), ApiError> {
    let request: CoordinatesRequest = parse_data(query.data.as_deref())?;
    let id = validate_location_id(request.id)?;
    let coordinates = validate_coordinates(request.latitude, request.longitude)?;
    Ok((id, coordinates))
}

fn search_request(query: &DataQuery) -> Result<(i32, String), ApiError> {
    let request: SearchRequest = parse_data(query.data.as_deref())?;
    let id = validate_location_id(request.id)?;
    let search_query = validate_search_query(&request.search_query)?.to_string();
    Ok((id, search_query))
}

/// `GET /weather`
pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DataQuery>,
) -> Result<Json<Vec<Cached<Weather>>>, ApiError> {
    let (id, coordinates) = coordinates_request(&query)?;
    let rows = state.registry().weather.resolve(id, &coordinates).await?;
    Ok(Json(rows))
}

/// `GET /events`
pub async fn get_events(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DataQuery>,
) -> Result<Json<Vec<Cached<Event>>>, ApiError> {
    let request: AddressRequest = parse_data(query.data.as_deref())?;
    let id = validate_location_id(request.id)?;
    let address = validate_search_query(&request.formatted_query)?.to_string();

    let rows = state.registry().events.resolve(id, &address).await?;
    Ok(Json(rows))
}

/// `GET /yelp`
pub async fn get_reviews(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DataQuery>,
) -> Result<Json<Vec<Cached<Review>>>, ApiError> {
    let (id, search_query) = search_request(&query)?;
    let rows = state.registry().reviews.resolve(id, &search_query).await?;
    Ok(Json(rows))
}

/// `GET /movies`
pub async fn get_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DataQuery>,
) -> Result<Json<Vec<Cached<Movie>>>, ApiError> {
    let (id, search_query) = search_request(&query)?;
    let rows = state.registry().movies.resolve(id, &search_query).await?;
    Ok(Json(rows))
}

/// `GET /trails`
pub async fn get_trails(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DataQuery>,
) -> Result<Json<Vec<Cached<Trail>>>, ApiError> {
    let (id, coordinates) = coordinates_request(&query)?;
    let rows = state.registry().trails.resolve(id, &coordinates).await?;
    Ok(Json(rows))
}
