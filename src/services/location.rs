//! Resolve free-text place names into persisted [`Location`]s.
//!
//! Locations never expire: the first successful geocode of a query is stored
//! and every later lookup of the same text is served from the store.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::clients::ProviderError;
use crate::clients::geocode::Geocoder;
use crate::models::{Location, NewLocation};

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Search query must not be empty")]
    InvalidQuery,

    #[error("No data for '{0}'")]
    NoData(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Geocoding did not respond within {0}s")]
    Timeout(u64),
}

fn storage_error(err: anyhow::Error) -> LocationError {
    LocationError::Storage(format!("{err:#}"))
}

#[async_trait::async_trait]
pub trait LocationStore: Send + Sync {
    async fn find_by_query(&self, search_query: &str) -> anyhow::Result<Option<Location>>;

    async fn insert_location(&self, location: NewLocation) -> anyhow::Result<Location>;
}

pub struct LocationService {
    store: Arc<dyn LocationStore>,
    geocoder: Arc<dyn Geocoder>,
    timeout: Duration,
}

impl LocationService {
    #[must_use]
    pub fn new(store: Arc<dyn LocationStore>, geocoder: Arc<dyn Geocoder>, timeout: Duration) -> Self {
        Self {
            store,
            geocoder,
            timeout,
        }
    }

    /// Look the query up in storage; on a miss geocode it, keep the first
    /// result and persist it. An empty geocoding result is
    /// [`LocationError::NoData`] and nothing is stored.
    #[instrument(skip(self))]
    pub async fn resolve(&self, search_query: &str) -> Result<Location, LocationError> {
        let search_query = search_query.trim();
        if search_query.is_empty() {
            return Err(LocationError::InvalidQuery);
        }

        if let Some(location) = self
            .store
            .find_by_query(search_query)
            .await
            .map_err(storage_error)?
        {
            debug!(location_id = location.id, "Location served from store");
            return Ok(location);
        }

        let results = tokio::time::timeout(self.timeout, self.geocoder.geocode(search_query))
            .await
            .map_err(|_| {
                warn!("Geocoding timed out");
                LocationError::Timeout(self.timeout.as_secs())
            })??;

        let Some(best) = results.first() else {
            info!("Geocoding returned no results");
            return Err(LocationError::NoData(search_query.to_string()));
        };

        let location = self
            .store
            .insert_location(NewLocation::from_geocode(search_query, best))
            .await
            .map_err(storage_error)?;

        info!(
            location_id = location.id,
            formatted_query = %location.formatted_query,
            "Location geocoded and stored"
        );

        Ok(location)
    }
}
