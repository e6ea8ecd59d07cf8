use std::sync::Arc;

use crate::clients::build_http_client;
use crate::clients::geocode::{Geocoder, GoogleGeocoder};
use crate::config::Config;
use crate::db::Store;
use crate::services::{CategoryRegistry, LocationService, Providers};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub locations: Arc<LocationService>,

    pub registry: Arc<CategoryRegistry>,
}

impl SharedState {
    /// Connect the store and wire the real provider clients.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // One HTTP client for every provider keeps a single connection pool.
        let http_client = build_http_client(config.providers.request_timeout())?;

        let geocode = &config.providers.geocode;
        let geocoder: Arc<dyn Geocoder> = Arc::new(GoogleGeocoder::new(
            http_client.clone(),
            &geocode.base_url,
            geocode.api_key.clone(),
        ));
        let providers = Providers::from_config(&config, &http_client);

        Self::with_providers(config, geocoder, providers).await
    }

    /// Same as [`SharedState::new`] with caller-supplied providers.
    pub async fn with_providers(
        config: Config,
        geocoder: Arc<dyn Geocoder>,
        providers: Providers,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_url,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let locations = Arc::new(LocationService::new(
            Arc::new(store.clone()),
            geocoder,
            config.providers.request_timeout(),
        ));
        let registry = Arc::new(CategoryRegistry::new(&config, &store, providers));

        Ok(Self {
            config: Arc::new(config),
            store,
            locations,
            registry,
        })
    }
}
