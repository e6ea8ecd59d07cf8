//! One [`CacheOrchestrator`] per category, built once at startup.

use std::sync::Arc;

use reqwest::Client;

use super::cache::{CacheOrchestrator, CategoryStore};
use crate::clients::Provider;
use crate::clients::darksky::DarkSkyClient;
use crate::clients::eventbrite::EventbriteClient;
use crate::clients::hiking::HikingProjectClient;
use crate::clients::tmdb::TmdbClient;
use crate::clients::yelp::YelpClient;
use crate::config::Config;
use crate::db::Store;
use crate::domain::{Category, Coordinates};
use crate::models::{Event, Movie, Review, Trail, Weather};

pub type WeatherProvider = Arc<dyn Provider<Params = Coordinates, Record = Weather>>;
pub type EventProvider = Arc<dyn Provider<Params = String, Record = Event>>;
pub type ReviewProvider = Arc<dyn Provider<Params = String, Record = Review>>;
pub type MovieProvider = Arc<dyn Provider<Params = String, Record = Movie>>;
pub type TrailProvider = Arc<dyn Provider<Params = Coordinates, Record = Trail>>;

/// The category data sources, swappable as a unit.
#[derive(Clone)]
pub struct Providers {
    pub weather: WeatherProvider,
    pub events: EventProvider,
    pub reviews: ReviewProvider,
    pub movies: MovieProvider,
    pub trails: TrailProvider,
}

impl Providers {
    /// The real HTTP clients, sharing one connection pool.
    #[must_use]
    pub fn from_config(config: &Config, client: &Client) -> Self {
        let p = &config.providers;

        Self {
            weather: Arc::new(DarkSkyClient::new(
                client.clone(),
                &p.weather.base_url,
                p.weather.api_key.clone(),
            )),
            events: Arc::new(EventbriteClient::new(
                client.clone(),
                &p.events.base_url,
                p.events.api_key.clone(),
            )),
            reviews: Arc::new(YelpClient::new(
                client.clone(),
                &p.reviews.base_url,
                p.reviews.api_key.clone(),
            )),
            movies: Arc::new(TmdbClient::new(
                client.clone(),
                &p.movies.base_url,
                &p.movie_image_base_url,
                p.movies.api_key.clone(),
            )),
            trails: Arc::new(HikingProjectClient::new(
                client.clone(),
                &p.trails.base_url,
                p.trails.api_key.clone(),
            )),
        }
    }
}

pub struct CategoryRegistry {
    pub weather: CacheOrchestrator<Coordinates, Weather>,
    pub events: CacheOrchestrator<String, Event>,
    pub reviews: CacheOrchestrator<String, Review>,
    pub movies: CacheOrchestrator<String, Movie>,
    pub trails: CacheOrchestrator<Coordinates, Trail>,
}

impl CategoryRegistry {
    #[must_use]
    pub fn new(config: &Config, store: &Store, providers: Providers) -> Self {
        let timeout = config.providers.request_timeout();
        let store = Arc::new(store.clone());

        let weather_store: Arc<dyn CategoryStore<Weather>> = store.clone();
        let event_store: Arc<dyn CategoryStore<Event>> = store.clone();
        let review_store: Arc<dyn CategoryStore<Review>> = store.clone();
        let movie_store: Arc<dyn CategoryStore<Movie>> = store.clone();
        let trail_store: Arc<dyn CategoryStore<Trail>> = store;

        Self {
            weather: CacheOrchestrator::new(
                Category::Weather,
                weather_store,
                providers.weather,
                config.cache.ttl(Category::Weather),
                timeout,
            ),
            events: CacheOrchestrator::new(
                Category::Events,
                event_store,
                providers.events,
                config.cache.ttl(Category::Events),
                timeout,
            ),
            reviews: CacheOrchestrator::new(
                Category::Reviews,
                review_store,
                providers.reviews,
                config.cache.ttl(Category::Reviews),
                timeout,
            ),
            movies: CacheOrchestrator::new(
                Category::Movies,
                movie_store,
                providers.movies,
                config.cache.ttl(Category::Movies),
                timeout,
            ),
            trails: CacheOrchestrator::new(
                Category::Trails,
                trail_store,
                providers.trails,
                config.cache.ttl(Category::Trails),
                timeout,
            ),
        }
    }
}
