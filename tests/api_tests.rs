use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use city_explorer::clients::geocode::{GeocodeResult, Geocoder, Geometry, LatLng};
use city_explorer::clients::{Provider, ProviderError};
use city_explorer::config::Config;
use city_explorer::domain::Coordinates;
use city_explorer::models::{Event, Movie, Review, Trail, Weather};
use city_explorer::services::Providers;
use city_explorer::state::SharedState;
use http_body_util::BodyExt;
use tower::ServiceExt;

struct StubGeocoder {
    results: Vec<GeocodeResult>,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, _query: &str) -> Result<Vec<GeocodeResult>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.clone())
    }
}

struct StubProvider<Q, R> {
    name: &'static str,
    records: Vec<R>,
    fail: bool,
    calls: AtomicUsize,
    _params: std::marker::PhantomData<fn(Q)>,
}

impl<Q, R> StubProvider<Q, R> {
    fn returning(name: &'static str, records: Vec<R>) -> Arc<Self> {
        Arc::new(Self {
            name,
            records,
            fail: false,
            calls: AtomicUsize::new(0),
            _params: std::marker::PhantomData,
        })
    }

    fn failing(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            records: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
            _params: std::marker::PhantomData,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl<Q, R> Provider for StubProvider<Q, R>
where
    Q: Send + Sync + 'static,
    R: Clone + Send + Sync + 'static,
{
    type Params = Q;
    type Record = R;

    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, _params: &Q) -> Result<Vec<R>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ProviderError::Status {
                service: self.name,
                status: 500,
                body: "upstream exploded".to_string(),
            });
        }
        Ok(self.records.clone())
    }
}

struct TestApp {
    router: Router,
    geocoder: Arc<StubGeocoder>,
    weather: Arc<StubProvider<Coordinates, Weather>>,
    events: Arc<StubProvider<String, Event>>,
    movies: Arc<StubProvider<String, Movie>>,
    trails: Arc<StubProvider<Coordinates, Trail>>,
}

fn seattle() -> GeocodeResult {
    GeocodeResult {
        formatted_address: "Seattle, WA, USA".to_string(),
        geometry: Geometry {
            location: LatLng {
                lat: 47.606_209,
                lng: -122.332_071,
            },
        },
    }
}

fn forecast() -> Vec<Weather> {
    vec![
        Weather {
            forecast: "Light rain in the morning.".to_string(),
            time: "Mon Jan 01 2024".to_string(),
        },
        Weather {
            forecast: "Overcast throughout the day.".to_string(),
            time: "Tue Jan 02 2024".to_string(),
        },
    ]
}

fn concert() -> Event {
    Event {
        link: "https://www.eventbrite.com/e/123".to_string(),
        name: "Waterfront Jazz Night".to_string(),
        event_date: "Sat May 04 2024".to_string(),
        summary: "Live jazz on the pier.".to_string(),
    }
}

fn ledge_trail() -> Trail {
    Trail {
        name: "Rattlesnake Ledge".to_string(),
        location: "North Bend, Washington".to_string(),
        length: 5.3,
        stars: 4.4,
        star_votes: 87,
        summary: "A popular climb to a rocky viewpoint.".to_string(),
        trail_url: "https://www.hikingproject.com/trail/7011192".to_string(),
        conditions: "All Clear".to_string(),
        condition_date: "2018-07-21".to_string(),
        condition_time: "20:58:44".to_string(),
    }
}

async fn spawn_app_with(
    config: Config,
    geocode_results: Vec<GeocodeResult>,
    fail_movies: bool,
) -> TestApp {
    let geocoder = Arc::new(StubGeocoder {
        results: geocode_results,
        calls: AtomicUsize::new(0),
    });
    let weather: Arc<StubProvider<Coordinates, Weather>> =
        StubProvider::returning("Dark Sky", forecast());
    let movies: Arc<StubProvider<String, Movie>> = if fail_movies {
        StubProvider::failing("TMDB")
    } else {
        StubProvider::returning("TMDB", Vec::new())
    };

    let events: Arc<StubProvider<String, Event>> =
        StubProvider::returning("Eventbrite", vec![concert()]);
    let trails: Arc<StubProvider<Coordinates, Trail>> =
        StubProvider::returning("Hiking Project", vec![ledge_trail()]);

    let providers = Providers {
        weather: weather.clone(),
        events: events.clone(),
        reviews: StubProvider::<String, Review>::returning("Yelp", Vec::new()),
        movies: movies.clone(),
        trails: trails.clone(),
    };

    let shared = SharedState::with_providers(config, geocoder.clone(), providers)
        .await
        .expect("Failed to create shared state");
    let state = city_explorer::api::create_app_state(Arc::new(shared), None);

    TestApp {
        router: city_explorer::api::router(state),
        geocoder,
        weather,
        events,
        movies,
        trails,
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_url = "sqlite::memory:".to_string();
    config
}

async fn spawn_app() -> TestApp {
    spawn_app_with(test_config(), vec![seattle()], false).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn with_data(path: &str, data: &serde_json::Value) -> String {
    format!(
        "{}?data={}",
        path,
        urlencoding::encode(&data.to_string())
    )
}

#[tokio::test]
async fn test_location_is_geocoded_once() {
    let app = spawn_app().await;

    let (status, first) = get(&app.router, "/location?data=seattle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["search_query"], "seattle");
    assert_eq!(first["formatted_query"], "Seattle, WA, USA");
    assert!(first["id"].as_i64().unwrap() > 0);

    let (status, second) = get(&app.router, "/location?data=seattle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(app.geocoder.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_location_without_results_is_not_found() {
    let app = spawn_app_with(test_config(), Vec::new(), false).await;

    let (status, body) = get(&app.router, "/location?data=atlantis").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    // Nothing was stored, so the geocoder is asked again.
    let _ = get(&app.router, "/location?data=atlantis").await;
    assert_eq!(app.geocoder.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_location_requires_data() {
    let app = spawn_app().await;

    let (status, body) = get(&app.router, "/location").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = get(&app.router, "/location?data=%20%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.geocoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_weather_is_cached_per_location() {
    let app = spawn_app().await;

    let (_, location) = get(&app.router, "/location?data=seattle").await;
    let uri = with_data("/weather", &location);

    let (status, first) = get(&app.router, &uri).await;
    assert_eq!(status, StatusCode::OK);
    let rows = first.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["forecast"], "Light rain in the morning.");
    assert_eq!(rows[0]["time"], "Mon Jan 01 2024");
    assert_eq!(rows[0]["location_id"], location["id"]);
    assert_eq!(rows[0]["created_at"], rows[1]["created_at"]);

    let (status, second) = get(&app.router, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(app.weather.calls(), 1);
}

#[tokio::test]
async fn test_stale_weather_is_refetched() {
    let mut config = test_config();
    config.cache.weather_ttl_seconds = 0;
    let app = spawn_app_with(config, vec![seattle()], false).await;

    let (_, location) = get(&app.router, "/location?data=seattle").await;
    let uri = with_data("/weather", &location);

    let (_, first) = get(&app.router, &uri).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let (status, second) = get(&app.router, &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.weather.calls(), 2);
    assert_eq!(second.as_array().unwrap().len(), 2);
    assert!(second[0]["created_at"].as_i64().unwrap() > first[0]["created_at"].as_i64().unwrap());
}

#[tokio::test]
async fn test_events_use_the_formatted_address() {
    let app = spawn_app().await;

    let (_, location) = get(&app.router, "/location?data=seattle").await;
    let uri = with_data("/events", &location);

    let (status, first) = get(&app.router, &uri).await;
    assert_eq!(status, StatusCode::OK);
    let rows = first.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["link"], "https://www.eventbrite.com/e/123");
    assert_eq!(rows[0]["name"], "Waterfront Jazz Night");
    assert_eq!(rows[0]["event_date"], "Sat May 04 2024");
    assert_eq!(rows[0]["summary"], "Live jazz on the pier.");
    assert_eq!(rows[0]["location_id"], location["id"]);

    let (_, second) = get(&app.router, &uri).await;
    assert_eq!(first, second);
    assert_eq!(app.events.calls(), 1);

    let no_address = serde_json::json!({"id": location["id"], "search_query": "seattle"});
    let (status, _) = get(&app.router, &with_data("/events", &no_address)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.events.calls(), 1);
}

#[tokio::test]
async fn test_trails_use_the_coordinates() {
    let app = spawn_app().await;

    let (_, location) = get(&app.router, "/location?data=seattle").await;
    let uri = with_data("/trails", &location);

    let (status, first) = get(&app.router, &uri).await;
    assert_eq!(status, StatusCode::OK);
    let rows = first.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Rattlesnake Ledge");
    assert_eq!(rows[0]["star_votes"], 87);
    assert_eq!(rows[0]["condition_time"], "20:58:44");
    assert_eq!(rows[0]["location_id"], location["id"]);

    let (_, second) = get(&app.router, &uri).await;
    assert_eq!(first, second);
    assert_eq!(app.trails.calls(), 1);
}

#[tokio::test]
async fn test_unknown_location_id_is_not_found() {
    let app = spawn_app().await;

    let unknown = serde_json::json!({"id": 999, "latitude": 47.6, "longitude": -122.3});
    let (status, body) = get(&app.router, &with_data("/weather", &unknown)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(app.weather.calls(), 0);
}

#[tokio::test]
async fn test_invalid_payload_is_rejected_without_fetching() {
    let app = spawn_app().await;

    let (status, _) = get(&app.router, "/weather").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app.router, "/weather?data=not-json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let bad_coords = serde_json::json!({"id": 1, "latitude": 123.0, "longitude": 0.0});
    let (status, _) = get(&app.router, &with_data("/weather", &bad_coords)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing_query = serde_json::json!({"id": 1, "latitude": 47.6});
    let (status, _) = get(&app.router, &with_data("/movies", &missing_query)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.weather.calls(), 0);
    assert_eq!(app.movies.calls(), 0);
}

#[tokio::test]
async fn test_provider_failure_is_bad_gateway() {
    let app = spawn_app_with(test_config(), vec![seattle()], true).await;

    let (_, location) = get(&app.router, "/location?data=seattle").await;
    let (status, body) = get(&app.router, &with_data("/movies", &location)).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "TMDB service is unavailable");

    // No retry, and the failure is not cached.
    let (status, _) = get(&app.router, &with_data("/movies", &location)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(app.movies.calls(), 2);
}

#[tokio::test]
async fn test_empty_provider_result_is_an_empty_array() {
    let app = spawn_app().await;

    let (_, location) = get(&app.router, "/location?data=seattle").await;
    let (status, body) = get(&app.router, &with_data("/yelp", &location)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn test_health_reports_database() {
    let app = spawn_app().await;

    let (status, body) = get(&app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["database"], true);
    assert_eq!(body["data"]["missing_credentials"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key(city_explorer::api::REQUEST_ID_HEADER)
    );
}
