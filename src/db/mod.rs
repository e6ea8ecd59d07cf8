use crate::models::{Cached, Event, Location, Movie, NewLocation, Review, Trail, Weather};
use crate::services::cache::CategoryStore;
use crate::services::location::LocationStore;
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        // Every SQLite in-memory connection is its own database, so pin the
        // pool to a single connection that is never recycled.
        let (max_connections, min_connections) = if in_memory {
            (1, 1)
        } else {
            opt.idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
            (max_connections, min_connections)
        };
        opt.max_connections(max_connections)
            .min_connections(min_connections);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn location_repo(&self) -> repositories::location::LocationRepository {
        repositories::location::LocationRepository::new(self.conn.clone())
    }

    fn weather_repo(&self) -> repositories::weather::WeatherRepository {
        repositories::weather::WeatherRepository::new(self.conn.clone())
    }

    fn event_repo(&self) -> repositories::event::EventRepository {
        repositories::event::EventRepository::new(self.conn.clone())
    }

    fn review_repo(&self) -> repositories::review::ReviewRepository {
        repositories::review::ReviewRepository::new(self.conn.clone())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    fn trail_repo(&self) -> repositories::trail::TrailRepository {
        repositories::trail::TrailRepository::new(self.conn.clone())
    }

    pub async fn get_location(&self, id: i32) -> Result<Option<Location>> {
        self.location_repo().get(id).await
    }

    pub async fn has_location(&self, id: i32) -> Result<bool> {
        Ok(self.get_location(id).await?.is_some())
    }

    pub async fn find_location_by_query(&self, search_query: &str) -> Result<Option<Location>> {
        self.location_repo().find_by_query(search_query).await
    }

    pub async fn add_location(&self, location: NewLocation) -> Result<Location> {
        self.location_repo().insert(location).await
    }
}

#[async_trait::async_trait]
impl LocationStore for Store {
    async fn find_by_query(&self, search_query: &str) -> Result<Option<Location>> {
        self.find_location_by_query(search_query).await
    }

    async fn insert_location(&self, location: NewLocation) -> Result<Location> {
        self.add_location(location).await
    }
}

#[async_trait::async_trait]
impl CategoryStore<Weather> for Store {
    async fn find_by_location(&self, location_id: i32) -> Result<Vec<Cached<Weather>>> {
        self.weather_repo().find_by_location(location_id).await
    }

    async fn delete_by_location(&self, location_id: i32) -> Result<u64> {
        self.weather_repo().delete_by_location(location_id).await
    }

    async fn location_exists(&self, location_id: i32) -> Result<bool> {
        self.has_location(location_id).await
    }

    async fn insert_batch(
        &self,
        location_id: i32,
        created_at: i64,
        records: &[Weather],
    ) -> Result<Vec<Cached<Weather>>> {
        self.weather_repo()
            .insert_batch(location_id, created_at, records)
            .await
    }
}

#[async_trait::async_trait]
impl CategoryStore<Event> for Store {
    async fn find_by_location(&self, location_id: i32) -> Result<Vec<Cached<Event>>> {
        self.event_repo().find_by_location(location_id).await
    }

    async fn delete_by_location(&self, location_id: i32) -> Result<u64> {
        self.event_repo().delete_by_location(location_id).await
    }

    async fn location_exists(&self, location_id: i32) -> Result<bool> {
        self.has_location(location_id).await
    }

    async fn insert_batch(
        &self,
        location_id: i32,
        created_at: i64,
        records: &[Event],
    ) -> Result<Vec<Cached<Event>>> {
        self.event_repo()
            .insert_batch(location_id, created_at, records)
            .await
    }
}

#[async_trait::async_trait]
impl CategoryStore<Review> for Store {
    async fn find_by_location(&self, location_id: i32) -> Result<Vec<Cached<Review>>> {
        self.review_repo().find_by_location(location_id).await
    }

    async fn delete_by_location(&self, location_id: i32) -> Result<u64> {
        self.review_repo().delete_by_location(location_id).await
    }

    async fn location_exists(&self, location_id: i32) -> Result<bool> {
        self.has_location(location_id).await
    }

    async fn insert_batch(
        &self,
        location_id: i32,
        created_at: i64,
        records: &[Review],
    ) -> Result<Vec<Cached<Review>>> {
        self.review_repo()
            .insert_batch(location_id, created_at, records)
            .await
    }
}

#[async_trait::async_trait]
impl CategoryStore<Movie> for Store {
    async fn find_by_location(&self, location_id: i32) -> Result<Vec<Cached<Movie>>> {
        self.movie_repo().find_by_location(location_id).await
    }

    async fn delete_by_location(&self, location_id: i32) -> Result<u64> {
        self.movie_repo().delete_by_location(location_id).await
    }

    async fn location_exists(&self, location_id: i32) -> Result<bool> {
        self.has_location(location_id).await
    }

    async fn insert_batch(
        &self,
        location_id: i32,
        created_at: i64,
        records: &[Movie],
    ) -> Result<Vec<Cached<Movie>>> {
        self.movie_repo()
            .insert_batch(location_id, created_at, records)
            .await
    }
}

#[async_trait::async_trait]
impl CategoryStore<Trail> for Store {
    async fn find_by_location(&self, location_id: i32) -> Result<Vec<Cached<Trail>>> {
        self.trail_repo().find_by_location(location_id).await
    }

    async fn delete_by_location(&self, location_id: i32) -> Result<u64> {
        self.trail_repo().delete_by_location(location_id).await
    }

    async fn location_exists(&self, location_id: i32) -> Result<bool> {
        self.has_location(location_id).await
    }

    async fn insert_batch(
        &self,
        location_id: i32,
        created_at: i64,
        records: &[Trail],
    ) -> Result<Vec<Cached<Trail>>> {
        self.trail_repo()
            .insert_batch(location_id, created_at, records)
            .await
    }
}
