//! Cache-or-fetch orchestration for provider-backed categories.
//!
//! [`CacheOrchestrator::resolve`] runs a two-state machine per request:
//!
//! - CHECK: load the rows stored for a location. If the first row is younger
//!   than the category TTL the rows are served as they are.
//! - REFRESH: bulk-delete stale rows, call the provider, persist the
//!   normalized records with one shared `created_at` and return them.
//!
//! Freshness is decided per category and location, never per row. A provider
//! failure after invalidation leaves the category empty for that location.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::clients::{Provider, ProviderError};
use crate::domain::Category;
use crate::models::Cached;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("No location with id {0}")]
    UnknownLocation(i32),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("{service} did not respond within {timeout_secs}s")]
    Timeout {
        service: &'static str,
        timeout_secs: u64,
    },
}

fn storage_error(err: anyhow::Error) -> CacheError {
    CacheError::Storage(format!("{err:#}"))
}

/// Row storage for one category, keyed by location id.
#[async_trait::async_trait]
pub trait CategoryStore<R>: Send + Sync {
    /// All rows for the location, oldest first.
    async fn find_by_location(&self, location_id: i32) -> anyhow::Result<Vec<Cached<R>>>;

    /// Remove every row for the location; returns how many were removed.
    async fn delete_by_location(&self, location_id: i32) -> anyhow::Result<u64>;

    /// Whether a location row with this id exists.
    async fn location_exists(&self, location_id: i32) -> anyhow::Result<bool>;

    /// Persist `records` in order, all stamped with `created_at`.
    async fn insert_batch(
        &self,
        location_id: i32,
        created_at: i64,
        records: &[R],
    ) -> anyhow::Result<Vec<Cached<R>>>;
}

/// True while `now_ms - created_at_ms <= ttl`. Future timestamps count as fresh.
#[must_use]
pub fn is_fresh(created_at_ms: i64, now_ms: i64, ttl: Duration) -> bool {
    let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    now_ms.saturating_sub(created_at_ms) <= ttl_ms
}

fn record_lookup(category: Category, outcome: &'static str) {
    metrics::counter!(
        "cache_lookups_total",
        "category" => category.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

fn record_provider_call(category: Category, outcome: &'static str) {
    metrics::counter!(
        "provider_requests_total",
        "category" => category.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

pub struct CacheOrchestrator<Q, R> {
    category: Category,
    store: Arc<dyn CategoryStore<R>>,
    provider: Arc<dyn Provider<Params = Q, Record = R>>,
    ttl: Duration,
    provider_timeout: Duration,
    refresh_locks: RefreshLocks,
}

type RefreshLocks = StdMutex<HashMap<i32, Arc<Mutex<()>>>>;

/// Holds one location's refresh lock and removes its map entry on drop, so
/// the entry goes away even when the request future is cancelled mid-refresh.
struct RefreshSlot<'a> {
    locks: &'a RefreshLocks,
    location_id: i32,
    lock: Arc<Mutex<()>>,
}

impl<'a> RefreshSlot<'a> {
    fn acquire(locks: &'a RefreshLocks, location_id: i32) -> Self {
        let lock = {
            let mut map = locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(location_id).or_default())
        };
        Self {
            locks,
            location_id,
            lock,
        }
    }
}

impl Drop for RefreshSlot<'_> {
    fn drop(&mut self) {
        let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map, one held here.
        if Arc::strong_count(&self.lock) <= 2 {
            map.remove(&self.location_id);
        }
    }
}

impl<Q, R> CacheOrchestrator<Q, R>
where
    Q: Send + Sync,
    R: Send + Sync,
{
    #[must_use]
    pub fn new(
        category: Category,
        store: Arc<dyn CategoryStore<R>>,
        provider: Arc<dyn Provider<Params = Q, Record = R>>,
        ttl: Duration,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            category,
            store,
            provider,
            ttl,
            provider_timeout,
            refresh_locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Serve the cached rows for `location_id`, refreshing them from the
    /// provider when they are missing or older than the TTL.
    ///
    /// The caller must have resolved the location already; `params` is what
    /// this category's provider needs to look the location up.
    #[instrument(skip(self, params), fields(category = %self.category))]
    pub async fn resolve(&self, location_id: i32, params: &Q) -> Result<Vec<Cached<R>>, CacheError> {
        let rows = self
            .store
            .find_by_location(location_id)
            .await
            .map_err(storage_error)?;

        if self.rows_are_fresh(&rows) {
            record_lookup(self.category, "hit");
            debug!(location_id, rows = rows.len(), "Serving cached rows");
            return Ok(rows);
        }

        let slot = RefreshSlot::acquire(&self.refresh_locks, location_id);
        let _guard = slot.lock.lock().await;
        self.refresh(location_id, params).await
    }

    fn rows_are_fresh(&self, rows: &[Cached<R>]) -> bool {
        rows.first().is_some_and(|first| {
            is_fresh(first.created_at, Utc::now().timestamp_millis(), self.ttl)
        })
    }

    /// Runs with the refresh lock for `location_id` held.
    async fn refresh(&self, location_id: i32, params: &Q) -> Result<Vec<Cached<R>>, CacheError> {
        // A concurrent request may have refreshed while we waited for the lock.
        let rows = self
            .store
            .find_by_location(location_id)
            .await
            .map_err(storage_error)?;

        if self.rows_are_fresh(&rows) {
            record_lookup(self.category, "hit");
            debug!(location_id, rows = rows.len(), "Rows refreshed by a concurrent request");
            return Ok(rows);
        }

        if let Some(first) = rows.first() {
            let removed = self
                .store
                .delete_by_location(location_id)
                .await
                .map_err(storage_error)?;

            record_lookup(self.category, "stale");
            info!(
                location_id,
                removed,
                age_ms = Utc::now().timestamp_millis().saturating_sub(first.created_at),
                ttl_secs = self.ttl.as_secs(),
                "Invalidated stale rows"
            );
        } else {
            // Rows reference their location, so only an empty result can
            // belong to an id that was never created.
            if !self
                .store
                .location_exists(location_id)
                .await
                .map_err(storage_error)?
            {
                debug!(location_id, "Unknown location");
                return Err(CacheError::UnknownLocation(location_id));
            }

            record_lookup(self.category, "miss");
            debug!(location_id, "No cached rows");
        }

        let records = self.fetch(params).await?;
        let created_at = Utc::now().timestamp_millis();

        let saved = self
            .store
            .insert_batch(location_id, created_at, &records)
            .await
            .map_err(storage_error)?;

        info!(
            location_id,
            rows = saved.len(),
            provider = self.provider.name(),
            "Cached provider data"
        );

        Ok(saved)
    }

    async fn fetch(&self, params: &Q) -> Result<Vec<R>, CacheError> {
        let service = self.provider.name();

        match tokio::time::timeout(self.provider_timeout, self.provider.fetch(params)).await {
            Ok(Ok(records)) => {
                record_provider_call(self.category, "ok");
                Ok(records)
            }
            Ok(Err(e)) => {
                record_provider_call(self.category, "error");
                warn!(provider = service, error = %e, "Provider call failed");
                Err(CacheError::Provider(e))
            }
            Err(_) => {
                record_provider_call(self.category, "timeout");
                warn!(
                    provider = service,
                    timeout_secs = self.provider_timeout.as_secs(),
                    "Provider call timed out"
                );
                Err(CacheError::Timeout {
                    service,
                    timeout_secs: self.provider_timeout.as_secs(),
                })
            }
        }
    }
}
