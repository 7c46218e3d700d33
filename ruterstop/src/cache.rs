//! Caching layer for Entur API responses.
//!
//! Stop documents are memoized per stop id and refreshed lazily: the request
//! that finds an entry older than the TTL fetches a new one inline. There is
//! no background refresh and no eviction. The process is expected to see a
//! handful of distinct stops, so entries simply accumulate.
//!
//! Concurrent requests for the same stale key may both fetch; the last
//! result stored wins. Fetches are idempotent reads, so this is harmless.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, TimeDelta};
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::clock::Clock;
use crate::domain::Departure;
use crate::entur::{StopFetcher, StopResponse, parse_departures};
use crate::error::Error;
use crate::pipeline::{DepartureOptions, format_departure_list};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Entries older than this are refreshed on next access.
    pub ttl: Duration,
}

impl CacheConfig {
    /// Create a config with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
        }
    }
}

/// A cached value and when it was computed.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    timestamp: NaiveDateTime,
}

/// Time-windowed memoization cache.
///
/// `get` returns the stored value for a key until it is older than the
/// expiry window, then recomputes it. Failed computations are not stored.
pub struct TtlCache<K, V> {
    entries: MokaCache<K, CacheEntry<V>>,
    expiry: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty cache.
    pub fn new(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        // No capacity or TTL on the map itself: staleness is judged against
        // the injected clock and entries are never evicted.
        let entries = MokaCache::builder().build();

        Self {
            entries,
            expiry: TimeDelta::from_std(config.ttl).unwrap_or(TimeDelta::MAX),
            clock,
        }
    }

    /// Get the value for `key`, running `compute` if it is missing or stale.
    ///
    /// An entry is stale once strictly more than the expiry window has
    /// passed since it was stored, or when the clock now reads earlier than
    /// the stored timestamp (local time fell back). Errors from `compute`
    /// are returned as-is and leave any existing entry untouched.
    pub async fn get<F, Fut, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let now = self.clock.now();

        if let Some(entry) = self.entries.get(&key).await
            && is_fresh(now.signed_duration_since(entry.timestamp), self.expiry)
        {
            return Ok(entry.value);
        }

        let value = compute().await?;
        self.entries
            .insert(
                key,
                CacheEntry {
                    value: value.clone(),
                    timestamp: now,
                },
            )
            .await;

        Ok(value)
    }

    /// Approximate number of cached entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// The expiry window.
    pub fn expiry(&self) -> TimeDelta {
        self.expiry
    }
}

fn is_fresh(age: TimeDelta, expiry: TimeDelta) -> bool {
    age >= TimeDelta::zero() && age <= expiry
}

/// Entur client with caching.
///
/// Wraps a [`StopFetcher`] and memoizes stop documents per stop id.
pub struct CachedEnturClient<F> {
    fetcher: F,
    stops: TtlCache<u32, Arc<StopResponse>>,
    clock: Arc<dyn Clock>,
}

impl<F: StopFetcher> CachedEnturClient<F> {
    /// Create a new cached client.
    pub fn new(fetcher: F, cache_config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            fetcher,
            stops: TtlCache::new(cache_config, clock.clone()),
            clock,
        }
    }

    /// Get the raw stop document, using the cache if it is fresh.
    pub async fn get_realtime_stop(
        &self,
        stop_id: u32,
    ) -> Result<Arc<StopResponse>, crate::entur::EnturError> {
        self.stops
            .get(stop_id, || async {
                debug!(
                    stop_id,
                    cached_stops = self.stops.entry_count(),
                    "Stop data missing or stale, fetching"
                );
                self.fetcher.fetch_stop(stop_id).await.map(Arc::new)
            })
            .await
    }

    /// Get parsed departures for a stop.
    ///
    /// Returns `None` when the journey planner does not know the stop.
    pub async fn get_departures(&self, stop_id: u32) -> Result<Option<Vec<Departure>>, Error> {
        let doc = self.get_realtime_stop(stop_id).await?;
        if !doc.stop_exists() {
            return Ok(None);
        }

        let departures = parse_departures(&doc).collect::<Result<Vec<_>, _>>()?;
        Ok(Some(departures))
    }

    /// Fetch, filter and render the departure board for a stop.
    ///
    /// Returns `None` when the journey planner does not know the stop.
    pub async fn render_departures(
        &self,
        stop_id: u32,
        options: &DepartureOptions,
    ) -> Result<Option<String>, Error> {
        let Some(departures) = self.get_departures(stop_id).await? else {
            return Ok(None);
        };
        let now = self.clock.now();
        Ok(Some(format_departure_list(departures, options, now)))
    }

    /// Access the underlying fetcher for operations that bypass the cache.
    pub fn client(&self) -> &F {
        &self.fetcher
    }
}
