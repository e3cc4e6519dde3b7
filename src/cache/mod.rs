//! Process-wide TTL cache for aggregated resources
//!
//! One entry per [`CacheKey`]; entries are overwritten wholesale and a stale
//! entry is simply ignored until the next successful fetch replaces it, never
//! evicted. Concurrent requests racing on the same cold key are NOT
//! deduplicated, so a burst during a miss can trigger redundant upstream
//! calls.

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Time source for TTL checks, injectable so tests can advance time manually
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The closed set of cacheable resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Standings,
    Scorers,
    Fixtures,
    News,
    Transfers,
    Dashboard,
}

impl CacheKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::Standings => "standings",
            CacheKey::Scorers => "scorers",
            CacheKey::Fixtures => "fixtures",
            CacheKey::News => "news",
            CacheKey::Transfers => "transfers",
            CacheKey::Dashboard => "dashboard",
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Value,
    last_fetch: DateTime<Utc>,
}

pub struct TtlCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl TtlCache {
    pub fn new(ttl_seconds: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl: Duration::seconds(ttl_seconds as i64),
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_system_clock(ttl_seconds: u64) -> Self {
        Self::new(ttl_seconds, Arc::new(SystemClock))
    }

    /// Return the cached payload if it is still within the freshness window
    pub async fn get(&self, key: CacheKey) -> Option<Value> {
        let entries = self.entries.read().await;
        let entry = entries.get(&key)?;
        if self.clock.now() - entry.last_fetch < self.ttl {
            tracing::debug!("cache hit for {}", key.as_str());
            Some(entry.data.clone())
        } else {
            tracing::debug!("cache stale for {}", key.as_str());
            None
        }
    }

    /// Store a payload, overwriting any previous entry wholesale
    pub async fn set(&self, key: CacheKey, data: Value) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                data,
                last_fetch: self.clock.now(),
            },
        );
    }

    /// Typed read: deserialize the cached payload into `T`
    ///
    /// An entry that no longer matches the expected shape is treated as a
    /// miss rather than an error.
    pub async fn get_as<T: DeserializeOwned>(&self, key: CacheKey) -> Option<T> {
        let value = self.get(key).await?;
        serde_json::from_value(value).ok()
    }

    /// Typed write
    pub async fn set_as<T: Serialize>(&self, key: CacheKey, data: &T) {
        match serde_json::to_value(data) {
            Ok(value) => self.set(key, value).await,
            Err(e) => tracing::warn!("failed to serialize cache entry for {}: {}", key.as_str(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Test clock advanced by hand
    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn new(start: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(start),
            }
        }

        fn advance(&self, duration: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += duration;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    fn start_time() -> DateTime<Utc> {
        "2026-01-10T12:00:00Z".parse().unwrap()
    }

    #[tokio::test]
    async fn get_after_set_returns_value() {
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = TtlCache::new(300, clock);

        cache.set(CacheKey::Standings, json!([{"id": 1}])).await;
        assert_eq!(
            cache.get(CacheKey::Standings).await,
            Some(json!([{"id": 1}]))
        );
    }

    #[tokio::test]
    async fn get_returns_none_after_ttl_elapses() {
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = TtlCache::new(300, clock.clone());

        cache.set(CacheKey::News, json!({"x": 1})).await;

        clock.advance(Duration::seconds(299));
        assert!(cache.get(CacheKey::News).await.is_some());

        clock.advance(Duration::seconds(1));
        assert!(cache.get(CacheKey::News).await.is_none());
    }

    #[tokio::test]
    async fn stale_entry_is_replaced_by_set() {
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = TtlCache::new(300, clock.clone());

        cache.set(CacheKey::Fixtures, json!(1)).await;
        clock.advance(Duration::seconds(600));
        assert!(cache.get(CacheKey::Fixtures).await.is_none());

        cache.set(CacheKey::Fixtures, json!(2)).await;
        assert_eq!(cache.get(CacheKey::Fixtures).await, Some(json!(2)));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = TtlCache::new(300, clock);

        cache.set(CacheKey::Scorers, json!("a")).await;
        assert!(cache.get(CacheKey::Transfers).await.is_none());
        assert!(cache.get(CacheKey::Scorers).await.is_some());
    }

    #[tokio::test]
    async fn typed_round_trip() {
        #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Row {
            id: u64,
        }

        let clock = Arc::new(ManualClock::new(start_time()));
        let cache = TtlCache::new(300, clock);

        cache.set_as(CacheKey::Dashboard, &vec![Row { id: 7 }]).await;
        let rows: Option<Vec<Row>> = cache.get_as(CacheKey::Dashboard).await;
        assert_eq!(rows, Some(vec![Row { id: 7 }]));
    }
}
