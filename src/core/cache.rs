use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Clone)]
struct Stamped<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

/// Shared time-to-live cache.
///
/// Entries older than the TTL are treated as absent but stay in the map until
/// overwritten; the cache is unbounded.
#[derive(Clone)]
pub struct Cache<K, V> {
    inner: Arc<Mutex<HashMap<K, Stamped<V>>>>,
    ttl: Duration,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Send + Sync + Debug,
    V: Clone + Send + Sync,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Returns the value for `key` if it was stored less than one TTL before `now`.
    pub async fn get(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let cache = self.inner.lock().await;
        match cache.get(key) {
            Some(entry) if now - entry.stored_at < self.ttl => {
                debug!("Cache HIT for key: {:?}", key);
                Some(entry.value.clone())
            }
            Some(_) => {
                debug!("Cache entry expired for key: {:?}", key);
                None
            }
            None => {
                debug!("Cache MISS for key: {:?}", key);
                None
            }
        }
    }

    pub async fn put(&self, key: K, value: V, now: DateTime<Utc>) {
        let mut cache = self.inner.lock().await;
        debug!("Cache PUT for key: {:?}", key);
        cache.insert(
            key,
            Stamped {
                value,
                stored_at: now,
            },
        );
    }

    /// Number of entries held, expired ones included.
    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}
