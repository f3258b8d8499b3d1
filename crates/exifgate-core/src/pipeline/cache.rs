//! Lookup result caching.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use crate::config::CacheConfig;

/// Namespace prefix mixed into every cache key.
pub const CACHE_NAMESPACE: &str = "exif-json:";

/// Stable cache key for a URL: BLAKE3 of the namespaced URL, hex-encoded.
pub fn cache_key(url: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(CACHE_NAMESPACE.as_bytes());
    hasher.update(url.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Opaque string key/value cache.
pub trait KeyValueCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

struct Entry {
    value: String,
    stored_at: Instant,
}

/// In-process cache with a time-to-live and a capacity bound.
///
/// When full, expired entries are dropped first, then the oldest entry.
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
    ttl: Duration,
    max_entries: usize,
}

impl MemoryCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(Duration::from_secs(config.ttl_secs), config.max_entries)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn make_room(&self, entries: &mut HashMap<String, Entry>) {
        let ttl = self.ttl;
        entries.retain(|_, e| e.stored_at.elapsed() < ttl);
        while entries.len() >= self.max_entries {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.stored_at)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(key) => {
                    entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

impl KeyValueCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|e| e.stored_at.elapsed() < self.ttl)
            .map(|e| e.value.clone())
    }

    fn set(&self, key: &str, value: String) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if !entries.contains_key(key) && entries.len() >= self.max_entries {
            self.make_room(&mut entries);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }
}
