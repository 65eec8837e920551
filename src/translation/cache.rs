/*!
 * Translated subtitle caching.
 *
 * A finished translation is stored under a key made of the target language
 * and the source URL, so repeated requests for the same resource skip the
 * whole pipeline. Storage is pluggable: an in-process map for tests and
 * one-shot runs, or the SQLite repository for a durable cache.
 *
 * Store failures never fail a request: a failed read counts as a miss and a
 * failed write is logged and dropped.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::form_urlencoded::byte_serialize;

/// Cache key combining the source location and target language
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Source URL or path, as requested
    pub source: String,

    /// Target language code
    pub target_language: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(source: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target_language: target_language.into(),
        }
    }

    /// Stable identifier: the language code, a colon, then the percent-encoded source
    ///
    /// Language codes never contain `:` and the encoded source never does
    /// either, so distinct keys always produce distinct identifiers.
    pub fn id(&self) -> String {
        let encoded: String = byte_serialize(self.source.as_bytes()).collect();
        format!("{}:{}", self.target_language, encoded)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.source, self.target_language)
    }
}

/// Backing storage for translated subtitles
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Load the stored subtitle text for a key
    async fn load(&self, key: &CacheKey) -> Result<Option<String>>;

    /// Store subtitle text for a key, replacing any previous value
    async fn save(&self, key: &CacheKey, content: &str) -> Result<()>;

    /// Remove one entry, returning whether it existed
    async fn remove(&self, key: &CacheKey) -> Result<bool>;

    /// Remove every entry, returning how many were removed
    async fn clear(&self) -> Result<usize>;

    /// Number of stored entries
    async fn len(&self) -> Result<usize>;
}

/// In-process cache store
#[derive(Debug, Default, Clone)]
pub struct MemoryCacheStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryCacheStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn load(&self, key: &CacheKey) -> Result<Option<String>> {
        Ok(self.entries.read().get(&key.id()).cloned())
    }

    async fn save(&self, key: &CacheKey, content: &str) -> Result<()> {
        self.entries.write().insert(key.id(), content.to_string());
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> Result<bool> {
        Ok(self.entries.write().remove(&key.id()).is_some())
    }

    async fn clear(&self) -> Result<usize> {
        let mut entries = self.entries.write();
        let removed = entries.len();
        entries.clear();
        Ok(removed)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().len())
    }
}

/// Hit and miss counters of a cache instance
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

impl CacheStats {
    /// Fraction of lookups that were hits, 0 when there were none
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Translation cache for storing and retrieving translated subtitles
#[derive(Clone)]
pub struct TranslationCache {
    /// Backing store
    store: Arc<dyn CacheStore>,

    /// Cache hit counter
    hits: Arc<AtomicUsize>,

    /// Cache miss counter
    misses: Arc<AtomicUsize>,

    /// One lock per key currently being produced
    in_flight: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,

    /// Whether caching is enabled
    enabled: bool,
}

impl TranslationCache {
    /// Create a cache over the given store
    pub fn new(store: Arc<dyn CacheStore>, enabled: bool) -> Self {
        Self {
            store,
            hits: Arc::new(AtomicUsize::new(0)),
            misses: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            enabled,
        }
    }

    /// Create an enabled cache held in memory
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCacheStore::new()), true)
    }

    /// Create a cache that never stores anything
    pub fn disabled() -> Self {
        Self::new(Arc::new(MemoryCacheStore::new()), false)
    }

    /// Get a translated subtitle from the cache
    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        if !self.enabled {
            return None;
        }

        match self.store.load(key).await {
            Ok(Some(content)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                info!("Cache hit for {}", key);
                Some(content)
            }
            Ok(None) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Cache miss for {}", key);
                None
            }
            Err(e) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                warn!("Cache read failed for {}: {:#}", key, e);
                None
            }
        }
    }

    /// Store a translated subtitle in the cache
    ///
    /// Returns whether the value was written.
    pub async fn put(&self, key: &CacheKey, content: &str) -> bool {
        if !self.enabled {
            return false;
        }

        match self.store.save(key, content).await {
            Ok(()) => {
                debug!("Cached translation for {}", key);
                true
            }
            Err(e) => {
                warn!("Cache write failed for {}: {:#}", key, e);
                false
            }
        }
    }

    /// Remove one entry from the backing store
    pub async fn remove(&self, key: &CacheKey) -> Result<bool> {
        self.store.remove(key).await
    }

    /// Remove every entry and reset the counters
    pub async fn clear(&self) -> Result<usize> {
        let removed = self.store.clear().await?;
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        debug!("Translation cache cleared ({} entries)", removed);
        Ok(removed)
    }

    /// Number of entries in the backing store
    pub async fn len(&self) -> Result<usize> {
        self.store.len().await
    }

    /// Get hit and miss counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Check if the cache is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Serialize work on one key
    ///
    /// Holders of the returned guard for the same key run one at a time.
    /// Different keys never wait on each other.
    pub async fn lock_key(&self, key: &CacheKey) -> KeyGuard {
        let id = key.id();
        let slot = {
            let mut in_flight = self.in_flight.lock();
            in_flight
                .entry(id.clone())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };

        let guard = slot.clone().lock_owned().await;

        KeyGuard {
            _guard: guard,
            slot,
            id,
            in_flight: self.in_flight.clone(),
        }
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Exclusive hold on one cache key, released on drop
pub struct KeyGuard {
    _guard: tokio::sync::OwnedMutexGuard<()>,
    slot: Arc<tokio::sync::Mutex<()>>,
    id: String,
    in_flight: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock();
        // Map entry, our `slot`, and the owned guard: nobody else is waiting
        if Arc::strong_count(&self.slot) <= 3 {
            in_flight.remove(&self.id);
        }
    }
}
