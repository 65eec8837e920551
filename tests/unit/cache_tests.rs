/*!
 * Tests for the translation cache and its stores
 */

use std::sync::Arc;
use std::time::Duration;
use subtrans::database::Repository;
use subtrans::translation::cache::{CacheKey, CacheStore, MemoryCacheStore, TranslationCache};

/// Test storing and reading back a translation
#[tokio::test]
async fn test_cache_putThenGet_shouldReturnContent() {
    let cache = TranslationCache::in_memory();
    let key = CacheKey::new("https://example.com/a.srt", "he");

    assert!(cache.get(&key).await.is_none());
    assert!(cache.put(&key, "translated").await);
    assert_eq!(cache.get(&key).await.as_deref(), Some("translated"));

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
}

/// Test that languages of the same source are cached separately
#[tokio::test]
async fn test_cache_withDifferentLanguages_shouldKeepSeparateEntries() {
    let cache = TranslationCache::in_memory();
    let source = "https://example.com/a.srt";

    cache.put(&CacheKey::new(source, "he"), "hebrew").await;
    cache.put(&CacheKey::new(source, "ar"), "arabic").await;

    assert_eq!(cache.get(&CacheKey::new(source, "he")).await.as_deref(), Some("hebrew"));
    assert_eq!(cache.get(&CacheKey::new(source, "ar")).await.as_deref(), Some("arabic"));
    assert_eq!(cache.len().await.unwrap(), 2);
}

/// Test that a disabled cache stores nothing
#[tokio::test]
async fn test_cache_whenDisabled_shouldNeverStore() {
    let cache = TranslationCache::disabled();
    let key = CacheKey::new("a.srt", "he");

    assert!(!cache.put(&key, "x").await);
    assert!(cache.get(&key).await.is_none());
    assert!(!cache.is_enabled());
}

/// Test that keys with separators in the source stay distinct
#[test]
fn test_cacheKey_id_shouldNotCollide() {
    let a = CacheKey::new("he:x", "ar");
    let b = CacheKey::new("x", "ar:he");
    assert_ne!(a.id(), b.id());
    assert_eq!(CacheKey::new("a b", "he").id(), "he:a+b");
}

/// Test removing and clearing entries
#[tokio::test]
async fn test_cache_removeAndClear_shouldDropEntries() {
    let cache = TranslationCache::in_memory();
    let first = CacheKey::new("one.srt", "he");
    let second = CacheKey::new("two.srt", "he");
    cache.put(&first, "1").await;
    cache.put(&second, "2").await;

    assert!(cache.remove(&first).await.unwrap());
    assert!(!cache.remove(&first).await.unwrap());
    assert_eq!(cache.clear().await.unwrap(), 1);
    assert_eq!(cache.stats().hits, 0);
}

/// Test that the memory store is shared between clones
#[tokio::test]
async fn test_memoryStore_clones_shouldShareEntries() {
    let store = MemoryCacheStore::new();
    let clone = store.clone();
    let key = CacheKey::new("a.srt", "fr");

    store.save(&key, "bonjour").await.unwrap();

    assert_eq!(clone.load(&key).await.unwrap().as_deref(), Some("bonjour"));
}

/// Test the cache over the SQLite repository
#[tokio::test]
async fn test_cache_withRepositoryStore_shouldPersist() {
    let repository = Repository::new_in_memory().unwrap();
    let cache = TranslationCache::new(Arc::new(repository.clone()), true);
    let key = CacheKey::new("https://example.com/movie.srt?x=1", "he");

    cache.put(&key, "WEBVTT\n\n").await;

    let record = repository.get_record(&key.id()).await.unwrap().unwrap();
    assert_eq!(record.source_url, "https://example.com/movie.srt?x=1");
    assert_eq!(cache.get(&key).await.as_deref(), Some("WEBVTT\n\n"));
}

/// Test that concurrent holders of one key run one after the other
#[tokio::test]
async fn test_lockKey_withSameKey_shouldSerialize() {
    let cache = TranslationCache::in_memory();
    let key = CacheKey::new("a.srt", "he");
    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

    let first_guard = cache.lock_key(&key).await;

    let waiter = {
        let cache = cache.clone();
        let key = key.clone();
        let order = order.clone();
        tokio::spawn(async move {
            let _guard = cache.lock_key(&key).await;
            order.lock().push("second");
        })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    order.lock().push("first");
    drop(first_guard);
    waiter.await.unwrap();

    assert_eq!(*order.lock(), vec!["first", "second"]);
}
