/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API over the durable subtitle cache,
 * abstracting away the SQL details, and plugs it into the translation
 * cache as a [`CacheStore`].
 */

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use rusqlite::{params, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::CachedSubtitleRecord;
use crate::translation::cache::{CacheKey, CacheStore};

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Get a cached subtitle, counting the hit
    pub async fn get_cached_subtitle(&self, cache_key: &str) -> Result<Option<String>> {
        let cache_key = cache_key.to_string();

        self.db
            .execute_async(move |conn| {
                let content: Option<String> = conn
                    .query_row(
                        "SELECT content FROM subtitle_cache WHERE cache_key = ?1",
                        [&cache_key],
                        |row| row.get(0),
                    )
                    .optional()?;

                if content.is_some() {
                    conn.execute(
                        "UPDATE subtitle_cache SET hit_count = hit_count + 1 WHERE cache_key = ?1",
                        [&cache_key],
                    )?;
                    debug!("Durable cache hit for {}", cache_key);
                }

                Ok(content)
            })
            .await
    }

    /// Store a translated subtitle, replacing any previous content for the key
    pub async fn cache_subtitle(&self, record: &CachedSubtitleRecord) -> Result<()> {
        let record = record.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO subtitle_cache (
                        cache_key, source_url, target_language, content, created_at, hit_count
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT(cache_key)
                    DO UPDATE SET content = excluded.content, created_at = excluded.created_at
                    "#,
                    params![
                        record.cache_key,
                        record.source_url,
                        record.target_language,
                        record.content,
                        record.created_at,
                        record.hit_count,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    /// Get one full record
    pub async fn get_record(&self, cache_key: &str) -> Result<Option<CachedSubtitleRecord>> {
        let cache_key = cache_key.to_string();

        self.db
            .execute_async(move |conn| {
                let record = conn
                    .query_row(
                        r#"
                        SELECT cache_key, source_url, target_language, content, created_at, hit_count
                        FROM subtitle_cache
                        WHERE cache_key = ?1
                        "#,
                        [&cache_key],
                        parse_record_row,
                    )
                    .optional()?;
                Ok(record)
            })
            .await
    }

    /// List entries, most served first
    pub async fn list_entries(&self, limit: usize) -> Result<Vec<CachedSubtitleRecord>> {
        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT cache_key, source_url, target_language, content, created_at, hit_count
                    FROM subtitle_cache
                    ORDER BY hit_count DESC, created_at DESC
                    LIMIT ?1
                    "#,
                )?;

                let records = stmt
                    .query_map([limit as i64], parse_record_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;

                Ok(records)
            })
            .await
    }

    /// Delete one entry
    pub async fn remove_cached_subtitle(&self, cache_key: &str) -> Result<bool> {
        let cache_key = cache_key.to_string();

        self.db
            .execute_async(move |conn| {
                let deleted = conn.execute("DELETE FROM subtitle_cache WHERE cache_key = ?1", [&cache_key])?;
                Ok(deleted > 0)
            })
            .await
    }

    /// Clear the subtitle cache
    pub async fn clear_cache(&self) -> Result<i64> {
        self.db
            .execute_async(|conn| {
                let deleted = conn.execute("DELETE FROM subtitle_cache", [])?;
                Ok(deleted as i64)
            })
            .await
    }

    /// Get cache statistics
    pub async fn get_cache_stats(&self) -> Result<CacheStats> {
        self.db
            .execute_async(|conn| {
                let total_entries: i64 = conn
                    .query_row("SELECT COUNT(*) FROM subtitle_cache", [], |row| row.get(0))
                    .unwrap_or(0);

                let total_hits: i64 = conn
                    .query_row(
                        "SELECT COALESCE(SUM(hit_count), 0) FROM subtitle_cache",
                        [],
                        |row| row.get(0),
                    )
                    .unwrap_or(0);

                Ok(CacheStats {
                    total_entries,
                    total_hits,
                })
            })
            .await
    }
}

fn parse_record_row(row: &rusqlite::Row) -> rusqlite::Result<CachedSubtitleRecord> {
    Ok(CachedSubtitleRecord {
        cache_key: row.get(0)?,
        source_url: row.get(1)?,
        target_language: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
        hit_count: row.get(5)?,
    })
}

#[async_trait]
impl CacheStore for Repository {
    async fn load(&self, key: &CacheKey) -> Result<Option<String>> {
        self.get_cached_subtitle(&key.id()).await
    }

    async fn save(&self, key: &CacheKey, content: &str) -> Result<()> {
        self.cache_subtitle(&CachedSubtitleRecord::new(key, content)).await
    }

    async fn remove(&self, key: &CacheKey) -> Result<bool> {
        self.remove_cached_subtitle(&key.id()).await
    }

    async fn clear(&self) -> Result<usize> {
        Ok(self.clear_cache().await? as usize)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.get_cache_stats().await?.total_entries as usize)
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Total number of cache entries
    pub total_entries: i64,
    /// Total number of cache hits
    pub total_hits: i64,
}
