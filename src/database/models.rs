/*!
 * Database entity models.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use crate::translation::cache::CacheKey;

/// One translated subtitle stored in the durable cache
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSubtitleRecord {
    /// Cache identifier, see [`CacheKey::id`]
    pub cache_key: String,
    /// Source URL or path the subtitle was fetched from
    pub source_url: String,
    /// Target language code
    pub target_language: String,
    /// Fully rendered translated subtitle
    pub content: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Number of times the entry was served
    pub hit_count: i64,
}

impl CachedSubtitleRecord {
    /// Create a record for a freshly translated subtitle
    pub fn new(key: &CacheKey, content: impl Into<String>) -> Self {
        Self {
            cache_key: key.id(),
            source_url: key.source.clone(),
            target_language: key.target_language.clone(),
            content: content.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            hit_count: 0,
        }
    }

    /// Creation time, when the stored timestamp parses
    pub fn created(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&chrono::Utc))
    }
}
