/*!
 * Database module for the durable translation cache.
 *
 * SQLite storage of fully translated subtitles, keyed by target language
 * and source URL, so the cache survives process restarts.
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats};
pub use models::CachedSubtitleRecord;
pub use repository::Repository;
