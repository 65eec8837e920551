/*!
 * Translation of subtitle cue text.
 *
 * This module contains the core functionality for translating subtitles
 * through a translation backend. It is split into several submodules:
 *
 * - `core`: Cue-level translation service and run statistics
 * - `chunking`: Splitting text to the backend's request size
 * - `formatting`: Punctuation and spacing repair of translated text
 * - `cache`: Caching of fully translated subtitles
 * - `pipeline`: End-to-end orchestration of one subtitle file
 */

// Re-export main types for easier usage
pub use self::cache::{CacheKey, CacheStore, MemoryCacheStore, TranslationCache};
pub use self::core::{TranslationService, TranslationStats};
pub use self::formatting::TextNormalizer;
pub use self::pipeline::{PipelineOrchestrator, PipelineOutput};

// Submodules
pub mod cache;
pub mod chunking;
pub mod core;
pub mod formatting;
pub mod pipeline;
