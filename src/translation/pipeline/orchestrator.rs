/*!
 * Pipeline orchestrator for translating whole subtitle files.
 *
 * The orchestrator drives one request end to end:
 * 1. Decode: bytes to text with encoding fallback
 * 2. Parse: text to cues, in SRT or WebVTT syntax
 * 3. Translate: cue by cue, chunk by chunk, in source order
 * 4. Write: cues back to the same format
 *
 * `translate_source` wraps this with fetching and the translation cache.
 */

use log::{debug, error, info};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::decoding::{self, DetectedEncoding};
use crate::errors::{ProviderError, SubtitleError, TranslationError};
use crate::file_utils::SourceFetcher;
use crate::language_utils;
use crate::subtitle_processor::{CueSequence, SubtitleFormat};
use crate::translation::cache::{CacheKey, TranslationCache};
use crate::translation::core::{TranslationService, TranslationStats};

/// Progress callback receiving `(cues_done, cues_total)`
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Result of translating one subtitle file
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Rendered translated subtitle
    pub content: String,

    /// Format of both input and output
    pub format: SubtitleFormat,

    /// How the source bytes were decoded
    pub encoding: DetectedEncoding,

    /// Translation statistics
    pub stats: TranslationStats,

    /// Total duration of the run
    pub duration: Duration,
}

impl PipelineOutput {
    /// Whether the output should be stored in the cache
    ///
    /// A run where nothing was translated is not cached so the next request
    /// tries the backend again.
    pub fn is_cacheable(&self) -> bool {
        self.stats.any_translated()
    }

    /// Get a summary of the run
    pub fn summary(&self) -> String {
        format!(
            "{} | {} | decoded as {} | {:.2}s",
            self.format,
            self.stats.summary(),
            self.encoding,
            self.duration.as_secs_f32()
        )
    }
}

/// The main subtitle translation pipeline
#[derive(Clone)]
pub struct PipelineOrchestrator {
    service: TranslationService,
    cache: TranslationCache,
    fetcher: Arc<dyn SourceFetcher>,
    progress_callback: Option<ProgressCallback>,
}

impl PipelineOrchestrator {
    /// Create a new orchestrator
    pub fn new(service: TranslationService, cache: TranslationCache, fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self {
            service,
            cache,
            fetcher,
            progress_callback: None,
        }
    }

    /// Report progress after every cue
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// The cache in use
    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    /// The translation service in use
    pub fn service(&self) -> &TranslationService {
        &self.service
    }

    /// Translate a subtitle file given as raw bytes
    ///
    /// Fails only on an empty source, an unknown target language, or a
    /// backend that could not be reached for any chunk. Every other backend
    /// failure leaves the affected text in its original language.
    pub async fn translate_subtitle(
        &self,
        source_bytes: &[u8],
        format_hint: Option<&str>,
        target_language: &str,
    ) -> Result<PipelineOutput, TranslationError> {
        let start_time = Instant::now();
        let target_language = validate_target_language(target_language)?;

        if source_bytes.is_empty() {
            return Err(SubtitleError::EmptySource.into());
        }

        let decoded = decoding::decode(source_bytes, &target_language);
        let format = SubtitleFormat::detect(format_hint, &decoded.text);
        let mut cues = CueSequence::parse(&decoded.text, format);

        info!(
            "Translating {} {} cues to '{}' (decoded as {})",
            cues.len(),
            format,
            target_language,
            decoded.encoding
        );

        let total = cues.len();
        let mut stats = TranslationStats::new();

        for (index, cue) in cues.cues.iter_mut().enumerate() {
            cue.text = self.service.translate_text(&cue.text, &target_language, &mut stats).await;
            stats.cues += 1;

            if let Some(callback) = &self.progress_callback {
                callback(index + 1, total);
            }
        }

        if stats.all_unreachable() {
            let last_error = stats.last_error.clone().unwrap_or_else(|| {
                ProviderError::ConnectionError("no response".to_string())
            });
            error!("Translation backend unreachable for all {} chunks", stats.chunks_sent);
            return Err(TranslationError::BackendUnreachable {
                attempts: stats.chunks_sent,
                last_error,
            });
        }

        let content = cues.render(format);
        let output = PipelineOutput {
            content,
            format,
            encoding: decoded.encoding,
            stats,
            duration: start_time.elapsed(),
        };

        info!("Translation complete: {}", output.summary());
        Ok(output)
    }

    /// Translate a subtitle by URL or path, going through the cache
    ///
    /// Concurrent calls for the same source and language share one run: the
    /// later ones wait for the first and then read its cached result.
    pub async fn translate_source(
        &self,
        source: &str,
        format_hint: Option<&str>,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let target_language = validate_target_language(target_language)?;
        let key = CacheKey::new(source, target_language.as_str());

        if let Some(content) = self.cache.get(&key).await {
            return Ok(content);
        }

        let _guard = self.cache.lock_key(&key).await;

        if let Some(content) = self.cache.get(&key).await {
            debug!("{} was translated while waiting for its lock", key);
            return Ok(content);
        }

        let bytes = self.fetcher.fetch(source).await.map_err(|e| {
            error!("Failed to fetch {}: {}", source, e);
            e
        })?;

        let output = self
            .translate_subtitle(&bytes, format_hint.or(Some(source)), &target_language)
            .await?;

        if output.is_cacheable() {
            self.cache.put(&key, &output.content).await;
        } else {
            info!("Nothing was translated for {}, result not cached", key);
        }

        Ok(output.content)
    }
}

/// Check a target language code and return it trimmed
///
/// Region subtags and legacy aliases the backend understands (`zh-CN`,
/// `iw`) are accepted and passed through unchanged.
pub fn validate_target_language(code: &str) -> Result<String, TranslationError> {
    let code = code.trim();
    if language_utils::is_valid_language_code(code) {
        Ok(code.to_string())
    } else {
        Err(TranslationError::UnsupportedLanguage(code.to_string()))
    }
}
