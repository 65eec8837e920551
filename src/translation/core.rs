/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService, which turns the text of one
 * cue into its translation: the text is chunked to the backend's size
 * limit, every chunk is sent in order with a pacing delay between calls,
 * failed chunks keep their original text, and the reassembled result is
 * normalized.
 */

use anyhow::{anyhow, Result};
use log::{debug, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;
use crate::providers::google::GoogleTranslate;
use crate::providers::mock::MockTranslator;
use crate::providers::Translator;
use super::chunking;
use super::formatting::TextNormalizer;

/// Counters for one pipeline run
#[derive(Debug, Clone, Default)]
pub struct TranslationStats {
    /// Cues processed
    pub cues: usize,

    /// Chunks handed to the backend
    pub chunks_sent: usize,

    /// Chunks the backend translated
    pub chunks_translated: usize,

    /// Chunks that kept their original text after a backend error
    pub chunks_failed: usize,

    /// Failed chunks whose error was a connection failure
    pub chunks_unreachable: usize,

    /// Most recent backend error
    pub last_error: Option<ProviderError>,

    /// Time spent waiting on the backend
    pub api_duration: Duration,
}

impl TranslationStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every chunk sent failed to reach the backend
    pub fn all_unreachable(&self) -> bool {
        self.chunks_sent > 0 && self.chunks_unreachable == self.chunks_sent
    }

    /// Whether the run produced any translated text at all
    pub fn any_translated(&self) -> bool {
        self.chunks_translated > 0
    }

    /// Percentage of sent chunks that were translated
    pub fn success_rate(&self) -> f32 {
        if self.chunks_sent == 0 {
            return 100.0;
        }
        (self.chunks_translated as f32 / self.chunks_sent as f32) * 100.0
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} cues, {} chunks sent, {} translated ({:.0}%), {} passed through, API time {:.2}s",
            self.cues,
            self.chunks_sent,
            self.chunks_translated,
            self.success_rate(),
            self.chunks_failed,
            self.api_duration.as_secs_f64()
        )
    }
}

/// Translation service for cue text
#[derive(Clone)]
pub struct TranslationService {
    /// Backend used for every chunk
    translator: Arc<dyn Translator>,

    /// Maximum characters per backend request
    max_chars_per_request: usize,

    /// Pause between consecutive backend calls of one run
    request_delay: Duration,
}

impl TranslationService {
    /// Create a service around an existing translator
    pub fn new(translator: Arc<dyn Translator>, max_chars_per_request: usize, request_delay: Duration) -> Self {
        Self {
            translator,
            max_chars_per_request: max_chars_per_request.max(1),
            request_delay,
        }
    }

    /// Create a service from configuration
    pub fn from_config(config: &TranslationConfig) -> Result<Self> {
        let translator: Arc<dyn Translator> = match config.provider {
            TranslationProvider::Google => {
                validate_endpoint(&config.endpoint)?;
                Arc::new(GoogleTranslate::new_with_config(
                    config.endpoint.clone(),
                    config.source_language.clone(),
                    config.timeout_secs,
                    config.retry_count,
                    config.retry_backoff_ms,
                ))
            }
            TranslationProvider::Mock => Arc::new(MockTranslator::working()),
        };

        Ok(Self::new(
            translator,
            config.max_chars_per_request,
            Duration::from_millis(config.rate_limit_delay_ms),
        ))
    }

    /// Name of the backend in use
    pub fn provider_name(&self) -> &str {
        self.translator.name()
    }

    /// Maximum characters per backend request
    pub fn max_chars_per_request(&self) -> usize {
        self.max_chars_per_request
    }

    /// Translate the text of one cue
    ///
    /// Never fails: a chunk the backend rejects, or answers with blank text,
    /// keeps its original text, and `stats` records what happened. Each
    /// translated chunk gets the source chunk's surrounding whitespace back,
    /// and the result has no trailing whitespace on any line. When no chunk
    /// of the cue was translated the original text is returned untouched.
    pub async fn translate_text(&self, text: &str, target_language: &str, stats: &mut TranslationStats) -> String {
        let chunks = chunking::chunk(text, self.max_chars_per_request);
        let mut translated_any = false;
        let mut pieces = Vec::with_capacity(chunks.len());

        for chunk in chunks {
            if chunk.trim().is_empty() {
                pieces.push(chunk);
                continue;
            }

            if stats.chunks_sent > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            stats.chunks_sent += 1;
            let started = Instant::now();
            let result = self
                .translator
                .translate(&chunk, target_language)
                .await
                .and_then(|translated| {
                    if translated.trim().is_empty() {
                        Err(ProviderError::ParseError("backend returned empty text".to_string()))
                    } else {
                        Ok(translated)
                    }
                });
            stats.api_duration += started.elapsed();

            match result {
                Ok(translated) => {
                    debug!("Translated chunk of {} chars via {}", chunk.chars().count(), self.translator.name());
                    stats.chunks_translated += 1;
                    translated_any = true;
                    pieces.push(reattach_whitespace(&chunk, &translated));
                }
                Err(e) => {
                    warn!("Keeping original text for chunk ({} chars): {}", chunk.chars().count(), e);
                    stats.chunks_failed += 1;
                    if e.is_unreachable() {
                        stats.chunks_unreachable += 1;
                    }
                    stats.last_error = Some(e);
                    pieces.push(chunk);
                }
            }
        }

        if !translated_any {
            return text.to_string();
        }

        TextNormalizer::normalize(&pieces.concat())
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check that the backend answers
    pub async fn test_connection(&self, target_language: &str) -> Result<()> {
        self.translator
            .translate("Hello", target_language)
            .await
            .map(|_| ())
            .map_err(|e| anyhow!("Translation backend '{}' is not usable: {}", self.translator.name(), e))
    }
}

/// Surround the trimmed translation with the whitespace of its source chunk
fn reattach_whitespace(source: &str, translated: &str) -> String {
    let leading = &source[..source.len() - source.trim_start().len()];
    let trailing = &source[source.trim_end().len()..];
    format!("{}{}{}", leading, translated.trim(), trailing)
}

/// Check that an endpoint is an absolute http(s) URL
fn validate_endpoint(endpoint: &str) -> Result<()> {
    if endpoint.is_empty() {
        return Err(anyhow!("Endpoint cannot be empty"));
    }

    let url = Url::parse(endpoint).map_err(|e| anyhow!("Invalid endpoint URL '{}': {}", endpoint, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(anyhow!("Unsupported endpoint scheme '{}' in {}", scheme, endpoint)),
    }
}
