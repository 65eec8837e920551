use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::database::{DatabaseConnection, Repository};
use crate::file_utils::{FileManager, HttpFetcher};
use crate::subtitle_processor::SubtitleFormat;
use crate::translation::cache::{CacheKey, TranslationCache};
use crate::translation::pipeline::{validate_target_language, PipelineOrchestrator};
use crate::translation::TranslationService;

// @module: Application controller wiring configuration to the pipeline

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Cache shared by every request of this controller
    cache: TranslationCache,
    // @field: Durable store behind the cache, when one is open
    repository: Option<Repository>,
    // @field: Whether a progress bar is drawn on stderr
    show_progress: bool,
}

/// Outcome of one translate command
#[derive(Debug, Clone)]
pub struct TranslateOutcome {
    /// Translated subtitle text
    pub content: String,
    /// File the text was written to, when one was requested
    pub output_path: Option<PathBuf>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        if !config.cache.enabled {
            return Ok(Self::with_cache(config, TranslationCache::disabled(), None));
        }

        let connection = match &config.cache.database_path {
            Some(path) => DatabaseConnection::new(path),
            None => DatabaseConnection::new_default(),
        };

        let controller = match connection {
            Ok(db) => {
                let repository = Repository::new(db);
                let cache = TranslationCache::new(Arc::new(repository.clone()), true);
                Self::with_cache(config, cache, Some(repository))
            }
            Err(e) => {
                warn!("Durable cache unavailable, using memory only: {:#}", e);
                Self::with_cache(config, TranslationCache::in_memory(), None)
            }
        };

        Ok(controller)
    }

    /// Create a controller around an existing cache
    pub fn with_cache(config: Config, cache: TranslationCache, repository: Option<Repository>) -> Self {
        Self {
            config,
            cache,
            repository,
            show_progress: false,
        }
    }

    /// Draw a progress bar while translating
    pub fn with_progress_bar(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Build a pipeline from the configuration
    fn build_orchestrator(&self) -> Result<PipelineOrchestrator> {
        let service = TranslationService::from_config(&self.config.translation)
            .context("Failed to create translation service")?;
        let fetcher = HttpFetcher::new(self.config.fetch.timeout_secs, &self.config.fetch.user_agent)?;

        Ok(PipelineOrchestrator::new(service, self.cache.clone(), Arc::new(fetcher)))
    }

    fn create_progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cues ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.enable_steady_tick(Duration::from_millis(120));
        progress_bar
    }

    /// Translate one subtitle source and optionally write it to a file
    pub async fn translate(
        &self,
        source: &str,
        format_hint: Option<&str>,
        output_path: Option<&Path>,
    ) -> Result<TranslateOutcome> {
        let target_language = self.config.target_language.as_str();
        let progress_bar = self.create_progress_bar();
        progress_bar.set_message(format!("-> {}", target_language));

        let callback_bar = progress_bar.clone();
        let orchestrator = self.build_orchestrator()?;
        debug!("Translating {} to '{}' via {}", source, target_language, orchestrator.service().provider_name());
        let orchestrator = orchestrator.with_progress(Arc::new(move |done: usize, total: usize| {
            callback_bar.set_length(total as u64);
            callback_bar.set_position(done as u64);
        }));

        let result = orchestrator.translate_source(source, format_hint, target_language).await;
        progress_bar.finish_and_clear();

        let content = result.with_context(|| format!("Failed to translate {}", source))?;

        if let Some(path) = output_path {
            FileManager::write_to_file(path, &content)?;
            info!("Success: {:?}", path);
        }

        Ok(TranslateOutcome {
            content,
            output_path: output_path.map(Path::to_path_buf),
        })
    }

    /// Default output file name for a source
    pub fn default_output_name(&self, source: &str, format_hint: Option<&str>) -> String {
        let format = SubtitleFormat::detect(format_hint.or(Some(source)), "");
        FileManager::output_file_name(source, &self.config.target_language, format)
    }

    /// Human readable cache statistics
    pub async fn cache_summary(&self) -> Result<String> {
        if !self.cache.is_enabled() {
            return Ok("Cache is disabled".to_string());
        }

        match &self.repository {
            Some(repository) => {
                let stats = repository.connection().stats().await?;
                Ok(format!("{} ({:?})", stats, repository.connection().path()))
            }
            None => Ok(format!("In-memory cache entries: {}", self.cache.len().await?)),
        }
    }

    /// Most served durable cache entries, one line each
    pub async fn cache_entries(&self, limit: usize) -> Result<Vec<String>> {
        let Some(repository) = &self.repository else {
            return Ok(Vec::new());
        };

        let records = repository.list_entries(limit).await?;
        Ok(records
            .iter()
            .map(|record| {
                let created = record
                    .created()
                    .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());
                format!(
                    "{} ({}): {} hits, {} bytes, cached {}",
                    record.source_url,
                    record.target_language,
                    record.hit_count,
                    record.content.len(),
                    created
                )
            })
            .collect())
    }

    /// Check that the configured translation backend answers
    pub async fn test_connection(&self) -> Result<()> {
        let service = TranslationService::from_config(&self.config.translation)?;
        info!("Checking translation backend '{}'", service.provider_name());
        service.test_connection(&self.config.target_language).await
    }

    /// Remove every cached subtitle
    pub async fn clear_cache(&self) -> Result<usize> {
        let removed = self.cache.clear().await?;
        if let Some(repository) = &self.repository {
            repository.connection().vacuum().await?;
        }
        Ok(removed)
    }

    /// Remove one cached subtitle
    pub async fn remove_from_cache(&self, source: &str, target_language: &str) -> Result<bool> {
        let target_language = validate_target_language(target_language)?;
        self.cache.remove(&CacheKey::new(source, target_language)).await
    }
}
