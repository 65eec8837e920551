use anyhow::{anyhow, Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Cache config
    #[serde(default)]
    pub cache: CacheConfig,

    /// Source fetching config
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google free web endpoint
    #[default]
    Google,
    // @provider: In-process stand-in that tags text with the target language
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Service endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Source language sent to the backend (`auto` lets it detect)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Maximum subtitle characters per request
    #[serde(default = "default_max_chars_per_request")]
    pub max_chars_per_request: usize,

    /// Delay in milliseconds between consecutive requests (0 disables)
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff base for retries (in milliseconds), doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            endpoint: default_endpoint(),
            source_language: default_source_language(),
            max_chars_per_request: default_max_chars_per_request(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Translation cache configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CacheConfig {
    /// Whether translated subtitles are cached
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// SQLite database file; the platform data directory when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            database_path: None,
        }
    }
}

/// Subtitle source fetching configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FetchConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header for remote sources
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "he".to_string()
}

fn default_endpoint() -> String {
    crate::providers::google::DEFAULT_ENDPOINT.to_string()
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_max_chars_per_request() -> usize {
    crate::translation::chunking::DEFAULT_MAX_CHUNK_CHARS
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_rate_limit_delay_ms() -> u64 {
    150
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    crate::file_utils::DEFAULT_USER_AGENT.to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if self.translation.source_language != "auto" {
            let _source_name = crate::language_utils::get_language_name(&self.translation.source_language)?;
        }

        if self.translation.max_chars_per_request == 0 {
            return Err(anyhow!("translation.max_chars_per_request must be greater than zero"));
        }

        if self.translation.provider == TranslationProvider::Google {
            let url = Url::parse(&self.translation.endpoint)
                .with_context(|| format!("Invalid translation endpoint: {}", self.translation.endpoint))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(anyhow!("Translation endpoint must be http(s): {}", self.translation.endpoint));
            }
        }

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Save configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))
    }

    /// Load a configuration file, writing the defaults there when it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            cache: CacheConfig::default(),
            fetch: FetchConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
