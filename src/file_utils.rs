use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::errors::FetchError;
use crate::subtitle_processor::SubtitleFormat;

// @module: Subtitle source fetching and output file utilities

/// Default User-Agent sent when fetching remote subtitles
pub const DEFAULT_USER_AGENT: &str = concat!("subtrans/", env!("CARGO_PKG_VERSION"));

// @trait: Retrieves the raw bytes of a subtitle source
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetch every byte of `source`
    async fn fetch(&self, source: &str) -> Result<Vec<u8>, FetchError>;
}

// @struct: Fetches http(s) URLs with reqwest and local paths or file:// URLs from disk
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

/// Where a source string points to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// Remote http(s) resource
    Remote(Url),
    /// File on the local disk
    Local(PathBuf),
}

impl SourceLocation {
    // @parses: URL or path, rejecting unsupported schemes
    pub fn parse(source: &str) -> Result<Self, FetchError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(FetchError::InvalidSource("empty source".to_string()));
        }

        match Url::parse(source) {
            Ok(url) => match url.scheme() {
                "http" | "https" => Ok(Self::Remote(url)),
                "file" => url
                    .to_file_path()
                    .map(Self::Local)
                    .map_err(|_| FetchError::InvalidSource(source.to_string())),
                // Single letters are Windows drive prefixes, not schemes
                scheme if scheme.len() == 1 => Ok(Self::Local(PathBuf::from(source))),
                _ => Err(FetchError::InvalidSource(source.to_string())),
            },
            Err(_) => Ok(Self::Local(PathBuf::from(source))),
        }
    }
}

impl HttpFetcher {
    /// Create a fetcher with the given request timeout and User-Agent
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    async fn fetch_remote(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, source: &str) -> Result<Vec<u8>, FetchError> {
        let bytes = match SourceLocation::parse(source)? {
            SourceLocation::Remote(url) => self.fetch_remote(url).await?,
            SourceLocation::Local(path) => tokio::fs::read(&path).await?,
        };

        debug!("Fetched {} bytes from {}", bytes.len(), source);
        Ok(bytes)
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: File name for a translated subtitle, e.g. `movie.he.srt`
    // @params: source (URL or path), target_language, format
    pub fn output_file_name(source: &str, target_language: &str, format: SubtitleFormat) -> String {
        let path = match SourceLocation::parse(source) {
            Ok(SourceLocation::Remote(url)) => PathBuf::from(
                url.path_segments()
                    .and_then(|mut segments| segments.next_back().map(str::to_string))
                    .unwrap_or_default(),
            ),
            Ok(SourceLocation::Local(path)) => path,
            Err(_) => PathBuf::new(),
        };

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "subtitle".to_string());

        format!("{}.{}.{}", stem, target_language, format.extension())
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
