/*!
 * Error types for the subtrans application.
 *
 * This module contains custom error types for the different stages of the
 * subtitle pipeline, using the thiserror crate for ergonomic error definitions.
 * Only fetch failures and empty sources abort a request; provider errors are
 * recovered per chunk by the translation service.
 */

use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// Error when building or sending an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when the API response has an unexpected shape
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// The backend could not be reached at all
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),
}

impl ProviderError {
    /// Whether the error means the backend was unreachable, as opposed to
    /// reachable but unhelpful
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }
}

/// Errors that can occur while fetching a subtitle source
#[derive(Error, Debug)]
pub enum FetchError {
    /// The source string is neither a supported URL nor a path
    #[error("Invalid subtitle source: {0}")]
    InvalidSource(String),

    /// The remote server answered with a non-success status
    #[error("Source {url} responded with status {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The request itself failed (DNS, TLS, timeout, ...)
    #[error("Failed to fetch source: {0}")]
    Request(String),

    /// Reading a local source failed
    #[error("Failed to read source: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The source yielded no bytes to decode
    #[error("Subtitle source is empty")]
    EmptySource,

    /// The format hint names a format this crate cannot handle
    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Every backend call of a run failed to connect
    #[error("Translation backend unreachable after {attempts} attempts: {last_error}")]
    BackendUnreachable {
        /// Number of chunks attempted
        attempts: usize,
        /// Last error seen
        last_error: ProviderError,
    },

    /// The target language code is not recognised
    #[error("Unsupported target language: {0}")]
    UnsupportedLanguage(String),

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error with subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error fetching the source
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error fetching a source
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        // Alternate formatting keeps the context chain
        Self::Unknown(format!("{:#}", error))
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
