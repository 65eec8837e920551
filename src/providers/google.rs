use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{Provider, Translator};

/// Default endpoint of the free web translation API
pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Client for the free-form Google translation endpoint
///
/// The endpoint answers with a loosely-typed nested array:
/// `[[["translated", "original", ...], ["translated", "original", ...]], null, "en", ...]`.
/// Only the first element is read; anything else in the payload is ignored.
#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    /// Endpoint URL
    endpoint: String,
    /// Source language sent as `sl`, usually `auto`
    source_language: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// One translation request
#[derive(Debug, Clone)]
pub struct GoogleTranslateRequest {
    /// Text to translate
    pub text: String,
    /// Source language code or `auto`
    pub source_language: String,
    /// Target language code
    pub target_language: String,
}

impl GoogleTranslateRequest {
    /// Create a request with automatic source detection
    pub fn new(text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_language: "auto".to_string(),
            target_language: target_language.into(),
        }
    }

    /// Set the source language
    pub fn source_language(mut self, source_language: impl Into<String>) -> Self {
        self.source_language = source_language.into();
        self
    }
}

/// Raw response body, kept untyped because its shape varies
#[derive(Debug, Clone)]
pub struct GoogleTranslateResponse {
    /// Parsed JSON body
    pub body: Value,
}

impl GoogleTranslate {
    /// Create a client against the default endpoint
    pub fn new() -> Self {
        Self::new_with_config(DEFAULT_ENDPOINT, "auto", 30, 2, 500)
    }

    /// Create a client with explicit settings
    pub fn new_with_config(
        endpoint: impl Into<String>,
        source_language: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            source_language: source_language.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs.max(1)))
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        }
    }

    /// Endpoint URL in use
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Concatenate every translated segment of a response body
    ///
    /// Entries that are not arrays, or whose first item is not a string,
    /// are skipped. A body whose first element is not an array, or that
    /// yields no text at all, is rejected.
    pub fn parse_segments(body: &Value) -> Result<String, ProviderError> {
        let segments = body
            .as_array()
            .and_then(|outer| outer.first())
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError(
                "expected a nested array of translated segments".to_string(),
            ))?;

        let translated: String = segments
            .iter()
            .filter_map(|segment| segment.as_array()?.first()?.as_str())
            .collect();

        if translated.is_empty() {
            return Err(ProviderError::ParseError(
                "response contained no translated segment".to_string(),
            ));
        }

        Ok(translated)
    }

    /// Map a transport error onto the provider taxonomy
    fn classify_request_error(e: reqwest::Error) -> ProviderError {
        if e.is_connect() || e.is_timeout() {
            ProviderError::ConnectionError(e.to_string())
        } else {
            ProviderError::RequestFailed(e.to_string())
        }
    }
}

impl Default for GoogleTranslate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    type Request = GoogleTranslateRequest;
    type Response = GoogleTranslateResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            let response_result = self.client
                .get(&self.endpoint)
                .query(&[
                    ("client", "gtx"),
                    ("sl", request.source_language.as_str()),
                    ("tl", request.target_language.as_str()),
                    ("dt", "t"),
                    ("q", request.text.as_str()),
                ])
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let response_text = response.text().await
                            .map_err(|e| ProviderError::RequestFailed(format!("Failed to read response body: {}", e)))?;

                        // Parse as data only; a body that is not JSON fails closed
                        let body = serde_json::from_str::<Value>(&response_text).map_err(|e| {
                            debug!("Unparsable translation response (first 200 chars): {}",
                                   response_text.chars().take(200).collect::<String>());
                            ProviderError::ParseError(e.to_string())
                        })?;

                        return Ok(GoogleTranslateResponse { body });
                    }

                    let error_text = response.text().await
                        .unwrap_or_else(|_| "Failed to get error response text".to_string());

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(ProviderError::RateLimitExceeded(error_text));
                        warn!("Translation API rate limited - attempt {}/{}", attempt + 1, self.max_retries + 1);
                    } else if status.is_server_error() {
                        last_error = Some(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                        warn!("Translation API error ({}) - attempt {}/{}", status, attempt + 1, self.max_retries + 1);
                    } else {
                        // Client error - don't retry
                        error!("Translation API error ({}): {}", status, error_text);
                        return Err(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message: error_text,
                        });
                    }
                }
                Err(e) => {
                    let err = Self::classify_request_error(e);
                    warn!("Translation API network error: {} - attempt {}/{}", err, attempt + 1, self.max_retries + 1);
                    last_error = Some(err);
                }
            }

            attempt += 1;

            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1).min(16));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::RequestFailed(format!(
            "Translation request failed after {} attempts", self.max_retries + 1
        ))))
    }

    fn extract_text(response: &Self::Response) -> Result<String, ProviderError> {
        Self::parse_segments(&response.body)
    }
}

#[async_trait]
impl Translator for GoogleTranslate {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        let request = GoogleTranslateRequest::new(text, target_language)
            .source_language(self.source_language.clone());
        let response = self.complete(request).await?;
        Self::extract_text(&response)
    }

    fn name(&self) -> &str {
        "google"
    }
}
