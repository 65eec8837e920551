/*!
 * Provider implementations for translation backends.
 *
 * This module contains the interfaces the pipeline consumes and the
 * client implementations behind them:
 * - Google: the free-form web translation endpoint
 * - Mock: deterministic in-process translator for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::errors::ProviderError;

/// Common trait for HTTP translation backends
///
/// This trait describes the raw request/response cycle of a backend,
/// allowing each client to keep its own wire types.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Extract the translated text from the provider response
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The text, or a parse error when the
    ///   response does not have the expected shape
    fn extract_text(response: &Self::Response) -> Result<String, ProviderError>;
}

/// The capability the subtitle pipeline consumes: translate one chunk
///
/// Implementations must be safe to share between concurrent requests.
/// Errors are recovered by the caller, which substitutes the original text.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_language`
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError>;

    /// Short name used in log messages
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: Translator + ?Sized> Translator for Arc<T> {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        (**self).translate(text, target_language).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

pub mod google;
pub mod mock;
