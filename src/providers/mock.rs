/*!
 * Mock translator implementations for testing.
 *
 * This module provides an in-process translator that simulates different
 * backend behaviors:
 * - `MockTranslator::working()` - Always succeeds with tagged text
 * - `MockTranslator::with_dictionary()` - Looks translations up in a table
 * - `MockTranslator::intermittent()` - Fails every Nth request
 * - `MockTranslator::failing()` - Always answers with an API error
 * - `MockTranslator::unreachable()` - Always fails to connect
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Translator;

/// Behavior mode for the mock translator
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds, prefixing the text with the target language
    Working,
    /// Returns the dictionary entry, or the input unchanged when missing
    Dictionary(HashMap<String, String>),
    /// Fails every Nth request (1-based)
    Intermittent { fail_every: usize },
    /// Always fails with an API error
    Failing,
    /// Always fails with a connection error
    Unreachable,
    /// Succeeds after a delay
    Slow { delay_ms: u64 },
}

/// Mock translator for testing pipeline behavior
#[derive(Debug, Clone)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Every (text, target_language) received, in call order
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that translates through a fixed table
    pub fn with_dictionary<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::new(MockBehavior::Dictionary(table))
    }

    /// Create an intermittently failing mock
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    /// Create a mock that always answers with an error
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock whose backend can never be reached
    pub fn unreachable() -> Self {
        Self::new(MockBehavior::Unreachable)
    }

    /// Number of translate calls received so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Texts received so far, in call order
    pub fn received_texts(&self) -> Vec<String> {
        self.requests.lock().iter().map(|(text, _)| text.clone()).collect()
    }

    /// Target languages received so far, in call order
    pub fn received_languages(&self) -> Vec<String> {
        self.requests.lock().iter().map(|(_, lang)| lang.clone()).collect()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push((text.to_string(), target_language.to_string()));

        match &self.behavior {
            MockBehavior::Working => Ok(format!("[{}] {}", target_language, text)),

            MockBehavior::Dictionary(table) => {
                Ok(table.get(text).cloned().unwrap_or_else(|| text.to_string()))
            }

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        status_code: 503,
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                    })
                } else {
                    Ok(format!("[{}] {}", target_language, text))
                }
            }

            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }),

            MockBehavior::Unreachable => Err(ProviderError::ConnectionError(
                "Simulated connection refused".to_string(),
            )),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(*delay_ms)).await;
                Ok(format!("[{}] {}", target_language, text))
            }
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
