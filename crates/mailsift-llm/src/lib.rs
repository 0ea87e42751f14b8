//! Mailsift LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `mailsift-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: deterministic mock for testing
//! - `GatewayProvider`: HTTP integration with a hosted extraction model
//!
//! # Examples
//!
//! ```
//! use mailsift_llm::MockProvider;
//! use mailsift_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("[]");
//! let result = provider.generate("any prompt").unwrap();
//! assert_eq!(result, "[]");
//! ```

#![warn(missing_docs)]

pub mod gateway;

use mailsift_domain::traits::LlmProvider as LlmProviderTrait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use gateway::GatewayProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the service
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available at the endpoint
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Authentication rejected by the endpoint
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// True when the provider is structurally unusable rather than
    /// transiently failing - the caller should not retry through it.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, LlmError::ModelNotAvailable(_) | LlmError::Auth(_))
    }
}

/// What the mock does when asked to generate.
#[derive(Debug, Clone)]
enum MockMode {
    Respond,
    Error,
    Unavailable,
}

/// Mock LLM provider for deterministic testing
///
/// Returns a pre-configured response (or failure) without any network
/// call, and counts invocations so tests can assert call behavior.
///
/// # Examples
///
/// ```
/// use mailsift_llm::MockProvider;
/// use mailsift_domain::traits::LlmProvider;
///
/// let provider = MockProvider::new(r#"[{"jobTitle": "Engineer", "company": "Acme"}]"#);
/// assert!(provider.generate("prompt").is_ok());
/// assert_eq!(provider.call_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    response: String,
    mode: MockMode,
    call_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    /// Create a mock that returns the same response for every prompt.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            mode: MockMode::Respond,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Create a mock that fails every call with a transient error.
    pub fn erroring() -> Self {
        Self {
            response: String::new(),
            mode: MockMode::Error,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Create a mock that reports the model as unavailable - the
    /// structural failure class that engages fallback extraction.
    pub fn unavailable() -> Self {
        Self {
            response: String::new(),
            mode: MockMode::Unavailable,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of times `generate` was called.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, _prompt: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        match self.mode {
            MockMode::Respond => Ok(self.response.clone()),
            MockMode::Error => Err(LlmError::Communication("mock failure".to_string())),
            MockMode::Unavailable => {
                Err(LlmError::ModelNotAvailable("mock model".to_string()))
            }
        }
    }
}
