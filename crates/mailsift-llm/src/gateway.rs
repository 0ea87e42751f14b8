//! Gateway Provider Implementation
//!
//! HTTP integration with a hosted chat-completions endpoint used as the
//! extraction service. The API key comes from the deployment's credential
//! store (an environment variable at the CLI rim), never from this crate.
//!
//! # Features
//!
//! - Async HTTP communication with the completions API
//! - Configurable endpoint and model
//! - Retry logic with exponential backoff
//! - Request timeout handling

use crate::LlmError;
use mailsift_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-request timeout (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// HTTP provider against a chat-completions style extraction endpoint.
pub struct GatewayProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
}

/// Request body for the completions API
#[derive(Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Response body from the completions API
#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}

impl GatewayProvider {
    /// Create a new gateway provider.
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g. `https://gateway.example.com/v1`)
    /// - `model`: model identifier to request
    /// - `api_key`: bearer token supplied by the credential store
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Set the maximum number of retry attempts.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Generate a completion for the prompt.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint is unreachable, the key is
    /// rejected, the model is unknown, or the response body does not carry
    /// a completion.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));

        let request_body = CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: 0.0,
        };

        // Retry loop with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return match response.json::<CompletionResponse>().await {
                            Ok(body) => body
                                .choices
                                .into_iter()
                                .next()
                                .map(|c| c.message.content)
                                .ok_or_else(|| {
                                    LlmError::InvalidResponse(
                                        "response carried no choices".to_string(),
                                    )
                                }),
                            Err(e) => Err(LlmError::InvalidResponse(format!(
                                "failed to parse response: {}",
                                e
                            ))),
                        };
                    } else if status == reqwest::StatusCode::UNAUTHORIZED
                        || status == reqwest::StatusCode::FORBIDDEN
                    {
                        return Err(LlmError::Auth(format!("HTTP {}", status)));
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "unknown error".to_string());
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, ...
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("max retries exceeded".to_string())))
    }
}

impl LlmProviderTrait for GatewayProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        // Blocking wrapper for the async call; the extraction engine runs
        // this on a blocking thread.
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(async { self.generate(prompt).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_provider_creation() {
        let provider = GatewayProvider::new("https://gateway.example.com/v1", "sift-1", "key");
        assert_eq!(provider.endpoint, "https://gateway.example.com/v1");
        assert_eq!(provider.model, "sift-1");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_gateway_provider_with_max_retries() {
        let provider =
            GatewayProvider::new("https://gateway.example.com/v1", "sift-1", "key")
                .with_max_retries(5);
        assert_eq!(provider.max_retries, 5);
    }

    #[tokio::test]
    async fn test_gateway_error_handling() {
        // Connection-refused endpoint triggers a communication error
        let provider = GatewayProvider::new("http://127.0.0.1:1", "sift-1", "key")
            .with_max_retries(1);

        let result = provider.generate("test").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }

    // Integration test (requires a live gateway)
    #[tokio::test]
    #[ignore]
    async fn test_gateway_generate_integration() {
        let key = std::env::var("MAILSIFT_API_KEY").unwrap_or_default();
        let provider = GatewayProvider::new("http://localhost:8080/v1", "sift-1", key);
        let result = provider.generate("Reply with []").await;

        if let Ok(response) = result {
            assert!(!response.is_empty());
        }
    }
}
