//! The two extraction tiers and the policy composing them

use crate::config::ExtractorConfig;
use crate::error::ExtractError;
use crate::parser::parse_response;
use crate::patterns::PatternExtractor;
use crate::prompt::PromptBuilder;
use crate::types::Extraction;
use crate::ExtractListings;
use mailsift_domain::traits::LlmProvider;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Primary tier: prompt an LLM and parse its structured reply.
pub struct LlmExtractor<P> {
    provider: Arc<P>,
    config: ExtractorConfig,
}

impl<P> LlmExtractor<P>
where
    P: LlmProvider + Send + Sync + 'static,
    P::Error: Into<ExtractError> + Send + 'static,
{
    /// Create an extractor over the given provider.
    pub fn new(provider: P, config: ExtractorConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
        }
    }

    /// Call the provider on a blocking thread.
    async fn call_provider(&self, prompt: &str) -> Result<String, ExtractError> {
        let provider = Arc::clone(&self.provider);
        let prompt = prompt.to_string();

        // The provider trait is synchronous; run it off the async thread.
        tokio::task::spawn_blocking(move || provider.generate(&prompt).map_err(Into::into))
            .await
            .map_err(|e| ExtractError::Provider(format!("task join error: {}", e)))?
    }
}

impl<P> ExtractListings for LlmExtractor<P>
where
    P: LlmProvider + Send + Sync + 'static,
    P::Error: Into<ExtractError> + Send + 'static,
{
    async fn extract(&self, body: &str) -> Result<Extraction, ExtractError> {
        if body.trim().is_empty() {
            return Ok(Extraction::Empty);
        }
        if body.len() > self.config.max_body_length {
            return Err(ExtractError::BodyTooLong(
                body.len(),
                self.config.max_body_length,
            ));
        }

        let prompt = PromptBuilder::new(body).build();
        debug!("Prompt length: {} chars", prompt.len());

        // The per-call ceiling is what bounds a hung service call; the
        // run's wall-clock budget only checks between messages.
        let raw = timeout(self.config.llm_timeout(), self.call_provider(&prompt))
            .await
            .map_err(|_| ExtractError::Timeout)??;

        debug!("Service response length: {} chars", raw.len());

        let candidates = parse_response(&raw)?;
        info!("Parsed {} valid candidates", candidates.len());

        Ok(Extraction::Listings(candidates))
    }
}

/// Try-primary-else-fallback policy over the two tiers.
///
/// The fallback engages only when the primary tier is structurally
/// unavailable - missing entirely, or rejected by the service in a way
/// that retrying cannot fix. A transient failure propagates instead, so
/// the conversation is retried through the primary tier on a later run.
/// A primary success with zero candidates never engages the fallback.
pub struct TieredExtractor<P> {
    primary: Option<LlmExtractor<P>>,
    fallback: PatternExtractor,
}

impl<P> TieredExtractor<P>
where
    P: LlmProvider + Send + Sync + 'static,
    P::Error: Into<ExtractError> + Send + 'static,
{
    /// Compose both tiers with the LLM tier as primary.
    pub fn with_primary(provider: P, config: ExtractorConfig) -> Self {
        Self {
            primary: Some(LlmExtractor::new(provider, config)),
            fallback: PatternExtractor::new(),
        }
    }

    /// Pattern rules only - for deployments with no extraction service.
    pub fn fallback_only() -> Self {
        Self {
            primary: None,
            fallback: PatternExtractor::new(),
        }
    }
}

impl<P> ExtractListings for TieredExtractor<P>
where
    P: LlmProvider + Send + Sync + 'static,
    P::Error: Into<ExtractError> + Send + 'static,
{
    async fn extract(&self, body: &str) -> Result<Extraction, ExtractError> {
        match &self.primary {
            Some(llm) => match llm.extract(body).await {
                Err(e) if e.is_structural() => {
                    warn!("Primary extraction unavailable ({}), using pattern rules", e);
                    self.fallback.extract(body).await
                }
                outcome => outcome,
            },
            None => self.fallback.extract(body).await,
        }
    }
}
