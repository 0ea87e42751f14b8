//! Mailsift Extractor
//!
//! Converts raw email bodies into structured job posting candidates.
//!
//! # Overview
//!
//! Extraction is two-tiered. The primary tier prompts an LLM with a fixed
//! instruction template and parses its JSON reply. The fallback tier runs
//! deterministic pattern rules against well-known notification templates
//! ("thank you for applying to …") and is engaged only when the primary
//! tier is structurally unavailable - never merely because the primary
//! found nothing.
//!
//! # Architecture
//!
//! ```text
//! Body → TieredExtractor → LlmExtractor → prompt → LLM → parser → candidates
//!                        ↘ PatternExtractor → template rules → candidates
//! ```
//!
//! Both tiers implement [`ExtractListings`]; the policy lives in
//! [`TieredExtractor`] and involves no runtime type inspection.
//!
//! # Outcomes
//!
//! - A whitespace-only body is [`Extraction::Empty`] - a no-op, not an error.
//! - A body yielding zero valid candidates is a successful empty listing.
//! - Candidates with sentinel titles (`"n/a"`, `"error"`) are dropped.
//! - Service failures surface as [`ExtractError`] with the raw detail kept
//!   for the error ledger; nothing here panics on bad input.
//!
//! # Example Usage
//!
//! ```no_run
//! use mailsift_extractor::{ExtractListings, ExtractorConfig, TieredExtractor};
//! use mailsift_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::new("[]");
//! let extractor = TieredExtractor::with_primary(provider, ExtractorConfig::default());
//!
//! let outcome = extractor.extract("We received your application…").await?;
//! println!("{} candidates", outcome.listings().len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod patterns;
mod prompt;
mod types;

#[cfg(test)]
mod tests;

pub use config::ExtractorConfig;
pub use error::ExtractError;
pub use extractor::{LlmExtractor, TieredExtractor};
pub use patterns::PatternExtractor;
pub use types::{Extraction, JobCandidate};

/// A single extraction capability, implemented by both tiers.
///
/// The future is awaited inline by the pipeline; implementations must not
/// spawn work that outlives the call.
#[allow(async_fn_in_trait)]
pub trait ExtractListings {
    /// Extract job posting candidates from a raw message body.
    async fn extract(&self, body: &str) -> Result<Extraction, ExtractError>;
}
