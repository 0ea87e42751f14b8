//! Configuration for pipeline runs
//!
//! Budgets, pacing, tab names, and the retry policy, as one explicit
//! struct handed to the pipeline by whoever provisions the deployment.

use mailsift_store::{LedgerTabs, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the pipeline
///
/// # Examples
///
/// ```
/// use mailsift_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.max_messages, 15);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum conversations scanned per run
    /// Default: 10
    #[serde(default = "default_max_conversations")]
    pub max_conversations: usize,

    /// Maximum messages sent through extraction per run
    /// Default: 15
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,

    /// Wall-clock ceiling per run, measured from run start (seconds)
    /// Default: 240
    #[serde(default = "default_max_runtime_secs")]
    pub max_runtime_secs: u64,

    /// Lower bound of the randomized pause between extraction calls (ms).
    /// The jitter keeps a batch of calls inside the service's rate limits.
    #[serde(default = "default_message_pause_min_ms")]
    pub message_pause_min_ms: u64,

    /// Upper bound of the randomized pause between extraction calls (ms)
    #[serde(default = "default_message_pause_max_ms")]
    pub message_pause_max_ms: u64,

    /// Fixed, shorter pause between conversations (ms)
    #[serde(default = "default_conversation_pause_ms")]
    pub conversation_pause_ms: u64,

    /// Whether persisted error rows count as terminal outcomes
    #[serde(default)]
    pub retry_policy: RetryPolicy,

    /// Names of the destination tabs
    #[serde(default)]
    pub tabs: LedgerTabs,
}

fn default_max_conversations() -> usize {
    10
}

fn default_max_messages() -> usize {
    15
}

fn default_max_runtime_secs() -> u64 {
    240
}

fn default_message_pause_min_ms() -> u64 {
    800
}

fn default_message_pause_max_ms() -> u64 {
    2_000
}

fn default_conversation_pause_ms() -> u64 {
    250
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_conversations: default_max_conversations(),
            max_messages: default_max_messages(),
            max_runtime_secs: default_max_runtime_secs(),
            message_pause_min_ms: default_message_pause_min_ms(),
            message_pause_max_ms: default_message_pause_max_ms(),
            conversation_pause_ms: default_conversation_pause_ms(),
            retry_policy: RetryPolicy::default(),
            tabs: LedgerTabs::default(),
        }
    }
}

impl PipelineConfig {
    /// Unmetered preset: no pauses, generous budgets. For tests and
    /// backfills against a local ledger, not for a rate-limited service.
    pub fn unmetered() -> Self {
        Self {
            max_conversations: 1_000,
            max_messages: 10_000,
            max_runtime_secs: 3_600,
            message_pause_min_ms: 0,
            message_pause_max_ms: 0,
            conversation_pause_ms: 0,
            retry_policy: RetryPolicy::default(),
            tabs: LedgerTabs::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_conversations == 0 {
            return Err("max_conversations must be greater than 0".to_string());
        }
        if self.max_messages == 0 {
            return Err("max_messages must be greater than 0".to_string());
        }
        if self.max_runtime_secs == 0 {
            return Err("max_runtime_secs must be greater than 0".to_string());
        }
        if self.message_pause_min_ms > self.message_pause_max_ms {
            return Err("message_pause_min_ms cannot exceed message_pause_max_ms".to_string());
        }
        Ok(())
    }

    /// Get the wall-clock ceiling as a Duration
    pub fn max_runtime(&self) -> Duration {
        Duration::from_secs(self.max_runtime_secs)
    }

    /// Get the inter-conversation pause as a Duration
    pub fn conversation_pause(&self) -> Duration {
        Duration::from_millis(self.conversation_pause_ms)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}
