//! Configuration for the extraction engine

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the extraction engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum input body length (characters). Longer bodies are rejected
    /// rather than truncated - a mis-forwarded digest should be audited,
    /// not silently clipped.
    pub max_body_length: usize,

    /// Ceiling for a single extraction service call (seconds). The run's
    /// wall-clock budget is checked at message boundaries only, so this is
    /// what bounds a hung call.
    pub llm_timeout_secs: u64,
}

impl ExtractorConfig {
    /// Get the per-call timeout as a Duration
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_body_length == 0 {
            return Err("max_body_length must be greater than 0".to_string());
        }
        if self.llm_timeout_secs == 0 {
            return Err("llm_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Patient preset: a longer call ceiling for slow self-hosted models.
    pub fn patient() -> Self {
        Self {
            max_body_length: 100_000,
            llm_timeout_secs: 180,
        }
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_body_length: 50_000,
            llm_timeout_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_patient_config_is_valid() {
        let config = ExtractorConfig::patient();
        assert!(config.validate().is_ok());
        assert!(config.llm_timeout_secs > ExtractorConfig::default().llm_timeout_secs);
    }

    #[test]
    fn test_invalid_body_length() {
        let config = ExtractorConfig {
            max_body_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        let config = ExtractorConfig {
            llm_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.max_body_length, parsed.max_body_length);
        assert_eq!(config.llm_timeout_secs, parsed.llm_timeout_secs);
    }
}
