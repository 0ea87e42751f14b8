//! Configuration management for the CLI.
//!
//! The whole deployment is described by one TOML file; every knob the
//! pipeline takes is an explicit field here, constructed once and passed
//! down. The extraction service credential is the exception: the file
//! names the environment variable that holds it, never the key itself.

use crate::error::{CliError, Result};
use mailsift_extractor::ExtractorConfig;
use mailsift_pipeline::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory of conversation documents (one JSON file per thread)
    #[serde(default = "default_mailbox_dir")]
    pub mailbox_dir: PathBuf,

    /// Path of the SQLite ledger
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,

    /// Minutes between runs in watch mode
    #[serde(default = "default_watch_interval_minutes")]
    pub watch_interval_minutes: u64,

    /// Extraction service settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Extraction engine settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Run budgets, pacing, tabs, retry policy
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Extraction service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// When false the deployment runs on pattern rules alone
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// API base URL of the extraction gateway
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier to request
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_mailbox_dir() -> PathBuf {
    PathBuf::from("mailbox")
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("mailsift.db")
}

fn default_watch_interval_minutes() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    "http://localhost:8080/v1".to_string()
}

fn default_model() -> String {
    "sift-extract-1".to_string()
}

fn default_api_key_env() -> String {
    "MAILSIFT_API_KEY".to_string()
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mailbox_dir: default_mailbox_dir(),
            ledger_path: default_ledger_path(),
            watch_interval_minutes: default_watch_interval_minutes(),
            llm: LlmSettings::default(),
            extractor: ExtractorConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Config {
    /// The default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".mailsift").join("config.toml"))
    }

    /// Load configuration from the given path, the default path, or fall
    /// back to defaults when no file exists yet.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let path = match override_path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the given path or the default path.
    pub fn save(&self, override_path: Option<&Path>) -> Result<()> {
        let path = match override_path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("could not serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Resolve the extraction service key from the credential store.
    ///
    /// A missing key with the service enabled is a fatal configuration
    /// error: the run aborts before any side effect.
    pub fn api_key(&self) -> Result<String> {
        std::env::var(&self.llm.api_key_env).map_err(|_| {
            CliError::Config(format!(
                "extraction service enabled but credential variable '{}' is not set",
                self.llm.api_key_env
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.watch_interval_minutes, 60);
        assert!(config.llm.enabled);
        assert_eq!(config.pipeline.max_messages, 15);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.watch_interval_minutes = 15;
        config.llm.enabled = false;
        config.pipeline.max_messages = 7;
        config.save(Some(&path)).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.watch_interval_minutes, 15);
        assert!(!loaded.llm.enabled);
        assert_eq!(loaded.pipeline.max_messages, 7);
        assert_eq!(loaded.pipeline.tabs.records, "Applications");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "ledger_path = \"custom.db\"\n\n[llm]\nmodel = \"other\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.ledger_path, PathBuf::from("custom.db"));
        assert_eq!(config.llm.model, "other");
        assert_eq!(config.llm.api_key_env, "MAILSIFT_API_KEY");
        assert_eq!(config.extractor.llm_timeout_secs, 60);
    }
}
