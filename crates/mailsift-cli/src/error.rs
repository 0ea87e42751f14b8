//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mailbox error
    #[error("Mailbox error: {0}")]
    Mailbox(String),

    /// Ledger error
    #[error("Ledger error: {0}")]
    Ledger(#[from] mailsift_store::LedgerError),

    /// Pipeline error
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] mailsift_pipeline::PipelineError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
