//! Error types for the pipeline

use thiserror::Error;

/// Errors that abort an entire run.
///
/// Everything narrower - a failed extraction, an unappendable row, a
/// label that would not move - is handled inside the loop and surfaces
/// through metrics and the errors tab instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Pre-loop configuration fault: invalid budgets, unprovisioned tabs,
    /// missing required columns.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The ledger could not be scanned to rebuild the processed set.
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Pending conversations could not be enumerated.
    #[error("Mailbox error: {0}")]
    Mailbox(String),
}
