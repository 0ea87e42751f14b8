//! Mailsift Storage Layer
//!
//! Implements the `Ledger` trait from `mailsift-domain` over a sheet-like
//! model: named tabs, each an ordered header row plus append-only data
//! rows of positional cells. On top of the ledger sit the two pieces of
//! pipeline plumbing that touch persisted rows:
//!
//! - the **persistence writer**, which turns records and error rows into
//!   positional rows via the header map; and
//! - the **deduplication tracker**, which rebuilds the set of
//!   already-processed message ids by scanning the source-id column.
//!
//! # Implementations
//!
//! - [`SqliteLedger`]: durable, rusqlite-backed
//! - [`MemoryLedger`]: in-process, for tests and dry runs

#![warn(missing_docs)]

mod dedup;
mod memory;
mod sqlite;
mod writer;

use thiserror::Error;

pub use dedup::{processed_ids, RetryPolicy};
pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;
pub use writer::{append_error, append_record, LedgerTabs};

/// Errors that can occur during ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Named tab does not exist
    #[error("Tab not found: {0}")]
    TabNotFound(String),

    /// Header of a tab is missing a column this pipeline requires
    #[error("Header error in tab '{0}': {1}")]
    Header(String, String),

    /// Stored data could not be decoded
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error surfaced by a foreign ledger implementation
    #[error("Ledger backend error: {0}")]
    Backend(String),
}
