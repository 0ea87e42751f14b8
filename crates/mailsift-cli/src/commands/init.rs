//! Provision the ledger tabs, mailbox directory, and configuration file.
//!
//! This is the one-time setup collaborator: everything the pipeline later
//! treats as a fatal precondition is created here, idempotently.

use crate::config::Config;
use crate::error::Result;
use mailsift_domain::{ERROR_COLUMNS, RECORD_COLUMNS};
use mailsift_store::SqliteLedger;
use std::fs;
use std::path::Path;

/// Execute the init command.
pub fn execute_init(config: &Config, config_path: Option<&Path>) -> Result<()> {
    let mut ledger = SqliteLedger::open(&config.ledger_path)?;
    ledger.create_tab(&config.pipeline.tabs.records, RECORD_COLUMNS)?;
    ledger.create_tab(&config.pipeline.tabs.errors, ERROR_COLUMNS)?;

    fs::create_dir_all(&config.mailbox_dir)?;

    config.save(config_path)?;

    println!(
        "Provisioned ledger '{}' (tabs '{}', '{}') and mailbox directory '{}'",
        config.ledger_path.display(),
        config.pipeline.tabs.records,
        config.pipeline.tabs.errors,
        config.mailbox_dir.display()
    );
    Ok(())
}
