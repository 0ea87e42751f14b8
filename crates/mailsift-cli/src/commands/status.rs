//! Read-only view of the ledger and mailbox.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::mailbox::JsonMailbox;
use crate::output::Formatter;
use mailsift_domain::traits::{Ledger, Mailbox};
use mailsift_domain::ConversationLabel;
use mailsift_store::{processed_ids, SqliteLedger};

/// Execute the status command.
pub fn execute_status(config: &Config, formatter: &Formatter) -> Result<()> {
    let ledger = SqliteLedger::open(&config.ledger_path)?;
    let tabs = &config.pipeline.tabs;

    let records = ledger.rows(&tabs.records)?.len();
    let errors = ledger.rows(&tabs.errors)?.len();
    let processed = processed_ids(&ledger, tabs, config.pipeline.retry_policy)?.len();

    let mailbox = JsonMailbox::open(&config.mailbox_dir)?;
    let pending = mailbox
        .conversations_with_label(ConversationLabel::NeedsProcess)
        .map_err(CliError::Mailbox)?
        .len();

    println!("{}", formatter.status(records, errors, processed, pending));
    Ok(())
}
