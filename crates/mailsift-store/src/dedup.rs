//! Deduplication tracker: rebuild the processed-id set from persisted rows.

use crate::writer::LedgerTabs;
use crate::LedgerError;
use mailsift_domain::traits::Ledger;
use mailsift_domain::{columns, HeaderMap, MessageId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Whether a persisted error row counts as a terminal outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetryPolicy {
    /// Error rows are non-terminal: a failed message is attempted again
    /// when its conversation is reprocessed. The default.
    #[default]
    ErrorsRetried,

    /// Error rows are terminal: one failure, one audit row, never again.
    ErrorsTerminal,
}

/// Rebuild the set of already-processed message ids by scanning the
/// source-id column of the records tab (and, under
/// [`RetryPolicy::ErrorsTerminal`], the errors tab).
///
/// This scan is the correctness anchor for idempotency; it runs at the
/// start of every run and is O(rows). A header-only tab contributes
/// nothing and is not an error.
pub fn processed_ids<L>(
    ledger: &L,
    tabs: &LedgerTabs,
    policy: RetryPolicy,
) -> Result<HashSet<MessageId>, LedgerError>
where
    L: Ledger,
    L::Error: std::fmt::Display,
{
    let mut ids = HashSet::new();
    scan_tab(ledger, &tabs.records, &mut ids)?;

    if policy == RetryPolicy::ErrorsTerminal {
        scan_tab(ledger, &tabs.errors, &mut ids)?;
    }

    debug!("Rebuilt processed set: {} message ids", ids.len());
    Ok(ids)
}

fn scan_tab<L>(ledger: &L, tab: &str, ids: &mut HashSet<MessageId>) -> Result<(), LedgerError>
where
    L: Ledger,
    L::Error: std::fmt::Display,
{
    let header = ledger
        .header(tab)
        .map_err(|e| LedgerError::Backend(e.to_string()))?;
    let map = HeaderMap::resolve(&header, &[columns::SOURCE_EMAIL_ID])
        .map_err(|e| LedgerError::Header(tab.to_string(), e))?;

    let rows = ledger
        .rows(tab)
        .map_err(|e| LedgerError::Backend(e.to_string()))?;

    for row in &rows {
        if let Some(id) = map.value(row, columns::SOURCE_EMAIL_ID) {
            if !id.trim().is_empty() {
                ids.insert(MessageId::new(id.trim()));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::{append_error, append_record};
    use crate::MemoryLedger;
    use mailsift_domain::{ErrorRow, JobRecord, ERROR_COLUMNS, RECORD_COLUMNS};

    fn provisioned() -> (MemoryLedger, LedgerTabs) {
        let mut ledger = MemoryLedger::new();
        let tabs = LedgerTabs::default();
        ledger.create_tab(&tabs.records, RECORD_COLUMNS);
        ledger.create_tab(&tabs.errors, ERROR_COLUMNS);
        (ledger, tabs)
    }

    fn record_for(id: &str) -> JobRecord {
        JobRecord::new("Engineer", "Acme", MessageId::new(id), "subject", 1_700_000_000)
    }

    fn error_for(id: &str) -> ErrorRow {
        ErrorRow {
            source_message_id: MessageId::new(id),
            source_subject: "subject".to_string(),
            reason: "extraction failed".to_string(),
            detail: "detail".to_string(),
            logged_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_header_only_tabs_yield_empty_set() {
        let (ledger, tabs) = provisioned();
        let ids = processed_ids(&ledger, &tabs, RetryPolicy::default()).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_record_ids_collected() {
        let (mut ledger, tabs) = provisioned();
        append_record(&mut ledger, &tabs, &record_for("m-1")).unwrap();
        append_record(&mut ledger, &tabs, &record_for("m-2")).unwrap();
        // Two records from the same message still count once
        append_record(&mut ledger, &tabs, &record_for("m-2")).unwrap();

        let ids = processed_ids(&ledger, &tabs, RetryPolicy::default()).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&MessageId::new("m-1")));
        assert!(ids.contains(&MessageId::new("m-2")));
    }

    #[test]
    fn test_error_rows_excluded_by_default() {
        let (mut ledger, tabs) = provisioned();
        append_error(&mut ledger, &tabs, &error_for("m-9")).unwrap();

        let ids = processed_ids(&ledger, &tabs, RetryPolicy::ErrorsRetried).unwrap();
        assert!(!ids.contains(&MessageId::new("m-9")));
    }

    #[test]
    fn test_error_rows_included_when_terminal() {
        let (mut ledger, tabs) = provisioned();
        append_error(&mut ledger, &tabs, &error_for("m-9")).unwrap();

        let ids = processed_ids(&ledger, &tabs, RetryPolicy::ErrorsTerminal).unwrap();
        assert!(ids.contains(&MessageId::new("m-9")));
    }

    #[test]
    fn test_missing_source_column_is_header_error() {
        let mut ledger = MemoryLedger::new();
        let tabs = LedgerTabs::default();
        ledger.create_tab(&tabs.records, &["Title"]);
        ledger.create_tab(&tabs.errors, ERROR_COLUMNS);

        let result = processed_ids(&ledger, &tabs, RetryPolicy::default());
        assert!(matches!(result, Err(LedgerError::Header(_, _))));
    }
}
