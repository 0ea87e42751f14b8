//! Persistence writer: append-only rows, positioned by the header map.

use crate::LedgerError;
use mailsift_domain::traits::Ledger;
use mailsift_domain::{columns, ErrorRow, HeaderMap, JobRecord, ERROR_COLUMNS, RECORD_COLUMNS};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Names of the two tabs this pipeline writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTabs {
    /// Tab receiving successful job records.
    pub records: String,

    /// Tab receiving error rows.
    pub errors: String,
}

impl Default for LedgerTabs {
    fn default() -> Self {
        Self {
            records: "Applications".to_string(),
            errors: "Errors".to_string(),
        }
    }
}

/// Append one job record to the records tab.
///
/// The row is sized to the tab's current header and every field lands at
/// the position its column name resolves to, so upstream column
/// reordering cannot corrupt the write.
pub fn append_record<L>(
    ledger: &mut L,
    tabs: &LedgerTabs,
    record: &JobRecord,
) -> Result<(), LedgerError>
where
    L: Ledger,
    L::Error: std::fmt::Display,
{
    let header = ledger
        .header(&tabs.records)
        .map_err(|e| LedgerError::Backend(e.to_string()))?;
    let map = HeaderMap::resolve(&header, RECORD_COLUMNS)
        .map_err(|e| LedgerError::Header(tabs.records.clone(), e))?;

    let mut row = map.blank_row();
    let mut place = |column: &str, value: String| -> Result<(), LedgerError> {
        map.place(&mut row, column, value)
            .map_err(|e| LedgerError::Header(tabs.records.clone(), e))
    };

    place(columns::RECORD_ID, record.record_id.to_string())?;
    place(columns::TITLE, record.title.clone())?;
    place(columns::ORGANIZATION, record.organization.clone())?;
    place(columns::LOCATION, record.location.clone().unwrap_or_default())?;
    place(columns::SOURCE_URL, record.source_url.clone().unwrap_or_default())?;
    place(columns::STATUS, record.status.as_str().to_string())?;
    place(columns::DATE_ADDED, record.date_added.to_string())?;
    place(columns::SOURCE_EMAIL_ID, record.source_message_id.to_string())?;
    place(columns::SOURCE_SUBJECT, record.source_subject.clone())?;
    place(columns::PROCESSED_AT, record.processed_at.to_string())?;

    debug!(
        "Appending record {} for message {}",
        record.record_id, record.source_message_id
    );

    ledger
        .append_row(&tabs.records, row)
        .map_err(|e| LedgerError::Backend(e.to_string()))
}

/// Append one error row to the errors tab.
pub fn append_error<L>(
    ledger: &mut L,
    tabs: &LedgerTabs,
    error: &ErrorRow,
) -> Result<(), LedgerError>
where
    L: Ledger,
    L::Error: std::fmt::Display,
{
    let header = ledger
        .header(&tabs.errors)
        .map_err(|e| LedgerError::Backend(e.to_string()))?;
    let map = HeaderMap::resolve(&header, ERROR_COLUMNS)
        .map_err(|e| LedgerError::Header(tabs.errors.clone(), e))?;

    let mut row = map.blank_row();
    let mut place = |column: &str, value: String| -> Result<(), LedgerError> {
        map.place(&mut row, column, value)
            .map_err(|e| LedgerError::Header(tabs.errors.clone(), e))
    };

    place(columns::SOURCE_EMAIL_ID, error.source_message_id.to_string())?;
    place(columns::SOURCE_SUBJECT, error.source_subject.clone())?;
    place(columns::REASON, error.reason.clone())?;
    place(columns::DETAIL, error.detail.clone())?;
    place(columns::LOGGED_AT, error.logged_at.to_string())?;

    ledger
        .append_row(&tabs.errors, row)
        .map_err(|e| LedgerError::Backend(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryLedger;
    use mailsift_domain::{MessageId, RecordStatus};

    fn record() -> JobRecord {
        JobRecord::new(
            "Backend Engineer",
            "Acme Corp",
            MessageId::new("m-1"),
            "Your application",
            1_700_000_000,
        )
        .with_location("Remote")
        .with_status(RecordStatus::Applied)
    }

    #[test]
    fn test_append_record_places_by_name() {
        let mut ledger = MemoryLedger::new();
        ledger.create_tab("Applications", RECORD_COLUMNS);
        let tabs = LedgerTabs::default();

        append_record(&mut ledger, &tabs, &record()).unwrap();

        let rows = ledger.rows("Applications").unwrap();
        assert_eq!(rows.len(), 1);
        let header = ledger.header("Applications").unwrap();
        let map = HeaderMap::resolve(&header, RECORD_COLUMNS).unwrap();
        assert_eq!(map.value(&rows[0], columns::TITLE), Some("Backend Engineer"));
        assert_eq!(map.value(&rows[0], columns::SOURCE_EMAIL_ID), Some("m-1"));
        assert_eq!(map.value(&rows[0], columns::STATUS), Some("Applied"));
        // Absent optional fields write empty cells
        assert_eq!(map.value(&rows[0], columns::SOURCE_URL), Some(""));
    }

    #[test]
    fn test_append_record_survives_reordered_header() {
        // Records tab provisioned with columns in a different order
        let mut reordered: Vec<&str> = RECORD_COLUMNS.to_vec();
        reordered.reverse();

        let mut ledger = MemoryLedger::new();
        ledger.create_tab("Applications", &reordered);
        let tabs = LedgerTabs::default();

        append_record(&mut ledger, &tabs, &record()).unwrap();

        let rows = ledger.rows("Applications").unwrap();
        let header = ledger.header("Applications").unwrap();
        let map = HeaderMap::resolve(&header, RECORD_COLUMNS).unwrap();
        assert_eq!(map.value(&rows[0], columns::ORGANIZATION), Some("Acme Corp"));
        assert_eq!(map.value(&rows[0], columns::LOCATION), Some("Remote"));
    }

    #[test]
    fn test_append_record_missing_column_is_header_error() {
        let mut ledger = MemoryLedger::new();
        ledger.create_tab("Applications", &["Title", "Organization"]);
        let tabs = LedgerTabs::default();

        let result = append_record(&mut ledger, &tabs, &record());
        assert!(matches!(result, Err(LedgerError::Header(_, _))));
        assert_eq!(ledger.row_count("Applications"), 0);
    }

    #[test]
    fn test_append_error_row() {
        let mut ledger = MemoryLedger::new();
        ledger.create_tab("Errors", ERROR_COLUMNS);
        let tabs = LedgerTabs::default();

        let error = ErrorRow {
            source_message_id: MessageId::new("m-2"),
            source_subject: "Job alert".to_string(),
            reason: "extraction failed".to_string(),
            detail: "Communication error: connection refused".to_string(),
            logged_at: 1_700_000_100,
        };
        append_error(&mut ledger, &tabs, &error).unwrap();

        let rows = ledger.rows("Errors").unwrap();
        let header = ledger.header("Errors").unwrap();
        let map = HeaderMap::resolve(&header, ERROR_COLUMNS).unwrap();
        assert_eq!(map.value(&rows[0], columns::REASON), Some("extraction failed"));
        assert_eq!(map.value(&rows[0], columns::SOURCE_EMAIL_ID), Some("m-2"));
    }
}
