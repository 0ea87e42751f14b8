//! Integration tests exercising the SQLite ledger end to end.

use mailsift_domain::traits::Ledger;
use mailsift_domain::{
    columns, ErrorRow, HeaderMap, JobRecord, MessageId, ERROR_COLUMNS, RECORD_COLUMNS,
};
use mailsift_store::{
    append_error, append_record, processed_ids, LedgerTabs, RetryPolicy, SqliteLedger,
};
use tempfile::tempdir;

fn provisioned(path: &std::path::Path) -> (SqliteLedger, LedgerTabs) {
    let mut ledger = SqliteLedger::open(path).unwrap();
    let tabs = LedgerTabs::default();
    ledger.create_tab(&tabs.records, RECORD_COLUMNS).unwrap();
    ledger.create_tab(&tabs.errors, ERROR_COLUMNS).unwrap();
    (ledger, tabs)
}

fn record_for(id: &str, title: &str) -> JobRecord {
    JobRecord::new(title, "Acme", MessageId::new(id), "Your application", 1_700_000_000)
}

#[test]
fn test_write_and_rescan_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    let (mut ledger, tabs) = provisioned(&path);

    append_record(&mut ledger, &tabs, &record_for("m-1", "Backend Engineer")).unwrap();
    append_record(&mut ledger, &tabs, &record_for("m-2", "Data Analyst")).unwrap();
    append_error(
        &mut ledger,
        &tabs,
        &ErrorRow {
            source_message_id: MessageId::new("m-3"),
            source_subject: "Alert digest".to_string(),
            reason: "extraction failed".to_string(),
            detail: "timeout".to_string(),
            logged_at: 1_700_000_050,
        },
    )
    .unwrap();
    drop(ledger);

    // Reopen: the durable state is the only carry-over between runs
    let ledger = SqliteLedger::open(&path).unwrap();
    let ids = processed_ids(&ledger, &tabs, RetryPolicy::default()).unwrap();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&MessageId::new("m-1")));
    assert!(!ids.contains(&MessageId::new("m-3")));

    let terminal = processed_ids(&ledger, &tabs, RetryPolicy::ErrorsTerminal).unwrap();
    assert_eq!(terminal.len(), 3);
}

#[test]
fn test_rows_readable_through_header_map() {
    let dir = tempdir().unwrap();
    let (mut ledger, tabs) = provisioned(&dir.path().join("ledger.db"));

    let record = record_for("m-7", "Platform Engineer").with_url("https://jobs.example.com/7");
    append_record(&mut ledger, &tabs, &record).unwrap();

    let header = ledger.header(&tabs.records).unwrap();
    let map = HeaderMap::resolve(&header, RECORD_COLUMNS).unwrap();
    let rows = ledger.rows(&tabs.records).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(map.value(&rows[0], columns::TITLE), Some("Platform Engineer"));
    assert_eq!(
        map.value(&rows[0], columns::SOURCE_URL),
        Some("https://jobs.example.com/7")
    );
    assert_eq!(map.value(&rows[0], columns::STATUS), Some("New"));
}

#[test]
fn test_header_only_ledger_scans_empty() {
    let dir = tempdir().unwrap();
    let (ledger, tabs) = provisioned(&dir.path().join("ledger.db"));

    let ids = processed_ids(&ledger, &tabs, RetryPolicy::default()).unwrap();
    assert!(ids.is_empty());
}
