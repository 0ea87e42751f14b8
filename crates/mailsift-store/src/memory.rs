//! In-process ledger for tests and dry runs.

use crate::LedgerError;
use mailsift_domain::traits::Ledger;
use std::collections::HashMap;

/// A ledger held entirely in memory. Same tab semantics as
/// [`crate::SqliteLedger`], nothing persisted.
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    tabs: HashMap<String, Tab>,
}

#[derive(Debug, Clone)]
struct Tab {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl MemoryLedger {
    /// An empty ledger with no tabs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision a tab with the given header row. Idempotent; an existing
    /// tab keeps its header and rows.
    pub fn create_tab(&mut self, tab: &str, header: &[&str]) {
        self.tabs.entry(tab.to_string()).or_insert_with(|| Tab {
            header: header.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        });
    }

    /// Number of data rows in a tab (zero for unknown tabs).
    pub fn row_count(&self, tab: &str) -> usize {
        self.tabs.get(tab).map_or(0, |t| t.rows.len())
    }
}

impl Ledger for MemoryLedger {
    type Error = LedgerError;

    fn header(&self, tab: &str) -> Result<Vec<String>, Self::Error> {
        self.tabs
            .get(tab)
            .map(|t| t.header.clone())
            .ok_or_else(|| LedgerError::TabNotFound(tab.to_string()))
    }

    fn rows(&self, tab: &str) -> Result<Vec<Vec<String>>, Self::Error> {
        self.tabs
            .get(tab)
            .map(|t| t.rows.clone())
            .ok_or_else(|| LedgerError::TabNotFound(tab.to_string()))
    }

    fn append_row(&mut self, tab: &str, row: Vec<String>) -> Result<(), Self::Error> {
        self.tabs
            .get_mut(tab)
            .ok_or_else(|| LedgerError::TabNotFound(tab.to_string()))?
            .rows
            .push(row);
        Ok(())
    }
}
