//! SQLite-backed ledger implementation.

use crate::LedgerError;
use mailsift_domain::traits::Ledger;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Durable ledger over SQLite.
///
/// Each tab is a header row in `tabs` plus ordered cell arrays in
/// `tab_rows`; the positional-cells model matches the upstream sheet the
/// header map was designed for.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// `SqliteLedger` instance.
pub struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    /// Open (or create) a ledger at the given database path.
    ///
    /// Use `:memory:` for an in-memory ledger (useful for testing).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LedgerError> {
        let conn = Connection::open(path)?;
        let ledger = Self { conn };
        ledger.initialize_schema()?;
        Ok(ledger)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), LedgerError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Provision a tab with the given header row. A tab that already
    /// exists keeps its header - provisioning is idempotent and never
    /// rewrites columns under existing data.
    pub fn create_tab(&mut self, tab: &str, header: &[&str]) -> Result<(), LedgerError> {
        let header: Vec<String> = header.iter().map(|s| s.to_string()).collect();
        let encoded = serde_json::to_string(&header)
            .map_err(|e| LedgerError::InvalidData(e.to_string()))?;
        self.conn.execute(
            "INSERT OR IGNORE INTO tabs (name, header) VALUES (?1, ?2)",
            params![tab, encoded],
        )?;
        Ok(())
    }

    /// Whether a tab has been provisioned.
    pub fn has_tab(&self, tab: &str) -> Result<bool, LedgerError> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM tabs WHERE name = ?1",
                params![tab],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn decode_cells(encoded: &str) -> Result<Vec<String>, LedgerError> {
        serde_json::from_str(encoded)
            .map_err(|e| LedgerError::InvalidData(format!("bad cell array: {}", e)))
    }
}

impl Ledger for SqliteLedger {
    type Error = LedgerError;

    fn header(&self, tab: &str) -> Result<Vec<String>, Self::Error> {
        let encoded: Option<String> = self
            .conn
            .query_row(
                "SELECT header FROM tabs WHERE name = ?1",
                params![tab],
                |row| row.get(0),
            )
            .optional()?;

        match encoded {
            Some(encoded) => Self::decode_cells(&encoded),
            None => Err(LedgerError::TabNotFound(tab.to_string())),
        }
    }

    fn rows(&self, tab: &str) -> Result<Vec<Vec<String>>, Self::Error> {
        if !self.has_tab(tab)? {
            return Err(LedgerError::TabNotFound(tab.to_string()));
        }

        let mut stmt = self
            .conn
            .prepare("SELECT cells FROM tab_rows WHERE tab = ?1 ORDER BY id")?;
        let encoded_rows = stmt
            .query_map(params![tab], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        encoded_rows
            .iter()
            .map(|encoded| Self::decode_cells(encoded))
            .collect()
    }

    fn append_row(&mut self, tab: &str, row: Vec<String>) -> Result<(), Self::Error> {
        if !self.has_tab(tab)? {
            return Err(LedgerError::TabNotFound(tab.to_string()));
        }

        let encoded =
            serde_json::to_string(&row).map_err(|e| LedgerError::InvalidData(e.to_string()))?;
        self.conn.execute(
            "INSERT INTO tab_rows (tab, cells) VALUES (?1, ?2)",
            params![tab, encoded],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> SqliteLedger {
        SqliteLedger::open(":memory:").unwrap()
    }

    #[test]
    fn test_create_and_read_tab() {
        let mut ledger = ledger();
        ledger.create_tab("Applications", &["Title", "Status"]).unwrap();

        assert!(ledger.has_tab("Applications").unwrap());
        assert_eq!(ledger.header("Applications").unwrap(), vec!["Title", "Status"]);
        assert!(ledger.rows("Applications").unwrap().is_empty());
    }

    #[test]
    fn test_missing_tab_errors() {
        let ledger = ledger();
        assert!(matches!(
            ledger.header("Nope"),
            Err(LedgerError::TabNotFound(_))
        ));
        assert!(matches!(ledger.rows("Nope"), Err(LedgerError::TabNotFound(_))));
    }

    #[test]
    fn test_append_preserves_order() {
        let mut ledger = ledger();
        ledger.create_tab("T", &["A"]).unwrap();

        for i in 0..5 {
            ledger.append_row("T", vec![format!("row-{i}")]).unwrap();
        }

        let rows = ledger.rows("T").unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], vec!["row-0"]);
        assert_eq!(rows[4], vec!["row-4"]);
    }

    #[test]
    fn test_append_to_missing_tab_errors() {
        let mut ledger = ledger();
        let result = ledger.append_row("Nope", vec!["x".to_string()]);
        assert!(matches!(result, Err(LedgerError::TabNotFound(_))));
    }

    #[test]
    fn test_provisioning_is_idempotent() {
        let mut ledger = ledger();
        ledger.create_tab("T", &["A", "B"]).unwrap();
        ledger.append_row("T", vec!["1".into(), "2".into()]).unwrap();

        // Re-provisioning with a different header must not clobber
        ledger.create_tab("T", &["C"]).unwrap();
        assert_eq!(ledger.header("T").unwrap(), vec!["A", "B"]);
        assert_eq!(ledger.rows("T").unwrap().len(), 1);
    }
}
