//! Header map - field-name to column-position resolution.
//!
//! The destination ledger is a sheet-like table whose first row names its
//! columns. Writes are positioned by looking names up in that row, never by
//! fixed index, so upstream column reordering cannot corrupt rows.

use std::collections::HashMap;

/// Canonical column names used by the ledger tabs.
pub mod columns {
    /// Ledger row identity.
    pub const RECORD_ID: &str = "Record Id";
    /// Job title.
    pub const TITLE: &str = "Title";
    /// Hiring organization.
    pub const ORGANIZATION: &str = "Organization";
    /// Posting location.
    pub const LOCATION: &str = "Location";
    /// Link to the posting.
    pub const SOURCE_URL: &str = "Source URL";
    /// Lifecycle status.
    pub const STATUS: &str = "Status";
    /// Epoch seconds the record entered the ledger.
    pub const DATE_ADDED: &str = "Date Added";
    /// Source message identifier - the idempotency key.
    pub const SOURCE_EMAIL_ID: &str = "Source Email ID";
    /// Source message subject.
    pub const SOURCE_SUBJECT: &str = "Source Subject";
    /// Epoch seconds extraction ran.
    pub const PROCESSED_AT: &str = "Processed At";
    /// Error row: short failure category.
    pub const REASON: &str = "Reason";
    /// Error row: raw error detail.
    pub const DETAIL: &str = "Detail";
    /// Error row: epoch seconds the failure was recorded.
    pub const LOGGED_AT: &str = "Logged At";
}

/// Columns the records tab must carry, in provisioning order.
pub const RECORD_COLUMNS: &[&str] = &[
    columns::RECORD_ID,
    columns::TITLE,
    columns::ORGANIZATION,
    columns::LOCATION,
    columns::SOURCE_URL,
    columns::STATUS,
    columns::DATE_ADDED,
    columns::SOURCE_EMAIL_ID,
    columns::SOURCE_SUBJECT,
    columns::PROCESSED_AT,
];

/// Columns the errors tab must carry, in provisioning order.
pub const ERROR_COLUMNS: &[&str] = &[
    columns::SOURCE_EMAIL_ID,
    columns::SOURCE_SUBJECT,
    columns::REASON,
    columns::DETAIL,
    columns::LOGGED_AT,
];

/// Resolved positions of named columns within one tab's header row.
#[derive(Debug, Clone)]
pub struct HeaderMap {
    positions: HashMap<String, usize>,
    width: usize,
}

impl HeaderMap {
    /// Resolve a header row, requiring every column in `required` to be
    /// present. Column matching trims whitespace and ignores case.
    ///
    /// A missing required column is a configuration fault: the tab was not
    /// provisioned for this pipeline.
    pub fn resolve(header: &[String], required: &[&str]) -> Result<Self, String> {
        let mut positions = HashMap::with_capacity(header.len());
        for (idx, name) in header.iter().enumerate() {
            let key = name.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            // First occurrence wins when a header repeats a name.
            positions.entry(key).or_insert(idx);
        }

        for name in required {
            if !positions.contains_key(&name.to_lowercase()) {
                return Err(format!("missing required column: {}", name));
            }
        }

        Ok(Self {
            positions,
            width: header.len(),
        })
    }

    /// Position of a named column, if the header carries it.
    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(&column.to_lowercase()).copied()
    }

    /// Number of columns in the header row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// An empty row sized to the header, ready for [`HeaderMap::place`].
    pub fn blank_row(&self) -> Vec<String> {
        vec![String::new(); self.width]
    }

    /// Place a value into the row at the named column's position.
    pub fn place(
        &self,
        row: &mut [String],
        column: &str,
        value: impl Into<String>,
    ) -> Result<(), String> {
        let idx = self
            .position(column)
            .ok_or_else(|| format!("unknown column: {}", column))?;
        row[idx] = value.into();
        Ok(())
    }

    /// Read the value at the named column's position from a data row.
    /// Returns `None` when the header lacks the column or the row is short.
    pub fn value<'r>(&self, row: &'r [String], column: &str) -> Option<&'r str> {
        let idx = self.position(column)?;
        row.get(idx).map(String::as_str)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: placing into any permutation of the record header and
        /// reading back by name returns the placed value.
        #[test]
        fn test_place_read_roundtrip(seed in 0usize..1000, value in "[a-zA-Z0-9 ]{0,30}") {
            // Deterministic shuffle driven by the seed.
            let mut names: Vec<String> = RECORD_COLUMNS.iter().map(|s| s.to_string()).collect();
            let len = names.len();
            for i in 0..len {
                names.swap(i, (seed + i * 7) % len);
            }

            let map = HeaderMap::resolve(&names, RECORD_COLUMNS).unwrap();
            let mut row = map.blank_row();
            map.place(&mut row, columns::ORGANIZATION, value.clone()).unwrap();
            prop_assert_eq!(map.value(&row, columns::ORGANIZATION), Some(value.as_str()));
        }
    }
}
