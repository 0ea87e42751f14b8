//! Record module - the rows this pipeline appends to the ledger.

use crate::message::MessageId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a ledger row, based on UUIDv7.
///
/// UUIDv7 provides:
/// - Chronological sortability, so ledger rows sort by ingestion time
/// - 128-bit uniqueness with no coordination between runs
/// - RFC 9562-standard format with broad ecosystem support
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u128);

impl RecordId {
    /// Generate a new UUIDv7-based RecordId.
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a RecordId from a raw u128 value.
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a RecordId from its UUID string form.
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid record id: {}", e))
    }

    /// Get the raw u128 value.
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Lifecycle status of a job record.
///
/// The pipeline writes `New` (or `Applied` when a confirmation template
/// says so); the remaining variants exist for downstream tooling that
/// advances a row after a human acts on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Freshly ingested, not yet acted on.
    #[default]
    New,
    /// An application has been submitted.
    Applied,
    /// Interview process underway.
    Interviewing,
    /// Offer received.
    Offer,
    /// Application rejected.
    Rejected,
    /// No longer tracked.
    Archived,
}

impl RecordStatus {
    /// The status name as written to the ledger.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::New => "New",
            RecordStatus::Applied => "Applied",
            RecordStatus::Interviewing => "Interviewing",
            RecordStatus::Offer => "Offer",
            RecordStatus::Rejected => "Rejected",
            RecordStatus::Archived => "Archived",
        }
    }

    /// Parse a status from its ledger form.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "new" => Some(RecordStatus::New),
            "applied" => Some(RecordStatus::Applied),
            "interviewing" => Some(RecordStatus::Interviewing),
            "offer" => Some(RecordStatus::Offer),
            "rejected" => Some(RecordStatus::Rejected),
            "archived" => Some(RecordStatus::Archived),
            _ => None,
        }
    }
}

/// Titles the extraction service emits when it has nothing real to report.
/// A candidate carrying one of these is dropped, never written.
const SENTINEL_TITLES: &[&str] = &["n/a", "error"];

/// Whether a title names an actual job posting.
///
/// A title is valid when it is non-empty after trimming and is not a
/// case-insensitive sentinel (`"n/a"`, `"error"`).
pub fn is_valid_title(title: &str) -> bool {
    let trimmed = title.trim();
    !trimmed.is_empty()
        && !SENTINEL_TITLES
            .iter()
            .any(|s| trimmed.eq_ignore_ascii_case(s))
}

/// A structured job posting extracted from one message.
///
/// Written once by the persistence writer, never updated in place by this
/// pipeline. `source_message_id` ties the row back to the message it came
/// from and is the key the deduplication tracker scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Ledger row identity.
    pub record_id: RecordId,

    /// Job title. Always valid per [`is_valid_title`] once constructed
    /// through the extraction engine.
    pub title: String,

    /// Hiring organization.
    pub organization: String,

    /// Posting location, when the source mentions one.
    pub location: Option<String>,

    /// Link to the posting, when the source carries one.
    pub source_url: Option<String>,

    /// Lifecycle status.
    pub status: RecordStatus,

    /// Epoch seconds when the record entered the ledger.
    pub date_added: u64,

    /// Message the record was extracted from.
    pub source_message_id: MessageId,

    /// Subject of that message, for human audit.
    pub source_subject: String,

    /// Epoch seconds when extraction ran.
    pub processed_at: u64,
}

impl JobRecord {
    /// Create a record with the required fields; optional fields default
    /// to absent and status to [`RecordStatus::New`].
    pub fn new(
        title: impl Into<String>,
        organization: impl Into<String>,
        source_message_id: MessageId,
        source_subject: impl Into<String>,
        now: u64,
    ) -> Self {
        Self {
            record_id: RecordId::new(),
            title: title.into(),
            organization: organization.into(),
            location: None,
            source_url: None,
            status: RecordStatus::New,
            date_added: now,
            source_message_id,
            source_subject: source_subject.into(),
            processed_at: now,
        }
    }

    /// Set the posting location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the posting link.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Set the lifecycle status.
    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the record's title passes the validity invariant.
    pub fn is_valid(&self) -> bool {
        is_valid_title(&self.title)
    }
}

/// A processing failure for one message, written so a human or a later run
/// can audit what went wrong. Error rows never block progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRow {
    /// Message whose processing failed.
    pub source_message_id: MessageId,

    /// Subject of that message.
    pub source_subject: String,

    /// Short failure category, e.g. `"extraction failed"`.
    pub reason: String,

    /// Raw error detail from the failing layer.
    pub detail: String,

    /// Epoch seconds when the failure was recorded.
    pub logged_at: u64,
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: RecordId ordering matches u128 ordering.
        #[test]
        fn test_record_id_ordering_property(a: u128, b: u128) {
            let id_a = RecordId::from_value(a);
            let id_b = RecordId::from_value(b);

            prop_assert_eq!(id_a < id_b, a < b);
            prop_assert_eq!(id_a == id_b, a == b);
        }

        /// Property: round-trip through string form preserves the id.
        #[test]
        fn test_record_id_string_roundtrip(value: u128) {
            let id = RecordId::from_value(value);
            let id_str = id.to_string();

            match RecordId::from_string(&id_str) {
                Ok(parsed) => prop_assert_eq!(id, parsed),
                Err(e) => return Err(TestCaseError::fail(e)),
            }
        }

        /// Property: no casing or padding of a sentinel passes validity.
        #[test]
        fn test_sentinel_invalid_any_case(pad in "[ \t]{0,4}", flags in proptest::collection::vec(any::<bool>(), 5)) {
            for sentinel in ["n/a", "error"] {
                let cased: String = sentinel
                    .chars()
                    .zip(flags.iter().cycle())
                    .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
                    .collect();
                let padded = format!("{pad}{cased}{pad}");
                prop_assert!(!is_valid_title(&padded));
            }
        }
    }
}
