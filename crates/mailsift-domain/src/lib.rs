//! Mailsift Domain Layer
//!
//! Core types and trait seams for the mail ingestion pipeline. This crate
//! defines the vocabulary every other layer speaks:
//!
//! - **Message / Conversation**: immutable units read from the upstream
//!   mailbox, grouped by thread.
//! - **ConversationLabel**: the externally stored two-state marker that
//!   tracks ingestion progress per conversation.
//! - **JobRecord / ErrorRow**: the rows this pipeline appends to the
//!   destination ledger, exactly once per source message.
//! - **Header map**: field-name to column-position resolution, so ledger
//!   writes survive upstream column reordering.
//! - **Traits**: the boundaries to the mailbox, the ledger, and the LLM
//!   provider. Infrastructure implementations live in other crates.
//!
//! The domain carries no I/O. Everything here is pure data and pure logic.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod header;
pub mod label;
pub mod message;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use header::{columns, HeaderMap, ERROR_COLUMNS, RECORD_COLUMNS};
pub use label::ConversationLabel;
pub use message::{Conversation, ConversationId, Message, MessageId};
pub use record::{is_valid_title, ErrorRow, JobRecord, RecordId, RecordStatus};
