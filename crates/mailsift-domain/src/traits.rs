//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and
//! infrastructure. Implementations live in other crates: the ledger in
//! `mailsift-store`, the LLM provider in `mailsift-llm`, and the mailbox
//! wherever the deployment reads its mail from.

use crate::label::ConversationLabel;
use crate::message::{Conversation, ConversationId};

/// Read access to the upstream mail source plus label management.
///
/// The mailbox is read-only except for labels: this pipeline never mutates
/// message content, it only moves conversations through the label state
/// machine.
pub trait Mailbox {
    /// Error type for mailbox operations
    type Error;

    /// Enumerate conversations currently carrying the given label, with
    /// their messages, in upstream order.
    fn conversations_with_label(
        &self,
        label: ConversationLabel,
    ) -> Result<Vec<Conversation>, Self::Error>;

    /// Add a label to a conversation.
    fn add_label(
        &mut self,
        conversation: &ConversationId,
        label: ConversationLabel,
    ) -> Result<(), Self::Error>;

    /// Remove a label from a conversation.
    fn remove_label(
        &mut self,
        conversation: &ConversationId,
        label: ConversationLabel,
    ) -> Result<(), Self::Error>;
}

/// The destination tabular store: named tabs, each a header row plus
/// append-only data rows of positional cells.
pub trait Ledger {
    /// Error type for ledger operations
    type Error;

    /// The header row of a tab. Errors when the tab does not exist.
    fn header(&self, tab: &str) -> Result<Vec<String>, Self::Error>;

    /// All data rows of a tab, oldest first. A freshly provisioned tab
    /// yields an empty vec.
    fn rows(&self, tab: &str) -> Result<Vec<Vec<String>>, Self::Error>;

    /// Append one data row to a tab.
    fn append_row(&mut self, tab: &str, row: Vec<String>) -> Result<(), Self::Error>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (mailsift-llm). The call is
/// synchronous; the extraction engine bounds it with its own timeout.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion for the prompt.
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}
