//! Message and conversation types read from the upstream mailbox.
//!
//! Both are immutable as far as this pipeline is concerned: the mailbox is
//! only ever read, and the single piece of state this system owns — the
//! per-conversation label — lives in [`crate::label`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a message within the mailbox.
///
/// The upstream source guarantees uniqueness; this pipeline relies on it as
/// the idempotency key for every ledger row it writes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Wrap an upstream message identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier of a conversation (thread) within the mailbox.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Wrap an upstream conversation identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One inbound message. Never mutated by this system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Stable upstream identifier.
    pub id: MessageId,

    /// Subject line.
    pub subject: String,

    /// Plain-text body.
    pub body: String,

    /// Owning conversation.
    pub conversation_id: ConversationId,
}

/// An ordered collection of messages sharing one conversation id.
///
/// The conversation is the retry unit of the pipeline: its label state
/// (see [`crate::label::ConversationLabel`]) only advances when every
/// message in it has been handled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Upstream conversation identifier.
    pub id: ConversationId,

    /// Messages in upstream order.
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Build a conversation from already-collected messages.
    pub fn new(id: ConversationId, messages: Vec<Message>) -> Self {
        Self { id, messages }
    }

    /// True when the conversation holds no messages at all.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
