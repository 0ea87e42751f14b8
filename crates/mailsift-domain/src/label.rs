//! Label module - the per-conversation ingestion state machine.

use serde::{Deserialize, Serialize};

/// Ingestion state of a conversation, stored externally as a named label.
///
/// A conversation enters the system as `NeedsProcess` and leaves as `Done`.
/// Because the label store applies removal and addition as two separate
/// operations, "both labels" and "neither label" are reachable intermediate
/// states; the processor treats them as states to repair, not as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversationLabel {
    /// Awaiting processing; the next run will pick the conversation up.
    NeedsProcess,

    /// Every message has been handled; the conversation is never revisited.
    Done,
}

impl ConversationLabel {
    /// The label name as stored in the external mail system.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationLabel::NeedsProcess => "NeedsProcess",
            ConversationLabel::Done => "Done",
        }
    }

    /// Parse a label from its stored name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "needsprocess" | "needs-process" | "needs_process" => {
                Some(ConversationLabel::NeedsProcess)
            }
            "done" => Some(ConversationLabel::Done),
            _ => None,
        }
    }
}

impl std::str::FromStr for ConversationLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid label: {}", s))
    }
}
