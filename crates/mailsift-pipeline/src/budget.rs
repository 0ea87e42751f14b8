//! Run budgeter: three independent caps, any of which ends a run cleanly.

use crate::config::PipelineConfig;
use crate::metrics::StopReason;
use std::time::{Duration, Instant};

/// Per-run budget: conversation count, message count, wall-clock ceiling.
///
/// The clock starts when the budget is created, at run start. Checks are
/// made between units of work - the budget never interrupts an in-flight
/// extraction call; the extractor's own timeout bounds those.
#[derive(Debug)]
pub struct RunBudget {
    started: Instant,
    max_conversations: usize,
    max_messages: usize,
    max_runtime: Duration,
}

impl RunBudget {
    /// Start the budget clock for a run under the given configuration.
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            started: Instant::now(),
            max_conversations: config.max_conversations,
            max_messages: config.max_messages,
            max_runtime: config.max_runtime(),
        }
    }

    /// Time since run start.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Checked before visiting another conversation.
    pub fn conversation_stop(&self, conversations_scanned: usize) -> Option<StopReason> {
        if self.clock_exhausted() {
            Some(StopReason::Clock)
        } else if conversations_scanned >= self.max_conversations {
            Some(StopReason::ConversationCap)
        } else {
            None
        }
    }

    /// Checked before sending another message through extraction.
    pub fn message_stop(&self, messages_attempted: usize) -> Option<StopReason> {
        if self.clock_exhausted() {
            Some(StopReason::Clock)
        } else if messages_attempted >= self.max_messages {
            Some(StopReason::MessageCap)
        } else {
            None
        }
    }

    fn clock_exhausted(&self) -> bool {
        self.started.elapsed() >= self.max_runtime
    }
}
