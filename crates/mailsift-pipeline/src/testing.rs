//! In-memory mailbox for tests and local experiments.

use mailsift_domain::traits::Mailbox;
use mailsift_domain::{Conversation, ConversationId, ConversationLabel, Message, MessageId};
use std::collections::{HashMap, HashSet};

/// A mailbox held in memory, with label state per conversation.
///
/// Newly inserted conversations carry `NeedsProcess`, matching how the
/// upstream filter labels inbound mail. `reject_done_label` simulates a
/// label store whose `Done` label has been deleted, for exercising the
/// partial label transition path.
#[derive(Debug, Default)]
pub struct MemoryMailbox {
    conversations: Vec<Conversation>,
    labels: HashMap<ConversationId, HashSet<ConversationLabel>>,

    /// When set, every `add_label(Done)` fails.
    pub reject_done_label: bool,
}

impl MemoryMailbox {
    /// An empty mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a conversation, labeled `NeedsProcess`.
    pub fn insert(&mut self, conversation: Conversation) {
        self.labels.insert(
            conversation.id.clone(),
            HashSet::from([ConversationLabel::NeedsProcess]),
        );
        self.conversations.push(conversation);
    }

    /// The labels a conversation currently carries.
    pub fn labels_of(&self, id: &ConversationId) -> HashSet<ConversationLabel> {
        self.labels.get(id).cloned().unwrap_or_default()
    }

    /// Re-apply a label out of band, e.g. to simulate a conversation
    /// stuck in `NeedsProcess` after an interrupted run.
    pub fn relabel(&mut self, id: &ConversationId, label: ConversationLabel) {
        self.labels.entry(id.clone()).or_default().insert(label);
    }
}

/// Shorthand for building a test message.
pub fn message(conversation: &str, id: &str, subject: &str, body: &str) -> Message {
    Message {
        id: MessageId::new(id),
        subject: subject.to_string(),
        body: body.to_string(),
        conversation_id: ConversationId::new(conversation),
    }
}

impl Mailbox for MemoryMailbox {
    type Error = String;

    fn conversations_with_label(
        &self,
        label: ConversationLabel,
    ) -> Result<Vec<Conversation>, Self::Error> {
        Ok(self
            .conversations
            .iter()
            .filter(|c| {
                self.labels
                    .get(&c.id)
                    .is_some_and(|labels| labels.contains(&label))
            })
            .cloned()
            .collect())
    }

    fn add_label(
        &mut self,
        conversation: &ConversationId,
        label: ConversationLabel,
    ) -> Result<(), Self::Error> {
        if self.reject_done_label && label == ConversationLabel::Done {
            return Err("label 'Done' does not exist".to_string());
        }
        self.labels
            .entry(conversation.clone())
            .or_default()
            .insert(label);
        Ok(())
    }

    fn remove_label(
        &mut self,
        conversation: &ConversationId,
        label: ConversationLabel,
    ) -> Result<(), Self::Error> {
        // Removing an absent label is a no-op, as in the upstream store
        if let Some(labels) = self.labels.get_mut(conversation) {
            labels.remove(&label);
        }
        Ok(())
    }
}
