//! File-backed mailbox adapter.
//!
//! One JSON document per conversation, named `<conversation-id>.json`,
//! with the conversation's labels stored inline. An exporter drops
//! documents into the directory; this adapter only reads messages and
//! rewrites the label list, matching the pipeline's contract with the
//! upstream mail source.

use crate::error::{CliError, Result};
use mailsift_domain::traits::Mailbox;
use mailsift_domain::{Conversation, ConversationId, ConversationLabel, Message, MessageId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Mailbox over a directory of conversation documents.
pub struct JsonMailbox {
    dir: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConversationDoc {
    id: String,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    messages: Vec<MessageDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MessageDoc {
    id: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    body: String,
}

impl JsonMailbox {
    /// Open a mailbox directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(CliError::Config(format!(
                "mailbox directory '{}' does not exist (run `mailsift init`)",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    fn doc_path(&self, conversation: &ConversationId) -> PathBuf {
        self.dir.join(format!("{}.json", conversation))
    }

    fn load_doc(path: &PathBuf) -> std::result::Result<ConversationDoc, String> {
        let contents =
            fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
        serde_json::from_str(&contents).map_err(|e| format!("{}: {}", path.display(), e))
    }

    fn store_doc(path: &PathBuf, doc: &ConversationDoc) -> std::result::Result<(), String> {
        let contents =
            serde_json::to_string_pretty(doc).map_err(|e| format!("{}: {}", path.display(), e))?;
        fs::write(path, contents).map_err(|e| format!("{}: {}", path.display(), e))
    }

    fn doc_has_label(doc: &ConversationDoc, label: ConversationLabel) -> bool {
        doc.labels
            .iter()
            .filter_map(|name| ConversationLabel::parse(name))
            .any(|l| l == label)
    }
}

impl Mailbox for JsonMailbox {
    type Error = String;

    fn conversations_with_label(
        &self,
        label: ConversationLabel,
    ) -> std::result::Result<Vec<Conversation>, Self::Error> {
        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)
            .map_err(|e| format!("{}: {}", self.dir.display(), e))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        // Deterministic order across runs
        paths.sort();

        let mut conversations = Vec::new();
        for path in paths {
            let doc = Self::load_doc(&path)?;
            if !Self::doc_has_label(&doc, label) {
                continue;
            }

            let id = ConversationId::new(doc.id.clone());
            let messages = doc
                .messages
                .into_iter()
                .map(|m| Message {
                    id: MessageId::new(m.id),
                    subject: m.subject,
                    body: m.body,
                    conversation_id: id.clone(),
                })
                .collect();
            conversations.push(Conversation::new(id, messages));
        }

        Ok(conversations)
    }

    fn add_label(
        &mut self,
        conversation: &ConversationId,
        label: ConversationLabel,
    ) -> std::result::Result<(), Self::Error> {
        let path = self.doc_path(conversation);
        let mut doc = Self::load_doc(&path)?;
        if !Self::doc_has_label(&doc, label) {
            doc.labels.push(label.as_str().to_string());
            Self::store_doc(&path, &doc)?;
        }
        Ok(())
    }

    fn remove_label(
        &mut self,
        conversation: &ConversationId,
        label: ConversationLabel,
    ) -> std::result::Result<(), Self::Error> {
        let path = self.doc_path(conversation);
        let mut doc = Self::load_doc(&path)?;
        let before = doc.labels.len();
        doc.labels
            .retain(|name| ConversationLabel::parse(name) != Some(label));
        if doc.labels.len() != before {
            Self::store_doc(&path, &doc)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_doc(dir: &std::path::Path, id: &str, labels: &[&str], bodies: &[&str]) {
        let doc = ConversationDoc {
            id: id.to_string(),
            labels: labels.iter().map(|s| s.to_string()).collect(),
            messages: bodies
                .iter()
                .enumerate()
                .map(|(i, body)| MessageDoc {
                    id: format!("{id}-m{i}"),
                    subject: format!("Subject {i}"),
                    body: body.to_string(),
                })
                .collect(),
        };
        fs::write(
            dir.join(format!("{id}.json")),
            serde_json::to_string_pretty(&doc).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_open_missing_dir_fails() {
        assert!(JsonMailbox::open("/definitely/not/here").is_err());
    }

    #[test]
    fn test_enumerate_by_label() {
        let dir = tempdir().unwrap();
        write_doc(dir.path(), "t-1", &["NeedsProcess"], &["body one"]);
        write_doc(dir.path(), "t-2", &["Done"], &["body two"]);
        write_doc(dir.path(), "t-3", &[], &["body three"]);

        let mailbox = JsonMailbox::open(dir.path()).unwrap();
        let pending = mailbox
            .conversations_with_label(ConversationLabel::NeedsProcess)
            .unwrap();

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, ConversationId::new("t-1"));
        assert_eq!(pending[0].messages.len(), 1);
        assert_eq!(pending[0].messages[0].id, MessageId::new("t-1-m0"));
    }

    #[test]
    fn test_label_swap_persists() {
        let dir = tempdir().unwrap();
        write_doc(dir.path(), "t-1", &["NeedsProcess"], &["body"]);

        let mut mailbox = JsonMailbox::open(dir.path()).unwrap();
        let id = ConversationId::new("t-1");
        mailbox.remove_label(&id, ConversationLabel::NeedsProcess).unwrap();
        mailbox.add_label(&id, ConversationLabel::Done).unwrap();

        // Reopen: the transition survived
        let mailbox = JsonMailbox::open(dir.path()).unwrap();
        assert!(mailbox
            .conversations_with_label(ConversationLabel::NeedsProcess)
            .unwrap()
            .is_empty());
        assert_eq!(
            mailbox
                .conversations_with_label(ConversationLabel::Done)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_add_label_is_idempotent() {
        let dir = tempdir().unwrap();
        write_doc(dir.path(), "t-1", &["Done"], &[]);

        let mut mailbox = JsonMailbox::open(dir.path()).unwrap();
        let id = ConversationId::new("t-1");
        mailbox.add_label(&id, ConversationLabel::Done).unwrap();

        let docs = mailbox
            .conversations_with_label(ConversationLabel::Done)
            .unwrap();
        assert_eq!(docs.len(), 1);

        let raw = fs::read_to_string(dir.path().join("t-1.json")).unwrap();
        assert_eq!(raw.matches("Done").count(), 1);
    }
}
