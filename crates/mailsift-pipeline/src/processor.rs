//! Conversation processor: the per-run loop and the label state machine.

use crate::budget::RunBudget;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::metrics::{RunMetrics, StopReason};
use mailsift_domain::traits::{Ledger, Mailbox};
use mailsift_domain::{
    Conversation, ConversationLabel, ErrorRow, HeaderMap, JobRecord, Message, MessageId,
    ERROR_COLUMNS, RECORD_COLUMNS,
};
use mailsift_extractor::{ExtractListings, Extraction, JobCandidate};
use rand::Rng;
use std::collections::HashSet;
use std::fmt::Display;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Current timestamp in seconds since Unix epoch
fn now_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// What became of one conversation this run.
enum ConversationOutcome {
    /// All attempted messages succeeded; transitioned to `Done`.
    Completed,
    /// Something failed; left in `NeedsProcess` for a full retry.
    Retained,
    /// No messages at all; removed from `NeedsProcess` as cleanup.
    Cleaned,
    /// A budget tripped mid-conversation; left in `NeedsProcess`.
    BudgetStopped(StopReason),
}

/// The conversation processor.
///
/// Owns the extraction strategy and the run configuration; the mailbox
/// and ledger are passed into [`Pipeline::run`] per invocation, the way a
/// cron-style caller holds its own handles.
pub struct Pipeline<E> {
    extractor: E,
    config: PipelineConfig,
}

impl<E: ExtractListings> Pipeline<E> {
    /// Create a pipeline, validating the configuration up front.
    pub fn new(extractor: E, config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        Ok(Self { extractor, config })
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute one bounded run.
    ///
    /// Aborts only on configuration faults detected before the loop;
    /// per-message and per-conversation failures are absorbed into the
    /// metrics and the errors tab.
    pub async fn run<M, L>(
        &self,
        mailbox: &mut M,
        ledger: &mut L,
    ) -> Result<RunMetrics, PipelineError>
    where
        M: Mailbox,
        M::Error: Display,
        L: Ledger,
        L::Error: Display,
    {
        self.preflight(ledger)?;

        let mut seen =
            mailsift_store::processed_ids(ledger, &self.config.tabs, self.config.retry_policy)
                .map_err(|e| PipelineError::Ledger(e.to_string()))?;

        let pending = mailbox
            .conversations_with_label(ConversationLabel::NeedsProcess)
            .map_err(|e| PipelineError::Mailbox(e.to_string()))?;

        info!(
            "Run start: {} conversations pending, {} message ids already processed",
            pending.len(),
            seen.len()
        );

        let budget = RunBudget::new(&self.config);
        let mut metrics = RunMetrics::new();

        for conversation in &pending {
            if let Some(reason) = budget.conversation_stop(metrics.conversations_scanned) {
                metrics.stopped_by = reason;
                break;
            }
            metrics.conversations_scanned += 1;

            let outcome = self
                .process_conversation(mailbox, ledger, conversation, &mut seen, &budget, &mut metrics)
                .await;

            match outcome {
                ConversationOutcome::Completed => metrics.conversations_completed += 1,
                ConversationOutcome::Retained => metrics.conversations_retained += 1,
                ConversationOutcome::Cleaned => metrics.conversations_cleaned += 1,
                ConversationOutcome::BudgetStopped(reason) => {
                    metrics.conversations_retained += 1;
                    metrics.stopped_by = reason;
                    break;
                }
            }

            self.pause_between_conversations().await;
        }

        metrics.runtime_secs = budget.elapsed().as_secs();
        info!(
            "Run finished ({}): {} records, {} errors, {} messages attempted",
            metrics.stopped_by.as_str(),
            metrics.records_written,
            metrics.error_rows,
            metrics.messages_attempted
        );

        Ok(metrics)
    }

    /// Fatal pre-loop checks: both tabs provisioned with every required
    /// column. Failing here aborts before any side effect.
    fn preflight<L>(&self, ledger: &L) -> Result<(), PipelineError>
    where
        L: Ledger,
        L::Error: Display,
    {
        for (tab, required) in [
            (&self.config.tabs.records, RECORD_COLUMNS),
            (&self.config.tabs.errors, ERROR_COLUMNS),
        ] {
            let header = ledger
                .header(tab)
                .map_err(|e| PipelineError::Config(format!("tab '{}' unavailable: {}", tab, e)))?;
            HeaderMap::resolve(&header, required)
                .map_err(|e| PipelineError::Config(format!("tab '{}': {}", tab, e)))?;
        }
        Ok(())
    }

    /// Handle one conversation and transition its label.
    async fn process_conversation<M, L>(
        &self,
        mailbox: &mut M,
        ledger: &mut L,
        conversation: &Conversation,
        seen: &mut HashSet<MessageId>,
        budget: &RunBudget,
        metrics: &mut RunMetrics,
    ) -> ConversationOutcome
    where
        M: Mailbox,
        M::Error: Display,
        L: Ledger,
        L::Error: Display,
    {
        if conversation.is_empty() {
            debug!("Conversation {} has no messages, cleaning up", conversation.id);
            if let Err(e) =
                mailbox.remove_label(&conversation.id, ConversationLabel::NeedsProcess)
            {
                warn!("Could not clean empty conversation {}: {}", conversation.id, e);
                metrics.label_warnings += 1;
            }
            return ConversationOutcome::Cleaned;
        }

        let unseen: Vec<&Message> = conversation
            .messages
            .iter()
            .filter(|m| !seen.contains(&m.id))
            .collect();
        metrics.messages_skipped += conversation.messages.len() - unseen.len();

        if unseen.is_empty() {
            // Self-healing: fully processed but still labeled, so a prior
            // run was interrupted between writing and relabeling.
            debug!(
                "Conversation {} already fully processed, marking Done",
                conversation.id
            );
            self.transition_done(mailbox, &conversation.id, metrics);
            return ConversationOutcome::Completed;
        }

        let mut any_failed = false;

        for message in unseen {
            if let Some(reason) = budget.message_stop(metrics.messages_attempted) {
                debug!("Budget stop mid-conversation {}: {}", conversation.id, reason.as_str());
                return ConversationOutcome::BudgetStopped(reason);
            }

            metrics.messages_attempted += 1;
            if !self.handle_message(ledger, message, seen, metrics).await {
                any_failed = true;
            }

            self.pause_between_messages().await;
        }

        if any_failed {
            // The conversation is the retry unit: keep the label so the
            // next run revisits it; already-written messages are guarded
            // by the processed-id scan.
            info!("Conversation {} retained in NeedsProcess for retry", conversation.id);
            return ConversationOutcome::Retained;
        }

        for message in &conversation.messages {
            seen.insert(message.id.clone());
        }
        self.transition_done(mailbox, &conversation.id, metrics);
        ConversationOutcome::Completed
    }

    /// Extract one message and persist the outcome. Returns false when the
    /// message must be retried on a later run.
    async fn handle_message<L>(
        &self,
        ledger: &mut L,
        message: &Message,
        seen: &mut HashSet<MessageId>,
        metrics: &mut RunMetrics,
    ) -> bool
    where
        L: Ledger,
        L::Error: Display,
    {
        match self.extractor.extract(&message.body).await {
            Ok(Extraction::Empty) => {
                // Nothing to extract is a successful no-op, not an error;
                // the id joins the processed set via the conversation
                // success path.
                debug!("Message {} has an empty body", message.id);
                metrics.empty_bodies += 1;
                true
            }
            Ok(Extraction::Listings(candidates)) => {
                let now = now_epoch();
                let mut wrote_all = true;

                for candidate in candidates {
                    let record = record_from_candidate(candidate, message, now);
                    match mailsift_store::append_record(ledger, &self.config.tabs, &record) {
                        Ok(()) => metrics.records_written += 1,
                        Err(e) => {
                            warn!("Could not append record for message {}: {}", message.id, e);
                            wrote_all = false;
                        }
                    }
                }

                if wrote_all {
                    seen.insert(message.id.clone());
                }
                wrote_all
            }
            Err(e) => {
                warn!("Extraction failed for message {}: {}", message.id, e);
                let row = ErrorRow {
                    source_message_id: message.id.clone(),
                    source_subject: message.subject.clone(),
                    reason: "extraction failed".to_string(),
                    detail: e.to_string(),
                    logged_at: now_epoch(),
                };
                match mailsift_store::append_error(ledger, &self.config.tabs, &row) {
                    Ok(()) => metrics.error_rows += 1,
                    Err(le) => {
                        warn!("Could not record error row for message {}: {}", message.id, le)
                    }
                }
                false
            }
        }
    }

    /// Swap `NeedsProcess` for `Done` as one logical step.
    ///
    /// Removal first: if the add then fails the conversation is at least
    /// out of the processing queue rather than eligible for rework. A
    /// failed removal leaves everything as it was and the next run tries
    /// again.
    fn transition_done<M>(&self, mailbox: &mut M, id: &mailsift_domain::ConversationId, metrics: &mut RunMetrics)
    where
        M: Mailbox,
        M::Error: Display,
    {
        match mailbox.remove_label(id, ConversationLabel::NeedsProcess) {
            Ok(()) => {
                if let Err(e) = mailbox.add_label(id, ConversationLabel::Done) {
                    warn!(
                        "Conversation {} left unlabeled: removed from NeedsProcess but Done could not be applied: {}",
                        id, e
                    );
                    metrics.label_warnings += 1;
                }
            }
            Err(e) => {
                warn!("Could not remove NeedsProcess from conversation {}: {}", id, e);
                metrics.label_warnings += 1;
            }
        }
    }

    /// Randomized pause between extraction calls, to respect the
    /// extraction service's rate limits.
    async fn pause_between_messages(&self) {
        let min = self.config.message_pause_min_ms;
        let max = self.config.message_pause_max_ms;
        if max == 0 {
            return;
        }
        let ms = if max > min {
            rand::thread_rng().gen_range(min..=max)
        } else {
            min
        };
        sleep(Duration::from_millis(ms)).await;
    }

    /// Fixed, shorter pause between conversations.
    async fn pause_between_conversations(&self) {
        if self.config.conversation_pause_ms > 0 {
            sleep(self.config.conversation_pause()).await;
        }
    }
}

/// Promote a validated candidate to a ledger record for its source message.
fn record_from_candidate(candidate: JobCandidate, message: &Message, now: u64) -> JobRecord {
    let mut record = JobRecord::new(
        candidate.title,
        candidate.organization,
        message.id.clone(),
        message.subject.clone(),
        now,
    )
    .with_status(candidate.status);
    record.location = candidate.location;
    record.source_url = candidate.url;
    record
}
