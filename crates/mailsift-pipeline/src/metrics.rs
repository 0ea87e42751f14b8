//! Metrics collected during pipeline runs

/// Why a run stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopReason {
    /// Every pending conversation was visited.
    #[default]
    Exhausted,

    /// The conversation cap was reached.
    ConversationCap,

    /// The message cap was reached.
    MessageCap,

    /// The wall-clock ceiling was reached.
    Clock,
}

impl StopReason {
    /// Human-readable form for logs and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::Exhausted => "all pending conversations visited",
            StopReason::ConversationCap => "conversation cap reached",
            StopReason::MessageCap => "message cap reached",
            StopReason::Clock => "wall-clock ceiling reached",
        }
    }
}

/// Counters for one pipeline run.
///
/// Run-scoped and discarded at run end; the durable record of a run is
/// what it appended to the ledger.
#[derive(Debug, Clone, Default)]
pub struct RunMetrics {
    /// Conversations visited this run
    pub conversations_scanned: usize,

    /// Conversations transitioned to `Done`
    pub conversations_completed: usize,

    /// Conversations left in `NeedsProcess` for retry
    pub conversations_retained: usize,

    /// Empty conversations cleaned out of `NeedsProcess`
    pub conversations_cleaned: usize,

    /// Messages sent through extraction
    pub messages_attempted: usize,

    /// Messages skipped because they were already processed
    pub messages_skipped: usize,

    /// Messages whose body was empty or whitespace-only
    pub empty_bodies: usize,

    /// Job records appended
    pub records_written: usize,

    /// Error rows appended
    pub error_rows: usize,

    /// Label transitions that only partially applied
    pub label_warnings: usize,

    /// Total runtime in seconds
    pub runtime_secs: u64,

    /// Why the run stopped
    pub stopped_by: StopReason,
}

impl RunMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a summary report of the run
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Run Summary".to_string(),
            "===========".to_string(),
            format!("Stopped: {}", self.stopped_by.as_str()),
            format!("Runtime: {}s", self.runtime_secs),
            String::new(),
            format!(
                "Conversations: {} scanned ({} completed, {} retained, {} cleaned)",
                self.conversations_scanned,
                self.conversations_completed,
                self.conversations_retained,
                self.conversations_cleaned
            ),
            format!(
                "Messages: {} attempted, {} skipped as processed, {} empty",
                self.messages_attempted, self.messages_skipped, self.empty_bodies
            ),
            format!(
                "Rows: {} records, {} errors",
                self.records_written, self.error_rows
            ),
        ];

        if self.label_warnings > 0 {
            lines.push(format!(
                "Warnings: {} label transitions partially applied",
                self.label_warnings
            ));
        }

        lines.join("\n")
    }
}
