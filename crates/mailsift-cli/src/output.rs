//! Output formatting for the CLI.

use colored::Colorize;
use mailsift_pipeline::RunMetrics;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// One headline plus the run's counter block.
    pub fn run_summary(&self, metrics: &RunMetrics) -> String {
        let headline = if self.color_enabled {
            format!(
                "{} records, {} errors ({})",
                metrics.records_written.to_string().green().bold(),
                if metrics.error_rows > 0 {
                    metrics.error_rows.to_string().red().bold()
                } else {
                    metrics.error_rows.to_string().normal()
                },
                metrics.stopped_by.as_str()
            )
        } else {
            format!(
                "{} records, {} errors ({})",
                metrics.records_written,
                metrics.error_rows,
                metrics.stopped_by.as_str()
            )
        };

        format!("{}\n\n{}", headline, metrics.summary())
    }

    /// Ledger and mailbox counts for the status command.
    pub fn status(
        &self,
        records: usize,
        errors: usize,
        processed: usize,
        pending: usize,
    ) -> String {
        let pending_str = if self.color_enabled && pending > 0 {
            pending.to_string().yellow().to_string()
        } else {
            pending.to_string()
        };

        [
            format!("Records:               {}", records),
            format!("Error rows:            {}", errors),
            format!("Processed message ids: {}", processed),
            format!("Pending conversations: {}", pending_str),
        ]
        .join("\n")
    }
}
