//! Mailsift Pipeline
//!
//! The conversation processor and run budgeter: the loop that turns
//! labeled conversations into ledger rows, exactly once per message.
//!
//! # Overview
//!
//! One **run** is a bounded pass over every conversation carrying the
//! `NeedsProcess` label:
//!
//! 1. Rebuild the processed-id set from the ledger (the idempotency
//!    anchor - nothing is trusted across runs except durable state).
//! 2. For each conversation, extract every not-yet-processed message,
//!    appending job records and error rows.
//! 3. Transition the conversation's label: `Done` when everything
//!    attempted succeeded, unchanged when anything failed, so the whole
//!    conversation retries next run.
//!
//! Three independent budgets - conversation count, message count, and a
//! wall-clock ceiling - make any run safe to interrupt: whatever was not
//! reached simply stays `NeedsProcess` for the next scheduled run.
//!
//! # Usage
//!
//! ## One-shot run
//!
//! ```no_run
//! use mailsift_pipeline::{Pipeline, PipelineConfig};
//! use mailsift_pipeline::testing::MemoryMailbox;
//! use mailsift_extractor::TieredExtractor;
//! use mailsift_llm::MockProvider;
//! use mailsift_store::MemoryLedger;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = TieredExtractor::<MockProvider>::fallback_only();
//! let pipeline = Pipeline::new(extractor, PipelineConfig::default())?;
//!
//! let mut mailbox = MemoryMailbox::new();
//! let mut ledger = MemoryLedger::new();
//! let metrics = pipeline.run(&mut mailbox, &mut ledger).await?;
//! println!("{}", metrics.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Scheduled worker
//!
//! The [`PipelineWorker`] wraps the run in an interval ticker with
//! ctrl-c shutdown, for deployments without an external scheduler.
//!
//! # Error policy
//!
//! Failures local to one message or conversation never abort a run; they
//! are logged, written to the errors tab where possible, and retried via
//! the label machine. Only configuration faults detected before the loop
//! starts - unprovisioned tabs, missing required columns - abort.

#![warn(missing_docs)]

mod budget;
mod config;
mod error;
mod metrics;
mod processor;
pub mod testing;
mod worker;

pub use budget::RunBudget;
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use metrics::{RunMetrics, StopReason};
pub use processor::Pipeline;
pub use worker::PipelineWorker;
