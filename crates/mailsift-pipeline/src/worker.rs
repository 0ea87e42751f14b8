//! Background worker for repeated pipeline runs
//!
//! For deployments without an external scheduler: wraps the bounded run
//! in an interval ticker with ctrl-c shutdown. Deployments that do have a
//! cron trigger call [`crate::Pipeline::run`] once per invocation instead.

use crate::error::PipelineError;
use crate::processor::Pipeline;
use mailsift_domain::traits::{Ledger, Mailbox};
use mailsift_extractor::ExtractListings;
use std::fmt::Display;
use tokio::time::{interval, Duration};

/// Worker that runs the pipeline on a schedule.
pub struct PipelineWorker<E> {
    pipeline: Pipeline<E>,
    interval: Duration,
}

impl<E: ExtractListings> PipelineWorker<E> {
    /// Wrap a pipeline to run at the given interval.
    pub fn new(pipeline: Pipeline<E>, interval: Duration) -> Self {
        Self { pipeline, interval }
    }

    /// Run the worker indefinitely, until a shutdown signal (ctrl-c).
    ///
    /// A failed run is logged and the worker keeps its schedule; a
    /// configuration fault does not fix itself, but the operator sees it
    /// on every tick rather than finding a silently dead process.
    pub async fn run<M, L>(&mut self, mut mailbox: M, mut ledger: L) -> Result<(), PipelineError>
    where
        M: Mailbox,
        M::Error: Display,
        L: Ledger,
        L::Error: Display,
    {
        let mut ticker = interval(self.interval);

        tracing::info!("Pipeline worker started (interval: {:?})", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tracing::debug!("Starting pipeline run");

                    match self.pipeline.run(&mut mailbox, &mut ledger).await {
                        Ok(metrics) => {
                            tracing::info!(
                                "Run completed: {} records, {} errors, stopped by {}",
                                metrics.records_written,
                                metrics.error_rows,
                                metrics.stopped_by.as_str()
                            );
                        }
                        Err(e) => {
                            tracing::error!("Run failed: {}", e);
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown signal received, stopping worker");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Run a fixed number of cycles (useful for testing).
    pub async fn run_cycles<M, L>(
        &mut self,
        mailbox: &mut M,
        ledger: &mut L,
        cycles: usize,
    ) -> Result<(), PipelineError>
    where
        M: Mailbox,
        M::Error: Display,
        L: Ledger,
        L::Error: Display,
    {
        let mut ticker = interval(self.interval);

        for cycle in 0..cycles {
            ticker.tick().await;

            tracing::debug!("Pipeline run {}/{}", cycle + 1, cycles);
            let metrics = self.pipeline.run(mailbox, ledger).await?;
            tracing::info!(
                "Run {}/{} completed: {} records, {} errors",
                cycle + 1,
                cycles,
                metrics.records_written,
                metrics.error_rows
            );
        }

        Ok(())
    }
}
