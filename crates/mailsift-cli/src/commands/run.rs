//! One-shot and scheduled execution of the pipeline.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::mailbox::JsonMailbox;
use crate::output::Formatter;
use mailsift_extractor::TieredExtractor;
use mailsift_llm::GatewayProvider;
use mailsift_pipeline::{Pipeline, PipelineWorker};
use mailsift_store::SqliteLedger;
use std::time::Duration;

/// Execute one bounded run and print its summary.
pub async fn execute_run(config: &Config, formatter: &Formatter) -> Result<()> {
    let pipeline = build_pipeline(config)?;

    let mut ledger = SqliteLedger::open(&config.ledger_path)?;
    let mut mailbox = JsonMailbox::open(&config.mailbox_dir)?;
    let metrics = pipeline.run(&mut mailbox, &mut ledger).await?;

    println!("{}", formatter.run_summary(&metrics));
    Ok(())
}

/// Run repeatedly on an interval until interrupted.
pub async fn execute_watch(
    config: &Config,
    interval_minutes: Option<u64>,
    _formatter: &Formatter,
) -> Result<()> {
    let minutes = interval_minutes.unwrap_or(config.watch_interval_minutes);
    if minutes == 0 {
        return Err(CliError::Config("watch interval must be at least one minute".into()));
    }

    let pipeline = build_pipeline(config)?;

    let ledger = SqliteLedger::open(&config.ledger_path)?;
    let mailbox = JsonMailbox::open(&config.mailbox_dir)?;
    let mut worker = PipelineWorker::new(pipeline, Duration::from_secs(minutes * 60));
    worker.run(mailbox, ledger).await?;
    Ok(())
}

/// Assemble the tiered extractor and pipeline from the configuration.
///
/// With the service enabled, a missing credential aborts here - before
/// the mailbox or ledger see any traffic.
fn build_pipeline(config: &Config) -> Result<Pipeline<TieredExtractor<GatewayProvider>>> {
    config
        .extractor
        .validate()
        .map_err(CliError::Config)?;

    let extractor = if config.llm.enabled {
        let api_key = config.api_key()?;
        let provider = GatewayProvider::new(&config.llm.endpoint, &config.llm.model, api_key);
        TieredExtractor::with_primary(provider, config.extractor.clone())
    } else {
        TieredExtractor::fallback_only()
    };

    Ok(Pipeline::new(extractor, config.pipeline.clone())?)
}
