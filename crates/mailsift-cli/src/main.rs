//! Mailsift CLI - sift job mail into a tabular ledger.

use clap::Parser;
use mailsift_cli::{commands, Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> mailsift_cli::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let formatter = Formatter::new(!cli.no_color);

    match cli.command {
        Command::Init => {
            commands::execute_init(&config, cli.config.as_deref())?;
        }
        Command::Run => {
            commands::execute_run(&config, &formatter).await?;
        }
        Command::Watch(args) => {
            commands::execute_watch(&config, args.interval, &formatter).await?;
        }
        Command::Status => {
            commands::execute_status(&config, &formatter)?;
        }
    }

    Ok(())
}
