use anyhow::Result;
use askhr_router::app::dispatch::dispatch;
use askhr_router::cli::Cli;
use askhr_router::config::Config;
use clap::Parser;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_init(cli.config.as_deref())?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.observability.tracing_level())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    dispatch(cli.command, config).await
}
