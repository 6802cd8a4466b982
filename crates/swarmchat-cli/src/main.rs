//! Swarmchat CLI entry point

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use swarmchat_cli::{app, cli::Cli, config::AppConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = match AppConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = app::run(cli, config).await {
        error!("session ended with an error: {e}");
        std::process::exit(1);
    }
}

/// Set up tracing output; RUST_LOG overrides the verbosity flag
fn setup_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
