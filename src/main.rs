mod checker;
mod cli;
mod config;
mod editor;
mod error;
mod fetcher;
mod models;
mod notifier;
mod parser;
mod price;
mod store;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    cli::run_cli()
}
