mod application;
mod cli;
mod data;
mod domain;
mod error;
mod infra;
mod ml;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("churn_predictor=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
