use anyhow::Result;
use clap::Parser;
use runmany_cli::{Cli, run_command};

fn main() -> Result<()> {
    // Initialize tracing based on RUST_LOG env var, keeping stdout for the report
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run_command(&cli)
}
