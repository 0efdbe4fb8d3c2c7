use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use reconcile_cli::cli::{run, ReconcileArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = ReconcileArgs::parse();
    run(args)?;
    Ok(())
}
