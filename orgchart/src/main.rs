// orgchart/src/main.rs

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug orgchart history --id 5 pour voir le SQL.
    // Logs go to stderr; stdout carries the rows only.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::History { id, config, format } => {
            commands::history::execute(id, config, format).await
        }
        Commands::Sql {
            id,
            dialect,
            config,
        } => commands::sql::execute(id, dialect, config),
    };

    if let Err(report) = result {
        eprintln!("❌ {:?}", report);
        std::process::exit(1);
    }

    Ok(())
}
