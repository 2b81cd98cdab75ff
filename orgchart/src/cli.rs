// orgchart/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use orgchart_core::domain::query::Dialect;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "orgchart")]
#[command(about = "Org-chart history with the parent's name as of each change", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 📜 Prints the history of an org chart, newest first
    History {
        /// Org chart id (organograma.id)
        #[arg(long)]
        id: i64,

        /// Connection profile (default: ./orgchart.yaml or ./orgchart.yml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Lines)]
        format: OutputFormat,
    },

    /// 🧾 Prints the compiled history query without connecting
    Sql {
        /// Org chart id bound as the query parameter
        #[arg(long)]
        id: i64,

        /// Target dialect: postgres | duckdb
        #[arg(long, default_value = "postgres")]
        dialect: Dialect,

        /// Read table names from this connection profile
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `ID Histórico: <id>, Nome Pai: <name>` per row
    Lines,
    Table,
    Json,
}
