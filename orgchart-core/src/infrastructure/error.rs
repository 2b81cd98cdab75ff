// orgchart-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("Connection Error ({engine}): {source}")]
    #[diagnostic(
        code(orgchart::infra::database::connection),
        help("Check host, port, credentials and that the database is reachable.")
    )]
    Connection {
        engine: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("Query Error ({engine}): {source}")]
    #[diagnostic(
        code(orgchart::infra::database::query),
        help("The SQL engine rejected the statement. Run with RUST_LOG=debug to see it.")
    )]
    Query {
        engine: &'static str,
        #[source]
        source: BoxError,
    },
}

impl DatabaseError {
    pub fn connection(engine: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Connection {
            engine,
            source: source.into(),
        }
    }

    pub fn query(engine: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Query {
            engine,
            source: source.into(),
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(orgchart::infra::io),
        help("Check that the connection profile is readable.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(orgchart::infra::yaml),
        help("Check orgchart.yaml syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid connection profile: {0}")]
    #[diagnostic(code(orgchart::infra::config))]
    ConfigError(String),

    #[error("Configuration not found at '{0}'")]
    #[diagnostic(
        code(orgchart::infra::config_missing),
        help("Create orgchart.yaml in the working directory or pass --config <file>.")
    )]
    ConfigNotFound(String),
}
