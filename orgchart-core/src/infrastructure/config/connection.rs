// orgchart-core/src/infrastructure/config/connection.rs

use serde::Deserialize;

use crate::domain::orgchart::OrgChartSchema;
use crate::domain::orgchart::schema::{DEFAULT_HISTORY_TABLE, DEFAULT_ORG_CHART_TABLE};
use crate::infrastructure::error::InfrastructureError;

/// Which adapter serves the queries.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    #[default]
    Postgres,
    DuckDb,
}

impl std::str::FromStr for Driver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "pgsql" => Ok(Self::Postgres),
            "duckdb" => Ok(Self::DuckDb),
            _ => Err(format!("Unknown driver: {}", s)),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PostgresSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(alias = "user", default = "default_username")]
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_charset")]
    pub charset: String,
    /// Becomes the session `search_path`, in order.
    #[serde(default)]
    pub schema: Vec<String>,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database: default_database(),
            username: default_username(),
            password: None,
            charset: default_charset(),
            schema: Vec::new(),
            connect_timeout_secs: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DuckDbSettings {
    #[serde(default = "default_duckdb_path")]
    pub path: String,
}

impl Default for DuckDbSettings {
    fn default() -> Self {
        Self {
            path: default_duckdb_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TableSettings {
    /// Explicit qualifier for both tables. Usually left empty in favour of
    /// the Postgres `search_path`.
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default = "default_org_chart_table")]
    pub org_chart: String,
    #[serde(default = "default_history_table")]
    pub history: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            schema: None,
            org_chart: default_org_chart_table(),
            history: default_history_table(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub driver: Driver,
    #[serde(default)]
    pub postgres: PostgresSettings,
    #[serde(default)]
    pub duckdb: DuckDbSettings,
    #[serde(default)]
    pub tables: TableSettings,
    /// Parse generated SQL with sqlparser before sending it.
    #[serde(default = "default_true")]
    pub verify_sql: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            driver: Driver::default(),
            postgres: PostgresSettings::default(),
            duckdb: DuckDbSettings::default(),
            tables: TableSettings::default(),
            verify_sql: true,
        }
    }
}

impl ConnectionConfig {
    pub fn org_chart_schema(&self) -> Result<OrgChartSchema, InfrastructureError> {
        OrgChartSchema::new(
            self.tables.schema.as_deref(),
            &self.tables.org_chart,
            &self.tables.history,
        )
        .map_err(|e| InfrastructureError::ConfigError(format!("tables: {}", e)))
    }

    pub fn validate(&self) -> Result<(), InfrastructureError> {
        self.org_chart_schema()?;

        // tokio-postgres always negotiates UTF8
        let charset = self.postgres.charset.to_lowercase();
        if !matches!(charset.as_str(), "utf8" | "utf-8" | "unicode") {
            return Err(InfrastructureError::ConfigError(format!(
                "postgres.charset '{}' is not supported, only utf8",
                self.postgres.charset
            )));
        }

        if self.postgres.schema.iter().any(|s| s.trim().is_empty()) {
            return Err(InfrastructureError::ConfigError(
                "postgres.schema contains an empty entry".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_host() -> String {
    "localhost".to_string()
}
fn default_port() -> u16 {
    5432
}
fn default_database() -> String {
    "postgres".to_string()
}
fn default_username() -> String {
    "postgres".to_string()
}
fn default_charset() -> String {
    "utf8".to_string()
}
fn default_duckdb_path() -> String {
    "orgchart.duckdb".to_string()
}
fn default_org_chart_table() -> String {
    DEFAULT_ORG_CHART_TABLE.to_string()
}
fn default_history_table() -> String {
    DEFAULT_HISTORY_TABLE.to_string()
}
fn default_true() -> bool {
    true
}
