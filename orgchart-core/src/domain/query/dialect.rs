// orgchart-core/src/domain/query/dialect.rs

use serde::{Deserialize, Serialize};
use sqlparser::dialect::{DuckDbDialect, PostgreSqlDialect};
use sqlparser::parser::{Parser, ParserError};
use std::fmt;

/// Target SQL dialect. Both quote identifiers with `"`; they differ in
/// the placeholder syntax for bound parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Postgres,
    DuckDb,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::DuckDb => "duckdb",
        }
    }

    /// Placeholder for the 1-based parameter `index`.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::Postgres => format!("${}", index),
            Self::DuckDb => "?".to_string(),
        }
    }

    /// Number of statements `sql` parses into under this dialect's grammar.
    pub(crate) fn parse_statement_count(&self, sql: &str) -> Result<usize, ParserError> {
        let statements = match self {
            Self::Postgres => Parser::parse_sql(&PostgreSqlDialect {}, sql)?,
            Self::DuckDb => Parser::parse_sql(&DuckDbDialect {}, sql)?,
        };
        Ok(statements.len())
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pgsql" => Ok(Self::Postgres),
            "duckdb" => Ok(Self::DuckDb),
            _ => Err(format!("Unknown dialect: {}", s)),
        }
    }
}
