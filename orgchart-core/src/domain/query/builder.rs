// orgchart-core/src/domain/query/builder.rs

use tracing::debug;

use super::dialect::Dialect;
use super::ident::TableRef;
use super::render::SqlWriter;
use super::scope;
use super::select::Select;
use super::value::Value;
use crate::domain::error::DomainError;

/// Entry point for building statements against one dialect.
///
/// Nested SELECTs are started from the same builder with [`QueryBuilder::table`]
/// and handed to the enclosing statement, so no closure has to capture the
/// connection or the dialect.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder {
    dialect: Dialect,
}

impl QueryBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn table(&self, table: TableRef) -> Select {
        Select::table(table)
    }

    /// Resolves every qualified name, then renders SQL and collects the
    /// bound parameters in placeholder order.
    pub fn compile(&self, select: &Select) -> Result<CompiledQuery, DomainError> {
        scope::validate(select)?;

        let mut writer = SqlWriter::new(self.dialect);
        writer.write_select(select);
        let (sql, params) = writer.finish();
        debug!(dialect = %self.dialect, params = params.len(), "Compiled query");

        Ok(CompiledQuery {
            sql,
            params,
            dialect: self.dialect,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Value>,
    pub dialect: Dialect,
}

impl CompiledQuery {
    /// Parses the rendered SQL with the dialect's grammar. Catches rendering
    /// mistakes before they reach the server.
    pub fn verify_syntax(&self) -> Result<(), DomainError> {
        let count = self
            .dialect
            .parse_statement_count(&self.sql)
            .map_err(|e| DomainError::SqlSyntax(e.to_string()))?;
        if count != 1 {
            return Err(DomainError::SqlSyntax(format!(
                "expected exactly one statement, found {}",
                count
            )));
        }
        Ok(())
    }
}
