// orgchart-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Invalid SQL identifier: '{0}'")]
    #[diagnostic(
        code(orgchart::domain::identifier),
        help("Identifiers must match [A-Za-z_][A-Za-z0-9_]* and be at most 63 bytes long.")
    )]
    InvalidIdentifier(String),

    #[error("SELECT has an empty projection")]
    #[diagnostic(code(orgchart::domain::empty_projection))]
    EmptyProjection,

    #[error("Alias '{0}' is bound twice in the same FROM clause")]
    #[diagnostic(code(orgchart::domain::duplicate_alias))]
    DuplicateAlias(String),

    #[error("Column reference {0} does not resolve to any table in scope")]
    #[diagnostic(
        code(orgchart::domain::unresolved),
        help("Qualify columns with an alias declared in this SELECT or an enclosing one.")
    )]
    UnresolvedReference(String),

    #[error("Invalid correlation: {0}")]
    #[diagnostic(
        code(orgchart::domain::correlation),
        help("The inner column must belong to the subquery, the outer column to an enclosing query.")
    )]
    InvalidCorrelation(String),

    #[error("Generated SQL does not parse: {0}")]
    #[diagnostic(code(orgchart::domain::sql_syntax))]
    SqlSyntax(String),

    #[error("Cannot map column '{column}': {reason}")]
    #[diagnostic(code(orgchart::domain::row_mapping))]
    RowMapping { column: String, reason: String },
}
