// orgchart-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum OrgChartError {
    // --- ERREURS DU DOMAINE (Construction de requête, mapping) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (DB, IO, Config) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- ERREURS GÉNÉRIQUES / APPLICATIVES ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl OrgChartError {
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Infrastructure(InfrastructureError::Database(
                DatabaseError::Connection { .. }
            ))
        )
    }

    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            Self::Infrastructure(InfrastructureError::Database(DatabaseError::Query { .. }))
        )
    }
}

impl From<DatabaseError> for OrgChartError {
    fn from(err: DatabaseError) -> Self {
        OrgChartError::Infrastructure(InfrastructureError::Database(err))
    }
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for OrgChartError {
    fn from(err: std::io::Error) -> Self {
        OrgChartError::Infrastructure(InfrastructureError::Io(err))
    }
}
