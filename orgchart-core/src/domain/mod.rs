pub mod error;
pub mod orgchart;
pub mod query;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::DomainError;
