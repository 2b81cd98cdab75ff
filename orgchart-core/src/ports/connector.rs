// orgchart-core/src/ports/connector.rs

// What the application needs from a database, without knowing which one.
// Adapters live in infrastructure::adapters.

use crate::domain::query::{CompiledQuery, Dialect};
use crate::error::OrgChartError;
use async_trait::async_trait;

pub use crate::domain::query::Record;

#[async_trait]
pub trait Connector: Send + Sync {
    /// Runs a statement without parameters and discards any rows.
    async fn execute(&self, sql: &str) -> Result<(), OrgChartError>;

    /// Runs a compiled SELECT with its bound parameters and returns every row.
    async fn query(&self, query: &CompiledQuery) -> Result<Vec<Record>, OrgChartError>;

    /// Dialect statements for this engine must be compiled with.
    fn dialect(&self) -> Dialect;

    fn engine_name(&self) -> &str;
}
