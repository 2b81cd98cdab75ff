// orgchart-core/src/infrastructure/factory.rs

use tracing::info;

use crate::error::OrgChartError;
use crate::infrastructure::adapters::duckdb::DuckDBConnector;
use crate::infrastructure::adapters::postgres::PostgresConnector;
use crate::infrastructure::config::{ConnectionConfig, Driver};
use crate::ports::connector::Connector;

/// Opens the adapter selected by `config.driver`.
pub async fn open_connector(config: &ConnectionConfig) -> Result<Box<dyn Connector>, OrgChartError> {
    let connector: Box<dyn Connector> = match config.driver {
        Driver::Postgres => Box::new(PostgresConnector::connect(&config.postgres).await?),
        Driver::DuckDb => Box::new(DuckDBConnector::new(&config.duckdb.path)?),
    };
    info!(engine = connector.engine_name(), "Connector ready");
    Ok(connector)
}
