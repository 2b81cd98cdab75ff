// orgchart-core/src/application/history.rs

use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::orgchart::timeline::{duplicate_start_dates, is_newest_first};
use crate::domain::orgchart::{HistoryEntry, OrgChartSchema, history_with_parent_name};
use crate::domain::query::{CompiledQuery, Dialect, QueryBuilder};
use crate::error::OrgChartError;
use crate::ports::connector::Connector;

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Parse the SQL with sqlparser before sending it.
    pub verify_sql: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self { verify_sql: true }
    }
}

/// Compiles the history query without touching a database.
pub fn render_history_query(
    dialect: Dialect,
    schema: &OrgChartSchema,
    org_chart_id: i64,
) -> Result<CompiledQuery, OrgChartError> {
    let qb = QueryBuilder::new(dialect);
    let select = history_with_parent_name(&qb, schema, org_chart_id)?;
    Ok(qb.compile(&select)?)
}

/// History of `org_chart_id`, newest first, with the parent's name as of
/// each row's start date. An unknown id yields an empty vector.
#[instrument(skip(connector, schema, options), fields(engine = connector.engine_name()))]
pub async fn fetch_history(
    connector: &dyn Connector,
    schema: &OrgChartSchema,
    org_chart_id: i64,
    options: FetchOptions,
) -> Result<Vec<HistoryEntry>, OrgChartError> {
    let query = render_history_query(connector.dialect(), schema, org_chart_id)?;
    if options.verify_sql {
        query.verify_syntax()?;
    }
    debug!(sql = %query.sql, params = query.params.len(), "History query compiled");

    let start = Instant::now();
    let records = match connector.query(&query).await {
        Ok(records) => records,
        Err(e) => {
            error!("History query failed after {:.2?}: {}", start.elapsed(), e);
            return Err(e);
        }
    };

    let entries = records
        .iter()
        .map(HistoryEntry::from_record)
        .collect::<Result<Vec<_>, _>>()?;
    info!(rows = entries.len(), "History fetched in {:.2?}", start.elapsed());

    for dup in duplicate_start_dates(&entries) {
        warn!(
            org_chart_id = dup.org_chart_id,
            start_date = %dup.start_date,
            count = dup.count,
            "Several history rows share a start date; parent names may be ambiguous"
        );
    }
    if !is_newest_first(&entries) {
        warn!("History rows are not in descending start-date order");
    }

    Ok(entries)
}
