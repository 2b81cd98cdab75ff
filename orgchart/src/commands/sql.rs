// orgchart/src/commands/sql.rs
//
// USE CASE: show the SQL `history` would send, without a database.

use std::path::PathBuf;
use tracing::debug;

use orgchart_core::application::render_history_query;
use orgchart_core::domain::orgchart::OrgChartSchema;
use orgchart_core::domain::query::Dialect;

pub fn execute(id: i64, dialect: Dialect, config: Option<PathBuf>) -> miette::Result<()> {
    let schema = match config {
        Some(path) => super::load_profile(Some(&path))?.org_chart_schema()?,
        None => OrgChartSchema::default(),
    };

    let query = render_history_query(dialect, &schema, id)?;
    query.verify_syntax()?;
    debug!(dialect = %dialect, params = query.params.len(), "History query rendered");

    println!("{}", query.sql);
    for (i, value) in query.params.iter().enumerate() {
        println!("-- param {}: {}", i + 1, value);
    }
    Ok(())
}
