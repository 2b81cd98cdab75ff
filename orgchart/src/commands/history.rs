// orgchart/src/commands/history.rs
//
// USE CASE: print the history of one org chart.

use comfy_table::Table;
use miette::IntoDiagnostic;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::info;

use orgchart_core::application::{FetchOptions, fetch_history};
use orgchart_core::domain::orgchart::HistoryEntry;
use orgchart_core::domain::query::Value;
use orgchart_core::infrastructure::factory::open_connector;

use crate::cli::OutputFormat;

pub async fn execute(id: i64, config: Option<PathBuf>, format: OutputFormat) -> miette::Result<()> {
    let config = super::load_profile(config.as_deref())?;
    let schema = config.org_chart_schema()?;
    info!(driver = ?config.driver, org_chart_id = id, "Fetching org chart history");
    let connector = open_connector(&config).await?;

    let options = FetchOptions {
        verify_sql: config.verify_sql,
    };
    let entries = fetch_history(connector.as_ref(), &schema, id, options).await?;
    if entries.is_empty() {
        info!(org_chart_id = id, "No history rows");
    }

    match format {
        OutputFormat::Lines => {
            for entry in &entries {
                println!("{}", entry);
            }
        }
        OutputFormat::Table => println!("{}", render_table(&entries)),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries).into_diagnostic()?);
        }
    }
    Ok(())
}

fn render_table(entries: &[HistoryEntry]) -> Table {
    let extra: BTreeSet<&str> = entries
        .iter()
        .flat_map(|e| e.extra.keys().map(String::as_str))
        .collect();

    let mut header = vec![
        "id",
        "id_organograma",
        "id_pai",
        "nome",
        "data_inicio",
        "ativo",
        "nomeOrganogramaPai",
    ];
    header.extend(extra.iter().copied());

    let mut table = Table::new();
    table.set_header(header);
    for e in entries {
        let mut row = vec![
            e.history.id.to_string(),
            e.history.org_chart_id.to_string(),
            e.history.parent_id.map(|p| p.to_string()).unwrap_or_default(),
            e.history.name.clone(),
            e.history.start_date.to_string(),
            e.active.to_string(),
            e.parent_name.clone().unwrap_or_default(),
        ];
        row.extend(extra.iter().map(|k| e.extra.get(*k).map(cell).unwrap_or_default()));
        table.add_row(row);
    }
    table
}

/// Plain cell text; NULL is blank.
fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Text(s) => s.clone(),
        Value::Date(d) => d.to_string(),
        Value::Timestamp(t) => t.to_string(),
        other => other.to_string(),
    }
}
