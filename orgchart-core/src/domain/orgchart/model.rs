// orgchart-core/src/domain/orgchart/model.rs

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::schema::columns;
use crate::domain::error::DomainError;
use crate::domain::query::{Record, Value};

/// Alias of the computed parent-name column.
pub const PARENT_NAME_ALIAS: &str = "nomeOrganogramaPai";

/// One time-versioned row of `organograma_historico`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrgChartHistory {
    pub id: i64,
    #[serde(rename = "id_organograma")]
    pub org_chart_id: i64,
    #[serde(rename = "id_pai")]
    pub parent_id: Option<i64>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "data_inicio")]
    pub start_date: NaiveDate,
}

/// Columns the model maps to typed fields. Anything else `oh.*` returns
/// lands in `HistoryEntry::extra`.
const MAPPED_COLUMNS: [&str; 7] = [
    columns::ID,
    columns::ORG_CHART_ID,
    columns::PARENT_ID,
    columns::NAME,
    columns::START_DATE,
    columns::ACTIVE,
    PARENT_NAME_ALIAS,
];

/// A history row, the owning org chart's active flag, and the parent's
/// name as it was on `history.start_date`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub history: OrgChartHistory,
    #[serde(rename = "ativo")]
    pub active: bool,
    #[serde(rename = "nomeOrganogramaPai")]
    pub parent_name: Option<String>,
    /// Deployment-specific history columns (audit stamps, codes...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl HistoryEntry {
    pub fn from_record(record: &Record) -> Result<Self, DomainError> {
        Ok(Self {
            history: OrgChartHistory {
                id: record.get_i64(columns::ID)?,
                org_chart_id: record.get_i64(columns::ORG_CHART_ID)?,
                parent_id: record.get_opt_i64(columns::PARENT_ID)?,
                name: record.get_string(columns::NAME)?,
                start_date: record.get_date(columns::START_DATE)?,
            },
            active: record.get_bool(columns::ACTIVE)?,
            parent_name: record.get_opt_string(PARENT_NAME_ALIAS)?,
            extra: extra_columns(record),
        })
    }
}

fn extra_columns(record: &Record) -> BTreeMap<String, Value> {
    let mut extra = BTreeMap::new();
    for (column, value) in record.iter() {
        if !MAPPED_COLUMNS.contains(&column) {
            // Leftmost duplicate wins, as in Record::get
            extra
                .entry(column.to_string())
                .or_insert_with(|| value.clone());
        }
    }
    extra
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID Histórico: {}, Nome Pai: {}",
            self.history.id,
            self.parent_name.as_deref().unwrap_or("")
        )
    }
}
