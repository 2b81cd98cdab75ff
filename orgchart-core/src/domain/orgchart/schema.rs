// orgchart-core/src/domain/orgchart/schema.rs

use crate::domain::error::DomainError;
use crate::domain::query::{Ident, TableRef};

pub const DEFAULT_ORG_CHART_TABLE: &str = "organograma";
pub const DEFAULT_HISTORY_TABLE: &str = "organograma_historico";

/// Fixed column names of both tables.
pub mod columns {
    pub const ID: &str = "id";
    pub const ACTIVE: &str = "ativo";
    pub const ORG_CHART_ID: &str = "id_organograma";
    pub const PARENT_ID: &str = "id_pai";
    pub const NAME: &str = "nome";
    pub const START_DATE: &str = "data_inicio";
}

/// Where the two tables live. Table names vary between deployments,
/// column names do not.
#[derive(Debug, Clone, PartialEq)]
pub struct OrgChartSchema {
    pub schema: Option<Ident>,
    pub org_chart_table: Ident,
    pub history_table: Ident,
}

impl OrgChartSchema {
    pub fn new(
        schema: Option<&str>,
        org_chart_table: &str,
        history_table: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            schema: schema.map(Ident::new).transpose()?,
            org_chart_table: Ident::new(org_chart_table)?,
            history_table: Ident::new(history_table)?,
        })
    }

    pub fn org_chart(&self, alias: &str) -> Result<TableRef, DomainError> {
        Ok(TableRef::aliased(self.org_chart_table.as_str(), alias)?.in_schema(self.schema.as_ref()))
    }

    pub fn history(&self, alias: &str) -> Result<TableRef, DomainError> {
        Ok(TableRef::aliased(self.history_table.as_str(), alias)?.in_schema(self.schema.as_ref()))
    }
}

impl Default for OrgChartSchema {
    fn default() -> Self {
        Self {
            schema: None,
            org_chart_table: Ident::trusted(DEFAULT_ORG_CHART_TABLE),
            history_table: Ident::trusted(DEFAULT_HISTORY_TABLE),
        }
    }
}
