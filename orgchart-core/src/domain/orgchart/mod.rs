// orgchart-core/src/domain/orgchart/mod.rs

pub mod history_query;
pub mod model;
pub mod schema;
pub mod timeline;

pub use history_query::history_with_parent_name;
pub use model::{HistoryEntry, OrgChartHistory, PARENT_NAME_ALIAS};
pub use schema::{OrgChartSchema, columns};
