// orgchart-core/src/domain/query/mod.rs
//
// Typed SELECT construction with correlated subqueries. No raw SQL
// fragments: identifiers are validated and quoted, values are bound.

pub mod builder;
pub mod dialect;
pub mod expr;
pub mod ident;
pub mod record;
mod render;
mod scope;
pub mod select;
pub mod value;

pub use builder::{CompiledQuery, QueryBuilder};
pub use dialect::Dialect;
pub use expr::{CompareOp, Correlation, Direction, Expr, OrderBy, Predicate};
pub use ident::{ColumnRef, Ident, TableRef, col};
pub use record::Record;
pub use select::{Join, Select, SelectItem};
pub use value::Value;
