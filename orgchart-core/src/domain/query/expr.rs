// orgchart-core/src/domain/query/expr.rs

use std::fmt;

use super::ident::ColumnRef;
use super::select::Select;
use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(ColumnRef),
    /// Bound at execution time, never inlined into the SQL text.
    Param(Value),
    Max(Box<Expr>),
    /// Scalar subquery. Must yield at most one row and one column.
    Subquery(Box<Select>),
}

impl Expr {
    pub fn max(column: ColumnRef) -> Self {
        Self::Max(Box::new(Self::Column(column)))
    }
}

impl From<ColumnRef> for Expr {
    fn from(c: ColumnRef) -> Self {
        Self::Column(c)
    }
}

/// A comparison between a column of the current SELECT (`inner`) and a
/// column of the row currently evaluated by an enclosing SELECT (`outer`).
///
/// Rendered as `inner <op> outer`.
#[derive(Debug, Clone, PartialEq)]
pub struct Correlation {
    pub inner: ColumnRef,
    pub op: CompareOp,
    pub outer: ColumnRef,
}

impl Correlation {
    pub fn new(inner: ColumnRef, op: CompareOp, outer: ColumnRef) -> Self {
        Self { inner, op, outer }
    }

    pub fn eq(inner: ColumnRef, outer: ColumnRef) -> Self {
        Self::new(inner, CompareOp::Eq, outer)
    }
}

/// One conjunct of a WHERE or JOIN ... ON clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        left: Expr,
        op: CompareOp,
        right: Expr,
    },
    Correlated(Correlation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("ASC"),
            Self::Desc => f.write_str("DESC"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: ColumnRef,
    pub direction: Direction,
}
