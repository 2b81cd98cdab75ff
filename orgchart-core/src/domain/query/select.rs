// orgchart-core/src/domain/query/select.rs

use super::expr::{CompareOp, Correlation, Direction, Expr, OrderBy, Predicate};
use super::ident::{ColumnRef, Ident, TableRef};
use super::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum SelectItem {
    /// `"oh".*`
    Wildcard(Ident),
    Expr { expr: Expr, alias: Option<Ident> },
}

/// `INNER JOIN table ON left op right`
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: TableRef,
    pub on: Predicate,
}

/// A single SELECT statement. All WHERE predicates are AND-ed.
///
/// Built fluently: every method consumes and returns the statement, so a
/// nested SELECT is just another value handed to `select_sub` / `where_sub`.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub projection: Vec<SelectItem>,
    pub from: TableRef,
    pub joins: Vec<Join>,
    pub filters: Vec<Predicate>,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u64>,
}

impl Select {
    pub fn table(table: TableRef) -> Self {
        Self {
            projection: Vec::new(),
            from: table,
            joins: Vec::new(),
            filters: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn select_all_of(mut self, qualifier: Ident) -> Self {
        self.projection.push(SelectItem::Wildcard(qualifier));
        self
    }

    pub fn column(mut self, column: ColumnRef) -> Self {
        self.projection.push(SelectItem::Expr {
            expr: Expr::Column(column),
            alias: None,
        });
        self
    }

    pub fn expr(mut self, expr: Expr) -> Self {
        self.projection.push(SelectItem::Expr { expr, alias: None });
        self
    }

    pub fn expr_as(mut self, expr: Expr, alias: Ident) -> Self {
        self.projection.push(SelectItem::Expr {
            expr,
            alias: Some(alias),
        });
        self
    }

    /// Adds `(subquery) AS alias` to the projection.
    pub fn select_sub(self, subquery: Select, alias: Ident) -> Self {
        self.expr_as(Expr::Subquery(Box::new(subquery)), alias)
    }

    pub fn inner_join(
        mut self,
        table: TableRef,
        left: ColumnRef,
        op: CompareOp,
        right: ColumnRef,
    ) -> Self {
        self.joins.push(Join {
            table,
            on: Predicate::Compare {
                left: Expr::Column(left),
                op,
                right: Expr::Column(right),
            },
        });
        self
    }

    pub fn filter(mut self, left: Expr, op: CompareOp, right: Expr) -> Self {
        self.filters.push(Predicate::Compare { left, op, right });
        self
    }

    pub fn where_param(self, column: ColumnRef, op: CompareOp, value: impl Into<Value>) -> Self {
        self.filter(Expr::Column(column), op, Expr::Param(value.into()))
    }

    pub fn where_correlated(mut self, correlation: Correlation) -> Self {
        self.filters.push(Predicate::Correlated(correlation));
        self
    }

    /// `column op (subquery)`
    pub fn where_sub(self, column: ColumnRef, op: CompareOp, subquery: Select) -> Self {
        self.filter(
            Expr::Column(column),
            op,
            Expr::Subquery(Box::new(subquery)),
        )
    }

    pub fn order_by(mut self, column: ColumnRef, direction: Direction) -> Self {
        self.order_by.push(OrderBy { column, direction });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Aliases (or bare table names) introduced by this SELECT's FROM clause.
    pub fn bindings(&self) -> Vec<&Ident> {
        std::iter::once(self.from.binding())
            .chain(self.joins.iter().map(|j| j.table.binding()))
            .collect()
    }
}
