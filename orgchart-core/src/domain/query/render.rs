// orgchart-core/src/domain/query/render.rs
//
// Select -> SQL text + ordered parameter list.

use super::dialect::Dialect;
use super::expr::{Expr, Predicate};
use super::select::{Select, SelectItem};
use super::value::Value;

pub(crate) struct SqlWriter {
    dialect: Dialect,
    sql: String,
    params: Vec<Value>,
}

impl SqlWriter {
    pub(crate) fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    pub(crate) fn write_select(&mut self, select: &Select) {
        self.sql.push_str("SELECT ");
        for (i, item) in select.projection.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            match item {
                SelectItem::Wildcard(qualifier) => {
                    self.sql.push_str(&format!("{}.*", qualifier));
                }
                SelectItem::Expr { expr, alias } => {
                    self.write_expr(expr);
                    if let Some(alias) = alias {
                        self.sql.push_str(&format!(" AS {}", alias));
                    }
                }
            }
        }

        self.sql.push_str(&format!(" FROM {}", select.from));

        for join in &select.joins {
            self.sql.push_str(&format!(" INNER JOIN {} ON ", join.table));
            self.write_predicate(&join.on);
        }

        for (i, predicate) in select.filters.iter().enumerate() {
            self.sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            self.write_predicate(predicate);
        }

        if !select.order_by.is_empty() {
            let keys = select
                .order_by
                .iter()
                .map(|ob| format!("{} {}", ob.column, ob.direction))
                .collect::<Vec<_>>()
                .join(", ");
            self.sql.push_str(&format!(" ORDER BY {}", keys));
        }

        if let Some(limit) = select.limit {
            self.sql.push_str(&format!(" LIMIT {}", limit));
        }
    }

    fn write_predicate(&mut self, predicate: &Predicate) {
        match predicate {
            Predicate::Compare { left, op, right } => {
                self.write_expr(left);
                self.sql.push_str(&format!(" {} ", op));
                self.write_expr(right);
            }
            Predicate::Correlated(c) => {
                self.sql
                    .push_str(&format!("{} {} {}", c.inner, c.op, c.outer));
            }
        }
    }

    fn write_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Column(c) => self.sql.push_str(&c.to_string()),
            Expr::Param(value) => {
                self.params.push(value.clone());
                let placeholder = self.dialect.placeholder(self.params.len());
                self.sql.push_str(&placeholder);
            }
            Expr::Max(inner) => {
                self.sql.push_str("MAX(");
                self.write_expr(inner);
                self.sql.push(')');
            }
            Expr::Subquery(select) => {
                self.sql.push('(');
                self.write_select(select);
                self.sql.push(')');
            }
        }
    }
}
