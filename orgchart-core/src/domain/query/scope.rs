// orgchart-core/src/domain/query/scope.rs
//
// Name resolution for nested SELECTs. Each SELECT opens a scope made of
// the aliases its FROM/JOIN clauses introduce; a qualified column must
// resolve to the current scope or one of the enclosing ones. A join's ON
// sees only the tables introduced up to that join, ORDER BY only local ones.

use std::collections::HashSet;

use super::expr::{Correlation, Expr, Predicate};
use super::ident::{ColumnRef, Ident};
use super::select::{Select, SelectItem};
use crate::domain::error::DomainError;

struct Scope<'a> {
    local: Vec<&'a Ident>,
    enclosing: &'a [Vec<&'a Ident>],
}

impl Scope<'_> {
    fn is_local(&self, qualifier: &Ident) -> bool {
        self.local.contains(&qualifier)
    }

    fn is_enclosing(&self, qualifier: &Ident) -> bool {
        self.enclosing.iter().any(|s| s.contains(&qualifier))
    }

    fn resolve(&self, column: &ColumnRef) -> Result<(), DomainError> {
        match &column.qualifier {
            // Unqualified names are left to the engine
            None => Ok(()),
            Some(q) if self.is_local(q) || self.is_enclosing(q) => Ok(()),
            Some(_) => Err(DomainError::UnresolvedReference(column.to_string())),
        }
    }
}

pub(crate) fn validate(select: &Select) -> Result<(), DomainError> {
    validate_in(select, &[])
}

fn validate_in<'a>(select: &'a Select, enclosing: &'a [Vec<&'a Ident>]) -> Result<(), DomainError> {
    if select.projection.is_empty() {
        return Err(DomainError::EmptyProjection);
    }

    let local = select.bindings();
    let mut seen = HashSet::new();
    for binding in &local {
        if !seen.insert(binding.as_str()) {
            return Err(DomainError::DuplicateAlias(binding.as_str().to_string()));
        }
    }

    // FROM binding first, then one per join, in order
    for (n, join) in select.joins.iter().enumerate() {
        let visible = Scope {
            local: local.get(..n + 2).unwrap_or(&local[..]).to_vec(),
            enclosing,
        };
        check_predicate(&join.on, &visible)?;
    }

    let scope = Scope { local, enclosing };

    for item in &select.projection {
        match item {
            SelectItem::Wildcard(q) => {
                if !scope.is_local(q) {
                    return Err(DomainError::UnresolvedReference(format!("{}.*", q)));
                }
            }
            SelectItem::Expr { expr, .. } => check_expr(expr, &scope)?,
        }
    }

    for predicate in &select.filters {
        check_predicate(predicate, &scope)?;
    }
    // ORDER BY sorts this SELECT's rows; outer aliases are not sort keys
    for ob in &select.order_by {
        if let Some(q) = &ob.column.qualifier
            && !scope.is_local(q)
        {
            return Err(DomainError::UnresolvedReference(ob.column.to_string()));
        }
    }

    Ok(())
}

fn check_predicate(predicate: &Predicate, scope: &Scope<'_>) -> Result<(), DomainError> {
    match predicate {
        Predicate::Compare { left, right, .. } => {
            check_expr(left, scope)?;
            check_expr(right, scope)
        }
        Predicate::Correlated(c) => check_correlation(c, scope),
    }
}

fn check_correlation(c: &Correlation, scope: &Scope<'_>) -> Result<(), DomainError> {
    let inner_ok = c.inner.qualifier.as_ref().is_some_and(|q| scope.is_local(q));
    // A local alias shadows an enclosing one with the same name
    let outer_ok = c
        .outer
        .qualifier
        .as_ref()
        .is_some_and(|q| !scope.is_local(q) && scope.is_enclosing(q));

    if inner_ok && outer_ok {
        Ok(())
    } else {
        Err(DomainError::InvalidCorrelation(format!(
            "{} {} {}",
            c.inner, c.op, c.outer
        )))
    }
}

fn check_expr(expr: &Expr, scope: &Scope<'_>) -> Result<(), DomainError> {
    match expr {
        Expr::Column(c) => scope.resolve(c),
        Expr::Param(_) => Ok(()),
        Expr::Max(inner) => check_expr(inner, scope),
        Expr::Subquery(sub) => {
            let mut nested: Vec<Vec<&Ident>> = scope.enclosing.to_vec();
            nested.push(scope.local.clone());
            validate_in(sub, &nested)
        }
    }
}
