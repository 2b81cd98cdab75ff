// orgchart-core/src/domain/query/record.rs

use chrono::NaiveDate;

use super::value::Value;
use crate::domain::error::DomainError;

/// One result row: column names and values, in SELECT order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Record {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// `(column, value)` pairs in SELECT order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }

    /// First column named `column`. Engines may return duplicates for
    /// `a.*, b.*` projections; the leftmost one wins.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    fn require(&self, column: &str) -> Result<&Value, DomainError> {
        self.get(column).ok_or_else(|| DomainError::RowMapping {
            column: column.to_string(),
            reason: "column missing from result set".to_string(),
        })
    }

    pub fn get_opt_i64(&self, column: &str) -> Result<Option<i64>, DomainError> {
        match self.require(column)? {
            Value::Null => Ok(None),
            Value::Int(i) => Ok(Some(*i)),
            other => Err(mismatch(column, "int", other)),
        }
    }

    pub fn get_i64(&self, column: &str) -> Result<i64, DomainError> {
        self.get_opt_i64(column)?
            .ok_or_else(|| unexpected_null(column))
    }

    pub fn get_bool(&self, column: &str) -> Result<bool, DomainError> {
        match self.require(column)? {
            Value::Bool(b) => Ok(*b),
            // Legacy schemas store flags as smallint
            Value::Int(i) => Ok(*i != 0),
            Value::Null => Err(unexpected_null(column)),
            other => Err(mismatch(column, "bool", other)),
        }
    }

    pub fn get_opt_string(&self, column: &str) -> Result<Option<String>, DomainError> {
        match self.require(column)? {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s.clone())),
            other => Err(mismatch(column, "text", other)),
        }
    }

    pub fn get_string(&self, column: &str) -> Result<String, DomainError> {
        self.get_opt_string(column)?
            .ok_or_else(|| unexpected_null(column))
    }

    pub fn get_date(&self, column: &str) -> Result<NaiveDate, DomainError> {
        match self.require(column)? {
            Value::Date(d) => Ok(*d),
            // Some deployments store start dates as timestamps
            Value::Timestamp(t) => Ok(t.date()),
            Value::Null => Err(unexpected_null(column)),
            other => Err(mismatch(column, "date", other)),
        }
    }
}

fn mismatch(column: &str, expected: &str, found: &Value) -> DomainError {
    DomainError::RowMapping {
        column: column.to_string(),
        reason: format!("expected {}, found {}", expected, found.type_name()),
    }
}

fn unexpected_null(column: &str) -> DomainError {
    DomainError::RowMapping {
        column: column.to_string(),
        reason: "unexpected NULL".to_string(),
    }
}
