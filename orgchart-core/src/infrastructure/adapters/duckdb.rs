// orgchart-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::{Config, Connection, params_from_iter};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// Imports Hexagonaux
use crate::domain::error::DomainError;
use crate::domain::query::{CompiledQuery, Dialect, Value};
use crate::error::OrgChartError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::{Connector, Record};

const ENGINE: &str = "duckdb";

/// Days from 0001-01-01 (CE) to 1970-01-01, DuckDB's DATE epoch.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub struct DuckDBConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBConnector {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)
        } else {
            Connection::open_with_flags(db_path, config)
        }
        .map_err(|e| DatabaseError::connection(ENGINE, e))?;

        debug!(path = db_path, "DuckDB connection opened");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, OrgChartError> {
        self.conn
            .lock()
            .map_err(|_| DatabaseError::connection(ENGINE, "DuckDB Mutex Poisoned").into())
    }
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn execute(&self, sql: &str) -> Result<(), OrgChartError> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DatabaseError::query(ENGINE, e).into())
    }

    async fn query(&self, query: &CompiledQuery) -> Result<Vec<Record>, OrgChartError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(&query.sql)
            .map_err(|e| DatabaseError::query(ENGINE, e))?;

        let params: Vec<DuckValue> = query.params.iter().map(to_duck).collect();
        let mut rows = stmt
            .query(params_from_iter(params.iter()))
            .map_err(|e| DatabaseError::query(ENGINE, e))?;

        let columns: Vec<String> = rows
            .as_ref()
            .map(|s| s.column_names())
            .unwrap_or_default();

        let mut records = Vec::new();
        while let Some(row) = rows.next().map_err(|e| DatabaseError::query(ENGINE, e))? {
            let mut values = Vec::with_capacity(columns.len());
            for (i, name) in columns.iter().enumerate() {
                let raw: DuckValue = row.get(i).map_err(|e| DatabaseError::query(ENGINE, e))?;
                values.push(from_duck(name, raw)?);
            }
            records.push(Record::new(columns.clone(), values));
        }

        Ok(records)
    }

    fn dialect(&self) -> Dialect {
        Dialect::DuckDb
    }

    fn engine_name(&self) -> &str {
        ENGINE
    }
}

fn to_duck(value: &Value) -> DuckValue {
    match value {
        Value::Null => DuckValue::Null,
        Value::Bool(b) => DuckValue::Boolean(*b),
        Value::Int(i) => DuckValue::BigInt(*i),
        Value::Float(x) => DuckValue::Double(*x),
        Value::Text(s) => DuckValue::Text(s.clone()),
        // Bound as ISO text; DuckDB casts it to the DATE the parameter is compared with
        Value::Date(d) => DuckValue::Text(d.format("%Y-%m-%d").to_string()),
        Value::Timestamp(t) => DuckValue::Text(t.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
    }
}

fn to_micros(unit: TimeUnit, value: i64) -> Option<i64> {
    match unit {
        TimeUnit::Second => value.checked_mul(1_000_000),
        TimeUnit::Millisecond => value.checked_mul(1_000),
        TimeUnit::Microsecond => Some(value),
        TimeUnit::Nanosecond => Some(value / 1_000),
    }
}

fn timestamp(unit: TimeUnit, value: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_micros(to_micros(unit, value)?).map(|dt| dt.naive_utc())
}

fn time_of_day(unit: TimeUnit, value: i64) -> Option<NaiveTime> {
    let micros = to_micros(unit, value)?;
    let secs = u32::try_from(micros.div_euclid(1_000_000)).ok()?;
    let nanos = u32::try_from(micros.rem_euclid(1_000_000) * 1_000).ok()?;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
}

fn from_duck(column: &str, value: DuckValue) -> Result<Value, DomainError> {
    let out_of_range = || DomainError::RowMapping {
        column: column.to_string(),
        reason: "integer out of i64 range".to_string(),
    };

    Ok(match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Bool(b),
        DuckValue::TinyInt(i) => Value::Int(i64::from(i)),
        DuckValue::SmallInt(i) => Value::Int(i64::from(i)),
        DuckValue::Int(i) => Value::Int(i64::from(i)),
        DuckValue::BigInt(i) => Value::Int(i),
        DuckValue::HugeInt(i) => Value::Int(i64::try_from(i).map_err(|_| out_of_range())?),
        DuckValue::UTinyInt(i) => Value::Int(i64::from(i)),
        DuckValue::USmallInt(i) => Value::Int(i64::from(i)),
        DuckValue::UInt(i) => Value::Int(i64::from(i)),
        DuckValue::UBigInt(i) => Value::Int(i64::try_from(i).map_err(|_| out_of_range())?),
        DuckValue::Float(x) => Value::Float(f64::from(x)),
        DuckValue::Double(x) => Value::Float(x),
        // Kept exact as text rather than rounded through f64
        DuckValue::Decimal(d) => Value::Text(d.to_string()),
        DuckValue::Text(s) | DuckValue::Enum(s) => Value::Text(s),
        DuckValue::Date32(days) => Value::Date(
            days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
                .and_then(NaiveDate::from_num_days_from_ce_opt)
                .ok_or_else(|| out_of_range_temporal(column, "date", days.into()))?,
        ),
        DuckValue::Timestamp(unit, v) => Value::Timestamp(
            timestamp(unit, v).ok_or_else(|| out_of_range_temporal(column, "timestamp", v))?,
        ),
        DuckValue::Time64(unit, v) => Value::Text(
            time_of_day(unit, v)
                .ok_or_else(|| out_of_range_temporal(column, "time", v))?
                .to_string(),
        ),
        other => {
            return Err(DomainError::RowMapping {
                column: column.to_string(),
                reason: format!("unsupported DuckDB type: {:?}", other),
            });
        }
    })
}

fn out_of_range_temporal(column: &str, kind: &str, raw: i64) -> DomainError {
    DomainError::RowMapping {
        column: column.to_string(),
        reason: format!("{} out of range: {}", kind, raw),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::query::{CompareOp, Ident, QueryBuilder, TableRef, col};
    use anyhow::Result;

    #[tokio::test]
    async fn test_duckdb_flow() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;

        connector
            .execute(
                "CREATE TABLE users (id INTEGER, name VARCHAR, since DATE, admin BOOLEAN);
                 INSERT INTO users VALUES (1, 'ana', DATE '2019-06-01', true), (2, NULL, NULL, false);",
            )
            .await?;

        let qb = QueryBuilder::new(connector.dialect());
        let select = qb
            .table(TableRef::aliased("users", "u")?)
            .select_all_of(Ident::new("u")?)
            .where_param(col("u", "id")?, CompareOp::GtEq, 1_i64)
            .order_by(col("u", "id")?, Default::default());
        let records = connector.query(&qb.compile(&select)?).await?;

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].columns(), ["id", "name", "since", "admin"]);
        assert_eq!(records[0].get_i64("id")?, 1);
        assert_eq!(records[0].get_string("name")?, "ana");
        assert_eq!(
            records[0].get_date("since")?,
            NaiveDate::from_ymd_opt(2019, 6, 1).expect("valid date")
        );
        assert!(records[0].get_bool("admin")?);
        assert_eq!(records[1].get_opt_string("name")?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_date_parameter_round_trip() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        connector
            .execute("CREATE TABLE d (day DATE); INSERT INTO d VALUES (DATE '1969-12-31'), (DATE '2020-01-01');")
            .await?;

        let qb = QueryBuilder::new(Dialect::DuckDb);
        let select = qb
            .table(TableRef::new("d")?)
            .column(col("d", "day")?)
            .where_param(
                col("d", "day")?,
                CompareOp::Lt,
                NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date"),
            );
        let records = connector.query(&qb.compile(&select)?).await?;

        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].get_date("day")?,
            NaiveDate::from_ymd_opt(1969, 12, 31).expect("valid date")
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_duckdb_query_error() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        let result = connector.execute("SELECT * FROM non_existent_table").await;
        let err = result.expect_err("missing table must fail");
        assert!(err.is_query_error());
        assert!(!err.is_connection_error());
        Ok(())
    }

    #[tokio::test]
    async fn test_timestamp_decimal_and_float_columns() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        connector
            .execute(
                "CREATE TABLE t (id INTEGER, criado_em TIMESTAMP, custo DECIMAL(10, 2), peso DOUBLE);
                 INSERT INTO t VALUES (1, TIMESTAMP '2020-01-02 09:30:15', 12.50, 0.25);",
            )
            .await?;

        let qb = QueryBuilder::new(Dialect::DuckDb);
        let select = qb.table(TableRef::new("t")?).select_all_of(Ident::new("t")?);
        let records = connector.query(&qb.compile(&select)?).await?;

        let expected = NaiveDate::from_ymd_opt(2020, 1, 2)
            .and_then(|d| d.and_hms_opt(9, 30, 15))
            .expect("valid timestamp");
        assert_eq!(records[0].get("criado_em"), Some(&Value::Timestamp(expected)));
        assert_eq!(records[0].get("custo"), Some(&Value::Text("12.50".into())));
        assert_eq!(records[0].get("peso"), Some(&Value::Float(0.25)));
        // A timestamp column still reads as a date
        assert_eq!(
            records[0].get_date("criado_em")?,
            NaiveDate::from_ymd_opt(2020, 1, 2).expect("valid date")
        );
        Ok(())
    }

    #[test]
    fn test_extreme_date32_is_mapping_error() {
        // DuckDB encodes 'infinity'::DATE as i32::MAX days
        for days in [i32::MAX, i32::MIN] {
            let err = from_duck("data_fim", DuckValue::Date32(days))
                .err()
                .expect("out of chrono range");
            assert!(matches!(err, DomainError::RowMapping { ref column, .. } if column == "data_fim"));
        }
        assert_eq!(
            from_duck("d", DuckValue::Date32(0)).ok(),
            NaiveDate::from_ymd_opt(1970, 1, 1).map(Value::Date)
        );
    }

    #[tokio::test]
    async fn test_infinite_date_does_not_panic() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        connector
            .execute("CREATE TABLE d (day DATE); INSERT INTO d VALUES ('infinity'::DATE);")
            .await?;

        let qb = QueryBuilder::new(Dialect::DuckDb);
        let select = qb.table(TableRef::new("d")?).column(col("d", "day")?);
        let err = connector
            .query(&qb.compile(&select)?)
            .await
            .expect_err("infinity has no calendar date");
        assert!(!err.is_connection_error());
        Ok(())
    }

    #[test]
    fn test_duckdb_connection_error() {
        let result = DuckDBConnector::new("/nonexistent-dir/orgchart/db.duckdb");
        let err = OrgChartError::from(result.err().expect("open must fail"));
        assert!(err.is_connection_error());
    }
}
