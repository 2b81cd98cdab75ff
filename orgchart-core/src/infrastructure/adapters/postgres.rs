// orgchart-core/src/infrastructure/adapters/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::error::Error;
use std::time::Duration;
use tokio_postgres::types::{FromSql, Kind, ToSql, Type};
use tokio_postgres::{Client, Config, NoTls, Row};
use tracing::{debug, error};

use crate::domain::error::DomainError;
use crate::domain::query::{CompiledQuery, Dialect, Ident, Value};
use crate::error::OrgChartError;
use crate::infrastructure::config::PostgresSettings;
use crate::infrastructure::error::DatabaseError;
use crate::ports::connector::{Connector, Record};

const ENGINE: &str = "postgres";
const APPLICATION_NAME: &str = "orgchart";

type PgParam = Box<dyn ToSql + Sync + Send>;

pub struct PostgresConnector {
    client: Client,
}

/// Build a tokio_postgres Config from PostgresSettings.
pub fn config_build(settings: &PostgresSettings) -> Config {
    let mut config = Config::new();
    config
        .host(&settings.host)
        .port(settings.port)
        .user(&settings.username)
        .dbname(&settings.database)
        .application_name(APPLICATION_NAME);
    if let Some(ref password) = settings.password {
        config.password(password);
    }
    if let Some(secs) = settings.connect_timeout_secs {
        config.connect_timeout(Duration::from_secs(secs));
    }
    config
}

/// `SET search_path TO "a", "b"`, or None when no schema is configured.
pub fn search_path_statement(schemas: &[String]) -> Result<Option<String>, DomainError> {
    if schemas.is_empty() {
        return Ok(None);
    }
    let idents = schemas
        .iter()
        .map(|s| Ident::new(s.trim()).map(|i| i.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(format!("SET search_path TO {}", idents.join(", "))))
}

impl PostgresConnector {
    /// Connects and spawns a background task to drive the connection.
    pub async fn connect(settings: &PostgresSettings) -> Result<Self, OrgChartError> {
        let search_path = search_path_statement(&settings.schema)?;

        let (client, connection) = config_build(settings)
            .connect(NoTls)
            .await
            .map_err(|e| DatabaseError::connection(ENGINE, e))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("postgres connection error: {e}");
            }
        });
        debug!(host = %settings.host, port = settings.port, database = %settings.database, "Postgres connection established");

        if let Some(stmt) = search_path {
            client
                .batch_execute(&stmt)
                .await
                .map_err(|e| DatabaseError::query(ENGINE, e))?;
        }

        Ok(Self { client })
    }
}

#[async_trait]
impl Connector for PostgresConnector {
    async fn execute(&self, sql: &str) -> Result<(), OrgChartError> {
        self.client
            .batch_execute(sql)
            .await
            .map_err(|e| classify(e).into())
    }

    async fn query(&self, query: &CompiledQuery) -> Result<Vec<Record>, OrgChartError> {
        let stmt = self
            .client
            .prepare(&query.sql)
            .await
            .map_err(classify)?;

        // Bind each value with the Rust type matching the inferred parameter type
        let params = query
            .params
            .iter()
            .zip(stmt.params())
            .enumerate()
            .map(|(i, (value, ty))| to_pg(i + 1, value, ty))
            .collect::<Result<Vec<PgParam>, DomainError>>()?;
        let refs: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|p| &**p as &(dyn ToSql + Sync))
            .collect();

        let rows = self
            .client
            .query(&stmt, &refs)
            .await
            .map_err(classify)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(to_record(row)?);
        }
        Ok(records)
    }

    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn engine_name(&self) -> &str {
        ENGINE
    }
}

/// A closed connection mid-session is a connectivity failure; anything the
/// server answered is a query failure.
fn classify(e: tokio_postgres::Error) -> DatabaseError {
    if e.is_closed() {
        DatabaseError::connection(ENGINE, e)
    } else {
        DatabaseError::query(ENGINE, e)
    }
}

fn to_pg(index: usize, value: &Value, ty: &Type) -> Result<PgParam, DomainError> {
    let narrow = |target: &str| DomainError::RowMapping {
        column: format!("${}", index),
        reason: format!("value {} does not fit in {}", value, target),
    };

    let param: PgParam = match (value, ty) {
        (Value::Null, &Type::BOOL) => Box::new(None::<bool>),
        (Value::Null, &Type::INT2) => Box::new(None::<i16>),
        (Value::Null, &Type::INT4) => Box::new(None::<i32>),
        (Value::Null, &Type::INT8) => Box::new(None::<i64>),
        (Value::Null, &Type::FLOAT4) => Box::new(None::<f32>),
        (Value::Null, &Type::FLOAT8) => Box::new(None::<f64>),
        (Value::Null, &Type::DATE) => Box::new(None::<NaiveDate>),
        (Value::Null, &Type::TIMESTAMP) => Box::new(None::<NaiveDateTime>),
        (Value::Null, &Type::TIMESTAMPTZ) => Box::new(None::<DateTime<Utc>>),
        (Value::Null, _) => Box::new(None::<String>),
        (Value::Int(i), &Type::INT2) => Box::new(i16::try_from(*i).map_err(|_| narrow("int2"))?),
        (Value::Int(i), &Type::INT4) => Box::new(i32::try_from(*i).map_err(|_| narrow("int4"))?),
        (Value::Int(i), _) => Box::new(*i),
        (Value::Float(x), &Type::FLOAT4) => Box::new(*x as f32),
        (Value::Float(x), _) => Box::new(*x),
        (Value::Bool(b), _) => Box::new(*b),
        (Value::Text(s), _) => Box::new(s.clone()),
        (Value::Date(d), _) => Box::new(*d),
        (Value::Timestamp(t), &Type::TIMESTAMPTZ) => Box::new(t.and_utc()),
        (Value::Timestamp(t), _) => Box::new(*t),
    };
    Ok(param)
}

fn to_record(row: &Row) -> Result<Record, OrgChartError> {
    let mut columns = Vec::with_capacity(row.columns().len());
    let mut values = Vec::with_capacity(row.columns().len());

    for (idx, column) in row.columns().iter().enumerate() {
        let name = column.name();
        let value = match *column.type_() {
            Type::BOOL => row.try_get::<_, Option<bool>>(idx).map(|v| v.map(Value::Bool)),
            Type::INT2 => row
                .try_get::<_, Option<i16>>(idx)
                .map(|v| v.map(|i| Value::Int(i64::from(i)))),
            Type::INT4 => row
                .try_get::<_, Option<i32>>(idx)
                .map(|v| v.map(|i| Value::Int(i64::from(i)))),
            Type::INT8 => row.try_get::<_, Option<i64>>(idx).map(|v| v.map(Value::Int)),
            Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME => {
                row.try_get::<_, Option<String>>(idx).map(|v| v.map(Value::Text))
            }
            Type::FLOAT4 => row
                .try_get::<_, Option<f32>>(idx)
                .map(|v| v.map(|x| Value::Float(f64::from(x)))),
            Type::FLOAT8 => row.try_get::<_, Option<f64>>(idx).map(|v| v.map(Value::Float)),
            Type::DATE => row
                .try_get::<_, Option<NaiveDate>>(idx)
                .map(|v| v.map(Value::Date)),
            Type::TIMESTAMP => row
                .try_get::<_, Option<NaiveDateTime>>(idx)
                .map(|v| v.map(Value::Timestamp)),
            Type::TIMESTAMPTZ => row
                .try_get::<_, Option<DateTime<Utc>>>(idx)
                .map(|v| v.map(|t| Value::Timestamp(t.naive_utc()))),
            Type::NUMERIC => row
                .try_get::<_, Option<NumericText>>(idx)
                .map(|v| v.map(|n| Value::Text(n.0))),
            ref other if PlainText::accepts(other) => row
                .try_get::<_, Option<PlainText>>(idx)
                .map(|v| v.map(|t| Value::Text(t.0))),
            ref other => {
                return Err(DomainError::RowMapping {
                    column: name.to_string(),
                    reason: format!("unsupported Postgres type: {}", other),
                }
                .into());
            }
        }
        .map_err(|e| DomainError::RowMapping {
            column: name.to_string(),
            reason: e.to_string(),
        })?;

        columns.push(name.to_string());
        values.push(value.unwrap_or(Value::Null));
    }

    Ok(Record::new(columns, values))
}

/// NUMERIC rendered as its exact decimal text. The wire format is base
/// 10000 digits with a weight (position of the first digit group) and a
/// display scale.
struct NumericText(String);

const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

impl<'a> FromSql<'a> for NumericText {
    fn from_sql(_: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        decode_numeric(raw).map(NumericText)
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::NUMERIC
    }
}

fn decode_numeric(raw: &[u8]) -> Result<String, Box<dyn Error + Sync + Send>> {
    let word = |i: usize| -> Result<u16, Box<dyn Error + Sync + Send>> {
        raw.get(i..i + 2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]))
            .ok_or_else(|| "truncated numeric".into())
    };

    let ndigits = usize::from(word(0)?);
    let weight = i32::from(word(2)? as i16);
    let sign = word(4)?;
    let dscale = usize::from(word(6)?);
    let digits = (0..ndigits)
        .map(|i| word(8 + 2 * i))
        .collect::<Result<Vec<_>, _>>()?;

    match sign {
        NUMERIC_NAN => return Ok("NaN".to_string()),
        NUMERIC_PINF => return Ok("Infinity".to_string()),
        NUMERIC_NINF => return Ok("-Infinity".to_string()),
        _ => {}
    }

    // Digit group at index i sits at base-10000 position (weight - i)
    let group = |i: i32| -> u16 {
        usize::try_from(i)
            .ok()
            .and_then(|i| digits.get(i).copied())
            .unwrap_or(0)
    };

    let mut out = String::new();
    if sign == NUMERIC_NEG {
        out.push('-');
    }
    if weight < 0 {
        out.push('0');
    } else {
        out.push_str(&group(0).to_string());
        for i in 1..=weight {
            out.push_str(&format!("{:04}", group(i)));
        }
    }
    if dscale > 0 {
        let mut frac = String::new();
        let mut i = weight + 1;
        while frac.len() < dscale {
            frac.push_str(&format!("{:04}", group(i)));
            i += 1;
        }
        frac.truncate(dscale);
        out.push('.');
        out.push_str(&frac);
    }
    Ok(out)
}

/// Types whose binary wire format is UTF-8 text: enums, json, xml.
struct PlainText(String);

impl<'a> FromSql<'a> for PlainText {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        // jsonb carries a one-byte format version ahead of the text
        let body = if *ty == Type::JSONB {
            raw.get(1..).ok_or("empty jsonb")?
        } else {
            raw
        };
        Ok(PlainText(std::str::from_utf8(body)?.to_string()))
    }

    fn accepts(ty: &Type) -> bool {
        matches!(*ty, Type::JSON | Type::JSONB | Type::XML) || matches!(ty.kind(), Kind::Enum(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use bytes::BytesMut;
    use tokio_postgres::types::IsNull;

    fn original_settings() -> PostgresSettings {
        PostgresSettings {
            host: "localhost".into(),
            port: 5432,
            database: "siamweb".into(),
            username: "dart".into(),
            password: Some("dart".into()),
            charset: "utf8".into(),
            schema: vec!["public".into()],
            connect_timeout_secs: Some(3),
        }
    }

    #[test]
    fn test_config_build() {
        let config = config_build(&original_settings());
        assert_eq!(config.get_user(), Some("dart"));
        assert_eq!(config.get_dbname(), Some("siamweb"));
        assert_eq!(config.get_ports(), &[5432]);
        assert_eq!(config.get_password(), Some(&b"dart"[..]));
        assert_eq!(config.get_application_name(), Some(APPLICATION_NAME));
        assert_eq!(config.get_connect_timeout(), Some(&Duration::from_secs(3)));
    }

    #[test]
    fn test_search_path_statement() -> Result<()> {
        assert_eq!(search_path_statement(&[])?, None);
        assert_eq!(
            search_path_statement(&["public".into(), "org".into()])?.as_deref(),
            Some(r#"SET search_path TO "public", "org""#)
        );
        assert!(search_path_statement(&["public; DROP".into()]).is_err());
        Ok(())
    }

    #[test]
    fn test_int_param_narrowing() {
        assert!(to_pg(1, &Value::Int(1068), &Type::INT4).is_ok());
        let err = to_pg(1, &Value::Int(i64::MAX), &Type::INT4).err().expect("overflow");
        assert!(err.to_string().contains("$1"));
    }

    #[test]
    fn test_null_params_are_typed_for_the_placeholder() {
        for ty in [Type::INT4, Type::INT8, Type::DATE, Type::TEXT, Type::TIMESTAMP] {
            let param = to_pg(1, &Value::Null, &ty).unwrap();
            let mut buf = BytesMut::new();
            let is_null = param.to_sql_checked(&ty, &mut buf).unwrap();
            assert!(matches!(is_null, IsNull::Yes), "{ty}");
        }
        // An untyped NULL falls back to text, which int4 rejects
        let text_null = to_pg(1, &Value::Null, &Type::TEXT).unwrap();
        assert!(text_null.to_sql_checked(&Type::INT4, &mut BytesMut::new()).is_err());
    }

    #[test]
    fn test_timestamp_and_float_params() {
        let t = NaiveDate::from_ymd_opt(2020, 1, 2)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .expect("valid timestamp");
        for ty in [Type::TIMESTAMP, Type::TIMESTAMPTZ] {
            let param = to_pg(1, &Value::Timestamp(t), &ty).unwrap();
            assert!(param.to_sql_checked(&ty, &mut BytesMut::new()).is_ok());
        }
        let param = to_pg(1, &Value::Float(0.5), &Type::FLOAT4).unwrap();
        assert!(param.to_sql_checked(&Type::FLOAT4, &mut BytesMut::new()).is_ok());
    }

    fn numeric_wire(weight: i16, sign: u16, dscale: u16, digits: &[u16]) -> Vec<u8> {
        let mut raw = Vec::new();
        raw.extend((digits.len() as u16).to_be_bytes());
        raw.extend(weight.to_be_bytes());
        raw.extend(sign.to_be_bytes());
        raw.extend(dscale.to_be_bytes());
        for d in digits {
            raw.extend(d.to_be_bytes());
        }
        raw
    }

    #[test]
    fn test_decode_numeric() {
        let cases = [
            (numeric_wire(0, 0, 2, &[12, 5000]), "12.50"),
            (numeric_wire(1, NUMERIC_NEG, 0, &[1, 2345]), "-12345"),
            (numeric_wire(-1, 0, 2, &[500]), "0.05"),
            (numeric_wire(-2, 0, 5, &[5000]), "0.00005"),
            (numeric_wire(0, 0, 0, &[]), "0"),
            (numeric_wire(0, NUMERIC_NAN, 0, &[]), "NaN"),
        ];
        for (raw, expected) in cases {
            assert_eq!(decode_numeric(&raw).unwrap(), expected);
        }
        assert!(decode_numeric(&[0, 1]).is_err());
    }

    #[test]
    fn test_plain_text_types() {
        assert!(PlainText::accepts(&Type::JSONB));
        assert!(!PlainText::accepts(&Type::BYTEA));
        let doc = PlainText::from_sql(&Type::JSONB, b"\x01{\"a\":1}").unwrap();
        assert_eq!(doc.0, r#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        let mut settings = original_settings();
        // Port 1 on loopback: nothing listens there
        settings.host = "127.0.0.1".into();
        settings.port = 1;
        settings.connect_timeout_secs = Some(2);

        let err = PostgresConnector::connect(&settings)
            .await
            .err()
            .expect("connect must fail");
        assert!(err.is_connection_error());
    }
}
