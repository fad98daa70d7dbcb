//! tokio-postgres adapter.
//!
//! Implements [`Executor`] for [`tokio_postgres::Client`] and
//! [`tokio_postgres::Transaction`]. Statements are written with `?`
//! placeholders; they are renumbered to `$1, $2, ...` here, right before
//! the driver sees them. Result sets are fetched eagerly into a
//! [`BufferedCursor`].

use crate::client::{BufferedCursor, Executor};
use crate::error::{OrmError, OrmResult};
use crate::template::placeholder_offsets;
use crate::value::Value;
use bytes::BytesMut;
use std::error::Error;
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type};
use tokio_postgres::{Row, Statement};

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(v) => v.to_sql_checked(ty, out),
            Value::Int(v) => match *ty {
                Type::CHAR => i8::try_from(*v)?.to_sql_checked(ty, out),
                Type::INT2 => i16::try_from(*v)?.to_sql_checked(ty, out),
                Type::INT4 => i32::try_from(*v)?.to_sql_checked(ty, out),
                Type::OID => u32::try_from(*v)?.to_sql_checked(ty, out),
                Type::FLOAT4 => (*v as f32).to_sql_checked(ty, out),
                Type::FLOAT8 => (*v as f64).to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Float(v) => match *ty {
                Type::FLOAT4 => (*v as f32).to_sql_checked(ty, out),
                _ => v.to_sql_checked(ty, out),
            },
            Value::Text(v) => v.to_sql_checked(ty, out),
            Value::Bytes(v) => v.to_sql_checked(ty, out),
            Value::Date(v) => v.to_sql_checked(ty, out),
            Value::Timestamp(v) => v.to_sql_checked(ty, out),
            Value::TimestampTz(v) => v.to_sql_checked(ty, out),
            Value::Uuid(v) => v.to_sql_checked(ty, out),
            Value::Json(v) => v.to_sql_checked(ty, out),
        }
    }

    // NULL binds to any type; each variant checks its own pairing in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

/// Rewrite `?` placeholders (outside quotes) to `$1, $2, ...`.
pub fn numbered_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut last = 0;
    for (n, offset) in placeholder_offsets(sql).enumerate() {
        out.push_str(&sql[last..offset]);
        out.push('$');
        out.push_str(&(n + 1).to_string());
        last = offset + 1;
    }
    out.push_str(&sql[last..]);
    out
}

fn params(values: &[Value]) -> Vec<&(dyn ToSql + Sync)> {
    values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
}

fn get<'a, T: FromSql<'a>>(row: &'a Row, index: usize) -> OrmResult<Option<T>> {
    row.try_get(index)
        .map_err(|e| OrmError::decode(row.columns()[index].name(), e.to_string()))
}

/// Decode one column into a [`Value`] according to its server type.
fn decode_column(row: &Row, index: usize) -> OrmResult<Value> {
    let column = &row.columns()[index];
    let value = match *column.type_() {
        Type::BOOL => get::<bool>(row, index)?.map(Value::Bool),
        Type::CHAR => get::<i8>(row, index)?.map(|v| Value::Int(v.into())),
        Type::INT2 => get::<i16>(row, index)?.map(|v| Value::Int(v.into())),
        Type::INT4 => get::<i32>(row, index)?.map(|v| Value::Int(v.into())),
        Type::OID => get::<u32>(row, index)?.map(|v| Value::Int(v.into())),
        Type::INT8 => get::<i64>(row, index)?.map(Value::Int),
        Type::FLOAT4 => get::<f32>(row, index)?.map(|v| Value::Float(v.into())),
        Type::FLOAT8 => get::<f64>(row, index)?.map(Value::Float),
        Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME | Type::UNKNOWN => {
            get::<String>(row, index)?.map(Value::Text)
        }
        Type::BYTEA => get::<Vec<u8>>(row, index)?.map(Value::Bytes),
        Type::DATE => get::<chrono::NaiveDate>(row, index)?.map(Value::Date),
        Type::TIMESTAMP => get::<chrono::NaiveDateTime>(row, index)?.map(Value::Timestamp),
        Type::TIMESTAMPTZ => {
            get::<chrono::DateTime<chrono::Utc>>(row, index)?.map(Value::TimestampTz)
        }
        Type::UUID => get::<uuid::Uuid>(row, index)?.map(Value::Uuid),
        Type::JSON | Type::JSONB => get::<serde_json::Value>(row, index)?.map(Value::Json),
        ref other => {
            return Err(OrmError::decode(
                column.name(),
                format!("unsupported column type {other}"),
            ));
        }
    };
    Ok(value.unwrap_or(Value::Null))
}

fn to_cursor(statement: &Statement, rows: Vec<Row>) -> OrmResult<BufferedCursor> {
    let columns: Vec<String> = statement
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    let mut decoded = Vec::with_capacity(rows.len());
    for row in &rows {
        let values = (0..row.len())
            .map(|i| decode_column(row, i))
            .collect::<OrmResult<Vec<_>>>()?;
        decoded.push(values);
    }
    Ok(BufferedCursor::new(columns, decoded))
}

impl Executor for tokio_postgres::Client {
    type Cursor = BufferedCursor;

    async fn execute(&self, sql: &str, values: &[Value]) -> OrmResult<u64> {
        let sql = numbered_placeholders(sql);
        Ok(tokio_postgres::Client::execute(self, sql.as_str(), &params(values)).await?)
    }

    async fn query(&self, sql: &str, values: &[Value]) -> OrmResult<BufferedCursor> {
        let statement = self.prepare(&numbered_placeholders(sql)).await?;
        let rows = tokio_postgres::Client::query(self, &statement, &params(values)).await?;
        to_cursor(&statement, rows)
    }
}

impl Executor for tokio_postgres::Transaction<'_> {
    type Cursor = BufferedCursor;

    async fn execute(&self, sql: &str, values: &[Value]) -> OrmResult<u64> {
        let sql = numbered_placeholders(sql);
        Ok(tokio_postgres::Transaction::execute(self, sql.as_str(), &params(values)).await?)
    }

    async fn query(&self, sql: &str, values: &[Value]) -> OrmResult<BufferedCursor> {
        let statement = self.prepare(&numbered_placeholders(sql)).await?;
        let rows = tokio_postgres::Transaction::query(self, &statement, &params(values)).await?;
        to_cursor(&statement, rows)
    }
}
