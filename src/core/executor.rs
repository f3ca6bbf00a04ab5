//! Execution gateway: runs one raw statement against the relational store.

use crate::core::error::{ChatError, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Row, TypeInfo};
use tracing::info;

/// One result row, keyed by column name.
pub type Record = Map<String, Value>;

#[async_trait]
pub trait ExecutionGateway: Send + Sync {
    /// Execute `statement` verbatim and return every row it produced, in
    /// order. Statements that produce no rows return an empty vector.
    async fn execute(&self, statement: &str) -> Result<Vec<Record>>;
}

/// PostgreSQL gateway. Statements go over the simple query protocol, so the
/// text is sent to the server exactly as given.
#[derive(Clone, Debug)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| ChatError::Config(format!("Database connection failed: {}", e)))?;
        info!(max_connections, "database pool ready");
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ExecutionGateway for PgGateway {
    async fn execute(&self, statement: &str) -> Result<Vec<Record>> {
        let rows = sqlx::raw_sql(statement).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_record).collect()
    }
}

fn row_to_record(row: &PgRow) -> Result<Record> {
    let mut record = Record::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name())?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

fn decode_column(row: &PgRow, idx: usize, type_name: &str) -> Result<Value> {
    let value = match type_name {
        "BOOL" => row.try_get::<Option<bool>, _>(idx)?.map(Value::from),
        "INT2" => row.try_get::<Option<i16>, _>(idx)?.map(Value::from),
        "INT4" => row.try_get::<Option<i32>, _>(idx)?.map(Value::from),
        "INT8" => row.try_get::<Option<i64>, _>(idx)?.map(Value::from),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(idx)?
            .map(|v| Value::from(f64::from(v))),
        "FLOAT8" => row.try_get::<Option<f64>, _>(idx)?.map(Value::from),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(idx)?,
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(idx)?
            .map(|v| Value::from(v.to_rfc3339())),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(idx)?
            .map(|v| Value::from(v.to_string())),
        // Text, varchar, numeric, uuid, bytea...: keep the server's text form.
        _ => row
            .try_get_unchecked::<Option<String>, _>(idx)?
            .map(Value::from),
    };
    Ok(value.unwrap_or(Value::Null))
}
