use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row as _};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::manager::DatabaseError;
use crate::config::DatabaseConfig;

/// One result row keyed by column name.
pub type Row = Map<String, Value>;

/// The only capability repositories need: run one parameterized statement.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Runs `sql` with `params` bound positionally to `$1..$n`.
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.query("SELECT 1", &[]).await.map(|_| ())
    }
}

/// Decodes a row into a model.
pub fn from_row<T: DeserializeOwned>(row: Row) -> Result<T, DatabaseError> {
    serde_json::from_value(Value::Object(row)).map_err(|e| DatabaseError::Decode(e.to_string()))
}

/// PostgreSQL storage over a sqlx pool.
///
/// Statements run wrapped in a CTE so every row comes back as a single JSON
/// object, whatever the statement's column types.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
    query_logging: bool,
    slow_query_threshold: Duration,
}

impl PgStorage {
    pub fn new(pool: PgPool, config: &DatabaseConfig) -> Self {
        Self {
            pool,
            query_logging: config.enable_query_logging,
            slow_query_threshold: Duration::from_millis(config.slow_query_threshold_ms),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, DatabaseError> {
        if self.query_logging {
            debug!(sql, params = ?params, "query");
        }

        let wrapped = format!("WITH t AS ({}) SELECT row_to_json(t) AS row FROM t", sql);
        let mut q = sqlx::query(&wrapped);
        for p in params.iter() {
            q = bind_param(q, p);
        }

        let started = Instant::now();
        let rows = q.fetch_all(&self.pool).await?;
        let elapsed = started.elapsed();
        if elapsed >= self.slow_query_threshold {
            warn!(sql, elapsed_ms = elapsed.as_millis() as u64, "slow query");
        }

        rows.iter()
            .map(|row| match row.try_get::<Value, _>("row")? {
                Value::Object(map) => Ok(map),
                other => Err(DatabaseError::Decode(format!("expected a JSON object row, got {}", other))),
            })
            .collect()
    }
}

fn bind_param<'q>(
    q: Query<'q, Postgres, PgArguments>,
    v: &'q Value,
) -> Query<'q, Postgres, PgArguments> {
    match v {
        // NUMERIC assignment-casts to the integer, numeric and text columns alike
        Value::Null => q.bind(None::<sqlx::types::BigDecimal>),
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(sqlx::types::Json(v)),
    }
}
