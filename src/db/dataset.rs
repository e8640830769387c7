//! In-memory SQLite store for the Superstore dataset.
//!
//! The relation is loaded once and the connection is then switched to
//! `query_only`, so every later statement is a read.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Executor, Row as SqlxRow, TypeInfo, ValueRef};
use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::loader::{read_csv, OrderLine};
use super::schema::{create_table_sql, insert_sql};
use super::types::{ColumnInfo, QueryResult, Row, Value};
use crate::error::{InsightError, Result};
use crate::safety::guard_read_only;

/// Query timeout in seconds.
const QUERY_TIMEOUT_SECS: u64 = 30;

/// Maximum rows to return from a query.
pub const MAX_ROWS: usize = 1000;

/// The loaded dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    pool: SqlitePool,
    row_count: usize,
}

impl Dataset {
    /// Reads the CSV at `path` and loads it into a fresh in-memory store.
    pub async fn load(path: &Path) -> Result<Self> {
        let records = read_csv(path).await?;
        info!(path = %path.display(), rows = records.len(), "Loaded dataset");
        Self::from_records(&records).await
    }

    /// Builds the store from already-parsed order lines.
    pub async fn from_records(records: &[OrderLine]) -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| InsightError::internal(format!("Invalid SQLite options: {e}")))?;

        // An in-memory database lives exactly as long as its connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| InsightError::internal(format!("Failed to open SQLite: {e}")))?;

        sqlx::query(&create_table_sql())
            .execute(&pool)
            .await
            .map_err(|e| InsightError::dataset(format!("Failed to create table: {e}")))?;

        insert_records(&pool, records).await?;

        sqlx::query("PRAGMA query_only = ON")
            .execute(&pool)
            .await
            .map_err(|e| InsightError::internal(format!("Failed to lock dataset: {e}")))?;

        debug!(rows = records.len(), "Dataset store ready");

        Ok(Self {
            pool,
            row_count: records.len(),
        })
    }

    /// Number of order lines in the store.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Executes a read-only SQL statement.
    pub async fn execute(&self, sql: &str) -> Result<QueryResult> {
        if sql.trim().is_empty() {
            return Err(InsightError::query("Empty SQL statement"));
        }

        guard_read_only(sql)?;

        let start = Instant::now();

        let result = tokio::time::timeout(
            Duration::from_secs(QUERY_TIMEOUT_SECS),
            sqlx::query(sql).fetch_all(&self.pool),
        )
        .await
        .map_err(|_| {
            InsightError::query(format!(
                "Query timed out after {QUERY_TIMEOUT_SECS} seconds"
            ))
        })?
        .map_err(|e| InsightError::query(format_query_error(e)))?;

        let elapsed = start.elapsed();

        let columns: Vec<ColumnInfo> = match result.first() {
            Some(first_row) => first_row
                .columns()
                .iter()
                .enumerate()
                .map(|(i, col)| ColumnInfo::new(col.name(), column_type(first_row, i)))
                .collect(),
            None => self.describe_columns(sql).await,
        };

        let rows: Vec<Row> = result.iter().map(convert_row).collect();
        let result = QueryResult::with_data(columns, rows)
            .with_elapsed(elapsed)
            .truncate_to(MAX_ROWS);

        if let Some(total_rows) = result.truncated_from {
            warn!(total_rows, max_rows = MAX_ROWS, "Truncating query result");
        }

        debug!(
            sql_len = sql.len(),
            row_count = result.row_count,
            elapsed_ms = elapsed.as_millis() as u64,
            "Query executed"
        );

        Ok(result)
    }

    /// Column metadata for a statement that returned no rows.
    async fn describe_columns(&self, sql: &str) -> Vec<ColumnInfo> {
        match (&self.pool).describe(sql).await {
            Ok(description) => description
                .columns()
                .iter()
                .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                .collect(),
            Err(e) => {
                debug!(error = %e, "Could not describe empty result");
                Vec::new()
            }
        }
    }
}

async fn insert_records(pool: &SqlitePool, records: &[OrderLine]) -> Result<()> {
    let insert = insert_sql();
    let load_error = |e: sqlx::Error| InsightError::dataset(format!("Failed to load rows: {e}"));

    let mut tx = pool.begin().await.map_err(load_error)?;

    for line in records {
        sqlx::query(&insert)
            .bind(line.row_id)
            .bind(line.order_id.as_str())
            .bind(line.order_date.format("%Y-%m-%d").to_string())
            .bind(line.ship_date.format("%Y-%m-%d").to_string())
            .bind(line.ship_mode.as_str())
            .bind(line.customer_id.as_str())
            .bind(line.customer_name.as_str())
            .bind(line.segment.as_str())
            .bind(line.country.as_str())
            .bind(line.city.as_str())
            .bind(line.state.as_str())
            .bind(line.postal_code.as_deref())
            .bind(line.region.as_str())
            .bind(line.product_id.as_str())
            .bind(line.category.as_str())
            .bind(line.sub_category.as_str())
            .bind(line.product_name.as_str())
            .bind(line.sales)
            .bind(line.quantity)
            .bind(line.discount)
            .bind(line.profit)
            .execute(&mut *tx)
            .await
            .map_err(load_error)?;
    }

    tx.commit().await.map_err(load_error)
}

/// Formats an engine error for display, keeping the database message.
fn format_query_error(e: sqlx::Error) -> String {
    match e {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        other => other.to_string(),
    }
}

/// Type name for a result column.
///
/// Expression columns carry no declared type in SQLite, so the storage class
/// of the first row's value is used instead.
fn column_type(row: &SqliteRow, index: usize) -> String {
    let declared = row.columns()[index].type_info().name().to_string();
    if declared != "NULL" {
        return declared;
    }
    row.try_get_raw(index)
        .map(|value| value.type_info().name().to_string())
        .unwrap_or(declared)
}

/// Converts a SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    (0..row.columns().len())
        .map(|i| convert_value(row, i))
        .collect()
}

/// Converts a single value using its runtime storage class.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let type_name = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null,
    };

    match type_name.as_str() {
        "BOOLEAN" => row
            .try_get::<bool, _>(index)
            .map(Value::Bool)
            .unwrap_or(Value::Null),
        "INTEGER" => row
            .try_get::<i64, _>(index)
            .map(Value::Int)
            .unwrap_or(Value::Null),
        "REAL" => row
            .try_get::<f64, _>(index)
            .map(Value::Float)
            .unwrap_or(Value::Null),
        "BLOB" => row
            .try_get::<Vec<u8>, _>(index)
            .map(Value::Bytes)
            .unwrap_or(Value::Null),
        _ => row
            .try_get::<String, _>(index)
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}
