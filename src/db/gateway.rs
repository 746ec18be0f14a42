//! SQL gateway: the only component that talks to MySQL.
//!
//! `SqlGateway` is the seam between the tool dispatcher and the database.
//! `MySqlGateway` is the production implementation backed by the shared pool;
//! tests substitute a recording fake.

use crate::db::params::bind_param;
use crate::db::statements;
use crate::db::types::{RowToJson, get_string_by_index};
use crate::error::{DbError, DbResult};
use crate::models::{ColumnDescription, ExecuteOutcome, QueryParam, returns_rows};
use sqlx::mysql::MySqlRow;
use sqlx::{Executor, MySqlPool};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Database operations exposed to tool callers.
///
/// Implementations never retry; every failure is returned to the caller.
pub trait SqlGateway: Send + Sync + 'static {
    /// Run a caller-supplied statement.
    ///
    /// `SELECT`/`SHOW` statements return their rows, anything else returns the
    /// affected-row count. `params` bind positionally to `?` placeholders.
    fn execute(
        &self,
        sql: &str,
        params: &[QueryParam],
    ) -> impl Future<Output = DbResult<ExecuteOutcome>> + Send;

    fn list_databases(&self) -> impl Future<Output = DbResult<Vec<String>>> + Send;

    /// Tables of `database`, or of the connection's default database.
    fn list_tables(
        &self,
        database: Option<&str>,
    ) -> impl Future<Output = DbResult<Vec<String>>> + Send;

    /// Column layout of a table, in the order MySQL reports it.
    fn describe_table(
        &self,
        table: &str,
        database: Option<&str>,
    ) -> impl Future<Output = DbResult<Vec<ColumnDescription>>> + Send;
}

/// Gateway backed by a `MySqlPool`.
///
/// Each statement checks a connection out of the pool and returns it when the
/// statement finishes, fails or times out.
#[derive(Debug, Clone)]
pub struct MySqlGateway {
    pool: MySqlPool,
    query_timeout: Duration,
}

impl MySqlGateway {
    pub fn new(pool: MySqlPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Run a statement future under the query timeout.
    async fn timed<T>(
        &self,
        operation: &str,
        fut: impl Future<Output = Result<T, sqlx::Error>>,
    ) -> DbResult<T> {
        let start = Instant::now();
        let result = tokio::time::timeout(self.query_timeout, fut).await;
        debug!(
            operation,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Statement finished"
        );
        match result {
            Ok(inner) => inner.map_err(DbError::from),
            Err(_) => Err(DbError::timeout(operation, self.query_timeout.as_secs())),
        }
    }

    /// Fetch rows for a statement text sent without parameters.
    async fn fetch_rows(&self, operation: &str, sql: &str) -> DbResult<Vec<MySqlRow>> {
        let pool = &self.pool;
        self.timed(operation, pool.fetch_all(sql)).await
    }

}

/// First column of every row, as strings.
fn first_column(operation: &str, rows: &[MySqlRow]) -> Vec<String> {
    collect_names(operation, rows.iter().map(|row| get_string_by_index(row, 0)))
}

/// Keep the decoded names; rows that did not decode are logged and skipped.
fn collect_names(operation: &str, values: impl IntoIterator<Item = Option<String>>) -> Vec<String> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(row, value)| {
            if value.is_none() {
                warn!(operation, row, "Skipping row whose name column did not decode");
            }
            value
        })
        .collect()
}

impl SqlGateway for MySqlGateway {
    async fn execute(&self, sql: &str, params: &[QueryParam]) -> DbResult<ExecuteOutcome> {
        debug!(sql = %sql, params = params.len(), "Executing statement");
        let pool = &self.pool;

        if returns_rows(sql) {
            let rows = if params.is_empty() {
                // Unprepared, so statements MySQL refuses to prepare still run.
                self.fetch_rows("execute_sql", sql).await?
            } else {
                let query = params
                    .iter()
                    .fold(sqlx::query(sql), |q, p| bind_param(q, p));
                self.timed("execute_sql", query.fetch_all(pool)).await?
            };
            let rows = rows.iter().map(|row| row.to_json_map()).collect();
            return Ok(ExecuteOutcome::Rows(rows));
        }

        let result = if params.is_empty() {
            self.timed("execute_sql", pool.execute(sql)).await?
        } else {
            let query = params
                .iter()
                .fold(sqlx::query(sql), |q, p| bind_param(q, p));
            self.timed("execute_sql", query.execute(pool)).await?
        };
        Ok(ExecuteOutcome::affected(
            result.rows_affected(),
            result.last_insert_id(),
        ))
    }

    async fn list_databases(&self) -> DbResult<Vec<String>> {
        let rows = self
            .fetch_rows("list_databases", statements::SHOW_DATABASES)
            .await?;
        Ok(first_column("list_databases", &rows))
    }

    async fn list_tables(&self, database: Option<&str>) -> DbResult<Vec<String>> {
        let sql = statements::show_tables(database)?;
        debug!(sql = %sql, "Listing tables");
        let rows = self.fetch_rows("list_tables", &sql).await?;
        // The column label embeds the database name ("Tables_in_shop"), so
        // read positionally.
        Ok(first_column("list_tables", &rows))
    }

    async fn describe_table(
        &self,
        table: &str,
        database: Option<&str>,
    ) -> DbResult<Vec<ColumnDescription>> {
        let sql = statements::describe_table(table, database)?;
        debug!(sql = %sql, "Describing table");
        let rows = self.fetch_rows("describe_table", &sql).await?;
        rows.iter().map(column_from_describe_row).collect()
    }
}

/// Map one `DESCRIBE` row (Field, Type, Null, Key, Default, Extra) by position.
fn column_from_describe_row(row: &MySqlRow) -> DbResult<ColumnDescription> {
    let name = get_string_by_index(row, 0)
        .ok_or_else(|| DbError::internal("DESCRIBE returned a row without a column name"))?;
    Ok(ColumnDescription {
        name,
        data_type: get_string_by_index(row, 1).unwrap_or_default(),
        nullable: get_string_by_index(row, 2).is_some_and(|v| v.eq_ignore_ascii_case("YES")),
        key: get_string_by_index(row, 3).unwrap_or_default(),
        default: get_string_by_index(row, 4),
        extra: get_string_by_index(row, 5).unwrap_or_default(),
    })
}
