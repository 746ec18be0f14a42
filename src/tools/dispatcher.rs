//! Tool dispatch.
//!
//! A call moves through `received -> validated -> executed -> responded`;
//! any step can divert it to an error result. The dispatcher never lets a
//! failure escape as anything other than a `ToolResult`.

use crate::db::SqlGateway;
use crate::error::{DbError, DbResult};
use crate::models::ExecuteOutcome;
use crate::tools::operation::{Operation, ToolRequest};
use crate::tools::validator::validate;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Outcome of one dispatched call.
#[derive(Debug)]
pub enum ToolResult {
    /// Pretty-printed JSON with sorted keys
    Success { payload: String },
    Error { error: DbError },
}

impl ToolResult {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Text returned to the caller.
    pub fn text(&self) -> String {
        match self {
            Self::Success { payload } => payload.clone(),
            Self::Error { error } => match error.suggestion() {
                Some(suggestion) => format!("Error: {}\nSuggestion: {}", error, suggestion),
                None => format!("Error: {}", error),
            },
        }
    }
}

impl From<DbResult<String>> for ToolResult {
    fn from(result: DbResult<String>) -> Self {
        match result {
            Ok(payload) => Self::Success { payload },
            Err(error) => Self::Error { error },
        }
    }
}

/// Routes tool calls to the gateway.
pub struct ToolDispatcher<G> {
    gateway: Arc<G>,
}

impl<G> Clone for ToolDispatcher<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<G: SqlGateway> ToolDispatcher<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Dispatch a call by tool name. `arguments` of `None` is treated as `{}`.
    pub async fn dispatch(&self, name: &str, arguments: Option<&Map<String, JsonValue>>) -> ToolResult {
        let start = Instant::now();
        let empty = Map::new();
        let args = arguments.unwrap_or(&empty);

        let result = match name.parse::<Operation>() {
            Ok(operation) => match validate(operation, args) {
                Ok(request) => self.run(request).await,
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(payload) => info!(
                operation = name,
                elapsed_ms,
                payload_bytes = payload.len(),
                "Tool call succeeded"
            ),
            Err(e) if e.is_caller_error() => info!(
                operation = name,
                elapsed_ms,
                kind = e.kind(),
                error = %e,
                "Tool call rejected"
            ),
            Err(e) => warn!(
                operation = name,
                elapsed_ms,
                kind = e.kind(),
                error = %e,
                "Tool call failed"
            ),
        }

        result.into()
    }

    /// Execute a validated request and serialize its result.
    async fn run(&self, request: ToolRequest) -> DbResult<String> {
        debug!(operation = %request.operation(), "Dispatching");
        match request {
            ToolRequest::ExecuteSql { sql, params } => {
                let outcome = self.gateway.execute(&sql, &params).await?;
                match &outcome {
                    ExecuteOutcome::Rows(_) => {
                        debug!(rows = outcome.row_count(), "execute_sql returned rows")
                    }
                    ExecuteOutcome::Affected { .. } => {
                        debug!(affected_rows = outcome.row_count(), "execute_sql affected rows")
                    }
                }
                to_payload(&outcome)
            }
            ToolRequest::ListDatabases => {
                let databases = self.gateway.list_databases().await?;
                to_payload(&databases)
            }
            ToolRequest::ListTables { database } => {
                let tables = self.gateway.list_tables(database.as_deref()).await?;
                to_payload(&tables)
            }
            ToolRequest::DescribeTable { table, database } => {
                let columns = self
                    .gateway
                    .describe_table(&table, database.as_deref())
                    .await?;
                to_payload(&columns)
            }
        }
    }
}

/// Serialize to pretty JSON. Going through `Value` sorts object keys.
pub fn to_payload<T: Serialize>(value: &T) -> DbResult<String> {
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_string_pretty(&value)?)
}
