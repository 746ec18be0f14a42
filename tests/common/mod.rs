//! Shared test fixtures: a gateway that records calls instead of talking to MySQL.

#![allow(dead_code)]

use mysql_mcp_server::db::SqlGateway;
use mysql_mcp_server::db::statements;
use mysql_mcp_server::error::{DbError, DbResult};
use mysql_mcp_server::models::{ColumnDescription, ExecuteOutcome, QueryParam, Row, returns_rows};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One gateway call, with the statement text it would have sent.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Execute { sql: String, params: Vec<QueryParam> },
    ListDatabases,
    ListTables { statement: String },
    DescribeTable { statement: String },
}

#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<Call>>,
    failures: Mutex<VecDeque<DbError>>,
    tables: Mutex<Vec<String>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: &[&str]) -> Self {
        let gateway = Self::new();
        *gateway.tables.lock().unwrap() = tables.iter().map(|t| t.to_string()).collect();
        gateway
    }

    /// Make the next gateway call fail with `error`.
    pub fn fail_next(&self, error: DbError) {
        self.failures.lock().unwrap().push_back(error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> DbResult<()> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl SqlGateway for RecordingGateway {
    async fn execute(&self, sql: &str, params: &[QueryParam]) -> DbResult<ExecuteOutcome> {
        self.record(Call::Execute {
            sql: sql.to_string(),
            params: params.to_vec(),
        })?;
        if returns_rows(sql) {
            let mut row = Row::new();
            row.insert("1".to_string(), json!(1));
            Ok(ExecuteOutcome::Rows(vec![row]))
        } else {
            Ok(ExecuteOutcome::affected(1, 0))
        }
    }

    async fn list_databases(&self) -> DbResult<Vec<String>> {
        self.record(Call::ListDatabases)?;
        Ok(vec!["information_schema".to_string(), "shop".to_string()])
    }

    async fn list_tables(&self, database: Option<&str>) -> DbResult<Vec<String>> {
        let statement = statements::show_tables(database)?;
        self.record(Call::ListTables { statement })?;
        Ok(self.tables.lock().unwrap().clone())
    }

    async fn describe_table(
        &self,
        table: &str,
        database: Option<&str>,
    ) -> DbResult<Vec<ColumnDescription>> {
        let statement = statements::describe_table(table, database)?;
        self.record(Call::DescribeTable { statement })?;
        Ok(vec![
            ColumnDescription::new("id", "int", false)
                .with_key("PRI")
                .with_extra("auto_increment"),
            ColumnDescription::new("email", "varchar(255)", true),
        ])
    }
}
