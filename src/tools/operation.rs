//! Tool catalog.
//!
//! The set of operations is closed. Each operation has an argument record
//! whose JSON Schema is advertised in `tools/list`; `ToolRequest` is the
//! validated form handed to the dispatcher.

use crate::error::DbError;
use crate::models::QueryParam;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

/// Arguments of `execute_sql`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExecuteSqlArgs {
    /// SQL statement to execute. SELECT and SHOW return rows; other statements return the affected row count.
    pub sql: String,
    /// Positional parameters for `?` placeholders
    #[serde(default)]
    pub params: Option<Vec<JsonValue>>,
}

/// Arguments of `list_databases`. Takes none.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListDatabasesArgs {}

/// Arguments of `list_tables`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListTablesArgs {
    /// Database to list. Defaults to the server's configured database.
    #[serde(default)]
    pub database: Option<String>,
}

/// Arguments of `describe_table`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeTableArgs {
    /// Table name
    pub table: String,
    /// Database containing the table. Defaults to the server's configured database.
    #[serde(default)]
    pub database: Option<String>,
}

/// An operation exposed as an MCP tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ExecuteSql,
    ListDatabases,
    ListTables,
    DescribeTable,
}

impl Operation {
    /// All operations, in catalog order.
    pub const ALL: [Operation; 4] = [
        Operation::ExecuteSql,
        Operation::ListDatabases,
        Operation::ListTables,
        Operation::DescribeTable,
    ];

    /// Tool name as seen by MCP clients.
    pub fn name(self) -> &'static str {
        match self {
            Self::ExecuteSql => "execute_sql",
            Self::ListDatabases => "list_databases",
            Self::ListTables => "list_tables",
            Self::DescribeTable => "describe_table",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::ExecuteSql => {
                "Execute a SQL statement and return the result. SELECT and SHOW return rows as JSON objects; \
                 INSERT, UPDATE, DELETE and DDL return affected_rows and last_insert_id. \
                 Use ? placeholders with params for values."
            }
            Self::ListDatabases => "List all databases visible to the configured MySQL user.",
            Self::ListTables => {
                "List the tables in a database. Omit database to use the server's default database."
            }
            Self::DescribeTable => {
                "Describe a table's columns: name, type, nullable, key, default and extra, in table order."
            }
        }
    }

    /// JSON Schema of the operation's arguments.
    pub fn input_schema(self) -> serde_json::Map<String, JsonValue> {
        let schema = match self {
            Self::ExecuteSql => schemars::schema_for!(ExecuteSqlArgs),
            Self::ListDatabases => schemars::schema_for!(ListDatabasesArgs),
            Self::ListTables => schemars::schema_for!(ListTablesArgs),
            Self::DescribeTable => schemars::schema_for!(DescribeTableArgs),
        };
        match serde_json::to_value(schema) {
            Ok(JsonValue::Object(map)) => map,
            _ => {
                let mut map = serde_json::Map::new();
                map.insert("type".to_string(), JsonValue::String("object".to_string()));
                map
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = DbError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "execute_sql" | "query_database" => Ok(Self::ExecuteSql),
            "list_databases" => Ok(Self::ListDatabases),
            "list_tables" => Ok(Self::ListTables),
            "describe_table" => Ok(Self::DescribeTable),
            other => Err(DbError::unknown_operation(other)),
        }
    }
}

/// A request whose arguments passed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    ExecuteSql {
        sql: String,
        params: Vec<QueryParam>,
    },
    ListDatabases,
    ListTables {
        database: Option<String>,
    },
    DescribeTable {
        table: String,
        database: Option<String>,
    },
}

impl ToolRequest {
    pub fn operation(&self) -> Operation {
        match self {
            Self::ExecuteSql { .. } => Operation::ExecuteSql,
            Self::ListDatabases => Operation::ListDatabases,
            Self::ListTables { .. } => Operation::ListTables,
            Self::DescribeTable { .. } => Operation::DescribeTable,
        }
    }
}
