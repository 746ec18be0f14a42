//! Data models for the MySQL MCP Server.

pub mod query;
pub mod schema;

pub use query::{ExecuteOutcome, QueryParam, Row, returns_rows};
pub use schema::ColumnDescription;
