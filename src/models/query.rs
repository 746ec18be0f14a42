//! Query-related data models.
//!
//! This module defines the parameter and result types of `execute_sql`.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A single result row, keyed by column label.
pub type Row = serde_json::Map<String, JsonValue>;

/// A positional parameter for a prepared statement.
///
/// Callers send plain JSON values; the variant is picked from the JSON type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryParam {
    /// NULL value
    Null,
    Bool(bool),
    /// Integer value (stored as i64 for maximum range)
    Int(i64),
    Float(f64),
    String(String),
    /// Arrays and objects, bound as a JSON document
    Json(JsonValue),
}

impl QueryParam {
    /// Get the type name of this parameter for debugging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Json(_) => "json",
        }
    }
}

impl From<JsonValue> for QueryParam {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                // u64 beyond i64::MAX and fractional numbers
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            JsonValue::String(s) => Self::String(s),
            other @ (JsonValue::Array(_) | JsonValue::Object(_)) => Self::Json(other),
        }
    }
}

/// Outcome of an `execute_sql` statement.
///
/// Row-returning statements (`SELECT`, `SHOW`) yield `Rows`; everything else
/// yields `Affected`. Serialized untagged so the payload is either a JSON
/// array of row objects or an `{affected_rows, last_insert_id}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecuteOutcome {
    Rows(Vec<Row>),
    Affected {
        affected_rows: u64,
        last_insert_id: u64,
    },
}

impl ExecuteOutcome {
    pub fn affected(affected_rows: u64, last_insert_id: u64) -> Self {
        Self::Affected {
            affected_rows,
            last_insert_id,
        }
    }

    /// Number of rows returned or affected, for logging.
    pub fn row_count(&self) -> u64 {
        match self {
            Self::Rows(rows) => rows.len() as u64,
            Self::Affected { affected_rows, .. } => *affected_rows,
        }
    }
}

/// True when the statement text starts with the keyword `SELECT` or `SHOW`
/// (case-insensitive, leading whitespace ignored).
pub fn returns_rows(sql: &str) -> bool {
    let head = sql.trim_start();
    ["SELECT", "SHOW"].iter().any(|kw| {
        match (head.get(..kw.len()), head.get(kw.len()..)) {
            // `SELECTX` or `SHOWCASE` is an identifier, not the keyword.
            (Some(prefix), Some(rest)) => {
                prefix.eq_ignore_ascii_case(kw)
                    && rest
                        .chars()
                        .next()
                        .is_none_or(|c| !(c.is_alphanumeric() || c == '_' || c == '$'))
            }
            _ => false,
        }
    })
}
