//! Argument validation.
//!
//! Turns the untyped `arguments` object of a `tools/call` into a
//! `ToolRequest`. Fields are checked in the order the argument records
//! declare them and the first violation is reported. Validation never
//! touches the database.

use crate::error::{DbError, DbResult};
use crate::models::QueryParam;
use crate::tools::operation::{Operation, ToolRequest};
use serde_json::{Map, Value as JsonValue};

type JsonObject = Map<String, JsonValue>;

/// Validate `args` for `operation`.
///
/// `null` for an optional field counts as absent. Unknown fields are
/// ignored, except for `list_databases`, which takes no arguments at all.
pub fn validate(operation: Operation, args: &JsonObject) -> DbResult<ToolRequest> {
    match operation {
        Operation::ExecuteSql => {
            let sql = required_string(args, "sql")?;
            let params = optional_array(args, "params")?
                .map(|values| values.iter().cloned().map(QueryParam::from).collect())
                .unwrap_or_default();
            Ok(ToolRequest::ExecuteSql { sql, params })
        }
        Operation::ListDatabases => match args.keys().next() {
            Some(field) => Err(DbError::validation(
                field.as_str(),
                "list_databases does not take arguments",
            )),
            None => Ok(ToolRequest::ListDatabases),
        },
        Operation::ListTables => Ok(ToolRequest::ListTables {
            database: optional_database(args)?,
        }),
        Operation::DescribeTable => {
            let table = required_string(args, "table")?;
            let database = optional_database(args)?;
            Ok(ToolRequest::DescribeTable { table, database })
        }
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// A required string of at least one character.
fn required_string(args: &JsonObject, field: &str) -> DbResult<String> {
    match args.get(field) {
        None | Some(JsonValue::Null) => Err(DbError::validation(field, "is required")),
        Some(JsonValue::String(s)) if s.is_empty() => {
            Err(DbError::validation(field, "must not be empty"))
        }
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(other) => Err(DbError::validation(
            field,
            format!("expected a string, got {}", json_type_name(other)),
        )),
    }
}

fn optional_string(args: &JsonObject, field: &str) -> DbResult<Option<String>> {
    match args.get(field) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(DbError::validation(
            field,
            format!("expected a string, got {}", json_type_name(other)),
        )),
    }
}

/// The optional `database` argument. An empty name means the connection's
/// default database, the same as leaving it out.
fn optional_database(args: &JsonObject) -> DbResult<Option<String>> {
    Ok(optional_string(args, "database")?.filter(|db| !db.is_empty()))
}

fn optional_array<'a>(args: &'a JsonObject, field: &str) -> DbResult<Option<&'a Vec<JsonValue>>> {
    match args.get(field) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Array(values)) => Ok(Some(values)),
        Some(other) => Err(DbError::validation(
            field,
            format!("expected an array, got {}", json_type_name(other)),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: JsonValue) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    fn field_of(err: DbError) -> String {
        match err {
            DbError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_execute_sql_minimal() {
        let req = validate(Operation::ExecuteSql, &obj(json!({"sql": "SELECT 1"}))).unwrap();
        assert_eq!(
            req,
            ToolRequest::ExecuteSql {
                sql: "SELECT 1".to_string(),
                params: vec![]
            }
        );
    }

    #[test]
    fn test_execute_sql_with_params() {
        let req = validate(
            Operation::ExecuteSql,
            &obj(json!({"sql": "SELECT ?", "params": [1, "a", null]})),
        )
        .unwrap();
        let ToolRequest::ExecuteSql { params, .. } = req else {
            panic!("wrong variant");
        };
        assert_eq!(
            params,
            vec![
                QueryParam::Int(1),
                QueryParam::String("a".to_string()),
                QueryParam::Null
            ]
        );
    }

    #[test]
    fn test_execute_sql_missing_sql() {
        let err = validate(Operation::ExecuteSql, &obj(json!({}))).unwrap_err();
        assert_eq!(field_of(err), "sql");
    }

    #[test]
    fn test_execute_sql_empty_sql() {
        let err = validate(Operation::ExecuteSql, &obj(json!({"sql": ""}))).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_execute_sql_wrong_type() {
        let err = validate(Operation::ExecuteSql, &obj(json!({"sql": 42}))).unwrap_err();
        assert!(err.to_string().contains("got number"));
    }

    #[test]
    fn test_first_offending_field_reported() {
        let err = validate(
            Operation::ExecuteSql,
            &obj(json!({"sql": 1, "params": "nope"})),
        )
        .unwrap_err();
        assert_eq!(field_of(err), "sql");
    }

    #[test]
    fn test_params_must_be_array() {
        let err = validate(
            Operation::ExecuteSql,
            &obj(json!({"sql": "SELECT 1", "params": {"a": 1}})),
        )
        .unwrap_err();
        assert_eq!(field_of(err), "params");
    }

    #[test]
    fn test_null_optional_is_absent() {
        let req = validate(
            Operation::ListTables,
            &obj(json!({"database": null})),
        )
        .unwrap();
        assert_eq!(req, ToolRequest::ListTables { database: None });
    }

    #[test]
    fn test_empty_database_means_default() {
        let req = validate(Operation::ListTables, &obj(json!({"database": ""}))).unwrap();
        assert_eq!(req, ToolRequest::ListTables { database: None });

        let req = validate(
            Operation::DescribeTable,
            &obj(json!({"table": "users", "database": ""})),
        )
        .unwrap();
        assert_eq!(
            req,
            ToolRequest::DescribeTable {
                table: "users".to_string(),
                database: None
            }
        );
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let req = validate(
            Operation::DescribeTable,
            &obj(json!({"table": "users", "verbose": true})),
        )
        .unwrap();
        assert_eq!(
            req,
            ToolRequest::DescribeTable {
                table: "users".to_string(),
                database: None
            }
        );
    }

    #[test]
    fn test_list_databases_rejects_fields() {
        assert_eq!(
            validate(Operation::ListDatabases, &obj(json!({}))).unwrap(),
            ToolRequest::ListDatabases
        );
        let err = validate(Operation::ListDatabases, &obj(json!({"database": "x"}))).unwrap_err();
        assert_eq!(field_of(err), "database");
    }

    #[test]
    fn test_describe_table_database_type_checked() {
        let err = validate(
            Operation::DescribeTable,
            &obj(json!({"table": "t", "database": 5})),
        )
        .unwrap_err();
        assert_eq!(field_of(err), "database");
    }
}
