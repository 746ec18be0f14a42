//! MCP-facing behaviour: catalog, result envelopes and protocol errors.

mod common;

use common::RecordingGateway;
use mysql_mcp_server::MySqlService;
use rmcp::ServerHandler;
use serde_json::json;
use std::sync::Arc;

fn service() -> MySqlService<RecordingGateway> {
    MySqlService::new(Arc::new(RecordingGateway::new()))
}

#[test]
fn test_catalog_lists_four_tools() {
    let tools = MySqlService::<RecordingGateway>::tools();
    let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
    assert_eq!(
        names,
        vec!["execute_sql", "list_databases", "list_tables", "describe_table"]
    );
    for tool in &tools {
        assert_eq!(tool.input_schema["type"], "object");
        assert!(tool.description.is_some());
    }
}

#[test]
fn test_server_info() {
    let info = service().get_info();
    assert_eq!(info.server_info.name, "mysql-mcp-server");
    assert!(info.capabilities.tools.is_some());
    assert!(info.instructions.is_some());
}

#[tokio::test]
async fn test_unknown_tool_is_method_not_found() {
    let err = service().handle_call("drop_everything", None).await.unwrap_err();
    assert_eq!(err.code.0, -32601);
    assert!(err.message.contains("drop_everything"));
}

#[tokio::test]
async fn test_validation_failure_is_error_result() {
    let args = json!({"table": ""}).as_object().cloned().unwrap();
    let result = service()
        .handle_call("describe_table", Some(&args))
        .await
        .unwrap();
    assert_eq!(result.is_error, Some(true));
}

#[tokio::test]
async fn test_success_is_not_error() {
    let args = json!({"sql": "SELECT 1"}).as_object().cloned().unwrap();
    let result = service().handle_call("execute_sql", Some(&args)).await.unwrap();
    assert_eq!(result.is_error, Some(false));
    assert_eq!(result.content.len(), 1);
}

#[tokio::test]
async fn test_query_database_alias() {
    let gateway = Arc::new(RecordingGateway::new());
    let service = MySqlService::new(gateway.clone());
    let args = json!({"sql": "SELECT 1"}).as_object().cloned().unwrap();
    let result = service.handle_call("query_database", Some(&args)).await.unwrap();
    assert_eq!(result.is_error, Some(false));
    assert_eq!(gateway.calls().len(), 1);
}
