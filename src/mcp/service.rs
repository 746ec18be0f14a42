//! MCP service implementation using rmcp.
//!
//! `MySqlService` implements `ServerHandler` directly: `tools/list` is served
//! from the `Operation` catalog and `tools/call` goes through the
//! `ToolDispatcher`, so every call is validated before it reaches MySQL.

use crate::db::{MySqlGateway, SqlGateway};
use crate::error::DbError;
use crate::tools::{Operation, ToolDispatcher, ToolResult};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use std::future::Future;
use std::sync::Arc;

pub struct MySqlService<G = MySqlGateway> {
    dispatcher: ToolDispatcher<G>,
}

impl<G> Clone for MySqlService<G> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<G: SqlGateway> MySqlService<G> {
    /// Create a service sharing `gateway` with every other session.
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            dispatcher: ToolDispatcher::new(gateway),
        }
    }

    /// The advertised tool catalog.
    pub fn tools() -> Vec<Tool> {
        Operation::ALL
            .iter()
            .map(|op| Tool::new(op.name(), op.description(), Arc::new(op.input_schema())))
            .collect()
    }

    /// Handle a `tools/call`.
    ///
    /// Unknown tool names are a protocol error (method not found); every other
    /// failure is returned as a tool result with `isError` set.
    pub async fn handle_call(
        &self,
        name: &str,
        arguments: Option<&JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        match self.dispatcher.dispatch(name, arguments).await {
            ToolResult::Error {
                error: error @ DbError::UnknownOperation { .. },
            } => Err(error.into()),
            result @ ToolResult::Error { .. } => {
                Ok(CallToolResult::error(vec![Content::text(result.text())]))
            }
            ToolResult::Success { payload } => Ok(CallToolResult::success(vec![Content::text(payload)])),
        }
    }
}

impl<G: SqlGateway> ServerHandler for MySqlService<G> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "mysql-mcp-server".to_owned(),
                title: Some("MySQL MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Tools for querying a MySQL server.\n\
                \n\
                ## Workflow\n\
                1. `list_databases` to see what is available\n\
                2. `list_tables` with a `database` to find tables\n\
                3. `describe_table` to learn a table's columns before writing SQL\n\
                4. `execute_sql` to run statements; pass values through `params` with `?` placeholders\n\
                \n\
                ## Notes\n\
                - Omitting `database` uses the server's configured default database.\n\
                - SELECT and SHOW return rows. Other statements return `affected_rows` and `last_insert_id`.\n\
                - Statements run with autocommit; there is no multi-call transaction."
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move { Ok(ListToolsResult::with_all_items(Self::tools())) }
    }

    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            self.handle_call(&request.name, request.arguments.as_ref())
                .await
        }
    }
}
