//! MCP tool handling.
//!
//! - `operation`: the tool catalog and argument records
//! - `validator`: untyped arguments to `ToolRequest`
//! - `dispatcher`: validated requests to gateway calls and result envelopes

pub mod dispatcher;
pub mod operation;
pub mod validator;

pub use dispatcher::{ToolDispatcher, ToolResult};
pub use operation::{Operation, ToolRequest};
pub use validator::validate;
