/// MCP protocol implementation
///
/// JSON-RPC message types plus the line-oriented server loop that routes
/// tool calls to the tracker.

pub mod protocol;
pub mod server;

// Re-export main types
pub use server::{tool_definitions, McpServer};
