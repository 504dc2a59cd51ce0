/// Integration test target: on-disk databases and the JSON-RPC surface
mod basic_integration;
mod mcp_session;
