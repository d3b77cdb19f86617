// ABOUTME: MCP server entry (stdio) wiring the OpenSpec core pipeline into rmcp tool handlers
// ABOUTME: Also hosts configuration loading, debug logging and on-disk project materialization

pub mod config_manager;
pub mod debug_logger;
pub mod materializer;
pub mod official_server;
pub mod prompts;

pub use config_manager::*;
pub use official_server::*;
