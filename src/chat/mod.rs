//! Interactive chat agent backed by MCP tools
//!
//! Tools are discovered at startup from an MCP server spawned as a child
//! process and exposed to the model on every turn. The session keeps the
//! full transcript so the model sees prior turns and tool results.

pub mod provider;
pub mod session;

pub use provider::{McpToolProvider, ToolProvider};
pub use session::ChatSession;
