//! MCP (Model Context Protocol) module
//!
//! Implements the MCP server protocol: tools, resources, prompts and
//! progress notifications.

pub mod progress;
pub mod prompts;
pub mod resources;
pub mod server;
pub mod tools;
pub mod types;
