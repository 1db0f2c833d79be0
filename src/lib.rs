//! InfraNodus MCP Server Library
//!
//! A Model Context Protocol (MCP) server for the InfraNodus text network API.
//! Provides tools for knowledge graphs, content gaps, research questions,
//! text comparison, SEO analysis and graph-based memory.

pub mod config;
pub mod error;
pub mod infranodus;
pub mod mcp;

pub use config::Config;
pub use error::{InfraNodusMcpError, Result};
