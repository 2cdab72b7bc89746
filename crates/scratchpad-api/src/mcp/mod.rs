//! MCP (Model Context Protocol) tool endpoint.
//!
//! Exposes note retrieval and capture as tools for LLM agents, served as
//! JSON-RPC 2.0 over `POST /mcp`.

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;

pub use server::{handle_mcp, McpServer};
