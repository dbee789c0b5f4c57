//! MCP server exposing the Gerrit review tools over stdio and HTTP.

pub mod http;
pub mod prompts;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;
