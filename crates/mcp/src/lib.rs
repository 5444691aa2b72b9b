// MCP (Model Context Protocol) server exposing SPARQL knowledge graphs as tools

pub mod dispatcher;
pub mod protocol;
pub mod server;
pub mod tools;

pub use dispatcher::Dispatcher;
pub use server::McpServer;
