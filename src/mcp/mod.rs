//! MCP adapter exposing the calendar as tools.

pub mod render;
mod server;
mod tools;
mod transport;

pub use server::*;
pub use tools::*;
pub use transport::*;
