//! REST API module for the academic calendar.
//!
//! Exposes the event table over HTTP. The MCP adapter and the CLI's remote
//! mode are clients of this API.

mod handlers;
mod rest;

pub use handlers::*;
pub use rest::*;
