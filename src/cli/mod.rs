//! CLI module for the academic calendar command-line interface.
//!
//! Client commands run either against a REST server (remote mode, the
//! default) or directly against the configured store (local mode). Both go
//! through the same `ScheduleApi` seam the MCP adapter uses.

mod commands;
mod output;

pub use commands::*;
