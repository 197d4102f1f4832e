//! Academic Calendar: event scheduling REST API and MCP server
//!
//! A single-table event store served over HTTP, with an MCP adapter that
//! exposes the same events as tools for assistants.

pub mod api;
pub mod calendar;
pub mod client;
pub mod config;
pub mod error;
pub mod mcp;
pub mod storage;

pub use api::{create_rest_router, run_rest_server, ApiState, RestApiConfig};
pub use calendar::{
    CalendarQueryEngine, CalendarStats, Category, Event, EventManager, MutationOutcome,
    StatsPeriod, StatusFilter,
};
pub use client::{HttpScheduleClient, LocalScheduleApi, ScheduleApi};
pub use config::Config;
pub use error::{CalendarError, Result};
pub use mcp::{run_server, CalendarMcpServer};
pub use storage::{create_storage, MemoryStore, RecordStore, SqliteStore};
