//! Clients for the schedule REST API.
//!
//! `ScheduleApi` is the seam the MCP adapter and the CLI talk through:
//! - `HttpScheduleClient`: calls a running REST server over HTTP
//! - `LocalScheduleApi`: calls an `EventManager` in-process with the same
//!   status semantics as the REST layer

mod http;
mod local;

pub use http::HttpScheduleClient;
pub use local::LocalScheduleApi;

use async_trait::async_trait;

use crate::calendar::Event;
use crate::error::Result;

/// Operations offered by the schedule REST API.
#[async_trait]
pub trait ScheduleApi: Send + Sync {
    /// GET / - service identification.
    async fn info(&self) -> Result<serde_json::Value>;

    /// GET /schedules
    async fn list(&self) -> Result<Vec<Event>>;

    /// GET /schedules/:id
    ///
    /// Fails with a 404 status error when no event has this id.
    async fn get(&self, id: &str) -> Result<Vec<Event>>;

    /// POST /schedules
    async fn create(&self, event: &Event) -> Result<Event>;

    /// PUT /schedules/:id
    async fn update(&self, id: &str, event: &Event) -> Result<Event>;

    /// DELETE /schedules/:id - returns the confirmation message.
    async fn delete(&self, id: &str) -> Result<String>;
}
