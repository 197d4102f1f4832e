//! MCP server implementation for the academic calendar.

use std::sync::Arc;

use chrono::Utc;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use tracing::{error, info};

use crate::calendar::{
    filter_events, format_timestamp, local_now, on_date, search, statistics, upcoming_within,
    Event, DEFAULT_UPCOMING_DAYS,
};
use crate::client::{HttpScheduleClient, ScheduleApi};
use crate::config::Config;
use crate::error::CalendarError;

use super::render;
use super::tools::*;

/// Academic calendar MCP server handler.
///
/// Every tool is translated into one or more schedule API calls; results
/// are rendered as text.
#[derive(Clone)]
pub struct CalendarMcpServer {
    api: Arc<dyn ScheduleApi>,
    calendar_name: String,
    tool_router: ToolRouter<Self>,
}

impl CalendarMcpServer {
    /// Create a server over a schedule API.
    pub fn new(api: Arc<dyn ScheduleApi>, calendar_name: impl Into<String>) -> Self {
        Self {
            api,
            calendar_name: calendar_name.into(),
            tool_router: Self::tool_router(),
        }
    }

    /// Create a server that talks to the configured REST API over HTTP.
    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        let client = HttpScheduleClient::from_config(&config.mcp)?;
        info!("Calendar API base URL: {}", client.base_url());
        Ok(Self::new(Arc::new(client), config.mcp.calendar_name.clone()))
    }

    /// Display name used in tool output.
    pub fn calendar_name(&self) -> &str {
        &self.calendar_name
    }

    fn text(message: String) -> CallToolResult {
        CallToolResult::success(vec![Content::text(message)])
    }

    fn failure(tool: &str, err: CalendarError) -> CallToolResult {
        error!("Tool {} failed: {}", tool, err);
        let message = match err {
            CalendarError::Api(e) => format!("Calendar API request failed: {}", e),
            other => other.to_string(),
        };
        CallToolResult::error(vec![Content::text(render::error(message))])
    }

    fn not_found(tool: &str, id: &str) -> CallToolResult {
        error!("Tool {} failed: event not found: {}", tool, id);
        CallToolResult::error(vec![Content::text(render::error(format!(
            "Event not found: {}",
            id
        )))])
    }

    /// Fetch the stored record for `id`, taking the first match.
    async fn current(&self, id: &str) -> crate::error::Result<Option<Event>> {
        Ok(self.api.get(id).await?.into_iter().next())
    }
}

#[tool_router]
impl CalendarMcpServer {
    /// List events, optionally filtered by category and completion status.
    #[tool(description = "Get all events/schedules from the academic calendar")]
    async fn get_all_events(
        &self,
        Parameters(params): Parameters<GetAllEventsParams>,
    ) -> Result<CallToolResult, McpError> {
        let events = match self.api.list().await {
            Ok(events) => events,
            Err(e) => return Ok(Self::failure("get_all_events", e)),
        };

        let category = params.category.map(|c| c.as_str());
        let events = filter_events(&events, category, params.status);
        Ok(Self::text(render::event_list(&events, &self.calendar_name)))
    }

    #[tool(description = "Get detailed information about a specific event by ID")]
    async fn get_event(
        &self,
        Parameters(params): Parameters<EventIdParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.current(&params.event_id).await {
            Ok(Some(event)) => Ok(Self::text(render::event_details(
                &event,
                &self.calendar_name,
            ))),
            Ok(None) => Ok(Self::not_found("get_event", &params.event_id)),
            Err(e) => Ok(Self::failure("get_event", e)),
        }
    }

    /// Create an event. The id and creation time are generated here and new
    /// events start not started.
    #[tool(description = "Create a new academic event in the calendar")]
    async fn create_event(
        &self,
        Parameters(params): Parameters<CreateEventParams>,
    ) -> Result<CallToolResult, McpError> {
        let event = Event {
            sid: format!("mcp-event-{}", Utc::now().timestamp_millis()),
            name: params.name,
            content: params.content.unwrap_or_default(),
            category: params.category.as_str().to_string(),
            level: params.level,
            status: 0.0,
            creation_time: format_timestamp(local_now()),
            start_time: params.start_time,
            end_time: params.end_time,
        };

        match self.api.create(&event).await {
            Ok(created) => {
                info!("Created event {} via MCP", created.sid);
                Ok(Self::text(render::event_created(&created)))
            }
            Err(e) => Ok(Self::failure("create_event", e)),
        }
    }

    /// Update an event. Supplied fields are merged over the stored record and
    /// the complete record is written back.
    #[tool(description = "Update an existing event in the calendar")]
    async fn update_event(
        &self,
        Parameters(params): Parameters<UpdateEventParams>,
    ) -> Result<CallToolResult, McpError> {
        let current = match self.current(&params.event_id).await {
            Ok(Some(event)) => event,
            Ok(None) => return Ok(Self::not_found("update_event", &params.event_id)),
            Err(e) => return Ok(Self::failure("update_event", e)),
        };

        let merged = Event {
            sid: params.event_id.clone(),
            name: params.name.unwrap_or(current.name),
            content: params.content.unwrap_or(current.content),
            category: params
                .category
                .map(|c| c.as_str().to_string())
                .unwrap_or(current.category),
            level: params.level.unwrap_or(current.level),
            status: params.status.unwrap_or(current.status),
            creation_time: current.creation_time,
            start_time: params.start_time.unwrap_or(current.start_time),
            end_time: params.end_time.unwrap_or(current.end_time),
        };

        match self.api.update(&params.event_id, &merged).await {
            Ok(updated) => Ok(Self::text(render::event_updated(&updated))),
            Err(e) => Ok(Self::failure("update_event", e)),
        }
    }

    #[tool(description = "Delete an event from the calendar")]
    async fn delete_event(
        &self,
        Parameters(params): Parameters<EventIdParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.api.delete(&params.event_id).await {
            Ok(_) => Ok(Self::text(render::event_deleted(&params.event_id))),
            Err(e) => Ok(Self::failure("delete_event", e)),
        }
    }

    #[tool(description = "Get upcoming events within a specified number of days")]
    async fn get_upcoming_events(
        &self,
        Parameters(params): Parameters<UpcomingEventsParams>,
    ) -> Result<CallToolResult, McpError> {
        let days = params.days.unwrap_or(DEFAULT_UPCOMING_DAYS);
        if !(1..=MAX_UPCOMING_DAYS).contains(&days) {
            return Err(McpError::invalid_params(
                format!("days must be between 1 and {}", MAX_UPCOMING_DAYS),
                None,
            ));
        }

        let events = match self.api.list().await {
            Ok(events) => events,
            Err(e) => return Ok(Self::failure("get_upcoming_events", e)),
        };

        let category = params.category.map(|c| c.as_str());
        let upcoming = upcoming_within(&events, local_now(), days, category);
        Ok(Self::text(render::upcoming(&upcoming, days, category)))
    }

    #[tool(description = "Get all events for a specific date")]
    async fn get_events_by_date(
        &self,
        Parameters(params): Parameters<EventsByDateParams>,
    ) -> Result<CallToolResult, McpError> {
        let events = match self.api.list().await {
            Ok(events) => events,
            Err(e) => return Ok(Self::failure("get_events_by_date", e)),
        };

        let matching = on_date(&events, &params.date);
        Ok(Self::text(render::events_on_date(&matching, &params.date)))
    }

    #[tool(description = "Search events by name or content")]
    async fn search_events(
        &self,
        Parameters(params): Parameters<SearchEventsParams>,
    ) -> Result<CallToolResult, McpError> {
        let events = match self.api.list().await {
            Ok(events) => events,
            Err(e) => return Ok(Self::failure("search_events", e)),
        };

        let matching = search(&events, &params.query);
        Ok(Self::text(render::search_results(&matching, &params.query)))
    }

    #[tool(description = "Get calendar statistics and overview")]
    async fn get_calendar_statistics(
        &self,
        Parameters(params): Parameters<StatisticsParams>,
    ) -> Result<CallToolResult, McpError> {
        let events = match self.api.list().await {
            Ok(events) => events,
            Err(e) => return Ok(Self::failure("get_calendar_statistics", e)),
        };

        let stats = statistics(&events, params.period.unwrap_or_default());
        Ok(Self::text(render::statistics(&stats, &self.calendar_name)))
    }
}

#[tool_handler]
impl ServerHandler for CalendarMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(format!(
                "Academic calendar for {}. \
                 Use 'get_all_events' or 'get_upcoming_events' to browse, \
                 'search_events' and 'get_events_by_date' to find events, \
                 'create_event', 'update_event' and 'delete_event' to manage them, \
                 and 'get_calendar_statistics' for an overview.",
                self.calendar_name
            )),
        }
    }
}
