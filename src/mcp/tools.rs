//! MCP tool parameter types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::calendar::{Category, StatsPeriod, StatusFilter};

/// Upper bound for the upcoming-events look-ahead.
pub const MAX_UPCOMING_DAYS: i64 = 30;

/// Parameters for `get_all_events`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct GetAllEventsParams {
    /// Filter by event category (optional)
    #[serde(default)]
    pub category: Option<Category>,
    /// Filter by completion status (optional)
    #[serde(default)]
    pub status: Option<StatusFilter>,
}

/// Parameters for tools addressing a single event.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EventIdParams {
    /// Event ID
    pub event_id: String,
}

/// Parameters for `create_event`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateEventParams {
    /// Event name/title
    pub name: String,
    /// Event description/details
    #[serde(default)]
    pub content: Option<String>,
    /// Event category
    pub category: Category,
    /// Priority level (1=Low, 2=Medium, 3=High)
    #[schemars(range(min = 1, max = 3))]
    pub level: i64,
    /// Start time in YYYY-MM-DD HH:MM:SS format
    pub start_time: String,
    /// End time in YYYY-MM-DD HH:MM:SS format
    pub end_time: String,
}

/// Parameters for `update_event`. Omitted fields keep their stored value.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateEventParams {
    /// Event ID to update
    pub event_id: String,
    /// Event name/title
    #[serde(default)]
    pub name: Option<String>,
    /// Event description/details
    #[serde(default)]
    pub content: Option<String>,
    /// Event category
    #[serde(default)]
    pub category: Option<Category>,
    /// Priority level (1=Low, 2=Medium, 3=High)
    #[serde(default)]
    #[schemars(range(min = 1, max = 3))]
    pub level: Option<i64>,
    /// Completion status (0.0=Not Started, 0.5=In Progress, 1.0=Completed)
    #[serde(default)]
    #[schemars(range(min = 0.0, max = 1.0))]
    pub status: Option<f64>,
    /// Start time in YYYY-MM-DD HH:MM:SS format
    #[serde(default)]
    pub start_time: Option<String>,
    /// End time in YYYY-MM-DD HH:MM:SS format
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Parameters for `get_upcoming_events`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct UpcomingEventsParams {
    /// Number of days to look ahead (default: 7)
    #[serde(default)]
    #[schemars(range(min = 1, max = 30))]
    pub days: Option<i64>,
    /// Filter by event category (optional)
    #[serde(default)]
    pub category: Option<Category>,
}

/// Parameters for `get_events_by_date`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EventsByDateParams {
    /// Date in YYYY-MM-DD format
    pub date: String,
}

/// Parameters for `search_events`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchEventsParams {
    /// Search query to match against event names and descriptions
    pub query: String,
}

/// Parameters for `get_calendar_statistics`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct StatisticsParams {
    /// Time period for statistics (default: month)
    #[serde(default)]
    pub period: Option<StatsPeriod>,
}
