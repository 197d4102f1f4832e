//! REST API request handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::calendar::{Event, EventManager, MutationOutcome};
use crate::error::CalendarError;
use crate::storage::RecordStore;

/// Application state shared across handlers.
pub struct ApiState {
    /// Event manager for reads and writes.
    pub events: Arc<EventManager<dyn RecordStore>>,
}

impl ApiState {
    /// Create new API state.
    pub fn new(events: Arc<EventManager<dyn RecordStore>>) -> Self {
        Self { events }
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Plain message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error codes carried in `ErrorResponse::code`.
pub mod codes {
    pub const NOT_FOUND: &str = "not_found";
    pub const ALREADY_EXISTS: &str = "already_exists";
    pub const INVALID_DATA: &str = "invalid_data";
    pub const STORAGE_ERROR: &str = "storage_error";
}

pub const SCHEDULE_NOT_FOUND: &str = "Schedule not found";
pub const SCHEDULE_DELETED: &str = "Schedule deleted successfully";

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    code: &str,
) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
        }),
    )
        .into_response()
}

fn fault_response(err: CalendarError) -> axum::response::Response {
    error!("Store fault: {}", err);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        err.to_string(),
        codes::STORAGE_ERROR,
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// GET / - Application name.
pub async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "app_name": "calendar" }))
}

/// GET /schedules - All events.
pub async fn list_schedules_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    match state.events.list().await {
        Ok(events) => Json(events).into_response(),
        Err(e) => fault_response(e),
    }
}

/// GET /schedules/:id - Events matching an id.
pub async fn get_schedule_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.events.read(&id).await {
        Ok(events) if events.is_empty() => {
            error_response(StatusCode::NOT_FOUND, SCHEDULE_NOT_FOUND, codes::NOT_FOUND)
        }
        Ok(events) => Json(events).into_response(),
        Err(e) => fault_response(e),
    }
}

/// POST /schedules - Create an event.
pub async fn create_schedule_handler(
    State(state): State<Arc<ApiState>>,
    Json(event): Json<Event>,
) -> impl IntoResponse {
    match state.events.create(&event).await {
        Ok(MutationOutcome::Applied) => Json(event).into_response(),
        Ok(MutationOutcome::AlreadyExists) => error_response(
            StatusCode::BAD_REQUEST,
            format!("Schedule already exists: {}", event.sid),
            codes::ALREADY_EXISTS,
        ),
        Ok(MutationOutcome::Invalid(e)) => error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid data: {}", e),
            codes::INVALID_DATA,
        ),
        // create never reports a missing target
        Ok(MutationOutcome::NotFound) => {
            error_response(StatusCode::NOT_FOUND, SCHEDULE_NOT_FOUND, codes::NOT_FOUND)
        }
        Err(e) => fault_response(e),
    }
}

/// PUT /schedules/:id - Replace an event.
pub async fn update_schedule_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(event): Json<Event>,
) -> impl IntoResponse {
    match state.events.update(&id, &event).await {
        Ok(MutationOutcome::Applied) => {
            // The stored id is the path id
            let stored = Event { sid: id, ..event };
            Json(stored).into_response()
        }
        Ok(MutationOutcome::NotFound) => {
            error_response(StatusCode::NOT_FOUND, SCHEDULE_NOT_FOUND, codes::NOT_FOUND)
        }
        Ok(MutationOutcome::Invalid(e)) => error_response(
            StatusCode::NOT_FOUND,
            format!("Invalid data: {}", e),
            codes::INVALID_DATA,
        ),
        Ok(MutationOutcome::AlreadyExists) => error_response(
            StatusCode::BAD_REQUEST,
            format!("Schedule already exists: {}", id),
            codes::ALREADY_EXISTS,
        ),
        Err(e) => fault_response(e),
    }
}

/// DELETE /schedules/:id - Delete an event.
pub async fn delete_schedule_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.events.delete(&id).await {
        Ok(MutationOutcome::Applied) => Json(MessageResponse {
            message: SCHEDULE_DELETED.to_string(),
        })
        .into_response(),
        Ok(_) => error_response(StatusCode::NOT_FOUND, SCHEDULE_NOT_FOUND, codes::NOT_FOUND),
        Err(e) => fault_response(e),
    }
}
