//! In-process schedule API.

use std::sync::Arc;

use async_trait::async_trait;

use super::ScheduleApi;
use crate::api::{SCHEDULE_DELETED, SCHEDULE_NOT_FOUND};
use crate::calendar::{Event, EventManager, MutationOutcome};
use crate::error::{ApiError, Result};
use crate::storage::RecordStore;

/// Schedule API backed directly by an `EventManager`.
///
/// Rejections surface as the same status errors the REST layer returns, so
/// callers behave identically in local and remote mode.
pub struct LocalScheduleApi<S: RecordStore + ?Sized> {
    events: Arc<EventManager<S>>,
}

impl<S: RecordStore + ?Sized> LocalScheduleApi<S> {
    pub fn new(events: Arc<EventManager<S>>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &Arc<EventManager<S>> {
        &self.events
    }
}

fn status(status: u16, message: impl Into<String>) -> crate::error::CalendarError {
    ApiError::Status {
        status,
        message: message.into(),
    }
    .into()
}

#[async_trait]
impl<S: RecordStore + ?Sized + 'static> ScheduleApi for LocalScheduleApi<S> {
    async fn info(&self) -> Result<serde_json::Value> {
        Ok(serde_json::json!({ "app_name": "calendar" }))
    }

    async fn list(&self) -> Result<Vec<Event>> {
        self.events.list().await
    }

    async fn get(&self, id: &str) -> Result<Vec<Event>> {
        let events = self.events.read(id).await?;
        if events.is_empty() {
            return Err(status(404, SCHEDULE_NOT_FOUND));
        }
        Ok(events)
    }

    async fn create(&self, event: &Event) -> Result<Event> {
        match self.events.create(event).await? {
            MutationOutcome::Applied => Ok(event.clone()),
            MutationOutcome::AlreadyExists => Err(status(
                400,
                format!("Schedule already exists: {}", event.sid),
            )),
            MutationOutcome::Invalid(e) => Err(status(400, format!("Invalid data: {}", e))),
            MutationOutcome::NotFound => Err(status(404, SCHEDULE_NOT_FOUND)),
        }
    }

    async fn update(&self, id: &str, event: &Event) -> Result<Event> {
        match self.events.update(id, event).await? {
            MutationOutcome::Applied => Ok(Event {
                sid: id.to_string(),
                ..event.clone()
            }),
            MutationOutcome::NotFound => Err(status(404, SCHEDULE_NOT_FOUND)),
            MutationOutcome::Invalid(e) => Err(status(404, format!("Invalid data: {}", e))),
            MutationOutcome::AlreadyExists => {
                Err(status(400, format!("Schedule already exists: {}", id)))
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<String> {
        match self.events.delete(id).await? {
            MutationOutcome::Applied => Ok(SCHEDULE_DELETED.to_string()),
            _ => Err(status(404, SCHEDULE_NOT_FOUND)),
        }
    }
}
