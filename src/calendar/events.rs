//! Event storage and mutation.
//!
//! This module provides the EventManager, which enforces field validation and
//! existence checks around every write to the events table.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::{Condition, RecordStore};

use super::types::{Event, MutationOutcome, DEFAULT_TABLE};
use super::validation::validate_event;

// ============================================================================
// Event Manager
// ============================================================================

/// Manager for calendar events over a record store.
pub struct EventManager<S: RecordStore + ?Sized> {
    store: Arc<S>,
    table: String,
}

impl<S: RecordStore + ?Sized> Clone for EventManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            table: self.table.clone(),
        }
    }
}

impl<S: RecordStore + ?Sized> EventManager<S> {
    /// Create a manager over the default `calendar` table.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_table(store, DEFAULT_TABLE)
    }

    /// Create a manager over a named table.
    pub fn with_table(store: Arc<S>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
        }
    }

    /// Table this manager writes to.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Create the events table if it does not exist.
    ///
    /// Returns whether the table already existed.
    pub async fn init_schema(&self) -> Result<bool> {
        let existed = self.store.table_exists(&self.table).await?;
        if !existed {
            self.store
                .create_table(&self.table, &Event::columns())
                .await?;
            debug!("Created events table: {}", self.table);
        }
        Ok(existed)
    }

    fn by_id(id: &str) -> Condition {
        Condition::eq("sid", id)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Events matching an id. Empty when none exists.
    pub async fn read(&self, id: &str) -> Result<Vec<Event>> {
        let rows = self.store.fetch(&self.table, Some(&Self::by_id(id))).await?;
        rows.iter()
            .map(|r| Event::from_row(r).map_err(Into::into))
            .collect()
    }

    /// All events in storage order.
    pub async fn list(&self) -> Result<Vec<Event>> {
        let rows = self.store.fetch(&self.table, None).await?;
        rows.iter()
            .map(|r| Event::from_row(r).map_err(Into::into))
            .collect()
    }

    /// Whether an event with this id exists.
    pub async fn exists(&self, id: &str) -> Result<bool> {
        self.store.exists(&self.table, &Self::by_id(id)).await
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Insert a new event.
    ///
    /// Rejected when the id is taken or the fields are invalid.
    pub async fn create(&self, candidate: &Event) -> Result<MutationOutcome> {
        if self.exists(&candidate.sid).await? {
            warn!("Create rejected, event already exists: {}", candidate.sid);
            return Ok(MutationOutcome::AlreadyExists);
        }

        if let Err(e) = validate_event(candidate) {
            warn!("Create rejected for {}: {}", candidate.sid, e);
            return Ok(MutationOutcome::Invalid(e));
        }

        let inserted = self
            .store
            .insert_if_absent(&self.table, &candidate.to_row(), &Self::by_id(&candidate.sid))
            .await?;

        if !inserted {
            // Lost a race with a concurrent create of the same id
            warn!("Create rejected, event already exists: {}", candidate.sid);
            return Ok(MutationOutcome::AlreadyExists);
        }

        debug!("Created event: {} ({})", candidate.name, candidate.sid);
        Ok(MutationOutcome::Applied)
    }

    /// Replace every field of an existing event.
    ///
    /// The candidate must be complete; merging partial changes is the
    /// caller's job. The stored id never changes.
    pub async fn update(&self, id: &str, candidate: &Event) -> Result<MutationOutcome> {
        if !self.exists(id).await? {
            warn!("Update rejected, event not found: {}", id);
            return Ok(MutationOutcome::NotFound);
        }

        if let Err(e) = validate_event(candidate) {
            warn!("Update rejected for {}: {}", id, e);
            return Ok(MutationOutcome::Invalid(e));
        }

        let affected = self
            .store
            .update(&self.table, &candidate.fields_row(), &Self::by_id(id))
            .await?;

        if affected == 0 {
            warn!("Update rejected, event removed concurrently: {}", id);
            return Ok(MutationOutcome::NotFound);
        }

        debug!("Updated event: {} ({})", candidate.name, id);
        Ok(MutationOutcome::Applied)
    }

    /// Delete an event.
    pub async fn delete(&self, id: &str) -> Result<MutationOutcome> {
        if !self.exists(id).await? {
            warn!("Delete rejected, event not found: {}", id);
            return Ok(MutationOutcome::NotFound);
        }

        let affected = self.store.delete(&self.table, &Self::by_id(id)).await?;
        if affected == 0 {
            return Ok(MutationOutcome::NotFound);
        }

        debug!("Deleted event: {}", id);
        Ok(MutationOutcome::Applied)
    }
}
