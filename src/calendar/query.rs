//! Derived queries over the event collection.
//!
//! The free functions here are pure and work on a snapshot of events. The
//! `CalendarQueryEngine` applies them to a fresh fetch from an `EventManager`.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDateTime, Timelike};

use crate::error::Result;
use crate::storage::RecordStore;

use super::events::EventManager;
use super::types::{ActivityLevel, CalendarStats, Event, StatsPeriod, StatusFilter};

/// Default look-ahead for upcoming events, in days.
pub const DEFAULT_UPCOMING_DAYS: i64 = 7;

// ============================================================================
// Pure queries
// ============================================================================

/// Events starting within `[now, now + days]`, sorted by start time.
///
/// Events whose start time does not parse are skipped.
pub fn upcoming_within(
    events: &[Event],
    now: NaiveDateTime,
    days: i64,
    category: Option<&str>,
) -> Vec<Event> {
    // A horizon past the representable range leaves the window unbounded
    let horizon = Duration::try_days(days).and_then(|d| now.checked_add_signed(d));

    let mut upcoming: Vec<Event> = events
        .iter()
        .filter(|e| match e.start() {
            Some(start) => start >= now && horizon.map_or(true, |h| start <= h),
            None => false,
        })
        .filter(|e| category.map_or(true, |c| e.category == c))
        .cloned()
        .collect();

    // The fixed timestamp layout sorts chronologically as text
    upcoming.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    upcoming
}

/// Events whose start date token equals `date` exactly.
///
/// Events with a blank start time never match.
pub fn on_date(events: &[Event], date: &str) -> Vec<Event> {
    events
        .iter()
        .filter(|e| e.start_date() == Some(date))
        .cloned()
        .collect()
}

/// Case-insensitive substring search over name and content.
pub fn search(events: &[Event], query: &str) -> Vec<Event> {
    let needle = query.to_lowercase();
    events
        .iter()
        .filter(|e| {
            e.name.to_lowercase().contains(&needle) || e.content.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Filter by exact category and completion bucket.
pub fn filter_events(
    events: &[Event],
    category: Option<&str>,
    status: Option<StatusFilter>,
) -> Vec<Event> {
    events
        .iter()
        .filter(|e| category.map_or(true, |c| e.category == c))
        .filter(|e| status.map_or(true, |s| s.matches(e.status)))
        .cloned()
        .collect()
}

/// Aggregate statistics over every event.
///
/// `period` is carried onto the result; it does not narrow the population.
pub fn statistics(events: &[Event], period: StatsPeriod) -> CalendarStats {
    let total = events.len();
    let mut completed = 0;
    let mut in_progress = 0;
    let mut pending = 0;
    let mut by_category: BTreeMap<String, usize> = BTreeMap::new();

    for event in events {
        match event.progress() {
            Some(StatusFilter::Completed) => completed += 1,
            Some(StatusFilter::InProgress) => in_progress += 1,
            Some(StatusFilter::NotStarted) => pending += 1,
            None => {}
        }
        *by_category.entry(event.category.clone()).or_insert(0) += 1;
    }

    let completion_rate = if total > 0 {
        completed as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    CalendarStats {
        period,
        total,
        completed,
        in_progress,
        pending,
        by_category,
        completion_rate,
        activity_level: ActivityLevel::from_total(total),
    }
}

/// Current local wall-clock time, truncated to whole seconds.
pub fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

// ============================================================================
// Query Engine
// ============================================================================

/// Read-only query engine over the stored events.
pub struct CalendarQueryEngine<S: RecordStore + ?Sized> {
    manager: Arc<EventManager<S>>,
}

impl<S: RecordStore + ?Sized> CalendarQueryEngine<S> {
    pub fn new(manager: Arc<EventManager<S>>) -> Self {
        Self { manager }
    }

    /// Get the underlying event manager.
    pub fn manager(&self) -> &EventManager<S> {
        &self.manager
    }

    /// Upcoming events relative to an explicit `now`.
    pub async fn upcoming_at(
        &self,
        now: NaiveDateTime,
        days: i64,
        category: Option<&str>,
    ) -> Result<Vec<Event>> {
        let events = self.manager.list().await?;
        Ok(upcoming_within(&events, now, days, category))
    }

    /// Upcoming events relative to local now.
    pub async fn upcoming(&self, days: i64, category: Option<&str>) -> Result<Vec<Event>> {
        self.upcoming_at(local_now(), days, category).await
    }

    pub async fn on_date(&self, date: &str) -> Result<Vec<Event>> {
        let events = self.manager.list().await?;
        Ok(on_date(&events, date))
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Event>> {
        let events = self.manager.list().await?;
        Ok(search(&events, query))
    }

    pub async fn filter(
        &self,
        category: Option<&str>,
        status: Option<StatusFilter>,
    ) -> Result<Vec<Event>> {
        let events = self.manager.list().await?;
        Ok(filter_events(&events, category, status))
    }

    pub async fn statistics(&self, period: StatsPeriod) -> Result<CalendarStats> {
        let events = self.manager.list().await?;
        Ok(statistics(&events, period))
    }
}
