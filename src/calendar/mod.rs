//! Calendar module for academic event management.
//!
//! This module provides:
//!
//! - **Events**: the persisted event record and its category/status vocabulary
//! - **Validation**: field checks applied before every write
//! - **Event Management**: create/read/update/delete with existence checks
//! - **Query Engine**: upcoming windows, date matching, search and statistics
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            CalendarQueryEngine               │
//! │  - upcoming / on-date / search / stats       │
//! └──────────────────────┬───────────────────────┘
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │               EventManager                   │
//! │  - existence checks                          │
//! │  - field validation                          │
//! └──────────────────────┬───────────────────────┘
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │               RecordStore                    │
//! │  (SqliteStore / MemoryStore)                 │
//! └──────────────────────────────────────────────┘
//! ```

mod events;
mod query;
mod types;
mod validation;

pub use events::EventManager;
pub use query::{
    filter_events, local_now, on_date, search, statistics, upcoming_within,
    CalendarQueryEngine, DEFAULT_UPCOMING_DAYS,
};
pub use types::*;
pub use validation::{validate_event, LEVELS};
