//! Calendar types for academic schedule management.
//!
//! This module defines the persisted event record, the fixed category set
//! offered to tool callers, and the result types of the query engine.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, ValidationError};
use crate::storage::{ColumnSpec, ColumnType, ColumnValue, Row};

/// Timestamp layout used by every time field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default events table name.
pub const DEFAULT_TABLE: &str = "calendar";

// ============================================================================
// Event
// ============================================================================

/// A single calendar event (one row of the events table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Event {
    /// Unique identifier, immutable after creation.
    pub sid: String,
    /// Event name.
    pub name: String,
    /// Free-text description.
    #[serde(default)]
    pub content: String,
    /// Category label. Any string is accepted here.
    pub category: String,
    /// Priority: 0 (none), 1 (Low), 2 (Medium), 3 (High).
    pub level: i64,
    /// Completion fraction in [0, 1].
    pub status: f64,
    /// When the event was created (`YYYY-MM-DD HH:MM:SS`).
    pub creation_time: String,
    /// Start time (`YYYY-MM-DD HH:MM:SS`).
    pub start_time: String,
    /// End time (`YYYY-MM-DD HH:MM:SS`).
    pub end_time: String,
}

impl Event {
    /// Table columns for the events table.
    pub fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::primary_key("sid", ColumnType::Text),
            ColumnSpec::new("name", ColumnType::Text),
            ColumnSpec::new("content", ColumnType::Text),
            ColumnSpec::new("category", ColumnType::Text),
            ColumnSpec::new("level", ColumnType::Integer),
            ColumnSpec::new("status", ColumnType::Real),
            ColumnSpec::new("creation_time", ColumnType::Text),
            ColumnSpec::new("start_time", ColumnType::Text),
            ColumnSpec::new("end_time", ColumnType::Text),
        ]
    }

    /// Full row for insert.
    pub fn to_row(&self) -> Row {
        self.fields_row().with("sid", self.sid.as_str())
    }

    /// Every column except `sid`, for full-row replacement.
    pub fn fields_row(&self) -> Row {
        Row::new()
            .with("name", self.name.as_str())
            .with("content", self.content.as_str())
            .with("category", self.category.as_str())
            .with("level", self.level)
            .with("status", self.status)
            .with("creation_time", self.creation_time.as_str())
            .with("start_time", self.start_time.as_str())
            .with("end_time", self.end_time.as_str())
    }

    /// Decode a stored row.
    ///
    /// Missing or NULL text columns read as empty, NULL numbers as zero.
    /// A value of the wrong type is a schema mismatch.
    pub fn from_row(row: &Row) -> std::result::Result<Self, StorageError> {
        let sid = match row.get("sid") {
            Some(ColumnValue::Text(s)) => s.clone(),
            Some(ColumnValue::Integer(i)) => i.to_string(),
            _ => return Err(StorageError::SchemaMismatch("row has no sid".to_string())),
        };

        Ok(Self {
            name: text(row, "name")?,
            content: text(row, "content")?,
            category: text(row, "category")?,
            level: match row.get("level") {
                None | Some(ColumnValue::Null) => 0,
                Some(v) => v.as_integer().ok_or_else(|| mismatch("level", v))?,
            },
            status: match row.get("status") {
                None | Some(ColumnValue::Null) => 0.0,
                Some(v) => v.as_real().ok_or_else(|| mismatch("status", v))?,
            },
            creation_time: text(row, "creation_time")?,
            start_time: text(row, "start_time")?,
            end_time: text(row, "end_time")?,
            sid,
        })
    }

    /// Parsed start time, if it is well formed.
    pub fn start(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.start_time).ok()
    }

    /// Date token of the start time (text before the first whitespace).
    ///
    /// `None` when the start time is blank.
    pub fn start_date(&self) -> Option<&str> {
        self.start_time.split_whitespace().next()
    }

    /// Completion bucket for this event's status.
    pub fn progress(&self) -> Option<StatusFilter> {
        StatusFilter::classify(self.status)
    }
}

fn text(row: &Row, column: &str) -> std::result::Result<String, StorageError> {
    match row.get(column) {
        None | Some(ColumnValue::Null) => Ok(String::new()),
        Some(ColumnValue::Text(s)) => Ok(s.clone()),
        Some(v) => Err(mismatch(column, v)),
    }
}

fn mismatch(column: &str, value: &ColumnValue) -> StorageError {
    StorageError::SchemaMismatch(format!("unexpected value for {}: {:?}", column, value))
}

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp.
pub fn parse_timestamp(value: &str) -> std::result::Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
}

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Display label for a priority level.
pub fn priority_label(level: i64) -> &'static str {
    match level {
        1 => "Low",
        2 => "Medium",
        3 => "High",
        _ => "",
    }
}

// ============================================================================
// Categories and filters
// ============================================================================

/// Academic event categories offered to tool callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Category {
    Lecture,
    Lab,
    Meeting,
    #[serde(rename = "Office Hours")]
    OfficeHours,
    Assignment,
    Defense,
    Workshop,
    #[serde(rename = "Study Group")]
    StudyGroup,
    Seminar,
    Grading,
    Advising,
}

impl Category {
    pub const ALL: [Category; 11] = [
        Category::Lecture,
        Category::Lab,
        Category::Meeting,
        Category::OfficeHours,
        Category::Assignment,
        Category::Defense,
        Category::Workshop,
        Category::StudyGroup,
        Category::Seminar,
        Category::Grading,
        Category::Advising,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Lecture => "Lecture",
            Category::Lab => "Lab",
            Category::Meeting => "Meeting",
            Category::OfficeHours => "Office Hours",
            Category::Assignment => "Assignment",
            Category::Defense => "Defense",
            Category::Workshop => "Workshop",
            Category::StudyGroup => "Study Group",
            Category::Seminar => "Seminar",
            Category::Grading => "Grading",
            Category::Advising => "Advising",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// Completion-status buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// status == 0
    NotStarted,
    /// 0 < status < 1
    InProgress,
    /// status == 1
    Completed,
}

impl StatusFilter {
    /// Bucket for a status value. Out-of-range values have none.
    pub fn classify(status: f64) -> Option<Self> {
        if status == 0.0 {
            Some(StatusFilter::NotStarted)
        } else if status > 0.0 && status < 1.0 {
            Some(StatusFilter::InProgress)
        } else if status == 1.0 {
            Some(StatusFilter::Completed)
        } else {
            None
        }
    }

    pub fn matches(&self, status: f64) -> bool {
        Self::classify(status) == Some(*self)
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "not_started" => Ok(StatusFilter::NotStarted),
            "in_progress" => Ok(StatusFilter::InProgress),
            "completed" => Ok(StatusFilter::Completed),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

/// Statistics period label.
///
/// Recorded on the result only; it does not narrow the event population.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum StatsPeriod {
    Week,
    #[default]
    Month,
    Semester,
}

impl StatsPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsPeriod::Week => "week",
            StatsPeriod::Month => "month",
            StatsPeriod::Semester => "semester",
        }
    }
}

impl fmt::Display for StatsPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatsPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "week" => Ok(StatsPeriod::Week),
            "month" => Ok(StatsPeriod::Month),
            "semester" => Ok(StatsPeriod::Semester),
            other => Err(format!("unknown period: {}", other)),
        }
    }
}

// ============================================================================
// Mutation outcome
// ============================================================================

/// Result of a create, update or delete that did not fault.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// The mutation was stored.
    Applied,
    /// No event with the target id exists.
    NotFound,
    /// An event with the candidate id already exists.
    AlreadyExists,
    /// The candidate failed field validation.
    Invalid(ValidationError),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Activity tier derived from the total event count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Low,
    Medium,
    High,
}

impl ActivityLevel {
    pub fn from_total(total: usize) -> Self {
        if total > 50 {
            ActivityLevel::High
        } else if total > 20 {
            ActivityLevel::Medium
        } else {
            ActivityLevel::Low
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityLevel::Low => "Low",
            ActivityLevel::Medium => "Medium",
            ActivityLevel::High => "High",
        };
        f.write_str(s)
    }
}

/// Aggregate statistics over the whole event collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarStats {
    /// Requested period label.
    pub period: StatsPeriod,
    /// Total number of events.
    pub total: usize,
    /// Events with status == 1.
    pub completed: usize,
    /// Events with 0 < status < 1.
    pub in_progress: usize,
    /// Events with status == 0.
    pub pending: usize,
    /// Event count per observed category, sorted by name.
    pub by_category: BTreeMap<String, usize>,
    /// completed / total * 100, or 0 when there are no events.
    pub completion_rate: f64,
    /// Activity tier.
    pub activity_level: ActivityLevel,
}
