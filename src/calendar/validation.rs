//! Field validation for candidate events.

use crate::error::ValidationError;

use super::types::{parse_timestamp, Event};

/// Allowed priority levels.
pub const LEVELS: [i64; 4] = [0, 1, 2, 3];

/// Check a candidate event's fields.
///
/// Level must be 0-3, status within [0, 1], and all three timestamps must
/// parse as `YYYY-MM-DD HH:MM:SS`. Name, content and category are not
/// checked, and start/end ordering is not enforced.
pub fn validate_event(event: &Event) -> Result<(), ValidationError> {
    if !LEVELS.contains(&event.level) {
        return Err(ValidationError::InvalidLevel(event.level));
    }

    // NaN fails both comparisons
    if !(event.status >= 0.0 && event.status <= 1.0) {
        return Err(ValidationError::StatusOutOfRange(event.status));
    }

    for (field, value) in [
        ("creation_time", &event.creation_time),
        ("start_time", &event.start_time),
        ("end_time", &event.end_time),
    ] {
        if parse_timestamp(value).is_err() {
            return Err(ValidationError::InvalidTimestamp {
                field,
                value: value.clone(),
            });
        }
    }

    Ok(())
}
