//! Text rendering for tool results.
//!
//! Tool output is human-readable text. The CLI reuses these renderers for
//! its non-JSON output.

use crate::calendar::{priority_label, CalendarStats, Event};

/// Maximum events listed by list-style tools.
pub const LIST_LIMIT: usize = 10;

/// Completion percentage, truncated toward zero.
pub fn percent(status: f64) -> i64 {
    (status * 100.0) as i64
}

fn description(event: &Event, fallback: &str) -> String {
    if event.content.is_empty() {
        fallback.to_string()
    } else {
        event.content.clone()
    }
}

/// Time part of a `YYYY-MM-DD HH:MM:SS` value, or the whole value.
fn time_part(timestamp: &str) -> &str {
    timestamp.split_whitespace().nth(1).unwrap_or(timestamp)
}

fn event_summary(event: &Event) -> String {
    format!(
        "• {} ({})\n  📅 {} - {}\n  📋 {}\n  🎯 Priority: {}\n  ✅ Status: {}% complete",
        event.name,
        event.category,
        event.start_time,
        event.end_time,
        description(event, "No description"),
        priority_label(event.level),
        percent(event.status),
    )
}

/// Result of `get_all_events`.
pub fn event_list(events: &[Event], calendar_name: &str) -> String {
    let mut out = format!(
        "Found {} events in {} calendar\n\n",
        events.len(),
        calendar_name
    );
    out.push_str(
        &events
            .iter()
            .take(LIST_LIMIT)
            .map(event_summary)
            .collect::<Vec<_>>()
            .join("\n\n"),
    );
    if events.len() > LIST_LIMIT {
        out.push_str(&format!(
            "\n\n... and {} more events",
            events.len() - LIST_LIMIT
        ));
    }
    out
}

/// Result of `get_event`.
pub fn event_details(event: &Event, calendar_name: &str) -> String {
    let created = if event.creation_time.is_empty() {
        "Unknown"
    } else {
        event.creation_time.as_str()
    };

    format!(
        "📚 {calendar} Event Details:\n\n\
         🎓 **{name}**\n\
         📋 **Category:** {category}\n\
         📝 **Description:** {content}\n\n\
         📅 **Schedule:**\n\
         • Start: {start}\n\
         • End: {end}\n\n\
         🎯 **Priority:** {priority}\n\
         ✅ **Status:** {percent}% complete\n\
         🆔 **Event ID:** {sid}\n\
         🕐 **Created:** {created}",
        calendar = calendar_name,
        name = event.name,
        category = event.category,
        content = description(event, "No description provided"),
        start = event.start_time,
        end = event.end_time,
        priority = priority_label(event.level),
        percent = percent(event.status),
        sid = event.sid,
        created = created,
    )
}

/// Result of `create_event`.
pub fn event_created(event: &Event) -> String {
    format!(
        "✅ Event created successfully!\n\n🎓 **{}**\n📋 Category: {}\n📅 Time: {} - {}\n🆔 Event ID: {}",
        event.name, event.category, event.start_time, event.end_time, event.sid
    )
}

/// Result of `update_event`.
pub fn event_updated(event: &Event) -> String {
    format!(
        "✅ Event updated successfully!\n\n🎓 **{}**\n📋 Category: {}\n✅ Status: {}% complete",
        event.name,
        event.category,
        percent(event.status)
    )
}

/// Result of `delete_event`.
pub fn event_deleted(id: &str) -> String {
    format!("🗑️ Event deleted successfully: {}", id)
}

fn short_list(events: &[Event]) -> String {
    events
        .iter()
        .take(LIST_LIMIT)
        .map(|e| format!("• {} ({})\n  📅 {}", e.name, e.category, e.start_time))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result of `get_upcoming_events`.
pub fn upcoming(events: &[Event], days: i64, category: Option<&str>) -> String {
    let mut summary = format!(
        "📅 Upcoming events in next {} day{}",
        days,
        if days != 1 { "s" } else { "" }
    );
    if let Some(c) = category {
        summary.push_str(&format!(" (filtered by {})", c));
    }
    summary.push_str(&format!(": {} found", events.len()));

    format!("{}\n\n{}", summary, short_list(events))
}

/// Result of `get_events_by_date`.
pub fn events_on_date(events: &[Event], date: &str) -> String {
    let summary = format!("📅 Events on {}: {} found", date, events.len());
    if events.is_empty() {
        return format!("{}\n\nNo events scheduled for this date.", summary);
    }

    let list = events
        .iter()
        .map(|e| {
            format!(
                "• {} ({})\n  🕐 {} - {}",
                e.name,
                e.category,
                time_part(&e.start_time),
                time_part(&e.end_time)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n\n{}", summary, list)
}

/// Result of `search_events`.
pub fn search_results(events: &[Event], query: &str) -> String {
    let summary = format!(
        "🔍 Search results for '{}': {} events found",
        query,
        events.len()
    );
    if events.is_empty() {
        return format!("{}\n\nNo events match your search query.", summary);
    }
    format!("{}\n\n{}", summary, short_list(events))
}

/// Result of `get_calendar_statistics`.
pub fn statistics(stats: &CalendarStats, calendar_name: &str) -> String {
    let categories = stats
        .by_category
        .iter()
        .map(|(category, count)| format!("• {}: {} events", category, count))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "📊 {calendar} Calendar Statistics ({period})\n\n\
         📈 **Overview:**\n\
         • Total Events: {total}\n\
         • Completed: {completed} ({rate:.1}%)\n\
         • In Progress: {in_progress}\n\
         • Pending: {pending}\n\n\
         📋 **By Category:**\n\
         {categories}\n\n\
         🎯 **Academic Activity Level:** {activity}",
        calendar = calendar_name,
        period = stats.period,
        total = stats.total,
        completed = stats.completed,
        rate = stats.completion_rate,
        in_progress = stats.in_progress,
        pending = stats.pending,
        categories = categories,
        activity = stats.activity_level,
    )
}

/// Error text returned to tool callers.
pub fn error(message: impl std::fmt::Display) -> String {
    format!("❌ Error: {}", message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{statistics as compute_stats, StatsPeriod};

    fn event(sid: &str, name: &str) -> Event {
        Event {
            sid: sid.to_string(),
            name: name.to_string(),
            content: String::new(),
            category: "Lecture".to_string(),
            level: 3,
            status: 0.29,
            creation_time: "2024-01-01 08:00:00".to_string(),
            start_time: "2024-01-10 10:00:00".to_string(),
            end_time: "2024-01-10 11:30:00".to_string(),
        }
    }

    #[test]
    fn test_percent_truncates() {
        assert_eq!(percent(0.0), 0);
        assert_eq!(percent(0.5), 50);
        assert_eq!(percent(0.999), 99);
        assert_eq!(percent(1.0), 100);
    }

    #[test]
    fn test_event_list_truncates_to_ten() {
        let events: Vec<_> = (0..13).map(|i| event(&i.to_string(), &format!("E{}", i))).collect();
        let text = event_list(&events, "Redwood Digital University");
        assert!(text.starts_with("Found 13 events in Redwood Digital University calendar"));
        assert!(text.contains("• E9 (Lecture)"));
        assert!(!text.contains("• E10 (Lecture)"));
        assert!(text.ends_with("... and 3 more events"));
        assert!(text.contains("🎯 Priority: High"));
        assert!(text.contains("No description"));
        assert!(!text.contains("\\n"));
    }

    #[test]
    fn test_event_details() {
        let text = event_details(&event("e1", "Compilers"), "Test U");
        assert!(text.starts_with("📚 Test U Event Details:"));
        assert!(text.contains("🆔 **Event ID:** e1"));
        assert!(text.contains("🕐 **Created:** 2024-01-01 08:00:00"));
        assert!(text.contains("No description provided"));
    }

    #[test]
    fn test_upcoming_pluralization() {
        let events = vec![event("a", "A")];
        assert!(upcoming(&events, 1, None).starts_with("📅 Upcoming events in next 1 day: 1 found"));
        assert!(upcoming(&events, 7, Some("Lab"))
            .starts_with("📅 Upcoming events in next 7 days (filtered by Lab): 1 found"));
    }

    #[test]
    fn test_events_on_date_times() {
        let text = events_on_date(&[event("a", "A")], "2024-01-10");
        assert!(text.contains("🕐 10:00:00 - 11:30:00"));
        let empty = events_on_date(&[], "2024-01-11");
        assert!(empty.ends_with("No events scheduled for this date."));
    }

    #[test]
    fn test_search_results_empty() {
        let text = search_results(&[], "chemistry");
        assert!(text.starts_with("🔍 Search results for 'chemistry': 0 events found"));
        assert!(text.ends_with("No events match your search query."));
    }

    #[test]
    fn test_statistics_text() {
        let mut done = event("a", "A");
        done.status = 1.0;
        let stats = compute_stats(&[done, event("b", "B")], StatsPeriod::Semester);
        let text = statistics(&stats, "Test U");
        assert!(text.starts_with("📊 Test U Calendar Statistics (semester)"));
        assert!(text.contains("• Completed: 1 (50.0%)"));
        assert!(text.contains("• Lecture: 2 events"));
        assert!(text.ends_with("🎯 **Academic Activity Level:** Low"));
    }

    #[test]
    fn test_error_prefix() {
        assert_eq!(error("boom"), "❌ Error: boom");
    }
}
