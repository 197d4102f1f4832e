//! Output formatting for CLI commands.
//!
//! Text output reuses the MCP tool renderers; `--json` prints the raw data.

use academic_calendar::mcp::render;
use academic_calendar::{CalendarStats, Event};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// Print the init-db result.
pub fn print_init_db(database: &str, table: &str, existed: bool, json: bool) {
    if json {
        print_json(&serde_json::json!({
            "database": database,
            "table": table,
            "existed": existed,
        }));
    } else if existed {
        println!("Table '{}' already exists in {}", table, database);
    } else {
        println!("Created table '{}' in {}", table, database);
    }
}

/// Print an event listing.
pub fn print_event_list(events: &[Event], calendar_name: &str, json: bool) {
    if json {
        print_json(events);
    } else {
        println!("{}", render::event_list(events, calendar_name));
    }
}

/// Print the events stored under one id.
pub fn print_event_details(events: &[Event], calendar_name: &str, json: bool) {
    if json {
        print_json(events);
    } else {
        let details = events
            .iter()
            .map(|e| render::event_details(e, calendar_name))
            .collect::<Vec<_>>()
            .join("\n\n");
        println!("{}", details);
    }
}

/// Print a created event.
pub fn print_event_created(event: &Event, json: bool) {
    if json {
        print_json(event);
    } else {
        println!("{}", render::event_created(event));
    }
}

/// Print an updated event.
pub fn print_event_updated(event: &Event, json: bool) {
    if json {
        print_json(event);
    } else {
        println!("{}", render::event_updated(event));
    }
}

/// Print a delete confirmation.
pub fn print_event_deleted(id: &str, message: &str, json: bool) {
    if json {
        print_json(&serde_json::json!({ "message": message }));
    } else {
        println!("{}", render::event_deleted(id));
    }
}

/// Print upcoming events.
pub fn print_upcoming(events: &[Event], days: i64, category: Option<&str>, json: bool) {
    if json {
        print_json(events);
    } else {
        println!("{}", render::upcoming(events, days, category));
    }
}

/// Print events on a date.
pub fn print_on_date(events: &[Event], date: &str, json: bool) {
    if json {
        print_json(events);
    } else {
        println!("{}", render::events_on_date(events, date));
    }
}

/// Print search results.
pub fn print_search_results(events: &[Event], query: &str, json: bool) {
    if json {
        print_json(events);
    } else {
        println!("{}", render::search_results(events, query));
    }
}

/// Print calendar statistics.
pub fn print_stats(stats: &CalendarStats, calendar_name: &str, json: bool) {
    if json {
        print_json(stats);
    } else {
        println!("{}", render::statistics(stats, calendar_name));
    }
}
