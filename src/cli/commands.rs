//! CLI command dispatcher.
//!
//! This module dispatches CLI commands to either local or remote execution.

use std::sync::Arc;

use academic_calendar::{
    calendar::{
        filter_events, format_timestamp, local_now, on_date, search, statistics,
        upcoming_within,
    },
    create_storage,
    mcp::MAX_UPCOMING_DAYS,
    Category, Config, Event, EventManager, HttpScheduleClient, LocalScheduleApi,
    RecordStore, ScheduleApi, StatsPeriod, StatusFilter,
};
use anyhow::{anyhow, bail, Result};
use chrono::Utc;

use super::output;
use crate::EventsCommand;

/// Execution mode for CLI commands.
#[derive(Clone)]
pub enum ExecutionMode {
    /// Execute directly against the configured store
    Local(Box<Config>),
    /// Execute through the REST API at `mcp.api_base_url`
    Remote(Box<Config>),
}

impl ExecutionMode {
    fn config(&self) -> &Config {
        match self {
            ExecutionMode::Local(config) | ExecutionMode::Remote(config) => config,
        }
    }

    async fn api(&self) -> Result<Arc<dyn ScheduleApi>> {
        match self {
            ExecutionMode::Local(config) => {
                let events = open_events(config).await?;
                events.init_schema().await?;
                Ok(Arc::new(LocalScheduleApi::new(events)))
            }
            ExecutionMode::Remote(config) => {
                Ok(Arc::new(HttpScheduleClient::from_config(&config.mcp)?))
            }
        }
    }
}

async fn open_events(config: &Config) -> Result<Arc<EventManager<dyn RecordStore>>> {
    let store = create_storage(config).await?;
    Ok(Arc::new(EventManager::with_table(
        store,
        config.storage.table_name.clone(),
    )))
}

fn parse_category(value: &str) -> Result<String> {
    let category: Category = value.parse().map_err(|e: String| anyhow!(e))?;
    Ok(category.as_str().to_string())
}

/// Run the init-db command.
pub async fn run_init_db(config: &Config, json_output: bool) -> Result<()> {
    let events = open_events(config).await?;
    let existed = events.init_schema().await?;
    output::print_init_db(
        &config.database_path().display().to_string(),
        events.table(),
        existed,
        json_output,
    );
    Ok(())
}

/// Run an events subcommand.
pub async fn run_events(
    mode: ExecutionMode,
    action: EventsCommand,
    json_output: bool,
) -> Result<()> {
    let api = mode.api().await?;
    let calendar_name = mode.config().mcp.calendar_name.as_str();

    match action {
        EventsCommand::List { category, status } => {
            let category = category.as_deref().map(parse_category).transpose()?;
            let status = status
                .as_deref()
                .map(|s| s.parse::<StatusFilter>().map_err(|e| anyhow!(e)))
                .transpose()?;

            let events = api.list().await?;
            let events = filter_events(&events, category.as_deref(), status);
            output::print_event_list(&events, calendar_name, json_output);
        }
        EventsCommand::Get { id } => {
            let events = api.get(&id).await?;
            output::print_event_details(&events, calendar_name, json_output);
        }
        EventsCommand::Create {
            id,
            name,
            content,
            category,
            level,
            start,
            end,
        } => {
            let event = Event {
                sid: id.unwrap_or_else(|| format!("cli-event-{}", Utc::now().timestamp_millis())),
                name,
                content: content.unwrap_or_default(),
                category: parse_category(&category)?,
                level,
                status: 0.0,
                creation_time: format_timestamp(local_now()),
                start_time: start,
                end_time: end,
            };
            let created = api.create(&event).await?;
            output::print_event_created(&created, json_output);
        }
        EventsCommand::Update {
            id,
            name,
            content,
            category,
            level,
            status,
            start,
            end,
        } => {
            let current = api
                .get(&id)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| anyhow!("Event not found: {}", id))?;

            let category = match category {
                Some(c) => parse_category(&c)?,
                None => current.category,
            };
            let merged = Event {
                sid: id.clone(),
                name: name.unwrap_or(current.name),
                content: content.unwrap_or(current.content),
                category,
                level: level.unwrap_or(current.level),
                status: status.unwrap_or(current.status),
                creation_time: current.creation_time,
                start_time: start.unwrap_or(current.start_time),
                end_time: end.unwrap_or(current.end_time),
            };
            let updated = api.update(&id, &merged).await?;
            output::print_event_updated(&updated, json_output);
        }
        EventsCommand::Delete { id } => {
            let message = api.delete(&id).await?;
            output::print_event_deleted(&id, &message, json_output);
        }
    }

    Ok(())
}

/// Run the upcoming command.
pub async fn run_upcoming(
    mode: ExecutionMode,
    days: i64,
    category: Option<String>,
    json_output: bool,
) -> Result<()> {
    if !(1..=MAX_UPCOMING_DAYS).contains(&days) {
        bail!("days must be between 1 and {}", MAX_UPCOMING_DAYS);
    }
    let category = category.as_deref().map(parse_category).transpose()?;

    let events = mode.api().await?.list().await?;
    let upcoming = upcoming_within(&events, local_now(), days, category.as_deref());
    output::print_upcoming(&upcoming, days, category.as_deref(), json_output);
    Ok(())
}

/// Run the on-date command.
pub async fn run_on_date(mode: ExecutionMode, date: String, json_output: bool) -> Result<()> {
    let events = mode.api().await?.list().await?;
    let matching = on_date(&events, &date);
    output::print_on_date(&matching, &date, json_output);
    Ok(())
}

/// Run the search command.
pub async fn run_search(mode: ExecutionMode, query: String, json_output: bool) -> Result<()> {
    let events = mode.api().await?.list().await?;
    let matching = search(&events, &query);
    output::print_search_results(&matching, &query, json_output);
    Ok(())
}

/// Run the stats command.
pub async fn run_stats(mode: ExecutionMode, period: String, json_output: bool) -> Result<()> {
    let period: StatsPeriod = period.parse().map_err(|e: String| anyhow!(e))?;
    let events = mode.api().await?.list().await?;
    let stats = statistics(&events, period);
    output::print_stats(&stats, &mode.config().mcp.calendar_name, json_output);
    Ok(())
}
