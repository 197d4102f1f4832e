//! Tests for the MCP server driven by an rmcp client over an in-memory duplex.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::model::{CallToolRequestParam, RawContent};
use rmcp::service::RunningService;
use rmcp::{RoleClient, ServiceExt};

use academic_calendar::calendar::{Event, EventManager};
use academic_calendar::client::{LocalScheduleApi, ScheduleApi};
use academic_calendar::error::Result;
use academic_calendar::mcp::CalendarMcpServer;
use academic_calendar::storage::MemoryStore;

/// Schedule API that counts every call before forwarding it.
struct CountingApi {
    inner: LocalScheduleApi<MemoryStore>,
    calls: AtomicUsize,
}

impl CountingApi {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ScheduleApi for CountingApi {
    async fn info(&self) -> Result<serde_json::Value> {
        self.tick();
        self.inner.info().await
    }

    async fn list(&self) -> Result<Vec<Event>> {
        self.tick();
        self.inner.list().await
    }

    async fn get(&self, id: &str) -> Result<Vec<Event>> {
        self.tick();
        self.inner.get(id).await
    }

    async fn create(&self, event: &Event) -> Result<Event> {
        self.tick();
        self.inner.create(event).await
    }

    async fn update(&self, id: &str, event: &Event) -> Result<Event> {
        self.tick();
        self.inner.update(id, event).await
    }

    async fn delete(&self, id: &str) -> Result<String> {
        self.tick();
        self.inner.delete(id).await
    }
}

/// Serve a calendar server on one end of a duplex pipe and connect a client
/// to the other.
async fn connect() -> (RunningService<RoleClient, ()>, Arc<CountingApi>) {
    let events = Arc::new(EventManager::new(Arc::new(MemoryStore::new())));
    events.init_schema().await.unwrap();
    let api = Arc::new(CountingApi {
        inner: LocalScheduleApi::new(events),
        calls: AtomicUsize::new(0),
    });
    let server = CalendarMcpServer::new(api.clone(), "Test University");

    let (server_io, client_io) = tokio::io::duplex(4096);
    tokio::spawn(async move {
        if let Ok(running) = server.serve(server_io).await {
            let _ = running.waiting().await;
        }
    });

    let client = ().serve(client_io).await.unwrap();
    (client, api)
}

fn call(name: &'static str, arguments: serde_json::Value) -> CallToolRequestParam {
    serde_json::from_value(serde_json::json!({
        "name": name,
        "arguments": arguments,
    }))
    .unwrap()
}

fn text_of(content: &[rmcp::model::Content]) -> String {
    content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.clone()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn test_lists_all_tools() {
    let (client, _) = connect().await;

    let tools = client.list_tools(Default::default()).await.unwrap().tools;
    let mut names: Vec<String> = tools.iter().map(|t| t.name.to_string()).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "create_event",
            "delete_event",
            "get_all_events",
            "get_calendar_statistics",
            "get_event",
            "get_events_by_date",
            "get_upcoming_events",
            "search_events",
            "update_event",
        ]
    );

    client.cancel().await.unwrap();
}

#[tokio::test]
async fn test_missing_arguments_are_rejected_before_the_store() {
    let (client, api) = connect().await;

    let result = client
        .call_tool(call("get_event", serde_json::json!({})))
        .await;
    assert!(result.is_err(), "missing event_id should be a protocol error");

    let result = client
        .call_tool(call("get_upcoming_events", serde_json::json!({ "days": 0 })))
        .await;
    assert!(result.is_err(), "days out of range should be a protocol error");

    assert_eq!(api.calls(), 0);
    client.cancel().await.unwrap();
}

#[tokio::test]
async fn test_create_then_list_over_protocol() {
    let (client, api) = connect().await;

    let created = client
        .call_tool(call(
            "create_event",
            serde_json::json!({
                "name": "Compilers Midterm",
                "category": "Lecture",
                "level": 3,
                "start_time": "2030-03-04 09:00:00",
                "end_time": "2030-03-04 11:00:00",
            }),
        ))
        .await
        .unwrap();
    assert_ne!(created.is_error, Some(true));
    assert!(text_of(&created.content).contains("Compilers Midterm"));

    let listed = client
        .call_tool(call("get_all_events", serde_json::json!({})))
        .await
        .unwrap();
    assert!(text_of(&listed.content).contains("Compilers Midterm"));
    assert!(api.calls() >= 2);

    let missing = client
        .call_tool(call("get_event", serde_json::json!({ "event_id": "ghost" })))
        .await
        .unwrap();
    assert_eq!(missing.is_error, Some(true));

    client.cancel().await.unwrap();
}
