//! Tests for the MCP server and its HTTP client against a live REST server.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use academic_calendar::calendar::{Event, EventManager};
use academic_calendar::client::{HttpScheduleClient, LocalScheduleApi, ScheduleApi};
use academic_calendar::config::Config;
use academic_calendar::error::{ApiError, CalendarError};
use academic_calendar::mcp::{mcp_http_router, CalendarMcpServer};
use academic_calendar::storage::{MemoryStore, RecordStore};
use academic_calendar::{create_rest_router, RestApiConfig};

fn event(sid: &str) -> Event {
    Event {
        sid: sid.to_string(),
        name: "Database Systems".to_string(),
        content: String::new(),
        category: "Lecture".to_string(),
        level: 1,
        status: 0.0,
        creation_time: "2024-01-01 08:00:00".to_string(),
        start_time: "2024-02-01 09:00:00".to_string(),
        end_time: "2024-02-01 10:00:00".to_string(),
    }
}

/// Start a REST server on an ephemeral port and return its base URL.
async fn spawn_rest_server() -> String {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let events = Arc::new(EventManager::new(store));
    events.init_schema().await.unwrap();
    let app = create_rest_router(events, &RestApiConfig::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn status_of(err: &CalendarError) -> Option<u16> {
    match err {
        CalendarError::Api(e) => e.status(),
        _ => None,
    }
}

#[test]
fn test_server_info() {
    use rmcp::ServerHandler;

    let events = Arc::new(EventManager::new(Arc::new(MemoryStore::new())));
    let server = CalendarMcpServer::new(
        Arc::new(LocalScheduleApi::new(events)),
        "Redwood Digital University",
    );

    let info = server.get_info();
    assert!(!info.server_info.name.is_empty(), "Server should have a name");
    assert!(info.capabilities.tools.is_some());
    let instructions = info.instructions.unwrap();
    assert!(instructions.contains("Redwood Digital University"));
    assert!(instructions.contains("get_upcoming_events"));
}

#[test]
fn test_server_from_default_config() {
    let server = CalendarMcpServer::from_config(&Config::default()).unwrap();
    assert_eq!(server.calendar_name(), "Redwood Digital University");
}

#[tokio::test]
async fn test_http_client_round_trip() {
    let base_url = spawn_rest_server().await;
    let client = HttpScheduleClient::new(&base_url, 5).unwrap();

    let info = client.info().await.unwrap();
    assert_eq!(info["app_name"], "calendar");

    let created = client.create(&event("e1")).await.unwrap();
    assert_eq!(created, event("e1"));

    let fetched = client.get("e1").await.unwrap();
    assert_eq!(fetched, vec![event("e1")]);

    let mut changed = event("e1");
    changed.status = 0.5;
    let updated = client.update("e1", &changed).await.unwrap();
    assert_eq!(updated.status, 0.5);

    assert_eq!(client.list().await.unwrap().len(), 1);
    assert_eq!(
        client.delete("e1").await.unwrap(),
        "Schedule deleted successfully"
    );
    assert!(client.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_http_client_surfaces_status_errors() {
    let base_url = spawn_rest_server().await;
    let client = HttpScheduleClient::new(&base_url, 5).unwrap();

    let err = client.get("missing").await.unwrap_err();
    assert_eq!(status_of(&err), Some(404));
    assert!(matches!(
        err,
        CalendarError::Api(ApiError::Status { ref message, .. }) if message == "Schedule not found"
    ));

    client.create(&event("e1")).await.unwrap();
    let err = client.create(&event("e1")).await.unwrap_err();
    assert_eq!(status_of(&err), Some(400));

    let mut bad = event("e1");
    bad.level = 5;
    let err = client.update("e1", &bad).await.unwrap_err();
    assert_eq!(status_of(&err), Some(404));
}

#[tokio::test]
async fn test_http_client_encodes_ids() {
    let base_url = spawn_rest_server().await;
    let client = HttpScheduleClient::new(&base_url, 5).unwrap();

    client.create(&event("week 1/lab")).await.unwrap();
    let fetched = client.get("week 1/lab").await.unwrap();
    assert_eq!(fetched[0].sid, "week 1/lab");
}

#[tokio::test]
async fn test_mcp_http_router_health() {
    let events = Arc::new(EventManager::new(Arc::new(MemoryStore::new())));
    let server = CalendarMcpServer::new(Arc::new(LocalScheduleApi::new(events)), "Test");
    let app = mcp_http_router(server);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"OK");

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let info: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(info["name"], "academic-calendar");
}
