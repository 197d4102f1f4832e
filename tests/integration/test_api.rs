//! Tests for the REST router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use academic_calendar::api::{codes, ErrorResponse, MessageResponse, SCHEDULE_DELETED};
use academic_calendar::calendar::{Event, EventManager};
use academic_calendar::storage::{MemoryStore, RecordStore};
use academic_calendar::{create_rest_router, RestApiConfig};

fn event(sid: &str) -> Event {
    Event {
        sid: sid.to_string(),
        name: "Operating Systems".to_string(),
        content: "Chapter 4".to_string(),
        category: "Lecture".to_string(),
        level: 2,
        status: 0.0,
        creation_time: "2024-01-01 08:00:00".to_string(),
        start_time: "2024-02-01 09:00:00".to_string(),
        end_time: "2024-02-01 10:30:00".to_string(),
    }
}

async fn router() -> Router {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let events = Arc::new(EventManager::new(store));
    events.init_schema().await.unwrap();
    create_rest_router(events, &RestApiConfig::default())
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, bytes.to_vec())
}

fn json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn test_root() {
    let app = router().await;
    let (status, body) = send(&app, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = json(&body);
    assert_eq!(value["app_name"], "calendar");
}

#[tokio::test]
async fn test_create_get_list() {
    let app = router().await;

    let (status, body) = send(
        &app,
        "POST",
        "/schedules",
        Some(serde_json::to_value(event("e1")).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json::<Event>(&body), event("e1"));

    let (status, body) = send(&app, "GET", "/schedules/e1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json::<Vec<Event>>(&body), vec![event("e1")]);

    let (status, body) = send(&app, "GET", "/schedules", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json::<Vec<Event>>(&body).len(), 1);
}

#[tokio::test]
async fn test_get_missing_is_404() {
    let app = router().await;
    let (status, body) = send(&app, "GET", "/schedules/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let err: ErrorResponse = json(&body);
    assert_eq!(err.code, codes::NOT_FOUND);
    assert_eq!(err.error, "Schedule not found");
}

#[tokio::test]
async fn test_create_rejections_are_400() {
    let app = router().await;
    send(
        &app,
        "POST",
        "/schedules",
        Some(serde_json::to_value(event("e1")).unwrap()),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/schedules",
        Some(serde_json::to_value(event("e1")).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json::<ErrorResponse>(&body).code, codes::ALREADY_EXISTS);

    let mut bad = event("e2");
    bad.status = 1.5;
    let (status, body) = send(
        &app,
        "POST",
        "/schedules",
        Some(serde_json::to_value(bad).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json::<ErrorResponse>(&body).code, codes::INVALID_DATA);

    let (_, body) = send(&app, "GET", "/schedules", None).await;
    assert_eq!(json::<Vec<Event>>(&body).len(), 1);
}

#[tokio::test]
async fn test_update_semantics() {
    let app = router().await;
    send(
        &app,
        "POST",
        "/schedules",
        Some(serde_json::to_value(event("e1")).unwrap()),
    )
    .await;

    // Body sid is ignored in favour of the path id
    let mut changed = event("ignored");
    changed.status = 1.0;
    let (status, body) = send(
        &app,
        "PUT",
        "/schedules/e1",
        Some(serde_json::to_value(&changed).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated: Event = json(&body);
    assert_eq!(updated.sid, "e1");
    assert_eq!(updated.status, 1.0);

    let (_, body) = send(&app, "GET", "/schedules/e1", None).await;
    assert_eq!(json::<Vec<Event>>(&body)[0].status, 1.0);

    let mut bad = event("e1");
    bad.start_time = "not a time".to_string();
    let (status, body) = send(
        &app,
        "PUT",
        "/schedules/e1",
        Some(serde_json::to_value(bad).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json::<ErrorResponse>(&body).code, codes::INVALID_DATA);

    let (status, _) = send(
        &app,
        "PUT",
        "/schedules/ghost",
        Some(serde_json::to_value(event("ghost")).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete() {
    let app = router().await;
    send(
        &app,
        "POST",
        "/schedules",
        Some(serde_json::to_value(event("e1")).unwrap()),
    )
    .await;

    let (status, body) = send(&app, "DELETE", "/schedules/e1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json::<MessageResponse>(&body).message, SCHEDULE_DELETED);

    let (status, _) = send(&app, "DELETE", "/schedules/e1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_content_defaults_to_empty() {
    let app = router().await;
    let mut value = serde_json::to_value(event("e1")).unwrap();
    value.as_object_mut().unwrap().remove("content");

    let (status, body) = send(&app, "POST", "/schedules", Some(value)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json::<Event>(&body).content, "");
}

#[tokio::test]
async fn test_store_fault_is_500() {
    // Table never created
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let app = create_rest_router(
        Arc::new(EventManager::new(store)),
        &RestApiConfig::default(),
    );

    let (status, body) = send(&app, "GET", "/schedules", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json::<ErrorResponse>(&body).code, codes::STORAGE_ERROR);
}
