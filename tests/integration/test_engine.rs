//! Tests for the event engine over a SQLite database file.

use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use academic_calendar::calendar::{CalendarQueryEngine, Event, EventManager, MutationOutcome};
use academic_calendar::storage::{RecordStore, SqliteStore};
use academic_calendar::{StatsPeriod, StatusFilter};

fn event(sid: &str, name: &str, category: &str, start: &str, status: f64) -> Event {
    Event {
        sid: sid.to_string(),
        name: name.to_string(),
        content: format!("{} notes", name),
        category: category.to_string(),
        level: 2,
        status,
        creation_time: "2024-01-01 08:00:00".to_string(),
        start_time: start.to_string(),
        end_time: start.to_string(),
    }
}

async fn open(dir: &TempDir) -> Arc<EventManager<SqliteStore>> {
    let store = SqliteStore::open(dir.path().join("CalendarDB.db"), 4)
        .await
        .unwrap();
    Arc::new(EventManager::new(Arc::new(store)))
}

#[tokio::test]
async fn test_init_schema_reports_existing_table() {
    let dir = TempDir::new().unwrap();
    let events = open(&dir).await;

    assert!(!events.init_schema().await.unwrap());
    assert!(events.init_schema().await.unwrap());
    assert!(events.store().table_exists("calendar").await.unwrap());
}

#[tokio::test]
async fn test_lifecycle_persists_across_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let events = open(&dir).await;
        events.init_schema().await.unwrap();
        let outcome = events
            .create(&event("e1", "Compilers", "Lecture", "2024-03-04 09:00:00", 0.0))
            .await
            .unwrap();
        assert_eq!(outcome, MutationOutcome::Applied);

        let mut changed = event("e1", "Compilers II", "Lecture", "2024-03-04 09:00:00", 0.5);
        changed.content = String::new();
        assert!(events.update("e1", &changed).await.unwrap().is_applied());
    }

    let events = open(&dir).await;
    let stored = events.read("e1").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Compilers II");
    assert_eq!(stored[0].status, 0.5);
    assert_eq!(stored[0].content, "");

    assert!(events.delete("e1").await.unwrap().is_applied());
    assert_eq!(
        events.delete("e1").await.unwrap(),
        MutationOutcome::NotFound
    );
    assert!(events.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejections_leave_store_unchanged() {
    let dir = TempDir::new().unwrap();
    let events = open(&dir).await;
    events.init_schema().await.unwrap();

    let original = event("e1", "Seminar", "Seminar", "2024-03-04 09:00:00", 0.0);
    events.create(&original).await.unwrap();

    let duplicate = event("e1", "Other", "Lab", "2024-05-01 09:00:00", 1.0);
    assert_eq!(
        events.create(&duplicate).await.unwrap(),
        MutationOutcome::AlreadyExists
    );

    let mut bad = original.clone();
    bad.level = 7;
    assert!(matches!(
        events.update("e1", &bad).await.unwrap(),
        MutationOutcome::Invalid(_)
    ));

    let mut bad_time = original.clone();
    bad_time.end_time = "2024-03-04T10:00:00".to_string();
    assert!(matches!(
        events.update("e1", &bad_time).await.unwrap(),
        MutationOutcome::Invalid(_)
    ));

    assert_eq!(events.read("e1").await.unwrap(), vec![original]);
}

#[tokio::test]
async fn test_concurrent_creates_single_winner() {
    let dir = TempDir::new().unwrap();
    let events = open(&dir).await;
    events.init_schema().await.unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let events = Arc::clone(&events);
        handles.push(tokio::spawn(async move {
            let candidate = event(
                "race",
                &format!("Attempt {}", i),
                "Lab",
                "2024-03-04 09:00:00",
                0.0,
            );
            events.create(&candidate).await.unwrap()
        }));
    }

    let mut applied = 0;
    for handle in handles {
        if handle.await.unwrap().is_applied() {
            applied += 1;
        }
    }
    assert_eq!(applied, 1);
    assert_eq!(events.read("race").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_query_engine_over_sqlite() {
    let dir = TempDir::new().unwrap();
    let events = open(&dir).await;
    events.init_schema().await.unwrap();

    for e in [
        event("a", "Algorithms", "Lecture", "2024-03-05 10:00:00", 0.0),
        event("b", "Midterm", "Exam", "2024-03-04 09:00:00", 1.0),
        event("c", "Thesis", "Defense", "2024-04-20 14:00:00", 0.5),
        event("d", "Bad start", "Lecture", "soon", 0.0),
    ] {
        // "soon" is rejected by validation and never stored
        events.create(&e).await.unwrap();
    }

    let engine = CalendarQueryEngine::new(Arc::clone(&events));
    let now = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let upcoming = engine.upcoming_at(now, 7, None).await.unwrap();
    let ids: Vec<_> = upcoming.iter().map(|e| e.sid.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);

    let lectures = engine.upcoming_at(now, 7, Some("Lecture")).await.unwrap();
    assert_eq!(lectures.len(), 1);

    assert_eq!(engine.on_date("2024-04-20").await.unwrap().len(), 1);
    assert_eq!(engine.search("THESIS NOTES").await.unwrap().len(), 1);

    let done = engine
        .filter(None, Some(StatusFilter::Completed))
        .await
        .unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].sid, "b");

    let stats = engine.statistics(StatsPeriod::Semester).await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.in_progress, 1);
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.by_category.get("Lecture"), Some(&1));
}

#[tokio::test]
async fn test_missing_table_is_storage_error() {
    let dir = TempDir::new().unwrap();
    let events = open(&dir).await;
    assert!(events.list().await.is_err());
}
