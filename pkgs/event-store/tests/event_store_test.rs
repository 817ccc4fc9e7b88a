// Tests for EventStore: save, lookups, soft deletion and read-back

use std::time::Duration;

use event_store::{
    entities::events, open_database, DivisionStore, EventInput, EventStore, FeedStore,
    StoreConfig, StoreError,
};
use sea_orm::EntityTrait;
use serde_json::json;
use tempfile::NamedTempFile;

async fn create_test_store(path: &NamedTempFile) -> EventStore {
    let config = StoreConfig {
        db_path: path.path().to_path_buf(),
        ..Default::default()
    };

    let db = open_database(&config)
        .await
        .expect("Failed to open database");

    EventStore::new(db)
}

fn fair_input(division_id: Option<i32>) -> EventInput {
    EventInput {
        division_id,
        image_url: None,
        start_date: Some("2024-05-01".to_string()),
        end_date: Some("2024-05-03".to_string()),
        is_public: Some(1),
        is_active: Some(1),
        ..EventInput::new("Fair", "Annual fair")
    }
}

async fn saved_event(store: &EventStore, input: EventInput) -> event_store::Event {
    let mut event = store
        .from_input(input)
        .await
        .expect("Failed to build event");
    store.save(&mut event).await.expect("Failed to save event");
    event
}

#[tokio::test]
async fn test_save_assigns_id_and_round_trips_content() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;

    let mut event = store.from_input(fair_input(None)).await.unwrap();
    assert_eq!(event.id, None);

    store.save(&mut event).await.expect("Failed to save event");

    let id = event.id.expect("save should assign an id");
    assert!(event.created_at.is_some());
    assert!(event.updated_at.is_some());

    let found = store
        .find_by_id(id, false)
        .await
        .expect("Failed to find event")
        .expect("Saved event should be found");

    assert_eq!(found.title, "Fair");
    assert_eq!(found.description, "Annual fair");
    assert_eq!(found.start_date.as_deref(), Some("2024-05-01"));
    assert_eq!(found.end_date.as_deref(), Some("2024-05-03"));
    assert_eq!(found.is_public, Some(1));
    assert_eq!(found, event);
}

#[tokio::test]
async fn test_fair_example_attaches_division_and_empty_feed() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;
    let divisions = DivisionStore::new(store.connection().clone());

    divisions.add("Sports").await.unwrap();
    divisions.add("Music").await.unwrap();
    let division_id = divisions.add("Community").await.unwrap();
    assert_eq!(division_id, 3);

    let event = saved_event(&store, fair_input(Some(3))).await;
    let id = event.id.unwrap();

    let found = store.find_by_id(id, false).await.unwrap().unwrap();

    assert_eq!(found.division_id, Some(3));
    assert_eq!(found.image_url, None);
    let division = found.division.expect("Division should be attached");
    assert_eq!(division.id, 3);
    assert_eq!(division.name, "Community");
    assert_eq!(found.feed, Some(vec![]));
}

#[tokio::test]
async fn test_from_input_resolves_division_but_not_feed() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;
    let divisions = DivisionStore::new(store.connection().clone());
    let division_id = divisions.add("Sports").await.unwrap();

    let event = store.from_input(fair_input(Some(division_id))).await.unwrap();

    assert_eq!(event.id, None);
    assert_eq!(event.division.map(|d| d.name), Some("Sports".to_string()));
    assert_eq!(event.feed, None);

    let all = store.find_all(true).await.unwrap();
    assert!(all.is_empty(), "from_input must not write anything");
}

#[tokio::test]
async fn test_from_json_input_saves() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;

    let input = EventInput::from_json(json!({
        "title": "Hackathon",
        "description": "Two days of building",
        "image_url": "https://example.org/hack.png",
    }))
    .unwrap();

    let event = saved_event(&store, input).await;

    assert_eq!(event.image_url.as_deref(), Some("https://example.org/hack.png"));
    assert_eq!(event.division, None);
    // the store default applies when no flag was given
    assert_eq!(event.is_active, Some(1));
}

#[tokio::test]
async fn test_update_reflects_mutation_and_advances_updated_at() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;

    let mut event = saved_event(&store, fair_input(None)).await;
    let id = event.id.unwrap();
    let created_at = event.created_at.clone();
    let first_update = event.updated_at.clone().unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;

    event.title = "Spring Fair".to_string();
    event.end_date = None;
    store.save(&mut event).await.expect("Failed to update event");

    assert_eq!(event.id, Some(id));
    assert_eq!(event.created_at, created_at);
    let second_update = event.updated_at.clone().unwrap();
    assert!(second_update > first_update);

    let found = store.find_by_id(id, false).await.unwrap().unwrap();
    assert_eq!(found.title, "Spring Fair");
    assert_eq!(found.end_date, None);
    assert_eq!(found.updated_at, Some(second_update));
}

#[tokio::test]
async fn test_save_refreshes_division_when_reassigned() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;
    let divisions = DivisionStore::new(store.connection().clone());
    let sports = divisions.add("Sports").await.unwrap();
    let music = divisions.add("Music").await.unwrap();

    let mut event = saved_event(&store, fair_input(Some(sports))).await;
    assert_eq!(event.division.as_ref().map(|d| d.id), Some(sports));

    event.division_id = Some(music);
    store.save(&mut event).await.unwrap();
    assert_eq!(event.division.as_ref().map(|d| d.id), Some(music));

    event.division_id = None;
    store.save(&mut event).await.unwrap();
    assert_eq!(event.division, None);
}

#[tokio::test]
async fn test_delete_hides_event_from_filtered_lookup() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;

    let mut event = saved_event(&store, fair_input(None)).await;
    let id = event.id.unwrap();

    let deleted = store.delete(&mut event).await.expect("Failed to delete");
    assert!(deleted);
    assert_eq!(event.is_active, Some(0));
    assert!(!event.is_live());

    let filtered = store.find_by_id(id, false).await.unwrap();
    assert!(filtered.is_none(), "Soft-deleted event should be hidden");

    let unfiltered = store
        .find_by_id(id, true)
        .await
        .unwrap()
        .expect("Soft-deleted row should still exist");
    assert_eq!(unfiltered.is_active, Some(0));
    assert_eq!(unfiltered.feed, Some(vec![]));
}

#[tokio::test]
async fn test_delete_unpersisted_event_reports_failure() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;

    let mut event = store.from_input(fair_input(None)).await.unwrap();

    let deleted = store.delete(&mut event).await.unwrap();
    assert!(!deleted);
    assert_eq!(event.id, None);

    let all = store.find_all(true).await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_save_can_reactivate_deleted_event() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;

    let mut event = saved_event(&store, fair_input(None)).await;
    let id = event.id.unwrap();
    store.delete(&mut event).await.unwrap();

    event.is_active = Some(1);
    store.save(&mut event).await.unwrap();

    assert!(store.find_by_id(id, false).await.unwrap().is_some());
}

#[tokio::test]
async fn test_null_active_flag_counts_as_live() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;

    let mut event = saved_event(&store, fair_input(None)).await;
    let id = event.id.unwrap();

    event.is_active = None;
    store.save(&mut event).await.unwrap();
    assert_eq!(event.is_active, None);

    let found = store.find_by_id(id, false).await.unwrap();
    assert!(found.is_some());
    assert_eq!(store.find_all(false).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_find_all_filters_and_orders() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;

    let first = saved_event(&store, EventInput::new("First", "one")).await;
    let mut second = saved_event(&store, EventInput::new("Second", "two")).await;
    let third = saved_event(&store, EventInput::new("Third", "three")).await;
    store.delete(&mut second).await.unwrap();

    let live: Vec<_> = store
        .find_all(false)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(live, vec![first.id, third.id]);

    let everything: Vec<_> = store
        .find_all(true)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.title)
        .collect();
    assert_eq!(everything, vec!["First", "Second", "Third"]);
}

#[tokio::test]
async fn test_find_all_by_division_returns_live_events_of_group() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;
    let divisions = DivisionStore::new(store.connection().clone());
    let sports = divisions.add("Sports").await.unwrap();
    let music = divisions.add("Music").await.unwrap();

    let match_day = saved_event(&store, fair_input(Some(sports))).await;
    let mut cancelled = saved_event(&store, fair_input(Some(sports))).await;
    let tournament = saved_event(&store, fair_input(Some(sports))).await;
    saved_event(&store, fair_input(Some(music))).await;
    saved_event(&store, fair_input(None)).await;
    store.delete(&mut cancelled).await.unwrap();

    let events = store.find_all_by_division(sports, false).await.unwrap();
    let ids: Vec<_> = events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![match_day.id, tournament.id]);
    for event in &events {
        assert_eq!(event.division_id, Some(sports));
        assert_eq!(event.division.as_ref().map(|d| d.id), Some(sports));
    }

    let with_inactive = store.find_all_by_division(sports, true).await.unwrap();
    assert_eq!(with_inactive.len(), 3);

    let empty = store.find_all_by_division(music + 100, false).await.unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_feed_is_attached_in_order() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;
    let feeds = FeedStore::new(store.connection().clone());

    let mut event = saved_event(&store, fair_input(None)).await;
    let id = event.id.unwrap();
    let other = saved_event(&store, EventInput::new("Other", "unrelated")).await;

    feeds.add(id, "Gates open at 9").await.unwrap();
    feeds.add(other.id.unwrap(), "Not for the fair").await.unwrap();
    feeds.add(id, "Parking is full").await.unwrap();

    // attached feed is a snapshot until the event is re-read
    assert_eq!(event.feed, Some(vec![]));

    let synced = store.resynchronize(&mut event).await.unwrap();
    assert!(synced);
    let contents: Vec<_> = event
        .feed
        .as_ref()
        .unwrap()
        .iter()
        .map(|item| item.content.as_str())
        .collect();
    assert_eq!(contents, vec!["Gates open at 9", "Parking is full"]);

    store.delete(&mut event).await.unwrap();
    let deleted = store.find_by_id(id, true).await.unwrap().unwrap();
    assert_eq!(deleted.feed.map(|f| f.len()), Some(2));
}

#[tokio::test]
async fn test_resynchronize_vanished_row_keeps_stale_fields() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;

    let mut event = saved_event(&store, fair_input(None)).await;
    let id = event.id.unwrap();

    events::Entity::delete_by_id(id)
        .exec(store.connection())
        .await
        .unwrap();

    let before = event.clone();
    let synced = store.resynchronize(&mut event).await.unwrap();
    assert!(!synced);
    assert_eq!(event, before);

    event.title = "Renamed".to_string();
    let result = store.save(&mut event).await;
    assert!(matches!(result, Err(StoreError::StaleReference(stale)) if stale == id));
    assert_eq!(event.title, "Renamed");
}

#[tokio::test]
async fn test_resynchronize_unpersisted_event() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;

    let mut event = store.from_input(fair_input(None)).await.unwrap();
    assert!(!store.resynchronize(&mut event).await.unwrap());
}

#[tokio::test]
async fn test_find_by_id_unknown_returns_none() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = create_test_store(&temp_file).await;

    assert!(store.find_by_id(42, false).await.unwrap().is_none());
    assert!(store.find_by_id(42, true).await.unwrap().is_none());
}

#[tokio::test]
async fn test_in_memory_store() {
    let store = EventStore::with_config(StoreConfig::in_memory())
        .await
        .expect("Failed to open in-memory store");

    let event = saved_event(&store, fair_input(None)).await;

    let found = store.find_by_id(event.id.unwrap(), false).await.unwrap();
    assert_eq!(found, Some(event));
}
