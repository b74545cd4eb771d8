//! Integration tests for the board: backlog edits, moods, events.

use chrono::{Duration, TimeZone, Utc};
use moodboard::activity::DateKey;
use moodboard::board::Board;
use moodboard::config::MoodCatalog;
use moodboard::error::Error;
use moodboard::event::EventKind;
use moodboard::filter::{FilterState, StatusFilter};
use moodboard::model::*;

fn key(s: &str) -> DateKey {
    s.parse().unwrap()
}

fn test_board() -> Board {
    Board::new(
        MoodCatalog::default(),
        chrono_tz::Europe::Paris,
        key("2024-06-01"),
    )
}

// ---------------------------------------------------------------------------
// Backlog lifecycle: add → progress → complete → delete
// ---------------------------------------------------------------------------

#[test]
fn add_puts_new_items_first_in_backlog_state() {
    let mut board = test_board();
    let first = board.add_item(NewCatalogItem::new("Dune", Category::Book).moods([1, 2]));
    let second = board.add_item(
        NewCatalogItem::new("Arrival", Category::Movie)
            .tags([SmartTag::LateNight])
            .favorite(true),
    );

    assert_eq!(board.items()[0].id, second.id);
    assert_eq!(board.items()[1].id, first.id);
    assert_eq!(first.status, Status::Backlog);
    assert_eq!(first.progress, 0);
    assert!(first.completed_at.is_none());
    assert!(second.is_favorite);

    let events = board.drain_events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].seq, 1);
    assert_eq!(events[1].seq, 2);
    assert!(matches!(events[0].kind, EventKind::ItemAdded { id, .. } if id == first.id));
}

#[test]
fn full_lifecycle_backlog_progress_complete() {
    let mut board = test_board();
    let item = board.add_item(NewCatalogItem::new("Hades", Category::VideoGame));
    let id = item.id;
    board.drain_events();

    // Start
    let started = board.set_progress(id, 40).unwrap();
    assert_eq!(started.status, Status::InProgress);
    assert_eq!(board.progress_events().len(), 1);
    assert_eq!(board.progress_events()[0].progress, 40);

    // Finish
    let done = board.set_progress(id, 100).unwrap();
    assert_eq!(done.status, Status::Completed);
    let completed_at = done.completed_at.expect("completion time set");
    assert_eq!(board.progress_events().len(), 2);

    // Re-saving a completed item keeps its completion time
    let again = board.set_favorite(id, true).unwrap();
    assert_eq!(again.completed_at, Some(completed_at));
    assert_eq!(board.progress_events().len(), 2);

    // Going back below 100 reopens it without a progress event
    let reopened = board.set_progress(id, 80).unwrap();
    assert_eq!(reopened.status, Status::InProgress);
    assert!(reopened.completed_at.is_none());
    assert_eq!(board.progress_events().len(), 2);

    let kinds: Vec<&str> = board
        .drain_events()
        .iter()
        .map(|e| e.kind.operation())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "progress_recorded",
            "item_updated",
            "progress_recorded",
            "item_updated",
            "item_updated",
            "item_updated",
        ]
    );
}

#[test]
fn update_keeps_creation_time_and_rejects_bad_input() {
    let mut board = test_board();
    let item = board.add_item(NewCatalogItem::new("Dune", Category::Book));

    let mut edited = item.clone();
    edited.title = "Dune Messiah".into();
    edited.created_at = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
    let saved = board.update_item(edited).unwrap();
    assert_eq!(saved.title, "Dune Messiah");
    assert_eq!(saved.created_at, item.created_at);

    let mut too_far = item.clone();
    too_far.progress = 120;
    assert!(matches!(
        board.update_item(too_far),
        Err(Error::InvalidProgress(120))
    ));

    let stranger = CatalogItem {
        id: ItemId::new(),
        ..item
    };
    assert!(matches!(board.update_item(stranger), Err(Error::NotFound(_))));
}

#[test]
fn starting_an_item_moves_it_in_progress_at_zero() {
    let mut board = test_board();
    let item = board.add_item(NewCatalogItem::new("Severance", Category::Series));
    board.drain_events();

    let started = board.start_item(item.id).unwrap();
    assert_eq!(started.status, Status::InProgress);
    assert_eq!(started.progress, 0);
    assert!(board.progress_events().is_empty());
    assert_eq!(board.get_item(item.id).unwrap().status, Status::InProgress);

    // Editing other fields keeps the started status
    let still = board.set_favorite(item.id, true).unwrap();
    assert_eq!(still.status, Status::InProgress);

    // The same transition through a plain update
    let other = board.add_item(NewCatalogItem::new("Arrival", Category::Movie));
    let requested = CatalogItem {
        status: Status::InProgress,
        ..other
    };
    assert_eq!(board.update_item(requested).unwrap().status, Status::InProgress);

    // Moving progress away and back to zero returns it to the backlog
    board.set_progress(item.id, 20).unwrap();
    let back = board.set_progress(item.id, 0).unwrap();
    assert_eq!(back.status, Status::Backlog);

    let kinds: Vec<&str> = board
        .drain_events()
        .iter()
        .map(|e| e.kind.operation())
        .collect();
    assert_eq!(kinds[..2], ["item_updated", "item_updated"]);

    assert!(matches!(
        board.start_item(ItemId::new()),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn delete_removes_item_once() {
    let mut board = test_board();
    let item = board.add_item(NewCatalogItem::new("Dune", Category::Book));

    board.delete_item(item.id).unwrap();
    assert!(board.items().is_empty());
    assert!(matches!(board.delete_item(item.id), Err(Error::NotFound(_))));
    assert!(matches!(board.get_item(item.id), Err(Error::NotFound(_))));
}

#[test]
fn prefix_lookup_resolves_unique_ids() {
    let mut board = test_board();
    let item = board.add_item(NewCatalogItem::new("Dune", Category::Book));
    let full = item.id.0.to_string();

    assert_eq!(board.find_by_prefix(&full[..8]).unwrap().id, item.id);
    assert_eq!(board.find_by_prefix(&full).unwrap().id, item.id);
    assert!(matches!(board.find_by_prefix("zzzz"), Err(Error::NoMatch(_))));

    board.add_item(NewCatalogItem::new("Arrival", Category::Movie));
    assert!(matches!(
        board.find_by_prefix(""),
        Err(Error::AmbiguousId { count: 2, .. })
    ));
}

// ---------------------------------------------------------------------------
// Moods
// ---------------------------------------------------------------------------

#[test]
fn toggling_moods_adds_then_removes() {
    let mut board = test_board();

    assert!(board.toggle_today_mood(3).unwrap());
    assert!(board.toggle_today_mood(1).unwrap());
    assert_eq!(board.today().moods, vec![3, 1]);

    assert!(!board.toggle_today_mood(3).unwrap());
    assert_eq!(board.today().moods, vec![1]);

    assert!(matches!(board.toggle_today_mood(99), Err(Error::UnknownMood(99))));

    board.reset_today_moods();
    assert!(board.today().moods.is_empty());
}

#[test]
fn commit_on_new_day_moves_live_moods_to_history() {
    let mut board = test_board();
    board.toggle_today_mood(1).unwrap();
    board.toggle_today_mood(5).unwrap();

    assert_eq!(board.commit_moods_if_new_day(key("2024-06-01")), 0);
    assert!(board.mood_events().is_empty());

    assert_eq!(board.commit_moods_if_new_day(key("2024-06-02")), 2);
    assert_eq!(board.today().date, key("2024-06-02"));
    assert!(board.today().moods.is_empty());

    // Noon in Paris (UTC+2 in June)
    let noon = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
    let committed: Vec<(MoodId, _)> = board
        .mood_events()
        .iter()
        .map(|e| (e.mood_id, e.timestamp))
        .collect();
    assert_eq!(committed, vec![(1, noon), (5, noon)]);

    let days = board.daily_activities();
    assert_eq!(days[&key("2024-06-01")].moods.count, 2);
    assert!(matches!(
        board.drain_events().last().map(|e| &e.kind),
        Some(EventKind::MoodsCommitted { count: 2, .. })
    ));
}

#[test]
fn commit_with_no_live_moods_just_rolls_the_date() {
    let mut board = test_board();
    assert_eq!(board.commit_moods_if_new_day(key("2024-06-05")), 0);
    assert_eq!(board.today().date, key("2024-06-05"));
    assert!(board.drain_events().is_empty());
}

#[test]
fn daily_activities_overlay_live_moods_and_reuse_cache() {
    let mut board = test_board();
    board.add_item(NewCatalogItem::new("Dune", Category::Book));

    let first = board.daily_activities();
    let second = board.daily_activities();
    assert_eq!(first, second);
    assert_eq!(board.cache().misses(), 1);
    assert_eq!(board.cache().hits(), 1);

    // Live moods sit on top without touching the cached history.
    board.toggle_today_mood(2).unwrap();
    board.toggle_today_mood(2).unwrap();
    board.toggle_today_mood(4).unwrap();
    let days = board.daily_activities();
    let today = &days[&key("2024-06-01")];
    assert_eq!(today.moods.unique_mood_ids, vec![4]);
    assert_eq!(board.cache().hits(), 2);
}

// ---------------------------------------------------------------------------
// Tags, recommendations, backlog order
// ---------------------------------------------------------------------------

#[test]
fn recommendations_follow_moods_tags_and_suggestions() {
    let mut board = test_board();
    let now = Utc::now();
    let calm = board.add_item(NewCatalogItem::new("Walden", Category::Book).moods([2]));
    let quick = board.add_item(
        NewCatalogItem::new("Short film", Category::Movie).tags([SmartTag::Quick]),
    );

    assert!(board.recommendations(now).is_none());

    board.toggle_today_mood(2).unwrap();
    assert!(board.toggle_smart_tag(SmartTag::Quick));
    let recs = board.recommendations(now).unwrap();
    assert_eq!(recs.ranked(), &[quick.id, calm.id]);

    board.mark_suggested(quick.id, now).unwrap();
    let recs = board.recommendations(now + Duration::minutes(1)).unwrap();
    assert_eq!(recs.ranked(), &[calm.id, quick.id]);
    assert_eq!(
        recs.get(&quick.id).unwrap().breakdown.last().unwrap(),
        "-2 for recent suggestion"
    );

    assert!(!board.toggle_smart_tag(SmartTag::Quick));
    assert!(board.active_tags().is_empty());
}

#[test]
fn backlog_orders_by_score_or_recency() {
    let mut board = test_board();
    let now = Utc::now();
    let older = board.add_item(NewCatalogItem::new("Older", Category::Book).moods([1]));
    let newer = board.add_item(NewCatalogItem::new("Newer", Category::Book));

    let plain: Vec<ItemId> = board.backlog(now).iter().map(|i| i.id).collect();
    assert_eq!(plain, vec![newer.id, older.id]);

    board.toggle_today_mood(1).unwrap();
    let ranked: Vec<ItemId> = board.backlog(now).iter().map(|i| i.id).collect();
    assert_eq!(ranked, vec![older.id, newer.id]);

    board.set_progress(older.id, 100).unwrap();
    board.set_filter(FilterState {
        status: StatusFilter::Only(Status::Backlog),
        ..Default::default()
    });
    let filtered: Vec<ItemId> = board.backlog(now).iter().map(|i| i.id).collect();
    assert_eq!(filtered, vec![newer.id]);

    board.toggle_smart_tag(SmartTag::Solo);
    board.reset_filters();
    assert_eq!(board.filter(), &FilterState::default());
    assert!(board.active_tags().is_empty());
}
