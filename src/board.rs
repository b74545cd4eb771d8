//! The board. Owns the backlog, mood history and today's live state.
//!
//! All mutations go through here. Each one emits a structured [`Event`];
//! the pure scorer and aggregator are fed from the board's collections.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use opentelemetry::KeyValue;
use uuid::Uuid;

use crate::activity::{self, Calendar, DailyActivitySummary, DateKey};
use crate::cache::ActivityCache;
use crate::config::MoodCatalog;
use crate::error::{Error, Result};
use crate::event::{Event, EventKind};
use crate::filter::{self, FilterState};
use crate::model::*;
use crate::recommend::{self, Recommendations};
use crate::storage::{Snapshot, TodayMoods};
use crate::telemetry::metrics;

pub struct Board {
    items: Vec<CatalogItem>,
    progress_events: Vec<ProgressEvent>,
    mood_events: Vec<MoodEvent>,
    today: TodayMoods,
    active_tags: Vec<SmartTag>,
    filter: FilterState,
    moods: MoodCatalog,
    timezone: Tz,
    cache: ActivityCache,
    events: Vec<Event>,
    next_seq: u64,
}

impl Board {
    /// Empty board whose live moods belong to `today`.
    pub fn new(moods: MoodCatalog, timezone: Tz, today: DateKey) -> Self {
        Self::from_snapshot(Snapshot::default(), moods, timezone, today)
    }

    /// Rebuild a board from persisted state. A snapshot without live moods
    /// starts `today` with none.
    pub fn from_snapshot(
        snapshot: Snapshot,
        moods: MoodCatalog,
        timezone: Tz,
        today: DateKey,
    ) -> Self {
        Self {
            items: snapshot.items,
            progress_events: snapshot.progress_events,
            mood_events: snapshot.mood_events,
            today: snapshot.today.unwrap_or(TodayMoods {
                date: today,
                moods: Vec::new(),
            }),
            active_tags: snapshot.active_smart_tags,
            filter: FilterState::default(),
            moods,
            timezone,
            cache: ActivityCache::new(),
            events: Vec::new(),
            next_seq: 1,
        }
    }

    /// Persistable copy of the board.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            items: self.items.clone(),
            progress_events: self.progress_events.clone(),
            mood_events: self.mood_events.clone(),
            today: Some(self.today.clone()),
            active_smart_tags: self.active_tags.clone(),
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn progress_events(&self) -> &[ProgressEvent] {
        &self.progress_events
    }

    pub fn mood_events(&self) -> &[MoodEvent] {
        &self.mood_events
    }

    pub fn today(&self) -> &TodayMoods {
        &self.today
    }

    pub fn active_tags(&self) -> &[SmartTag] {
        &self.active_tags
    }

    pub fn moods(&self) -> &MoodCatalog {
        &self.moods
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    /// Local calendar day of `now` in the board's zone.
    pub fn day_of(&self, now: DateTime<Utc>) -> DateKey {
        self.timezone.date_key(now)
    }

    // -- catalog ------------------------------------------------------------

    /// Add an item to the front of the backlog.
    pub fn add_item(&mut self, new: NewCatalogItem) -> CatalogItem {
        let item = new.into_item(Utc::now());
        self.items.insert(0, item.clone());

        self.emit(EventKind::ItemAdded {
            id: item.id,
            title: item.title.clone(),
        });
        item
    }

    pub fn get_item(&self, id: ItemId) -> Result<&CatalogItem> {
        self.items
            .iter()
            .find(|i| i.id == id)
            .ok_or(Error::NotFound(id))
    }

    /// Resolve a full UUID or a unique prefix of one.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<&CatalogItem> {
        let matches: Vec<&CatalogItem> = self
            .items
            .iter()
            .filter(|i| i.id.0.to_string().starts_with(prefix))
            .collect();
        match matches.as_slice() {
            [] => Err(Error::NoMatch(prefix.to_string())),
            [item] => Ok(*item),
            many => Err(Error::AmbiguousId {
                prefix: prefix.to_string(),
                count: many.len(),
            }),
        }
    }

    /// Replace an item by id.
    ///
    /// A progress increase is recorded as a [`ProgressEvent`]. When progress
    /// changes, status is derived from it: reaching 100 completes the item,
    /// dropping below clears the completion. With progress untouched the
    /// requested status is settled against it, so an item can be started at
    /// 0%. Creation time is kept.
    pub fn update_item(&mut self, mut item: CatalogItem) -> Result<CatalogItem> {
        if item.progress > 100 {
            return Err(Error::InvalidProgress(item.progress));
        }
        let index = self
            .items
            .iter()
            .position(|i| i.id == item.id)
            .ok_or(Error::NotFound(item.id))?;
        let original = &self.items[index];
        let now = Utc::now();

        let progress_from = original.progress;
        item.created_at = original.created_at;
        item.status = if item.progress == progress_from {
            settle_status(item.status, item.progress)
        } else {
            Status::for_progress(item.progress)
        };
        item.completed_at = match item.status {
            Status::Completed if original.status == Status::Completed => {
                original.completed_at.or(Some(now))
            }
            Status::Completed => Some(now),
            _ => None,
        };

        if item.progress > progress_from {
            self.progress_events.push(ProgressEvent {
                id: Uuid::new_v4(),
                item_id: item.id,
                progress: item.progress,
                timestamp: now,
            });
            self.emit(EventKind::ProgressRecorded {
                id: item.id,
                from: progress_from,
                to: item.progress,
            });
        }

        self.items[index] = item.clone();
        self.emit(EventKind::ItemUpdated {
            id: item.id,
            status: item.status,
        });
        Ok(item)
    }

    pub fn set_progress(&mut self, id: ItemId, progress: u8) -> Result<CatalogItem> {
        let mut item = self.get_item(id)?.clone();
        item.progress = progress;
        self.update_item(item)
    }

    /// Move a backlog item to in-progress without recording any progress.
    pub fn start_item(&mut self, id: ItemId) -> Result<CatalogItem> {
        let mut item = self.get_item(id)?.clone();
        item.status = Status::InProgress;
        self.update_item(item)
    }

    pub fn set_favorite(&mut self, id: ItemId, favorite: bool) -> Result<CatalogItem> {
        let mut item = self.get_item(id)?.clone();
        item.is_favorite = favorite;
        self.update_item(item)
    }

    pub fn delete_item(&mut self, id: ItemId) -> Result<()> {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        if self.items.len() == before {
            return Err(Error::NotFound(id));
        }
        self.emit(EventKind::ItemDeleted { id });
        Ok(())
    }

    /// Record that `id` was just shown as a recommendation.
    pub fn mark_suggested(&mut self, id: ItemId, now: DateTime<Utc>) -> Result<()> {
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(Error::NotFound(id))?;
        item.last_suggested_at = Some(now);
        self.emit(EventKind::ItemSuggested { id });
        Ok(())
    }

    // -- moods --------------------------------------------------------------

    /// Add `mood_id` to today's moods, or remove it if already there.
    /// Returns whether the mood is now active.
    pub fn toggle_today_mood(&mut self, mood_id: MoodId) -> Result<bool> {
        if !self.moods.contains(mood_id) {
            return Err(Error::UnknownMood(mood_id));
        }

        let active = match self.today.moods.iter().position(|m| *m == mood_id) {
            Some(pos) => {
                self.today.moods.remove(pos);
                false
            }
            None => {
                self.today.moods.push(mood_id);
                true
            }
        };
        self.emit(EventKind::MoodToggled { mood_id, active });
        Ok(active)
    }

    pub fn reset_today_moods(&mut self) {
        self.today.moods.clear();
        self.emit(EventKind::MoodsReset);
    }

    /// Move yesterday's (or older) live moods into history.
    ///
    /// When the live date differs from `today`, each live mood becomes a
    /// [`MoodEvent`] stamped at local noon of the live date, and the live
    /// state restarts empty on `today`. Returns the number of committed
    /// events.
    pub fn commit_moods_if_new_day(&mut self, today: DateKey) -> usize {
        if self.today.date == today {
            return 0;
        }

        let date = self.today.date;
        let timestamp = local_noon(self.timezone, date);
        let committed: Vec<MoodEvent> = self
            .today
            .moods
            .iter()
            .map(|mood_id| MoodEvent {
                id: Uuid::new_v4(),
                mood_id: *mood_id,
                timestamp,
            })
            .collect();
        let count = committed.len();

        self.mood_events.extend(committed);
        self.today = TodayMoods {
            date: today,
            moods: Vec::new(),
        };

        if count > 0 {
            tracing::info!(%date, count, "committed moods from previous day");
            self.emit(EventKind::MoodsCommitted { date, count });
        }
        count
    }

    // -- tags and filters ---------------------------------------------------

    /// Returns whether the tag is now active.
    pub fn toggle_smart_tag(&mut self, tag: SmartTag) -> bool {
        let active = match self.active_tags.iter().position(|t| *t == tag) {
            Some(pos) => {
                self.active_tags.remove(pos);
                false
            }
            None => {
                self.active_tags.push(tag);
                true
            }
        };
        self.emit(EventKind::SmartTagToggled { tag, active });
        active
    }

    /// Clear the backlog filter and every active smart tag.
    pub fn reset_filters(&mut self) {
        self.filter = FilterState::default();
        for tag in std::mem::take(&mut self.active_tags) {
            self.emit(EventKind::SmartTagToggled { tag, active: false });
        }
    }

    // -- derived views ------------------------------------------------------

    pub fn recommendations(&self, now: DateTime<Utc>) -> Option<Recommendations> {
        recommend::recommend(
            &self.items,
            &self.today.moods,
            &self.active_tags,
            self.moods.as_slice(),
            now,
        )
    }

    /// Filtered backlog in display order.
    pub fn backlog(&self, now: DateTime<Utc>) -> Vec<&CatalogItem> {
        let recs = self.recommendations(now);
        filter::display_order(&self.items, &self.filter, recs.as_ref())
    }

    /// Per-day activity with today's live moods laid on top.
    pub fn daily_activities(&mut self) -> BTreeMap<DateKey, DailyActivitySummary> {
        let mut days = self
            .cache
            .get_or_compute(
                &self.mood_events,
                &self.items,
                &self.progress_events,
                &self.timezone,
            )
            .clone();
        activity::overlay_today(&mut days, self.today.date, &self.today.moods);
        days
    }

    pub fn cache(&self) -> &ActivityCache {
        &self.cache
    }

    // -- events -------------------------------------------------------------

    /// Take every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, kind: EventKind) {
        metrics::board_mutations().add(1, &[KeyValue::new("operation", kind.operation())]);
        tracing::debug!(seq = self.next_seq, operation = kind.operation(), "board event");

        self.events.push(Event {
            seq: self.next_seq,
            timestamp: Utc::now(),
            kind,
        });
        self.next_seq += 1;
    }
}

/// Status an unchanged progress allows. Only a started item may sit at 0%.
fn settle_status(requested: Status, progress: u8) -> Status {
    match (Status::for_progress(progress), requested) {
        (Status::Backlog, Status::InProgress) => Status::InProgress,
        (derived, _) => derived,
    }
}

/// Noon of `date` in `tz`, as an instant.
fn local_noon(tz: Tz, date: DateKey) -> DateTime<Utc> {
    let noon = date.date().and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
    tz.from_local_datetime(&noon)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| noon.and_utc())
}
