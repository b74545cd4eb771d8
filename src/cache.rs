//! Memoised activity aggregation.
//!
//! Keeps the last aggregate together with an xxh3 fingerprint of the inputs
//! that produced it. A lookup with identical inputs returns the stored map
//! without re-bucketing anything.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use opentelemetry::KeyValue;
use xxhash_rust::xxh3::Xxh3;

use crate::activity::{self, Calendar, DailyActivitySummary, DateKey};
use crate::model::{CatalogItem, MoodEvent, ProgressEvent};
use crate::telemetry::metrics;

/// Single-slot cache for [`activity::aggregate`].
#[derive(Debug, Default)]
pub struct ActivityCache {
    slot: Option<(u64, BTreeMap<DateKey, DailyActivitySummary>)>,
    hits: u64,
    misses: u64,
}

impl ActivityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate, reusing the previous result when nothing changed.
    pub fn get_or_compute<C: Calendar + ?Sized>(
        &mut self,
        mood_events: &[MoodEvent],
        items: &[CatalogItem],
        progress_events: &[ProgressEvent],
        calendar: &C,
    ) -> &BTreeMap<DateKey, DailyActivitySummary> {
        let key = fingerprint(mood_events, items, progress_events, &calendar.zone_name());

        if self.slot.as_ref().is_some_and(|(cached, _)| *cached == key) {
            self.hits += 1;
            metrics::activity_aggregations().add(1, &[KeyValue::new("cache", "hit")]);
        } else {
            self.misses += 1;
            metrics::activity_aggregations().add(1, &[KeyValue::new("cache", "miss")]);
            tracing::debug!(
                fingerprint = key,
                mood_events = mood_events.len(),
                items = items.len(),
                progress_events = progress_events.len(),
                "recomputing daily activity"
            );
            self.slot = None;
        }

        &self
            .slot
            .get_or_insert_with(|| {
                (key, activity::aggregate(mood_events, items, progress_events, calendar))
            })
            .1
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

/// Content hash of the aggregation inputs.
pub fn fingerprint(
    mood_events: &[MoodEvent],
    items: &[CatalogItem],
    progress_events: &[ProgressEvent],
    zone: &str,
) -> u64 {
    let mut hasher = Xxh3::new();
    mood_events.hash(&mut hasher);
    items.hash(&mut hasher);
    progress_events.hash(&mut hasher);
    zone.hash(&mut hasher);
    hasher.finish()
}
