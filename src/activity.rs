//! Daily activity aggregation for the yearly heatmap.
//!
//! Buckets mood events, item creations/completions and progress events by
//! local calendar day. The result is a pure function of its inputs and the
//! calendar; callers overlay today's live moods afterwards.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, FixedOffset, NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::model::{CatalogItem, ItemId, MoodEvent, MoodId, ProgressEvent};

/// Zone used when the caller does not supply one.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Paris;

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// Maps an instant to the local calendar day it falls on.
pub trait Calendar {
    fn date_key(&self, ts: DateTime<Utc>) -> DateKey;

    /// Identifies the zone, used for cache fingerprints.
    fn zone_name(&self) -> String;
}

impl Calendar for Tz {
    fn date_key(&self, ts: DateTime<Utc>) -> DateKey {
        DateKey(ts.with_timezone(self).date_naive())
    }

    fn zone_name(&self) -> String {
        self.name().to_string()
    }
}

impl Calendar for FixedOffset {
    fn date_key(&self, ts: DateTime<Utc>) -> DateKey {
        DateKey(ts.with_timezone(self).date_naive())
    }

    fn zone_name(&self) -> String {
        self.to_string()
    }
}

/// A local calendar day, rendered `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(pub NaiveDate);

impl DateKey {
    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// The day `days` before this one. Negative counts are zero; windows
    /// reaching past the calendar's range stop at its first day.
    pub fn days_back(self, days: i64) -> DateKey {
        let back = TimeDelta::try_days(days.max(0))
            .and_then(|delta| self.0.checked_sub_signed(delta))
            .unwrap_or(NaiveDate::MIN);
        DateKey(back)
    }
}

impl std::fmt::Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl std::str::FromStr for DateKey {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(DateKey)
    }
}

impl TryFrom<String> for DateKey {
    type Error = chrono::ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Everything that happened on one local day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivitySummary {
    pub date: DateKey,
    pub moods: MoodSummary,
    pub works: WorkSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodSummary {
    pub count: usize,
    /// First-seen order.
    pub unique_mood_ids: Vec<MoodId>,
    pub dominant_mood_id: Option<MoodId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSummary {
    pub added: usize,
    pub completed: usize,
    /// Distinct items with progress that day.
    pub progressed: usize,
}

impl WorkSummary {
    pub fn total(&self) -> usize {
        self.added + self.completed + self.progressed
    }
}

impl MoodSummary {
    fn from_ids(ids: &[MoodId]) -> Self {
        let mut unique = Vec::new();
        for id in ids {
            if !unique.contains(id) {
                unique.push(*id);
            }
        }
        Self {
            count: ids.len(),
            unique_mood_ids: unique,
            dominant_mood_id: dominant_mood(ids),
        }
    }
}

/// Most frequent mood id.
///
/// Counts are kept in first-seen order and a later id only wins by strictly
/// exceeding the current best, so exact ties go to the id seen first.
pub fn dominant_mood(ids: &[MoodId]) -> Option<MoodId> {
    let mut counts: Vec<(MoodId, usize)> = Vec::new();
    for id in ids {
        match counts.iter_mut().find(|(seen, _)| seen == id) {
            Some((_, n)) => *n += 1,
            None => counts.push((*id, 1)),
        }
    }

    counts
        .into_iter()
        .reduce(|best, next| if next.1 > best.1 { next } else { best })
        .map(|(id, _)| id)
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Default)]
struct DayBucket {
    mood_ids: Vec<MoodId>,
    added: usize,
    completed: usize,
    progressed: HashSet<ItemId>,
}

/// Bucket all activity by local day in `calendar`.
///
/// Days without any event are absent from the map.
pub fn aggregate<C: Calendar + ?Sized>(
    mood_events: &[MoodEvent],
    items: &[CatalogItem],
    progress_events: &[ProgressEvent],
    calendar: &C,
) -> BTreeMap<DateKey, DailyActivitySummary> {
    let mut days: BTreeMap<DateKey, DayBucket> = BTreeMap::new();

    for event in mood_events {
        days.entry(calendar.date_key(event.timestamp))
            .or_default()
            .mood_ids
            .push(event.mood_id);
    }

    for item in items {
        days.entry(calendar.date_key(item.created_at))
            .or_default()
            .added += 1;

        // Creation and completion land on their own days independently.
        if let Some(completed_at) = item.completed_at {
            days.entry(calendar.date_key(completed_at))
                .or_default()
                .completed += 1;
        }
    }

    for event in progress_events {
        days.entry(calendar.date_key(event.timestamp))
            .or_default()
            .progressed
            .insert(event.item_id);
    }

    days.into_iter()
        .map(|(date, bucket)| {
            let summary = DailyActivitySummary {
                date,
                moods: MoodSummary::from_ids(&bucket.mood_ids),
                works: WorkSummary {
                    added: bucket.added,
                    completed: bucket.completed,
                    progressed: bucket.progressed.len(),
                },
            };
            (date, summary)
        })
        .collect()
}

/// [`aggregate`] in the default `Europe/Paris` zone.
pub fn group_activities_by_day(
    mood_events: &[MoodEvent],
    items: &[CatalogItem],
    progress_events: &[ProgressEvent],
) -> BTreeMap<DateKey, DailyActivitySummary> {
    aggregate(mood_events, items, progress_events, &DEFAULT_TIMEZONE)
}

/// Lay today's live, uncommitted moods over the aggregated history.
///
/// Today's mood summary is replaced by the live list; work counts already
/// recorded for today are kept. Does nothing when no mood is live.
pub fn overlay_today(
    days: &mut BTreeMap<DateKey, DailyActivitySummary>,
    today: DateKey,
    live_moods: &[MoodId],
) {
    if live_moods.is_empty() {
        return;
    }

    let entry = days.entry(today).or_insert_with(|| DailyActivitySummary {
        date: today,
        moods: MoodSummary::default(),
        works: WorkSummary::default(),
    });
    entry.moods = MoodSummary {
        count: live_moods.len(),
        unique_mood_ids: live_moods.to_vec(),
        dominant_mood_id: dominant_mood(live_moods),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominant_prefers_first_seen_on_ties() {
        assert_eq!(dominant_mood(&[]), None);
        assert_eq!(dominant_mood(&[4, 2, 2, 4]), Some(4));
        assert_eq!(dominant_mood(&[4, 2, 2]), Some(2));
        assert_eq!(dominant_mood(&[7, 3, 5]), Some(7));
    }

    #[test]
    fn date_key_renders_and_parses_iso_days() {
        let key: DateKey = "2024-12-02".parse().unwrap();
        assert_eq!(key.to_string(), "2024-12-02");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-12-02\"");
        assert!("12/02/2024".parse::<DateKey>().is_err());
    }

    #[test]
    fn days_back_saturates_instead_of_overflowing() {
        let key: DateKey = "2024-03-01".parse().unwrap();
        assert_eq!(key.days_back(1).to_string(), "2024-02-29");
        assert_eq!(key.days_back(-5), key);
        assert_eq!(key.days_back(100_000_000).date(), NaiveDate::MIN);
        assert_eq!(key.days_back(i64::MAX).date(), NaiveDate::MIN);
    }

    #[test]
    fn overlay_without_live_moods_is_a_no_op() {
        let mut days = BTreeMap::new();
        let today: DateKey = "2024-06-02".parse().unwrap();
        overlay_today(&mut days, today, &[]);
        assert!(days.is_empty());
    }
}
