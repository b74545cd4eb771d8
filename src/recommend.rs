//! Recommendation scoring.
//!
//! Additive point system correlating today's moods and active smart tags with
//! a backlog item. Completed items score negative infinity, which callers
//! treat as "do not show".

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use opentelemetry::KeyValue;
use serde::Serialize;

use crate::model::{CatalogItem, ItemId, Mood, MoodId, SmartTag, Status};
use crate::telemetry::metrics;

const MOOD_POINTS: i32 = 3;
const TAG_POINTS: i32 = 4;
const FAVORITE_POINTS: i32 = 3;
const RECENT_SUGGESTION_PENALTY: i32 = 2;

/// A suggestion made within this window costs points.
fn recent_window() -> Duration {
    Duration::hours(24)
}

/// Score plus the human-readable lines explaining it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub score: f64,
    pub breakdown: Vec<String>,
}

impl Recommendation {
    /// False for the completed-item sentinel.
    pub fn is_rankable(&self) -> bool {
        self.score > f64::NEG_INFINITY
    }
}

/// Score `item` against the current wall clock.
pub fn score(
    item: &CatalogItem,
    today_moods: &[MoodId],
    active_tags: &[SmartTag],
    moods: &[Mood],
) -> Recommendation {
    score_at(item, today_moods, active_tags, moods, Utc::now())
}

/// Score `item` as of `now`.
///
/// Rules, in breakdown order: shared moods (+3 each), shared smart tags
/// (+4 each), favorite (+3), suggested less than 24h ago (-2). A silent base
/// term of +1 (not started) or +2 (started) is always added.
pub fn score_at(
    item: &CatalogItem,
    today_moods: &[MoodId],
    active_tags: &[SmartTag],
    moods: &[Mood],
    now: DateTime<Utc>,
) -> Recommendation {
    if item.status == Status::Completed {
        return Recommendation {
            score: f64::NEG_INFINITY,
            breakdown: vec!["Completed works are not recommended.".to_string()],
        };
    }

    let mut score = 0;
    let mut breakdown = Vec::new();

    let common: Vec<MoodId> = item
        .mood_ids
        .iter()
        .copied()
        .filter(|id| today_moods.contains(id))
        .collect();
    if !common.is_empty() {
        let points = MOOD_POINTS * common.len() as i32;
        score += points;
        // Unknown ids are dropped from the label list, not the count.
        let labels: Vec<&str> = common
            .iter()
            .filter_map(|id| moods.iter().find(|m| m.id == *id))
            .map(|m| m.label.as_str())
            .collect();
        breakdown.push(format!("+{points} for common moods: {}", labels.join(", ")));
    }

    if !item.smart_tags.is_empty() && !active_tags.is_empty() {
        let matching: Vec<&str> = item
            .smart_tags
            .iter()
            .filter(|tag| active_tags.contains(tag))
            .map(|tag| tag.as_str())
            .collect();
        if !matching.is_empty() {
            let points = TAG_POINTS * matching.len() as i32;
            score += points;
            breakdown.push(format!("+{points} for matching tags: {}", matching.join(", ")));
        }
    }

    if item.is_favorite {
        score += FAVORITE_POINTS;
        breakdown.push(format!("+{FAVORITE_POINTS} for being a favorite"));
    }

    let recently_suggested = item
        .last_suggested_at
        .is_some_and(|suggested| now - suggested < recent_window());
    if recently_suggested {
        score -= RECENT_SUGGESTION_PENALTY;
        breakdown.push(format!("-{RECENT_SUGGESTION_PENALTY} for recent suggestion"));
    }

    score += if item.progress == 0 { 1 } else { 2 };

    Recommendation {
        score: f64::from(score),
        breakdown,
    }
}

/// Scored subset of a catalog, best first.
#[derive(Debug, Clone, Default)]
pub struct Recommendations {
    scores: HashMap<ItemId, Recommendation>,
    ranked: Vec<ItemId>,
}

impl Recommendations {
    pub fn get(&self, id: &ItemId) -> Option<&Recommendation> {
        self.scores.get(id)
    }

    /// Score for `id`, negative infinity when the item was not scored.
    pub fn score_of(&self, id: &ItemId) -> f64 {
        self.scores
            .get(id)
            .map_or(f64::NEG_INFINITY, |r| r.score)
    }

    /// Item ids in descending score order. Equal scores keep catalog order.
    pub fn ranked(&self) -> &[ItemId] {
        &self.ranked
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

/// Score every item that shares at least one mood or tag with today.
///
/// Returns `None` when there is nothing to correlate against (no moods logged
/// today and no active tags). Completed items are left out.
pub fn recommend(
    items: &[CatalogItem],
    today_moods: &[MoodId],
    active_tags: &[SmartTag],
    moods: &[Mood],
    now: DateTime<Utc>,
) -> Option<Recommendations> {
    if today_moods.is_empty() && active_tags.is_empty() {
        return None;
    }

    let mut scores = HashMap::new();
    let mut ranked = Vec::new();

    for item in items {
        let mood_match = item.mood_ids.iter().any(|id| today_moods.contains(id));
        let tag_match = item.smart_tags.iter().any(|tag| active_tags.contains(tag));
        if !mood_match && !tag_match {
            continue;
        }

        let rec = score_at(item, today_moods, active_tags, moods, now);
        if rec.is_rankable() {
            ranked.push(item.id);
            scores.insert(item.id, rec);
        }
    }

    // Stable sort: ties keep catalog order.
    ranked.sort_by(|a, b| scores[b].score.total_cmp(&scores[a].score));

    metrics::recommendations_scored().add(
        ranked.len() as u64,
        &[KeyValue::new("outcome", "ranked")],
    );
    tracing::debug!(
        candidates = items.len(),
        ranked = ranked.len(),
        "recommendations computed"
    );

    Some(Recommendations { scores, ranked })
}
