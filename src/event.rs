//! Structured events emitted by the board on every mutation.
//!
//! The CLI logs them after each command; other front ends can use them to
//! refresh views or keep an audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::DateKey;
use crate::model::{ItemId, MoodId, SmartTag, Status};

/// A structured event emitted by the board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic per-board sequence number.
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    ItemAdded {
        id: ItemId,
        title: String,
    },
    ItemUpdated {
        id: ItemId,
        status: Status,
    },
    ProgressRecorded {
        id: ItemId,
        from: u8,
        to: u8,
    },
    ItemDeleted {
        id: ItemId,
    },
    ItemSuggested {
        id: ItemId,
    },
    MoodToggled {
        mood_id: MoodId,
        active: bool,
    },
    MoodsReset,
    MoodsCommitted {
        date: DateKey,
        count: usize,
    },
    SmartTagToggled {
        tag: SmartTag,
        active: bool,
    },
}

impl EventKind {
    /// Short operation name, used as a metric label.
    pub fn operation(&self) -> &'static str {
        match self {
            EventKind::ItemAdded { .. } => "item_added",
            EventKind::ItemUpdated { .. } => "item_updated",
            EventKind::ProgressRecorded { .. } => "progress_recorded",
            EventKind::ItemDeleted { .. } => "item_deleted",
            EventKind::ItemSuggested { .. } => "item_suggested",
            EventKind::MoodToggled { .. } => "mood_toggled",
            EventKind::MoodsReset => "moods_reset",
            EventKind::MoodsCommitted { .. } => "moods_committed",
            EventKind::SmartTagToggled { .. } => "smart_tag_toggled",
        }
    }
}
