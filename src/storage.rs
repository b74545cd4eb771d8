//! JSON snapshot storage.
//!
//! The whole board lives in one pretty-printed JSON document. Saves write a
//! sibling temp file and rename it over the original so a crash never leaves
//! a half-written snapshot behind.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::activity::DateKey;
use crate::error::Result;
use crate::model::{CatalogItem, MoodEvent, MoodId, ProgressEvent, SmartTag};

/// Today's moods, not yet committed to history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayMoods {
    pub date: DateKey,
    pub moods: Vec<MoodId>,
}

/// Persisted board state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Newest first.
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub progress_events: Vec<ProgressEvent>,
    #[serde(default)]
    pub mood_events: Vec<MoodEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today: Option<TodayMoods>,
    #[serde(default)]
    pub active_smart_tags: Vec<SmartTag>,
}

/// Snapshot file handle.
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot. A missing file is an empty board.
    pub fn load(&self) -> Result<Snapshot> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no snapshot yet, starting empty");
                return Ok(Snapshot::default());
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %self.path.display(),
            items = snapshot.items.len(),
            mood_events = snapshot.mood_events.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Replace the snapshot on disk.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), "snapshot saved");
        Ok(())
    }
}
