//! Core data model.
//!
//! A catalog item is something in the backlog: a book, a film, a game. It
//! carries the moods it suits, contextual smart tags, and reading/watching
//! progress. Mood and progress events are append-only history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mood identifiers are small integers assigned by the mood catalog.
pub type MoodId = u32;

// ---------------------------------------------------------------------------
// Catalog Item
// ---------------------------------------------------------------------------

/// A backlog entry tracked by the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: ItemId,

    pub title: String,

    pub category: Category,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Moods this item suits, in the order the user picked them.
    #[serde(default)]
    pub mood_ids: Vec<MoodId>,

    #[serde(default)]
    pub smart_tags: Vec<SmartTag>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub is_favorite: bool,

    /// Percentage, 0..=100.
    #[serde(default)]
    pub progress: u8,

    pub status: Status,

    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Last time the item was surfaced as a recommendation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_suggested_at: Option<DateTime<Utc>>,
}

/// Newtype for catalog item IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short display: first 8 chars of UUID
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Book,
    Movie,
    Series,
    VideoGame,
    Music,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Book,
        Category::Movie,
        Category::Series,
        Category::VideoGame,
        Category::Music,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Book => "book",
            Category::Movie => "movie",
            Category::Series => "series",
            Category::VideoGame => "video-game",
            Category::Music => "music",
            Category::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Not started.
    Backlog,
    /// Some progress recorded.
    InProgress,
    /// Finished. Never recommended.
    Completed,
}

impl Status {
    /// Status implied by a progress percentage.
    ///
    /// 100 means completed, anything in between means in progress and zero
    /// sends the item back to the backlog.
    pub fn for_progress(progress: u8) -> Status {
        match progress {
            0 => Status::Backlog,
            100.. => Status::Completed,
            _ => Status::InProgress,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Backlog => "backlog",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backlog" => Ok(Status::Backlog),
            "in-progress" => Ok(Status::InProgress),
            "completed" => Ok(Status::Completed),
            _ => Err(format!("unknown status: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Smart Tags
// ---------------------------------------------------------------------------

/// Contextual tag describing when or with whom an item fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SmartTag {
    LateNight,
    Quick,
    Long,
    WithFriend,
    Solo,
}

/// Display grouping for smart tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagGroup {
    Time,
    Social,
}

impl std::fmt::Display for TagGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TagGroup::Time => "time",
            TagGroup::Social => "social",
        })
    }
}

impl SmartTag {
    pub const ALL: [SmartTag; 5] = [
        SmartTag::LateNight,
        SmartTag::Quick,
        SmartTag::Long,
        SmartTag::WithFriend,
        SmartTag::Solo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SmartTag::LateNight => "lateNight",
            SmartTag::Quick => "quick",
            SmartTag::Long => "long",
            SmartTag::WithFriend => "withFriend",
            SmartTag::Solo => "solo",
        }
    }

    pub fn group(self) -> TagGroup {
        match self {
            SmartTag::LateNight | SmartTag::Quick | SmartTag::Long => TagGroup::Time,
            SmartTag::WithFriend | SmartTag::Solo => TagGroup::Social,
        }
    }
}

impl std::fmt::Display for SmartTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SmartTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SmartTag::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown smart tag: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Moods and history
// ---------------------------------------------------------------------------

/// A mood the user can log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mood {
    pub id: MoodId,
    pub label: String,
    pub emoji: String,
    pub color: String,
}

/// A mood logged on a given day. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEvent {
    pub id: Uuid,
    pub mood_id: MoodId,
    pub timestamp: DateTime<Utc>,
}

/// Recorded whenever an item's progress goes up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub id: Uuid,
    pub item_id: ItemId,
    pub progress: u8,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for new catalog items. The board assigns id, creation time,
/// status and progress.
#[derive(Debug, Clone)]
pub struct NewCatalogItem {
    pub(crate) title: String,
    pub(crate) category: Category,
    pub(crate) image_url: Option<String>,
    pub(crate) mood_ids: Vec<MoodId>,
    pub(crate) smart_tags: Vec<SmartTag>,
    pub(crate) notes: Option<String>,
    pub(crate) is_favorite: bool,
}

impl NewCatalogItem {
    pub fn new(title: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            category,
            image_url: None,
            mood_ids: Vec::new(),
            smart_tags: Vec::new(),
            notes: None,
            is_favorite: false,
        }
    }

    pub fn moods(mut self, ids: impl IntoIterator<Item = MoodId>) -> Self {
        self.mood_ids = ids.into_iter().collect();
        self
    }

    pub fn tags(mut self, tags: impl IntoIterator<Item = SmartTag>) -> Self {
        self.smart_tags = tags.into_iter().collect();
        self
    }

    pub fn favorite(mut self, favorite: bool) -> Self {
        self.is_favorite = favorite;
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub(crate) fn into_item(self, now: DateTime<Utc>) -> CatalogItem {
        CatalogItem {
            id: ItemId::new(),
            title: self.title,
            category: self.category,
            image_url: self.image_url,
            mood_ids: self.mood_ids,
            smart_tags: self.smart_tags,
            notes: self.notes,
            is_favorite: self.is_favorite,
            progress: 0,
            status: Status::Backlog,
            created_at: now,
            completed_at: None,
            last_suggested_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_progress() {
        assert_eq!(Status::for_progress(0), Status::Backlog);
        assert_eq!(Status::for_progress(1), Status::InProgress);
        assert_eq!(Status::for_progress(99), Status::InProgress);
        assert_eq!(Status::for_progress(100), Status::Completed);
    }

    #[test]
    fn wire_names_match_snapshot_format() {
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::to_string(&Category::VideoGame).unwrap(),
            "\"video-game\""
        );
        assert_eq!(
            serde_json::to_string(&SmartTag::WithFriend).unwrap(),
            "\"withFriend\""
        );
    }

    #[test]
    fn tags_parse_from_display_names() {
        for tag in SmartTag::ALL {
            assert_eq!(tag.to_string().parse::<SmartTag>().unwrap(), tag);
        }
        assert!("sleepy".parse::<SmartTag>().is_err());
        assert_eq!(SmartTag::Solo.group(), TagGroup::Social);
        assert_eq!(SmartTag::LateNight.group().to_string(), "time");
    }

    #[test]
    fn builder_carries_optional_fields() {
        let now = Utc::now();
        let item = NewCatalogItem::new("Dune", Category::Book)
            .image_url("https://covers.example/dune.jpg")
            .notes("reread")
            .into_item(now);
        assert_eq!(item.image_url.as_deref(), Some("https://covers.example/dune.jpg"));
        assert_eq!(item.notes.as_deref(), Some("reread"));
        assert_eq!(item.created_at, now);
    }
}
