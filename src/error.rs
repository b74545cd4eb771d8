//! Error types for moodboard.

use thiserror::Error;

use crate::model::ItemId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("catalog item not found: {0}")]
    NotFound(ItemId),

    #[error("no catalog item matches '{0}'")]
    NoMatch(String),

    #[error("{count} catalog items match prefix '{prefix}'")]
    AmbiguousId { prefix: String, count: usize },

    #[error("progress must be within 0..=100, got {0}")]
    InvalidProgress(u8),

    #[error("unknown mood id: {0}")]
    UnknownMood(u32),

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
