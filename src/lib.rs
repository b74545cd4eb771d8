//! # moodboard
//!
//! Mood journal and media backlog. Scores backlog items against today's
//! moods and context tags, and buckets the activity history into calendar
//! days for a yearly heatmap.

pub mod activity;
pub mod board;
pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod model;
pub mod recommend;
pub mod storage;
pub mod telemetry;

pub use activity::{
    Calendar, DailyActivitySummary, DateKey, aggregate, group_activities_by_day, overlay_today,
};
pub use board::Board;
pub use recommend::{Recommendation, score, score_at};
