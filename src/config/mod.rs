//! Typed configuration from environment variables.
//!
//! Loads once at startup and fails fast on an unknown time zone.

pub mod moods;

use std::path::PathBuf;

use chrono_tz::Tz;

use crate::error::{Error, Result};

pub use moods::MoodCatalog;

#[derive(Debug, Clone)]
pub struct Config {
    /// Snapshot file holding the board.
    pub data_path: PathBuf,
    /// Zone used to bucket activity into calendar days.
    pub timezone: Tz,
    /// Optional TOML file replacing the built-in mood set.
    pub moods_path: Option<PathBuf>,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        let timezone = std::env::var("MOODBOARD_TIMEZONE")
            .unwrap_or_else(|_| "Europe/Paris".to_string());

        Ok(Self {
            data_path: std::env::var("MOODBOARD_DATA")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("moodboard.json")),
            timezone: parse_timezone(&timezone)?,
            moods_path: std::env::var("MOODBOARD_MOODS").ok().map(PathBuf::from),
            otel_endpoint: std::env::var("OTEL_ENDPOINT").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// The configured mood set, or the built-in one.
    pub fn mood_catalog(&self) -> Result<MoodCatalog> {
        match &self.moods_path {
            Some(path) => MoodCatalog::load(path),
            None => Ok(MoodCatalog::default()),
        }
    }
}

/// Parse an IANA zone name such as `Europe/Paris`.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| Error::InvalidTimezone(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iana_names() {
        assert_eq!(parse_timezone("Europe/Paris").unwrap(), chrono_tz::Europe::Paris);
        assert!(matches!(
            parse_timezone("Mars/Olympus"),
            Err(Error::InvalidTimezone(_))
        ));
    }
}
