//! Mood catalog: the set of moods a user can log.
//!
//! A built-in set is used unless a TOML file supplies one:
//!
//! ```toml
//! [[mood]]
//! id = 1
//! label = "Happy"
//! emoji = "😊"
//! color = "bg-yellow-300"
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{Mood, MoodId};

/// Top-level TOML wrapper.
#[derive(Debug, Deserialize)]
struct MoodFile {
    #[serde(default)]
    mood: Vec<Mood>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodCatalog {
    moods: Vec<Mood>,
}

impl MoodCatalog {
    /// Build a catalog, rejecting duplicate ids.
    pub fn new(moods: Vec<Mood>) -> Result<Self> {
        let mut seen = HashSet::new();
        for mood in &moods {
            if !seen.insert(mood.id) {
                return Err(Error::Config(format!("duplicate mood id {}", mood.id)));
            }
        }
        Ok(Self { moods })
    }

    /// Load a catalog from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read mood file {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("bad mood file {}: {e}", path.display())))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: MoodFile =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        if file.mood.is_empty() {
            return Err(Error::Config("mood file defines no moods".to_string()));
        }
        Self::new(file.mood)
    }

    pub fn get(&self, id: MoodId) -> Option<&Mood> {
        self.moods.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: MoodId) -> bool {
        self.get(id).is_some()
    }

    pub fn as_slice(&self) -> &[Mood] {
        &self.moods
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mood> {
        self.moods.iter()
    }
}

impl Default for MoodCatalog {
    fn default() -> Self {
        let builtin = [
            (1, "Happy", "😊", "bg-yellow-300"),
            (2, "Calm", "😌", "bg-teal-400"),
            (3, "Energetic", "⚡", "bg-orange-400"),
            (4, "Thoughtful", "🤔", "bg-indigo-400"),
            (5, "Melancholic", "🌧️", "bg-blue-300"),
            (6, "Stressed", "😣", "bg-red-400"),
            (7, "Tired", "😴", "bg-slate-500"),
        ];
        Self {
            moods: builtin
                .into_iter()
                .map(|(id, label, emoji, color)| Mood {
                    id,
                    label: label.to_string(),
                    emoji: emoji.to_string(),
                    color: color.to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_unique_ids() {
        let catalog = MoodCatalog::default();
        assert_eq!(catalog.as_slice().len(), 7);
        assert!(MoodCatalog::new(catalog.as_slice().to_vec()).is_ok());
        assert_eq!(catalog.get(1).unwrap().label, "Happy");
    }

    #[test]
    fn toml_catalog_rejects_duplicates() {
        let dup = r#"
            [[mood]]
            id = 1
            label = "Happy"
            emoji = "😊"
            color = "bg-yellow-300"

            [[mood]]
            id = 1
            label = "Joyful"
            emoji = "😁"
            color = "bg-yellow-300"
        "#;
        assert!(matches!(MoodCatalog::from_toml(dup), Err(Error::Config(_))));
        assert!(MoodCatalog::from_toml("").is_err());
    }
}
