//! Backlog filtering and display ordering.

use serde::{Deserialize, Serialize};

use crate::model::{CatalogItem, Category, Status};
use crate::recommend::Recommendations;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

/// What the backlog view currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub status: StatusFilter,
    pub category: CategoryFilter,
    pub favorites_only: bool,
    /// Case-insensitive substring of title or notes. Empty matches everything.
    pub search: String,
}

impl FilterState {
    pub fn matches(&self, item: &CatalogItem) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Only(s) => item.status == s,
        };
        let category_ok = match self.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => item.category == c,
        };
        let favorite_ok = !self.favorites_only || item.is_favorite;

        status_ok && category_ok && favorite_ok && self.matches_search(item)
    }

    fn matches_search(&self, item: &CatalogItem) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        item.title.to_lowercase().contains(&needle)
            || item
                .notes
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&needle))
    }
}

/// Items passing `filter`, in the order the backlog should show them.
///
/// With a non-empty recommendation set, highest score first and unscored
/// items last. Otherwise newest first.
pub fn display_order<'a>(
    items: &'a [CatalogItem],
    filter: &FilterState,
    recommendations: Option<&Recommendations>,
) -> Vec<&'a CatalogItem> {
    let mut shown: Vec<&CatalogItem> = items.iter().filter(|i| filter.matches(i)).collect();

    match recommendations.filter(|r| !r.is_empty()) {
        Some(recs) => {
            shown.sort_by(|a, b| recs.score_of(&b.id).total_cmp(&recs.score_of(&a.id)));
        }
        None => shown.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }

    shown
}
