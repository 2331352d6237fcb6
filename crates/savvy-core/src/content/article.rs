//! Article model for aggregated fashion blog posts.

use serde::{Deserialize, Serialize};

/// A catalog entry representing an aggregated fashion blog post.
///
/// Articles are immutable once loaded. `categories` and `tags` keep their
/// catalog order but are only ever queried for membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub image_url: String,
    pub source: String,
    /// Publication date in `YYYY-MM-DD` form.
    pub published_at: String,
    pub url: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Article {
    /// Returns true if the article is filed under `category`.
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Returns true if the article carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
