//! Pure filters over article slices.

use chrono::{Datelike, NaiveDate};

use super::article::Article;

/// Keeps articles filed under `category`.
pub fn filter_by_category(articles: &[Article], category: &str) -> Vec<Article> {
    articles
        .iter()
        .filter(|article| article.has_category(category))
        .cloned()
        .collect()
}

/// Keeps articles that plausibly belong to `season`.
///
/// This is a content-tagging proxy, not calendar-accurate seasonality: an
/// article matches when its body mentions the season (case-insensitive) or
/// when it was published in the season's half of the year. Spring and
/// Summer cover March through August; every other season covers September
/// through February.
pub fn filter_by_season(articles: &[Article], season: &str) -> Vec<Article> {
    let needle = season.to_lowercase();
    let warm = matches!(season, "Spring" | "Summer");

    articles
        .iter()
        .filter(|article| {
            if article.content.to_lowercase().contains(&needle) {
                return true;
            }
            match published_month(article) {
                Some(month) if warm => (3..=8).contains(&month),
                Some(month) => month >= 9 || month <= 2,
                None => false,
            }
        })
        .cloned()
        .collect()
}

/// Keeps articles carrying `tag`.
pub fn filter_by_tag(articles: &[Article], tag: &str) -> Vec<Article> {
    articles
        .iter()
        .filter(|article| article.has_tag(tag))
        .cloned()
        .collect()
}

/// Returns the 1-based publication month, if the date parses.
fn published_month(article: &Article) -> Option<u32> {
    NaiveDate::parse_from_str(article.published_at.trim(), "%Y-%m-%d")
        .ok()
        .map(|date| date.month())
}
