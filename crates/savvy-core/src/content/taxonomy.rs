//! Fixed preference vocabularies.
//!
//! Every preference value is classified into exactly one axis by looking it
//! up in these lists. Values outside all three lists have no axis.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Style categories offered by the preference editor.
pub const CATEGORIES: [&str; 9] = [
    "Streetwear",
    "Haute Couture",
    "Casual",
    "Vintage",
    "Minimalist",
    "Bohemian",
    "Athleisure",
    "Formal",
    "Designer",
];

/// Seasons offered by the preference editor.
pub const SEASONS: [&str; 6] = ["Spring", "Summer", "Fall", "Winter", "Resort", "Pre-Fall"];

/// Thematic tags offered by the preference editor.
pub const TAGS: [&str; 12] = [
    "Trending",
    "Sustainable",
    "Celebrity",
    "Runway",
    "Accessories",
    "Footwear",
    "Outerwear",
    "Denim",
    "Luxury",
    "Budget-friendly",
    "DIY",
    "Collaborations",
];

/// The taste axis a preference value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PreferenceAxis {
    Category,
    Season,
    Tag,
}

impl PreferenceAxis {
    /// Returns the vocabulary for this axis.
    pub fn vocabulary(self) -> &'static [&'static str] {
        match self {
            Self::Category => &CATEGORIES,
            Self::Season => &SEASONS,
            Self::Tag => &TAGS,
        }
    }
}

/// Classifies a preference value by exact membership.
///
/// Categories are checked first, then seasons, then tags.
pub fn classify_value(value: &str) -> Option<PreferenceAxis> {
    [
        PreferenceAxis::Category,
        PreferenceAxis::Season,
        PreferenceAxis::Tag,
    ]
    .into_iter()
    .find(|axis| axis.vocabulary().contains(&value))
}

/// Returns true if `value` is any known taxonomy term.
pub fn is_taxonomy_term(value: &str) -> bool {
    classify_value(value).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_axis() {
        assert_eq!(classify_value("Vintage"), Some(PreferenceAxis::Category));
        assert_eq!(classify_value("Pre-Fall"), Some(PreferenceAxis::Season));
        assert_eq!(classify_value("Denim"), Some(PreferenceAxis::Tag));
    }

    #[test]
    fn test_classify_is_case_sensitive_and_exact() {
        assert_eq!(classify_value("vintage"), None);
        assert_eq!(classify_value("Vintage Finds"), None);
        assert_eq!(classify_value(""), None);
    }

    #[test]
    fn test_vocabularies_are_disjoint() {
        for value in CATEGORIES.iter().chain(SEASONS.iter()).chain(TAGS.iter()) {
            let hits = [
                PreferenceAxis::Category,
                PreferenceAxis::Season,
                PreferenceAxis::Tag,
            ]
            .into_iter()
            .filter(|axis| axis.vocabulary().contains(value))
            .count();
            assert_eq!(hits, 1, "{value} should belong to exactly one axis");
        }
    }

    #[test]
    fn test_axis_display() {
        assert_eq!(PreferenceAxis::Season.to_string(), "season");
        assert_eq!("tag".parse::<PreferenceAxis>().ok(), Some(PreferenceAxis::Tag));
    }
}
