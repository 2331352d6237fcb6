//! User preference model.
//!
//! A [`PreferenceSet`] is ordered: insertion order is the order in which
//! filters are applied during recommendation. Sets are replaced wholesale
//! whenever the user edits preferences.

use serde::{Deserialize, Serialize};

use crate::content::taxonomy::{PreferenceAxis, classify_value};
use crate::error::{Result, SavvyError};

/// One named axis of user taste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub id: String,
    pub name: String,
    pub value: String,
}

impl Preference {
    pub fn new(id: impl Into<String>, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// A style category preference.
    pub fn category(value: impl Into<String>) -> Self {
        Self::new("category", "Style Category", value)
    }

    /// A season preference.
    pub fn season(value: impl Into<String>) -> Self {
        Self::new("season", "Season", value)
    }

    /// A thematic tag preference.
    pub fn tag(value: impl Into<String>) -> Self {
        Self::new("tag", "Fashion Tag", value)
    }

    /// The axis this preference's value belongs to, if any.
    pub fn axis(&self) -> Option<PreferenceAxis> {
        classify_value(&self.value)
    }
}

/// Ordered list of preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceSet {
    preferences: Vec<Preference>,
}

impl PreferenceSet {
    pub fn new(preferences: Vec<Preference>) -> Self {
        Self { preferences }
    }

    /// Builds a set from editor selections; unselected axes are skipped.
    pub fn from_selection(
        category: Option<&str>,
        season: Option<&str>,
        tag: Option<&str>,
    ) -> Self {
        let mut preferences = Vec::new();
        if let Some(value) = category.filter(|v| !v.is_empty()) {
            preferences.push(Preference::category(value));
        }
        if let Some(value) = season.filter(|v| !v.is_empty()) {
            preferences.push(Preference::season(value));
        }
        if let Some(value) = tag.filter(|v| !v.is_empty()) {
            preferences.push(Preference::tag(value));
        }
        Self::new(preferences)
    }

    /// Parses `key=value` assignments such as `category=Casual season=Summer`.
    ///
    /// Keys are `category`, `season` and `tag`. Values may contain spaces when
    /// the next token has no `=`, so `category=Haute Couture tag=Runway`
    /// yields two preferences. Like the editor, each axis holds one value
    /// (the last one given) and the result follows [`Self::from_selection`]
    /// order.
    pub fn parse_assignments(input: &str) -> Result<Self> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for token in input.split_whitespace() {
            match token.split_once('=') {
                Some((key, value)) => pairs.push((key.to_lowercase(), value.to_string())),
                None => match pairs.last_mut() {
                    Some((_, value)) => {
                        value.push(' ');
                        value.push_str(token);
                    }
                    None => {
                        return Err(SavvyError::validation(format!(
                            "Expected key=value, found '{token}'"
                        )));
                    }
                },
            }
        }

        let mut category: Option<String> = None;
        let mut season: Option<String> = None;
        let mut tag: Option<String> = None;
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "category" | "style" => &mut category,
                "season" => &mut season,
                "tag" | "theme" => &mut tag,
                other => {
                    return Err(SavvyError::validation(format!(
                        "Unknown preference key '{other}'"
                    )));
                }
            };
            *slot = Some(value);
        }
        Ok(Self::from_selection(
            category.as_deref(),
            season.as_deref(),
            tag.as_deref(),
        ))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preference> {
        self.preferences.iter()
    }

    pub fn len(&self) -> usize {
        self.preferences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.preferences.is_empty()
    }

    /// Finds the preference with the given id.
    pub fn get(&self, id: &str) -> Option<&Preference> {
        self.preferences.iter().find(|p| p.id == id)
    }

    pub fn as_slice(&self) -> &[Preference] {
        &self.preferences
    }
}

impl From<Vec<Preference>> for PreferenceSet {
    fn from(preferences: Vec<Preference>) -> Self {
        Self::new(preferences)
    }
}

impl<'a> IntoIterator for &'a PreferenceSet {
    type Item = &'a Preference;
    type IntoIter = std::slice::Iter<'a, Preference>;

    fn into_iter(self) -> Self::IntoIter {
        self.preferences.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_selection_keeps_axis_order() {
        let set = PreferenceSet::from_selection(Some("Casual"), None, Some("Denim"));
        let ids: Vec<_> = set.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["category", "tag"]);
        assert!(PreferenceSet::from_selection(Some(""), None, None).is_empty());
    }

    #[test]
    fn test_parse_assignments_with_spaces() {
        let set = PreferenceSet::parse_assignments("category=Haute Couture tag=Runway").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("category").unwrap().value, "Haute Couture");
        assert_eq!(set.get("tag").unwrap().value, "Runway");
    }

    #[test]
    fn test_parse_assignments_uses_editor_order() {
        let set = PreferenceSet::parse_assignments("tag=Denim season=Fall category=Casual tag=Luxury")
            .unwrap();
        let pairs: Vec<_> = set.iter().map(|p| (p.id.as_str(), p.value.as_str())).collect();
        assert_eq!(
            pairs,
            vec![("category", "Casual"), ("season", "Fall"), ("tag", "Luxury")]
        );
    }

    #[test]
    fn test_parse_assignments_errors() {
        assert!(PreferenceSet::parse_assignments("Casual").is_err());
        assert!(PreferenceSet::parse_assignments("colour=Red").is_err());
        assert!(PreferenceSet::parse_assignments("").unwrap().is_empty());
    }

    #[test]
    fn test_wire_shape_is_array_of_records() {
        let set = PreferenceSet::new(vec![Preference::season("Fall")]);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"id": "season", "name": "Season", "value": "Fall"}])
        );
    }

    #[test]
    fn test_axis() {
        assert_eq!(Preference::tag("Luxury").axis(), Some(PreferenceAxis::Tag));
        assert_eq!(Preference::tag("Sparkles").axis(), None);
    }
}
