//! Feature Value Map
//!
//! The simulated environment: which value each media feature currently has.
//! A feature that was never set is absent, which the matcher treats as
//! "unknown" rather than falling back to a default.

use crate::feature::MediaFeature;
use crate::result::MediaResult;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Value of a single media feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaValue {
    /// Plain number (`800` is read as px for lengths, dpi for resolution)
    Number(f64),
    /// CSS text such as `"800px"`, `"16/9"`, `"dark"`
    Text(String),
}

impl MediaValue {
    /// Text form of the value as the matcher parses it
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for MediaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MediaValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MediaValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for MediaValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<u32> for MediaValue {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i32> for MediaValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

/// Mapping from media feature to its simulated value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaValues {
    values: BTreeMap<MediaFeature, MediaValue>,
}

impl MediaValues {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a feature value (builder style)
    #[must_use]
    pub fn with(mut self, feature: impl Into<MediaFeature>, value: impl Into<MediaValue>) -> Self {
        self.insert(feature, value);
        self
    }

    /// Set a feature value, returning the previous one
    pub fn insert(
        &mut self,
        feature: impl Into<MediaFeature>,
        value: impl Into<MediaValue>,
    ) -> Option<MediaValue> {
        self.values.insert(feature.into(), value.into())
    }

    /// Get the value of a feature, if it has been set
    #[must_use]
    pub fn get(&self, feature: &MediaFeature) -> Option<&MediaValue> {
        self.values.get(feature)
    }

    /// Whether a feature has been set
    #[must_use]
    pub fn contains(&self, feature: &MediaFeature) -> bool {
        self.values.contains_key(feature)
    }

    /// Merge `other` into this map and return the features it names.
    ///
    /// Keys absent from `other` are left untouched.
    pub fn merge(&mut self, other: &Self) -> Vec<MediaFeature> {
        other
            .values
            .iter()
            .map(|(feature, value)| {
                let _ = self.values.insert(feature.clone(), value.clone());
                feature.clone()
            })
            .collect()
    }

    /// Remove every value
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Number of features set
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no feature is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the set features in name order
    pub fn iter(&self) -> btree_map::Iter<'_, MediaFeature, MediaValue> {
        self.values.iter()
    }

    /// Iterate over the set feature names
    pub fn features(&self) -> impl Iterator<Item = &MediaFeature> {
        self.values.keys()
    }

    /// Parse values from a JSON object such as `{"width": "800px"}`
    pub fn from_json(json: &str) -> MediaResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize values to a JSON object
    pub fn to_json(&self) -> MediaResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<F, V> FromIterator<(F, V)> for MediaValues
where
    F: Into<MediaFeature>,
    V: Into<MediaValue>,
{
    fn from_iter<I: IntoIterator<Item = (F, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(feature, value)| (feature.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a MediaValues {
    type Item = (&'a MediaFeature, &'a MediaValue);
    type IntoIter = btree_map::Iter<'a, MediaFeature, MediaValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod media_value_tests {
        use super::*;

        #[test]
        fn test_conversions() {
            assert_eq!(MediaValue::from("800px"), MediaValue::Text("800px".into()));
            assert_eq!(MediaValue::from(2.0), MediaValue::Number(2.0));
            assert_eq!(MediaValue::from(800_u32), MediaValue::Number(800.0));
        }

        #[test]
        fn test_to_css() {
            assert_eq!(MediaValue::from(1.5).to_css(), "1.5");
            assert_eq!(MediaValue::from("dark").to_css(), "dark");
        }
    }

    mod media_values_tests {
        use super::*;

        #[test]
        fn test_new_is_empty() {
            let values = MediaValues::new();
            assert!(values.is_empty());
            assert_eq!(values.len(), 0);
        }

        #[test]
        fn test_builder() {
            let values = MediaValues::new()
                .with("width", "800px")
                .with(MediaFeature::Orientation, "landscape");
            assert_eq!(values.len(), 2);
            assert_eq!(
                values.get(&MediaFeature::Width),
                Some(&MediaValue::from("800px"))
            );
            assert!(values.contains(&MediaFeature::Orientation));
        }

        #[test]
        fn test_merge_keeps_unspecified_keys() {
            let mut values = MediaValues::new()
                .with("width", "800px")
                .with("height", "600px");
            let changed = values.merge(&MediaValues::new().with("width", "1024px"));

            assert_eq!(changed, vec![MediaFeature::Width]);
            assert_eq!(
                values.get(&MediaFeature::Width),
                Some(&MediaValue::from("1024px"))
            );
            assert_eq!(
                values.get(&MediaFeature::Height),
                Some(&MediaValue::from("600px"))
            );
        }

        #[test]
        fn test_merge_empty_changes_nothing() {
            let mut values = MediaValues::new().with("width", "800px");
            let before = values.clone();
            assert!(values.merge(&MediaValues::new()).is_empty());
            assert_eq!(values, before);
        }

        #[test]
        fn test_clear() {
            let mut values = MediaValues::new().with("width", "800px");
            values.clear();
            assert!(values.is_empty());
        }

        #[test]
        fn test_from_iterator() {
            let values: MediaValues = [("width", "800px"), ("prefers-color-scheme", "dark")]
                .into_iter()
                .collect();
            assert_eq!(values.len(), 2);
            assert!(values.contains(&MediaFeature::PrefersColorScheme));
        }

        #[test]
        fn test_json() {
            let values =
                MediaValues::from_json(r#"{"width": "800px", "resolution": 2, "x-custom": "on"}"#)
                    .unwrap();
            assert_eq!(
                values.get(&MediaFeature::Resolution),
                Some(&MediaValue::Number(2.0))
            );
            assert_eq!(
                values.get(&MediaFeature::Other("x-custom".into())),
                Some(&MediaValue::from("on"))
            );

            let json = values.to_json().unwrap();
            assert_eq!(MediaValues::from_json(&json).unwrap(), values);
        }

        #[test]
        fn test_json_rejects_non_object() {
            assert!(MediaValues::from_json("[1, 2]").is_err());
        }
    }
}
