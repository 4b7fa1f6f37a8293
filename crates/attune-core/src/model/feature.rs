//! Audio features that can be banded, and the sets and value maps built
//! from them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A numeric track attribute that a query can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Danceability,
    Energy,
    Valence,
    Tempo,
    Loudness,
    Acousticness,
    Instrumentalness,
    Speechiness,
    Popularity,
    Liveness,
}

// ---------------------------------------------------------------------------
// Feature name ↔ enum mapping
// ---------------------------------------------------------------------------

/// Canonical names for each [`Feature`], matching the catalog CSV headers.
const FEATURE_NAMES: &[(Feature, &str)] = &[
    (Feature::Danceability, "danceability"),
    (Feature::Energy, "energy"),
    (Feature::Valence, "valence"),
    (Feature::Tempo, "tempo"),
    (Feature::Loudness, "loudness"),
    (Feature::Acousticness, "acousticness"),
    (Feature::Instrumentalness, "instrumentalness"),
    (Feature::Speechiness, "speechiness"),
    (Feature::Popularity, "popularity"),
    (Feature::Liveness, "liveness"),
];

impl Feature {
    /// Every feature, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Danceability,
        Self::Energy,
        Self::Valence,
        Self::Tempo,
        Self::Loudness,
        Self::Acousticness,
        Self::Instrumentalness,
        Self::Speechiness,
        Self::Popularity,
        Self::Liveness,
    ];

    /// The eight features banded by default.
    pub const STANDARD: [Self; 8] = [
        Self::Danceability,
        Self::Energy,
        Self::Valence,
        Self::Tempo,
        Self::Loudness,
        Self::Acousticness,
        Self::Instrumentalness,
        Self::Speechiness,
    ];

    /// Canonical lowercase name, identical to the CSV column header.
    pub fn name(self) -> &'static str {
        for &(f, name) in FEATURE_NAMES {
            if f == self {
                return name;
            }
        }
        "unknown"
    }

    /// Look up a feature by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        FEATURE_NAMES
            .iter()
            .find(|(_, canonical)| canonical.eq_ignore_ascii_case(name))
            .map(|&(f, _)| f)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s).ok_or_else(|| Error::UnknownFeature(s.to_string()))
    }
}

/// Anything that can report a value for each [`Feature`].
///
/// Implemented by [`crate::Track`] for catalog rows and by [`FeatureValues`]
/// for reference rows, so the statistics and the range predicate accept
/// either.
pub trait FeatureSource {
    /// The value of `feature`; sources without the feature report `0.0`.
    fn feature(&self, feature: Feature) -> f64;
}

impl<T: FeatureSource + ?Sized> FeatureSource for &T {
    fn feature(&self, feature: Feature) -> f64 {
        (**self).feature(feature)
    }
}

/// An ordered selection of features with no repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Feature>", into = "Vec<Feature>")]
pub struct FeatureSet(Vec<Feature>);

impl FeatureSet {
    /// Build a set, keeping the first occurrence of each feature.
    pub fn new(features: impl IntoIterator<Item = Feature>) -> Self {
        let mut selected = Vec::new();
        for feature in features {
            if !selected.contains(&feature) {
                selected.push(feature);
            }
        }
        Self(selected)
    }

    /// The eight standard features.
    pub fn standard() -> Self {
        Self(Feature::STANDARD.to_vec())
    }

    /// The standard features plus popularity and liveness.
    pub fn extended() -> Self {
        Self(Feature::ALL.to_vec())
    }

    /// Parse a list of feature names.
    ///
    /// # Errors
    /// Returns [`Error::UnknownFeature`] for an unrecognised name and
    /// [`Error::InvalidData`] when the list is empty.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let features = names
            .iter()
            .map(|name| name.as_ref().parse::<Feature>())
            .collect::<Result<Vec<_>>>()?;
        if features.is_empty() {
            return Err(Error::InvalidData("feature set is empty".to_string()));
        }
        Ok(Self::new(features))
    }

    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.0.contains(&feature)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<Vec<Feature>> for FeatureSet {
    type Error = Error;

    fn try_from(features: Vec<Feature>) -> Result<Self> {
        if features.is_empty() {
            return Err(Error::InvalidData("feature set is empty".to_string()));
        }
        Ok(Self::new(features))
    }
}

impl From<FeatureSet> for Vec<Feature> {
    fn from(set: FeatureSet) -> Self {
        set.0
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|feature| feature.name()).collect();
        f.write_str(&names.join(","))
    }
}

/// A sparse map of feature values, e.g. one row of a reference summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureValues(BTreeMap<Feature, f64>);

impl FeatureValues {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, feature: Feature, value: f64) -> Self {
        self.set(feature, value);
        self
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        self.0.insert(feature, value);
    }

    pub fn get(&self, feature: Feature) -> Option<f64> {
        self.0.get(&feature).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        self.0.iter().map(|(&f, &v)| (f, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FeatureSource for FeatureValues {
    fn feature(&self, feature: Feature) -> f64 {
        self.get(feature).unwrap_or(0.0)
    }
}

impl FromIterator<(Feature, f64)> for FeatureValues {
    fn from_iter<I: IntoIterator<Item = (Feature, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_names_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_name(feature.name()), Some(feature));
        }
    }

    #[test]
    fn test_feature_from_name_case_insensitive() {
        assert_eq!(Feature::from_name("Tempo"), Some(Feature::Tempo));
        assert_eq!(Feature::from_name(" ENERGY "), Some(Feature::Energy));
        assert_eq!(Feature::from_name("key"), None);
    }

    #[test]
    fn test_feature_from_str_unknown() {
        let err = "groove".parse::<Feature>().unwrap_err();
        assert!(matches!(err, Error::UnknownFeature(name) if name == "groove"));
    }

    #[test]
    fn test_feature_set_dedupes_in_order() {
        let set = FeatureSet::new([Feature::Tempo, Feature::Energy, Feature::Tempo]);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Feature::Tempo, Feature::Energy]);
    }

    #[test]
    fn test_feature_set_defaults() {
        assert_eq!(FeatureSet::default().len(), 8);
        assert!(!FeatureSet::standard().contains(Feature::Liveness));
        assert!(FeatureSet::extended().contains(Feature::Popularity));
    }

    #[test]
    fn test_feature_set_parse() {
        let set = FeatureSet::parse(&["energy", "Valence"]).unwrap();
        assert_eq!(set.to_string(), "energy,valence");

        let empty: [&str; 0] = [];
        assert!(FeatureSet::parse(&empty).is_err());
        assert!(FeatureSet::parse(&["energy", "bogus"]).is_err());
    }

    #[test]
    fn test_feature_set_serde() {
        let set: FeatureSet = serde_json::from_str(r#"["tempo","loudness"]"#).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Feature::Tempo, Feature::Loudness]);
        assert!(serde_json::from_str::<FeatureSet>("[]").is_err());
    }

    #[test]
    fn test_feature_values_missing_is_zero() {
        let values = FeatureValues::new().with(Feature::Energy, 0.8);
        assert_eq!(values.feature(Feature::Energy), 0.8);
        assert_eq!(values.feature(Feature::Tempo), 0.0);
        assert_eq!(values.get(Feature::Tempo), None);
    }
}
