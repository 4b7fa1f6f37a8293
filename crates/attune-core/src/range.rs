//! Per-feature tolerance bands and the predicate that tests a track
//! against them.
//!
//! A track matches an [`AttributeRange`] when every configured feature lies
//! inside its closed `[min, max]` band. A band whose `min` exceeds its `max`
//! (negative tolerance, corrupted statistics) never matches: the predicate
//! fails closed for that feature instead of ignoring it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{Feature, FeatureSource};

/// An inclusive interval on one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `[center - half_width, center + half_width]`.
    #[must_use]
    pub fn around(center: f64, half_width: f64) -> Self {
        Self::new(center - half_width, center + half_width)
    }

    /// Whether `min > max`.
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    /// Inclusive containment; always `false` for an inverted band.
    pub fn contains(&self, value: f64) -> bool {
        if self.is_inverted() {
            return false;
        }
        self.min <= value && value <= self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// A band per configured feature.
///
/// A range with no bands places no constraint, so every track matches it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeRange {
    bands: BTreeMap<Feature, Band>,
}

impl AttributeRange {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_band(mut self, feature: Feature, band: Band) -> Self {
        self.insert(feature, band);
        self
    }

    /// Set the band for `feature`, replacing any previous one.
    pub fn insert(&mut self, feature: Feature, band: Band) {
        self.bands.insert(feature, band);
    }

    pub fn band(&self, feature: Feature) -> Option<&Band> {
        self.bands.get(&feature)
    }

    pub fn bands(&self) -> impl Iterator<Item = (Feature, &Band)> + '_ {
        self.bands.iter().map(|(&f, b)| (f, b))
    }

    pub fn features(&self) -> impl Iterator<Item = Feature> + '_ {
        self.bands.keys().copied()
    }

    /// Features whose band can never match.
    pub fn inverted_features(&self) -> Vec<Feature> {
        self.bands
            .iter()
            .filter(|(_, band)| band.is_inverted())
            .map(|(&f, _)| f)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Whether every configured feature of `record` lies within its band.
    pub fn contains<S: FeatureSource + ?Sized>(&self, record: &S) -> bool {
        self.bands
            .iter()
            .all(|(&feature, band)| band.contains(record.feature(feature)))
    }
}

impl FromIterator<(Feature, Band)> for AttributeRange {
    fn from_iter<I: IntoIterator<Item = (Feature, Band)>>(iter: I) -> Self {
        Self {
            bands: iter.into_iter().collect(),
        }
    }
}

/// Test `record` against `range`.
pub fn in_range<S: FeatureSource + ?Sized>(record: &S, range: &AttributeRange) -> bool {
    range.contains(record)
}
