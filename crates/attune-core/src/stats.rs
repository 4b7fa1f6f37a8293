//! Reference statistics and band derivation.
//!
//! Averages come from a reference set (a summary row of means, or a set of
//! seed tracks). Standard deviations are population deviations over the
//! whole corpus around those averages. A band is `mean ± k·sd` per feature.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Feature, FeatureSet, FeatureSource, FeatureValues};
use crate::range::{AttributeRange, Band};

/// Tolerance multiplier used when the caller does not pick one.
pub const DEFAULT_TOLERANCE: f64 = 0.5;

/// Per-feature arithmetic means over a reference set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Averages(FeatureValues);

/// Per-feature population standard deviations over a corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StdDevs(FeatureValues);

macro_rules! feature_stat {
    ($name:ident) => {
        impl $name {
            #[must_use]
            pub fn from_values(values: FeatureValues) -> Self {
                Self(values)
            }

            pub fn get(&self, feature: Feature) -> Option<f64> {
                self.0.get(feature)
            }

            pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
                self.0.iter()
            }

            pub fn values(&self) -> &FeatureValues {
                &self.0
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }
    };
}

feature_stat!(Averages);
feature_stat!(StdDevs);

/// Mean of each feature in `features` across `rows`.
///
/// # Errors
/// Returns [`Error::EmptyInput`] when `rows` yields nothing.
pub fn compute_averages<I>(rows: I, features: &FeatureSet) -> Result<Averages>
where
    I: IntoIterator,
    I::Item: FeatureSource,
{
    let mut sums = vec![0.0_f64; features.len()];
    let mut count = 0_usize;

    for row in rows {
        for (sum, feature) in sums.iter_mut().zip(features.iter()) {
            *sum += row.feature(feature);
        }
        count += 1;
    }

    if count == 0 {
        return Err(Error::EmptyInput { what: "averages" });
    }

    #[allow(clippy::cast_precision_loss)]
    let n = count as f64;
    log::debug!("Computed averages of {} features over {} rows", features.len(), count);

    Ok(Averages(
        features.iter().zip(sums).map(|(f, sum)| (f, sum / n)).collect(),
    ))
}

/// Population standard deviation of every averaged feature across `rows`.
///
/// `sqrt(sum((x_i - mean)^2) / n)` where `mean` is taken from `averages`
/// rather than recomputed, so the deviation is measured around the
/// reference centre.
///
/// # Errors
/// Returns [`Error::EmptyInput`] when `rows` yields nothing.
pub fn compute_std_devs<I>(rows: I, averages: &Averages) -> Result<StdDevs>
where
    I: IntoIterator,
    I::Item: FeatureSource,
{
    let centres: Vec<(Feature, f64)> = averages.iter().collect();
    let mut squares = vec![0.0_f64; centres.len()];
    let mut count = 0_usize;

    for row in rows {
        for (acc, &(feature, mean)) in squares.iter_mut().zip(&centres) {
            let diff = row.feature(feature) - mean;
            *acc += diff * diff;
        }
        count += 1;
    }

    if count == 0 {
        return Err(Error::EmptyInput {
            what: "standard deviations",
        });
    }

    #[allow(clippy::cast_precision_loss)]
    let n = count as f64;
    log::debug!("Computed standard deviations over {} rows", count);

    Ok(StdDevs(
        centres
            .iter()
            .zip(squares)
            .map(|(&(f, _), acc)| (f, (acc / n).sqrt()))
            .collect(),
    ))
}

/// `[mean - k·sd, mean + k·sd]` for every averaged feature.
///
/// A feature with no standard deviation gets a zero-width band. A negative
/// `k` is not rejected; it inverts every band with a non-zero deviation,
/// and inverted bands never match.
pub fn make_range(averages: &Averages, std_devs: &StdDevs, k: f64) -> AttributeRange {
    if k < 0.0 {
        log::warn!("Negative tolerance {}: bands are inverted and will match nothing", k);
    }

    averages
        .iter()
        .map(|(feature, mean)| {
            let sd = std_devs.get(feature).unwrap_or(0.0);
            (feature, Band::around(mean, k * sd))
        })
        .collect()
}

/// One row of a statistics report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub feature: Feature,
    pub mean: f64,
    pub std_dev: f64,
    pub band: Band,
}

/// Combine averages, deviations and the derived band per feature.
pub fn summarize(averages: &Averages, std_devs: &StdDevs, k: f64) -> Vec<FeatureSummary> {
    let range = make_range(averages, std_devs, k);
    averages
        .iter()
        .filter_map(|(feature, mean)| {
            range.band(feature).map(|band| FeatureSummary {
                feature,
                mean,
                std_dev: std_devs.get(feature).unwrap_or(0.0),
                band: *band,
            })
        })
        .collect()
}
