//! Core domain model for attune.
//!
//! This crate defines the track record and its audio features, the
//! per-feature attribute bands used to filter a catalog, and the
//! statistics that derive those bands from a reference set.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod model;
pub mod range;
pub mod stats;

pub use error::{Error, Result};
pub use model::{Feature, FeatureSet, FeatureSource, FeatureValues, Mode, Track};
pub use range::{in_range, AttributeRange, Band};
pub use stats::{compute_averages, compute_std_devs, make_range, Averages, StdDevs};
