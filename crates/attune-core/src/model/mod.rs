pub mod feature;
pub mod track;

pub use feature::{Feature, FeatureSet, FeatureSource, FeatureValues};
pub use track::{Mode, Track};
