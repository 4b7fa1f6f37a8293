use serde::{Deserialize, Serialize};

use crate::model::feature::{Feature, FeatureSource};

/// Time signature assumed when the catalog does not provide one.
pub const DEFAULT_TIME_SIGNATURE: u8 = 4;

/// Modality of a track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Minor,
    Major,
}

impl Mode {
    /// Catalog encoding: `1` is major, anything else minor.
    pub fn from_flag(flag: i64) -> Self {
        if flag == 1 {
            Self::Major
        } else {
            Self::Minor
        }
    }
}

/// One catalog entry with its audio features.
///
/// Numeric fields that were missing from the source are zero rather than
/// absent; a track is never rejected for a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Catalog identifier (not guaranteed unique).
    pub id: String,

    /// Display name; the search tree orders tracks by this.
    pub name: String,

    /// Popularity score, 0-100.
    pub popularity: u32,

    pub duration_ms: u64,
    pub explicit: bool,

    /// Artist names in source order.
    pub artists: Vec<String>,

    /// Release date as given by the catalog (not validated).
    pub release_date: String,

    pub danceability: f64,
    pub energy: f64,
    pub valence: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub speechiness: f64,
    pub liveness: f64,

    /// Loudness in dB, usually negative.
    pub loudness: f64,

    /// Tempo in beats per minute.
    pub tempo: f64,

    /// Pitch class, 0-11.
    pub key: u8,
    pub mode: Mode,
    pub time_signature: u8,
}

impl Track {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            popularity: 0,
            duration_ms: 0,
            explicit: false,
            artists: Vec::new(),
            release_date: String::new(),
            danceability: 0.0,
            energy: 0.0,
            valence: 0.0,
            acousticness: 0.0,
            instrumentalness: 0.0,
            speechiness: 0.0,
            liveness: 0.0,
            loudness: 0.0,
            tempo: 0.0,
            key: 0,
            mode: Mode::Minor,
            time_signature: DEFAULT_TIME_SIGNATURE,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set a banded feature.
    ///
    /// Popularity is stored as an integer, so the value is rounded and
    /// clamped at zero.
    #[must_use]
    pub fn with_feature(mut self, feature: Feature, value: f64) -> Self {
        self.set_feature(feature, value);
        self
    }

    pub fn set_feature(&mut self, feature: Feature, value: f64) {
        match feature {
            Feature::Danceability => self.danceability = value,
            Feature::Energy => self.energy = value,
            Feature::Valence => self.valence = value,
            Feature::Tempo => self.tempo = value,
            Feature::Loudness => self.loudness = value,
            Feature::Acousticness => self.acousticness = value,
            Feature::Instrumentalness => self.instrumentalness = value,
            Feature::Speechiness => self.speechiness = value,
            Feature::Liveness => self.liveness = value,
            Feature::Popularity => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let popularity = value.max(0.0).round() as u32;
                self.popularity = popularity;
            }
        }
    }

    /// Artists joined for display.
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }
}

impl FeatureSource for Track {
    fn feature(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Danceability => self.danceability,
            Feature::Energy => self.energy,
            Feature::Valence => self.valence,
            Feature::Tempo => self.tempo,
            Feature::Loudness => self.loudness,
            Feature::Acousticness => self.acousticness,
            Feature::Instrumentalness => self.instrumentalness,
            Feature::Speechiness => self.speechiness,
            Feature::Popularity => f64::from(self.popularity),
            Feature::Liveness => self.liveness,
        }
    }
}
