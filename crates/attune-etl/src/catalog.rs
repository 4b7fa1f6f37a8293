//! Catalog ingestion: turn the tracks CSV into [`Track`] records.
//!
//! Columns are located by header name, so extra columns (such as
//! `id_artists`) and any column order are accepted. Only `name` is
//! mandatory. Empty values degrade to zero (time signature to 4); rows
//! that are too short, have no name, are not valid UTF-8, or carry an
//! unparsable audio feature are skipped and counted.

use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use attune_core::model::track::DEFAULT_TIME_SIGNATURE;
use attune_core::{Feature, Mode, Track};
use attune_search::SearchTree;

use crate::csv::{Record, Records};
use crate::error::{IngestError, IngestResult};

/// Row counts from one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Data rows seen, excluding the header.
    pub rows_read: usize,
    pub rows_accepted: usize,
    pub rows_skipped: usize,
}

impl IngestReport {
    pub(crate) fn accept(&mut self) {
        self.rows_read += 1;
        self.rows_accepted += 1;
    }

    pub(crate) fn skip(&mut self) {
        self.rows_read += 1;
        self.rows_skipped += 1;
    }
}

/// Why a single row was skipped.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RowError {
    TooFewFields { expected: usize, found: usize },
    MissingName,
    InvalidEncoding,
    Unparsable { column: &'static str, value: String },
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewFields { expected, found } => {
                write!(f, "expected {expected} fields, found {found}")
            }
            Self::MissingName => f.write_str("empty track name"),
            Self::InvalidEncoding => f.write_str("row is not valid UTF-8"),
            Self::Unparsable { column, value } => write!(f, "cannot parse {column} value {value:?}"),
        }
    }
}

/// Parse a banded feature: empty is zero, anything else must be a finite
/// number.
pub(crate) fn parse_feature(feature: Feature, raw: &str) -> Result<f64, RowError> {
    if raw.is_empty() {
        return Ok(0.0);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(RowError::Unparsable {
            column: feature.name(),
            value: raw.to_string(),
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Id,
    Name,
    DurationMs,
    Explicit,
    Artists,
    ReleaseDate,
    Key,
    Mode,
    TimeSignature,
    Feature(Feature),
}

impl Column {
    fn from_header(name: &str) -> Option<Self> {
        let column = match name.trim().to_ascii_lowercase().as_str() {
            "id" => Self::Id,
            "name" => Self::Name,
            "duration_ms" | "duration" => Self::DurationMs,
            "explicit" => Self::Explicit,
            "artists" => Self::Artists,
            "release_date" => Self::ReleaseDate,
            "key" => Self::Key,
            "mode" => Self::Mode,
            "time_signature" => Self::TimeSignature,
            other => Self::Feature(Feature::from_name(other)?),
        };
        Some(column)
    }
}

/// Column positions taken from the header row.
#[derive(Debug, Clone)]
struct Schema {
    columns: Vec<(usize, Column)>,
    name: usize,
    min_fields: usize,
}

impl Schema {
    fn from_header(header: &Record) -> Option<Self> {
        let mut columns = Vec::new();
        for (index, raw) in header.fields.iter().enumerate() {
            if let Some(column) = Column::from_header(raw) {
                // First occurrence wins for repeated headers.
                if !columns.iter().any(|&(_, c)| c == column) {
                    columns.push((index, column));
                }
            }
        }

        let name = columns
            .iter()
            .find(|&&(_, c)| c == Column::Name)
            .map(|&(index, _)| index)?;
        let min_fields = columns.iter().map(|&(index, _)| index + 1).max().unwrap_or(0);

        Some(Self {
            columns,
            name,
            min_fields,
        })
    }

    fn parse(&self, record: &Record) -> Result<Track, RowError> {
        if record.lossy {
            return Err(RowError::InvalidEncoding);
        }
        if record.len() < self.min_fields {
            return Err(RowError::TooFewFields {
                expected: self.min_fields,
                found: record.len(),
            });
        }

        let name = record.field(self.name);
        if name.is_empty() {
            return Err(RowError::MissingName);
        }

        let mut track = Track::new(name);
        for &(index, column) in &self.columns {
            let raw = record.field(index);
            match column {
                Column::Name => {}
                Column::Id => track.id = raw.to_string(),
                Column::DurationMs => track.duration_ms = raw.parse().unwrap_or_default(),
                Column::Explicit => track.explicit = parse_flag(raw),
                Column::Artists => track.artists = parse_artists(raw),
                Column::ReleaseDate => track.release_date = raw.to_string(),
                Column::Key => track.key = raw.parse().unwrap_or_default(),
                Column::Mode => track.mode = Mode::from_flag(raw.parse().unwrap_or_default()),
                Column::TimeSignature => {
                    track.time_signature = raw.parse().unwrap_or(DEFAULT_TIME_SIGNATURE);
                }
                Column::Feature(feature) => track.set_feature(feature, parse_feature(feature, raw)?),
            }
        }

        Ok(track)
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.to_ascii_lowercase().as_str(),
        "1" | "true" | "t" | "yes" | "y"
    )
}

/// Unpack an artist field.
///
/// Accepts the Python list form `['A', "B's"]`, a bare bracketed list
/// `[A, B]`, a `;`-separated list or a single name.
fn parse_artists(raw: &str) -> Vec<String> {
    let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) else {
        return raw
            .split(';')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from)
            .collect();
    };

    let mut artists = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => {
                artists.push(std::mem::take(&mut current));
                quote = None;
            }
            Some(_) if c == '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                current.clear();
                quote = Some(c);
            }
            None => current.push(c),
        }
    }

    if artists.is_empty() {
        // No quoted items: treat as a plain comma list.
        return current
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from)
            .collect();
    }

    artists
}

/// The tracks read from a catalog file.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub tracks: Vec<Track>,
    pub report: IngestReport,
}

/// Tracks picked out of a catalog by name.
#[derive(Debug, Clone, Default)]
pub struct SeedSelection<'a> {
    pub matched: Vec<&'a Track>,
    /// Requested names with no track in the catalog.
    pub missing: Vec<String>,
}

impl Catalog {
    /// Parse a catalog from `reader`; `origin` names the source in errors.
    ///
    /// # Errors
    /// Returns [`IngestError::SourceUnavailable`] if reading fails and
    /// [`IngestError::MissingColumn`] if the header has no `name` column.
    pub fn from_reader<R: BufRead>(reader: R, origin: &Path) -> IngestResult<Self> {
        let mut records = Records::new(reader);

        let Some(header) = records.next() else {
            log::warn!("Catalog {} is empty", origin.display());
            return Ok(Self::default());
        };
        let header = header.map_err(|e| IngestError::unavailable(origin, e))?;
        let schema = Schema::from_header(&header).ok_or_else(|| IngestError::MissingColumn {
            path: origin.to_path_buf(),
            column: "name".to_string(),
        })?;

        let mut catalog = Self::default();
        for record in records {
            let record = record.map_err(|e| IngestError::unavailable(origin, e))?;
            match schema.parse(&record) {
                Ok(track) => {
                    catalog.tracks.push(track);
                    catalog.report.accept();
                }
                Err(e) => {
                    log::debug!("Skipping {}:{}: {}", origin.display(), record.line, e);
                    catalog.report.skip();
                }
            }
        }

        log::info!(
            "Ingested {} tracks from {} ({} rows skipped)",
            catalog.report.rows_accepted,
            origin.display(),
            catalog.report.rows_skipped
        );

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Every track whose name equals one of `names`, ignoring case.
    ///
    /// Tracks are returned in catalog order; a name shared by several
    /// tracks selects all of them.
    pub fn select_named<S: AsRef<str>>(&self, names: &[S]) -> SeedSelection<'_> {
        let wanted: Vec<String> = names
            .iter()
            .map(|n| n.as_ref().trim().to_lowercase())
            .collect();
        let mut seen = vec![false; wanted.len()];

        let matched = self
            .tracks
            .iter()
            .filter(|track| {
                let lowered = track.name.to_lowercase();
                let mut hit = false;
                for (i, name) in wanted.iter().enumerate() {
                    if *name == lowered {
                        seen[i] = true;
                        hit = true;
                    }
                }
                hit
            })
            .collect();

        let missing: Vec<String> = names
            .iter()
            .zip(&seen)
            .filter(|(_, &found)| !found)
            .map(|(name, _)| name.as_ref().to_string())
            .collect();

        for name in &missing {
            log::warn!("Seed track not found in catalog: {}", name);
        }

        SeedSelection { matched, missing }
    }

    /// Build the search tree, inserting tracks in catalog order.
    pub fn into_tree(self) -> SearchTree {
        let mut tree = SearchTree::with_capacity(self.tracks.len());
        tree.extend(self.tracks);
        log::debug!("Built search tree: {} nodes, height {}", tree.len(), tree.height());
        tree
    }
}

/// Read the catalog at `path`.
///
/// # Errors
/// See [`Catalog::from_reader`].
pub fn load_catalog(path: &Path) -> IngestResult<Catalog> {
    let file = File::open(path).map_err(|e| IngestError::unavailable(path, e))?;
    Catalog::from_reader(BufReader::new(file), path)
}
