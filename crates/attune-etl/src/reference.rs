//! Reference statistics feeder.
//!
//! The reference file is a CSV whose header names audio features (other
//! columns are ignored) and whose rows hold feature values, typically a
//! single row of precomputed means. Empty cells are left out of the row,
//! which the statistics treat as zero; a row with an unparsable cell or
//! bytes that are not UTF-8 is skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use attune_core::{Feature, FeatureValues};

use crate::catalog::{parse_feature, IngestReport};
use crate::csv::Records;
use crate::error::{IngestError, IngestResult};

/// Rows read from a reference file.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSet {
    pub rows: Vec<FeatureValues>,
    pub report: IngestReport,
}

impl ReferenceSet {
    /// Parse reference rows from `reader`; `origin` names the source in
    /// errors.
    ///
    /// # Errors
    /// Returns [`IngestError::SourceUnavailable`] if reading fails and
    /// [`IngestError::MissingColumn`] if no header names a feature.
    pub fn from_reader<R: BufRead>(reader: R, origin: &Path) -> IngestResult<Self> {
        let mut records = Records::new(reader);

        let Some(header) = records.next() else {
            log::warn!("Reference file {} is empty", origin.display());
            return Ok(Self::default());
        };
        let header = header.map_err(|e| IngestError::unavailable(origin, e))?;

        let columns: Vec<(usize, Feature)> = header
            .fields
            .iter()
            .enumerate()
            .filter_map(|(index, name)| Feature::from_name(name).map(|f| (index, f)))
            .collect();
        if columns.is_empty() {
            return Err(IngestError::MissingColumn {
                path: origin.to_path_buf(),
                column: "audio feature".to_string(),
            });
        }

        let mut set = Self::default();
        'rows: for record in records {
            let record = record.map_err(|e| IngestError::unavailable(origin, e))?;
            if record.lossy {
                log::debug!("Skipping {}:{}: row is not valid UTF-8", origin.display(), record.line);
                set.report.skip();
                continue;
            }
            let mut values = FeatureValues::new();

            for &(index, feature) in &columns {
                let raw = record.field(index);
                if raw.is_empty() {
                    continue;
                }
                match parse_feature(feature, raw) {
                    Ok(value) => values.set(feature, value),
                    Err(e) => {
                        log::debug!("Skipping {}:{}: {}", origin.display(), record.line, e);
                        set.report.skip();
                        continue 'rows;
                    }
                }
            }

            set.rows.push(values);
            set.report.accept();
        }

        log::info!(
            "Loaded {} reference rows from {} ({} skipped)",
            set.report.rows_accepted,
            origin.display(),
            set.report.rows_skipped
        );

        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read the reference file at `path`.
///
/// # Errors
/// See [`ReferenceSet::from_reader`].
pub fn load_reference(path: &Path) -> IngestResult<ReferenceSet> {
    let file = File::open(path).map_err(|e| IngestError::unavailable(path, e))?;
    ReferenceSet::from_reader(BufReader::new(file), path)
}
