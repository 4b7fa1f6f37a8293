//! Ingestion error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort ingestion.
///
/// Problems confined to a single row are not errors: the row is skipped
/// and counted in the [`crate::IngestReport`].
#[derive(Debug, Error)]
pub enum IngestError {
    /// An input file could not be opened or read.
    #[error("cannot read {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The header row lacks a column the feeder needs.
    #[error("{} has no {column} column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    /// An error propagated from the core domain layer.
    #[error(transparent)]
    Core(#[from] attune_core::Error),
}

impl IngestError {
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` when an input could not be read at all.
    pub fn is_source_unavailable(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. })
    }
}

/// Convenience alias for ingestion results.
pub type IngestResult<T> = std::result::Result<T, IngestError>;
