//! Ingestion and configuration for attune.
//!
//! Reads the catalog and reference-statistics CSV files into core types,
//! skipping rows that cannot be used, and loads the layered configuration.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod config;
pub mod csv;
pub mod error;
pub mod reference;

pub use catalog::{load_catalog, Catalog, IngestReport, SeedSelection};
pub use config::Config;
pub use error::{IngestError, IngestResult};
pub use reference::{load_reference, ReferenceSet};
