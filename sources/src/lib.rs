//! Source table loading, configuration and build manifests.
//!
//! This crate connects the pure parsers of `cns-phonetics-core` to the
//! CNS11643-OpenData files they read:
//!
//! - [`SourceFile`] and [`UNICODE_LOAD_ORDER`] name the input tables and the
//!   fixed order in which the Unicode tables are merged.
//! - [`DataSource`] fetches a file from a local checkout or over HTTP.
//! - [`SourceTables`] loads and parses every file, tolerating individual
//!   failures.
//! - [`PhoneticsConfig`] is the YAML configuration shared by the build and
//!   verify commands.
//! - [`BuildManifest`] records what a build consumed and produced.
//!
//! # Quick start
//!
//! ```no_run
//! use cns_phonetics_sources::{BuildManifest, DataSource, PhoneticsConfig, SourceTables};
//!
//! let config = PhoneticsConfig::default();
//! let source = DataSource::remote(&config.source);
//! let tables = SourceTables::load(&source);
//! let (records, report) = tables.build();
//!
//! let manifest = BuildManifest::new("0.1.0", &source.describe(), &tables, &report, records.len());
//! manifest.save("phonetics.db.manifest.json").unwrap();
//! ```

mod catalog;
mod config;
mod error;
mod loader;
mod manifest;

pub use catalog::{DEFAULT_BASE_URL, SourceFile, UNICODE_LOAD_ORDER};
pub use config::{PhoneticsConfig, SampleCheck, SourceConfig, VerifyConfig};
pub use error::{Result, SourceError};
pub use loader::{DataSource, Fetcher, SourceFailure, SourceTables};
pub use manifest::{BuildManifest, MANIFEST_VERSION, SourceDigest};
