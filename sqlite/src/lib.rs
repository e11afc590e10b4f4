//! SQLite storage backend for CNS 11643 phonetic records.
//!
//! The database is a single flat table with one row per Unicode code point
//! and comma-joined reading columns. This crate owns its whole lifecycle:
//!
//! - **`schema`**: SQL generation with a validated, configurable table name
//! - **`store`**: [`PhoneticStore`], with rebuild, point lookups, filtered
//!   search and a lazily opened connection
//! - **`query`**: [`Criteria`], the typed filter accepted by
//!   [`PhoneticStore::find`]
//! - **`verify`**: [`Verifier`], the integrity checks run after a build
//!
//! # Quick start: build
//!
//! ```no_run
//! use cns_phonetics_sources::{DataSource, SourceTables};
//! use cns_phonetics_sqlite::PhoneticStore;
//!
//! let tables = SourceTables::load(&DataSource::local("CNS11643-OpenData"));
//! let (records, _report) = tables.build();
//!
//! let mut store = PhoneticStore::new("ShowChinesePhonetics_data.db");
//! let stored = store.rebuild(&records).unwrap();
//! println!("stored {stored} records");
//! ```
//!
//! # Quick start: lookups and verification
//!
//! ```no_run
//! use cns_phonetics_sources::VerifyConfig;
//! use cns_phonetics_sqlite::{Criteria, PhoneticStore, Verifier};
//!
//! let mut store = PhoneticStore::new("ShowChinesePhonetics_data.db");
//! for record in store.get_by_character('行').unwrap() {
//!     println!("{:?}", record.phonetic_readings());
//! }
//!
//! let matches = store.find(&Criteria::from_pairs([("pinyin_wei_dia", "lung2")])).unwrap();
//! println!("{} characters read lung2", matches.len());
//!
//! let report = Verifier::new(VerifyConfig::default()).verify(&mut store);
//! for problem in &report.problems {
//!     eprintln!("  - {problem}");
//! }
//! ```

mod error;
mod query;
mod schema;
mod store;
mod verify;

pub use error::{Result, StoreError};
pub use query::Criteria;
pub use schema::{DEFAULT_TABLE, REQUIRED_COLUMNS, generate_drop_sql, generate_schema_sql};
pub use store::PhoneticStore;
pub use verify::{VerifyReport, Verifier};
