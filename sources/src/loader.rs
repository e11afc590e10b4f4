//! Fetching and parsing the source tables of one build run.
//!
//! [`DataSource`] resolves a [`SourceFile`] to its text, either from a local
//! checkout of the open-data repository or over HTTP. [`SourceTables::load`]
//! fetches every file, parses it, and merges the Unicode tables in
//! [`UNICODE_LOAD_ORDER`].
//!
//! A file that cannot be fetched does not abort the run: the failure is
//! logged and recorded, and the table continues as if the file were empty.
//! Callers inspect [`SourceTables::failures`] to decide whether a partial
//! build is acceptable.
//!
//! # Example
//!
//! ```no_run
//! use cns_phonetics_sources::{DataSource, SourceTables};
//!
//! let tables = SourceTables::load(&DataSource::local("CNS11643-OpenData"));
//! let (records, report) = tables.build();
//! println!("{} records, {} failures", records.len(), tables.failures.len());
//! ```

use std::path::PathBuf;
use std::time::Duration;

use cns_phonetics_core::{
    MappingRecord, MergeReport, PhoneticMap, PinyinMap, UnicodeMap, build_records_with_report,
    merge_unicode_tables, parse_phonetic_table, parse_pinyin_table, parse_unicode_table,
};
use tracing::{debug, info, warn};

use crate::catalog::{SourceFile, UNICODE_LOAD_ORDER};
use crate::config::SourceConfig;
use crate::error::{Result, SourceError};
use crate::manifest::SourceDigest;

/// Where the source tables come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Files fetched over HTTP from `base_url` + relative path.
    Remote { base_url: String, timeout: Duration },
    /// Files read from a local checkout of the open-data repository.
    Local(PathBuf),
}

impl DataSource {
    /// Remote source described by the configuration.
    pub fn remote(config: &SourceConfig) -> Self {
        Self::Remote {
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
        }
    }

    /// Local checkout rooted at `dir`.
    pub fn local(dir: impl Into<PathBuf>) -> Self {
        Self::Local(dir.into())
    }

    /// Human-readable location, recorded in build manifests.
    pub fn describe(&self) -> String {
        match self {
            DataSource::Remote { base_url, .. } => base_url.clone(),
            DataSource::Local(dir) => dir.display().to_string(),
        }
    }

    /// Returns the text content of one source file.
    ///
    /// Builds a one-off [`Fetcher`]; use [`DataSource::fetcher`] to read
    /// several files over one HTTP client.
    ///
    /// # Errors
    ///
    /// See [`Fetcher::fetch`].
    pub fn fetch(&self, file: SourceFile) -> Result<String> {
        self.fetcher().fetch(file)
    }

    /// Fetcher that reuses one HTTP client across files.
    pub fn fetcher(&self) -> Fetcher<'_> {
        Fetcher {
            source: self,
            client: None,
        }
    }
}

/// Reads source files from one [`DataSource`].
///
/// The HTTP client of a remote source is built on the first download and
/// reused for the rest.
#[derive(Debug)]
pub struct Fetcher<'a> {
    source: &'a DataSource,
    client: Option<reqwest::blocking::Client>,
}

impl Fetcher<'_> {
    /// Returns the text content of one source file.
    ///
    /// Local and remote files are decoded the same way: the bytes must be
    /// valid UTF-8, and a leading byte order mark is removed.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] for unreadable local files,
    /// [`SourceError::Http`] for transport failures (including the timeout),
    /// [`SourceError::HttpStatus`] for non-success responses, and
    /// [`SourceError::Encoding`] for content that is not UTF-8.
    pub fn fetch(&mut self, file: SourceFile) -> Result<String> {
        let source = self.source;
        let (location, bytes) = match source {
            DataSource::Remote { base_url, timeout } => {
                let url = format!(
                    "{}/{}",
                    base_url.trim_end_matches('/'),
                    file.relative_path()
                );
                let bytes = self.download(&url, *timeout)?;
                (url, bytes)
            }
            DataSource::Local(dir) => {
                let path = dir.join(file.local_path());
                debug!(path = %path.display(), "reading source file");
                let bytes = std::fs::read(&path).map_err(|e| SourceError::io(&path, e))?;
                (path.display().to_string(), bytes)
            }
        };
        decode(location, bytes)
    }

    fn download(&mut self, url: &str, timeout: Duration) -> Result<Vec<u8>> {
        info!(%url, "downloading");
        let http_err = |source| SourceError::Http {
            url: url.to_string(),
            source,
        };

        let client = match self.client.take() {
            Some(client) => client,
            None => reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(http_err)?,
        };
        let client = self.client.insert(client);

        let response = client.get(url).send().map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().map_err(http_err)?.to_vec())
    }
}

fn decode(location: String, bytes: Vec<u8>) -> Result<String> {
    let content =
        String::from_utf8(bytes).map_err(|source| SourceError::Encoding { location, source })?;
    Ok(match content.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// A source file that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub file: SourceFile,
    pub cause: String,
}

/// Parsed intermediate tables of one build run.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    /// CNS code → Unicode, merged over [`UNICODE_LOAD_ORDER`].
    pub cns_to_unicode: UnicodeMap,
    /// CNS code → Bopomofo readings.
    pub cns_to_phonetic: PhoneticMap,
    /// Bopomofo → Pinyin variants.
    pub bopomofo_to_pinyin: PinyinMap,
    /// Digest of every file that loaded.
    pub digests: Vec<SourceDigest>,
    /// Files that failed to load and were treated as empty.
    pub failures: Vec<SourceFailure>,
}

impl SourceTables {
    /// Fetches and parses every source file from `source`.
    pub fn load(source: &DataSource) -> Self {
        info!(source = %source.describe(), "loading source tables");
        let mut fetcher = source.fetcher();
        Self::load_with(|file| fetcher.fetch(file))
    }

    /// Loads every source file through `fetch`.
    ///
    /// The phonetic and Pinyin tables are read first, then the Unicode
    /// tables in [`UNICODE_LOAD_ORDER`].
    pub fn load_with<F>(mut fetch: F) -> Self
    where
        F: FnMut(SourceFile) -> Result<String>,
    {
        let mut tables = SourceTables::default();

        if let Some(content) = tables.fetch_one(&mut fetch, SourceFile::Phonetic) {
            tables.cns_to_phonetic = parse_phonetic_table(&content);
            tables.record_entries(SourceFile::Phonetic, tables.cns_to_phonetic.len());
        }
        if let Some(content) = tables.fetch_one(&mut fetch, SourceFile::Pinyin) {
            tables.bopomofo_to_pinyin = parse_pinyin_table(&content);
            tables.record_entries(SourceFile::Pinyin, tables.bopomofo_to_pinyin.len());
        }

        let mut unicode_tables = Vec::with_capacity(UNICODE_LOAD_ORDER.len());
        for file in UNICODE_LOAD_ORDER {
            if let Some(content) = tables.fetch_one(&mut fetch, file) {
                let table = parse_unicode_table(&content);
                tables.record_entries(file, table.len());
                unicode_tables.push(table);
            }
        }
        tables.cns_to_unicode = merge_unicode_tables(unicode_tables);

        info!(
            unicode_mappings = tables.cns_to_unicode.len(),
            phonetic_entries = tables.cns_to_phonetic.len(),
            pinyin_mappings = tables.bopomofo_to_pinyin.len(),
            failures = tables.failures.len(),
            "source tables parsed"
        );
        tables
    }

    fn fetch_one<F>(&mut self, fetch: &mut F, file: SourceFile) -> Option<String>
    where
        F: FnMut(SourceFile) -> Result<String>,
    {
        match fetch(file) {
            Ok(content) => {
                self.digests.push(SourceDigest::of(file, &content));
                Some(content)
            }
            Err(err) => {
                warn!(file = %file, error = %err, "source file unavailable, continuing with an empty table");
                self.failures.push(SourceFailure {
                    file,
                    cause: err.to_string(),
                });
                None
            }
        }
    }

    fn record_entries(&mut self, file: SourceFile, entries: usize) {
        debug!(file = %file, entries, "parsed source file");
        if let Some(digest) = self.digests.iter_mut().find(|d| d.name == file.name()) {
            digest.entries = entries;
        }
    }

    /// Returns `true` if every source file loaded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Joins the tables into records.
    pub fn build(&self) -> (Vec<MappingRecord>, MergeReport) {
        build_records_with_report(
            &self.cns_to_unicode,
            &self.cns_to_phonetic,
            &self.bopomofo_to_pinyin,
        )
    }
}
