//! Build manifest written next to a generated database.
//!
//! The manifest records what a build consumed and produced: a SHA-256
//! digest of every source file, which files failed to load, the sizes of the
//! intermediate tables, and the merge counters. Comparing two manifests shows
//! whether a rebuild saw different upstream data.
//!
//! # Examples
//!
//! ```no_run
//! use cns_phonetics_sources::BuildManifest;
//!
//! let manifest = BuildManifest::load("ShowChinesePhonetics_data.db.manifest.json").unwrap();
//! for file in &manifest.files {
//!     println!("{} {} ({} entries)", file.sha256, file.name, file.entries);
//! }
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use cns_phonetics_core::MergeReport;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::catalog::SourceFile;
use crate::error::{Result, SourceError};
use crate::loader::SourceTables;

/// Manifest format version.
pub const MANIFEST_VERSION: &str = "1.0";

/// Fingerprint of one loaded source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDigest {
    /// Short source identifier (see [`SourceFile::name`]).
    pub name: String,
    /// Lowercase hex SHA-256 of the file content.
    pub sha256: String,
    /// Content length in bytes.
    pub bytes: usize,
    /// Keys parsed from the file.
    pub entries: usize,
}

impl SourceDigest {
    /// Digests `content`; `entries` starts at zero until the file is parsed.
    pub fn of(file: SourceFile, content: &str) -> Self {
        Self {
            name: file.name().to_string(),
            sha256: format!("{:x}", Sha256::digest(content.as_bytes())),
            bytes: content.len(),
            entries: 0,
        }
    }
}

/// Summary of one database build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildManifest {
    /// Manifest format version.
    pub version: String,
    /// Version of the tool that produced the database.
    pub tool_version: String,
    /// RFC 3339 timestamp of the build.
    pub generated_at: String,
    /// Where the source tables came from.
    pub source: String,
    /// Digests of the files that loaded.
    pub files: Vec<SourceDigest>,
    /// `file: cause` for every file that failed to load.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<String>,
    pub unicode_mappings: usize,
    pub phonetic_entries: usize,
    pub pinyin_mappings: usize,
    pub cns_without_phonetic: usize,
    pub readings_without_pinyin: usize,
    pub shared_code_points: usize,
    /// Rows stored in the database.
    pub record_count: usize,
}

impl BuildManifest {
    /// Creates a manifest from the loaded tables and merge results.
    pub fn new(
        tool_version: &str,
        source: &str,
        tables: &SourceTables,
        report: &MergeReport,
        record_count: usize,
    ) -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            tool_version: tool_version.to_string(),
            generated_at: now_rfc3339(),
            source: source.to_string(),
            files: tables.digests.clone(),
            failures: tables
                .failures
                .iter()
                .map(|f| format!("{}: {}", f.file, f.cause))
                .collect(),
            unicode_mappings: tables.cns_to_unicode.len(),
            phonetic_entries: tables.cns_to_phonetic.len(),
            pinyin_mappings: tables.bopomofo_to_pinyin.len(),
            cns_without_phonetic: report.cns_without_phonetic,
            readings_without_pinyin: report.readings_without_pinyin,
            shared_code_points: report.shared_code_points,
            record_count,
        }
    }

    /// Conventional manifest location for a database file:
    /// `<database>.manifest.json`.
    pub fn path_for(database: impl AsRef<Path>) -> PathBuf {
        let mut name = database.as_ref().as_os_str().to_owned();
        name.push(".manifest.json");
        PathBuf::from(name)
    }

    /// Loads a manifest from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the file cannot be read, or
    /// [`SourceError::JsonError`] if the content is not valid manifest JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| SourceError::io(path, e))?;
        let manifest = serde_json::from_reader(BufReader::new(file))?;
        Ok(manifest)
    }

    /// Saves the manifest as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the file cannot be created, or
    /// [`SourceError::JsonError`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| SourceError::io(path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Names of source files whose digest differs between two manifests,
    /// including files present in only one of them.
    pub fn changed_sources(&self, other: &BuildManifest) -> Vec<String> {
        let mut changed = Vec::new();
        for file in SourceFile::ALL {
            let ours = self.files.iter().find(|d| d.name == file.name());
            let theirs = other.files.iter().find(|d| d.name == file.name());
            let differs = match (ours, theirs) {
                (Some(a), Some(b)) => a.sha256 != b.sha256,
                (None, None) => false,
                _ => true,
            };
            if differs {
                changed.push(file.name().to_string());
            }
        }
        changed
    }
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
