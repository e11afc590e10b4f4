//! The CNS11643-OpenData files the build consumes.
//!
//! Paths are relative to the root of the open-data repository and keep the
//! URL-encoded form used on the remote host (`%20` for spaces). Local
//! directories use the decoded form, see [`SourceFile::local_path`].

use std::fmt;
use std::path::PathBuf;

/// Default remote location of the CNS11643-OpenData repository.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/yintzuyuan/CNS11643-OpenData/main";

/// One input table of the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFile {
    /// CNS code → Bopomofo.
    Phonetic,
    /// Bopomofo → Pinyin variants.
    Pinyin,
    /// CNS code → Unicode, Basic Multilingual Plane.
    UnicodeBmp,
    /// CNS code → Unicode, plane 2.
    Unicode2,
    /// CNS code → Unicode, characters added in Unicode 15.
    Unicode15,
}

/// Order in which the CNS → Unicode tables are merged.
///
/// A CNS code present in several tables takes its value from the table that
/// comes last in this list.
pub const UNICODE_LOAD_ORDER: [SourceFile; 3] = [
    SourceFile::UnicodeBmp,
    SourceFile::Unicode2,
    SourceFile::Unicode15,
];

impl SourceFile {
    /// Every source file, phonetic and Pinyin tables first.
    pub const ALL: [SourceFile; 5] = [
        SourceFile::Phonetic,
        SourceFile::Pinyin,
        SourceFile::UnicodeBmp,
        SourceFile::Unicode2,
        SourceFile::Unicode15,
    ];

    /// Path relative to the repository root, URL-encoded.
    pub fn relative_path(self) -> &'static str {
        match self {
            SourceFile::Phonetic => "Tables/Properties/CNS_phonetic.txt",
            SourceFile::Pinyin => "Tables/Properties/CNS_pinyin_2.txt",
            SourceFile::UnicodeBmp => "Tables/MapingTables/Unicode/CNS2UNICODE_Unicode%20BMP.txt",
            SourceFile::Unicode2 => "Tables/MapingTables/Unicode/CNS2UNICODE_Unicode%202.txt",
            SourceFile::Unicode15 => "Tables/MapingTables/Unicode/CNS2UNICODE_Unicode%2015.txt",
        }
    }

    /// Path relative to a local checkout, with `%20` decoded.
    pub fn local_path(self) -> PathBuf {
        PathBuf::from(self.relative_path().replace("%20", " "))
    }

    /// Short identifier used in logs and manifests.
    pub fn name(self) -> &'static str {
        match self {
            SourceFile::Phonetic => "phonetic",
            SourceFile::Pinyin => "pinyin",
            SourceFile::UnicodeBmp => "unicode_bmp",
            SourceFile::Unicode2 => "unicode_2",
            SourceFile::Unicode15 => "unicode_15",
        }
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
