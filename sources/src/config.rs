//! YAML configuration for building and verifying the phonetic database.
//!
//! Every field is optional; missing values fall back to the defaults used
//! for the published CNS 11643 data set.
//!
//! # Example YAML
//!
//! ```yaml
//! source:
//!   base_url: "https://raw.githubusercontent.com/yintzuyuan/CNS11643-OpenData/main"
//!   timeout_secs: 60
//! verify:
//!   min_records: 95000
//!   max_records: 100000
//!   key_sample_size: 100
//!   samples:
//!     - unicode: "4E00"
//!       phonetic_contains: "ㄧ"
//!     - unicode: "884C"
//!       min_readings: 2
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_BASE_URL;
use crate::error::{Result, SourceError};

/// Where remote source tables are fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the open-data repository; file paths are appended to it.
    pub base_url: String,
    /// Upper bound for a single file download, in seconds.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Expectation for one known code point.
///
/// Both expectations may be set on the same sample; each is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCheck {
    /// Uppercase hex key of the sample.
    pub unicode: String,
    /// Text that must occur in the comma-joined Bopomofo readings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic_contains: Option<String>,
    /// Minimum number of Bopomofo readings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_readings: Option<usize>,
}

impl SampleCheck {
    pub fn contains(unicode: &str, text: &str) -> Self {
        Self {
            unicode: unicode.to_string(),
            phonetic_contains: Some(text.to_string()),
            min_readings: None,
        }
    }

    pub fn min_readings(unicode: &str, count: usize) -> Self {
        Self {
            unicode: unicode.to_string(),
            phonetic_contains: None,
            min_readings: Some(count),
        }
    }
}

/// Thresholds and samples used by the database verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Smallest acceptable record count (inclusive).
    pub min_records: usize,
    /// Largest acceptable record count (inclusive).
    pub max_records: usize,
    /// Number of leading rows whose keys are format-checked.
    pub key_sample_size: usize,
    /// Known code points and what their readings must satisfy.
    pub samples: Vec<SampleCheck>,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            min_records: 95_000,
            max_records: 100_000,
            key_sample_size: 100,
            samples: vec![
                SampleCheck::contains("4E00", "ㄧ"),
                SampleCheck::contains("4E2D", "ㄓㄨㄥ"),
                SampleCheck::contains("6587", "ㄨㄣ"),
                SampleCheck::contains("5B57", "ㄗ"),
                SampleCheck::min_readings("884C", 2),
                SampleCheck::contains("20000", "ㄏㄜ"),
            ],
        }
    }
}

impl VerifyConfig {
    /// Returns `true` if `count` lies within `[min_records, max_records]`.
    pub fn accepts_count(&self, count: usize) -> bool {
        (self.min_records..=self.max_records).contains(&count)
    }
}

/// Top-level configuration file.
///
/// # Examples
///
/// ```no_run
/// use cns_phonetics_sources::PhoneticsConfig;
///
/// let config = PhoneticsConfig::load("phonetics.yml").unwrap();
/// println!("fetching from {}", config.source.base_url);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneticsConfig {
    pub source: SourceConfig,
    pub verify: VerifyConfig,
}

impl PhoneticsConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the file cannot be read, or
    /// [`SourceError::YamlError`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| SourceError::io(path, e))?;
        let config = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the file cannot be created, or
    /// [`SourceError::YamlError`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| SourceError::io(path, e))?;
        serde_yaml::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }
}
