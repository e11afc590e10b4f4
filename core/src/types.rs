//! Phonetic record types.
//!
//! A [`MappingRecord`] holds every reading known for one Unicode code point.
//! The three reading sequences (Bopomofo, tonal Pinyin, Wade–Giles) are kept
//! index-aligned: readings can only be appended as whole triples, so index
//! *i* of each sequence always describes the same pronunciation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Separator used when a reading sequence is stored as a single text value.
pub const READING_SEPARATOR: char = ',';

/// Stands in for [`READING_SEPARATOR`] inside a single reading value.
pub const SEPARATOR_SUBSTITUTE: char = '/';

/// Normalizes a Unicode hex string to its canonical key form.
///
/// The value is trimmed, uppercased and stripped of a leading `U+` prefix
/// (matched case-insensitively).
///
/// # Examples
///
/// ```
/// use cns_phonetics_core::normalize_unicode_hex;
///
/// assert_eq!(normalize_unicode_hex("U+9f8d"), "9F8D");
/// assert_eq!(normalize_unicode_hex("u+20000"), "20000");
/// assert_eq!(normalize_unicode_hex("4e00"), "4E00");
/// ```
pub fn normalize_unicode_hex(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    match upper.strip_prefix("U+") {
        Some(rest) => rest.trim_start().to_string(),
        None => upper,
    }
}

/// Returns the canonical key for a character: uppercase hex, at least four digits.
///
/// ```
/// use cns_phonetics_core::char_to_unicode_hex;
///
/// assert_eq!(char_to_unicode_hex('龍'), "9F8D");
/// assert_eq!(char_to_unicode_hex('𠀀'), "20000");
/// assert_eq!(char_to_unicode_hex('A'), "0041");
/// ```
pub fn char_to_unicode_hex(c: char) -> String {
    format!("{:04X}", c as u32)
}

/// All readings known for a single Unicode code point.
///
/// # Examples
///
/// ```
/// use cns_phonetics_core::MappingRecord;
///
/// let mut record = MappingRecord::new("884C");
/// record.push_reading("ㄒㄧㄥˊ", "xíng", "hsing2");
/// record.push_reading("ㄏㄤˊ", "háng", "hang2");
///
/// assert_eq!(record.len(), 2);
/// assert_eq!(record.joined_phonetic(), "ㄒㄧㄥˊ,ㄏㄤˊ");
/// assert_eq!(record.joined_pinyin_tonal(), "xíng,háng");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingRecord {
    unicode_hex: String,
    phonetic_readings: Vec<String>,
    pinyin_tonal: Vec<String>,
    pinyin_romanized_alt: Vec<String>,
}

impl MappingRecord {
    /// Creates a record with no readings for the given code point.
    ///
    /// The key is normalized with [`normalize_unicode_hex`].
    pub fn new(unicode_hex: &str) -> Self {
        Self {
            unicode_hex: normalize_unicode_hex(unicode_hex),
            phonetic_readings: Vec::new(),
            pinyin_tonal: Vec::new(),
            pinyin_romanized_alt: Vec::new(),
        }
    }

    /// Appends one reading triple.
    ///
    /// A [`READING_SEPARATOR`] inside any value is replaced by
    /// [`SEPARATOR_SUBSTITUTE`], so the joined columns always split back into
    /// the same readings.
    ///
    /// Returns `false` without modifying the record when `bopomofo` is empty
    /// or already present.
    ///
    /// ```
    /// use cns_phonetics_core::MappingRecord;
    ///
    /// let mut record = MappingRecord::new("9F8D");
    /// record.push_reading("ㄌㄨㄥˊ", "lóng,lúng", "lung2");
    /// assert_eq!(record.pinyin_tonal(), ["lóng/lúng"]);
    /// ```
    pub fn push_reading(
        &mut self,
        bopomofo: impl Into<String>,
        pinyin_tonal: impl Into<String>,
        pinyin_alt: impl Into<String>,
    ) -> bool {
        let bopomofo = escape_separator(bopomofo.into());
        if bopomofo.is_empty() || self.contains_reading(&bopomofo) {
            return false;
        }
        self.phonetic_readings.push(bopomofo);
        self.pinyin_tonal.push(escape_separator(pinyin_tonal.into()));
        self.pinyin_romanized_alt
            .push(escape_separator(pinyin_alt.into()));
        true
    }

    /// Rebuilds a record from the comma-joined text stored in the database.
    ///
    /// A `None` phonetic column is read as empty text; a `None` Pinyin column
    /// yields an empty entry for every reading.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ReadingCountMismatch`] if the three columns do not
    /// split into the same number of readings.
    pub fn from_joined(
        unicode_hex: &str,
        phonetic: Option<&str>,
        pinyin_tonal: Option<&str>,
        pinyin_alt: Option<&str>,
    ) -> Result<Self> {
        let split = |value: Option<&str>| -> Vec<String> {
            value
                .unwrap_or_default()
                .split(READING_SEPARATOR)
                .map(str::to_string)
                .collect()
        };

        let phonetic_readings = split(phonetic);
        let mut tonal = split(pinyin_tonal);
        let mut alt = split(pinyin_alt);

        if pinyin_tonal.is_none() {
            tonal = vec![String::new(); phonetic_readings.len()];
        }
        if pinyin_alt.is_none() {
            alt = vec![String::new(); phonetic_readings.len()];
        }

        if tonal.len() != phonetic_readings.len() || alt.len() != phonetic_readings.len() {
            return Err(CoreError::ReadingCountMismatch {
                unicode: unicode_hex.to_string(),
                phonetic: phonetic_readings.len(),
                tonal: tonal.len(),
                alt: alt.len(),
            });
        }

        Ok(Self {
            unicode_hex: unicode_hex.to_string(),
            phonetic_readings,
            pinyin_tonal: tonal,
            pinyin_romanized_alt: alt,
        })
    }

    /// Canonical uppercase hex key.
    pub fn unicode_hex(&self) -> &str {
        &self.unicode_hex
    }

    /// The character this record describes, if the key is a valid scalar value.
    pub fn character(&self) -> Option<char> {
        u32::from_str_radix(&self.unicode_hex, 16)
            .ok()
            .and_then(char::from_u32)
    }

    pub fn phonetic_readings(&self) -> &[String] {
        &self.phonetic_readings
    }

    pub fn pinyin_tonal(&self) -> &[String] {
        &self.pinyin_tonal
    }

    pub fn pinyin_romanized_alt(&self) -> &[String] {
        &self.pinyin_romanized_alt
    }

    /// Number of readings.
    pub fn len(&self) -> usize {
        self.phonetic_readings.len()
    }

    /// Returns `true` if no reading has been added.
    pub fn is_empty(&self) -> bool {
        self.phonetic_readings.is_empty()
    }

    /// Returns `true` if `bopomofo` is already one of the readings.
    pub fn contains_reading(&self, bopomofo: &str) -> bool {
        self.phonetic_readings.iter().any(|r| r == bopomofo)
    }

    /// Iterates over the aligned reading triples.
    pub fn readings(&self) -> impl Iterator<Item = Reading<'_>> {
        self.phonetic_readings
            .iter()
            .zip(&self.pinyin_tonal)
            .zip(&self.pinyin_romanized_alt)
            .map(|((bopomofo, tonal), alt)| Reading {
                bopomofo,
                pinyin_tonal: tonal,
                pinyin_alt: alt,
            })
    }

    pub fn joined_phonetic(&self) -> String {
        join(&self.phonetic_readings)
    }

    pub fn joined_pinyin_tonal(&self) -> String {
        join(&self.pinyin_tonal)
    }

    pub fn joined_pinyin_alt(&self) -> String {
        join(&self.pinyin_romanized_alt)
    }

    /// Returns the stored text of one column.
    pub fn column_value(&self, column: Column) -> String {
        match column {
            Column::Unicode => self.unicode_hex.clone(),
            Column::Phonetic => self.joined_phonetic(),
            Column::PinyinHanDia => self.joined_pinyin_tonal(),
            Column::PinyinWeiDia => self.joined_pinyin_alt(),
        }
    }

    /// Readings to show for a display mode.
    ///
    /// Empty entries are skipped. When the selected Pinyin field has no
    /// entries at all, the Bopomofo readings are returned instead.
    ///
    /// ```
    /// use cns_phonetics_core::{DisplayMode, MappingRecord};
    ///
    /// let mut record = MappingRecord::new("4E00");
    /// record.push_reading("ㄧ", "", "");
    /// assert_eq!(record.display_readings(DisplayMode::PinyinTonal), vec!["ㄧ"]);
    /// ```
    pub fn display_readings(&self, mode: DisplayMode) -> Vec<&str> {
        let selected = match mode {
            DisplayMode::Bopomofo => non_empty(&self.phonetic_readings),
            DisplayMode::PinyinTonal => non_empty(&self.pinyin_tonal),
            DisplayMode::WadeGiles => non_empty(&self.pinyin_romanized_alt),
        };

        if selected.is_empty() && mode != DisplayMode::Bopomofo {
            return non_empty(&self.phonetic_readings);
        }
        selected
    }
}

fn non_empty(values: &[String]) -> Vec<&str> {
    values
        .iter()
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .collect()
}

fn join(values: &[String]) -> String {
    values.join(&*READING_SEPARATOR.encode_utf8(&mut [0; 4]))
}

fn escape_separator(value: String) -> String {
    if value.contains(READING_SEPARATOR) {
        value.replace(READING_SEPARATOR, SEPARATOR_SUBSTITUTE.encode_utf8(&mut [0; 4]))
    } else {
        value
    }
}

/// One pronunciation of a character across all three transcriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading<'a> {
    pub bopomofo: &'a str,
    pub pinyin_tonal: &'a str,
    pub pinyin_alt: &'a str,
}

/// Columns of the persisted `characters` table.
///
/// # Examples
///
/// ```
/// use cns_phonetics_core::Column;
///
/// assert_eq!("phonetic".parse::<Column>().unwrap(), Column::Phonetic);
/// assert_eq!("pinyin_tonal".parse::<Column>().unwrap(), Column::PinyinHanDia);
/// assert!("radical".parse::<Column>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    /// Canonical uppercase hex key.
    Unicode,
    /// Comma-joined Bopomofo readings.
    Phonetic,
    /// Comma-joined Hanyu Pinyin with tone diacritics.
    PinyinHanDia,
    /// Comma-joined Wade–Giles romanization.
    PinyinWeiDia,
}

impl Column {
    /// Every column, in table order.
    pub const ALL: [Column; 4] = [
        Column::Unicode,
        Column::Phonetic,
        Column::PinyinHanDia,
        Column::PinyinWeiDia,
    ];

    /// SQL column name.
    pub fn as_str(self) -> &'static str {
        match self {
            Column::Unicode => "unicode",
            Column::Phonetic => "phonetic",
            Column::PinyinHanDia => "pinyin_han_dia",
            Column::PinyinWeiDia => "pinyin_wei_dia",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Column {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "unicode" => Ok(Column::Unicode),
            "phonetic" => Ok(Column::Phonetic),
            "pinyin_han_dia" | "pinyin_tonal" => Ok(Column::PinyinHanDia),
            "pinyin_wei_dia" | "pinyin_alt" => Ok(Column::PinyinWeiDia),
            other => Err(CoreError::UnknownColumn(other.to_string())),
        }
    }
}

/// Which reading field a collaborator surfaces.
///
/// The numeric index matches the selector stored by host plugins:
/// `0` Bopomofo, `1` tonal Pinyin, `2` Wade–Giles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    #[default]
    Bopomofo,
    PinyinTonal,
    WadeGiles,
}

impl DisplayMode {
    pub fn index(self) -> u8 {
        match self {
            DisplayMode::Bopomofo => 0,
            DisplayMode::PinyinTonal => 1,
            DisplayMode::WadeGiles => 2,
        }
    }
}

impl TryFrom<u8> for DisplayMode {
    type Error = CoreError;

    fn try_from(index: u8) -> Result<Self> {
        match index {
            0 => Ok(DisplayMode::Bopomofo),
            1 => Ok(DisplayMode::PinyinTonal),
            2 => Ok(DisplayMode::WadeGiles),
            other => Err(CoreError::InvalidDisplayMode(other)),
        }
    }
}
