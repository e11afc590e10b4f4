//! Parsers for the CNS 11643 tab-separated mapping tables.
//!
//! Every table shares the same line format: newline-delimited records with
//! tab-separated fields. Lines that are blank after trimming, or that contain
//! no tab at all, are skipped without a diagnostic since the published files
//! routinely end with blank lines.
//!
//! The three parsers differ only in how many fields they need and how
//! repeated keys are combined:
//!
//! | Table | Fields used | Repeated key |
//! |-------|-------------|--------------|
//! | CNS → Unicode | 0, 1 | later line overwrites |
//! | CNS → Bopomofo | 0, 1 | reading appended unless already present |
//! | Bopomofo → Pinyin | 0, 1, 4 | later line overwrites |
//!
//! All outputs are [`IndexMap`]s so iteration follows first insertion and
//! repeated runs over the same input produce identical tables.

use indexmap::IndexMap;

use crate::types::normalize_unicode_hex;

/// CNS code → canonical Unicode hex.
pub type UnicodeMap = IndexMap<String, String>;

/// CNS code → ordered, de-duplicated Bopomofo readings.
pub type PhoneticMap = IndexMap<String, Vec<String>>;

/// Bopomofo reading → Pinyin transcriptions.
pub type PinyinMap = IndexMap<String, PinyinEntry>;

/// Romanized forms of one Bopomofo reading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PinyinEntry {
    /// Hanyu Pinyin with tone diacritics (field 1).
    pub tonal: String,
    /// Wade–Giles romanization (field 4).
    pub romanized_alt: String,
}

/// Minimum field count of a Pinyin table line.
pub const PINYIN_MIN_FIELDS: usize = 5;

/// Yields the trimmed fields of every well-formed line.
fn records(content: &str) -> impl Iterator<Item = Vec<&str>> {
    content.lines().filter_map(|line| {
        if line.trim().is_empty() || !line.contains('\t') {
            return None;
        }
        Some(line.split('\t').map(str::trim).collect())
    })
}

/// Parses a `CNS_CODE<TAB>UNICODE_HEX` table.
///
/// The hex value is uppercased and an optional `U+` prefix is removed. Lines
/// whose code or hex is empty are skipped.
///
/// # Examples
///
/// ```
/// use cns_phonetics_core::parse_unicode_table;
///
/// let table = parse_unicode_table("1-4421\tU+9f8d\n1-4422\t4E00\n\n");
/// assert_eq!(table["1-4421"], "9F8D");
/// assert_eq!(table["1-4422"], "4E00");
/// ```
pub fn parse_unicode_table(content: &str) -> UnicodeMap {
    let mut map = UnicodeMap::new();
    for fields in records(content) {
        let cns = fields[0];
        let hex = normalize_unicode_hex(fields[1]);
        if cns.is_empty() || hex.is_empty() {
            continue;
        }
        map.insert(cns.to_string(), hex);
    }
    map
}

/// Parses a `CNS_CODE<TAB>BOPOMOFO` table.
///
/// A code may appear on several lines; each distinct reading is appended in
/// file order. Deduplication is by exact string match.
///
/// ```
/// use cns_phonetics_core::parse_phonetic_table;
///
/// let table = parse_phonetic_table("1-4B3A\tㄒㄧㄥˊ\n1-4B3A\tㄏㄤˊ\n1-4B3A\tㄒㄧㄥˊ\n");
/// assert_eq!(table["1-4B3A"], vec!["ㄒㄧㄥˊ", "ㄏㄤˊ"]);
/// ```
pub fn parse_phonetic_table(content: &str) -> PhoneticMap {
    let mut map = PhoneticMap::new();
    for fields in records(content) {
        let (cns, bopomofo) = (fields[0], fields[1]);
        if cns.is_empty() || bopomofo.is_empty() {
            continue;
        }
        let readings = map.entry(cns.to_string()).or_default();
        if !readings.iter().any(|r| r == bopomofo) {
            readings.push(bopomofo.to_string());
        }
    }
    map
}

/// Parses a `BOPOMOFO<TAB>HANYU<TAB>…<TAB>…<TAB>WADE_GILES<TAB>…` table.
///
/// Lines with fewer than [`PINYIN_MIN_FIELDS`] fields are skipped; fields past
/// the fifth are ignored.
///
/// ```
/// use cns_phonetics_core::parse_pinyin_table;
///
/// let table = parse_pinyin_table("ㄌㄨㄥˊ\tlóng\tlung2\tlung2\tlung2\tlóng\n");
/// assert_eq!(table["ㄌㄨㄥˊ"].tonal, "lóng");
/// assert_eq!(table["ㄌㄨㄥˊ"].romanized_alt, "lung2");
/// ```
pub fn parse_pinyin_table(content: &str) -> PinyinMap {
    let mut map = PinyinMap::new();
    for fields in records(content) {
        if fields.len() < PINYIN_MIN_FIELDS || fields[0].is_empty() {
            continue;
        }
        map.insert(
            fields[0].to_string(),
            PinyinEntry {
                tonal: fields[1].to_string(),
                romanized_alt: fields[4].to_string(),
            },
        );
    }
    map
}

/// Merges several Unicode tables in order; later tables win on key collision.
///
/// A key overwritten by a later table keeps the position of its first
/// occurrence.
pub fn merge_unicode_tables<I>(tables: I) -> UnicodeMap
where
    I: IntoIterator<Item = UnicodeMap>,
{
    let mut merged = UnicodeMap::new();
    for table in tables {
        merged.extend(table);
    }
    merged
}
