//! Joins the parsed tables into one [`MappingRecord`] per code point.
//!
//! The join runs over the CNS → Unicode table in its iteration order:
//!
//! 1. A CNS code without phonetic data produces nothing.
//! 2. Each Bopomofo reading is looked up in the Pinyin table; a miss keeps
//!    the reading and stores empty Pinyin fields.
//! 3. When several CNS codes map to the same code point, their readings are
//!    folded into the record created by the first one.

use indexmap::IndexMap;
use tracing::debug;

use crate::parse::{PhoneticMap, PinyinMap, UnicodeMap};
use crate::types::MappingRecord;

/// Counters describing one merge run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Records emitted.
    pub records: usize,
    /// CNS codes present in the Unicode table but absent from the phonetic table.
    pub cns_without_phonetic: usize,
    /// Readings stored with empty Pinyin fields.
    pub readings_without_pinyin: usize,
    /// Code points whose readings came from more than one CNS code.
    pub shared_code_points: usize,
}

/// Builds the merged records.
///
/// # Examples
///
/// ```
/// use cns_phonetics_core::{
///     build_records, parse_phonetic_table, parse_pinyin_table, parse_unicode_table,
/// };
///
/// let unicode = parse_unicode_table("1-4421\tU+9F8D\n");
/// let phonetic = parse_phonetic_table("1-4421\tㄌㄨㄥˊ\n");
/// let pinyin = parse_pinyin_table("ㄌㄨㄥˊ\tlóng\tx\tx\tlung2\n");
///
/// let records = build_records(&unicode, &phonetic, &pinyin);
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].unicode_hex(), "9F8D");
/// assert_eq!(records[0].joined_pinyin_alt(), "lung2");
/// ```
pub fn build_records(
    cns_to_unicode: &UnicodeMap,
    cns_to_phonetic: &PhoneticMap,
    bopomofo_to_pinyin: &PinyinMap,
) -> Vec<MappingRecord> {
    build_records_with_report(cns_to_unicode, cns_to_phonetic, bopomofo_to_pinyin).0
}

/// Builds the merged records and reports what the join dropped or degraded.
pub fn build_records_with_report(
    cns_to_unicode: &UnicodeMap,
    cns_to_phonetic: &PhoneticMap,
    bopomofo_to_pinyin: &PinyinMap,
) -> (Vec<MappingRecord>, MergeReport) {
    let mut by_code_point: IndexMap<&str, MappingRecord> = IndexMap::new();
    let mut report = MergeReport::default();

    for (cns_code, unicode_hex) in cns_to_unicode {
        let readings = match cns_to_phonetic.get(cns_code) {
            Some(readings) if !readings.is_empty() => readings,
            _ => {
                report.cns_without_phonetic += 1;
                continue;
            }
        };

        let shared = by_code_point.contains_key(unicode_hex.as_str());
        let record = by_code_point
            .entry(unicode_hex.as_str())
            .or_insert_with(|| MappingRecord::new(unicode_hex));
        if shared {
            debug!(cns = %cns_code, unicode = %unicode_hex, "code point shared by several CNS codes");
            report.shared_code_points += 1;
        }

        for bopomofo in readings {
            let pushed = match bopomofo_to_pinyin.get(bopomofo) {
                Some(entry) => record.push_reading(
                    bopomofo.as_str(),
                    entry.tonal.as_str(),
                    entry.romanized_alt.as_str(),
                ),
                None => {
                    let pushed = record.push_reading(bopomofo.as_str(), "", "");
                    if pushed {
                        report.readings_without_pinyin += 1;
                    }
                    pushed
                }
            };
            if !pushed {
                debug!(unicode = %unicode_hex, reading = %bopomofo, "duplicate reading skipped");
            }
        }
    }

    let records: Vec<MappingRecord> = by_code_point
        .into_values()
        .filter(|record| !record.is_empty())
        .collect();
    report.records = records.len();
    (records, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse_phonetic_table, parse_pinyin_table, parse_unicode_table};

    const PINYIN: &str = "ㄌㄨㄥˊ\tlóng\tㄌㄨㄥˊ\tlúng\tlung2\tlóng\n\
                          ㄧ\tyī\tㄧ\tyī\ti1\tyi\n\
                          ㄒㄧㄥˊ\txíng\tx\tsyíng\thsing2\tsing\n\
                          ㄏㄤˊ\tháng\tx\tháng\thang2\thang\n";

    #[test]
    fn test_single_reading_record() {
        let records = build_records(
            &parse_unicode_table("1-4421\tU+9F8D\n"),
            &parse_phonetic_table("1-4421\tㄌㄨㄥˊ\n"),
            &parse_pinyin_table(PINYIN),
        );
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.unicode_hex(), "9F8D");
        assert_eq!(record.joined_phonetic(), "ㄌㄨㄥˊ");
        assert_eq!(record.joined_pinyin_tonal(), "lóng");
        assert_eq!(record.joined_pinyin_alt(), "lung2");
    }

    #[test]
    fn test_code_without_phonetic_is_dropped() {
        let (records, report) = build_records_with_report(
            &parse_unicode_table("1-4421\t9F8D\n1-2121\t3000\n"),
            &parse_phonetic_table("1-4421\tㄌㄨㄥˊ\n"),
            &parse_pinyin_table(PINYIN),
        );
        assert_eq!(records.len(), 1);
        assert!(records.iter().all(|r| r.unicode_hex() != "3000"));
        assert_eq!(report.cns_without_phonetic, 1);
    }

    #[test]
    fn test_missing_pinyin_keeps_reading_with_empty_fields() {
        let (records, report) = build_records_with_report(
            &parse_unicode_table("1-4B3A\t884C\n"),
            &parse_phonetic_table("1-4B3A\tㄒㄧㄥˊ\n1-4B3A\tㄏㄤˋ\n1-4B3A\tㄏㄤˊ\n"),
            &parse_pinyin_table(PINYIN),
        );
        let record = &records[0];
        assert_eq!(record.phonetic_readings(), &["ㄒㄧㄥˊ", "ㄏㄤˋ", "ㄏㄤˊ"]);
        assert_eq!(record.pinyin_tonal(), &["xíng", "", "háng"]);
        assert_eq!(record.pinyin_romanized_alt(), &["hsing2", "", "hang2"]);
        assert_eq!(record.joined_pinyin_tonal(), "xíng,,háng");
        assert_eq!(report.readings_without_pinyin, 1);
    }

    #[test]
    fn test_reading_sequences_have_equal_length() {
        let records = build_records(
            &parse_unicode_table("1-4421\t9F8D\n1-4B3A\t884C\n1-2121\t4E00\n"),
            &parse_phonetic_table(
                "1-4421\tㄌㄨㄥˊ\n1-4B3A\tㄒㄧㄥˊ\n1-4B3A\tㄏㄤˊ\n1-4B3A\tㄏㄥˋ\n1-2121\tㄧ\n",
            ),
            &parse_pinyin_table(PINYIN),
        );
        assert_eq!(records.len(), 3);
        for record in &records {
            assert_eq!(record.phonetic_readings().len(), record.pinyin_tonal().len());
            assert_eq!(record.phonetic_readings().len(), record.pinyin_romanized_alt().len());
        }
    }

    #[test]
    fn test_output_follows_unicode_table_order() {
        let records = build_records(
            &parse_unicode_table("1-2121\t4E00\n1-4421\t9F8D\n1-4B3A\t884C\n"),
            &parse_phonetic_table("1-4B3A\tㄒㄧㄥˊ\n1-4421\tㄌㄨㄥˊ\n1-2121\tㄧ\n"),
            &parse_pinyin_table(PINYIN),
        );
        let keys: Vec<_> = records.iter().map(|r| r.unicode_hex()).collect();
        assert_eq!(keys, vec!["4E00", "9F8D", "884C"]);
    }

    #[test]
    fn test_shared_code_point_folds_readings() {
        let (records, report) = build_records_with_report(
            &parse_unicode_table("1-4B3A\t884C\nE-2121\t884C\n"),
            &parse_phonetic_table("1-4B3A\tㄒㄧㄥˊ\nE-2121\tㄏㄤˊ\nE-2121\tㄒㄧㄥˊ\n"),
            &parse_pinyin_table(PINYIN),
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].phonetic_readings(), &["ㄒㄧㄥˊ", "ㄏㄤˊ"]);
        assert_eq!(report.shared_code_points, 1);
    }

    #[test]
    fn test_build_is_deterministic() {
        let unicode = parse_unicode_table("1-4421\t9F8D\n1-4B3A\t884C\n1-2121\t4E00\n");
        let phonetic = parse_phonetic_table("1-4421\tㄌㄨㄥˊ\n1-4B3A\tㄒㄧㄥˊ\n1-2121\tㄧ\n");
        let pinyin = parse_pinyin_table(PINYIN);
        assert_eq!(
            build_records(&unicode, &phonetic, &pinyin),
            build_records(&unicode, &phonetic, &pinyin)
        );
    }
}
