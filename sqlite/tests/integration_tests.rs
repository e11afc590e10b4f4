//! Integration tests for the cns-phonetics-sqlite crate.

use cns_phonetics_core::{Column, DisplayMode, build_records};
use cns_phonetics_core::{parse_phonetic_table, parse_pinyin_table, parse_unicode_table};
use cns_phonetics_sources::{SampleCheck, VerifyConfig};
use cns_phonetics_sqlite::{Criteria, PhoneticStore, StoreError, Verifier};

const UNICODE: &str = "1-4421\tU+9F8D\n1-4B3A\t884C\n1-2121\t4E00\n1-2122\t3001\nF-2121\t20000\n2-2121\t4E42\n";
const PHONETIC: &str = "1-4421\tㄌㄨㄥˊ\n1-4B3A\tㄒㄧㄥˊ\n1-4B3A\tㄏㄤˊ\n1-4B3A\tㄒㄧㄥˊ\n1-2121\tㄧ\nF-2121\tㄏㄜ\n2-2121\tㄧˋ\n";
const PINYIN: &str = "ㄌㄨㄥˊ\tlóng\tx\tx\tlung2\n\
                      ㄒㄧㄥˊ\txíng\tx\tx\thsing2\n\
                      ㄏㄤˊ\tháng\tx\tx\thang2\n\
                      ㄧ\tyī\tx\tx\ti1\n";

fn built_store(dir: &tempfile::TempDir) -> PhoneticStore {
    let records = build_records(
        &parse_unicode_table(UNICODE),
        &parse_phonetic_table(PHONETIC),
        &parse_pinyin_table(PINYIN),
    );
    let mut store = PhoneticStore::new(dir.path().join("ShowChinesePhonetics_data.db"));
    store.rebuild(&records).unwrap();
    store
}

// ---------------------------------------------------------------------------
// Build and lookup round trip
// ---------------------------------------------------------------------------

#[test]
fn test_every_code_point_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = built_store(&dir);
    assert_eq!(store.count().unwrap(), 5);

    let expected: &[(&str, &[&str])] = &[
        ("9F8D", &["ㄌㄨㄥˊ"]),
        ("884C", &["ㄒㄧㄥˊ", "ㄏㄤˊ"]),
        ("4E00", &["ㄧ"]),
        ("20000", &["ㄏㄜ"]),
        ("4E42", &["ㄧˋ"]),
    ];
    for (hex, readings) in expected {
        let record = store.get_by_unicode(hex).unwrap().unwrap();
        assert_eq!(record.phonetic_readings(), *readings, "U+{hex}");
        assert_eq!(record.pinyin_tonal().len(), readings.len());
        assert_eq!(record.pinyin_romanized_alt().len(), readings.len());
    }
    // CNS code without phonetic data.
    assert!(store.get_by_unicode("3001").unwrap().is_none());
}

#[test]
fn test_long_record_columns() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = built_store(&dir);

    let record = store.get_by_character('龍').unwrap().remove(0);
    assert_eq!(record.unicode_hex(), "9F8D");
    assert_eq!(record.column_value(Column::Phonetic), "ㄌㄨㄥˊ");
    assert_eq!(record.column_value(Column::PinyinHanDia), "lóng");
    assert_eq!(record.column_value(Column::PinyinWeiDia), "lung2");
}

#[test]
fn test_reading_without_pinyin_has_empty_fields() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = built_store(&dir);

    let record = store.get_by_unicode("20000").unwrap().unwrap();
    assert_eq!(record.pinyin_tonal(), [""]);
    assert_eq!(record.pinyin_romanized_alt(), [""]);
    assert_eq!(record.display_readings(DisplayMode::WadeGiles), vec!["ㄏㄜ"]);

    let rows = store
        .find(&Criteria::new().with(Column::PinyinHanDia, ""))
        .unwrap();
    let keys: Vec<_> = rows.iter().map(|r| r.unicode_hex()).collect();
    assert_eq!(keys, vec!["20000", "4E42"]);
}

#[test]
fn test_supplementary_plane_character_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = built_store(&dir);
    let found = store.get_by_character('\u{20000}').unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].joined_phonetic(), "ㄏㄜ");
}

// ---------------------------------------------------------------------------
// Filtered search
// ---------------------------------------------------------------------------

#[test]
fn test_unknown_criteria_key_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = built_store(&dir);

    let with_unknown = Criteria::from_pairs([("phonetic", "ㄧ"), ("radical", "一")]);
    let without = Criteria::from_pairs([("phonetic", "ㄧ")]);
    assert_eq!(with_unknown.ignored(), ["radical"]);
    assert_eq!(
        store.find(&with_unknown).unwrap(),
        store.find(&without).unwrap()
    );

    let only_unknown = Criteria::from_pairs([("radical", "一")]);
    assert_eq!(store.find(&only_unknown).unwrap().len(), 5);
}

#[test]
fn test_conjunctive_filter() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = built_store(&dir);

    let hit = Criteria::new()
        .with(Column::Phonetic, "ㄌㄨㄥˊ")
        .with(Column::PinyinWeiDia, "lung2");
    assert_eq!(store.find(&hit).unwrap().len(), 1);

    let miss = hit.with(Column::Unicode, "4E00");
    assert!(store.find(&miss).unwrap().is_empty());

    // Multi-reading rows only match on the full joined value.
    let joined = Criteria::new().with(Column::Phonetic, "ㄒㄧㄥˊ,ㄏㄤˊ");
    assert_eq!(store.find(&joined).unwrap()[0].unicode_hex(), "884C");
}

// ---------------------------------------------------------------------------
// Connection lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_close_and_reconnect() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = built_store(&dir);
    store.close();
    assert!(!store.is_connected());

    assert!(store.get_by_unicode("4E00").unwrap().is_some());
    assert!(store.is_connected());
}

#[test]
fn test_independent_stores_share_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = built_store(&dir);
    let mut reader = PhoneticStore::new(writer.path());
    assert_eq!(reader.count().unwrap(), writer.count().unwrap());
}

#[test]
fn test_missing_database_is_not_connected() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = PhoneticStore::new(dir.path().join("absent.db"));
    let err = store.find(&Criteria::new()).unwrap_err();
    assert!(matches!(err, StoreError::NotConnected { .. }));
    assert!(err.to_string().contains("absent.db"));
}

#[test]
fn test_custom_table_name() {
    let dir = tempfile::tempdir().unwrap();
    let records = build_records(
        &parse_unicode_table(UNICODE),
        &parse_phonetic_table(PHONETIC),
        &parse_pinyin_table(PINYIN),
    );
    let mut store = PhoneticStore::with_table(dir.path().join("t.db"), "chars_v2").unwrap();
    assert_eq!(store.rebuild(&records).unwrap(), 5);

    let mut default_table = PhoneticStore::new(store.path());
    assert!(matches!(
        default_table.count(),
        Err(StoreError::Database(_))
    ));
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

fn verify_config(min_records: usize, max_records: usize) -> VerifyConfig {
    VerifyConfig {
        min_records,
        max_records,
        key_sample_size: 100,
        samples: vec![
            SampleCheck::contains("4E00", "ㄧ"),
            SampleCheck::min_readings("884C", 2),
            SampleCheck::contains("20000", "ㄏㄜ"),
        ],
    }
}

#[test]
fn test_verifier_passes_in_range() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = built_store(&dir);
    let report = Verifier::new(verify_config(1, 10)).verify(&mut store);
    assert!(report.passed, "{:?}", report.problems);
    assert_eq!(report.record_count, Some(5));
}

#[test]
fn test_verifier_flags_low_count() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = built_store(&dir);
    let report = Verifier::new(verify_config(6, 10)).verify(&mut store);
    assert!(!report.passed);
    assert_eq!(report.problems.len(), 1);
    assert!(report.problems[0].contains("too low"));
}

#[test]
fn test_verifier_default_config_rejects_small_build() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = built_store(&dir);
    let report = Verifier::default().verify(&mut store);
    assert!(!report.passed);
    assert!(report.problems.iter().any(|p| p.contains("U+4E2D")));
}

#[test]
fn test_comma_bearing_pinyin_field_stays_readable() {
    let dir = tempfile::tempdir().unwrap();
    let records = build_records(
        &parse_unicode_table("1-4421\tU+9F8D\n1-2121\t4E00\n"),
        &parse_phonetic_table("1-4421\tㄌㄨㄥˊ\n1-2121\tㄧ\n"),
        &parse_pinyin_table("ㄌㄨㄥˊ\tlóng,lúng\tx\tx\tlung2\nㄧ\tyī\tx\tx\ti1\n"),
    );
    let mut store = PhoneticStore::new(dir.path().join("comma.db"));
    assert_eq!(store.rebuild(&records).unwrap(), 2);

    let long = store.get_by_unicode("9F8D").unwrap().unwrap();
    assert_eq!(long.pinyin_tonal(), ["lóng/lúng"]);
    assert_eq!(long.display_readings(DisplayMode::PinyinTonal), vec!["lóng/lúng"]);
    assert_eq!(store.find(&Criteria::new()).unwrap().len(), 2);

    let config = VerifyConfig {
        min_records: 1,
        max_records: 10,
        key_sample_size: 100,
        samples: vec![
            SampleCheck::contains("9F8D", "ㄌㄨㄥˊ"),
            SampleCheck::min_readings("9F8D", 1),
        ],
    };
    let report = Verifier::new(config).verify(&mut store);
    assert!(report.passed, "{:?}", report.problems);
}
