use std::path::Path;

use cns_phonetics_sources::{
    BuildManifest, DataSource, PhoneticsConfig, SourceFile, SourceTables, UNICODE_LOAD_ORDER,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_source(root: &Path, file: SourceFile, content: &str) {
    let path = root.join(file.local_path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn write_checkout(root: &Path) {
    write_source(
        root,
        SourceFile::Phonetic,
        "1-4421\tㄌㄨㄥˊ\n1-4B3A\tㄒㄧㄥˊ\n1-4B3A\tㄏㄤˊ\n1-2121\tㄧ\nF-2121\tㄏㄜ\n",
    );
    write_source(
        root,
        SourceFile::Pinyin,
        "ㄌㄨㄥˊ\tlóng\tㄌㄨㄥˊ\tlúng\tlung2\tlóng\n\
         ㄒㄧㄥˊ\txíng\tx\tsyíng\thsing2\tsing\n\
         ㄏㄤˊ\tháng\tx\tháng\thang2\thang\n",
    );
    write_source(
        root,
        SourceFile::UnicodeBmp,
        "1-4421\tU+9F8D\n1-4B3A\t884C\n1-2121\t4e00\n1-2122\t3001\n",
    );
    write_source(root, SourceFile::Unicode2, "F-2121\t20000\n");
    write_source(root, SourceFile::Unicode15, "1-2122\t3002\n");
}

// ---------------------------------------------------------------------------
// Local checkout loading
// ---------------------------------------------------------------------------

#[test]
fn test_local_checkout_loads_every_file() {
    let dir = tempfile::tempdir().unwrap();
    write_checkout(dir.path());

    let tables = SourceTables::load(&DataSource::local(dir.path()));
    assert!(tables.is_complete());
    assert_eq!(tables.digests.len(), 5);
    assert_eq!(tables.cns_to_unicode.len(), 5);
    assert_eq!(tables.cns_to_unicode["1-2122"], "3002");
    assert_eq!(tables.cns_to_phonetic["1-4B3A"], vec!["ㄒㄧㄥˊ", "ㄏㄤˊ"]);
}

#[test]
fn test_local_checkout_builds_expected_records() {
    let dir = tempfile::tempdir().unwrap();
    write_checkout(dir.path());

    let tables = SourceTables::load(&DataSource::local(dir.path()));
    let (records, report) = tables.build();

    let keys: Vec<_> = records.iter().map(|r| r.unicode_hex()).collect();
    assert_eq!(keys, vec!["9F8D", "884C", "4E00", "20000"]);

    let long = &records[0];
    assert_eq!(long.joined_phonetic(), "ㄌㄨㄥˊ");
    assert_eq!(long.joined_pinyin_tonal(), "lóng");
    assert_eq!(long.joined_pinyin_alt(), "lung2");

    // ㄧ and ㄏㄜ have no Pinyin entry in the fixture.
    assert_eq!(records[2].joined_pinyin_tonal(), "");
    assert_eq!(report.readings_without_pinyin, 2);
    assert_eq!(report.cns_without_phonetic, 1);
}

#[test]
fn test_loading_twice_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    write_checkout(dir.path());
    let source = DataSource::local(dir.path());

    let first = SourceTables::load(&source);
    let second = SourceTables::load(&source);
    assert!(first.cns_to_unicode.iter().eq(second.cns_to_unicode.iter()));
    assert_eq!(first.build().0, second.build().0);
}

#[test]
fn test_unicode_files_merge_in_load_order() {
    let dir = tempfile::tempdir().unwrap();
    write_checkout(dir.path());
    // Same CNS code in every Unicode table: the last table in the order wins.
    for (i, file) in UNICODE_LOAD_ORDER.iter().enumerate() {
        write_source(dir.path(), *file, &format!("1-4421\t{:X}\n", 0x9F8D + i));
    }

    let tables = SourceTables::load(&DataSource::local(dir.path()));
    assert_eq!(tables.cns_to_unicode["1-4421"], "9F8F");
}

#[test]
fn test_missing_directory_reports_every_file() {
    let tables = SourceTables::load(&DataSource::local("/nonexistent/cns-data"));
    assert_eq!(tables.failures.len(), SourceFile::ALL.len());
    assert!(tables.cns_to_unicode.is_empty());
    assert!(tables.build().0.is_empty());
}

// ---------------------------------------------------------------------------
// Manifest and config files
// ---------------------------------------------------------------------------

#[test]
fn test_manifest_reflects_build() {
    let dir = tempfile::tempdir().unwrap();
    write_checkout(dir.path());
    let source = DataSource::local(dir.path());
    let tables = SourceTables::load(&source);
    let (records, report) = tables.build();

    let manifest = BuildManifest::new("0.1.0", &source.describe(), &tables, &report, records.len());
    let path = BuildManifest::path_for(dir.path().join("out.db"));
    manifest.save(&path).unwrap();

    let loaded = BuildManifest::load(&path).unwrap();
    assert_eq!(loaded.record_count, 4);
    assert_eq!(loaded.files.len(), 5);
    assert!(loaded.failures.is_empty());
    assert!(loaded.changed_sources(&manifest).is_empty());
}

#[test]
fn test_config_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phonetics.yml");
    std::fs::write(
        &path,
        "source:\n  timeout_secs: 10\nverify:\n  min_records: 1\n  max_records: 5\n  samples: []\n",
    )
    .unwrap();

    let config = PhoneticsConfig::load(&path).unwrap();
    assert_eq!(config.source.timeout_secs, 10);
    assert_eq!(config.verify.max_records, 5);
    assert!(config.verify.samples.is_empty());
    assert_eq!(config.verify.key_sample_size, 100);
}
