//! Phonetic reading records and CNS 11643 table processing.
//!
//! This crate defines the data model and the pure transformation steps of
//! the phonetic lookup pipeline:
//!
//! - [`MappingRecord`]: every reading known for one Unicode code point, with
//!   Bopomofo, tonal Pinyin and Wade–Giles sequences kept index-aligned.
//! - [`parse_unicode_table`], [`parse_phonetic_table`],
//!   [`parse_pinyin_table`]: tab-separated table parsers producing
//!   insertion-ordered maps.
//! - [`build_records`]: joins the parsed tables into records.
//! - [`Column`] and [`DisplayMode`]: the persisted column set and the
//!   reading selector used by display collaborators.
//!
//! # Example
//!
//! ```
//! use cns_phonetics_core::*;
//!
//! let unicode = merge_unicode_tables([
//!     parse_unicode_table("1-4421\tU+9F8D\n"),
//!     parse_unicode_table("1-2121\t4E00\n"),
//! ]);
//! let phonetic = parse_phonetic_table("1-4421\tㄌㄨㄥˊ\n1-2121\tㄧ\n");
//! let pinyin = parse_pinyin_table("ㄌㄨㄥˊ\tlóng\tx\tx\tlung2\n");
//!
//! let records = build_records(&unicode, &phonetic, &pinyin);
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].display_readings(DisplayMode::PinyinTonal), vec!["ㄧ"]);
//! ```

mod error;
mod merge;
mod parse;
mod types;

pub use error::{CoreError, Result};
pub use merge::{MergeReport, build_records, build_records_with_report};
pub use parse::{
    PINYIN_MIN_FIELDS, PhoneticMap, PinyinEntry, PinyinMap, UnicodeMap, merge_unicode_tables,
    parse_phonetic_table, parse_pinyin_table, parse_unicode_table,
};
pub use types::*;
