//! SQL generation for the phonetic table.
//!
//! The persisted layout is a single flat table, by default `characters`:
//!
//! | column           | content                               |
//! |------------------|---------------------------------------|
//! | `unicode`        | canonical uppercase hex key           |
//! | `phonetic`       | comma-joined Bopomofo readings        |
//! | `pinyin_han_dia` | comma-joined tonal Hanyu Pinyin       |
//! | `pinyin_wei_dia` | comma-joined Wade–Giles romanization  |
//!
//! plus a unique index on `unicode`. The table name is configurable but must
//! contain only alphanumeric characters and underscores, since it is
//! interpolated into SQL text.

use cns_phonetics_core::Column;

use crate::error::{Result, StoreError};

/// Table used when none is configured.
pub const DEFAULT_TABLE: &str = "characters";

/// Columns every valid store must expose, in table order.
pub const REQUIRED_COLUMNS: [Column; 4] = Column::ALL;

/// Validates that a table name contains only alphanumeric characters and underscores.
pub(crate) fn validate_table_name(table: &str) -> Result<()> {
    if table.is_empty() || !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::InvalidTableName(table.to_string()));
    }
    Ok(())
}

/// Generates the `CREATE TABLE` and `CREATE INDEX` statements for `table`.
///
/// # Errors
///
/// Returns [`StoreError::InvalidTableName`] if the name is empty or contains
/// characters other than alphanumerics and underscores.
pub fn generate_schema_sql(table: &str) -> Result<String> {
    validate_table_name(table)?;

    let sql = format!(
        r#"
CREATE TABLE IF NOT EXISTS {table} (
    unicode TEXT NOT NULL,
    phonetic TEXT,
    pinyin_han_dia TEXT,
    pinyin_wei_dia TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_{table}_unicode ON {table}(unicode);
"#,
        table = table
    );

    Ok(sql)
}

/// Generates SQL to drop `table` and its index.
///
/// # Errors
///
/// Returns [`StoreError::InvalidTableName`] if the name is invalid.
pub fn generate_drop_sql(table: &str) -> Result<String> {
    validate_table_name(table)?;

    Ok(format!(
        "DROP INDEX IF EXISTS idx_{table}_unicode;\nDROP TABLE IF EXISTS {table};\n"
    ))
}

/// Comma-separated column list in table order, for `SELECT` and `INSERT`.
pub(crate) fn column_list() -> String {
    REQUIRED_COLUMNS
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
