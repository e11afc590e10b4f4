//! The phonetic store: one SQLite file holding one row per code point.
//!
//! [`PhoneticStore`] owns the path, the table name and an optional
//! connection. The connection is opened on first use and can be released
//! with [`close`](PhoneticStore::close); the next call reconnects. Opening
//! never creates a file: a missing or unreadable database yields
//! [`StoreError::NotConnected`]. Only [`rebuild`](PhoneticStore::rebuild)
//! writes a new file.
//!
//! # Example
//!
//! ```no_run
//! use cns_phonetics_sqlite::{Criteria, PhoneticStore};
//! use cns_phonetics_core::Column;
//!
//! let mut store = PhoneticStore::new("ShowChinesePhonetics_data.db");
//!
//! if let Some(record) = store.get_by_unicode("U+9F8D").unwrap() {
//!     println!("{}", record.joined_phonetic());
//! }
//!
//! let criteria = Criteria::new().with(Column::Phonetic, "ㄌㄨㄥˊ");
//! for record in store.find(&criteria).unwrap() {
//!     println!("{}", record.unicode_hex());
//! }
//! store.close();
//! ```

use std::path::{Path, PathBuf};

use cns_phonetics_core::{Column, MappingRecord, char_to_unicode_hex, normalize_unicode_hex};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params_from_iter};
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::query::Criteria;
use crate::schema::{
    DEFAULT_TABLE, column_list, generate_drop_sql, generate_schema_sql, validate_table_name,
};

type RawRow = (String, Option<String>, Option<String>, Option<String>);

/// Handle on a phonetic database file.
#[derive(Debug)]
pub struct PhoneticStore {
    path: PathBuf,
    table: String,
    conn: Option<Connection>,
}

impl PhoneticStore {
    /// Store at `path` using the default `characters` table. Does not touch
    /// the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: DEFAULT_TABLE.to_string(),
            conn: None,
        }
    }

    /// Store at `path` using a custom table name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidTableName`] if the name contains
    /// characters other than ASCII alphanumerics and underscores.
    pub fn with_table(path: impl Into<PathBuf>, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        validate_table_name(&table)?;
        Ok(Self {
            path: path.into(),
            table,
            conn: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns `true` while a connection is held.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Opens the connection now instead of on first query.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotConnected`] if the file is missing or is not
    /// a readable SQLite database.
    pub fn connect(&mut self) -> Result<()> {
        self.connection().map(|_| ())
    }

    /// Releases the connection. Safe to call when not connected.
    pub fn close(&mut self) {
        if self.conn.take().is_some() {
            debug!(path = %self.path.display(), "closed phonetic store");
        }
    }

    fn connection(&mut self) -> Result<&Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => self.open()?,
        };
        Ok(&*self.conn.insert(conn))
    }

    fn open(&self) -> Result<Connection> {
        let not_connected = |reason: String| StoreError::NotConnected {
            path: self.path.clone(),
            reason,
        };
        if !self.path.is_file() {
            return Err(not_connected("file does not exist".to_string()));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&self.path, flags)
            .map_err(|e| not_connected(e.to_string()))?;
        // SQLite defers reading the header until the first statement.
        conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(|e| not_connected(e.to_string()))?;

        debug!(path = %self.path.display(), "opened phonetic store");
        Ok(conn)
    }

    /// Replaces the database file with one holding exactly `records`.
    ///
    /// Any open connection is closed, the existing file is removed, parent
    /// directories are created, and all rows are inserted in one
    /// transaction. The store stays connected to the new file.
    ///
    /// Returns the number of stored rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the old file cannot be removed or the
    /// parent directory cannot be created, and [`StoreError::Database`] if
    /// any statement fails.
    pub fn rebuild(&mut self, records: &[MappingRecord]) -> Result<usize> {
        self.close();

        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(io_err)?;
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut conn = Connection::open(&self.path)?;
        {
            let tx = conn.transaction()?;
            tx.execute_batch(&generate_drop_sql(&self.table)?)?;
            tx.execute_batch(&generate_schema_sql(&self.table)?)?;
            {
                let mut stmt = tx.prepare(&format!(
                    "INSERT INTO {} ({}) VALUES (?1, ?2, ?3, ?4)",
                    self.table,
                    column_list()
                ))?;
                for record in records {
                    stmt.execute([
                        record.unicode_hex(),
                        record.joined_phonetic().as_str(),
                        record.joined_pinyin_tonal().as_str(),
                        record.joined_pinyin_alt().as_str(),
                    ])?;
                }
            }
            tx.commit()?;
        }
        self.conn = Some(conn);

        let stored = self.count()?;
        info!(path = %self.path.display(), records = stored, "rebuilt phonetic store");
        Ok(stored)
    }

    /// Looks up one code point.
    ///
    /// The key is normalized first, so `"u+9f8d"` and `"9F8D"` are the same
    /// lookup. An empty key matches nothing.
    pub fn get_by_unicode(&mut self, unicode_hex: &str) -> Result<Option<MappingRecord>> {
        let key = normalize_unicode_hex(unicode_hex);
        if key.is_empty() {
            return Ok(None);
        }
        let criteria = Criteria::new().with(Column::Unicode, key);
        Ok(self.find(&criteria)?.into_iter().next())
    }

    /// Looks up the record of one character; empty if it has none.
    pub fn get_by_character(&mut self, c: char) -> Result<Vec<MappingRecord>> {
        Ok(self
            .get_by_unicode(&char_to_unicode_hex(c))?
            .into_iter()
            .collect())
    }

    /// Rows matching every pair of `criteria`, in storage order.
    pub fn find(&mut self, criteria: &Criteria) -> Result<Vec<MappingRecord>> {
        let (clause, values) = criteria.where_clause();
        let sql = format!(
            "SELECT {} FROM {}{} ORDER BY rowid",
            column_list(),
            self.table,
            clause
        );
        self.select(&sql, values)
    }

    /// Every row, in storage order.
    pub fn all_records(&mut self) -> Result<Vec<MappingRecord>> {
        self.find(&Criteria::new())
    }

    /// Number of stored rows.
    pub fn count(&mut self) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let count: i64 = self.connection()?.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Column names of the persisted table; empty if the table is missing.
    pub fn columns(&mut self) -> Result<Vec<String>> {
        let sql = format!("PRAGMA table_info({})", self.table);
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Keys of the first `limit` rows, in storage order.
    pub fn sample_keys(&mut self, limit: usize) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT unicode FROM {} ORDER BY rowid LIMIT ?1",
            self.table
        );
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let keys = stmt
            .query_map([limit as i64], |row| {
                Ok(row.get::<_, Option<String>>(0)?.unwrap_or_default())
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    /// Raw `phonetic` text of one code point, without decoding the row.
    ///
    /// The key is normalized like [`get_by_unicode`](Self::get_by_unicode).
    /// A NULL column reads as empty text.
    pub fn phonetic_text(&mut self, unicode_hex: &str) -> Result<Option<String>> {
        let key = normalize_unicode_hex(unicode_hex);
        if key.is_empty() {
            return Ok(None);
        }
        let sql = format!(
            "SELECT phonetic FROM {} WHERE unicode = ?1 ORDER BY rowid LIMIT 1",
            self.table
        );
        let text = self
            .connection()?
            .query_row(&sql, [key], |row| row.get::<_, Option<String>>(0))
            .optional()?;
        Ok(text.map(Option::unwrap_or_default))
    }

    /// Number of rows whose `phonetic` column is NULL or empty.
    pub fn count_without_phonetic(&mut self) -> Result<usize> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE phonetic IS NULL OR phonetic = ''",
            self.table
        );
        let count: i64 = self.connection()?.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn select(&mut self, sql: &str, values: Vec<&str>) -> Result<Vec<MappingRecord>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql)?;
        let rows: Vec<RawRow> = stmt
            .query_map(params_from_iter(values), |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(unicode, phonetic, tonal, alt)| {
                MappingRecord::from_joined(
                    &unicode,
                    phonetic.as_deref(),
                    tonal.as_deref(),
                    alt.as_deref(),
                )
                .map_err(StoreError::from)
            })
            .collect()
    }
}
