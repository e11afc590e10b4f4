//! Typed filter for [`PhoneticStore::find`](crate::PhoneticStore::find).
//!
//! A [`Criteria`] is an ordered set of `(Column, value)` pairs combined with
//! `AND`. Column names are checked against the persisted schema when the
//! criteria are built, so only allow-listed identifiers ever reach the SQL
//! text; values are always bound as parameters.
//!
//! # Example
//!
//! ```
//! use cns_phonetics_core::Column;
//! use cns_phonetics_sqlite::Criteria;
//!
//! let criteria = Criteria::from_pairs([("phonetic", "ㄌㄨㄥˊ"), ("radical", "龍")]);
//! assert_eq!(criteria.pairs(), &[(Column::Phonetic, "ㄌㄨㄥˊ".to_string())]);
//! assert_eq!(criteria.ignored(), &["radical".to_string()]);
//! ```

use cns_phonetics_core::Column;
use tracing::warn;

/// Conjunctive exact-match filter over the stored columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pairs: Vec<(Column, String)>,
    ignored: Vec<String>,
}

impl Criteria {
    /// Empty criteria; matches every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `column = value`. An identical pair already present is not repeated.
    pub fn with(mut self, column: Column, value: impl Into<String>) -> Self {
        self.push(column, value.into());
        self
    }

    /// Builds criteria from untyped `(name, value)` pairs.
    ///
    /// Names outside the column allow-list are dropped with a warning and
    /// kept in [`ignored`](Self::ignored); they never affect the result.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut criteria = Self::new();
        for (name, value) in pairs {
            let name = name.as_ref();
            match name.parse::<Column>() {
                Ok(column) => criteria.push(column, value.into()),
                Err(_) => {
                    warn!(column = %name, "ignoring unknown search column");
                    criteria.ignored.push(name.to_string());
                }
            }
        }
        criteria
    }

    fn push(&mut self, column: Column, value: String) {
        if !self.pairs.iter().any(|(c, v)| *c == column && *v == value) {
            self.pairs.push((column, value));
        }
    }

    /// Accepted pairs, in insertion order.
    pub fn pairs(&self) -> &[(Column, String)] {
        &self.pairs
    }

    /// Column names that were rejected by [`from_pairs`](Self::from_pairs).
    pub fn ignored(&self) -> &[String] {
        &self.ignored
    }

    /// Returns `true` if no pair was accepted.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `WHERE` clause (empty when there are no pairs) and its bound values.
    pub(crate) fn where_clause(&self) -> (String, Vec<&str>) {
        if self.pairs.is_empty() {
            return (String::new(), Vec::new());
        }
        let conditions: Vec<String> = self
            .pairs
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ?{}", column.as_str(), i + 1))
            .collect();
        let values = self.pairs.iter().map(|(_, v)| v.as_str()).collect();
        (format!(" WHERE {}", conditions.join(" AND ")), values)
    }
}
