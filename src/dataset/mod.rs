//! Column-oriented datasets and the cell values they hold.
//!
//! A [`Dataset`] is the materialized result of one query: an ordered map from
//! column name to the values of that column, every column the same length.

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Result, SnapcheckError};

/// A single cell.
///
/// Equality is type-aware: an `Int` never equals a `Float`, even when both
/// hold the same number. Two `Float`s are equal when their bits match or when
/// both are NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Human-readable variant name used in type mismatch reports.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "string",
        }
    }

    /// Returns true when both values are the same variant.
    #[must_use]
    pub const fn same_type(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::Null, Self::Null)
                | (Self::Int(_), Self::Int(_))
                | (Self::Float(_), Self::Float(_))
                | (Self::Text(_), Self::Text(_))
        )
    }

    /// Numeric view of the value, if it has one.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Null | Self::Text(_) => None,
        }
    }

    /// Total order used when sorting recorded rows.
    ///
    /// `Null` sorts first, then numbers (integers and floats compared
    /// numerically), then text.
    #[must_use]
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Null, _) => Ordering::Less,
            (_, Self::Null) => Ordering::Greater,
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Text(_), _) => Ordering::Greater,
            (_, Self::Text(_)) => Ordering::Less,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            },
        }
    }

    /// Parse a value written by [`Value`]'s `Display` implementation.
    ///
    /// # Errors
    /// Returns a description of the problem if the text is not a rendered value.
    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        if text == "NULL" {
            return Ok(Self::Null);
        }
        if let Some(quoted) = text.strip_prefix('\'') {
            let Some(body) = quoted.strip_suffix('\'') else {
                return Err(format!("unterminated string {text}"));
            };
            return unescape(body).map(Self::Text);
        }
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Self::Int(i));
        }
        text.parse::<f64>()
            .map(Self::Float)
            .map_err(|_| format!("unrecognized value '{text}'"))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => {
                a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
            }
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Int(i) => write!(f, "{i}"),
            // Debug keeps a decimal point or exponent, so floats never re-parse as ints
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Text(s) => write!(f, "'{}'", escape(s)),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

fn unescape(s: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => return Err(format!("unknown escape '\\{other}'")),
            None => return Err("dangling escape at end of string".to_string()),
        }
    }
    Ok(out)
}

/// Column-oriented snapshot of one query result.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    identifier: String,
    columns: IndexMap<String, Vec<Value>>,
    rows: usize,
}

impl Dataset {
    /// Build a dataset, checking that every column has the same length.
    ///
    /// # Errors
    /// Returns `RaggedDataset` if column lengths differ.
    pub fn new(identifier: impl Into<String>, columns: IndexMap<String, Vec<Value>>) -> Result<Self> {
        let identifier = identifier.into();
        let rows = columns.values().next().map_or(0, Vec::len);
        if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != rows) {
            return Err(SnapcheckError::RaggedDataset {
                dataset: identifier,
                column: name.clone(),
                expected: rows,
                actual: values.len(),
            });
        }
        Ok(Self {
            identifier,
            columns,
            rows,
        })
    }

    /// A dataset with a single column.
    #[must_use]
    pub fn single_column(
        identifier: impl Into<String>,
        column: impl Into<String>,
        values: Vec<Value>,
    ) -> Self {
        let rows = values.len();
        let mut columns = IndexMap::with_capacity(1);
        columns.insert(column.into(), values);
        Self {
            identifier: identifier.into(),
            columns,
            rows,
        }
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Look up a column by name.
    ///
    /// An exact match wins; otherwise a single case-insensitive match is
    /// accepted, since databases disagree on identifier case.
    ///
    /// # Errors
    /// Returns `UnknownColumn` if no column (or more than one
    /// case-insensitive candidate) matches.
    pub fn column(&self, name: &str) -> Result<&[Value]> {
        if let Some(values) = self.columns.get(name) {
            return Ok(values);
        }
        let mut candidates = self
            .columns
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name));
        match (candidates.next(), candidates.next()) {
            (Some((_, values)), None) => Ok(values),
            _ => Err(SnapcheckError::UnknownColumn {
                column: name.to_string(),
                dataset: self.identifier.clone(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "dataset_tests.rs"]
mod tests;
