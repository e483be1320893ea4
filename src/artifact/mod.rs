//! Text form of recorded results.
//!
//! ```text
//! arrival_values
//! 1 | ID: 7; VAL: 3.0
//! 2 | ID: 8; VAL: NULL
//! ```
//!
//! The first line is the label. Every following line is one row: a 1-based
//! sequence number, then `name: value` cells separated by `; `. Values use the
//! syntax of [`Value`]'s `Display`, so reading an artifact back yields the
//! exact values that were written.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use crate::dataset::Value;
use crate::{Result, SnapcheckError};

const SEQUENCE_SEPARATOR: &str = " |";
const CELL_SEPARATOR: &str = "; ";
const NAME_SEPARATOR: &str = ": ";

/// One row of a recorded result.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRow {
    pub sequence: usize,
    pub cells: Vec<(String, Value)>,
}

impl RecordedRow {
    #[must_use]
    pub const fn new(sequence: usize, cells: Vec<(String, Value)>) -> Self {
        Self { sequence, cells }
    }
}

impl fmt::Display for RecordedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEQUENCE_SEPARATOR}", self.sequence)?;
        for (i, (name, value)) in self.cells.iter().enumerate() {
            let sep = if i == 0 { " " } else { CELL_SEPARATOR };
            write!(f, "{sep}{name}{NAME_SEPARATOR}{value}")?;
        }
        Ok(())
    }
}

/// A labeled, ordered sequence of recorded rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    label: String,
    rows: Vec<RecordedRow>,
}

impl Artifact {
    #[must_use]
    pub const fn new(label: String, rows: Vec<RecordedRow>) -> Self {
        Self { label, rows }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn rows(&self) -> &[RecordedRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render the artifact in its on-disk text form.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.label);
        out.push('\n');
        for row in &self.rows {
            let _ = writeln!(out, "{row}");
        }
        out
    }

    /// Parse the on-disk text form. `path` is used only for error reports.
    ///
    /// # Errors
    /// Returns `MalformedArtifact` if any line is not a valid row.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let mut lines = text.lines();
        let label = lines.next().unwrap_or_default().to_string();
        let rows = lines
            .enumerate()
            .map(|(i, line)| {
                parse_row(line).map_err(|reason| SnapcheckError::MalformedArtifact {
                    path: path.to_path_buf(),
                    line: i + 2,
                    reason,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { label, rows })
    }

    /// Read and parse an artifact file.
    ///
    /// # Errors
    /// Returns `MissingArtifact` if the file cannot be read, or
    /// `MalformedArtifact` if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| SnapcheckError::MissingArtifact {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&text, path)
    }
}

fn parse_row(line: &str) -> std::result::Result<RecordedRow, String> {
    let Some((sequence, rest)) = line.split_once(SEQUENCE_SEPARATOR) else {
        return Err(format!("missing '{SEQUENCE_SEPARATOR}' after sequence number"));
    };
    let sequence = sequence
        .parse::<usize>()
        .map_err(|_| format!("invalid sequence number '{sequence}'"))?;

    let mut cells = Vec::new();
    let mut rest = match rest.strip_prefix(' ') {
        Some(r) => r,
        None if rest.is_empty() => rest,
        None => return Err("expected a space after the sequence number".to_string()),
    };
    while !rest.is_empty() {
        let Some((name, after_name)) = rest.split_once(NAME_SEPARATOR) else {
            return Err(format!("cell without '{NAME_SEPARATOR}': '{rest}'"));
        };
        let (raw, remainder) = split_value(after_name)?;
        cells.push((name.to_string(), Value::parse(raw)?));
        rest = match remainder.strip_prefix(CELL_SEPARATOR) {
            Some(r) if !r.is_empty() => r,
            Some(_) => return Err("trailing cell separator".to_string()),
            None if remainder.is_empty() => remainder,
            None => return Err(format!("unexpected text after value: '{remainder}'")),
        };
    }
    Ok(RecordedRow { sequence, cells })
}

/// Split the leading value off `s`, honouring quotes so separators inside
/// strings are not mistaken for cell boundaries.
fn split_value(s: &str) -> std::result::Result<(&str, &str), String> {
    if !s.starts_with('\'') {
        return Ok(s.split_once(CELL_SEPARATOR).map_or((s, ""), |(value, _)| {
            let end = value.len();
            (&s[..end], &s[end..])
        }));
    }
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '\'' => return Ok((&s[..=i], &s[i + 1..])),
            _ => {}
        }
    }
    Err(format!("unterminated string {s}"))
}

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;
