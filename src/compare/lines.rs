use std::path::Path;

use tracing::debug;

use crate::{Result, SnapcheckError};

/// Middles larger than this (in target lines × result lines) are reported as a
/// single change instead of being aligned line by line.
const MAX_ALIGN_CELLS: usize = 4_000_000;

/// Diffs longer than this are truncated in failure messages.
const FULL_REPORT_LINES: usize = 5;

/// Lines kept when a diff is truncated.
const TRUNCATED_REPORT_LINES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Hunk {
    a_start: usize,
    a_len: usize,
    b_start: usize,
    b_len: usize,
}

/// Compare two artifacts line by line.
///
/// The full diff (empty when the inputs match) is written to `scratch`.
///
/// # Errors
/// Returns `DiffMismatch` with at most five diff lines if the inputs differ,
/// or an I/O error if the scratch file cannot be written.
pub fn compare_lines(target: &str, result: &str, scratch: &Path) -> Result<()> {
    let diff = diff_lines(target, result);
    let mut full = diff.join("\n");
    if !full.is_empty() {
        full.push('\n');
    }
    crate::store::ensure_parent_dir(scratch)
        .and_then(|()| std::fs::write(scratch, &full))
        .map_err(|e| SnapcheckError::FileAccess {
            path: scratch.to_path_buf(),
            source: e,
        })?;

    if diff.is_empty() {
        return Ok(());
    }
    debug!(lines = diff.len(), scratch = %scratch.display(), "line diff found differences");
    Err(SnapcheckError::DiffMismatch(summarize(&diff)))
}

/// Produce a normal-format diff (`2c2`, `< old`, `---`, `> new`) of `target`
/// against `result`.
#[must_use]
pub fn diff_lines(target: &str, result: &str) -> Vec<String> {
    let a: Vec<&str> = target.lines().collect();
    let b: Vec<&str> = result.lines().collect();

    let mut out = Vec::new();
    for hunk in hunks(&a, &b) {
        out.push(header(hunk));
        for line in &a[hunk.a_start..hunk.a_start + hunk.a_len] {
            out.push(format!("< {line}"));
        }
        if hunk.a_len > 0 && hunk.b_len > 0 {
            out.push("---".to_string());
        }
        for line in &b[hunk.b_start..hunk.b_start + hunk.b_len] {
            out.push(format!("> {line}"));
        }
    }
    out
}

fn summarize(diff: &[String]) -> String {
    if diff.len() <= FULL_REPORT_LINES {
        return diff.join("\n");
    }
    let mut text = diff[..TRUNCATED_REPORT_LINES].join("\n");
    text.push_str("\n...");
    text
}

fn range(start: usize, len: usize) -> String {
    if len == 1 {
        format!("{}", start + 1)
    } else {
        format!("{},{}", start + 1, start + len)
    }
}

fn header(h: Hunk) -> String {
    match (h.a_len, h.b_len) {
        (_, 0) => format!("{}d{}", range(h.a_start, h.a_len), h.b_start),
        (0, _) => format!("{}a{}", h.a_start, range(h.b_start, h.b_len)),
        _ => format!(
            "{}c{}",
            range(h.a_start, h.a_len),
            range(h.b_start, h.b_len)
        ),
    }
}

fn hunks(a: &[&str], b: &[&str]) -> Vec<Hunk> {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let max_suffix = a.len().min(b.len()) - prefix;
    let suffix = a
        .iter()
        .rev()
        .zip(b.iter().rev())
        .take(max_suffix)
        .take_while(|(x, y)| x == y)
        .count();

    let a_mid = &a[prefix..a.len() - suffix];
    let b_mid = &b[prefix..b.len() - suffix];
    if a_mid.is_empty() && b_mid.is_empty() {
        return Vec::new();
    }
    if a_mid.is_empty()
        || b_mid.is_empty()
        || a_mid.len().saturating_mul(b_mid.len()) > MAX_ALIGN_CELLS
    {
        return vec![Hunk {
            a_start: prefix,
            a_len: a_mid.len(),
            b_start: prefix,
            b_len: b_mid.len(),
        }];
    }
    align(a_mid, b_mid, prefix)
}

/// Longest-common-subsequence alignment of two non-empty slices.
fn align(a: &[&str], b: &[&str], offset: usize) -> Vec<Hunk> {
    let (n, m) = (a.len(), b.len());
    let width = m + 1;
    // lcs[i * width + j] = LCS length of a[i..] and b[j..]
    let mut lcs = vec![0_u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i * width + j] = if a[i] == b[j] {
                lcs[(i + 1) * width + j + 1] + 1
            } else {
                lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
            };
        }
    }

    let mut hunks = Vec::new();
    let mut current: Option<Hunk> = None;
    let (mut i, mut j) = (0, 0);
    while i < n || j < m {
        if i < n && j < m && a[i] == b[j] {
            if let Some(h) = current.take() {
                hunks.push(h);
            }
            i += 1;
            j += 1;
            continue;
        }
        let h = current.get_or_insert(Hunk {
            a_start: offset + i,
            a_len: 0,
            b_start: offset + j,
            b_len: 0,
        });
        if j == m || (i < n && lcs[(i + 1) * width + j] >= lcs[i * width + j + 1]) {
            h.a_len += 1;
            i += 1;
        } else {
            h.b_len += 1;
            j += 1;
        }
    }
    if let Some(h) = current {
        hunks.push(h);
    }
    hunks
}

#[cfg(test)]
#[path = "lines_tests.rs"]
mod tests;
