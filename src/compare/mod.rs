//! Target-versus-result comparison.
//!
//! Two strategies are available. [`lines`] treats both artifacts as raw text
//! and fails with a truncated diff. [`fields`] parses both artifacts and walks
//! them row by row, comparing cells by type and, when asked, within a relative
//! floating-point tolerance.

pub mod fields;
pub mod lines;

pub use fields::compare_fields;
pub use lines::{compare_lines, diff_lines};

/// How numeric cells are compared by the structured comparator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Tolerance {
    /// Numbers must be identical.
    #[default]
    Exact,
    /// Numbers are equal when `|t - r| / max(|t|, |r|)` is below the bound.
    Relative(f64),
}

impl Tolerance {
    /// Bound used when a check asks for float comparison without a value.
    pub const DEFAULT_RELATIVE: f64 = 0.001;

    /// Returns true if `target` and `result` are equal under this tolerance.
    ///
    /// Two zeros are always equal; the ratio is never computed for them.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn accepts(self, target: f64, result: f64) -> bool {
        match self {
            Self::Exact => target == result,
            Self::Relative(bound) => {
                let scale = target.abs().max(result.abs());
                if scale == 0.0 {
                    return true;
                }
                (target - result).abs() / scale < bound
            }
        }
    }
}

/// Comparator chosen for a check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparator {
    Lines,
    Fields(Tolerance),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
