use std::path::Path;

use crate::artifact::{Artifact, RecordedRow};
use crate::dataset::Value;
use crate::error::Side;
use crate::{Result, SnapcheckError};

use super::Tolerance;

enum CellVerdict {
    Equal,
    TypeChanged,
    Different,
}

/// Compare two parsed artifacts row by row.
///
/// Values must share a type before tolerance is considered: an integer
/// against a float, or a string against a number, is a type mismatch even if
/// the text looks alike. `result_path` names the result artifact in reports.
///
/// # Errors
/// Returns the first divergence found: `ValueMismatch` (label or cell),
/// `RowShapeChanged`, `TypeMismatch` or `RowCountMismatch`.
pub fn compare_fields(
    target: &Artifact,
    result: &Artifact,
    tolerance: Tolerance,
    result_path: &Path,
) -> Result<()> {
    if target.label() != result.label() {
        return Err(SnapcheckError::ValueMismatch {
            row: 0,
            column: "label".to_string(),
            target: target.label().to_string(),
            result: result.label().to_string(),
            artifact: result_path.to_path_buf(),
        });
    }

    let mut target_rows = target.rows().iter();
    let mut result_rows = result.rows().iter();
    let mut index = 0;
    loop {
        index += 1;
        match (target_rows.next(), result_rows.next()) {
            (None, None) => return Ok(()),
            (Some(t), None) => return Err(count_mismatch(Side::Result, t)),
            (None, Some(r)) => return Err(count_mismatch(Side::Target, r)),
            (Some(t), Some(r)) => compare_row(index, t, r, tolerance, result_path)?,
        }
    }
}

fn count_mismatch(missing: Side, present_row: &RecordedRow) -> SnapcheckError {
    let present = match missing {
        Side::Target => Side::Result,
        Side::Result => Side::Target,
    };
    SnapcheckError::RowCountMismatch {
        missing,
        present,
        row: present_row.to_string(),
    }
}

fn compare_row(
    index: usize,
    target: &RecordedRow,
    result: &RecordedRow,
    tolerance: Tolerance,
    result_path: &Path,
) -> Result<()> {
    let same_shape = target.cells.len() == result.cells.len()
        && target
            .cells
            .iter()
            .zip(&result.cells)
            .all(|((a, _), (b, _))| a == b);
    if !same_shape {
        return Err(SnapcheckError::RowShapeChanged {
            row: index,
            target: target.to_string(),
            result: result.to_string(),
        });
    }

    for ((column, t), (_, r)) in target.cells.iter().zip(&result.cells) {
        match compare_cell(t, r, tolerance) {
            CellVerdict::Equal => {}
            CellVerdict::TypeChanged => {
                return Err(SnapcheckError::TypeMismatch {
                    row: index,
                    column: column.clone(),
                    target: format!("{} {t}", t.type_name()),
                    result: format!("{} {r}", r.type_name()),
                });
            }
            CellVerdict::Different => {
                return Err(SnapcheckError::ValueMismatch {
                    row: index,
                    column: column.clone(),
                    target: t.to_string(),
                    result: r.to_string(),
                    artifact: result_path.to_path_buf(),
                });
            }
        }
    }
    Ok(())
}

fn compare_cell(target: &Value, result: &Value, tolerance: Tolerance) -> CellVerdict {
    if target == result {
        return CellVerdict::Equal;
    }
    if !target.same_type(result) {
        return CellVerdict::TypeChanged;
    }
    match (target.as_f64(), result.as_f64()) {
        (Some(t), Some(r)) if tolerance.accepts(t, r) => CellVerdict::Equal,
        _ => CellVerdict::Different,
    }
}

#[cfg(test)]
#[path = "fields_tests.rs"]
mod tests;
