//! Projection of a dataset into a deterministic, sorted artifact.

use std::cmp::Ordering;

use tracing::debug;

use crate::artifact::{Artifact, RecordedRow};
use crate::dataset::{Dataset, Value};
use crate::store::SnapshotStore;
use crate::Result;

/// Build an artifact from `dataset`.
///
/// Rows are sorted ascending by `order_by` (stable, so ties keep source
/// order), the order-by values are then dropped, and each remaining row
/// carries `columns` cells named as the caller spelled them. Source order is
/// never relied upon beyond tie-breaking: callers that need byte-identical
/// output across runs must order by a key.
///
/// # Errors
/// Returns `UnknownColumn` if any named column is absent.
pub fn project(
    label: &str,
    dataset: &Dataset,
    columns: &[String],
    order_by: &[String],
) -> Result<Artifact> {
    let keys = order_by
        .iter()
        .map(|name| dataset.column(name))
        .collect::<Result<Vec<_>>>()?;
    let fields = columns
        .iter()
        .map(|name| dataset.column(name))
        .collect::<Result<Vec<_>>>()?;

    let mut order: Vec<usize> = (0..dataset.row_count()).collect();
    order.sort_by(|&a, &b| compare_keys(&keys, a, b));

    let rows = order
        .into_iter()
        .enumerate()
        .map(|(i, source_row)| {
            let cells = columns
                .iter()
                .zip(&fields)
                .map(|(name, column)| (name.clone(), column[source_row].clone()))
                .collect();
            RecordedRow::new(i + 1, cells)
        })
        .collect();

    Ok(Artifact::new(label.to_string(), rows))
}

fn compare_keys(keys: &[&[Value]], a: usize, b: usize) -> Ordering {
    keys.iter()
        .map(|column| column[a].sort_cmp(&column[b]))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Project `dataset` and write the artifact through the store's result
/// channel under `file`.
///
/// # Errors
/// Returns `UnknownColumn` for absent columns, or an I/O error if the result
/// cannot be written.
pub fn record(
    store: &SnapshotStore,
    file: &str,
    label: &str,
    dataset: &Dataset,
    project_columns: &[String],
    order_by: &[String],
) -> Result<Artifact> {
    let artifact = project(label, dataset, project_columns, order_by)?;
    store.write_result(file, &artifact.render())?;
    debug!(file, rows = artifact.len(), "recorded result");
    Ok(artifact)
}

#[cfg(test)]
#[path = "recorder_tests.rs"]
mod tests;
