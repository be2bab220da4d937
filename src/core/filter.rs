//! Row selection by group key

use crate::types::{CellValue, Dataset, Table};

/// Rows whose grouping value, in canonical string form, equals `key` exactly.
/// Missing grouping values never match; use [`filter_missing`] for those.
pub fn filter_rows(dataset: &Dataset, key: &str) -> Table {
    let indices: Vec<usize> = dataset
        .grouping_values()
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_empty() && v.canonical() == key)
        .map(|(i, _)| i)
        .collect();
    dataset.table().select_rows(&indices)
}

/// Rows with a missing grouping value
pub fn filter_missing(dataset: &Dataset) -> Table {
    let indices: Vec<usize> = dataset
        .grouping_values()
        .iter()
        .enumerate()
        .filter(|(_, v)| matches!(v, CellValue::Empty))
        .map(|(i, _)| i)
        .collect();
    dataset.table().select_rows(&indices)
}
