//! Header detection and table normalization for raw sheets
//!
//! A raw sheet is a grid of cells with no assumed header. Normalization finds
//! the header row, names the columns, drops blank rows, removes empty and
//! placeholder columns and renders dates as `dd-mm-YYYY` text.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

use crate::error::{GroupdocError, GroupdocResult};
use crate::types::{CellValue, Column, Table};

/// Rows of cells as read from a worksheet
pub type RawRows = Vec<Vec<CellValue>>;

/// Prefix given to columns with an empty header cell
pub const UNNAMED_PREFIX: &str = "Unnamed";

fn unnamed_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^Unnamed: \d+(\.\d+)?$").expect("valid regex"))
}

/// What normalization did to the raw sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    /// 0-based index of the header row in the raw rows
    pub header_row: usize,
    /// Columns removed by cleanup, in original order
    pub dropped_columns: Vec<String>,
    /// Data rows removed because every cell was missing
    pub dropped_rows: usize,
}

/// First row with at least two non-empty cells
pub fn find_header_row(rows: &[Vec<CellValue>]) -> GroupdocResult<usize> {
    rows.iter()
        .position(|row| row.iter().filter(|c| !c.is_empty()).count() >= 2)
        .ok_or(GroupdocError::HeaderNotFound)
}

/// Normalize raw rows into a table
pub fn normalize(rows: &[Vec<CellValue>]) -> GroupdocResult<(Table, IngestReport)> {
    let header_row = find_header_row(rows)?;
    let names = header_names(&rows[header_row]);
    let width = names.len();

    let mut data: Vec<Vec<CellValue>> = vec![Vec::new(); width];
    let mut dropped_rows = 0;
    for row in &rows[header_row + 1..] {
        let cells: Vec<&CellValue> = (0..width)
            .map(|i| row.get(i).unwrap_or(&CellValue::Empty))
            .collect();
        if cells.iter().all(|c| c.is_empty()) {
            dropped_rows += 1;
            continue;
        }
        for (col, cell) in cells.into_iter().enumerate() {
            data[col].push(cell.clone());
        }
    }

    let mut table = Table::new();
    for (name, values) in names.into_iter().zip(data) {
        table.add_column(Column::new(name, values))?;
    }

    let dropped_columns = cleanup_columns(&mut table);
    render_dates(&mut table);

    let report = IngestReport {
        header_row,
        dropped_columns,
        dropped_rows,
    };
    debug!(
        header_row = report.header_row,
        dropped_columns = ?report.dropped_columns,
        dropped_rows = report.dropped_rows,
        rows = table.row_count(),
        columns = table.column_count(),
        "normalized sheet"
    );
    Ok((table, report))
}

/// Drop all-missing columns and placeholder-named columns; returns what was dropped
pub fn cleanup_columns(table: &mut Table) -> Vec<String> {
    let mut dropped = Vec::new();
    table.retain_columns(|column| {
        let keep = !column.is_all_missing() && !is_placeholder_name(&column.name);
        if !keep {
            dropped.push(column.name.clone());
        }
        keep
    });
    dropped
}

pub fn is_placeholder_name(name: &str) -> bool {
    unnamed_pattern().is_match(name)
}

/// Date cells become `dd-mm-YYYY` text
pub fn render_dates(table: &mut Table) {
    for column in table.columns_mut() {
        for value in column.values.iter_mut() {
            if let CellValue::Date(_) = value {
                *value = CellValue::Text(value.to_string());
            }
        }
    }
}

/// Column names from the header row: trimmed, positional placeholders for
/// blanks, `.1`/`.2` suffixes for repeats
fn header_names(header: &[CellValue]) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(header.len());

    for (idx, cell) in header.iter().enumerate() {
        let raw = cell.to_string().trim().to_string();
        let base = if raw.is_empty() {
            format!("{}: {}", UNNAMED_PREFIX, idx)
        } else {
            raw
        };

        let mut name = base.clone();
        let mut n = counts.get(&base).copied().unwrap_or(0);
        while names.contains(&name) {
            n += 1;
            name = format!("{}.{}", base, n);
        }
        counts.insert(base, n);
        names.push(name);
    }
    names
}
