//! Excel importer - spreadsheet bytes → raw rows → normalized table

use crate::core::ingest::{self, IngestReport, RawRows};
use crate::error::{GroupdocError, GroupdocResult};
use crate::types::{CellValue, Table};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Reads one worksheet of an uploaded workbook (xlsx, xls, xlsb or ods)
#[derive(Debug, Clone, Default)]
pub struct ExcelImporter {
    sheet_index: usize,
}

impl ExcelImporter {
    /// Importer for the first worksheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Importer for the worksheet at `index` (0-based)
    pub fn with_sheet(index: usize) -> Self {
        Self { sheet_index: index }
    }

    /// Read and normalize a workbook file
    pub fn import_path<P: AsRef<Path>>(&self, path: P) -> GroupdocResult<(Table, IngestReport)> {
        let bytes = std::fs::read(path.as_ref())?;
        self.import_bytes(&bytes)
    }

    /// Read and normalize workbook bytes
    pub fn import_bytes(&self, bytes: &[u8]) -> GroupdocResult<(Table, IngestReport)> {
        let rows = self.read_bytes(bytes)?;
        ingest::normalize(&rows)
    }

    /// Raw rows of the selected worksheet, anchored at sheet cell A1
    pub fn read_bytes(&self, bytes: &[u8]) -> GroupdocResult<RawRows> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| GroupdocError::UnparsableInput(format!("Failed to open workbook: {}", e)))?;

        let sheet_names = workbook.sheet_names().to_vec();
        let range = workbook
            .worksheet_range_at(self.sheet_index)
            .ok_or_else(|| {
                GroupdocError::UnparsableInput(format!(
                    "Workbook has no sheet at index {} (sheets: {:?})",
                    self.sheet_index, sheet_names
                ))
            })?
            .map_err(|e| GroupdocError::UnparsableInput(format!("Failed to read sheet: {}", e)))?;

        let rows = range_to_rows(&range);
        debug!(
            sheet = sheet_names.get(self.sheet_index).map(String::as_str).unwrap_or(""),
            rows = rows.len(),
            "read worksheet"
        );
        Ok(rows)
    }
}

/// Convert a calamine range into rows that start at sheet row/column 0
fn range_to_rows(range: &Range<Data>) -> RawRows {
    let (start_row, start_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut rows: RawRows = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col];
        cells.extend(row.iter().map(convert_cell));
        rows.push(cells);
    }
    rows
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        // honours the workbook's 1900/1904 date system
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::Date)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::Date)
            .unwrap_or_else(|| CellValue::text(s.as_str())),
        Data::DurationIso(s) => CellValue::text(s.as_str()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
