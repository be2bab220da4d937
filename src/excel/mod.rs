//! Excel import/export
//!
//! - Import: uploaded workbook → raw rows → normalized table
//! - Export: filtered group table → single-sheet .xlsx

mod exporter;
mod importer;

pub use exporter::{sheet_name, ExcelExporter, THOUSANDS_NUM_FORMAT};
pub use importer::ExcelImporter;
