//! Excel exporter - one worksheet per group

use crate::config::XlsxOptions;
use crate::error::{GroupdocError, GroupdocResult};
use crate::export::{ArtifactKind, ExportContext, Exporter};
use crate::types::{CellValue, Column, Table};
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};

/// Number format for numeric columns (thousands grouped)
pub const THOUSANDS_NUM_FORMAT: &str = "#,##0";

/// Excel's sheet-name length limit
const MAX_SHEET_NAME: usize = 31;
const RESERVED_SHEET_NAME: &str = "History";
const FALLBACK_SHEET_NAME: &str = "Data";

/// Excel exporter for filtered group tables
#[derive(Debug, Clone, Default)]
pub struct ExcelExporter {
    options: XlsxOptions,
}

impl ExcelExporter {
    pub fn new(options: XlsxOptions) -> Self {
        Self { options }
    }

    /// Column width in characters: longest of header and values, plus padding, capped
    pub fn column_width(&self, column: &Column) -> f64 {
        let longest = column
            .name
            .chars()
            .count()
            .max(column.max_value_chars()) as f64;
        (longest + self.options.padding).min(self.options.max_column_width)
    }

    fn write_table(&self, worksheet: &mut Worksheet, table: &Table) -> GroupdocResult<()> {
        let header_format = Format::new().set_bold();
        let number_format = Format::new().set_num_format(THOUSANDS_NUM_FORMAT);
        let text_format = Format::new().set_text_wrap().set_align(FormatAlign::Top);

        for (col_idx, column) in table.columns().iter().enumerate() {
            let col = col_idx as u16;
            worksheet
                .write_string_with_format(0, col, &column.name, &header_format)
                .map_err(|e| GroupdocError::Export(format!("Failed to write header: {}", e)))?;
            worksheet
                .set_column_width(col, self.column_width(column))
                .map_err(|e| GroupdocError::Export(format!("Failed to set column width: {}", e)))?;

            let numeric = column.is_numeric();
            for (row_idx, value) in column.values.iter().enumerate() {
                let row = (row_idx + 1) as u32;
                match value {
                    CellValue::Empty => {}
                    CellValue::Number(n) if numeric && n.is_finite() => {
                        worksheet
                            .write_number_with_format(row, col, *n, &number_format)
                            .map_err(|e| {
                                GroupdocError::Export(format!("Failed to write number: {}", e))
                            })?;
                    }
                    other => {
                        worksheet
                            .write_string_with_format(row, col, other.to_string(), &text_format)
                            .map_err(|e| {
                                GroupdocError::Export(format!("Failed to write text: {}", e))
                            })?;
                    }
                }
            }
        }

        worksheet
            .set_freeze_panes(1, 0)
            .map_err(|e| GroupdocError::Export(format!("Failed to freeze header: {}", e)))?;
        Ok(())
    }
}

impl Exporter for ExcelExporter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Xlsx
    }

    fn render(&self, table: &Table, ctx: &ExportContext) -> GroupdocResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(sheet_name(&ctx.group_key))
            .map_err(|e| GroupdocError::Export(format!("Failed to set worksheet name: {}", e)))?;

        self.write_table(worksheet, table)?;

        workbook
            .save_to_buffer()
            .map_err(|e| GroupdocError::Export(format!("Failed to save Excel file: {}", e)))
    }
}

/// Valid worksheet name derived from a group key
pub fn sheet_name(key: &str) -> String {
    let cleaned: String = key
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            c => c,
        })
        .collect();
    let trimmed: String = cleaned
        .trim()
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME)
        .collect();
    let trimmed = trimmed.trim_end().trim_end_matches('\'');
    // Excel reserves "History" in any case
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(RESERVED_SHEET_NAME) {
        return FALLBACK_SHEET_NAME.to_string();
    }
    trimmed.to_string()
}
