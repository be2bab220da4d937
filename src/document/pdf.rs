//! PDF table export.
//!
//! Writes landscape A4 PDF 1.4 files by hand using the built-in Helvetica
//! fonts, so no font files are needed. The header row is repeated on every
//! page and long cell text wraps inside its column.

use crate::config::{PdfOptions, PDF_PAGE_HEIGHT, PDF_PAGE_WIDTH};
use crate::core::format::format_thousands;
use crate::core::layout::{column_widths, ColumnMeasure};
use crate::error::GroupdocResult;
use crate::export::{ArtifactKind, ExportContext, Exporter};
use crate::types::Table;

/// Average Helvetica glyph width as a fraction of the font size
const GLYPH_WIDTH: f64 = 0.5;
const LINE_SPACING: f64 = 1.25;
const CELL_PADDING: f64 = 3.0;
const TITLE_SIZE: f64 = 13.0;
const FOOTER_SIZE: f64 = 7.0;

#[derive(Debug, Clone, Default)]
pub struct PdfExporter {
    options: PdfOptions,
}

/// A laid-out table row: wrapped lines per column plus its height
struct RowLayout {
    cells: Vec<Vec<String>>,
    height: f64,
}

impl PdfExporter {
    pub fn new(options: PdfOptions) -> Self {
        Self { options }
    }

    /// Column widths in points; they always sum to the usable page width
    pub fn column_widths(&self, table: &Table) -> Vec<f64> {
        let measures: Vec<ColumnMeasure> = table
            .columns()
            .iter()
            .map(|c| {
                let longest = c
                    .values
                    .iter()
                    .map(|v| format_thousands(v).chars().count())
                    .chain(std::iter::once(c.name.chars().count()))
                    .max()
                    .unwrap_or(0);
                ColumnMeasure {
                    longest_chars: longest,
                    flexible: self.options.is_flexible(&c.name),
                }
            })
            .collect();
        column_widths(&measures, self.options.usable_width(), &self.options.widths)
    }

    fn leading(&self) -> f64 {
        self.options.font_size * LINE_SPACING
    }

    fn layout_row(&self, texts: &[String], widths: &[f64], max_lines: usize) -> RowLayout {
        let cells: Vec<Vec<String>> = texts
            .iter()
            .zip(widths)
            .map(|(text, width)| {
                let mut lines = wrap_text(text, self.chars_per_line(*width));
                lines.truncate(max_lines.max(1));
                lines
            })
            .collect();
        let lines = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
        RowLayout {
            cells,
            height: lines as f64 * self.leading() + 2.0 * CELL_PADDING,
        }
    }

    fn chars_per_line(&self, width: f64) -> usize {
        let glyph = self.options.font_size * GLYPH_WIDTH;
        (((width - 2.0 * CELL_PADDING) / glyph).floor() as usize).max(1)
    }

    /// Split data rows into pages
    fn paginate(&self, rows: Vec<RowLayout>, header_height: f64) -> Vec<Vec<RowLayout>> {
        let margin = self.options.margin;
        let bottom = margin + FOOTER_SIZE * 2.0;
        let first_top = PDF_PAGE_HEIGHT - margin - TITLE_SIZE * 2.0;
        let next_top = PDF_PAGE_HEIGHT - margin;

        let mut pages: Vec<Vec<RowLayout>> = vec![Vec::new()];
        let mut y = first_top - header_height;
        for row in rows {
            let current_is_empty = pages.last().map(Vec::is_empty).unwrap_or(true);
            if y - row.height < bottom && !current_is_empty {
                pages.push(Vec::new());
                y = next_top - header_height;
            }
            y -= row.height;
            if let Some(page) = pages.last_mut() {
                page.push(row);
            }
        }
        pages
    }

    fn draw_row(
        &self,
        content: &mut String,
        row: &RowLayout,
        widths: &[f64],
        right_align: &[bool],
        top: f64,
        font: &str,
    ) {
        let size = self.options.font_size;
        let mut x = self.options.margin;
        for (col, lines) in row.cells.iter().enumerate() {
            let width = widths[col];
            content.push_str(&format!(
                "{:.2} {:.2} {:.2} {:.2} re S\n",
                x,
                top - row.height,
                width,
                row.height
            ));
            for (i, line) in lines.iter().enumerate() {
                let baseline = top - CELL_PADDING - size - i as f64 * self.leading() + 1.0;
                let text_x = if right_align[col] {
                    let text_width = line.chars().count() as f64 * size * GLYPH_WIDTH;
                    (x + width - CELL_PADDING - text_width).max(x + CELL_PADDING)
                } else {
                    x + CELL_PADDING
                };
                content.push_str(&format!(
                    "BT\n/{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
                    font,
                    size,
                    text_x,
                    baseline,
                    pdf_escape(line)
                ));
            }
            x += width;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn page_content(
        &self,
        title: Option<&str>,
        header: &RowLayout,
        rows: &[RowLayout],
        widths: &[f64],
        right_align: &[bool],
        page_no: usize,
        page_count: usize,
    ) -> String {
        let margin = self.options.margin;
        let usable = self.options.usable_width();
        let mut content = String::new();
        let mut y = PDF_PAGE_HEIGHT - margin;

        if let Some(title) = title {
            content.push_str(&format!(
                "BT\n/F1 {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
                TITLE_SIZE,
                margin,
                y - TITLE_SIZE,
                pdf_escape(title)
            ));
            y -= TITLE_SIZE * 2.0;
        }

        content.push_str("0.5 w\n0.6 0.6 0.6 RG\n");

        // Header background
        content.push_str("0.88 0.88 0.88 rg\n");
        content.push_str(&format!(
            "{:.2} {:.2} {:.2} {:.2} re f\n",
            margin,
            y - header.height,
            usable,
            header.height
        ));
        content.push_str("0 0 0 rg\n");
        let no_align = vec![false; widths.len()];
        self.draw_row(&mut content, header, widths, &no_align, y, "F1");
        y -= header.height;

        for row in rows {
            self.draw_row(&mut content, row, widths, right_align, y, "F2");
            y -= row.height;
        }

        let footer = format!("Page {} of {}", page_no, page_count);
        let footer_width = footer.len() as f64 * FOOTER_SIZE * GLYPH_WIDTH;
        content.push_str(&format!(
            "BT\n/F2 {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
            FOOTER_SIZE,
            PDF_PAGE_WIDTH - margin - footer_width,
            margin,
            footer
        ));
        content
    }
}

impl Exporter for PdfExporter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Pdf
    }

    fn render(&self, table: &Table, ctx: &ExportContext) -> GroupdocResult<Vec<u8>> {
        let widths = self.column_widths(table);
        let right_align: Vec<bool> = table.columns().iter().map(|c| c.is_numeric()).collect();

        let body_height = PDF_PAGE_HEIGHT - 2.0 * self.options.margin - TITLE_SIZE * 2.0;
        let max_lines = ((body_height / 3.0) / self.leading()).floor() as usize;

        let header = self.layout_row(&table.column_names(), &widths, max_lines);
        let rows: Vec<RowLayout> = (0..table.row_count())
            .map(|i| {
                let texts: Vec<String> = table
                    .columns()
                    .iter()
                    .map(|c| format_thousands(&c.values[i]))
                    .collect();
                self.layout_row(&texts, &widths, max_lines)
            })
            .collect();

        let pages = self.paginate(rows, header.height);
        let page_count = pages.len();
        let contents: Vec<String> = pages
            .iter()
            .enumerate()
            .map(|(i, page_rows)| {
                let title = if i == 0 { Some(ctx.title.as_str()) } else { None };
                self.page_content(
                    title,
                    &header,
                    page_rows,
                    &widths,
                    &right_align,
                    i + 1,
                    page_count,
                )
            })
            .collect();

        Ok(PdfBuilder::new(contents).build(&ctx.title))
    }
}

/// Greedy word wrap; words longer than a line are split
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let current_len = current.chars().count();
            if current_len > 0 && current_len + 1 + word.len() > max_chars {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.extend(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Escape a string literal for a WinAnsi-encoded font. Latin-1 characters are
/// written as octal escapes; anything outside Latin-1 becomes `?`.
fn pdf_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            c if (' '..='~').contains(&c) => out.push(c),
            c if (c as u32) >= 0xA0 && (c as u32) <= 0xFF => {
                out.push_str(&format!("\\{:03o}", c as u32))
            }
            _ => out.push('?'),
        }
    }
    out
}

/// Minimal multi-page PDF file builder
struct PdfBuilder {
    pages: Vec<String>,
}

impl PdfBuilder {
    fn new(pages: Vec<String>) -> Self {
        Self { pages }
    }

    fn build(&self, title: &str) -> Vec<u8> {
        // Objects: 1 catalog, 2 pages, 3 bold font, 4 regular font,
        // then one page + one content stream per page, then info.
        let page_ids: Vec<usize> = (0..self.pages.len()).map(|i| 5 + i * 2).collect();
        let info_id = 5 + self.pages.len() * 2;

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets: Vec<usize> = Vec::new();

        offsets.push(pdf.len());
        pdf.push_str("1 0 obj\n<< /Type /Catalog /Pages 2 0 R >>\nendobj\n");

        offsets.push(pdf.len());
        let kids: Vec<String> = page_ids.iter().map(|id| format!("{} 0 R", id)).collect();
        pdf.push_str(&format!(
            "2 0 obj\n<< /Type /Pages /Kids [{}] /Count {} >>\nendobj\n",
            kids.join(" "),
            page_ids.len()
        ));

        offsets.push(pdf.len());
        pdf.push_str("3 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>\nendobj\n");

        offsets.push(pdf.len());
        pdf.push_str("4 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>\nendobj\n");

        for (content, page_id) in self.pages.iter().zip(&page_ids) {
            offsets.push(pdf.len());
            pdf.push_str(&format!(
                "{} 0 obj\n<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Contents {} 0 R /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> >>\nendobj\n",
                page_id,
                PDF_PAGE_WIDTH,
                PDF_PAGE_HEIGHT,
                page_id + 1
            ));

            offsets.push(pdf.len());
            pdf.push_str(&format!(
                "{} 0 obj\n<< /Length {} >>\nstream\n{}\nendstream\nendobj\n",
                page_id + 1,
                content.len(),
                content
            ));
        }

        offsets.push(pdf.len());
        pdf.push_str(&format!(
            "{} 0 obj\n<< /Title ({}) /Producer (groupdoc) >>\nendobj\n",
            info_id,
            pdf_escape(title)
        ));

        let xref_offset = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n", offsets.len() + 1));
        pdf.push_str("0000000000 65535 f \n");
        for offset in &offsets {
            pdf.push_str(&format!("{:010} 00000 n \n", offset));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            offsets.len() + 1,
            info_id,
            xref_offset
        ));

        pdf.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellValue, Column};

    fn table(rows: usize) -> Table {
        Table::from_columns(vec![
            Column::new("No", (0..rows).map(|i| CellValue::Number(i as f64)).collect()),
            Column::new(
                "Uraian",
                (0..rows)
                    .map(|i| CellValue::text(format!("Belanja bahan kegiatan nomor {}", i)))
                    .collect(),
            ),
            Column::new(
                "Pagu",
                (0..rows)
                    .map(|i| CellValue::Number(1_500_000.0 * i as f64))
                    .collect(),
            ),
        ])
        .unwrap()
    }

    fn page_count(bytes: &[u8]) -> usize {
        let text = String::from_utf8_lossy(bytes);
        text.matches("/Type /Page ").count()
    }

    #[test]
    fn test_widths_fill_usable_width() {
        let exporter = PdfExporter::default();
        let widths = exporter.column_widths(&table(5));
        let sum: f64 = widths.iter().sum();
        assert!((sum - PdfOptions::default().usable_width()).abs() < 1e-6);
    }

    #[test]
    fn test_render_is_pdf() {
        let bytes = PdfExporter::default()
            .render(&table(3), &ExportContext::new("Kode", "A1"))
            .unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert_eq!(page_count(&bytes), 1);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(3.000.000) Tj"));
    }

    #[test]
    fn test_long_tables_paginate_with_repeated_header() {
        let bytes = PdfExporter::default()
            .render(&table(200), &ExportContext::new("Kode", "A1"))
            .unwrap();
        let pages = page_count(&bytes);
        assert!(pages > 1);
        let text = String::from_utf8_lossy(&bytes);
        assert_eq!(text.matches("(Uraian) Tj").count(), pages);
        assert!(text.contains(&format!("(Page {} of {}) Tj", pages, pages)));
    }

    #[test]
    fn test_empty_table_renders_one_page() {
        let bytes = PdfExporter::default()
            .render(&Table::new(), &ExportContext::new("Kode", "A1"))
            .unwrap();
        assert_eq!(page_count(&bytes), 1);
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("aa bb cc", 5), vec!["aa bb", "cc"]);
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
        assert_eq!(wrap_text("", 4), vec![""]);
        assert_eq!(wrap_text("x\ny", 10), vec!["x", "y"]);
    }

    #[test]
    fn test_pdf_escape() {
        assert_eq!(pdf_escape("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(pdf_escape("é"), "\\351");
        assert_eq!(pdf_escape("日"), "?");
    }
}
