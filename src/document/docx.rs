use docx_rs::{Docx, Paragraph, Run, Table as DocxTable, TableCell, TableRow};
use std::io::Cursor;

use crate::core::format::format_thousands;
use crate::error::{GroupdocError, GroupdocResult};
use crate::export::{ArtifactKind, ExportContext, Exporter};
use crate::types::Table;

/// Word exporter: heading, row count, then a grid table
#[derive(Debug, Clone, Default)]
pub struct DocxExporter;

impl DocxExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for DocxExporter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::Docx
    }

    fn render(&self, table: &Table, ctx: &ExportContext) -> GroupdocResult<Vec<u8>> {
        let mut docx = Docx::new();

        // size is in half-points: 32 = 16pt
        let heading = Run::new().add_text(ctx.title.as_str()).bold().size(32);
        docx = docx.add_paragraph(Paragraph::new().add_run(heading));
        let summary = Run::new()
            .add_text(format!("{} rows", table.row_count()))
            .italic()
            .size(20);
        docx = docx.add_paragraph(Paragraph::new().add_run(summary));
        docx = docx.add_paragraph(Paragraph::new());

        if table.column_count() > 0 {
            docx = docx.add_table(grid(table));
        }

        let mut buf = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buf)
            .map_err(|e| GroupdocError::Export(format!("Failed to pack DOCX: {}", e)))?;
        Ok(buf.into_inner())
    }
}

fn grid(table: &Table) -> DocxTable {
    let mut rows = Vec::with_capacity(table.row_count() + 1);

    let header_cells: Vec<TableCell> = table
        .columns()
        .iter()
        .map(|c| cell(Run::new().add_text(c.name.as_str()).bold().size(18)))
        .collect();
    rows.push(TableRow::new(header_cells));

    for i in 0..table.row_count() {
        let cells: Vec<TableCell> = table
            .columns()
            .iter()
            .map(|c| cell(Run::new().add_text(format_thousands(&c.values[i])).size(18)))
            .collect();
        rows.push(TableRow::new(cells));
    }

    DocxTable::new(rows)
}

fn cell(run: Run) -> TableCell {
    TableCell::new().add_paragraph(Paragraph::new().add_run(run))
}
