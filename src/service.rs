//! Upload → groups → detail → export, over any dataset store

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::GroupdocConfig;
use crate::core::filter::filter_rows;
use crate::core::ingest::IngestReport;
use crate::core::resolver::ResolverPolicy;
use crate::document::{DocxExporter, PdfExporter};
use crate::error::{GroupdocError, GroupdocResult};
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::export::{ArtifactKind, ExportContext, Exporter};
use crate::store::{DatasetHandle, DatasetStore};
use crate::types::{Dataset, Table};
use crate::writer::{ArtifactTarget, ArtifactWriter};

/// Result of a successful upload
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub handle: DatasetHandle,
    pub grouping_column: String,
    pub row_count: usize,
    pub groups: Vec<String>,
    pub report: IngestReport,
}

pub struct GroupService {
    store: Arc<dyn DatasetStore>,
    importer: ExcelImporter,
    resolver: ResolverPolicy,
    exporters: Vec<Box<dyn Exporter>>,
    writer: ArtifactWriter,
}

impl GroupService {
    /// Service with the three standard exporters configured from `config`
    pub fn new(store: Arc<dyn DatasetStore>, config: &GroupdocConfig) -> Self {
        let exporters: Vec<Box<dyn Exporter>> = vec![
            Box::new(ExcelExporter::new(config.xlsx.clone())),
            Box::new(DocxExporter::new()),
            Box::new(PdfExporter::new(config.pdf.clone())),
        ];
        Self {
            store,
            importer: ExcelImporter::new(),
            resolver: config.resolver.policy(),
            exporters,
            writer: ArtifactWriter::new(&config.output_dir),
        }
    }

    pub fn with_importer(mut self, importer: ExcelImporter) -> Self {
        self.importer = importer;
        self
    }

    pub fn with_resolver(mut self, resolver: ResolverPolicy) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn writer(&self) -> &ArtifactWriter {
        &self.writer
    }

    /// Ingest workbook bytes, resolve the grouping column and register the dataset
    pub fn upload(&self, bytes: &[u8], column: Option<&str>) -> GroupdocResult<UploadOutcome> {
        let (table, report) = self.importer.import_bytes(bytes)?;
        let grouping_column = self.resolver.resolve(&table, column)?;
        let dataset = Dataset::new(table, grouping_column.clone())?;
        let row_count = dataset.table().row_count();
        let groups = dataset.group_keys();

        let handle = self.store.register(dataset)?;
        info!(
            %handle,
            grouping_column = grouping_column.as_str(),
            rows = row_count,
            groups = groups.len(),
            "dataset uploaded"
        );
        Ok(UploadOutcome {
            handle,
            grouping_column,
            row_count,
            groups,
            report,
        })
    }

    pub fn groups(&self, handle: &DatasetHandle) -> GroupdocResult<Vec<String>> {
        self.store.groups(handle)
    }

    pub fn grouping_column(&self, handle: &DatasetHandle) -> GroupdocResult<String> {
        Ok(self.store.get(handle)?.grouping_column().to_string())
    }

    /// Rows of one group; an empty group is `GroupNotFound`
    pub fn detail(&self, handle: &DatasetHandle, key: &str) -> GroupdocResult<Table> {
        let dataset = self.store.get(handle)?;
        let rows = filter_rows(&dataset, key);
        if rows.is_empty() {
            return Err(GroupdocError::GroupNotFound(key.to_string()));
        }
        Ok(rows)
    }

    /// Write one artifact for a group
    pub fn export(
        &self,
        handle: &DatasetHandle,
        key: &str,
        kind: ArtifactKind,
    ) -> GroupdocResult<PathBuf> {
        let (rows, ctx) = self.prepare(handle, key)?;
        self.render_to_disk(handle, &rows, &ctx, kind)
    }

    /// Write every artifact kind for a group
    pub fn export_all(&self, handle: &DatasetHandle, key: &str) -> GroupdocResult<Vec<PathBuf>> {
        let (rows, ctx) = self.prepare(handle, key)?;
        self.exporters
            .iter()
            .map(|e| self.render_to_disk(handle, &rows, &ctx, e.kind()))
            .collect()
    }

    fn prepare(&self, handle: &DatasetHandle, key: &str) -> GroupdocResult<(Table, ExportContext)> {
        // one snapshot for both rows and title
        let dataset = self.store.get(handle)?;
        let rows = filter_rows(&dataset, key);
        if rows.is_empty() {
            return Err(GroupdocError::GroupNotFound(key.to_string()));
        }
        Ok((rows, ExportContext::new(dataset.grouping_column(), key)))
    }

    fn render_to_disk(
        &self,
        handle: &DatasetHandle,
        rows: &Table,
        ctx: &ExportContext,
        kind: ArtifactKind,
    ) -> GroupdocResult<PathBuf> {
        let exporter = self
            .exporters
            .iter()
            .find(|e| e.kind() == kind)
            .ok_or_else(|| GroupdocError::Export(format!("no exporter for {}", kind)))?;
        let bytes = exporter.render(rows, ctx)?;
        let target = ArtifactTarget::new(ctx.group_key.clone(), handle.session_id());
        let path = self.writer.write(kind, &target, &bytes)?;
        info!(
            group = ctx.group_key.as_str(),
            kind = %kind,
            rows = rows.row_count(),
            path = %path.display(),
            "exported"
        );
        Ok(path)
    }
}
