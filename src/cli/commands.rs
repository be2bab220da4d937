use crate::config::GroupdocConfig;
use crate::core::format::format_thousands;
use crate::error::GroupdocResult;
use crate::excel::ExcelImporter;
use crate::export::ArtifactKind;
use crate::service::GroupService;
use crate::store::{DatasetHandle, DiskSnapshot, GlobalSlotStore, SessionStore};
use crate::types::{Dataset, Table};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Service over the disk-backed global slot in `config.state_dir`
fn persistent_service(config: &GroupdocConfig) -> GroupService {
    let store = GlobalSlotStore::with_persistence(Box::new(DiskSnapshot::new(&config.state_dir)));
    GroupService::new(Arc::new(store), config)
}

fn read_upload(file: &Path) -> GroupdocResult<Vec<u8>> {
    Ok(std::fs::read(file)?)
}

/// Execute the inspect command: show how a workbook would be ingested
pub fn inspect(file: PathBuf, column: Option<String>, config: &GroupdocConfig) -> GroupdocResult<()> {
    println!("{}", "🔍 Groupdoc - Inspecting workbook".bold().green());
    println!("   File: {}", file.display());
    println!();

    let (table, report) = ExcelImporter::new().import_path(&file)?;
    println!(
        "   Header row:  {}",
        (report.header_row + 1).to_string().bright_blue()
    );
    println!(
        "   Rows:        {} ({} blank rows dropped)",
        table.row_count(),
        report.dropped_rows
    );
    println!("   Columns:");
    for name in table.column_names() {
        println!("      {}", name.cyan());
    }
    if !report.dropped_columns.is_empty() {
        println!("   Dropped columns:");
        for name in &report.dropped_columns {
            println!("      {}", name.yellow());
        }
    }

    let grouping = config.resolver.policy().resolve(&table, column.as_deref())?;
    println!();
    println!("   Grouping column: {}", grouping.bright_blue().bold());
    let dataset = Dataset::new(table, grouping)?;
    let groups = dataset.group_keys();
    println!("   Groups ({}):", groups.len());
    for key in &groups {
        println!("      {}", key);
    }
    Ok(())
}

/// Execute the upload command: ingest and persist as the active dataset
pub fn upload(file: PathBuf, column: Option<String>, config: &GroupdocConfig) -> GroupdocResult<()> {
    println!("{}", "📤 Groupdoc - Uploading workbook".bold().green());
    println!("   File: {}", file.display());

    let bytes = read_upload(&file)?;
    let outcome = persistent_service(config).upload(&bytes, column.as_deref())?;

    println!(
        "   Grouping column: {}",
        outcome.grouping_column.bright_blue().bold()
    );
    println!("   Rows: {}", outcome.row_count);
    println!("   Groups: {}", outcome.groups.len());
    println!();
    println!(
        "{}",
        format!("✅ Saved to {}", config.state_dir.display()).green()
    );
    Ok(())
}

/// Execute the groups command: list group keys of the active dataset
pub fn groups(config: &GroupdocConfig) -> GroupdocResult<()> {
    let service = persistent_service(config);
    let keys = service.groups(&DatasetHandle::Global)?;
    let column = service.grouping_column(&DatasetHandle::Global)?;
    println!(
        "{} {}",
        "📋 Groups by".bold().green(),
        column.bright_blue().bold()
    );
    for key in keys {
        println!("{}", key);
    }
    Ok(())
}

/// Execute the show command: print the rows of one group
pub fn show(key: String, config: &GroupdocConfig) -> GroupdocResult<()> {
    let rows = persistent_service(config).detail(&DatasetHandle::Global, &key)?;
    println!(
        "{} {} ({} rows)",
        "📊 Group".bold().green(),
        key.bright_blue().bold(),
        rows.row_count()
    );
    print_table(&rows);
    Ok(())
}

/// Execute the export command: write artifacts for one group
pub fn export(key: String, kinds: Vec<ArtifactKind>, config: &GroupdocConfig) -> GroupdocResult<()> {
    println!("{}", "📦 Groupdoc - Exporting group".bold().green());
    println!("   Group: {}", key.bright_blue().bold());

    let service = persistent_service(config);
    let kinds = if kinds.is_empty() {
        ArtifactKind::ALL.to_vec()
    } else {
        kinds
    };
    for kind in kinds {
        let path = service.export(&DatasetHandle::Global, &key, kind)?;
        println!("   {} {}", "✅".green(), path.display());
    }
    Ok(())
}

/// Execute the split command: every file is its own session, every group is exported
pub fn split(files: Vec<PathBuf>, column: Option<String>, config: &GroupdocConfig) -> GroupdocResult<()> {
    println!("{}", "✂️  Groupdoc - Splitting workbooks".bold().green());

    let store = SessionStore::new(config.session.capacity, config.session.ttl());
    let service = GroupService::new(Arc::new(store), config);

    for file in files {
        println!();
        println!("   File: {}", file.display());
        let bytes = read_upload(&file)?;
        let outcome = service.upload(&bytes, column.as_deref())?;
        if let Some(session) = outcome.handle.session_id() {
            println!("   Session: {}", session.to_string().bright_blue());
        }
        println!(
            "   Grouping column: {} ({} groups)",
            outcome.grouping_column.bright_blue().bold(),
            outcome.groups.len()
        );
        for key in &outcome.groups {
            let paths = service.export_all(&outcome.handle, key)?;
            println!("      {} → {} files", key.cyan(), paths.len());
        }
    }
    println!();
    println!(
        "{}",
        format!("✅ Artifacts in {}", service.writer().output_dir().display()).green()
    );
    Ok(())
}

fn print_table(table: &Table) {
    let names = table.column_names();
    let mut widths: Vec<usize> = names.iter().map(|n| n.chars().count()).collect();
    let rows: Vec<Vec<String>> = (0..table.row_count())
        .map(|i| {
            table
                .columns()
                .iter()
                .map(|c| format_thousands(&c.values[i]))
                .collect()
        })
        .collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let header: Vec<String> = names
        .iter()
        .zip(&widths)
        .map(|(n, w)| format!("{:<width$}", n, width = *w))
        .collect();
    println!("{}", header.join(" | ").bold());
    for row in rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect();
        println!("{}", line.join(" | "));
    }
}
