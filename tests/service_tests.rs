//! Upload → groups → detail → export through the service API

mod common;

use pretty_assertions::assert_eq;
use royalbit_groupdoc::config::GroupdocConfig;
use royalbit_groupdoc::export::ArtifactKind;
use royalbit_groupdoc::service::GroupService;
use royalbit_groupdoc::store::{DatasetHandle, DiskSnapshot, GlobalSlotStore, SessionStore};
use royalbit_groupdoc::{CellValue, GroupdocError};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> GroupdocConfig {
    GroupdocConfig {
        state_dir: dir.path().join("state"),
        output_dir: dir.path().join("output"),
        ..GroupdocConfig::default()
    }
}

fn global_service(config: &GroupdocConfig) -> GroupService {
    GroupService::new(Arc::new(GlobalSlotStore::new()), config)
}

// ═══════════════════════════════════════════════════════════════════════════
// UPLOAD
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_upload_detects_header_and_grouping_column() {
    let dir = TempDir::new().unwrap();
    let service = global_service(&config_in(&dir));

    let outcome = service.upload(&common::rekap_workbook(), None).unwrap();

    assert_eq!(outcome.handle, DatasetHandle::Global);
    assert_eq!(outcome.grouping_column, "Kode Kegiatan");
    assert_eq!(outcome.row_count, 4);
    assert_eq!(outcome.groups, vec!["A1".to_string(), "B2".to_string()]);
    assert_eq!(outcome.report.header_row, 1);
    assert_eq!(outcome.report.dropped_rows, 1);
    assert_eq!(outcome.report.dropped_columns, vec!["Unnamed: 4".to_string()]);
}

#[test]
fn test_blank_first_row_header_on_second_row() {
    let dir = TempDir::new().unwrap();
    let service = global_service(&config_in(&dir));

    let outcome = service.upload(&common::blank_first_row_workbook(), None).unwrap();
    assert_eq!(outcome.report.header_row, 1);
    assert_eq!(outcome.grouping_column, "Kode Kegiatan");
    assert_eq!(outcome.row_count, 4);
    assert_eq!(outcome.groups, vec!["A1".to_string(), "B2".to_string()]);

    let a1 = service.detail(&DatasetHandle::Global, "A1").unwrap();
    assert_eq!(a1.row_count(), 3);
    assert_eq!(a1.column_names(), vec!["No", "Kode Kegiatan", "Uraian"]);

    assert!(matches!(
        service.detail(&DatasetHandle::Global, "C9"),
        Err(GroupdocError::GroupNotFound(_))
    ));
}

#[test]
fn test_upload_with_explicit_column() {
    let dir = TempDir::new().unwrap();
    let service = global_service(&config_in(&dir));

    let outcome = service.upload(&common::unit_workbook(), Some("unit")).unwrap();
    assert_eq!(outcome.grouping_column, "Unit");
    assert_eq!(
        outcome.groups,
        vec!["Keuangan".to_string(), "Umum".to_string()]
    );
}

#[test]
fn test_upload_without_matching_column_fails() {
    let dir = TempDir::new().unwrap();
    let service = global_service(&config_in(&dir));

    let result = service.upload(&common::unit_workbook(), None);
    assert!(matches!(
        result,
        Err(GroupdocError::GroupingColumnNotFound(_))
    ));
}

#[test]
fn test_upload_first_column_fallback() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir);
    config.resolver.first_column_fallback = true;
    let service = global_service(&config);

    let outcome = service.upload(&common::unit_workbook(), None).unwrap();
    assert_eq!(outcome.grouping_column, "Unit");
}

#[test]
fn test_upload_garbage_is_unparsable() {
    let dir = TempDir::new().unwrap();
    let service = global_service(&config_in(&dir));

    let result = service.upload(b"definitely not a spreadsheet", None);
    match result {
        Err(e @ GroupdocError::UnparsableInput(_)) => assert_eq!(e.status_code(), 400),
        other => panic!("expected UnparsableInput, got {:?}", other.map(|o| o.handle)),
    }
}

#[test]
fn test_upload_without_header_row() {
    let dir = TempDir::new().unwrap();
    let service = global_service(&config_in(&dir));

    let result = service.upload(&common::headerless_workbook(), None);
    assert!(matches!(result, Err(GroupdocError::HeaderNotFound)));
}

#[test]
fn test_failed_upload_keeps_previous_dataset() {
    let dir = TempDir::new().unwrap();
    let service = global_service(&config_in(&dir));

    service.upload(&common::rekap_workbook(), None).unwrap();
    assert!(service.upload(b"garbage", None).is_err());

    let groups = service.groups(&DatasetHandle::Global).unwrap();
    assert_eq!(groups, vec!["A1".to_string(), "B2".to_string()]);
}

// ═══════════════════════════════════════════════════════════════════════════
// GROUPS AND DETAIL
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_groups_before_upload() {
    let dir = TempDir::new().unwrap();
    let service = global_service(&config_in(&dir));

    let err = service.groups(&DatasetHandle::Global).unwrap_err();
    assert!(matches!(err, GroupdocError::NoDatasetLoaded));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn test_detail_returns_group_rows_in_order() {
    let dir = TempDir::new().unwrap();
    let service = global_service(&config_in(&dir));
    service.upload(&common::rekap_workbook(), None).unwrap();

    let rows = service.detail(&DatasetHandle::Global, "A1").unwrap();
    assert_eq!(rows.row_count(), 3);
    assert_eq!(
        rows.column_names(),
        vec!["No", "Kode Kegiatan", "Uraian", "Jumlah"]
    );
    let uraian = rows.column("Uraian").unwrap();
    assert_eq!(
        uraian.values,
        vec![
            CellValue::text("Belanja ATK"),
            CellValue::text("Honor narasumber"),
            CellValue::text("Konsumsi rapat"),
        ]
    );
    let jumlah = rows.column("Jumlah").unwrap();
    assert_eq!(jumlah.values[0], CellValue::Number(1_500_000.0));
}

#[test]
fn test_detail_unknown_group() {
    let dir = TempDir::new().unwrap();
    let service = global_service(&config_in(&dir));
    service.upload(&common::rekap_workbook(), None).unwrap();

    let err = service.detail(&DatasetHandle::Global, "C9").unwrap_err();
    assert!(matches!(err, GroupdocError::GroupNotFound(ref k) if k == "C9"));
    assert_eq!(err.status_code(), 404);
}

// ═══════════════════════════════════════════════════════════════════════════
// EXPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_export_writes_each_kind() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let service = global_service(&config);
    service.upload(&common::rekap_workbook(), None).unwrap();

    for kind in ArtifactKind::ALL {
        let path = service.export(&DatasetHandle::Global, "A1", kind).unwrap();
        assert_eq!(path, config.output_dir.join(format!("A1.{}", kind.extension())));
        let bytes = std::fs::read(&path).unwrap();
        assert!(!bytes.is_empty());
    }

    let pdf = std::fs::read(config.output_dir.join("A1.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    let text = String::from_utf8_lossy(&pdf);
    assert!(text.contains("(1.500.000) Tj"));
    assert!(text.contains("(Kode Kegiatan: A1) Tj"));
}

#[test]
fn test_exported_xlsx_reimports() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let service = global_service(&config);
    service.upload(&common::rekap_workbook(), None).unwrap();

    let path = service
        .export(&DatasetHandle::Global, "B2", ArtifactKind::Xlsx)
        .unwrap();
    let (table, report) = royalbit_groupdoc::excel::ExcelImporter::new()
        .import_path(&path)
        .unwrap();
    assert_eq!(report.header_row, 0);
    assert_eq!(table.row_count(), 1);
    assert_eq!(
        table.column("Uraian").unwrap().values,
        vec![CellValue::text("Perjalanan dinas")]
    );
    assert_eq!(
        table.column("Jumlah").unwrap().values,
        vec![CellValue::Number(3_000_000.0)]
    );
}

#[test]
fn test_export_unknown_group_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let service = global_service(&config);
    service.upload(&common::rekap_workbook(), None).unwrap();

    let result = service.export(&DatasetHandle::Global, "C9", ArtifactKind::Pdf);
    assert!(matches!(result, Err(GroupdocError::GroupNotFound(_))));
    assert!(!config.output_dir.join("C9.pdf").exists());
}

#[test]
fn test_export_overwrites_previous_artifact() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let service = global_service(&config);
    service.upload(&common::rekap_workbook(), None).unwrap();

    std::fs::create_dir_all(&config.output_dir).unwrap();
    std::fs::write(config.output_dir.join("A1.docx"), b"stale").unwrap();

    let path = service
        .export(&DatasetHandle::Global, "A1", ArtifactKind::Docx)
        .unwrap();
    let bytes = std::fs::read(path).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn test_lookalike_keys_export_to_separate_files() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let service = global_service(&config);
    let outcome = service.upload(&common::lookalike_codes_workbook(), None).unwrap();
    assert_eq!(outcome.groups.len(), 3);

    let mut paths = Vec::new();
    for key in &outcome.groups {
        paths.extend(service.export_all(&DatasetHandle::Global, key).unwrap());
    }
    let distinct: HashSet<_> = paths.iter().collect();
    assert_eq!(distinct.len(), 9);
    assert_eq!(std::fs::read_dir(&config.output_dir).unwrap().count(), 9);

    // each xlsx still holds its own group's row
    for key in &outcome.groups {
        let path = service
            .export(&DatasetHandle::Global, key, ArtifactKind::Xlsx)
            .unwrap();
        let (table, _) = royalbit_groupdoc::excel::ExcelImporter::new()
            .import_path(&path)
            .unwrap();
        assert_eq!(
            table.column("Kode Kegiatan").unwrap().values,
            vec![CellValue::text(key.as_str())]
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// STORES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_disk_snapshot_survives_new_service() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let first = GroupService::new(
        Arc::new(GlobalSlotStore::with_persistence(Box::new(DiskSnapshot::new(
            &config.state_dir,
        )))),
        &config,
    );
    first.upload(&common::rekap_workbook(), None).unwrap();
    drop(first);

    let second = GroupService::new(
        Arc::new(GlobalSlotStore::with_persistence(Box::new(DiskSnapshot::new(
            &config.state_dir,
        )))),
        &config,
    );
    assert_eq!(
        second.grouping_column(&DatasetHandle::Global).unwrap(),
        "Kode Kegiatan"
    );
    assert_eq!(
        second.detail(&DatasetHandle::Global, "A1").unwrap().row_count(),
        3
    );
}

#[test]
fn test_sessions_are_isolated() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let service = GroupService::new(
        Arc::new(SessionStore::new(8, Duration::from_secs(60))),
        &config,
    );

    let rekap = service.upload(&common::rekap_workbook(), None).unwrap();
    let units = service.upload(&common::unit_workbook(), Some("Unit")).unwrap();
    assert_ne!(rekap.handle, units.handle);

    assert_eq!(
        service.groups(&rekap.handle).unwrap(),
        vec!["A1".to_string(), "B2".to_string()]
    );
    assert_eq!(
        service.groups(&units.handle).unwrap(),
        vec!["Keuangan".to_string(), "Umum".to_string()]
    );
    assert!(matches!(
        service.detail(&units.handle, "A1"),
        Err(GroupdocError::GroupNotFound(_))
    ));
}

#[test]
fn test_session_store_rejects_global_handle() {
    let dir = TempDir::new().unwrap();
    let service = GroupService::new(
        Arc::new(SessionStore::new(8, Duration::from_secs(60))),
        &config_in(&dir),
    );

    let err = service.groups(&DatasetHandle::Global).unwrap_err();
    assert!(matches!(err, GroupdocError::SessionNotFound(_)));
    assert_eq!(err.status_code(), 404);
}

#[test]
fn test_export_all_in_session_prefixes_file_names() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let service = GroupService::new(
        Arc::new(SessionStore::new(8, Duration::from_secs(60))),
        &config,
    );
    let outcome = service.upload(&common::rekap_workbook(), None).unwrap();
    let session = outcome.handle.session_id().unwrap();

    let paths = service.export_all(&outcome.handle, "B2").unwrap();
    assert_eq!(paths.len(), 3);
    for (path, kind) in paths.iter().zip(ArtifactKind::ALL) {
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            format!("{}_B2.{}", session, kind.extension())
        );
        assert!(path.exists());
    }
}
