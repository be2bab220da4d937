//! Workbook fixtures built in memory with rust_xlsxwriter

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// A realistic "rekap" sheet:
///
/// - row 1: a lone title cell (not a header)
/// - row 2: header with a blank fifth cell
/// - rows 3-7: four data rows and one fully blank row
pub fn rekap_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    sheet.write_string(0, 0, "REKAP ANGGARAN 2024").unwrap();

    for (col, name) in ["No", "Kode Kegiatan", "Uraian", "Jumlah"].iter().enumerate() {
        sheet.write_string(1, col as u16, *name).unwrap();
    }

    let rows: [(f64, &str, &str, f64); 4] = [
        (1.0, "A1", "Belanja ATK", 1_500_000.0),
        (2.0, "A1", "Honor narasumber", 250_000.0),
        (3.0, "B2", "Perjalanan dinas", 3_000_000.0),
        (4.0, "A1", "Konsumsi rapat", 125_000.0),
    ];
    let mut r = 2;
    for (i, (no, code, desc, amount)) in rows.iter().enumerate() {
        if i == 2 {
            // blank spacer row
            r += 1;
        }
        sheet.write_number(r, 0, *no).unwrap();
        sheet.write_string(r, 1, *code).unwrap();
        sheet.write_string(r, 2, *desc).unwrap();
        sheet.write_number(r, 3, *amount).unwrap();
        r += 1;
    }
    // data under the blank fifth header cell
    sheet.write_string(2, 4, "catatan").unwrap();

    workbook.save_to_buffer().unwrap()
}

/// Three columns with the header on row 2 and row 1 left blank;
/// codes A1, A1, B2, A1
pub fn blank_first_row_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in ["No", "Kode Kegiatan", "Uraian"].iter().enumerate() {
        sheet.write_string(1, col as u16, *name).unwrap();
    }
    for (i, code) in ["A1", "A1", "B2", "A1"].iter().enumerate() {
        let row = i as u32 + 2;
        sheet.write_number(row, 0, (i + 1) as f64).unwrap();
        sheet.write_string(row, 1, *code).unwrap();
        sheet.write_string(row, 2, format!("kegiatan {}", i + 1)).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

/// Codes that differ only in characters a file name cannot carry
pub fn lookalike_codes_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Kode Kegiatan").unwrap();
    sheet.write_string(0, 1, "Jumlah").unwrap();
    for (i, (code, value)) in [("A/1", 100.0), ("A 1", 200.0), ("A_1", 300.0)]
        .iter()
        .enumerate()
    {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, *code).unwrap();
        sheet.write_number(row, 1, *value).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

/// Sheet whose only candidate grouping column is named "Unit"
pub fn unit_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Unit").unwrap();
    sheet.write_string(0, 1, "Nilai").unwrap();
    for (i, (unit, value)) in [("Keuangan", 10.0), ("Umum", 20.0), ("Keuangan", 30.0)]
        .iter()
        .enumerate()
    {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, *unit).unwrap();
        sheet.write_number(row, 1, *value).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

/// Sheet with a single non-empty cell in every row
pub fn headerless_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "judul").unwrap();
    sheet.write_string(2, 0, "catatan").unwrap();
    workbook.save_to_buffer().unwrap()
}

pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
