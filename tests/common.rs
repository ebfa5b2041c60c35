#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::path::Path;
use vykaz_sync::models::record::TargetRecord;
use vykaz_sync::workbook::{MemorySheet, MemoryWorkbook, MergedRange};

pub fn vs() -> Command {
    cargo_bin_cmd!("vykaz-sync")
}

pub const INSTRUCTIONS: &str = "Inštrukcie k vyplneniu PV";

/// Attendance log: "Dátum" header on row 3, units on row 4, day rows from row 5.
pub fn attendance_sheet(name: &str, rows: &[[&str; 7]]) -> MemorySheet {
    let mut sheet = MemorySheet::new(name)
        .with(1, 1, "Dochádzka")
        .with(1, 3, name)
        .with_row(
            3,
            1,
            &[
                "Dátum",
                "Príchod",
                "Odchod",
                "Prestávka",
                "Prerušenie od",
                "Prerušenie do",
                "Odpracované",
            ],
        )
        .with_row(4, 1, &["", "hh:mm", "hh:mm", "min", "hh:mm", "hh:mm", "hh:mm:ss"]);
    for (i, row) in rows.iter().enumerate() {
        sheet = sheet.with_row(5 + i as u32, 1, row);
    }
    sheet
}

/// A typical work day row (09:00–17:00, 30 min break).
pub fn work_row(day: &str) -> [&str; 7] {
    [day, "09:00:00", "17:00:00", "30", "-", "-", "08:00:00"]
}

pub fn absent_row(day: &str) -> [&str; 7] {
    [day, "-", "-", "-", "-", "-", "-"]
}

pub fn vacation_row(day: &str) -> [&str; 7] {
    [day, "Dovolenka", "-", "-", "-", "-", "08:00:00"]
}

/// Month of `work` work days followed by absent days.
pub fn month_rows(work: usize) -> Vec<[&'static str; 7]> {
    (0..31)
        .map(|i| if i < work { work_row("x") } else { absent_row("x") })
        .collect()
}

/// Labor report template: title rows, a header row with merges, day block
/// from row 26 and the summary row 57.
pub fn report_sheet(name: &str) -> MemorySheet {
    MemorySheet::new(name)
        .with(2, 1, "Pracovný výkaz")
        .with(4, 1, "Meno:")
        .with(4, 3, name)
        .with_merge(MergedRange::new(4, 3, 4, 8))
        .with(25, 1, "Dátum")
        .with(25, 5, "Popis činnosti")
        .with_merge(MergedRange::new(25, 5, 25, 8))
        .with(26, 5, "stará hodnota")
        .with_merge(MergedRange::new(26, 5, 26, 8))
        .with(57, 5, "Spolu:")
        .with(57, 13, "-")
}

pub fn records_from(worked: &[&str]) -> Vec<TargetRecord> {
    worked
        .iter()
        .enumerate()
        .map(|(i, w)| TargetRecord {
            worked: w.to_string(),
            total: w.to_string(),
            ..TargetRecord::absent(i)
        })
        .collect()
}

pub fn memory_book(sheets: Vec<MemorySheet>) -> MemoryWorkbook {
    MemoryWorkbook::new(sheets)
}

// ---------------------------
// .xlsx fixtures
// ---------------------------

/// Write a workbook with the given sheets; cells are (row, col, text).
pub fn write_xlsx(path: &Path, sheets: &[(&str, Vec<(u32, u32, String)>)]) {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    for (name, cells) in sheets {
        let ws = book.new_sheet(*name).expect("add sheet");
        for (row, col, value) in cells {
            ws.get_cell_mut((*col, *row)).set_value_string(value.clone());
        }
    }
    umya_spreadsheet::writer::xlsx::write(&book, path).expect("write xlsx");
}

/// Attendance sheet cells for the xlsx fixtures.
pub fn attendance_cells(rows: &[[&str; 7]]) -> Vec<(u32, u32, String)> {
    let mut cells = vec![(3, 1, "Dátum".to_string()), (3, 7, "Odpracované".to_string())];
    for (i, row) in rows.iter().enumerate() {
        for (c, v) in row.iter().enumerate() {
            if !v.is_empty() {
                cells.push((5 + i as u32, c as u32 + 1, v.to_string()));
            }
        }
    }
    cells
}

pub fn report_cells(name: &str) -> Vec<(u32, u32, String)> {
    vec![
        (2, 1, "Pracovný výkaz".to_string()),
        (4, 3, name.to_string()),
        (25, 1, "Dátum".to_string()),
        (57, 5, "Spolu:".to_string()),
    ]
}

/// Source with two employees plus the instruction sheet; target with both
/// employees (titles, no diacritics) and one extra sheet.
pub fn write_fixture_pair(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let source = dir.join("dochadzka.xlsx");
    let target = dir.join("vykaz.xlsx");

    let mut novak = month_rows(20);
    novak[0] = vacation_row("1.");
    write_xlsx(
        &source,
        &[
            (INSTRUCTIONS, vec![(1, 1, "Návod".to_string())]),
            ("Ing. Ján Novák", attendance_cells(&novak)),
            ("Peter Horák", attendance_cells(&month_rows(10))),
        ],
    );
    write_xlsx(
        &target,
        &[
            ("Jan Novak", report_cells("Jan Novak")),
            ("Mgr. Peter Horak", report_cells("Peter Horak")),
            ("Extra", report_cells("Extra")),
        ],
    );
    (source, target)
}
