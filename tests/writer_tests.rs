mod common;
use common::{INSTRUCTIONS, memory_book, records_from, report_sheet};
use vykaz_sync::config::ReportLayout;
use vykaz_sync::core::writer::{SheetWriterLogic, summarize};
use vykaz_sync::errors::AppError;
use vykaz_sync::models::record::TargetRecord;
use vykaz_sync::workbook::{CellValue, MemorySheet, MemoryWorkbook, MergedRange, Sheet, Workbook};

fn month(work_days: usize) -> Vec<TargetRecord> {
    let worked: Vec<&str> = (0..31)
        .map(|i| if i < work_days { "08:00:00" } else { "00:00:00" })
        .collect();
    records_from(&worked)
}

#[test]
fn summary_of_twenty_work_days() {
    let m = summarize(&month(20));
    assert_eq!(m.working_day_count, 20);
    assert_eq!(m.total_duration, "160:00:00");
}

#[test]
fn summary_has_no_hour_cap() {
    let records = records_from(&["23:59:59"; 31]);
    let m = summarize(&records);
    assert_eq!(m.working_day_count, 31);
    assert_eq!(m.total_duration, "743:59:29");
}

#[test]
fn summary_ignores_oversized_totals() {
    let records = records_from(&["9999999999999999:00:00", "1000000:00:00", "1000000:00:00"]);
    let m = summarize(&records);
    assert_eq!(m.working_day_count, 3);
    assert_eq!(m.total_duration, "2000000:00:00");
}

#[test]
fn write_summary_fills_both_cells() {
    let layout = ReportLayout::default();
    let writer = SheetWriterLogic::new(&layout, &[]);
    let mut sheet = report_sheet("Jan Novak");

    let m = writer.write_summary(&mut sheet, &month(20));
    assert!(m.day_count_written);
    assert_eq!(sheet.value(57, 13), CellValue::Number(20.0));
    assert_eq!(sheet.value(57, 14), CellValue::from("160:00:00"));
}

#[test]
fn day_count_cell_with_text_is_left_alone() {
    let layout = ReportLayout::default();
    let writer = SheetWriterLogic::new(&layout, &[]);
    let mut sheet = report_sheet("Jan Novak").with(57, 13, "počet dní");

    let m = writer.write_summary(&mut sheet, &month(3));
    assert!(!m.day_count_written);
    assert_eq!(m.working_day_count, 3);
    assert_eq!(sheet.value(57, 13), CellValue::from("počet dní"));
    assert_eq!(sheet.value(57, 14), CellValue::from("24:00:00"));
}

#[test]
fn prepare_clears_and_unmerges_the_daily_region() {
    let layout = ReportLayout::default();
    let writer = SheetWriterLogic::new(&layout, &[]);
    let mut wb = memory_book(vec![report_sheet("Jan Novak")]);

    let prepared = writer.prepare(&mut wb, "Jan Novak").expect("prepare");
    assert!(!prepared.created);
    assert_eq!(prepared.unmerged, vec![MergedRange::new(26, 5, 26, 8)]);
    assert!(prepared.to_restore.is_empty());

    let sheet = wb.sheet("Jan Novak").expect("sheet");
    assert_eq!(sheet.value(26, 5), CellValue::Empty);
    // merges outside the region survive
    let merges = sheet.merged_ranges();
    assert!(merges.contains(&MergedRange::new(4, 3, 4, 8)));
    assert!(merges.contains(&MergedRange::new(25, 5, 25, 8)));
    assert!(!merges.contains(&MergedRange::new(26, 5, 26, 8)));
    // the summary row is outside the region too
    assert_eq!(sheet.value(57, 5), CellValue::from("Spolu:"));
}

#[test]
fn prepare_creates_missing_sheet_from_first_non_instruction_sheet() {
    let layout = ReportLayout::default();
    let instructions = vec![INSTRUCTIONS.to_string()];
    let writer = SheetWriterLogic::new(&layout, &instructions);
    let mut wb = memory_book(vec![
        MemorySheet::new(INSTRUCTIONS).with(1, 1, "Návod"),
        report_sheet("Vzor"),
    ]);

    let prepared = writer.prepare(&mut wb, "Eva Mala").expect("prepare");
    assert!(prepared.created);
    assert_eq!(wb.sheet_names(), vec![INSTRUCTIONS, "Vzor", "Eva Mala"]);
    let created = wb.sheet("Eva Mala").expect("created");
    assert_eq!(created.value(2, 1), CellValue::from("Pracovný výkaz"));
    assert_eq!(created.value(26, 5), CellValue::Empty);
}

#[test]
fn prepare_without_any_sheet_fails() {
    let layout = ReportLayout::default();
    let writer = SheetWriterLogic::new(&layout, &[]);
    let mut wb = MemoryWorkbook::default();
    assert!(matches!(
        writer.prepare(&mut wb, "X"),
        Err(AppError::NoTemplateSheet(name)) if name == "X"
    ));
}

#[test]
fn merges_reaching_outside_are_restored_unless_they_hit_descriptions() {
    let layout = ReportLayout::default();
    let writer = SheetWriterLogic::new(&layout, &[]);
    let crossing = MergedRange::new(56, 1, 58, 1);
    let over_description = MergedRange::new(55, 6, 58, 6);
    let mut wb = memory_book(vec![
        report_sheet("S")
            .with_merge(crossing)
            .with_merge(over_description),
    ]);

    let prepared = writer.prepare(&mut wb, "S").expect("prepare");
    assert_eq!(prepared.to_restore.len(), 2);

    let sheet = wb.sheet_mut("S").expect("sheet");
    writer.write_rows(sheet, &month(1));
    let restored = writer.restore_merges(sheet, &prepared);
    assert_eq!(restored, 1);
    let merges = sheet.merged_ranges();
    assert!(merges.contains(&crossing));
    assert!(!merges.contains(&over_description));
}

#[test]
fn write_rows_fills_columns_and_merges_descriptions() {
    let layout = ReportLayout::default();
    let writer = SheetWriterLogic::new(&layout, &[]);
    let mut sheet = MemorySheet::new("S");
    let mut records = month(1);
    records[0].start = "09:00:00".into();
    records[0].description = "Analýza".into();
    records[0].location = "Bratislava".into();

    let written = writer.write_rows(&mut sheet, &records);
    assert_eq!(written, 31);
    assert_eq!(sheet.value(26, 1), CellValue::from("1."));
    assert_eq!(sheet.value(26, 2), CellValue::from("09:00:00"));
    assert_eq!(sheet.value(26, 5), CellValue::from("Analýza"));
    assert_eq!(sheet.value(26, 9), CellValue::from("08:00:00"));
    assert_eq!(sheet.value(26, 10), CellValue::from("Bratislava"));
    assert_eq!(sheet.value(26, 14), CellValue::from("08:00:00"));
    assert_eq!(sheet.value(56, 1), CellValue::from("31."));
    assert!(sheet.merged_ranges().contains(&MergedRange::new(26, 5, 26, 8)));
    assert_eq!(sheet.merged_ranges().len(), 31);
}
