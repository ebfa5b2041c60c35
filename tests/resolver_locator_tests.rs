mod common;
use vykaz_sync::core::locator::{HeaderAnchor, find};
use vykaz_sync::core::resolver::{resolve, resolve_row};
use vykaz_sync::workbook::{CellValue, MemorySheet, MergedRange};

fn merged_sheet() -> MemorySheet {
    MemorySheet::new("S")
        .with(1, 1, "top-left")
        .with_merge(MergedRange::new(1, 1, 2, 3))
        .with(3, 2, "plain")
}

#[test]
fn every_cell_of_a_merge_reads_the_anchor_value() {
    let sheet = merged_sheet();
    for row in 1..=2 {
        for col in 1..=3 {
            assert_eq!(resolve(&sheet, row, col), CellValue::from("top-left"));
        }
    }
}

#[test]
fn cells_outside_merges_read_directly() {
    let sheet = merged_sheet();
    assert_eq!(resolve(&sheet, 3, 2), CellValue::from("plain"));
    assert_eq!(resolve(&sheet, 3, 1), CellValue::Empty);
    assert_eq!(resolve(&sheet, 2, 4), CellValue::Empty);
}

#[test]
fn resolve_row_matches_single_reads() {
    let sheet = merged_sheet();
    let cols = [1, 2, 3, 4];
    let row = resolve_row(&sheet, 2, &cols);
    let single: Vec<CellValue> = cols.iter().map(|c| resolve(&sheet, 2, *c)).collect();
    assert_eq!(row, single);
}

#[test]
fn locator_is_case_insensitive_substring() {
    let sheet = MemorySheet::new("S")
        .with(2, 4, "Mesačný výkaz")
        .with(5, 2, "DÁTUM nástupu");
    assert_eq!(
        find(&sheet, &["dátum"]),
        Some(HeaderAnchor { row: 5, column: 2 })
    );
}

#[test]
fn locator_prefers_earliest_row_then_column() {
    let sheet = MemorySheet::new("S")
        .with(3, 5, "Dátum")
        .with(3, 2, "Dátum")
        .with(7, 1, "Dátum");
    assert_eq!(
        find(&sheet, &["Dátum"]),
        Some(HeaderAnchor { row: 3, column: 2 })
    );
}

#[test]
fn locator_checks_candidates_per_cell() {
    // "Od" appears later, "Do" earlier: the earliest cell wins regardless of candidate order
    let sheet = MemorySheet::new("S").with(1, 3, "Do").with(2, 1, "Od");
    assert_eq!(
        find(&sheet, &["od", "do"]),
        Some(HeaderAnchor { row: 1, column: 3 })
    );
}

#[test]
fn locator_not_found() {
    let sheet = MemorySheet::new("S").with(1, 1, "Meno");
    assert_eq!(find(&sheet, &["Dátum"]), None);
    assert_eq!(find(&sheet, &[]), None);
}

#[test]
fn numbers_are_searched_by_their_text() {
    let sheet = MemorySheet::new("S").with(4, 4, 2025.0);
    assert_eq!(find(&sheet, &["2025"]), Some(HeaderAnchor { row: 4, column: 4 }));
}
