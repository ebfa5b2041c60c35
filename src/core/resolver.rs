//! Merge-aware cell reads.

use crate::workbook::{CellValue, Sheet};

/// Value at (row, col), or the top-left value of the merged range covering it.
pub fn resolve<S: Sheet + ?Sized>(sheet: &S, row: u32, col: u32) -> CellValue {
    match sheet
        .merged_ranges()
        .into_iter()
        .find(|r| r.contains(row, col))
    {
        Some(range) => sheet.value(range.min_row, range.min_col),
        None => sheet.value(row, col),
    }
}

/// Resolve every column of a row in one go (merged ranges are fetched once).
pub fn resolve_row<S: Sheet + ?Sized>(sheet: &S, row: u32, cols: &[u32]) -> Vec<CellValue> {
    let merges = sheet.merged_ranges();
    cols.iter()
        .map(|&col| match merges.iter().find(|r| r.contains(row, col)) {
            Some(range) => sheet.value(range.min_row, range.min_col),
            None => sheet.value(row, col),
        })
        .collect()
}
