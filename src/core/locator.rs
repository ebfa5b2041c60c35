//! Find a header by partial text.

use crate::workbook::Sheet;
use serde::Serialize;

/// Position of the first cell containing a searched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderAnchor {
    pub row: u32,
    pub column: u32,
}

/// Row-major scan; a cell matches when its lowercased text contains any of the
/// lowercased `candidates`. Earliest row wins, then column, then candidate order.
pub fn find<S: Sheet + ?Sized>(sheet: &S, candidates: &[&str]) -> Option<HeaderAnchor> {
    let needles: Vec<String> = candidates
        .iter()
        .filter(|c| !c.is_empty())
        .map(|c| c.to_lowercase())
        .collect();
    if needles.is_empty() {
        return None;
    }

    for row in 1..=sheet.max_row() {
        for column in 1..=sheet.max_column() {
            let value = sheet.value(row, column);
            if value.is_blank() {
                continue;
            }
            let text = value.as_text().to_lowercase();
            if needles.iter().any(|n| text.contains(n.as_str())) {
                return Some(HeaderAnchor { row, column });
            }
        }
    }
    None
}
