use crate::workbook::CellValue;
use serde::Serialize;

/// One extracted day: resolved cell values in column-spec order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RawAttendanceRow {
    /// Sheet row the values were read from.
    pub sheet_row: u32,
    pub values: Vec<CellValue>,
}

impl RawAttendanceRow {
    pub fn new(sheet_row: u32, values: Vec<CellValue>) -> Self {
        Self { sheet_row, values }
    }

    /// Build a row from plain strings; "" becomes an empty cell.
    pub fn from_texts(values: &[&str]) -> Self {
        Self {
            sheet_row: 0,
            values: values.iter().map(|v| CellValue::from(*v)).collect(),
        }
    }

    /// Value at a layout position; missing positions read as empty.
    pub fn get(&self, index: Option<usize>) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        index.and_then(|i| self.values.get(i)).unwrap_or(EMPTY)
    }

    pub fn has_any_value(&self) -> bool {
        self.values.iter().any(|v| !v.is_blank())
    }

    pub fn as_texts(&self) -> Vec<String> {
        self.values.iter().map(CellValue::as_text).collect()
    }
}
