//! Spreadsheet capability used by the report pipeline.
//!
//! The pipeline never talks to a file format directly: it reads and writes
//! cells by 1-based (row, column), enumerates merged ranges and asks the
//! workbook to save itself. `xlsx` backs this with umya-spreadsheet,
//! `memory` keeps everything in plain maps (used by tests and dry runs).

pub mod excel_date;
pub mod memory;
pub mod xlsx;

use crate::errors::AppResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub use memory::{MemorySheet, MemoryWorkbook};
pub use xlsx::XlsxWorkbook;

/// A single resolved cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    /// Time of day or duration, in seconds.
    Time(i64),
}

impl CellValue {
    /// Empty cell or text made only of whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%d.%m.%Y")),
            CellValue::Time(secs) => write!(f, "{}", crate::utils::time::format_hms(*secs)),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

/// Rectangle of merged cells, 1-based and inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergedRange {
    pub min_row: u32,
    pub min_col: u32,
    pub max_row: u32,
    pub max_col: u32,
}

impl MergedRange {
    pub fn new(min_row: u32, min_col: u32, max_row: u32, max_col: u32) -> Self {
        Self {
            min_row: min_row.min(max_row),
            min_col: min_col.min(max_col),
            max_row: min_row.max(max_row),
            max_col: min_col.max(max_col),
        }
    }

    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.min_row..=self.max_row).contains(&row) && (self.min_col..=self.max_col).contains(&col)
    }

    pub fn intersects(&self, other: &MergedRange) -> bool {
        self.min_row <= other.max_row
            && other.min_row <= self.max_row
            && self.min_col <= other.max_col
            && other.min_col <= self.max_col
    }

    /// True when `self` lies completely inside `outer`.
    pub fn is_within(&self, outer: &MergedRange) -> bool {
        outer.contains(self.min_row, self.min_col) && outer.contains(self.max_row, self.max_col)
    }

    /// `E26:H26` style reference.
    pub fn to_a1(&self) -> String {
        format!(
            "{}{}:{}{}",
            column_letters(self.min_col),
            self.min_row,
            column_letters(self.max_col),
            self.max_row
        )
    }

    /// Parse `A1:B2` (or a single `A1`) into a range. `$` anchors are ignored.
    pub fn parse_a1(s: &str) -> Option<Self> {
        let s = s.trim();
        let (start, end) = match s.split_once(':') {
            Some((a, b)) => (a, b),
            None => (s, s),
        };
        let (r0, c0) = parse_cell_ref(start)?;
        let (r1, c1) = parse_cell_ref(end)?;
        Some(Self::new(r0, c0, r1, c1))
    }
}

impl fmt::Display for MergedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// 1 → "A", 27 → "AA".
pub fn column_letters(mut col: u32) -> String {
    let mut out = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        out.push((b'A' + rem as u8) as char);
        col = (col - 1) / 26;
    }
    out.iter().rev().collect()
}

/// "C7" → (row 7, col 3).
pub fn parse_cell_ref(s: &str) -> Option<(u32, u32)> {
    let s = s.replace('$', "");
    let split = s.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = s.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let col = letters
        .to_ascii_uppercase()
        .bytes()
        .try_fold(0u32, |acc, b| acc.checked_mul(26)?.checked_add((b - b'A' + 1) as u32))?;
    let row = digits.parse::<u32>().ok()?;
    (row > 0 && col > 0).then_some((row, col))
}

/// Read access to one sheet.
pub trait Sheet {
    fn name(&self) -> &str;

    /// Raw value stored at (row, col). Non-anchor cells of a merge are empty;
    /// use `core::resolver::resolve` for merge-aware reads.
    fn value(&self, row: u32, col: u32) -> CellValue;

    fn max_row(&self) -> u32;

    fn max_column(&self) -> u32;

    fn merged_ranges(&self) -> Vec<MergedRange>;
}

/// Write access to one sheet.
pub trait SheetMut: Sheet {
    fn set_value(&mut self, row: u32, col: u32, value: CellValue);

    fn merge(&mut self, range: MergedRange);

    /// Returns `false` when the range was not merged.
    fn unmerge(&mut self, range: &MergedRange) -> bool;
}

/// An open workbook handle. Owned by the orchestrator, lent to components.
pub trait Workbook {
    type Sheet: SheetMut;

    fn sheet_names(&self) -> Vec<String>;

    fn sheet(&self, name: &str) -> Option<&Self::Sheet>;

    fn sheet_mut(&mut self, name: &str) -> Option<&mut Self::Sheet>;

    /// Copy `template` under `new_name` (appended as the last sheet).
    fn duplicate_sheet(&mut self, template: &str, new_name: &str) -> AppResult<()>;

    fn remove_sheet(&mut self, name: &str) -> AppResult<()>;

    /// Move `name` to position `index`, clamped to the last position.
    fn move_sheet(&mut self, name: &str, index: usize) -> AppResult<()>;

    fn save(&self, path: &Path) -> AppResult<()>;

    fn has_sheet(&self, name: &str) -> bool {
        self.sheet(name).is_some()
    }
}
