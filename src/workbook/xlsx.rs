// src/workbook/xlsx.rs

use super::excel_date::{date_to_serial, number_to_cell_value};
use super::{CellValue, MergedRange, Sheet, SheetMut, Workbook};
use crate::errors::{AppError, AppResult};
use crate::utils::time::format_hms;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use umya_spreadsheet::{Cell, Spreadsheet, Worksheet};

/// `.xlsx` workbook loaded fully in memory through umya-spreadsheet.
/// Styles, column widths and untouched cells survive a load/save cycle.
pub struct XlsxWorkbook {
    book: Spreadsheet,
    path: PathBuf,
}

impl XlsxWorkbook {
    pub fn open(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::WorkbookNotFound(path.to_path_buf()));
        }

        let book =
            umya_spreadsheet::reader::xlsx::read(path).map_err(|e| AppError::WorkbookUnreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        log::debug!(
            "Opened workbook {} ({} sheet(s))",
            path.display(),
            book.get_sheet_collection().len()
        );

        Ok(Self {
            book,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Workbook for XlsxWorkbook {
    type Sheet = Worksheet;

    fn sheet_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection()
            .iter()
            .map(|ws| ws.get_name().to_string())
            .collect()
    }

    fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.book.get_sheet_by_name(name)
    }

    fn sheet_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.book.get_sheet_by_name_mut(name)
    }

    fn duplicate_sheet(&mut self, template: &str, new_name: &str) -> AppResult<()> {
        let mut copy = self
            .book
            .get_sheet_by_name(template)
            .ok_or_else(|| AppError::SheetNotFound(template.to_string()))?
            .clone();
        copy.set_name(new_name);

        self.book
            .add_sheet(copy)
            .map_err(|e| AppError::Workbook(format!("cannot add sheet '{new_name}': {e}")))?;
        Ok(())
    }

    fn remove_sheet(&mut self, name: &str) -> AppResult<()> {
        self.book
            .remove_sheet_by_name(name)
            .map_err(|e| AppError::Workbook(format!("cannot remove sheet '{name}': {e}")))
    }

    fn move_sheet(&mut self, name: &str, index: usize) -> AppResult<()> {
        let sheets = self.book.get_sheet_collection_mut();
        let from = sheets
            .iter()
            .position(|ws| ws.get_name() == name)
            .ok_or_else(|| AppError::SheetNotFound(name.to_string()))?;
        let ws = sheets.remove(from);
        let to = index.min(sheets.len());
        sheets.insert(to, ws);
        Ok(())
    }

    fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // Opening the file ourselves keeps OS-level errors (locks, permissions)
        // as io::Error so callers can tell them apart.
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        umya_spreadsheet::writer::xlsx::write_writer(&self.book, &mut writer)
            .map_err(|e| AppError::Workbook(format!("cannot write {}: {e}", path.display())))?;
        writer.flush()?;
        Ok(())
    }
}

impl Sheet for Worksheet {
    fn name(&self) -> &str {
        self.get_name()
    }

    fn value(&self, row: u32, col: u32) -> CellValue {
        self.get_cell((col, row))
            .map(cell_to_value)
            .unwrap_or(CellValue::Empty)
    }

    fn max_row(&self) -> u32 {
        self.get_highest_row()
    }

    fn max_column(&self) -> u32 {
        self.get_highest_column()
    }

    fn merged_ranges(&self) -> Vec<MergedRange> {
        self.get_merge_cells()
            .iter()
            .filter_map(|r| {
                let a1 = r.get_range();
                let parsed = MergedRange::parse_a1(&a1);
                if parsed.is_none() {
                    log::warn!("Skipping unparsable merge range '{a1}' in '{}'", self.get_name());
                }
                parsed
            })
            .collect()
    }
}

impl SheetMut for Worksheet {
    fn set_value(&mut self, row: u32, col: u32, value: CellValue) {
        let cell = self.get_cell_mut((col, row));
        match value {
            CellValue::Empty => {
                cell.set_blank();
            }
            CellValue::Text(s) => {
                cell.set_value_string(s);
            }
            CellValue::Number(n) => {
                cell.set_value_number(n);
            }
            CellValue::Date(d) => {
                cell.set_value_number(date_to_serial(d));
            }
            CellValue::Time(secs) => {
                cell.set_value_string(format_hms(secs));
            }
        }
    }

    fn merge(&mut self, range: MergedRange) {
        self.add_merge_cells(range.to_a1());
    }

    fn unmerge(&mut self, range: &MergedRange) -> bool {
        let merges = self.get_merge_cells_mut();
        let before = merges.len();
        merges.retain(|r| MergedRange::parse_a1(&r.get_range()).as_ref() != Some(range));
        merges.len() != before
    }
}

fn cell_to_value(cell: &Cell) -> CellValue {
    let text = cell.get_value();
    if text.trim().is_empty() {
        return CellValue::Empty;
    }

    if let Some(n) = cell.get_value_number() {
        let format_code = cell
            .get_style()
            .get_number_format()
            .map(|nf| nf.get_format_code().to_string());
        return number_to_cell_value(n, format_code.as_deref());
    }

    CellValue::Text(text.to_string())
}
