// src/workbook/memory.rs

use super::{CellValue, MergedRange, Sheet, SheetMut, Workbook};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Sheet kept in plain maps. Cells are keyed by (row, col), 1-based.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemorySheet {
    pub name: String,
    #[serde(with = "cell_list")]
    cells: BTreeMap<(u32, u32), CellValue>,
    merges: Vec<MergedRange>,
}

impl MemorySheet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Builder-style setter used heavily by tests.
    pub fn with(mut self, row: u32, col: u32, value: impl Into<CellValue>) -> Self {
        self.set_value(row, col, value.into());
        self
    }

    pub fn with_merge(mut self, range: MergedRange) -> Self {
        self.merge(range);
        self
    }

    /// Fill one row starting at `col` with the given values.
    pub fn with_row(mut self, row: u32, col: u32, values: &[&str]) -> Self {
        for (i, v) in values.iter().enumerate() {
            self.set_value(row, col + i as u32, CellValue::from(*v));
        }
        self
    }
}

impl Sheet for MemorySheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self, row: u32, col: u32) -> CellValue {
        self.cells.get(&(row, col)).cloned().unwrap_or_default()
    }

    fn max_row(&self) -> u32 {
        let cells = self.cells.keys().map(|(r, _)| *r).max().unwrap_or(0);
        let merges = self.merges.iter().map(|m| m.max_row).max().unwrap_or(0);
        cells.max(merges)
    }

    fn max_column(&self) -> u32 {
        let cells = self.cells.keys().map(|(_, c)| *c).max().unwrap_or(0);
        let merges = self.merges.iter().map(|m| m.max_col).max().unwrap_or(0);
        cells.max(merges)
    }

    fn merged_ranges(&self) -> Vec<MergedRange> {
        self.merges.clone()
    }
}

impl SheetMut for MemorySheet {
    fn set_value(&mut self, row: u32, col: u32, value: CellValue) {
        if value == CellValue::Empty {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), value);
        }
    }

    fn merge(&mut self, range: MergedRange) {
        if !self.merges.contains(&range) {
            self.merges.push(range);
        }
    }

    fn unmerge(&mut self, range: &MergedRange) -> bool {
        let before = self.merges.len();
        self.merges.retain(|m| m != range);
        self.merges.len() != before
    }
}

/// Workbook made of `MemorySheet`s. `save` writes a JSON snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryWorkbook {
    sheets: Vec<MemorySheet>,
}

impl MemoryWorkbook {
    pub fn new(sheets: Vec<MemorySheet>) -> Self {
        Self { sheets }
    }

    pub fn push(&mut self, sheet: MemorySheet) {
        self.sheets.push(sheet);
    }

    pub fn load_snapshot(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Workbook for MemoryWorkbook {
    type Sheet = MemorySheet;

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn sheet(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    fn sheet_mut(&mut self, name: &str) -> Option<&mut MemorySheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    fn duplicate_sheet(&mut self, template: &str, new_name: &str) -> AppResult<()> {
        if self.has_sheet(new_name) {
            return Err(AppError::Workbook(format!(
                "sheet '{new_name}' already exists"
            )));
        }
        let mut copy = self
            .sheet(template)
            .ok_or_else(|| AppError::SheetNotFound(template.to_string()))?
            .clone();
        copy.name = new_name.to_string();
        self.sheets.push(copy);
        Ok(())
    }

    fn remove_sheet(&mut self, name: &str) -> AppResult<()> {
        let before = self.sheets.len();
        self.sheets.retain(|s| s.name != name);
        if self.sheets.len() == before {
            return Err(AppError::SheetNotFound(name.to_string()));
        }
        Ok(())
    }

    fn move_sheet(&mut self, name: &str, index: usize) -> AppResult<()> {
        let from = self
            .sheets
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| AppError::SheetNotFound(name.to_string()))?;
        let sheet = self.sheets.remove(from);
        let to = index.min(self.sheets.len());
        self.sheets.insert(to, sheet);
        Ok(())
    }

    fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// JSON maps need string keys, so cells are stored as `[row, col, value]` triples.
mod cell_list {
    use super::CellValue;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        cells: &BTreeMap<(u32, u32), CellValue>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let list: Vec<(u32, u32, &CellValue)> =
            cells.iter().map(|((r, c), v)| (*r, *c, v)).collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<(u32, u32), CellValue>, D::Error> {
        let list: Vec<(u32, u32, CellValue)> = Vec::deserialize(deserializer)?;
        Ok(list.into_iter().map(|(r, c, v)| ((r, c), v)).collect())
    }
}
