// src/core/writer.rs

use crate::config::ReportLayout;
use crate::errors::{AppError, AppResult};
use crate::models::record::{TargetField, TargetRecord};
use crate::models::report::SummaryMetrics;
use crate::utils::text::is_placeholder;
use crate::utils::time::{ZERO_DURATION, format_hms, parse_hms};
use crate::workbook::{CellValue, MergedRange, Sheet, SheetMut, Workbook};

/// State of a target sheet after [`SheetWriterLogic::prepare`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedSheet {
    pub name: String,
    /// The sheet was copied from the template.
    pub created: bool,
    /// Every merge that overlapped the daily region.
    pub unmerged: Vec<MergedRange>,
    /// Merges reaching outside the region, re-applied by `restore_merges`.
    pub to_restore: Vec<MergedRange>,
}

pub struct SheetWriterLogic<'a> {
    pub layout: &'a ReportLayout,
    pub instruction_sheets: &'a [String],
}

impl<'a> SheetWriterLogic<'a> {
    pub fn new(layout: &'a ReportLayout, instruction_sheets: &'a [String]) -> Self {
        Self {
            layout,
            instruction_sheets,
        }
    }

    /// Rectangle holding the 31 day rows.
    pub fn region(&self) -> MergedRange {
        MergedRange::new(
            self.layout.start_row,
            self.layout.first_column,
            self.layout.end_row(),
            self.layout.last_column,
        )
    }

    /// First non-instruction sheet, else the first sheet.
    pub fn template_name<W: Workbook>(&self, wb: &W) -> Option<String> {
        let names = wb.sheet_names();
        names
            .iter()
            .find(|n| !self.instruction_sheets.contains(n))
            .or_else(|| names.first())
            .cloned()
    }

    /// Make sure `name` exists and its daily region is empty and unmerged.
    pub fn prepare<W: Workbook>(&self, wb: &mut W, name: &str) -> AppResult<PreparedSheet> {
        let mut prepared = PreparedSheet {
            name: name.to_string(),
            ..Default::default()
        };

        // 1️⃣ create from template when missing
        if !wb.has_sheet(name) {
            let template = self
                .template_name(wb)
                .ok_or_else(|| AppError::NoTemplateSheet(name.to_string()))?;
            wb.duplicate_sheet(&template, name)?;
            prepared.created = true;
            log::info!("created sheet '{}' from template '{}'", name, template);
        }

        let region = self.region();
        let sheet = wb
            .sheet_mut(name)
            .ok_or_else(|| AppError::SheetNotFound(name.to_string()))?;

        // 2️⃣ unmerge everything touching the region
        for range in sheet.merged_ranges() {
            if !range.intersects(&region) {
                continue;
            }
            sheet.unmerge(&range);
            if !range.is_within(&region) {
                prepared.to_restore.push(range);
            }
            prepared.unmerged.push(range);
        }

        // 3️⃣ blank the region
        for row in region.min_row..=region.max_row {
            for col in region.min_col..=region.max_col {
                sheet.set_value(row, col, CellValue::Empty);
            }
        }

        log::debug!(
            "prepared '{}': {} merge(s) removed, {} to restore",
            name,
            prepared.unmerged.len(),
            prepared.to_restore.len()
        );
        Ok(prepared)
    }

    /// Column of every record field.
    pub fn column_of(&self, field: TargetField) -> u32 {
        match field {
            TargetField::Date => 1,
            TargetField::Start => 2,
            TargetField::End => 3,
            TargetField::Break => 4,
            TargetField::Description => self.layout.description_columns.0,
            TargetField::Worked => 9,
            TargetField::Location => 10,
            TargetField::ProjectHours => 11,
            TargetField::SolutionHours => 12,
            TargetField::OutsideProjectHours => 13,
            TargetField::Total => 14,
        }
    }

    /// Write one record per day row; the description is merged across its columns.
    pub fn write_rows<S: SheetMut + ?Sized>(&self, sheet: &mut S, records: &[TargetRecord]) -> usize {
        let (desc_from, desc_to) = self.layout.description_columns;
        let count = records.len().min(self.layout.day_rows as usize);

        for (i, record) in records.iter().take(count).enumerate() {
            let row = self.layout.start_row + i as u32;
            for field in TargetField::ALL {
                let value = record.field(field);
                sheet.set_value(row, self.column_of(field), CellValue::from(value));
            }
            if desc_to > desc_from {
                sheet.merge(MergedRange::new(row, desc_from, row, desc_to));
            }
        }

        log::info!(
            "wrote {} daily row(s) to '{}' from row {}",
            count,
            sheet.name(),
            self.layout.start_row
        );
        count
    }

    /// Put back merges that reached outside the region, unless they would now
    /// overlap a description merge.
    pub fn restore_merges<S: SheetMut + ?Sized>(&self, sheet: &mut S, prepared: &PreparedSheet) -> usize {
        let (desc_from, desc_to) = self.layout.description_columns;
        let written = MergedRange::new(self.layout.start_row, desc_from, self.layout.end_row(), desc_to);

        let mut restored = 0;
        for range in &prepared.to_restore {
            if desc_to > desc_from && range.intersects(&written) {
                log::warn!(
                    "'{}': merge {} overlaps the description column, not restored",
                    prepared.name,
                    range
                );
                continue;
            }
            sheet.merge(*range);
            restored += 1;
        }
        restored
    }

    /// Compute and write the monthly summary.
    ///
    /// The day count only lands in its cell when the cell is blank, a
    /// placeholder, or already numeric; anything else is left untouched.
    pub fn write_summary<S: SheetMut + ?Sized>(&self, sheet: &mut S, records: &[TargetRecord]) -> SummaryMetrics {
        let metrics = summarize(records);
        let row = self.layout.summary_row;

        sheet.set_value(
            row,
            self.layout.total_column,
            CellValue::from(metrics.total_duration.as_str()),
        );

        let existing = sheet.value(row, self.layout.day_count_column);
        let writable = match &existing {
            CellValue::Empty | CellValue::Number(_) => true,
            CellValue::Text(s) => is_placeholder(s),
            _ => false,
        };
        if writable {
            sheet.set_value(
                row,
                self.layout.day_count_column,
                CellValue::Number(metrics.working_day_count as f64),
            );
        } else {
            log::warn!(
                "'{}': day count cell holds '{}', left untouched",
                sheet.name(),
                existing
            );
        }

        SummaryMetrics {
            day_count_written: writable,
            ..metrics
        }
    }
}

/// Working days (worked ≠ 00:00:00) and the sum of every total, without an hour cap.
pub fn summarize(records: &[TargetRecord]) -> SummaryMetrics {
    let working_day_count = records
        .iter()
        .filter(|r| r.worked.trim() != ZERO_DURATION)
        .count();
    let total = records
        .iter()
        .map(|r| parse_hms(&r.total).unwrap_or(0))
        .try_fold(0i64, i64::checked_add)
        .unwrap_or_else(|| {
            log::warn!("monthly total overflowed, written as {}", ZERO_DURATION);
            0
        });

    SummaryMetrics {
        working_day_count,
        total_duration: format_hms(total),
        day_count_written: false,
    }
}
