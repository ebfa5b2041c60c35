//! Pull per-day rows out of a sheet according to an [`ExtractionProfile`].

use crate::core::locator;
use crate::core::resolver::resolve;
use crate::errors::{AppError, AppResult};
use crate::models::profile::{ColumnSpec, ExtractionProfile, StopPolicy};
use crate::models::raw_row::RawAttendanceRow;
use crate::workbook::{CellValue, Sheet};

/// Where relative column specs start counting and which row starts the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub header_row: u32,
    pub column: u32,
    pub start_row: u32,
}

/// Work out the origin for `profile` on `sheet`.
pub fn origin<S: Sheet + ?Sized>(sheet: &S, profile: &ExtractionProfile) -> AppResult<Origin> {
    let (header_row, column) = match profile.header_text.as_deref() {
        None => (1, 1),
        Some(header) => match locator::find(sheet, &[header]) {
            Some(anchor) => (anchor.row, anchor.column),
            None if profile.require_header => {
                return Err(AppError::HeaderNotFound {
                    sheet: sheet.name().to_string(),
                    header: header.to_string(),
                });
            }
            None => {
                log::warn!(
                    "header '{}' not found in '{}', reading from row 1 / column 1",
                    header,
                    sheet.name()
                );
                (1, 1)
            }
        },
    };

    Ok(Origin {
        header_row,
        column,
        start_row: profile.row_start().start_row(header_row),
    })
}

/// Extract rows top-to-bottom until a stop policy fires, an all-empty row is
/// met, or the sheet ends. Only rows with at least one value are returned.
pub fn extract<S: Sheet + ?Sized>(
    sheet: &S,
    profile: &ExtractionProfile,
    priority_marker: Option<&str>,
) -> AppResult<Vec<RawAttendanceRow>> {
    let origin = origin(sheet, profile)?;
    let max_row = sheet.max_row();
    let mut rows = Vec::new();

    log::debug!(
        "extracting '{}' from row {} (anchor column {}, max row {})",
        sheet.name(),
        origin.start_row,
        origin.column,
        max_row
    );

    let mut row = origin.start_row;
    while row <= max_row {
        let values: Vec<CellValue> = profile
            .columns
            .iter()
            .map(|spec| read_spec(sheet, row, origin.column, spec, priority_marker))
            .collect();
        let built = RawAttendanceRow::new(row, values);

        if let Some(policy) = profile.stop.iter().find(|p| should_stop(p, &built)) {
            log::debug!("'{}' stops at row {}: {:?}", sheet.name(), row, policy);
            break;
        }
        if !built.has_any_value() {
            break;
        }

        rows.push(built);
        row += 1;
    }

    Ok(rows)
}

/// Resolve one column spec at `row`. Relative column 1 is the anchor column.
fn read_spec<S: Sheet + ?Sized>(
    sheet: &S,
    row: u32,
    anchor_col: u32,
    spec: &ColumnSpec,
    default_marker: Option<&str>,
) -> CellValue {
    let absolute = |rel: u32| anchor_col + rel.saturating_sub(1);

    match spec {
        ColumnSpec::Direct(col) => resolve(sheet, row, absolute(*col)),
        ColumnSpec::Coalesce {
            columns,
            priority_marker,
        } => {
            let values: Vec<CellValue> = columns
                .iter()
                .map(|c| resolve(sheet, row, absolute(*c)))
                .collect();
            coalesce(values, priority_marker.as_deref().or(default_marker))
        }
    }
}

/// Pass 1: first value containing `marker`. Pass 2: first non-blank value.
pub fn coalesce(values: Vec<CellValue>, marker: Option<&str>) -> CellValue {
    if let Some(marker) = marker.filter(|m| !m.is_empty()) {
        let marker = marker.to_lowercase();
        if let Some(hit) = values
            .iter()
            .find(|v| v.as_text().to_lowercase().contains(&marker))
        {
            return hit.clone();
        }
    }
    values
        .into_iter()
        .find(|v| !v.is_blank())
        .unwrap_or_default()
}

fn should_stop(policy: &StopPolicy, row: &RawAttendanceRow) -> bool {
    match policy {
        StopPolicy::MarkerText { index, text } => {
            !text.is_empty() && row.get(Some(*index)).as_text().contains(text.as_str())
        }
        StopPolicy::EmptyDate { index } => row.get(Some(*index)).is_blank(),
        StopPolicy::NonDate { index } => {
            let v = row.get(Some(*index));
            !v.is_blank() && !looks_like_date(v)
        }
    }
}

/// Real dates, serial numbers and day labels ("1.", "01.02.2025") all count.
fn looks_like_date(v: &CellValue) -> bool {
    match v {
        CellValue::Date(_) | CellValue::Number(_) => true,
        CellValue::Text(s) => {
            let s = s.trim();
            !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '/' || c == '-')
                && s.chars().any(|c| c.is_ascii_digit())
        }
        CellValue::Empty | CellValue::Time(_) => false,
    }
}
