//! Day classification. Pure: the same row always yields the same class.

use crate::models::profile::FieldLayout;
use crate::models::raw_row::RawAttendanceRow;
use crate::models::record::DayClass;
use crate::utils::text::is_placeholder;
use crate::utils::time::parse_hms;
use crate::workbook::CellValue;

/// Classify one extracted row.
///
/// * Vacation: the arrival value or the whole description is the vacation
///   marker (case-insensitive). A description merely mentioning it is work.
/// * Absent/weekend: every attendance slot is blank, a placeholder ("-") or a
///   zero duration.
/// * Work: anything else.
pub fn classify(row: &RawAttendanceRow, layout: &FieldLayout, vacation_marker: &str) -> DayClass {
    let marker = vacation_marker.trim().to_lowercase();

    if !marker.is_empty() {
        let arrival = row.get(layout.arrival).as_text().trim().to_lowercase();
        let description = row.get(layout.description).as_text().trim().to_lowercase();
        if arrival == marker || description == marker {
            return DayClass::Vacation;
        }
    }

    let all_empty = layout
        .attendance_slots()
        .into_iter()
        .all(|i| is_empty_slot(row.get(Some(i))));
    if all_empty {
        DayClass::AbsentOrWeekend
    } else {
        DayClass::Work
    }
}

fn is_empty_slot(v: &CellValue) -> bool {
    match v {
        CellValue::Empty => true,
        CellValue::Text(s) => is_placeholder(s) || parse_hms(s) == Some(0),
        CellValue::Time(secs) => *secs == 0,
        CellValue::Number(n) => *n == 0.0,
        CellValue::Date(_) => false,
    }
}
