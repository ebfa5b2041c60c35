// src/workbook/excel_date.rs

use super::CellValue;
use chrono::{Duration, NaiveDate};

/// What kind of value a number format code renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Plain,
    Date,
    Time,
}

/// Classify an Excel number format code ("d.m.yyyy", "[h]:mm:ss", "0.00", ...).
pub fn classify_format(code: &str) -> NumberKind {
    // drop quoted literals and [..] sections except elapsed-time markers
    let mut cleaned = String::with_capacity(code.len());
    let mut in_quote = false;
    let mut in_bracket = false;
    for c in code.chars() {
        match c {
            '"' => in_quote = !in_quote,
            '[' if !in_quote => in_bracket = true,
            ']' if !in_quote => in_bracket = false,
            _ if in_quote => {}
            'h' | 'H' | 'm' | 'M' | 's' | 'S' if in_bracket => cleaned.push(c.to_ascii_lowercase()),
            _ if in_bracket => {}
            _ => cleaned.push(c.to_ascii_lowercase()),
        }
    }

    if cleaned.contains('y') || cleaned.contains('d') {
        NumberKind::Date
    } else if cleaned.contains('h') || cleaned.contains('s') || cleaned.contains("m:") {
        NumberKind::Time
    } else {
        NumberKind::Plain
    }
}

/// Turn a numeric cell into a typed value according to its format code.
pub fn number_to_cell_value(n: f64, format_code: Option<&str>) -> CellValue {
    match format_code.map(classify_format).unwrap_or(NumberKind::Plain) {
        NumberKind::Date => serial_to_date(n)
            .map(CellValue::Date)
            .unwrap_or(CellValue::Number(n)),
        NumberKind::Time => CellValue::Time(serial_to_seconds(n)),
        NumberKind::Plain => CellValue::Number(n),
    }
}

/// Excel serial (1900 system) → calendar date, ignoring the time part.
pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let excel_epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    excel_epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// Fraction-of-day serial → whole seconds (durations may exceed one day).
pub fn serial_to_seconds(serial: f64) -> i64 {
    if !serial.is_finite() || serial <= 0.0 {
        return 0;
    }
    (serial * 86400.0).round() as i64
}

pub fn date_to_serial(d: NaiveDate) -> f64 {
    let excel_epoch = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default();
    (d - excel_epoch).num_days() as f64
}
