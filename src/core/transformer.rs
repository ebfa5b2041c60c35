//! Turn extracted rows into the 31 standardized day records of a labor report.

use crate::config::Config;
use crate::core::classifier::classify;
use crate::models::mapping::SheetOverrides;
use crate::models::profile::FieldLayout;
use crate::models::raw_row::RawAttendanceRow;
use crate::models::record::{DAY_SLOTS, DayClass, ParseDiagnostic, TargetField, TargetRecord, day_label};
use crate::models::ActivityMode;
use crate::utils::text::{is_placeholder, strip_title};
use crate::utils::time::{
    MAX_DURATION_SECS, ZERO_DURATION, format_hms, parse_hms, parse_time, scaled_secs, seconds_between,
};
use crate::workbook::CellValue;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Raw descriptions that are really stray numbers or times.
static NUMERIC_DESCRIPTION: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"^\d{1,2}[:.]\d{2}(:\d{2})?$").expect("valid time pattern"),
        Regex::new(r"^\d+(\.\d+)?$").expect("valid number pattern"),
    ]
});

/// Everything the transformer needs besides the rows themselves.
#[derive(Debug, Clone)]
pub struct TransformSettings {
    pub activity_mode: ActivityMode,
    pub static_activity: String,
    pub vacation_marker: String,
    pub vacation_label: String,
    pub vacation_default_duration: String,
    pub work_location: String,
    pub layout: FieldLayout,
    /// (year, month): slots past the month's last day are forced absent.
    pub period: Option<(i32, u32)>,
}

impl TransformSettings {
    pub fn from_config(cfg: &Config, layout: FieldLayout) -> Self {
        Self {
            activity_mode: cfg.activity_mode,
            static_activity: cfg.static_activity.clone(),
            vacation_marker: cfg.vacation_marker.clone(),
            vacation_label: cfg.vacation_label.clone(),
            vacation_default_duration: cfg.vacation_default_duration.clone(),
            work_location: cfg.work_location.clone(),
            layout,
            period: None,
        }
    }

    pub fn with_period(mut self, year: i32, month: u32) -> Self {
        self.period = Some((year, month));
        self
    }

    /// Days in the configured month, or all slots when no month is set.
    pub fn active_days(&self) -> usize {
        self.period
            .and_then(|(y, m)| days_in_month(y, m))
            .map(|d| d as usize)
            .unwrap_or(DAY_SLOTS)
    }
}

impl Default for TransformSettings {
    fn default() -> Self {
        Self::from_config(&Config::default(), FieldLayout::attendance())
    }
}

/// 31 records plus every value that had to be replaced by a default.
#[derive(Debug, Clone, Default)]
pub struct Transformed {
    pub records: Vec<TargetRecord>,
    pub diagnostics: Vec<ParseDiagnostic>,
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Build exactly 31 records. Extra rows are ignored, missing ones padded absent.
pub fn transform(
    raw_rows: &[RawAttendanceRow],
    sheet_label: &str,
    settings: &TransformSettings,
    overrides: &SheetOverrides,
) -> Transformed {
    let active_days = settings.active_days();
    let mode_activity = match settings.activity_mode {
        ActivityMode::Infer => strip_title(sheet_label).trim().to_string(),
        ActivityMode::Static => settings.static_activity.clone(),
        ActivityMode::None => String::new(),
    };

    let mut out = Transformed::default();
    for i in 0..DAY_SLOTS {
        let record = match raw_rows.get(i) {
            Some(raw) if i < active_days => {
                let mut ctx = RowContext {
                    day: i + 1,
                    raw,
                    settings,
                    overrides,
                    diagnostics: &mut out.diagnostics,
                };
                match classify(raw, &settings.layout, &settings.vacation_marker) {
                    DayClass::Vacation => ctx.vacation(),
                    DayClass::AbsentOrWeekend => TargetRecord::absent(i),
                    DayClass::Work => ctx.work(&mode_activity),
                }
            }
            _ => TargetRecord::absent(i),
        };
        out.records.push(record);
    }

    if !out.diagnostics.is_empty() {
        log::warn!(
            "'{}': {} value(s) replaced by defaults",
            sheet_label,
            out.diagnostics.len()
        );
    }
    out
}

struct RowContext<'a> {
    day: usize,
    raw: &'a RawAttendanceRow,
    settings: &'a TransformSettings,
    overrides: &'a SheetOverrides,
    diagnostics: &'a mut Vec<ParseDiagnostic>,
}

impl RowContext<'_> {
    fn value(&self, slot: Option<usize>) -> &CellValue {
        self.raw.get(slot)
    }

    fn vacation(&self) -> TargetRecord {
        let layout = &self.settings.layout;
        let worked = match duration_secs(self.value(layout.worked)) {
            Some(Ok(secs)) if secs > 0 => format_hms(secs),
            _ => self.settings.vacation_default_duration.clone(),
        };
        let label = self
            .overrides
            .metadata
            .vacation_label
            .clone()
            .unwrap_or_else(|| self.settings.vacation_label.clone());

        TargetRecord {
            description: label,
            worked: worked.clone(),
            total: worked,
            class: DayClass::Vacation,
            ..TargetRecord::absent(self.day - 1)
        }
    }

    fn work(&mut self, mode_activity: &str) -> TargetRecord {
        let layout = self.settings.layout.clone();

        // 1️⃣ times verbatim
        let start = text_or_blank(self.value(layout.arrival));
        let end = text_or_blank(self.value(layout.departure));

        // 2️⃣ break: minutes or a time-like value
        let break_secs = self.break_secs(layout.break_time);

        // 3️⃣ worked: end - start, else the raw duration, else zero
        let from_times = match (parse_time(&start), parse_time(&end)) {
            (Some(s), Some(e)) => seconds_between(s, e),
            _ => None,
        };
        let worked = match from_times {
            Some(secs) if secs > 0 => secs,
            _ => self.duration(TargetField::Worked, layout.worked),
        };

        // 4️⃣ description and location
        let description = self.description(layout.description, mode_activity);
        let location = self
            .overrides
            .metadata
            .work_location
            .clone()
            .or_else(|| Some(text_or_blank(self.value(layout.location))).filter(|s| !s.is_empty()))
            .unwrap_or_else(|| self.settings.work_location.clone());

        // 5️⃣ project buckets
        let project = self.duration(TargetField::ProjectHours, layout.project);
        let solution = self.duration(TargetField::SolutionHours, layout.solution);
        let outside = self.duration(TargetField::OutsideProjectHours, layout.outside_project);

        let worked = format_hms(worked);
        TargetRecord {
            date_label: day_label(self.day - 1),
            start,
            end,
            break_duration: format_hms(break_secs),
            description,
            worked: worked.clone(),
            location,
            project_hours: format_hms(project),
            solution_hours: format_hms(solution),
            outside_project_hours: format_hms(outside),
            total: worked,
            class: DayClass::Work,
        }
    }

    /// Override > raw description > activity mode. An override only replaces
    /// a raw description that is empty or just a stray number/time.
    fn description(&self, slot: Option<usize>, mode_activity: &str) -> String {
        let raw = text_or_blank(self.value(slot));
        let raw_is_noise = raw.is_empty() || NUMERIC_DESCRIPTION.iter().any(|re| re.is_match(&raw));

        match &self.overrides.activity {
            Some(activity) if raw_is_noise => activity.clone(),
            _ if !raw.is_empty() => raw,
            _ => mode_activity.to_string(),
        }
    }

    fn break_secs(&mut self, slot: Option<usize>) -> i64 {
        let v = self.value(slot).clone();
        let parsed = match &v {
            CellValue::Number(n) => Some(scaled_secs(*n, 60.0).ok_or(())),
            CellValue::Text(s) if !is_placeholder(s) => {
                let s = s.trim();
                match s.parse::<f64>() {
                    Ok(mins) => Some(scaled_secs(mins, 60.0).ok_or(())),
                    _ => Some(parse_hms(s).ok_or(())),
                }
            }
            other => duration_secs(other),
        };
        self.settle(TargetField::Break, &v, parsed)
    }

    fn duration(&mut self, field: TargetField, slot: Option<usize>) -> i64 {
        let v = self.value(slot).clone();
        let parsed = duration_secs(&v);
        self.settle(field, &v, parsed)
    }

    /// Blank → 0 silently; unparsable → 0 plus a diagnostic.
    fn settle(&mut self, field: TargetField, raw: &CellValue, parsed: Option<Result<i64, ()>>) -> i64 {
        match parsed {
            None => 0,
            Some(Ok(secs)) => secs,
            Some(Err(())) => {
                self.diagnostics.push(ParseDiagnostic {
                    day: self.day,
                    field,
                    raw: raw.as_text(),
                    fallback: ZERO_DURATION.to_string(),
                });
                0
            }
        }
    }
}

/// `None` for blank/placeholder cells, `Some(Err)` for unparsable ones.
fn duration_secs(v: &CellValue) -> Option<Result<i64, ()>> {
    match v {
        CellValue::Empty => None,
        CellValue::Time(secs) => Some((*secs <= MAX_DURATION_SECS).then_some(*secs).ok_or(())),
        // plain numbers in a duration column are fractions of a day
        CellValue::Number(n) => Some(scaled_secs(*n, 86_400.0).ok_or(())),
        CellValue::Text(s) if is_placeholder(s) => None,
        CellValue::Text(s) => Some(parse_hms(s).ok_or(())),
        CellValue::Date(_) => Some(Err(())),
    }
}

fn text_or_blank(v: &CellValue) -> String {
    let s = v.as_text();
    if is_placeholder(&s) {
        String::new()
    } else {
        s.trim().to_string()
    }
}
