use crate::utils::time::ZERO_DURATION;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of day slots in every labor report block.
pub const DAY_SLOTS: usize = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayClass {
    Work,
    Vacation,
    AbsentOrWeekend,
}

impl fmt::Display for DayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DayClass::Work => "work",
            DayClass::Vacation => "vacation",
            DayClass::AbsentOrWeekend => "absent",
        };
        f.write_str(s)
    }
}

/// The 11 columns of a labor report day row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetField {
    Date,
    Start,
    End,
    Break,
    Description,
    Worked,
    Location,
    ProjectHours,
    SolutionHours,
    OutsideProjectHours,
    Total,
}

impl TargetField {
    pub const ALL: [TargetField; 11] = [
        TargetField::Date,
        TargetField::Start,
        TargetField::End,
        TargetField::Break,
        TargetField::Description,
        TargetField::Worked,
        TargetField::Location,
        TargetField::ProjectHours,
        TargetField::SolutionHours,
        TargetField::OutsideProjectHours,
        TargetField::Total,
    ];

    /// Header used in CSV/JSON exports.
    pub fn header(&self) -> &'static str {
        match self {
            TargetField::Date => "Datum",
            TargetField::Start => "Cas_Vykonu_Od",
            TargetField::End => "Cas_Vykonu_Do",
            TargetField::Break => "Prestavka_Trvanie",
            TargetField::Description => "Popis_Cinnosti",
            TargetField::Worked => "Pocet_Odpracovanych_Hodin",
            TargetField::Location => "Miesto_Vykonu",
            TargetField::ProjectHours => "PH_Projekt_POO",
            TargetField::SolutionHours => "PH_Riesenie_POO",
            TargetField::OutsideProjectHours => "PH_Mimo_Projekt_POO",
            TargetField::Total => "SPOLU",
        }
    }
}

impl fmt::Display for TargetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// One day row of the labor report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetRecord {
    pub date_label: String,
    pub start: String,
    pub end: String,
    pub break_duration: String,
    pub description: String,
    pub worked: String,
    pub location: String,
    pub project_hours: String,
    pub solution_hours: String,
    pub outside_project_hours: String,
    pub total: String,
    #[serde(skip)]
    pub class: DayClass,
}

impl TargetRecord {
    /// Blank/zero row for slot `index` (0-based).
    pub fn absent(index: usize) -> Self {
        Self {
            date_label: day_label(index),
            start: String::new(),
            end: String::new(),
            break_duration: ZERO_DURATION.to_string(),
            description: String::new(),
            worked: ZERO_DURATION.to_string(),
            location: String::new(),
            project_hours: ZERO_DURATION.to_string(),
            solution_hours: ZERO_DURATION.to_string(),
            outside_project_hours: ZERO_DURATION.to_string(),
            total: ZERO_DURATION.to_string(),
            class: DayClass::AbsentOrWeekend,
        }
    }

    pub fn field(&self, field: TargetField) -> &str {
        match field {
            TargetField::Date => &self.date_label,
            TargetField::Start => &self.start,
            TargetField::End => &self.end,
            TargetField::Break => &self.break_duration,
            TargetField::Description => &self.description,
            TargetField::Worked => &self.worked,
            TargetField::Location => &self.location,
            TargetField::ProjectHours => &self.project_hours,
            TargetField::SolutionHours => &self.solution_hours,
            TargetField::OutsideProjectHours => &self.outside_project_hours,
            TargetField::Total => &self.total,
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        TargetField::ALL
            .iter()
            .map(|f| self.field(*f).to_string())
            .collect()
    }
}

/// Ordinal label written into the date column: "1.", "2.", ...
pub fn day_label(index: usize) -> String {
    format!("{}.", index + 1)
}

/// A value that could not be parsed and was replaced by a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseDiagnostic {
    /// 1-based day.
    pub day: usize,
    pub field: TargetField,
    pub raw: String,
    pub fallback: String,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day {}: {} '{}' unparsable, using '{}'",
            self.day, self.field, self.raw, self.fallback
        )
    }
}
