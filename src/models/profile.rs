//! Extraction profile: which columns to read, where rows start and when to stop.

use serde::{Deserialize, Serialize};

/// One logical field of an extracted row.
///
/// In YAML a bare number is `Direct`, a list of numbers is a coalesce group:
///
/// ```yaml
/// columns: [1, 2, 3, 4, [5, 6, 7, 8], 9]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ColumnSpecRepr", into = "ColumnSpecRepr")]
pub enum ColumnSpec {
    /// Column relative to the anchor (1 = anchor column).
    Direct(u32),
    /// First member holding the priority marker, else the first non-blank member.
    Coalesce {
        columns: Vec<u32>,
        priority_marker: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ColumnSpecRepr {
    Direct(u32),
    Group(Vec<u32>),
    Detailed {
        columns: Vec<u32>,
        #[serde(default)]
        priority_marker: Option<String>,
    },
}

impl From<ColumnSpecRepr> for ColumnSpec {
    fn from(r: ColumnSpecRepr) -> Self {
        match r {
            ColumnSpecRepr::Direct(c) => ColumnSpec::Direct(c),
            ColumnSpecRepr::Group(columns) => ColumnSpec::Coalesce {
                columns,
                priority_marker: None,
            },
            ColumnSpecRepr::Detailed {
                columns,
                priority_marker,
            } => ColumnSpec::Coalesce {
                columns,
                priority_marker,
            },
        }
    }
}

impl From<ColumnSpec> for ColumnSpecRepr {
    fn from(c: ColumnSpec) -> Self {
        match c {
            ColumnSpec::Direct(c) => ColumnSpecRepr::Direct(c),
            ColumnSpec::Coalesce {
                columns,
                priority_marker: None,
            } => ColumnSpecRepr::Group(columns),
            ColumnSpec::Coalesce {
                columns,
                priority_marker,
            } => ColumnSpecRepr::Detailed {
                columns,
                priority_marker,
            },
        }
    }
}

/// Where data rows begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStart {
    OffsetFromHeader(u32),
    FixedRow(u32),
}

impl RowStart {
    pub fn start_row(&self, header_row: u32) -> u32 {
        match self {
            RowStart::OffsetFromHeader(n) => header_row + n,
            RowStart::FixedRow(n) => *n,
        }
    }
}

/// Caller-chosen stop rule, checked against every built row.
/// `index` is the 0-based position inside the extracted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopPolicy {
    /// Value at `index` contains `text` ("Spolu:", "Čestné vyhlásenie: ").
    MarkerText { index: usize, text: String },
    /// Value at `index` is blank.
    EmptyDate { index: usize },
    /// Value at `index` is present but not a date (a footer string, say).
    NonDate { index: usize },
}

/// Meaning of the positions inside an extracted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldLayout {
    pub date: Option<usize>,
    pub arrival: Option<usize>,
    pub departure: Option<usize>,
    #[serde(rename = "break")]
    pub break_time: Option<usize>,
    pub interruption_start: Option<usize>,
    pub interruption_end: Option<usize>,
    pub worked: Option<usize>,
    pub description: Option<usize>,
    pub location: Option<usize>,
    pub project: Option<usize>,
    pub solution: Option<usize>,
    pub outside_project: Option<usize>,
}

impl FieldLayout {
    /// Attendance log: date, arrival, departure, break, interruption from/to, worked.
    pub fn attendance() -> Self {
        Self {
            date: Some(0),
            arrival: Some(1),
            departure: Some(2),
            break_time: Some(3),
            interruption_start: Some(4),
            interruption_end: Some(5),
            worked: Some(6),
            ..Self::empty()
        }
    }

    /// Labor report block (11 target columns, description coalesced over 5–8).
    pub fn labor_report() -> Self {
        Self {
            date: Some(0),
            arrival: Some(1),
            departure: Some(2),
            break_time: Some(3),
            description: Some(4),
            worked: Some(5),
            location: Some(6),
            project: Some(7),
            solution: Some(8),
            outside_project: Some(9),
            ..Self::empty()
        }
    }

    pub fn empty() -> Self {
        Self {
            date: None,
            arrival: None,
            departure: None,
            break_time: None,
            interruption_start: None,
            interruption_end: None,
            worked: None,
            description: None,
            location: None,
            project: None,
            solution: None,
            outside_project: None,
        }
    }

    /// Field name at position `index`, used for CSV headers.
    pub fn name_of(&self, index: usize) -> Option<&'static str> {
        [
            (self.date, "date"),
            (self.arrival, "arrival"),
            (self.departure, "departure"),
            (self.break_time, "break"),
            (self.interruption_start, "interruption_start"),
            (self.interruption_end, "interruption_end"),
            (self.worked, "worked"),
            (self.description, "description"),
            (self.location, "location"),
            (self.project, "project"),
            (self.solution, "solution"),
            (self.outside_project, "outside_project"),
        ]
        .into_iter()
        .find(|(slot, _)| *slot == Some(index))
        .map(|(_, name)| name)
    }

    /// Positions that carry attendance data (the date label is not one of them).
    pub fn attendance_slots(&self) -> Vec<usize> {
        [
            self.arrival,
            self.departure,
            self.break_time,
            self.interruption_start,
            self.interruption_end,
            self.worked,
            self.description,
            self.location,
            self.project,
            self.solution,
            self.outside_project,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self::attendance()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionProfile {
    pub columns: Vec<ColumnSpec>,
    pub header_text: Option<String>,
    pub header_row_offset: u32,
    pub start_row: Option<RowStart>,
    pub stop: Vec<StopPolicy>,
    /// Fail the sheet when `header_text` is not found instead of using row 1 / column 1.
    pub require_header: bool,
    pub fields: FieldLayout,
}

impl ExtractionProfile {
    /// Source attendance log anchored on the "Dátum" header.
    pub fn attendance() -> Self {
        Self {
            columns: (1..=7).map(ColumnSpec::Direct).collect(),
            header_text: Some("Dátum".to_string()),
            header_row_offset: 2,
            start_row: None,
            stop: Vec::new(),
            require_header: false,
            fields: FieldLayout::attendance(),
        }
    }

    /// Already-filled labor report block (fixed row 26, stops on "Spolu:").
    pub fn labor_report() -> Self {
        let mut columns: Vec<ColumnSpec> = (1..=4).map(ColumnSpec::Direct).collect();
        columns.push(ColumnSpec::Coalesce {
            columns: vec![5, 6, 7, 8],
            priority_marker: None,
        });
        columns.extend((9..=14).map(ColumnSpec::Direct));

        Self {
            columns,
            header_text: None,
            header_row_offset: 1,
            start_row: Some(RowStart::FixedRow(26)),
            stop: vec![
                StopPolicy::MarkerText {
                    index: 4,
                    text: "Spolu:".to_string(),
                },
                StopPolicy::MarkerText {
                    index: 4,
                    text: "Čestné vyhlásenie: ".to_string(),
                },
            ],
            require_header: false,
            fields: FieldLayout::labor_report(),
        }
    }

    /// Effective start policy (explicit, or header row + offset).
    pub fn row_start(&self) -> RowStart {
        self.start_row
            .unwrap_or(RowStart::OffsetFromHeader(self.header_row_offset))
    }

    /// Apply a per-sheet override on top of this profile.
    pub fn merged_with(&self, o: &ProfileOverride) -> Self {
        let mut p = self.clone();
        if let Some(v) = &o.columns {
            p.columns = v.clone();
        }
        if let Some(v) = &o.header_text {
            p.header_text = Some(v.clone()).filter(|s| !s.is_empty());
        }
        if let Some(v) = o.header_row_offset {
            p.header_row_offset = v;
        }
        if let Some(v) = o.start_row {
            p.start_row = Some(v);
        }
        if let Some(v) = &o.stop {
            p.stop = v.clone();
        }
        if let Some(v) = o.require_header {
            p.require_header = v;
        }
        if let Some(v) = &o.fields {
            p.fields = v.clone();
        }
        p
    }
}

impl Default for ExtractionProfile {
    fn default() -> Self {
        Self::attendance()
    }
}

/// Per-sheet partial profile; unset fields inherit from the global profile.
/// An empty `header_text` clears the header search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOverride {
    pub columns: Option<Vec<ColumnSpec>>,
    pub header_text: Option<String>,
    pub header_row_offset: Option<u32>,
    pub start_row: Option<RowStart>,
    pub stop: Option<Vec<StopPolicy>>,
    pub require_header: Option<bool>,
    pub fields: Option<FieldLayout>,
}
