pub mod activity;
pub mod mapping;
pub mod profile;
pub mod raw_row;
pub mod record;
pub mod report;

pub use activity::{ActivityMode, OutputPolicy};
pub use mapping::{MappingArtifact, MatchResult, SheetMapping, SheetMetadata, SheetOverrides};
pub use profile::{ColumnSpec, ExtractionProfile, FieldLayout, ProfileOverride, RowStart, StopPolicy};
pub use raw_row::RawAttendanceRow;
pub use record::{DayClass, ParseDiagnostic, TargetField, TargetRecord};
pub use report::{RunReport, SheetOutcome, SheetStatus, SummaryMetrics};
