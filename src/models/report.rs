use super::mapping::SheetMapping;
use super::record::ParseDiagnostic;
use serde::Serialize;
use std::path::PathBuf;

/// Summary written under the daily block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryMetrics {
    pub working_day_count: usize,
    pub total_duration: String,
    /// `false` when the day-count cell held foreign content and was left alone.
    pub day_count_written: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetStatus {
    Written { created: bool },
    DryRun,
    Failed { reason: String },
}

/// What happened to one source → target pair.
#[derive(Debug, Clone, Serialize)]
pub struct SheetOutcome {
    pub source_sheet: String,
    pub target_sheet: String,
    pub rows_extracted: usize,
    pub rows_transformed: usize,
    pub metrics: Option<SummaryMetrics>,
    pub diagnostics: Vec<ParseDiagnostic>,
    #[serde(flatten)]
    pub status: SheetStatus,
}

impl SheetOutcome {
    pub fn failed(source: &str, target: &str, reason: String) -> Self {
        Self {
            source_sheet: source.to_string(),
            target_sheet: target.to_string(),
            rows_extracted: 0,
            rows_transformed: 0,
            metrics: None,
            diagnostics: Vec::new(),
            status: SheetStatus::Failed { reason },
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, SheetStatus::Failed { .. })
    }
}

/// Result of a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub mapping: SheetMapping,
    pub outcomes: Vec<SheetOutcome>,
    pub unmatched_source: Vec<String>,
    pub unmatched_target: Vec<String>,
    pub dry_run: bool,
    pub backup: Option<PathBuf>,
    pub saved_to: Vec<PathBuf>,
    pub mapping_file: Option<PathBuf>,
}

impl RunReport {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }
}
