use crate::errors::{AppError, AppResult};
use crate::models::profile::{ExtractionProfile, ProfileOverride};
use crate::models::{ActivityMode, OutputPolicy};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed geometry of the labor report template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLayout {
    /// First day row of the daily block.
    pub start_row: u32,
    pub day_rows: u32,
    pub first_column: u32,
    pub last_column: u32,
    pub summary_row: u32,
    pub day_count_column: u32,
    pub total_column: u32,
    /// Columns the description is merged across on every day row.
    pub description_columns: (u32, u32),
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            start_row: 26,
            day_rows: 31,
            first_column: 1,
            last_column: 14,
            summary_row: 57,
            day_count_column: 13,
            total_column: 14,
            description_columns: (5, 8),
        }
    }
}

impl ReportLayout {
    pub fn end_row(&self) -> u32 {
        self.start_row + self.day_rows.saturating_sub(1)
    }
}

/// Extraction profiles for both workbook kinds plus per-sheet overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub source: ExtractionProfile,
    pub target: ExtractionProfile,
    /// Keyed by raw sheet name.
    pub sheets: BTreeMap<String, ProfileOverride>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            source: ExtractionProfile::attendance(),
            target: ExtractionProfile::labor_report(),
            sheets: BTreeMap::new(),
        }
    }
}

impl ExtractionConfig {
    /// Source profile for `sheet`, with its override applied when present.
    pub fn source_for(&self, sheet: &str) -> ExtractionProfile {
        match self.sheets.get(sheet) {
            Some(o) => self.source.merged_with(o),
            None => self.source.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: String,
    /// Empty → `<output_dir>/backup`.
    pub backup_dir: String,
    pub output_policy: OutputPolicy,
    pub compress_backup: bool,
    pub activity_mode: ActivityMode,
    pub static_activity: String,
    pub vacation_marker: String,
    pub vacation_label: String,
    pub vacation_default_duration: String,
    pub work_location: String,
    pub fuzzy_cutoff: f64,
    pub instruction_sheets: Vec<String>,
    pub lock_retry_delay_ms: u64,
    pub layout: ReportLayout,
    pub extraction: ExtractionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: "output".to_string(),
            backup_dir: String::new(),
            output_policy: OutputPolicy::Versioned,
            compress_backup: false,
            activity_mode: ActivityMode::Infer,
            static_activity: "Aktivita".to_string(),
            vacation_marker: "Dovolenka".to_string(),
            vacation_label: "DOVOLENKA".to_string(),
            vacation_default_duration: "08:00:00".to_string(),
            work_location: String::new(),
            fuzzy_cutoff: crate::core::matcher::DEFAULT_CUTOFF,
            instruction_sheets: vec![
                "Inštrukcie k vyplneniu PV".to_string(),
                "Instrukcie k vyplneniu PV".to_string(),
            ],
            lock_retry_delay_ms: 2000,
            layout: ReportLayout::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.vykaz-sync`)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vykaz-sync")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("vykaz-sync.conf")
    }

    /// Load configuration from `path` (or the default location).
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::config_file);

        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.validate()?;
        log::debug!("loaded config from {}", path.display());
        Ok(cfg)
    }

    /// Write the default configuration to `path`, creating parent folders.
    pub fn write_default(path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(&Self::default())?;
        fs::write(path, yaml)?;
        Ok(())
    }

    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=1.0).contains(&self.fuzzy_cutoff) {
            return Err(AppError::Config(format!(
                "fuzzy_cutoff must be between 0 and 1, got {}",
                self.fuzzy_cutoff
            )));
        }
        if crate::utils::time::parse_hms(&self.vacation_default_duration).is_none() {
            return Err(AppError::Config(format!(
                "vacation_default_duration '{}' is not HH:MM:SS",
                self.vacation_default_duration
            )));
        }
        if self.layout.day_rows == 0 || self.layout.first_column > self.layout.last_column {
            return Err(AppError::Config("invalid report layout".to_string()));
        }
        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        expand_tilde(&self.output_dir)
    }

    pub fn backup_path(&self) -> PathBuf {
        if self.backup_dir.trim().is_empty() {
            self.output_path().join("backup")
        } else {
            expand_tilde(&self.backup_dir)
        }
    }
}
