//! Unified application error type.
//! All modules (workbook, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Serialization
    // ---------------------------
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Workbook errors
    // ---------------------------
    #[error("Workbook not found: {}", .0.display())]
    WorkbookNotFound(PathBuf),

    #[error("Cannot read workbook {}: {reason}", .path.display())]
    WorkbookUnreadable { path: PathBuf, reason: String },

    #[error("No sheets found in {role} workbook: {}", .path.display())]
    NoSheets { role: &'static str, path: PathBuf },

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("No template sheet available to create '{0}'")]
    NoTemplateSheet(String),

    #[error("Header '{header}' not found in sheet '{sheet}'")]
    HeaderNotFound { sheet: String, header: String },

    #[error("Workbook operation failed: {0}")]
    Workbook(String),

    // ---------------------------
    // Save errors
    // ---------------------------
    #[error("File is locked by another process: {}{}", .path.display(), backup_hint(.backup))]
    FileLocked {
        path: PathBuf,
        backup: Option<PathBuf>,
    },

    #[error("Failed to save {}: {reason}{}", .path.display(), backup_hint(.backup))]
    SaveFailed {
        path: PathBuf,
        reason: String,
        backup: Option<PathBuf>,
    },

    // ---------------------------
    // Mapping errors
    // ---------------------------
    #[error("Invalid sheet mapping: {0}")]
    Mapping(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

fn backup_hint(backup: &Option<PathBuf>) -> String {
    match backup {
        Some(p) => format!(" (backup available at {})", p.display()),
        None => String::new(),
    }
}

pub type AppResult<T> = Result<T, AppError>;
