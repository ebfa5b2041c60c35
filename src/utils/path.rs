//! Path utilities: expand ~, build derived output file names.

use std::path::{Path, PathBuf};

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// File stem as a String ("report" for "/x/report.xlsx").
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "workbook".to_string())
}

/// `<dir>/<stem><suffix>.xlsx`
pub fn sibling_xlsx(dir: &Path, source: &Path, suffix: &str) -> PathBuf {
    dir.join(format!("{}{}.xlsx", file_stem(source), suffix))
}

/// Replace characters that are awkward in file names with `_`.
pub fn safe_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "sheet".to_string()
    } else {
        cleaned
    }
}
