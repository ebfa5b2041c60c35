// src/cli/commands/extract.rs

use crate::cli::parser::{Commands, ProfileKind};
use crate::config::Config;
use crate::core::extractor::extract;
use crate::core::matcher::filter_instruction_sheets;
use crate::errors::{AppError, AppResult};
use crate::models::profile::ExtractionProfile;
use crate::models::raw_row::RawAttendanceRow;
use crate::ui::messages::{error, info, success, warning};
use crate::utils::path::safe_file_name;
use crate::workbook::{Workbook, XlsxWorkbook};
use csv::Writer;
use std::fs;
use std::path::{Path, PathBuf};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Extract {
        file,
        profile,
        sheets,
        out_dir,
        prefix,
        no_header,
    } = cmd
    {
        let wb = XlsxWorkbook::open(file)?;

        // 1️⃣ which sheets
        let names = if sheets.is_empty() {
            filter_instruction_sheets(&wb.sheet_names(), &cfg.instruction_sheets)
        } else {
            sheets.clone()
        };
        if names.is_empty() {
            return Err(AppError::NoSheets {
                role: "input",
                path: file.clone(),
            });
        }

        fs::create_dir_all(out_dir)?;

        // 2️⃣ one CSV per sheet; a broken sheet does not stop the others
        let mut written = 0;
        for name in &names {
            let sheet_profile = match profile {
                ProfileKind::Source => cfg.extraction.source_for(name),
                ProfileKind::Target => cfg.extraction.target.clone(),
            };

            let result = wb
                .sheet(name)
                .ok_or_else(|| AppError::SheetNotFound(name.clone()))
                .and_then(|sheet| extract(sheet, &sheet_profile, Some(&cfg.vacation_marker)));

            match result {
                Ok(rows) => {
                    let path = csv_path(out_dir, prefix, name);
                    write_rows_csv(&path, &sheet_profile, &rows, !*no_header)?;
                    info(format!("{}: {} row(s) → {}", name, rows.len(), path.display()));
                    written += 1;
                }
                Err(e) => error(format!("{}: {}", name, e)),
            }
        }

        if written == names.len() {
            success(format!("Extracted {} sheet(s) into {}", written, out_dir.display()));
        } else {
            warning(format!(
                "Extracted {} of {} sheet(s) into {}",
                written,
                names.len(),
                out_dir.display()
            ));
        }
    }
    Ok(())
}

/// `<out_dir>/<prefix>_<safe sheet name>.csv`
pub fn csv_path(out_dir: &Path, prefix: &str, sheet: &str) -> PathBuf {
    out_dir.join(format!("{}_{}.csv", prefix, safe_file_name(sheet)))
}

/// Write extracted rows; the first column is the sheet row they came from.
pub fn write_rows_csv(
    path: &Path,
    profile: &ExtractionProfile,
    rows: &[RawAttendanceRow],
    with_header: bool,
) -> AppResult<()> {
    let mut wtr = Writer::from_path(path)?;

    if with_header {
        let mut head = vec!["row".to_string()];
        head.extend((0..profile.columns.len()).map(|i| {
            profile
                .fields
                .name_of(i)
                .map(str::to_string)
                .unwrap_or_else(|| format!("col_{}", i + 1))
        }));
        wtr.write_record(&head)?;
    }

    for row in rows {
        let mut record = vec![row.sheet_row.to_string()];
        record.extend(row.as_texts());
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
