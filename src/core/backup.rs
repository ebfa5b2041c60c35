use crate::errors::{AppError, AppResult};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy `src` to `<dir>/backup_<YYYYmmdd_HHMMSS>.xlsx`, optionally zipped.
    /// A `_<n>` counter is appended when that name is already taken.
    /// Returns the path of the backup that was kept.
    pub fn backup(src: &Path, dir: &Path, compress: bool) -> AppResult<PathBuf> {
        // 1️⃣ Check workbook exists
        if !src.exists() {
            return Err(AppError::WorkbookNotFound(src.to_path_buf()));
        }

        // 2️⃣ Ensure destination folder exists
        fs::create_dir_all(dir)?;

        // 3️⃣ Copy workbook
        let dest = free_backup_path(dir, &Local::now().format("%Y%m%d_%H%M%S").to_string());
        fs::copy(src, &dest)?;
        log::info!("backup created: {}", dest.display());

        // 4️⃣ Optional compression
        if !compress {
            return Ok(dest);
        }

        let compressed = compress_backup(&dest)?;
        if let Err(e) = fs::remove_file(&dest) {
            log::warn!("failed to remove uncompressed backup {}: {}", dest.display(), e);
        }
        Ok(compressed)
    }

    /// Put the backed-up workbook back at `dest`.
    pub fn restore(backup: &Path, dest: &Path) -> AppResult<()> {
        let is_zip = backup
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("zip"));

        if is_zip {
            let file = fs::File::open(backup)?;
            let mut archive = zip::ZipArchive::new(file).map_err(std::io::Error::other)?;
            let mut entry = archive.by_index(0).map_err(std::io::Error::other)?;
            let mut out = fs::File::create(dest)?;
            std::io::copy(&mut entry, &mut out)?;
        } else {
            fs::copy(backup, dest)?;
        }

        log::info!("restored {} from {}", dest.display(), backup.display());
        Ok(())
    }
}

/// First `backup_<stamp>[_n].xlsx` whose `.xlsx` and `.zip` forms both don't exist.
fn free_backup_path(dir: &Path, stamp: &str) -> PathBuf {
    let taken = |p: &Path| p.exists() || p.with_extension("zip").exists();

    let first = dir.join(format!("backup_{stamp}.xlsx"));
    if !taken(&first) {
        return first;
    }
    (1u32..)
        .map(|n| dir.join(format!("backup_{stamp}_{n}.xlsx")))
        .find(|p| !taken(p))
        .unwrap_or(first)
}

/// Compress a backup using .zip
fn compress_backup(path: &Path) -> AppResult<PathBuf> {
    let zip_path = path.with_extension("zip");
    let file = fs::File::create(&zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let entry_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| AppError::Other(format!("invalid backup path {}", path.display())))?;

    let mut f = fs::File::open(path)?;
    zip.start_file(entry_name, options)
        .map_err(std::io::Error::other)?;

    std::io::copy(&mut f, &mut zip)?;
    zip.finish().map_err(std::io::Error::other)?;

    log::info!("compressed backup: {}", zip_path.display());

    Ok(zip_path)
}
