// src/core/pipeline.rs

use crate::config::Config;
use crate::core::artifact::{self, SheetOverridesMap};
use crate::core::backup::BackupLogic;
use crate::core::extractor::extract;
use crate::core::matcher::{filter_instruction_sheets, match_sheets};
use crate::core::transformer::{TransformSettings, transform};
use crate::core::writer::{SheetWriterLogic, summarize};
use crate::errors::{AppError, AppResult};
use crate::models::mapping::{MappingArtifact, MatchResult};
use crate::models::report::{RunReport, SheetOutcome, SheetStatus};
use crate::models::OutputPolicy;
use crate::utils::path::sibling_xlsx;
use crate::workbook::{Workbook, XlsxWorkbook};
use chrono::Local;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Per-run switches on top of the configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub clean_target: bool,
    /// Reorder target sheets to follow the source sheet order.
    pub sort_target: bool,
    /// (year, month)
    pub period: Option<(i32, u32)>,
    /// Use this mapping instead of matching names again.
    pub stored_mapping: Option<MappingArtifact>,
    /// Write the audit artifact here.
    pub save_mapping: Option<PathBuf>,
    pub overrides: SheetOverridesMap,
}

pub struct PipelineLogic<'a> {
    cfg: &'a Config,
}

impl<'a> PipelineLogic<'a> {
    pub fn new(cfg: &'a Config) -> Self {
        Self { cfg }
    }

    // ---------------------------
    // Mapping
    // ---------------------------

    /// Source sheets minus instruction sheets, paired with target sheets.
    /// Empty source or target lists are fatal.
    pub fn map_sheets(
        &self,
        source_names: &[String],
        target_names: &[String],
        stored: Option<&MappingArtifact>,
        paths: (&Path, &Path),
    ) -> AppResult<MatchResult> {
        let source = filter_instruction_sheets(source_names, &self.cfg.instruction_sheets);
        if source.is_empty() {
            return Err(AppError::NoSheets {
                role: "source",
                path: paths.0.to_path_buf(),
            });
        }
        if target_names.is_empty() {
            return Err(AppError::NoSheets {
                role: "target",
                path: paths.1.to_path_buf(),
            });
        }

        let result = match stored {
            Some(artifact) => artifact::result_from_artifact(artifact, &source, target_names),
            None => match_sheets(&source, target_names, self.cfg.fuzzy_cutoff),
        };

        log::info!(
            "positive mappings: {} | unmatched source: {} | unmatched target: {}",
            result.mapping.matched_count(),
            result.unmatched_source.len(),
            result.unmatched_target.len()
        );
        Ok(result)
    }

    /// Drop unmatched target sheets, always keeping at least one as template.
    pub fn clean_target<T: Workbook>(&self, target: &mut T, unmatched: &[String]) -> AppResult<Vec<String>> {
        let names = target.sheet_names();
        let mut to_remove: Vec<&String> = unmatched.iter().filter(|u| names.contains(u)).collect();
        if !to_remove.is_empty() && to_remove.len() == names.len() {
            let kept = to_remove.remove(0);
            log::info!("all target sheets unmatched, keeping '{}' as template", kept);
        }

        let mut removed = Vec::new();
        for name in to_remove {
            target.remove_sheet(name)?;
            removed.push(name.clone());
        }
        Ok(removed)
    }

    /// Reorder target sheets so matched ones follow the source order; the
    /// rest keep their relative order after them. Returns the new order.
    pub fn sort_target<T: Workbook>(&self, target: &mut T, result: &MatchResult) -> AppResult<Vec<String>> {
        let mut remaining = target.sheet_names();
        let mut ordered = Vec::with_capacity(remaining.len());
        for (_, tgt) in result.mapping.matched() {
            if let Some(pos) = remaining.iter().position(|n| n == tgt) {
                ordered.push(remaining.remove(pos));
            }
        }
        ordered.extend(remaining);

        for (i, name) in ordered.iter().enumerate() {
            target.move_sheet(name, i)?;
        }
        log::info!("target sheets sorted by source order");
        Ok(ordered)
    }

    // ---------------------------
    // Processing
    // ---------------------------

    /// Map, then extract → transform → write every matched pair into `target`.
    /// Nothing touches the filesystem here.
    pub fn execute<S: Workbook, T: Workbook>(
        &self,
        source: &S,
        target: &mut T,
        opts: &RunOptions,
        paths: (&Path, &Path),
    ) -> AppResult<RunReport> {
        let result = self.map_sheets(
            &source.sheet_names(),
            &target.sheet_names(),
            opts.stored_mapping.as_ref(),
            paths,
        )?;
        self.process(source, target, &result, opts)
    }

    /// Extract → transform → write every matched pair of `result`.
    /// A failing pair is recorded and skipped.
    pub fn process<S: Workbook, T: Workbook>(
        &self,
        source: &S,
        target: &mut T,
        result: &MatchResult,
        opts: &RunOptions,
    ) -> AppResult<RunReport> {
        if opts.clean_target && !result.unmatched_target.is_empty() {
            let removed = self.clean_target(target, &result.unmatched_target)?;
            log::info!("removed {} unmatched target sheet(s)", removed.len());
        }

        let mut report = RunReport {
            mapping: result.mapping.clone(),
            unmatched_source: result.unmatched_source.clone(),
            unmatched_target: result.unmatched_target.clone(),
            dry_run: opts.dry_run,
            ..Default::default()
        };

        for (src, tgt) in result.mapping.matched() {
            let outcome = match self.process_pair(source, target, src, tgt, opts) {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::error!("sheet '{}' → '{}' skipped: {}", src, tgt, e);
                    SheetOutcome::failed(src, tgt, e.to_string())
                }
            };
            report.outcomes.push(outcome);
        }

        if opts.sort_target && !opts.dry_run {
            self.sort_target(target, result)?;
        }

        Ok(report)
    }

    pub fn process_pair<S: Workbook, T: Workbook>(
        &self,
        source: &S,
        target: &mut T,
        src: &str,
        tgt: &str,
        opts: &RunOptions,
    ) -> AppResult<SheetOutcome> {
        // 1️⃣ extract
        let sheet = source
            .sheet(src)
            .ok_or_else(|| AppError::SheetNotFound(src.to_string()))?;
        let profile = self.cfg.extraction.source_for(src);
        let rows = extract(sheet, &profile, Some(&self.cfg.vacation_marker))?;
        log::info!("extracted {} row(s) from '{}'", rows.len(), src);

        // 2️⃣ transform
        let mut settings = TransformSettings::from_config(self.cfg, profile.fields.clone());
        settings.period = opts.period;
        let overrides = opts.overrides.for_sheet(src, tgt);
        let transformed = transform(&rows, src, &settings, &overrides);

        let mut outcome = SheetOutcome {
            source_sheet: src.to_string(),
            target_sheet: tgt.to_string(),
            rows_extracted: rows.len(),
            rows_transformed: transformed.records.len(),
            metrics: None,
            diagnostics: transformed.diagnostics,
            status: SheetStatus::DryRun,
        };

        if opts.dry_run {
            log::info!("dry-run: skipping write for sheet '{}'", tgt);
            outcome.metrics = Some(summarize(&transformed.records));
            return Ok(outcome);
        }

        // 3️⃣ prepare, write, summarize
        let writer = SheetWriterLogic::new(&self.cfg.layout, &self.cfg.instruction_sheets);
        let prepared = writer.prepare(target, tgt)?;
        let ws = target
            .sheet_mut(tgt)
            .ok_or_else(|| AppError::SheetNotFound(tgt.to_string()))?;
        writer.write_rows(ws, &transformed.records);
        writer.restore_merges(ws, &prepared);
        let metrics = writer.write_summary(ws, &transformed.records);
        log::info!(
            "summary for '{}': days={} total={}",
            tgt,
            metrics.working_day_count,
            metrics.total_duration
        );

        outcome.metrics = Some(metrics);
        outcome.status = SheetStatus::Written {
            created: prepared.created,
        };
        Ok(outcome)
    }

    // ---------------------------
    // File level
    // ---------------------------

    /// Whole run against `.xlsx` files: open, back up, process, save.
    pub fn run_files(&self, source_path: &Path, target_path: &Path, opts: &RunOptions) -> AppResult<RunReport> {
        // 1️⃣ open both workbooks and map sheets (fatal on failure)
        let source = XlsxWorkbook::open(source_path)?;
        let mut target = XlsxWorkbook::open(target_path)?;
        let result = self.map_sheets(
            &source.sheet_names(),
            &target.sheet_names(),
            opts.stored_mapping.as_ref(),
            (source_path, target_path),
        )?;

        // 2️⃣ backup before anything destructive
        let backup = if opts.dry_run {
            log::info!("dry-run: skipping target backup");
            None
        } else {
            Some(BackupLogic::backup(
                target_path,
                &self.cfg.backup_path(),
                self.cfg.compress_backup,
            )?)
        };

        // 3️⃣ process in memory
        let mut report = self.process(&source, &mut target, &result, opts)?;
        report.backup = backup.clone();

        // 4️⃣ audit artifact (written even on dry runs)
        if let Some(path) = &opts.save_mapping {
            artifact::save_artifact(&artifact::build_artifact(&result, &opts.overrides), path)?;
            report.mapping_file = Some(path.clone());
        }

        if opts.dry_run {
            log::info!("dry-run: no workbook changes saved");
            return Ok(report);
        }

        // 5️⃣ save by policy
        let effective = if opts.clean_target {
            let dir = target_path.parent().unwrap_or_else(|| Path::new("."));
            sibling_xlsx(dir, target_path, "_cleaned")
        } else {
            target_path.to_path_buf()
        };
        for dest in self.output_paths(&effective) {
            self.save_checked(&target, &dest, target_path, backup.as_deref())?;
            report.saved_to.push(dest);
        }

        Ok(report)
    }

    /// Destinations for the configured output policy.
    pub fn output_paths(&self, effective: &Path) -> Vec<PathBuf> {
        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let versioned = sibling_xlsx(&self.cfg.output_path(), effective, &format!("_{stamp}"));
        match self.cfg.output_policy {
            OutputPolicy::Overwrite => vec![effective.to_path_buf()],
            OutputPolicy::Versioned => vec![versioned],
            OutputPolicy::Both => vec![effective.to_path_buf(), versioned],
        }
    }

    /// Save with one retry on a lock; restore the original from the backup
    /// when a write over it fails.
    pub fn save_checked<W: Workbook>(
        &self,
        wb: &W,
        dest: &Path,
        original: &Path,
        backup: Option<&Path>,
    ) -> AppResult<()> {
        let delay = Duration::from_millis(self.cfg.lock_retry_delay_ms);
        match save_with_retry(wb, dest, delay) {
            Ok(()) => {
                log::info!("workbook saved: {}", dest.display());
                Ok(())
            }
            Err(AppError::FileLocked { path, .. }) => Err(AppError::FileLocked {
                path,
                backup: backup.map(Path::to_path_buf),
            }),
            Err(e) => {
                if dest == original
                    && let Some(b) = backup
                    && let Err(re) = BackupLogic::restore(b, original)
                {
                    log::error!("restore from {} failed: {}", b.display(), re);
                }
                Err(AppError::SaveFailed {
                    path: dest.to_path_buf(),
                    reason: e.to_string(),
                    backup: backup.map(Path::to_path_buf),
                })
            }
        }
    }
}

/// One retry after `delay` when the destination is locked.
pub fn save_with_retry<W: Workbook>(wb: &W, path: &Path, delay: Duration) -> AppResult<()> {
    match wb.save(path) {
        Err(AppError::Io(e)) if is_lock_error(&e) => {
            log::warn!(
                "{} is locked ({}), retrying in {} ms",
                path.display(),
                e,
                delay.as_millis()
            );
            thread::sleep(delay);
            match wb.save(path) {
                Err(AppError::Io(e)) if is_lock_error(&e) => Err(AppError::FileLocked {
                    path: path.to_path_buf(),
                    backup: None,
                }),
                other => other,
            }
        }
        other => other,
    }
}

/// Permission denied, or a Windows sharing/lock violation.
pub fn is_lock_error(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::PermissionDenied
        || (cfg!(windows) && matches!(e.raw_os_error(), Some(32) | Some(33)))
}
