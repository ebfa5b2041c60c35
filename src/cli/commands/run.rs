use crate::cli::commands::map::print_mapping;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::artifact::{self, SheetOverridesMap};
use crate::core::pipeline::{PipelineLogic, RunOptions};
use crate::errors::AppResult;
use crate::models::report::{RunReport, SheetStatus};
use crate::ui::messages::{header, info, success, warning};
use crate::utils::table::Table;
use std::fs;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Run {
        source,
        target,
        dry_run,
        month,
        year,
        activity_mode,
        activities,
        metadata,
        mapping,
        save_mapping,
        clean_target,
        sort_target,
        output_policy,
        output_dir,
        report,
    } = cmd
    {
        // 1️⃣ command line wins over the configuration file
        let mut cfg = cfg.clone();
        if let Some(mode) = activity_mode {
            cfg.activity_mode = *mode;
        }
        if let Some(policy) = output_policy {
            cfg.output_policy = *policy;
        }
        if let Some(dir) = output_dir {
            cfg.output_dir = dir.to_string_lossy().to_string();
        }

        // 2️⃣ stored mapping and overrides
        let stored = mapping.as_deref().map(artifact::load_artifact).transpose()?;
        let mut overrides = stored
            .as_ref()
            .map(SheetOverridesMap::from_artifact)
            .unwrap_or_default();
        if let Some(path) = activities {
            overrides.load_activities(path)?;
        }
        if let Some(path) = metadata {
            overrides.load_metadata(path)?;
        }

        let opts = RunOptions {
            dry_run: *dry_run,
            clean_target: *clean_target,
            sort_target: *sort_target,
            period: (*year).zip(*month),
            stored_mapping: stored,
            save_mapping: save_mapping.as_ref().map(|p| {
                p.clone()
                    .unwrap_or_else(|| artifact::default_mapping_path(&cfg.output_path()))
            }),
            overrides,
        };

        // 3️⃣ run
        let run_report = PipelineLogic::new(&cfg).run_files(source, target, &opts)?;

        print_mapping(
            &run_report.mapping,
            &run_report.unmatched_source,
            &run_report.unmatched_target,
        );
        print_outcomes(&run_report);

        if let Some(path) = report {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, serde_json::to_string_pretty(&run_report)?)?;
            info(format!("Report written to {}", path.display()));
        }
    }
    Ok(())
}

fn print_outcomes(report: &RunReport) {
    header("Processing summary");

    let mut table = Table::with_headers(&[
        "Source", "Target", "Extracted", "Rows", "Days", "Total", "Status",
    ]);
    for o in &report.outcomes {
        let (days, total) = match &o.metrics {
            Some(m) => (m.working_day_count.to_string(), m.total_duration.clone()),
            None => ("-".to_string(), "-".to_string()),
        };
        let status = match &o.status {
            SheetStatus::Written { created: true } => "written (new sheet)".to_string(),
            SheetStatus::Written { created: false } => "written".to_string(),
            SheetStatus::DryRun => "dry-run".to_string(),
            SheetStatus::Failed { reason } => format!("failed: {reason}"),
        };
        table.add_row(vec![
            o.source_sheet.clone(),
            o.target_sheet.clone(),
            o.rows_extracted.to_string(),
            o.rows_transformed.to_string(),
            days,
            total,
            status,
        ]);
    }
    print!("{}", table.render());

    for o in &report.outcomes {
        for d in &o.diagnostics {
            warning(format!("{}: {}", o.source_sheet, d));
        }
        if let Some(m) = &o.metrics
            && !m.day_count_written
            && !report.dry_run
        {
            warning(format!(
                "{}: day count cell not empty, left untouched",
                o.target_sheet
            ));
        }
    }

    if let Some(b) = &report.backup {
        info(format!("Backup: {}", b.display()));
    }
    if let Some(m) = &report.mapping_file {
        info(format!("Mapping JSON: {}", m.display()));
    }

    let failures = report.failures();
    if failures > 0 {
        warning(format!("{} sheet pair(s) failed", failures));
    }

    if report.dry_run {
        success("Dry-run completed (no modifications written).");
    } else {
        for p in &report.saved_to {
            success(format!("Workbook saved: {}", p.display()));
        }
    }
}
