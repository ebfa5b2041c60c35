use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::artifact::{self, SheetOverridesMap};
use crate::core::pipeline::PipelineLogic;
use crate::errors::AppResult;
use crate::models::mapping::{SheetMapping, UNMATCHED};
use crate::ui::messages::{header, info, success, warning};
use crate::utils::path::sibling_xlsx;
use crate::utils::table::Table;
use crate::workbook::{Workbook, XlsxWorkbook};
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Map {
        source,
        target,
        save_mapping,
        clean_target,
        sort_target,
    } = cmd
    {
        let src_wb = XlsxWorkbook::open(source)?;
        let mut tgt_wb = XlsxWorkbook::open(target)?;

        let logic = PipelineLogic::new(cfg);
        let result = logic.map_sheets(
            &src_wb.sheet_names(),
            &tgt_wb.sheet_names(),
            None,
            (source.as_path(), target.as_path()),
        )?;

        print_mapping(&result.mapping, &result.unmatched_source, &result.unmatched_target);

        if let Some(user_path) = save_mapping {
            let path = user_path
                .clone()
                .unwrap_or_else(|| artifact::default_mapping_path(&cfg.output_path()));
            let art = artifact::build_artifact(&result, &SheetOverridesMap::default());
            artifact::save_artifact(&art, &path)?;
            success(format!("Mapping JSON saved: {}", path.display()));
        }

        let dir = target.parent().unwrap_or_else(|| Path::new("."));

        // the cleaned copy below keeps this order too
        if *sort_target {
            let order = logic.sort_target(&mut tgt_wb, &result)?;
            let sorted = sibling_xlsx(dir, target, "_sorted");
            tgt_wb.save(&sorted)?;
            success(format!(
                "Sorted target saved to {} ({})",
                sorted.display(),
                order.join(", ")
            ));
        }

        if *clean_target {
            if result.unmatched_target.is_empty() {
                info("No unmatched target sheets, nothing to clean.");
            } else {
                let removed = logic.clean_target(&mut tgt_wb, &result.unmatched_target)?;
                let cleaned = sibling_xlsx(dir, target, "_cleaned");
                tgt_wb.save(&cleaned)?;
                success(format!(
                    "Cleaned target saved to {} ({} sheet(s) removed)",
                    cleaned.display(),
                    removed.len()
                ));
            }
        }
    }
    Ok(())
}

/// Print `source -> target` pairs and both unmatched lists.
pub(crate) fn print_mapping(mapping: &SheetMapping, unmatched_source: &[String], unmatched_target: &[String]) {
    header("Sheet mapping");

    let mut table = Table::with_headers(&["Source sheet", "Target sheet"]);
    for (src, tgt) in &mapping.entries {
        table.add_row(vec![src.clone(), tgt.clone().unwrap_or_else(|| UNMATCHED.to_string())]);
    }
    print!("{}", table.render());

    if !unmatched_source.is_empty() {
        warning(format!("Unmatched source sheets ({}):", unmatched_source.len()));
        for s in unmatched_source {
            println!("  {} -> {}", s, UNMATCHED);
        }
    }
    if !unmatched_target.is_empty() {
        warning(format!("Unmatched target sheets ({}):", unmatched_target.len()));
        for t in unmatched_target {
            println!("  {} -> {}", t, UNMATCHED);
        }
    }
}
