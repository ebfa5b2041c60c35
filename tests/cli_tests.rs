mod common;
use common::{report_cells, vs, write_fixture_pair, write_xlsx};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A config path that never exists, so every test runs on defaults.
fn no_config(dir: &Path) -> String {
    dir.join("none.conf").to_string_lossy().to_string()
}

fn files_in(dir: &Path) -> Vec<PathBuf> {
    match fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok().map(|e| e.path())).collect(),
        Err(_) => Vec::new(),
    }
}

fn cell(path: &Path, sheet: &str, row: u32, col: u32) -> String {
    let book = umya_spreadsheet::reader::xlsx::read(path).expect("read xlsx");
    book.get_sheet_by_name(sheet)
        .expect("sheet")
        .get_value((col, row))
}

#[test]
fn help_lists_the_commands() {
    vs().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("map"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("extract"));
}

#[test]
fn init_writes_the_default_config_once() {
    let tmp = TempDir::new().expect("tmp");
    let conf = tmp.path().join("conf").join("vykaz-sync.conf");
    let conf_arg = conf.to_string_lossy().to_string();

    vs().args(["--config", &conf_arg, "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config file"));
    let content = fs::read_to_string(&conf).expect("config written");
    assert!(content.contains("fuzzy_cutoff"));
    assert!(content.contains("Dovolenka"));

    vs().args(["--config", &conf_arg, "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    vs().args(["--config", &conf_arg, "config", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vacation_label: DOVOLENKA"));
}

#[test]
fn invalid_config_is_rejected() {
    let tmp = TempDir::new().expect("tmp");
    let conf = tmp.path().join("bad.conf");
    fs::write(&conf, "fuzzy_cutoff: 3.5\n").expect("write");
    let (source, target) = write_fixture_pair(tmp.path());

    vs().args(["--config", &conf.to_string_lossy()])
        .args(["map", "--source"])
        .arg(&source)
        .arg("--target")
        .arg(&target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("fuzzy_cutoff"));
}

#[test]
fn map_prints_pairs_and_saves_json() {
    let tmp = TempDir::new().expect("tmp");
    let (source, target) = write_fixture_pair(tmp.path());
    let json = tmp.path().join("mapping.json");

    vs().args(["--config", &no_config(tmp.path()), "map", "--source"])
        .arg(&source)
        .arg("--target")
        .arg(&target)
        .arg("--save-mapping")
        .arg(&json)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ing. Ján Novák"))
        .stdout(predicate::str::contains("Mgr. Peter Horak"))
        .stdout(predicate::str::contains("Unmatched target sheets (1)"))
        .stdout(predicate::str::contains("Extra -> -"));

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json).expect("json")).expect("parse");
    assert_eq!(saved["mapping"]["Ing. Ján Novák"], "Jan Novak");
    assert_eq!(saved["mapping"]["Peter Horák"], "Mgr. Peter Horak");
    assert_eq!(saved["unmatched_target"][0], "Extra");
    assert!(saved["generated_at"].is_string());
}

#[test]
fn map_clean_target_writes_a_copy() {
    let tmp = TempDir::new().expect("tmp");
    let (source, target) = write_fixture_pair(tmp.path());
    let before = fs::read(&target).expect("bytes");

    vs().args(["--config", &no_config(tmp.path()), "map", "--source"])
        .arg(&source)
        .arg("--target")
        .arg(&target)
        .arg("--clean-target")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 sheet(s) removed"));

    let cleaned = tmp.path().join("vykaz_cleaned.xlsx");
    let book = umya_spreadsheet::reader::xlsx::read(&cleaned).expect("cleaned");
    assert!(book.get_sheet_by_name("Extra").is_none());
    assert!(book.get_sheet_by_name("Jan Novak").is_some());
    assert_eq!(fs::read(&target).expect("bytes"), before);
}

fn sheet_order(path: &Path) -> Vec<String> {
    let book = umya_spreadsheet::reader::xlsx::read(path).expect("read xlsx");
    book.get_sheet_collection()
        .iter()
        .map(|ws| ws.get_name().to_string())
        .collect()
}

#[test]
fn map_sort_target_writes_a_sorted_copy() {
    let tmp = TempDir::new().expect("tmp");
    let (source, target) = write_fixture_pair(tmp.path());
    write_xlsx(
        &target,
        &[
            ("Extra", report_cells("Extra")),
            ("Mgr. Peter Horak", report_cells("Peter Horak")),
            ("Jan Novak", report_cells("Jan Novak")),
        ],
    );

    vs().args(["--config", &no_config(tmp.path()), "map", "--source"])
        .arg(&source)
        .arg("--target")
        .arg(&target)
        .arg("--sort-target")
        .assert()
        .success()
        .stdout(predicate::str::contains("vykaz_sorted.xlsx"));

    assert_eq!(
        sheet_order(&tmp.path().join("vykaz_sorted.xlsx")),
        vec!["Jan Novak", "Mgr. Peter Horak", "Extra"]
    );
    assert_eq!(sheet_order(&target), vec!["Extra", "Mgr. Peter Horak", "Jan Novak"]);
}

#[test]
fn dry_run_writes_nothing() {
    let tmp = TempDir::new().expect("tmp");
    let (source, target) = write_fixture_pair(tmp.path());
    let out = tmp.path().join("out");
    let before = fs::read(&target).expect("bytes");

    vs().args(["--config", &no_config(tmp.path()), "run", "--dry-run", "--source"])
        .arg(&source)
        .arg("--target")
        .arg(&target)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry-run completed"))
        .stdout(predicate::str::contains("160:00:00"));

    assert_eq!(fs::read(&target).expect("bytes"), before);
    assert!(files_in(&out.join("backup")).is_empty());
    assert!(files_in(&out).is_empty());
}

#[test]
fn run_overwrite_fills_the_target_and_keeps_a_backup() {
    let tmp = TempDir::new().expect("tmp");
    let (source, target) = write_fixture_pair(tmp.path());
    let out = tmp.path().join("out");
    let report = tmp.path().join("report.json");

    vs().args(["--config", &no_config(tmp.path()), "run", "--source"])
        .arg(&source)
        .arg("--target")
        .arg(&target)
        .args(["--output-policy", "overwrite", "--output-dir"])
        .arg(&out)
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Workbook saved"));

    assert_eq!(cell(&target, "Jan Novak", 26, 1), "1.");
    assert_eq!(cell(&target, "Jan Novak", 26, 5), "DOVOLENKA");
    assert_eq!(cell(&target, "Jan Novak", 57, 14), "160:00:00");
    assert_eq!(cell(&target, "Jan Novak", 57, 13), "20");
    assert_eq!(cell(&target, "Mgr. Peter Horak", 57, 14), "80:00:00");

    let backups = files_in(&out.join("backup"));
    assert_eq!(backups.len(), 1);
    let name = backups[0].file_name().expect("name").to_string_lossy().to_string();
    assert!(name.starts_with("backup_") && name.ends_with(".xlsx"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).expect("report")).expect("parse");
    assert_eq!(json["outcomes"].as_array().expect("outcomes").len(), 2);
    assert_eq!(json["outcomes"][0]["status"], "written");
    assert_eq!(json["dry_run"], false);
}

#[test]
fn run_versioned_keeps_the_original() {
    let tmp = TempDir::new().expect("tmp");
    let (source, target) = write_fixture_pair(tmp.path());
    let out = tmp.path().join("out");
    let before = fs::read(&target).expect("bytes");

    vs().args(["--config", &no_config(tmp.path()), "run", "--source"])
        .arg(&source)
        .arg("--target")
        .arg(&target)
        .arg("--output-dir")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(fs::read(&target).expect("bytes"), before);
    let versioned: Vec<PathBuf> = files_in(&out)
        .into_iter()
        .filter(|p| p.extension().is_some_and(|e| e == "xlsx"))
        .collect();
    assert_eq!(versioned.len(), 1);
    let name = versioned[0].file_name().expect("name").to_string_lossy().to_string();
    assert!(name.starts_with("vykaz_"));
    assert_eq!(cell(&versioned[0], "Jan Novak", 57, 14), "160:00:00");
}

#[test]
fn run_with_a_missing_source_fails() {
    let tmp = TempDir::new().expect("tmp");
    let (_, target) = write_fixture_pair(tmp.path());

    vs().args(["--config", &no_config(tmp.path()), "run", "--source"])
        .arg(tmp.path().join("nope.xlsx"))
        .arg("--target")
        .arg(&target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Workbook not found"));
}

#[test]
fn month_requires_year() {
    vs().args(["run", "--source", "a.xlsx", "--target", "b.xlsx", "--month", "2"])
        .assert()
        .failure();
}

#[test]
fn extract_writes_one_csv_per_sheet() {
    let tmp = TempDir::new().expect("tmp");
    let (source, _) = write_fixture_pair(tmp.path());
    let csv_dir = tmp.path().join("csv");

    vs().args(["--config", &no_config(tmp.path()), "extract", "--file"])
        .arg(&source)
        .arg("--out-dir")
        .arg(&csv_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted 2 sheet(s)"));

    let mut files = files_in(&csv_dir);
    files.sort();
    assert_eq!(files.len(), 2);

    let content = fs::read_to_string(&files[0]).expect("csv");
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("row,date,arrival,departure,break,interruption_start,interruption_end,worked")
    );
    assert_eq!(lines.count(), 31);
}
