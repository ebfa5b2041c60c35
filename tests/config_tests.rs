use std::fs;
use tempfile::TempDir;
use vykaz_sync::config::Config;
use vykaz_sync::errors::AppError;
use vykaz_sync::models::profile::ColumnSpec;
use vykaz_sync::models::{ActivityMode, OutputPolicy};

#[test]
fn missing_file_gives_defaults() {
    let tmp = TempDir::new().expect("tmp");
    let cfg = Config::load(Some(&tmp.path().join("absent.conf"))).expect("load");
    assert_eq!(cfg, Config::default());
    assert_eq!(cfg.output_policy, OutputPolicy::Versioned);
    assert_eq!(cfg.layout.end_row(), 56);
}

#[test]
fn written_default_loads_back() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("nested").join("vykaz-sync.conf");
    Config::write_default(&path).expect("write");
    assert_eq!(Config::load(Some(&path)).expect("load"), Config::default());
}

#[test]
fn partial_file_keeps_other_defaults() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("c.conf");
    fs::write(
        &path,
        "activity_mode: static\n\
         static_activity: Vývoj\n\
         output_policy: both\n\
         extraction:\n  \
           sheets:\n    \
             Ján Novák:\n      \
               columns: [1, 2, 3, [4, 5]]\n",
    )
    .expect("write");

    let cfg = Config::load(Some(&path)).expect("load");
    assert_eq!(cfg.activity_mode, ActivityMode::Static);
    assert_eq!(cfg.static_activity, "Vývoj");
    assert_eq!(cfg.output_policy, OutputPolicy::Both);
    assert_eq!(cfg.vacation_marker, "Dovolenka");

    let profile = cfg.extraction.source_for("Ján Novák");
    assert_eq!(profile.columns.len(), 4);
    assert_eq!(
        profile.columns[3],
        ColumnSpec::Coalesce {
            columns: vec![4, 5],
            priority_marker: None
        }
    );
    // header search is inherited from the global source profile
    assert_eq!(profile.header_text.as_deref(), Some("Dátum"));
    assert_eq!(cfg.extraction.source_for("Iný").columns.len(), 7);
}

#[test]
fn invalid_values_are_rejected() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("c.conf");

    fs::write(&path, "vacation_default_duration: osem hodín\n").expect("write");
    assert!(matches!(Config::load(Some(&path)), Err(AppError::Config(_))));

    fs::write(&path, "fuzzy_cutoff: -0.1\n").expect("write");
    assert!(matches!(Config::load(Some(&path)), Err(AppError::Config(_))));

    fs::write(&path, "fuzzy_cutoff: [\n").expect("write");
    assert!(matches!(Config::load(Some(&path)), Err(AppError::Yaml(_))));
}

#[test]
fn backup_dir_defaults_under_output() {
    let mut cfg = Config {
        output_dir: "/tmp/vykaz".to_string(),
        ..Config::default()
    };
    assert_eq!(cfg.backup_path(), std::path::PathBuf::from("/tmp/vykaz/backup"));
    cfg.backup_dir = "/srv/zalohy".to_string();
    assert_eq!(cfg.backup_path(), std::path::PathBuf::from("/srv/zalohy"));
}
