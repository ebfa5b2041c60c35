use std::fs;
use tempfile::TempDir;
use vykaz_sync::core::backup::BackupLogic;
use vykaz_sync::errors::AppError;

fn original(tmp: &TempDir) -> std::path::PathBuf {
    let path = tmp.path().join("vykaz.xlsx");
    fs::write(&path, "pôvodný výkaz").expect("write");
    path
}

#[test]
fn restore_from_a_plain_backup() {
    let tmp = TempDir::new().expect("tmp");
    let target = original(&tmp);

    let backup = BackupLogic::backup(&target, &tmp.path().join("backups"), false).expect("backup");
    assert_eq!(backup.extension().and_then(|e| e.to_str()), Some("xlsx"));

    fs::write(&target, "poškodený").expect("overwrite");
    BackupLogic::restore(&backup, &target).expect("restore");
    assert_eq!(fs::read_to_string(&target).expect("read"), "pôvodný výkaz");
}

#[test]
fn restore_from_a_zipped_backup() {
    let tmp = TempDir::new().expect("tmp");
    let target = original(&tmp);
    let dir = tmp.path().join("backups");

    let backup = BackupLogic::backup(&target, &dir, true).expect("backup");
    assert_eq!(backup.extension().and_then(|e| e.to_str()), Some("zip"));
    // only the archive is kept
    assert_eq!(fs::read_dir(&dir).expect("dir").count(), 1);

    fs::write(&target, "poškodený").expect("overwrite");
    BackupLogic::restore(&backup, &target).expect("restore");
    assert_eq!(fs::read_to_string(&target).expect("read"), "pôvodný výkaz");
}

#[test]
fn backups_in_quick_succession_do_not_overwrite_each_other() {
    let tmp = TempDir::new().expect("tmp");
    let target = original(&tmp);
    let dir = tmp.path().join("backups");

    let first = BackupLogic::backup(&target, &dir, false).expect("first");
    fs::write(&target, "druhá verzia").expect("overwrite");
    let second = BackupLogic::backup(&target, &dir, false).expect("second");
    let third = BackupLogic::backup(&target, &dir, true).expect("third");

    assert_ne!(first, second);
    assert_ne!(first.with_extension("zip"), third);
    assert_ne!(second.with_extension("zip"), third);
    assert_eq!(fs::read_to_string(&first).expect("first"), "pôvodný výkaz");
    assert_eq!(fs::read_to_string(&second).expect("second"), "druhá verzia");
    assert!(third.exists());
}

#[test]
fn backup_of_a_missing_workbook_fails() {
    let tmp = TempDir::new().expect("tmp");
    let missing = tmp.path().join("nie.xlsx");
    assert!(matches!(
        BackupLogic::backup(&missing, tmp.path(), false),
        Err(AppError::WorkbookNotFound(_))
    ));
}
