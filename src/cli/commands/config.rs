// src/cli/commands/config.rs

use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success, warning};
use std::env;
use std::path::Path;
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config, path: &Path) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        print_path,
        check,
        edit_config,
        editor,
    } = cmd
    {
        if *print_path {
            println!("{}", path.display());
        }

        if *print_config {
            println!("📄 Current configuration ({}):\n", path.display());
            println!("{}", serde_yaml::to_string(cfg)?);
        }

        // the file was already parsed and validated when it was loaded
        if *check {
            if path.exists() {
                success(format!("Configuration is valid: {}", path.display()));
            } else {
                info(format!("No configuration at {}, defaults in use", path.display()));
            }
        }

        if *edit_config {
            if !path.exists() {
                Config::write_default(path)?;
            }
            edit(path, editor.as_deref());
        }
    }

    Ok(())
}

/// `$EDITOR`, then `$VISUAL`, then nano (notepad on Windows).
fn default_editor() -> String {
    env::var("EDITOR")
        .or_else(|_| env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(target_os = "windows") {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        })
}

fn run_editor(editor: &str, path: &Path) -> bool {
    Command::new(editor)
        .arg(path)
        .status()
        .is_ok_and(|s| s.success())
}

/// Open `path` in the requested editor, falling back to the default one.
fn edit(path: &Path, requested: Option<&str>) {
    let fallback = default_editor();
    let first = requested.map(str::to_string).unwrap_or_else(|| fallback.clone());

    if run_editor(&first, path) {
        success(format!("Configuration edited with '{}'", first));
        return;
    }
    if first == fallback {
        error(format!("Failed to run editor '{}'", first));
        return;
    }

    warning(format!(
        "Editor '{}' not available, falling back to '{}'",
        first, fallback
    ));
    if run_editor(&fallback, path) {
        success(format!("Configuration edited with '{}'", fallback));
    } else {
        error(format!("Failed to run fallback editor '{}'", fallback));
    }
}
