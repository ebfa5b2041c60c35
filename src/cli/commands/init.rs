use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `init` command
///
/// Creates the config directory (if missing) and writes the default
/// configuration file. An existing file is kept unless `--force` is given.
pub fn handle(cli: &Cli) -> AppResult<()> {
    if let Commands::Init { force } = &cli.command {
        let path = cli.config.clone().unwrap_or_else(Config::config_file);

        if path.exists() && !*force {
            warning(format!(
                "Configuration already exists: {} (use --force to overwrite)",
                path.display()
            ));
            return Ok(());
        }

        info("⚙️  Initializing vykaz-sync…");
        Config::write_default(&path)?;
        success(format!("Config file: {}", path.display()));
    }
    Ok(())
}
