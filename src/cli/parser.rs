use crate::models::{ActivityMode, OutputPolicy};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line interface definition for vykaz-sync
/// CLI application to fill monthly labor reports from attendance logs
#[derive(Parser)]
#[command(
    name = "vykaz-sync",
    version = env!("CARGO_PKG_VERSION"),
    about = "Transfer attendance logs into monthly labor report workbooks (.xlsx)",
    long_about = None
)]
pub struct Cli {
    /// Use this configuration file instead of ~/.vykaz-sync/vykaz-sync.conf
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which built-in extraction profile `extract` uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileKind {
    /// Attendance log (configured `extraction.source`)
    Source,
    /// Filled labor report (configured `extraction.target`)
    Target,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the default configuration file
    Init {
        #[arg(long, short = 'f', help = "Overwrite an existing configuration file")]
        force: bool,
    },

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "path", help = "Print the configuration file path")]
        print_path: bool,

        #[arg(long, help = "Validate the configuration file")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Match source sheets to target sheets and print the mapping
    Map {
        #[arg(long, value_name = "FILE", help = "Attendance workbook (.xlsx)")]
        source: PathBuf,

        #[arg(long, value_name = "FILE", help = "Labor report workbook (.xlsx)")]
        target: PathBuf,

        #[arg(
            long = "save-mapping",
            value_name = "FILE",
            num_args = 0..=1,
            help = "Save the mapping as JSON (default name in the output directory)"
        )]
        save_mapping: Option<Option<PathBuf>>,

        #[arg(
            long = "clean-target",
            help = "Save a <target>_cleaned.xlsx copy without unmatched target sheets"
        )]
        clean_target: bool,

        #[arg(
            long = "sort-target",
            help = "Save a <target>_sorted.xlsx copy with sheets in source order"
        )]
        sort_target: bool,
    },

    /// Fill the target workbook from the source workbook
    Run {
        #[arg(long, value_name = "FILE", help = "Attendance workbook (.xlsx)")]
        source: PathBuf,

        #[arg(long, value_name = "FILE", help = "Labor report workbook (.xlsx)")]
        target: PathBuf,

        #[arg(long = "dry-run", help = "Map, extract and transform without writing anything")]
        dry_run: bool,

        #[arg(
            long,
            value_parser = clap::value_parser!(u32).range(1..=12),
            requires = "year",
            help = "Month of the report (1-12); days past its end are left empty"
        )]
        month: Option<u32>,

        #[arg(long, requires = "month", help = "Year of the report")]
        year: Option<i32>,

        #[arg(long = "activity-mode", value_enum, help = "How empty descriptions are filled")]
        activity_mode: Option<ActivityMode>,

        #[arg(long, value_name = "FILE", help = "JSON map of sheet → activity text")]
        activities: Option<PathBuf>,

        #[arg(long, value_name = "FILE", help = "JSON map of sheet → metadata overrides")]
        metadata: Option<PathBuf>,

        #[arg(long, value_name = "FILE", help = "Reuse a saved mapping JSON")]
        mapping: Option<PathBuf>,

        #[arg(
            long = "save-mapping",
            value_name = "FILE",
            num_args = 0..=1,
            help = "Save the mapping as JSON (default name in the output directory)"
        )]
        save_mapping: Option<Option<PathBuf>>,

        #[arg(
            long = "clean-target",
            help = "Drop unmatched target sheets and save as <target>_cleaned.xlsx"
        )]
        clean_target: bool,

        #[arg(long = "sort-target", help = "Order target sheets like the source sheets")]
        sort_target: bool,

        #[arg(long = "output-policy", value_enum, help = "Where the updated workbook is saved")]
        output_policy: Option<OutputPolicy>,

        #[arg(long = "output-dir", value_name = "DIR", help = "Directory for versioned outputs and backups")]
        output_dir: Option<PathBuf>,

        #[arg(long, value_name = "FILE", help = "Write a JSON processing report")]
        report: Option<PathBuf>,
    },

    /// Dump extracted rows of every sheet to CSV files
    Extract {
        #[arg(long, value_name = "FILE", help = "Workbook to read (.xlsx)")]
        file: PathBuf,

        #[arg(long, value_enum, default_value = "source")]
        profile: ProfileKind,

        #[arg(long = "sheet", value_name = "NAME", help = "Only this sheet (repeatable)")]
        sheets: Vec<String>,

        #[arg(long = "out-dir", value_name = "DIR")]
        out_dir: PathBuf,

        #[arg(long, default_value = "extract", help = "CSV file name prefix")]
        prefix: String,

        #[arg(long = "no-header", help = "Do not write a header row")]
        no_header: bool,
    },
}
