use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a work day's description is filled when the source has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ActivityMode {
    /// Sheet label with the academic title removed.
    #[default]
    Infer,
    /// Configured static text ("Aktivita").
    Static,
    /// Leave blank.
    None,
}

impl fmt::Display for ActivityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActivityMode::Infer => "infer",
            ActivityMode::Static => "static",
            ActivityMode::None => "none",
        };
        f.write_str(s)
    }
}

/// Where the updated target workbook is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputPolicy {
    /// Replace the target file in place.
    Overwrite,
    /// `<output_dir>/<stem>_<YYYYmmdd_HHMMSS>.xlsx`.
    #[default]
    Versioned,
    /// Both of the above.
    Both,
}

impl fmt::Display for OutputPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutputPolicy::Overwrite => "overwrite",
            OutputPolicy::Versioned => "versioned",
            OutputPolicy::Both => "both",
        };
        f.write_str(s)
    }
}
