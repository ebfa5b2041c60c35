//! Text helpers shared by the matcher and the transformer.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Academic titles stripped from the front of a person's sheet name.
pub const TITLE_PREFIXES: [&str; 7] = ["Ing.", "Bc.", "Mgr.", "PhD.", "prof.", "MUDr.", "RNDr."];

/// Values that mean "nothing here" in exported attendance logs.
const PLACEHOLDERS: [&str; 5] = ["", "-", "--", "nan", "none"];

/// Remove the first matching title prefix (followed by a space). Only one is removed.
pub fn strip_title(name: &str) -> &str {
    for prefix in TITLE_PREFIXES {
        if let Some(rest) = name.strip_prefix(prefix)
            && let Some(rest) = rest.strip_prefix(' ')
        {
            return rest;
        }
    }
    name
}

/// NFD-decompose and drop combining marks: "Ján Novák" → "Jan Novak".
pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

pub fn is_placeholder(s: &str) -> bool {
    let s = s.trim().to_lowercase();
    PLACEHOLDERS.contains(&s.as_str())
}
