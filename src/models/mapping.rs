use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Marker for "no target match".
pub const UNMATCHED: &str = "-";

/// Source sheet → target sheet, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SheetMapping {
    pub entries: Vec<(String, Option<String>)>,
}

impl SheetMapping {
    pub fn insert(&mut self, source: &str, target: Option<String>) {
        self.entries.push((source.to_string(), target));
    }

    pub fn target_of(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(s, _)| s == source)
            .and_then(|(_, t)| t.as_deref())
    }

    /// Pairs with an actual target, in source order.
    pub fn matched(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(s, t)| t.as_deref().map(|t| (s.as_str(), t)))
    }

    pub fn matched_count(&self) -> usize {
        self.matched().count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flat `source → target|-` map, as stored in the audit artifact.
    pub fn to_flat_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(s, t)| {
                (
                    s.clone(),
                    t.clone().unwrap_or_else(|| UNMATCHED.to_string()),
                )
            })
            .collect()
    }
}

/// Output of the sheet name matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub mapping: SheetMapping,
    pub unmatched_source: Vec<String>,
    pub unmatched_target: Vec<String>,
}

/// Per-sheet metadata overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetMetadata {
    pub work_location: Option<String>,
    pub vacation_label: Option<String>,
}

/// Everything a caller may override for a single sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetOverrides {
    pub activity: Option<String>,
    pub metadata: SheetMetadata,
}

/// Persisted audit record of one mapping run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingArtifact {
    pub generated_at: String,
    pub mapping: BTreeMap<String, String>,
    #[serde(default)]
    pub unmatched_source: Vec<String>,
    #[serde(default)]
    pub unmatched_target: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub activities: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, SheetMetadata>,
}
