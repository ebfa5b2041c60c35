// src/core/artifact.rs

use crate::core::matcher::normalize;
use crate::errors::{AppError, AppResult};
use crate::models::mapping::{MappingArtifact, MatchResult, SheetMetadata, SheetOverrides, UNMATCHED};
use chrono::{Local, SecondsFormat, Utc};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Default artifact location: `<output_dir>/mappings_runtime_<YYYYmmdd_HHMMSS>.json`.
pub fn default_mapping_path(output_dir: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    output_dir.join(format!("mappings_runtime_{stamp}.json"))
}

/// Build the audit record of one matching run.
pub fn build_artifact(result: &MatchResult, overrides: &SheetOverridesMap) -> MappingArtifact {
    MappingArtifact {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        mapping: result.mapping.to_flat_map(),
        unmatched_source: result.unmatched_source.clone(),
        unmatched_target: result.unmatched_target.clone(),
        activities: overrides.activities.clone(),
        metadata: overrides.metadata.clone(),
    }
}

pub fn save_artifact(artifact: &MappingArtifact, path: &Path) -> AppResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(artifact)?)?;
    log::info!("mapping saved to {}", path.display());
    Ok(())
}

pub fn load_artifact(path: &Path) -> AppResult<MappingArtifact> {
    let content = fs::read_to_string(path)?;
    let artifact: MappingArtifact = serde_json::from_str(&content)?;
    if artifact.mapping.is_empty() {
        return Err(AppError::Mapping(format!(
            "{} contains no sheet pairs",
            path.display()
        )));
    }
    Ok(artifact)
}

/// Re-create a match result from a stored artifact, keeping only source
/// sheets still present and targets that still exist or may be created.
/// A target already taken by an earlier source sheet leaves the later one
/// unmatched.
pub fn result_from_artifact(
    artifact: &MappingArtifact,
    source_sheets: &[String],
    target_sheets: &[String],
) -> MatchResult {
    let mut result = MatchResult::default();
    let mut used: HashSet<String> = HashSet::new();
    for src in source_sheets {
        let target = artifact
            .mapping
            .get(src)
            .filter(|t| t.as_str() != UNMATCHED)
            .filter(|t| {
                let free = used.insert(t.to_string());
                if !free {
                    log::warn!(
                        "stored mapping sends '{}' to '{}', already taken; left unmatched",
                        src,
                        t
                    );
                }
                free
            });
        match target {
            Some(t) => result.mapping.insert(src, Some(t.clone())),
            None => {
                result.mapping.insert(src, None);
                result.unmatched_source.push(src.clone());
            }
        }
    }
    result.unmatched_target = target_sheets
        .iter()
        .filter(|t| !result.mapping.matched().any(|(_, m)| m == t.as_str()))
        .cloned()
        .collect();
    result
}

/// Activity and metadata overrides, keyed by raw or normalized sheet name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetOverridesMap {
    pub activities: BTreeMap<String, String>,
    pub metadata: BTreeMap<String, SheetMetadata>,
}

impl SheetOverridesMap {
    pub fn from_artifact(artifact: &MappingArtifact) -> Self {
        Self {
            activities: artifact.activities.clone(),
            metadata: artifact.metadata.clone(),
        }
    }

    /// `{"sheet": "activity text"}` JSON file.
    pub fn load_activities(&mut self, path: &Path) -> AppResult<()> {
        let content = fs::read_to_string(path)?;
        let map: BTreeMap<String, String> = serde_json::from_str(&content)?;
        self.activities.extend(map);
        Ok(())
    }

    /// `{"sheet": {"work_location": "...", "vacation_label": "..."}}` JSON file.
    pub fn load_metadata(&mut self, path: &Path) -> AppResult<()> {
        let content = fs::read_to_string(path)?;
        let map: BTreeMap<String, SheetMetadata> = serde_json::from_str(&content)?;
        self.metadata.extend(map);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty() && self.metadata.is_empty()
    }

    /// Overrides for one pair. Lookup order: raw source name, normalized
    /// source name, target name.
    pub fn for_sheet(&self, source: &str, target: &str) -> SheetOverrides {
        let keys = [source.to_string(), normalize(source), target.to_string()];
        let activity = keys.iter().find_map(|k| self.activities.get(k).cloned());
        let metadata = keys
            .iter()
            .find_map(|k| self.metadata.get(k).cloned())
            .unwrap_or_default();

        if activity.is_some() || metadata != SheetMetadata::default() {
            log::debug!("overrides found for '{}'", source);
        }
        SheetOverrides { activity, metadata }
    }
}
