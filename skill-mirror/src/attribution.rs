//! Provenance metadata for a mirror run.
//!
//! Records are accumulated in sync order and written once, as a fresh
//! `ATTRIBUTION.json`, at the end of the run. Prior documents are never merged.

use crate::config::Provenance;
use crate::error::{MirrorError, MirrorResult};
use crate::locate::slash_path;
use crate::model::{Attribution, SkillRecord};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

/// Category used for skills copied by the supplemental plugin pass.
pub const PLUGINS_CATEGORY: &str = "plugins";

/// Category used when the organizational tree is missing.
pub const ROOT_CATEGORY: &str = "root";

impl SkillRecord {
    /// Record for a skill placed by the structure-preserving walk.
    ///
    /// Top-level placements have no parent segment and get `.` as category.
    pub fn structured(relative_path: &Path, name: &str, source: Option<&Path>) -> Self {
        let category = relative_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(slash_path)
            .unwrap_or_else(|| ".".to_string());

        Self {
            path: slash_path(relative_path),
            name: name.to_string(),
            category,
            source: source.map(slash_path),
        }
    }

    pub fn plugin(name: &str, source: Option<&Path>) -> Self {
        Self {
            path: format!("{PLUGINS_CATEGORY}/{name}"),
            name: name.to_string(),
            category: PLUGINS_CATEGORY.to_string(),
            source: source.map(slash_path),
        }
    }

    pub fn flat(name: &str) -> Self {
        Self {
            path: name.to_string(),
            name: name.to_string(),
            category: ROOT_CATEGORY.to_string(),
            source: None,
        }
    }
}

/// Ordered collection of per-skill records.
#[derive(Debug, Clone, Default)]
pub struct AttributionRecorder {
    records: Vec<SkillRecord>,
}

impl AttributionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: SkillRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Names recorded so far.
    pub fn names(&self) -> HashSet<String> {
        self.records.iter().map(|record| record.name.clone()).collect()
    }

    pub fn document(&self, provenance: &Provenance) -> Attribution {
        Attribution {
            source: provenance.source_id.clone(),
            repository: provenance.source_url.clone(),
            license: provenance.license.clone(),
            synced_skills: self.records.len(),
            skills: self.records.clone(),
            note: provenance.note.clone(),
        }
    }

    /// Serialize the document (2-space indent) to `path`, replacing any existing file.
    pub fn write(&self, provenance: &Provenance, path: &Path) -> MirrorResult<Attribution> {
        let document = self.document(provenance);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| MirrorError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(&document)?;
        fs::write(path, json).map_err(|e| MirrorError::io(path, e))?;
        info!(path = %path.display(), skills = document.synced_skills, "attribution written");
        Ok(document)
    }

    pub fn into_records(self) -> Vec<SkillRecord> {
        self.records
    }
}
