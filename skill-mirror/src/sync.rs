//! The mirror pipeline: locate, copy, record.

use crate::attribution::{AttributionRecorder, PLUGINS_CATEGORY, ROOT_CATEGORY};
use crate::config::MirrorConfig;
use crate::copy::{SkillCopier, copy_documentation};
use crate::error::{MirrorError, MirrorResult};
use crate::fetch::{Fetcher, Snapshot};
use crate::locate::SkillLocator;
use crate::model::{Attribution, SkillPlacement, SkillRecord};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub synced: usize,
    pub records: Vec<SkillRecord>,
    pub output_root: PathBuf,
    /// Size of the flat primary + plugin union, for the summary line.
    pub discovered: usize,
    /// Whether the organizational tree was missing and the flat layout was used.
    pub flat_fallback: bool,
    pub attribution: Attribution,
}

impl SyncReport {
    /// Distinct first segments of every non-`root` category, sorted.
    pub fn top_level_categories(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|record| record.category != ROOT_CATEGORY)
            .filter_map(|record| record.category.split('/').next())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Runs one mirror pass over a snapshot according to a [`MirrorConfig`].
pub struct SkillSynchronizer<'a> {
    config: &'a MirrorConfig,
    locator: SkillLocator<'a>,
    copier: SkillCopier,
}

impl<'a> SkillSynchronizer<'a> {
    pub fn new(config: &'a MirrorConfig) -> Self {
        Self {
            config,
            locator: SkillLocator::new(config),
            copier: SkillCopier::new(config.layout.marker_file.clone()),
        }
    }

    /// Fetch a snapshot and mirror it. The snapshot is removed before returning.
    pub fn run(&self, fetcher: &dyn Fetcher) -> MirrorResult<SyncReport> {
        self.config.validate()?;
        let snapshot = Snapshot::fetch(fetcher)?;
        self.sync_snapshot(snapshot.path())
    }

    /// Mirror an already available tree into the configured output.
    pub fn sync_snapshot(&self, snapshot: &Path) -> MirrorResult<SyncReport> {
        self.config.validate()?;
        fs::create_dir_all(&self.config.target_dir)
            .map_err(|e| MirrorError::io(&self.config.target_dir, e))?;

        let output_root = self.config.output_root();
        let discovered = self.locator.flat_skills(snapshot)?;
        info!(count = discovered.len(), "skills found in primary and plugin locations");

        let mut recorder = AttributionRecorder::new();
        let flat_fallback = match self.locator.structure_placements(snapshot)? {
            Some(placements) => {
                self.sync_structure(snapshot, &output_root, &placements, &mut recorder)?;
                self.sync_plugins(snapshot, &output_root, &mut recorder)?;
                false
            }
            None => {
                warn!(
                    root = %self.config.layout.structure_dir.display(),
                    "organizational root not found, using flat layout"
                );
                for skill in &discovered {
                    let dest = output_root.join(&skill.name);
                    self.copier.copy_skill(&skill.source_dir, &dest)?;
                    debug!(skill = %skill.name, "synced");
                    recorder.push(SkillRecord::flat(&skill.name));
                }
                true
            }
        };

        copy_documentation(snapshot, &output_root)?;
        let attribution =
            recorder.write(&self.config.provenance, &self.config.attribution_path())?;

        info!(synced = recorder.len(), output = %output_root.display(), "mirror complete");
        Ok(SyncReport {
            synced: recorder.len(),
            records: recorder.into_records(),
            output_root,
            discovered: discovered.len(),
            flat_fallback,
            attribution,
        })
    }

    fn sync_structure(
        &self,
        snapshot: &Path,
        output_root: &Path,
        placements: &[SkillPlacement],
        recorder: &mut AttributionRecorder,
    ) -> MirrorResult<()> {
        for placement in placements {
            let dest = output_root.join(&placement.relative_path);
            self.copier.copy_skill(&placement.source_dir, &dest)?;

            let source = self.locator.snapshot_relative(snapshot, &placement.source_dir);
            recorder.push(SkillRecord::structured(
                &placement.relative_path,
                &placement.name,
                source.as_deref(),
            ));
            debug!(skill = %placement.relative_path.display(), "synced");
        }
        Ok(())
    }

    /// Copy plugin skills whose name the structure pass did not already sync.
    ///
    /// Names are checked against everything recorded so far, so a name seen
    /// twice in the plugin tree is only copied once.
    fn sync_plugins(
        &self,
        snapshot: &Path,
        output_root: &Path,
        recorder: &mut AttributionRecorder,
    ) -> MirrorResult<()> {
        let mut synced_names = recorder.names();
        let extra: Vec<_> = self
            .locator
            .plugin_skills(snapshot)?
            .into_iter()
            .filter(|skill| synced_names.insert(skill.name.clone()))
            .collect();

        if !extra.is_empty() {
            info!(count = extra.len(), "additional plugin skills");
        }
        if recorder.is_empty() && extra.is_empty() {
            warn!("no skills found in the organizational tree or plugin locations");
        }

        for skill in extra {
            let dest = output_root.join(PLUGINS_CATEGORY).join(&skill.name);
            self.copier.copy_skill(&skill.source_dir, &dest)?;

            let source = self.locator.snapshot_relative(snapshot, &skill.source_dir);
            recorder.push(SkillRecord::plugin(&skill.name, source.as_deref()));
            debug!(skill = %skill.name, "synced plugin");
        }
        Ok(())
    }
}
