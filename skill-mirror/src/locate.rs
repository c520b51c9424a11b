//! Skill discovery over a fetched snapshot.
//!
//! Three roots are scanned, each with its own convention:
//! - the primary directory, where every child directory holding the marker is a skill;
//! - the plugins directory, searched at any depth for marker files;
//! - the organizational tree, walked recursively to produce placements whose
//!   relative path is mirrored verbatim into the output.
//!
//! Walks never descend into symlinked directories. A symlinked entry is
//! resolved once and its target is used as the content source.

use crate::config::MirrorConfig;
use crate::error::{MirrorError, MirrorResult};
use crate::model::{DiscoveredSkill, DiscoveryOrigin, LinkResolution, SkillPlacement};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Classify `path` as a plain entry, a resolvable symlink, or a broken one.
pub fn resolve_link(path: &Path) -> LinkResolution {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => match fs::canonicalize(path) {
            Ok(target) => LinkResolution::Resolved(target),
            Err(_) => LinkResolution::Broken,
        },
        _ => LinkResolution::NotSymlink,
    }
}

pub fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink())
}

/// Base name of a directory, lossily converted.
pub fn dir_name(path: &Path) -> String {
    path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Render a relative path with `/` separators regardless of platform.
pub fn slash_path(path: &Path) -> String {
    path.iter().map(|part| part.to_string_lossy()).collect::<Vec<_>>().join("/")
}

pub struct SkillLocator<'a> {
    config: &'a MirrorConfig,
}

impl<'a> SkillLocator<'a> {
    pub fn new(config: &'a MirrorConfig) -> Self {
        Self { config }
    }

    pub fn has_marker(&self, dir: &Path) -> bool {
        dir.join(&self.config.layout.marker_file).is_file()
    }

    /// Immediate children of the primary directory that hold the marker file.
    pub fn primary_skills(&self, snapshot: &Path) -> MirrorResult<Vec<DiscoveredSkill>> {
        let root = self.config.primary_root(snapshot);
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut children = fs::read_dir(&root)
            .map_err(|e| MirrorError::io(&root, e))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| MirrorError::io(&root, e))?;
        children.sort();

        Ok(children
            .into_iter()
            .filter(|path| path.is_dir() && self.has_marker(path))
            .map(|path| DiscoveredSkill {
                name: dir_name(&path),
                source_dir: path,
                origin: DiscoveryOrigin::Primary,
            })
            .collect())
    }

    /// Every marker file below the plugins directory, at any depth.
    ///
    /// The same name may appear more than once; callers decide how to merge.
    pub fn plugin_skills(&self, snapshot: &Path) -> MirrorResult<Vec<DiscoveredSkill>> {
        let root = self.config.plugins_root(snapshot);
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let marker = self.config.layout.marker_file.as_str();
        Ok(WalkDir::new(&root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_name() == marker && entry.path().is_file())
            .filter_map(|entry| entry.path().parent().map(Path::to_path_buf))
            .map(|dir| DiscoveredSkill {
                name: dir_name(&dir),
                source_dir: dir,
                origin: DiscoveryOrigin::Plugin,
            })
            .collect())
    }

    /// Union of the primary and plugin scans keyed by name, first found wins.
    pub fn flat_skills(&self, snapshot: &Path) -> MirrorResult<Vec<DiscoveredSkill>> {
        let mut seen = HashSet::new();
        let mut skills = Vec::new();
        for skill in self.primary_skills(snapshot)?.into_iter().chain(self.plugin_skills(snapshot)?) {
            if seen.insert(skill.name.clone()) {
                skills.push(skill);
            }
        }
        Ok(skills)
    }

    /// Walk the organizational tree and record every directory holding the marker.
    ///
    /// Returns `None` when the organizational root does not exist, which
    /// selects the flat fallback layout.
    pub fn structure_placements(&self, snapshot: &Path) -> MirrorResult<Option<Vec<SkillPlacement>>> {
        let root = self.config.structure_root(snapshot);
        if !root.is_dir() {
            return Ok(None);
        }

        let mut placements = Vec::new();
        for entry in WalkDir::new(&root).min_depth(1).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();

            let (source_dir, via_symlink) = match resolve_link(path) {
                LinkResolution::Resolved(target) if target.is_dir() => (target, true),
                LinkResolution::Resolved(_) => continue,
                LinkResolution::Broken => {
                    debug!(path = %path.display(), "skipping broken symlink");
                    continue;
                }
                LinkResolution::NotSymlink if entry.file_type().is_dir() => {
                    (path.to_path_buf(), false)
                }
                LinkResolution::NotSymlink => continue,
            };

            if !self.has_marker(&source_dir) {
                continue;
            }

            let relative_path = path
                .strip_prefix(&root)
                .map_err(|_| MirrorError::OutsideRoot {
                    path: path.to_path_buf(),
                    root: root.clone(),
                })?
                .to_path_buf();

            placements.push(SkillPlacement {
                name: dir_name(path),
                relative_path,
                source_dir,
                via_symlink,
            });
        }

        Ok(Some(placements))
    }

    /// Path of `dir` relative to the snapshot root, if it lies inside it.
    ///
    /// Resolved symlink targets are canonical, so both spellings of the root are tried.
    pub fn snapshot_relative(&self, snapshot: &Path, dir: &Path) -> Option<PathBuf> {
        if let Ok(relative) = dir.strip_prefix(snapshot) {
            return Some(relative.to_path_buf());
        }
        let canonical = fs::canonicalize(snapshot).ok()?;
        dir.strip_prefix(&canonical).ok().map(Path::to_path_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn skill(root: &Path, rel: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("SKILL.md"), format!("# {rel}\n")).unwrap();
    }

    #[test]
    fn primary_scan_requires_marker_in_child() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        skill(root, ".github/skills/alpha");
        skill(root, ".github/skills/beta");
        fs::create_dir_all(root.join(".github/skills/empty")).unwrap();
        fs::write(root.join(".github/skills/README.md"), "not a skill").unwrap();
        skill(root, ".github/skills/alpha/nested");

        let config = MirrorConfig::default();
        let names: Vec<_> = SkillLocator::new(&config)
            .primary_skills(root)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[test]
    fn plugin_scan_finds_markers_at_any_depth() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        skill(root, ".github/plugins/tools/helper");
        skill(root, ".github/plugins/a/b/c/deep");

        let config = MirrorConfig::default();
        let skills = SkillLocator::new(&config).plugin_skills(root).unwrap();
        let names: Vec<_> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["deep", "helper"]);
        assert!(skills.iter().all(|s| s.origin == DiscoveryOrigin::Plugin));
    }

    #[test]
    fn flat_union_prefers_primary_on_collision() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        skill(root, ".github/skills/shared");
        skill(root, ".github/plugins/pack/shared");
        skill(root, ".github/plugins/pack/only-plugin");

        let config = MirrorConfig::default();
        let skills = SkillLocator::new(&config).flat_skills(root).unwrap();
        assert_eq!(skills.len(), 2);
        let shared = skills.iter().find(|s| s.name == "shared").unwrap();
        assert_eq!(shared.origin, DiscoveryOrigin::Primary);
        assert!(shared.source_dir.ends_with(".github/skills/shared"));
    }

    #[test]
    fn missing_structure_root_selects_fallback() {
        let temp = tempfile::tempdir().unwrap();
        let config = MirrorConfig::default();
        let placements = SkillLocator::new(&config).structure_placements(temp.path()).unwrap();
        assert!(placements.is_none());
    }

    #[test]
    fn structure_walk_keeps_relative_paths() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        skill(root, "skills/productivity/writer");
        skill(root, "skills/data/etl/loader");
        fs::create_dir_all(root.join("skills/empty-category")).unwrap();

        let config = MirrorConfig::default();
        let placements =
            SkillLocator::new(&config).structure_placements(root).unwrap().unwrap();
        let paths: Vec<_> = placements.iter().map(|p| slash_path(&p.relative_path)).collect();
        assert_eq!(paths, vec!["data/etl/loader", "productivity/writer"]);
        assert!(placements.iter().all(|p| !p.via_symlink));
    }

    #[cfg(unix)]
    #[test]
    fn structure_walk_resolves_symlinks_and_skips_broken_ones() {
        use std::os::unix::fs::symlink;

        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        skill(root, ".github/skills/writer-plugin");
        fs::create_dir_all(root.join("skills/productivity")).unwrap();
        symlink(
            root.join(".github/skills/writer-plugin"),
            root.join("skills/productivity/writer"),
        )
        .unwrap();
        symlink(root.join("does/not/exist"), root.join("skills/productivity/ghost")).unwrap();

        let config = MirrorConfig::default();
        let placements =
            SkillLocator::new(&config).structure_placements(root).unwrap().unwrap();
        assert_eq!(placements.len(), 1);
        let writer = &placements[0];
        assert_eq!(writer.name, "writer");
        assert_eq!(slash_path(&writer.relative_path), "productivity/writer");
        assert!(writer.via_symlink);
        assert!(writer.source_dir.ends_with(".github/skills/writer-plugin"));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_target_outside_snapshot_is_placed() {
        use std::os::unix::fs::symlink;

        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("upstream");
        skill(temp.path(), "shared/writer");
        fs::create_dir_all(root.join("skills/productivity")).unwrap();
        symlink(temp.path().join("shared/writer"), root.join("skills/productivity/writer"))
            .unwrap();

        let config = MirrorConfig::default();
        let locator = SkillLocator::new(&config);
        let placements = locator.structure_placements(&root).unwrap().unwrap();

        assert_eq!(placements.len(), 1);
        assert_eq!(slash_path(&placements[0].relative_path), "productivity/writer");
        assert!(placements[0].via_symlink);
        assert!(locator.snapshot_relative(&root, &placements[0].source_dir).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn resolve_link_distinguishes_three_cases() {
        use std::os::unix::fs::symlink;

        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("real")).unwrap();
        symlink(root.join("real"), root.join("good")).unwrap();
        symlink(root.join("missing"), root.join("bad")).unwrap();

        assert!(matches!(resolve_link(&root.join("good")), LinkResolution::Resolved(_)));
        assert_eq!(resolve_link(&root.join("bad")), LinkResolution::Broken);
        assert_eq!(resolve_link(&root.join("real")), LinkResolution::NotSymlink);
    }
}
