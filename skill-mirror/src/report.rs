//! Read-only diagnostics over a snapshot.
//!
//! These helpers repeat the locator's traversal to count marker files by
//! location and to check how many of them the sync pipeline would pick up.
//! Nothing here writes to disk.
//!
//! Unlike the sync walk, the marker search follows symlinked directories, so
//! a skill that is only reachable through a symlinked ancestor shows up as
//! [`LocationKind::SkillsViaSymlinkParent`]. The sync pipeline does not copy
//! those; the coverage numbers make that gap visible.

use crate::config::MirrorConfig;
use crate::error::{MirrorError, MirrorResult};
use crate::locate::{SkillLocator, dir_name, is_symlink, resolve_link};
use crate::model::{LinkResolution, LocationKind};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Coverage at or above this percentage counts as comprehensive.
pub const COMPREHENSIVE_PERCENT: f64 = 99.0;

/// Every marker file under `root`, following symlinked directories.
///
/// Paths keep the symlinked spelling, so one file reachable two ways is
/// listed twice. Symlink loops are skipped.
pub fn find_marker_files(root: &Path, marker: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == marker)
        .map(|entry| entry.into_path())
        .collect()
}

/// Classify a marker file given its path relative to the snapshot.
pub fn classify(config: &MirrorConfig, snapshot: &Path, relative: &Path) -> LocationKind {
    let layout = &config.layout;
    if relative.starts_with(&layout.primary_dir) {
        return LocationKind::GithubSkills;
    }
    if relative.starts_with(&layout.plugins_dir) {
        return LocationKind::GithubPlugins;
    }
    if !relative.starts_with(&layout.structure_dir) {
        return LocationKind::Other;
    }

    let structure_root = config.structure_root(snapshot);
    let Some(skill_dir) = snapshot.join(relative).parent().map(Path::to_path_buf) else {
        return LocationKind::Other;
    };

    if is_symlink(&skill_dir) {
        return LocationKind::SkillsSymlinked;
    }

    let linked_ancestor = skill_dir
        .ancestors()
        .skip(1)
        .take_while(|ancestor| *ancestor != structure_root.as_path())
        .any(is_symlink);

    if linked_ancestor { LocationKind::SkillsViaSymlinkParent } else { LocationKind::SkillsDirect }
}

/// Marker files grouped by [`LocationKind`].
#[derive(Debug, Clone, Default)]
pub struct CoverageSummary {
    pub total: usize,
    pub handled: usize,
    /// Marker paths relative to the snapshot, per kind. Empty kinds are absent.
    pub breakdown: BTreeMap<LocationKind, Vec<PathBuf>>,
}

impl CoverageSummary {
    pub fn count(&self, kind: LocationKind) -> usize {
        self.breakdown.get(&kind).map_or(0, Vec::len)
    }

    pub fn coverage_percent(&self) -> f64 {
        if self.total == 0 { 0.0 } else { self.handled as f64 / self.total as f64 * 100.0 }
    }

    pub fn missing(&self) -> usize {
        self.total.saturating_sub(self.handled)
    }

    pub fn is_complete(&self) -> bool {
        self.handled == self.total
    }

    pub fn is_comprehensive(&self) -> bool {
        self.coverage_percent() >= COMPREHENSIVE_PERCENT
    }

    /// Kinds the sync pipeline does not copy, with their counts.
    pub fn unhandled(&self) -> Vec<(LocationKind, usize)> {
        self.breakdown
            .iter()
            .filter(|(kind, _)| !kind.is_handled())
            .map(|(kind, paths)| (*kind, paths.len()))
            .collect()
    }
}

pub fn analyze_coverage(config: &MirrorConfig, snapshot: &Path) -> CoverageSummary {
    let mut summary = CoverageSummary::default();
    for marker in find_marker_files(snapshot, &config.layout.marker_file) {
        let relative = marker.strip_prefix(snapshot).map(Path::to_path_buf).unwrap_or(marker);
        let kind = classify(config, snapshot, &relative);
        summary.total += 1;
        if kind.is_handled() {
            summary.handled += 1;
        }
        summary.breakdown.entry(kind).or_default().push(relative);
    }
    summary
}

/// Real (non-symlinked) skill directories under the organizational root.
///
/// The walk does not follow links, so none of these has a symlinked ancestor.
/// Paths are relative to the organizational root.
pub fn unlinked_structure_skills(config: &MirrorConfig, snapshot: &Path) -> Vec<PathBuf> {
    let root = config.structure_root(snapshot);
    if !root.is_dir() {
        return Vec::new();
    }
    let locator = SkillLocator::new(config);
    WalkDir::new(&root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_dir() && locator.has_marker(entry.path()))
        .filter_map(|entry| entry.path().strip_prefix(&root).ok().map(Path::to_path_buf))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryEntry {
    pub name: String,
    pub has_marker: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkSample {
    /// Path relative to the organizational root.
    pub path: PathBuf,
    /// Base name of the resolved target, `None` when broken.
    pub target_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureStats {
    pub total_items: usize,
    pub regular_dirs: usize,
    pub symlinked_dirs: usize,
    pub symlinked_files: usize,
    /// Top-level categories with their number of child directories.
    pub categories: Vec<(String, usize)>,
    pub symlink_samples: Vec<SymlinkSample>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySample {
    pub name: String,
    pub skill_count: usize,
    /// Up to three skill paths relative to the organizational root.
    pub samples: Vec<PathBuf>,
}

/// Everything the repository inspector prints.
#[derive(Debug, Clone, Default)]
pub struct InspectionReport {
    pub top_level_dirs: Vec<String>,
    /// `None` when the primary directory is missing.
    pub primary: Option<Vec<PrimaryEntry>>,
    /// Marker files relative to the plugins directory; `None` when it is missing.
    pub plugin_markers: Option<Vec<PathBuf>>,
    /// `None` when the organizational root is missing.
    pub structure: Option<StructureStats>,
    pub marker_total: usize,
    pub distribution: BTreeMap<&'static str, usize>,
    pub category_samples: Vec<CategorySample>,
}

pub fn inspect_snapshot(config: &MirrorConfig, snapshot: &Path) -> MirrorResult<InspectionReport> {
    let locator = SkillLocator::new(config);
    let mut report = InspectionReport {
        top_level_dirs: sorted_children(snapshot)?
            .into_iter()
            .filter(|path| path.is_dir())
            .map(|path| dir_name(&path))
            .collect(),
        ..Default::default()
    };

    let primary_root = config.primary_root(snapshot);
    if primary_root.exists() {
        report.primary = Some(
            sorted_children(&primary_root)?
                .into_iter()
                .filter(|path| path.is_dir())
                .map(|path| PrimaryEntry { name: dir_name(&path), has_marker: locator.has_marker(&path) })
                .collect(),
        );
    }

    let plugins_root = config.plugins_root(snapshot);
    if plugins_root.exists() {
        report.plugin_markers = Some(
            locator
                .plugin_skills(snapshot)?
                .into_iter()
                .filter_map(|skill| {
                    let marker = skill.source_dir.join(&config.layout.marker_file);
                    marker.strip_prefix(&plugins_root).ok().map(Path::to_path_buf)
                })
                .collect(),
        );
    }

    let structure_root = config.structure_root(snapshot);
    if structure_root.exists() {
        report.structure = Some(structure_stats(&structure_root)?);
        report.category_samples = category_samples(&locator, &structure_root)?;
    }

    for marker in find_marker_files(snapshot, &config.layout.marker_file) {
        let relative = marker.strip_prefix(snapshot).map(Path::to_path_buf).unwrap_or(marker);
        let bucket = classify(config, snapshot, &relative).bucket();
        *report.distribution.entry(bucket).or_default() += 1;
        report.marker_total += 1;
    }

    Ok(report)
}

fn structure_stats(root: &Path) -> MirrorResult<StructureStats> {
    let mut stats = StructureStats::default();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let Ok(entry) = entry else { continue };
        stats.total_items += 1;
        let path = entry.path();
        if entry.path_is_symlink() {
            if path.is_dir() {
                stats.symlinked_dirs += 1;
                let target_name = match resolve_link(path) {
                    LinkResolution::Resolved(target) => Some(dir_name(&target)),
                    LinkResolution::Broken | LinkResolution::NotSymlink => None,
                };
                if let Ok(relative) = path.strip_prefix(root) {
                    stats.symlink_samples.push(SymlinkSample { path: relative.to_path_buf(), target_name });
                }
            } else {
                stats.symlinked_files += 1;
            }
        } else if entry.file_type().is_dir() {
            stats.regular_dirs += 1;
        }
    }

    for category in sorted_children(root)?.into_iter().filter(|path| path.is_dir()) {
        let subdirs = sorted_children(&category)?.into_iter().filter(|path| path.is_dir()).count();
        stats.categories.push((dir_name(&category), subdirs));
    }

    Ok(stats)
}

/// Skills inside the first three entries of the organizational root.
fn category_samples(locator: &SkillLocator<'_>, root: &Path) -> MirrorResult<Vec<CategorySample>> {
    let mut samples = Vec::new();
    for category in sorted_children(root)?.into_iter().take(3).filter(|path| path.is_dir()) {
        let skills: Vec<PathBuf> = WalkDir::new(&category)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| {
                entry.path().is_dir() && (entry.path_is_symlink() || locator.has_marker(entry.path()))
            })
            .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
            .collect();

        samples.push(CategorySample {
            name: dir_name(&category),
            skill_count: skills.len(),
            samples: skills.into_iter().take(3).collect(),
        });
    }
    Ok(samples)
}

fn sorted_children(dir: &Path) -> MirrorResult<Vec<PathBuf>> {
    let mut children = fs::read_dir(dir)
        .map_err(|e| MirrorError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| MirrorError::io(dir, e))?;
    children.sort();
    Ok(children)
}
