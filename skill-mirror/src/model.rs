use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Outcome of resolving a filesystem entry that may be a symbolic link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkResolution {
    /// The entry is a symlink; holds the fully resolved target.
    Resolved(PathBuf),
    /// The entry is a symlink whose target does not exist (or cannot be reached).
    Broken,
    /// The entry is a regular file or directory.
    NotSymlink,
}

/// Which flat discovery strategy found a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoveryOrigin {
    /// Immediate child of the primary skills directory.
    Primary,
    /// Marker found at any depth under the plugins directory.
    Plugin,
}

/// A skill found by one of the flat discovery strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredSkill {
    /// Base name of the directory holding the marker file.
    pub name: String,
    /// Directory holding the marker file, as found in the snapshot.
    pub source_dir: PathBuf,
    pub origin: DiscoveryOrigin,
}

/// A skill found while walking the organizational tree.
///
/// `relative_path` decides where the skill lands in the output; `source_dir`
/// decides what gets copied. They differ when the entry is a symlink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillPlacement {
    pub relative_path: PathBuf,
    pub name: String,
    pub source_dir: PathBuf,
    /// Whether the placement came through a symlinked entry.
    pub via_symlink: bool,
}

/// One entry of the attribution document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    /// Output path relative to the mirror root.
    pub path: String,
    pub name: String,
    /// Parent segment(s) of `path`, or `plugins` / `root` for the supplemental and flat passes.
    pub category: String,
    /// Location of the copied content relative to the snapshot root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// The provenance document written as `ATTRIBUTION.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub source: String,
    pub repository: String,
    pub license: String,
    pub synced_skills: usize,
    pub skills: Vec<SkillRecord>,
    pub note: String,
}

/// Where a marker file sits inside a snapshot, as reported by the diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocationKind {
    GithubSkills,
    GithubPlugins,
    SkillsSymlinked,
    SkillsDirect,
    SkillsViaSymlinkParent,
    Other,
}

impl LocationKind {
    pub const ALL: [LocationKind; 6] = [
        LocationKind::GithubSkills,
        LocationKind::GithubPlugins,
        LocationKind::SkillsSymlinked,
        LocationKind::SkillsDirect,
        LocationKind::SkillsViaSymlinkParent,
        LocationKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationKind::GithubSkills => "github_skills",
            LocationKind::GithubPlugins => "github_plugins",
            LocationKind::SkillsSymlinked => "skills_symlinked",
            LocationKind::SkillsDirect => "skills_direct",
            LocationKind::SkillsViaSymlinkParent => "skills_via_symlink_parent",
            LocationKind::Other => "other",
        }
    }

    /// Whether the sync pipeline copies skills of this kind.
    ///
    /// Skills reached only through a symlinked ancestor directory are never
    /// copied: the structure walk does not descend into symlinked directories.
    pub fn is_handled(&self) -> bool {
        matches!(
            self,
            LocationKind::GithubSkills
                | LocationKind::GithubPlugins
                | LocationKind::SkillsSymlinked
                | LocationKind::SkillsDirect
        )
    }

    /// Coarse bucket used by the repository inspector.
    pub fn bucket(&self) -> &'static str {
        match self {
            LocationKind::GithubSkills => ".github/skills",
            LocationKind::GithubPlugins => ".github/plugins",
            LocationKind::SkillsSymlinked
            | LocationKind::SkillsDirect
            | LocationKind::SkillsViaSymlinkParent => "skills/ (structure)",
            LocationKind::Other => "other",
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
