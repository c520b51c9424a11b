//! Configuration for a mirror run.
//!
//! Every component receives a [`MirrorConfig`] explicitly; there are no
//! process-wide settings. Defaults mirror `microsoft/skills` into `./skills`.
//! Use [`MirrorConfig::from_env`] to layer `SKILL_MIRROR_*` environment
//! variables over the defaults, or the `with_*` setters for programmatic use.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Upstream repository cloned when nothing else is configured.
pub const DEFAULT_REPOSITORY: &str = "https://github.com/microsoft/skills.git";

/// File whose presence marks a directory as a skill.
pub const MARKER_FILE: &str = "SKILL.md";

/// Output location below the target directory.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "official/microsoft";

pub const DEFAULT_NOTE: &str =
    "Symlinks resolved and content copied for compatibility. Original directory structure preserved.";

/// Upper bound for `clone_depth`; deeper clones defeat the point of a snapshot.
pub const MAX_CLONE_DEPTH: u32 = 1000;

/// Validation error with context and suggestions.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Description of the error
    pub message: String,
    /// Suggested fix or valid values
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into(), suggestion: None }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl std::error::Error for ValidationError {}

/// Fixed locations inside the upstream tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceLayout {
    /// Marker file name
    pub marker_file: String,
    /// Flat directory of skills, one per child directory
    pub primary_dir: PathBuf,
    /// Plugin tree searched recursively for marker files
    pub plugins_dir: PathBuf,
    /// Organizational tree whose structure is mirrored verbatim
    pub structure_dir: PathBuf,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            marker_file: MARKER_FILE.to_string(),
            primary_dir: PathBuf::from(".github").join("skills"),
            plugins_dir: PathBuf::from(".github").join("plugins"),
            structure_dir: PathBuf::from("skills"),
        }
    }
}

/// Provenance fields written to the attribution document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Provenance {
    pub source_id: String,
    pub source_url: String,
    pub license: String,
    pub note: String,
}

impl Default for Provenance {
    fn default() -> Self {
        Self {
            source_id: "microsoft/skills".to_string(),
            source_url: "https://github.com/microsoft/skills".to_string(),
            license: "MIT".to_string(),
            note: DEFAULT_NOTE.to_string(),
        }
    }
}

/// Settings for one mirror invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Repository reference handed to `git clone`
    pub repository: String,
    /// Local root that receives `official/microsoft/...`
    pub target_dir: PathBuf,
    /// Subdirectory of `target_dir` holding the mirrored content
    pub output_subdir: PathBuf,
    /// History depth of the snapshot
    pub clone_depth: u32,
    pub layout: SourceLayout,
    pub provenance: Provenance,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            repository: DEFAULT_REPOSITORY.to_string(),
            target_dir: PathBuf::from("skills"),
            output_subdir: PathBuf::from(DEFAULT_OUTPUT_SUBDIR),
            clone_depth: 1,
            layout: SourceLayout::default(),
            provenance: Provenance::default(),
        }
    }
}

impl MirrorConfig {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self { target_dir: target_dir.into(), ..Default::default() }
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    pub fn with_target_dir(mut self, target_dir: impl Into<PathBuf>) -> Self {
        self.target_dir = target_dir.into();
        self
    }

    pub fn with_clone_depth(mut self, depth: u32) -> Self {
        self.clone_depth = depth;
        self
    }

    pub fn with_layout(mut self, layout: SourceLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Directory that receives skills, `ATTRIBUTION.json`, `LICENSE` and the readme copy.
    pub fn output_root(&self) -> PathBuf {
        self.target_dir.join(&self.output_subdir)
    }

    pub fn attribution_path(&self) -> PathBuf {
        self.output_root().join("ATTRIBUTION.json")
    }

    /// Load configuration from `SKILL_MIRROR_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let mut config = Self::default();

        if let Some(repository) = lookup("SKILL_MIRROR_REPOSITORY") {
            config.repository = repository;
        }
        if let Some(target) = lookup("SKILL_MIRROR_TARGET_DIR") {
            config.target_dir = PathBuf::from(target);
        }
        if let Some(depth) = lookup("SKILL_MIRROR_CLONE_DEPTH") {
            config.clone_depth = depth.trim().parse().map_err(|_| {
                ValidationError::new("clone_depth", format!("'{depth}' is not a number"))
                    .with_suggestion("Use a positive integer such as 1")
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.repository.trim().is_empty() {
            return Err(ValidationError::new("repository", "Repository cannot be empty")
                .with_suggestion(format!("Default is {DEFAULT_REPOSITORY}")));
        }

        if self.target_dir.as_os_str().is_empty() {
            return Err(ValidationError::new("target_dir", "Target directory cannot be empty"));
        }

        if self.clone_depth == 0 || self.clone_depth > MAX_CLONE_DEPTH {
            return Err(ValidationError::new(
                "clone_depth",
                format!("Clone depth {} is out of range", self.clone_depth),
            )
            .with_suggestion(format!("Use a value between 1 and {MAX_CLONE_DEPTH}")));
        }

        if self.layout.marker_file.is_empty() || self.layout.marker_file.contains('/') {
            return Err(ValidationError::new(
                "layout.marker_file",
                "Marker file must be a bare file name",
            ));
        }

        for (field, path) in [
            ("layout.primary_dir", &self.layout.primary_dir),
            ("layout.plugins_dir", &self.layout.plugins_dir),
            ("layout.structure_dir", &self.layout.structure_dir),
            ("output_subdir", &self.output_subdir),
        ] {
            if path.is_absolute() {
                return Err(ValidationError::new(field, "Path must be relative")
                    .with_suggestion(format!("Got {}", path.display())));
            }
        }

        Ok(())
    }

    /// Locations of the three known roots inside a snapshot.
    pub fn primary_root(&self, snapshot: &Path) -> PathBuf {
        snapshot.join(&self.layout.primary_dir)
    }

    pub fn plugins_root(&self, snapshot: &Path) -> PathBuf {
        snapshot.join(&self.layout.plugins_dir)
    }

    pub fn structure_root(&self, snapshot: &Path) -> PathBuf {
        snapshot.join(&self.layout.structure_dir)
    }
}
