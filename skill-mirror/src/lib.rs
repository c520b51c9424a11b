//! `skill-mirror` copies `SKILL.md` bundles out of an upstream repository into a
//! local tree while keeping the upstream's own directory layout.
//!
//! # Pipeline
//! - **Fetch**: shallow `git clone` into a temporary directory ([`GitFetcher`], [`Snapshot`]).
//! - **Locate**: primary, plugin and organizational-tree scans ([`SkillLocator`]).
//! - **Copy**: marker file plus sibling files per skill ([`SkillCopier`]).
//! - **Record**: one `ATTRIBUTION.json` per run ([`AttributionRecorder`]).
//!
//! The [`report`] module repeats the traversal for read-only diagnostics.
//!
//! # Example
//! ```no_run
//! use skill_mirror::{GitFetcher, MirrorConfig, SkillSynchronizer};
//!
//! let config = MirrorConfig::new("skills");
//! let report = SkillSynchronizer::new(&config).run(&GitFetcher::from_config(&config))?;
//! println!("synced {} skills", report.synced);
//! # Ok::<(), skill_mirror::MirrorError>(())
//! ```

#![doc = include_str!("../README.md")]

mod attribution;
mod config;
mod copy;
mod error;
mod fetch;
mod locate;
mod model;
pub mod report;
mod sync;

pub use attribution::{AttributionRecorder, PLUGINS_CATEGORY, ROOT_CATEGORY};
pub use config::{
    DEFAULT_OUTPUT_SUBDIR, DEFAULT_REPOSITORY, MARKER_FILE, MAX_CLONE_DEPTH, MirrorConfig,
    Provenance, SourceLayout, ValidationError,
};
pub use copy::{SkillCopier, UPSTREAM_README_NAME, copy_documentation};
pub use error::{MirrorError, MirrorResult};
pub use fetch::{Fetcher, GitFetcher, Snapshot};
pub use locate::{SkillLocator, dir_name, is_symlink, resolve_link, slash_path};
pub use model::{
    Attribution, DiscoveredSkill, DiscoveryOrigin, LinkResolution, LocationKind, SkillPlacement,
    SkillRecord,
};
pub use sync::{SkillSynchronizer, SyncReport};
