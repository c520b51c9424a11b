//! Snapshot acquisition.
//!
//! A [`Fetcher`] fills an empty directory with the upstream tree. The
//! [`Snapshot`] owning that directory removes it when dropped, on success
//! and on every error path alike.

use crate::config::MirrorConfig;
use crate::error::{MirrorError, MirrorResult};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tracing::{debug, info};

/// Produces a local copy of an upstream content tree.
pub trait Fetcher {
    /// Populate `dest`, which exists and is empty.
    fn fetch(&self, dest: &Path) -> MirrorResult<()>;

    /// Human-readable description of the upstream, for logs.
    fn describe(&self) -> String;
}

/// Shallow `git clone` of a repository.
#[derive(Debug, Clone)]
pub struct GitFetcher {
    repository: String,
    depth: u32,
}

impl GitFetcher {
    pub fn new(repository: impl Into<String>, depth: u32) -> Self {
        Self { repository: repository.into(), depth }
    }

    pub fn from_config(config: &MirrorConfig) -> Self {
        Self::new(config.repository.clone(), config.clone_depth)
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }
}

impl Fetcher for GitFetcher {
    fn fetch(&self, dest: &Path) -> MirrorResult<()> {
        info!(repository = %self.repository, depth = self.depth, "cloning");
        let output = Command::new("git")
            .arg("clone")
            .arg("--depth")
            .arg(self.depth.to_string())
            .arg(&self.repository)
            .arg(dest)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(MirrorError::GitSpawn)?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(MirrorError::Fetch {
                repository: self.repository.clone(),
                status: output.status.to_string(),
                stderr,
            });
        }

        debug!(stderr = %stderr, "clone finished");
        Ok(())
    }

    fn describe(&self) -> String {
        self.repository.clone()
    }
}

/// A content tree the locator and reporters can read from.
#[derive(Debug)]
pub enum Snapshot {
    /// Fetched into a temporary directory that is deleted on drop.
    Fetched(TempDir),
    /// An existing checkout supplied by the caller; never modified.
    Local(PathBuf),
}

impl Snapshot {
    /// Fetch into a fresh temporary directory.
    pub fn fetch(fetcher: &dyn Fetcher) -> MirrorResult<Self> {
        let temp = tempfile::Builder::new()
            .prefix("skill-mirror-")
            .tempdir()
            .map_err(|e| MirrorError::io(std::env::temp_dir(), e))?;
        fetcher.fetch(temp.path())?;
        info!(upstream = %fetcher.describe(), path = %temp.path().display(), "snapshot ready");
        Ok(Snapshot::Fetched(temp))
    }

    pub fn local(path: impl Into<PathBuf>) -> MirrorResult<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(MirrorError::io(
                &path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "source checkout is not a directory"),
            ));
        }
        Ok(Snapshot::Local(path))
    }

    pub fn path(&self) -> &Path {
        match self {
            Snapshot::Fetched(temp) => temp.path(),
            Snapshot::Local(path) => path,
        }
    }
}
