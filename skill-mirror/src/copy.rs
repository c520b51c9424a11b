use crate::error::{MirrorError, MirrorResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Readme copies are renamed so they never shadow a local `README.md`.
pub const UPSTREAM_README_NAME: &str = "README-MICROSOFT.md";

/// Copies a skill's marker file and its sibling files into the output tree.
///
/// Only regular files directly inside the source directory are copied;
/// nested directories of a skill are left behind. Existing destination files
/// are overwritten and nothing is ever removed from the destination.
#[derive(Debug, Clone)]
pub struct SkillCopier {
    marker_file: String,
}

impl SkillCopier {
    pub fn new(marker_file: impl Into<String>) -> Self {
        Self { marker_file: marker_file.into() }
    }

    /// Copy one skill and return the number of files written.
    pub fn copy_skill(&self, source_dir: &Path, dest_dir: &Path) -> MirrorResult<usize> {
        fs::create_dir_all(dest_dir).map_err(|e| MirrorError::io(dest_dir, e))?;

        copy_file(&source_dir.join(&self.marker_file), &dest_dir.join(&self.marker_file))?;
        let mut copied = 1;

        for sibling in self.sibling_files(source_dir)? {
            let Some(name) = sibling.file_name() else {
                continue;
            };
            copy_file(&sibling, &dest_dir.join(name))?;
            copied += 1;
        }

        debug!(source = %source_dir.display(), dest = %dest_dir.display(), files = copied, "copied skill");
        Ok(copied)
    }

    /// Regular files next to the marker, sorted by name. Symlinks to files count.
    pub fn sibling_files(&self, source_dir: &Path) -> MirrorResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(source_dir).map_err(|e| MirrorError::io(source_dir, e))? {
            let path = entry.map_err(|e| MirrorError::io(source_dir, e))?.path();
            if path.is_file() && path.file_name().is_some_and(|n| n != self.marker_file.as_str()) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Copy the upstream `LICENSE` and `README.md` into the output root when present.
pub fn copy_documentation(snapshot: &Path, output_root: &Path) -> MirrorResult<Vec<PathBuf>> {
    fs::create_dir_all(output_root).map_err(|e| MirrorError::io(output_root, e))?;

    let mut written = Vec::new();
    for (from, to) in [("LICENSE", "LICENSE"), ("README.md", UPSTREAM_README_NAME)] {
        let source = snapshot.join(from);
        if source.is_file() {
            let dest = output_root.join(to);
            copy_file(&source, &dest)?;
            written.push(dest);
        }
    }
    Ok(written)
}

fn copy_file(from: &Path, to: &Path) -> MirrorResult<()> {
    fs::copy(from, to).map_err(|source| MirrorError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    Ok(())
}
