use crate::config::ValidationError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("failed to launch git: {0}")]
    GitSpawn(#[source] std::io::Error),

    #[error("clone of {repository} failed ({status}): {stderr}")]
    Fetch { repository: String, status: String, stderr: String },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("{path} is not under {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

impl MirrorError {
    /// Attach the offending path to an I/O failure.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MirrorError::Io { path: path.into(), source }
    }
}

pub type MirrorResult<T> = Result<T, MirrorError>;
