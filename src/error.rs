use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures of the privileged host operations (filesystem, git).
#[derive(Debug, Error)]
pub enum HostError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("{0} is not installed or not on PATH")]
    ToolUnavailable(String),

    #[error("Git log not available, {path} is not a git repository: {stderr}")]
    NotARepository { path: PathBuf, stderr: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl HostError {
    /// Classifies an I/O error raised while touching `path`.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => HostError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => HostError::PermissionDenied(path.to_path_buf()),
            _ => HostError::Io { path: path.to_path_buf(), source: err },
        }
    }
}

/// Failures of the task document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid JSON: {0}")]
    Json(#[source] serde_json::Error),

    #[error("Expected a JSON array of phases, found {0}")]
    NotAnArray(&'static str),

    #[error("Document does not match the phase/task layout: {0}")]
    InvalidShape(#[source] serde_json::Error),

    #[error("No task {task} in phase {phase}")]
    OutOfRange { phase: usize, task: usize },

    #[error("Could not serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}
