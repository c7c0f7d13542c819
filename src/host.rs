use std::{fs, io::Write, path::{Path, PathBuf}};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use crate::error::HostError;
use crate::git::get_git_log;

/// Privileged operations the UI asks for: file access, the autosave location and git.
pub trait Host: Send + Sync {
    fn read_text_file(&self, path: &Path) -> Result<String, HostError>;
    fn write_text_file(&self, path: &Path, text: &str) -> Result<(), HostError>;
    /// Directory for autosave and UI state, created if absent.
    fn autosave_dir(&self) -> Result<PathBuf, HostError>;
    fn git_log(&self) -> Result<String, HostError>;
}

/// [`Host`] backed by the local filesystem and the `git` binary.
pub struct FsHost {
    data_dir: PathBuf,
    repo_dir: PathBuf,
    git_log_limit: Option<usize>,
}

impl FsHost {
    pub fn new(data_dir: PathBuf, repo_dir: PathBuf, git_log_limit: Option<usize>) -> Self {
        Self { data_dir, repo_dir, git_log_limit }
    }
}

impl Host for FsHost {
    fn read_text_file(&self, path: &Path) -> Result<String, HostError> {
        debug!(path = %path.display(), "reading file");
        fs::read_to_string(path).map_err(|e| HostError::from_io(path, e))
    }

    fn write_text_file(&self, path: &Path, text: &str) -> Result<(), HostError> {
        atomic_write(path, text.as_bytes())?;
        debug!(path = %path.display(), bytes = text.len(), "wrote file");
        Ok(())
    }

    fn autosave_dir(&self) -> Result<PathBuf, HostError> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir).map_err(|e| HostError::from_io(&self.data_dir, e))?;
            info!(dir = %self.data_dir.display(), "created data directory");
        }
        Ok(self.data_dir.clone())
    }

    fn git_log(&self) -> Result<String, HostError> {
        get_git_log(&self.repo_dir, self.git_log_limit)
    }
}

/// Writes `content` to `path` through a temp file + rename, creating the parent directory.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), HostError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| HostError::from_io(dir, e))?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| HostError::from_io(dir, e))?;
    tmp.write_all(content).map_err(|e| HostError::from_io(path, e))?;
    tmp.flush().map_err(|e| HostError::from_io(path, e))?;
    tmp.persist(path).map_err(|e| HostError::from_io(path, e.error))?;
    Ok(())
}

/// Turns a typed path into a `PathBuf`, expanding `~` and `$VARS`. Blank input gives `None`.
pub fn resolve_user_path(input: &str) -> Option<PathBuf> {
    let trimmed = input.trim().trim_matches(|c| c == '"' || c == '\'');
    if trimmed.is_empty() {
        return None;
    }
    let expanded = shellexpand::full(trimmed)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| shellexpand::tilde(trimmed).into_owned());
    Some(PathBuf::from(expanded))
}
