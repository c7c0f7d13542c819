#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use todotab::error::HostError;
use todotab::host::Host;

pub const PLAN: &str = r#"[
  {
    "phase": "Setup",
    "tasks": [
      { "title": "Create repo", "description": "git init", "estimated_hours": 1, "done": true },
      { "title": "Add CI", "description": "GitHub Actions", "estimated_hours": 2, "done": false },
      { "title": "Write README", "description": "", "estimated_hours": 0.5, "done": true }
    ]
  },
  {
    "phase": "Polish",
    "tasks": [
      { "title": "Dark mode", "description": "Theme tweaks", "estimated_hours": 3, "done": false }
    ]
  }
]"#;

pub const GIT_LOG: &str = "\
a1b2c3d - Add git tab (2024-05-02 12:00:00 +0200)
e4f5a6b - Load JSON file (2024-05-01 09:30:00 +0200)
this line is noise";

/// In-memory host: files in a map, a canned git log, optional write failures.
pub struct FakeHost {
    pub files: Mutex<HashMap<PathBuf, String>>,
    pub git: Mutex<Result<String, String>>,
    pub fail_writes: Mutex<bool>,
    pub data_dir: PathBuf,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            files: Mutex::new(HashMap::new()),
            git: Mutex::new(Ok(GIT_LOG.to_string())),
            fail_writes: Mutex::new(false),
            data_dir: std::env::temp_dir().join(format!("todotab-test-{}", unique())),
        })
    }

    pub fn put(&self, path: &str, text: &str) {
        self.files.lock().unwrap().insert(PathBuf::from(path), text.to_string());
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }
}

impl Host for FakeHost {
    fn read_text_file(&self, path: &Path) -> Result<String, HostError> {
        self.get(path).ok_or_else(|| HostError::NotFound(path.to_path_buf()))
    }

    fn write_text_file(&self, path: &Path, text: &str) -> Result<(), HostError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(HostError::PermissionDenied(path.to_path_buf()));
        }
        self.files.lock().unwrap().insert(path.to_path_buf(), text.to_string());
        Ok(())
    }

    fn autosave_dir(&self) -> Result<PathBuf, HostError> {
        std::fs::create_dir_all(&self.data_dir).map_err(|e| HostError::from_io(&self.data_dir, e))?;
        Ok(self.data_dir.clone())
    }

    fn git_log(&self) -> Result<String, HostError> {
        self.git.lock().unwrap().clone().map_err(|_| HostError::ToolUnavailable("git".to_string()))
    }
}

fn unique() -> String {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    format!("{}-{}", std::process::id(), COUNTER.fetch_add(1, Ordering::SeqCst))
}
