use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use tracing::warn;
use crate::error::HostError;
use crate::host::atomic_write;
use crate::models::Tab;

pub const UI_STATE_FILE: &str = "ui-state.json";

/// View preferences that survive restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiState {
    pub active_tab: Tab,
    /// Collapsed phases as `(position, name)`, so same-named phases fold independently.
    pub collapsed: BTreeSet<(usize, String)>,
    pub last_opened: Option<PathBuf>,
}

impl UiState {
    pub fn is_collapsed(&self, index: usize, phase: &str) -> bool {
        self.collapsed.contains(&(index, phase.to_string()))
    }

    /// Flips the collapsed flag of the phase at `index`, returning the new value.
    pub fn toggle_collapsed(&mut self, index: usize, phase: &str) -> bool {
        let key = (index, phase.to_string());
        if self.collapsed.remove(&key) {
            false
        } else {
            self.collapsed.insert(key);
            true
        }
    }
}

pub struct UiStateStore {
    path: PathBuf,
}

impl UiStateStore {
    pub fn new(data_dir: &Path) -> Self {
        Self { path: data_dir.join(UI_STATE_FILE) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> UiState {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(_) => return UiState::default(),
        };
        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring unreadable ui state");
            UiState::default()
        })
    }

    pub fn save(&self, state: &UiState) -> Result<(), HostError> {
        let text = serde_json::to_vec_pretty(state)?;
        atomic_write(&self.path, &text)
    }
}
