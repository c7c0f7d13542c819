use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::Context;
use tokio::runtime::Handle;
use tracing::{info, warn};
use crate::autosave::Autosaver;
use crate::error::HostError;
use crate::git::parse_git_log;
use crate::host::{resolve_user_path, Host};
use crate::models::{CommitRecord, Document, Row, StatusMessage, Tab};
use crate::state::{UiState, UiStateStore};
use crate::store;

/// Everything the terminal UI renders and mutates.
pub struct App {
    host: Arc<dyn Host>,
    autosaver: Autosaver,
    state_store: UiStateStore,
    export_path: PathBuf,
    pub document: Option<Document>,
    /// File the current document was opened from.
    pub source: Option<PathBuf>,
    pub commits: Vec<CommitRecord>,
    pub git_error: Option<String>,
    git_loaded: bool,
    pub ui: UiState,
    pub cursor: usize,
    pub commit_cursor: usize,
    pub status: Option<StatusMessage>,
    /// Buffer of the "open file" prompt while it is shown.
    pub prompt: Option<String>,
}

impl App {
    pub fn new(
        rt: &Handle,
        host: Arc<dyn Host>,
        autosave_file: &str,
        export_path: PathBuf,
    ) -> Result<Self, HostError> {
        let data_dir = host.autosave_dir()?;
        let state_store = UiStateStore::new(&data_dir);
        let ui = state_store.load();
        let autosaver = Autosaver::spawn(rt, host.clone(), data_dir.join(autosave_file));

        Ok(Self {
            host,
            autosaver,
            state_store,
            export_path,
            document: None,
            source: None,
            commits: Vec::new(),
            git_error: None,
            git_loaded: false,
            ui,
            cursor: 0,
            commit_cursor: 0,
            status: None,
            prompt: None,
        })
    }

    /// Picks the initial document: an explicit path, then the autosave, then the last opened file.
    pub fn startup(&mut self, path: Option<&Path>, restore_autosave: bool) {
        if let Some(path) = path {
            self.open_document(path);
        } else if !(restore_autosave && self.restore_autosave()) {
            if let Some(last) = self.ui.last_opened.clone() {
                self.open_document(&last);
            }
        }
        if self.ui.active_tab == Tab::Git {
            self.refresh_git_log();
        }
    }

    /// Loads the autosave file if there is one. Returns whether a document was restored.
    pub fn restore_autosave(&mut self) -> bool {
        let path = self.autosaver.path().clone();
        let text = match self.host.read_text_file(&path) {
            Ok(text) => text,
            Err(HostError::NotFound(_)) => return false,
            Err(e) => {
                self.status = Some(StatusMessage::error(format!("Could not read autosave: {e}")));
                return false;
            }
        };
        match store::load(&text) {
            Ok(doc) => {
                info!(path = %path.display(), phases = doc.phases.len(), "restored autosave");
                let source = self.ui.last_opened.clone();
                self.replace_document(doc, source);
                self.status = Some(StatusMessage::info("Restored autosaved document"));
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "autosave is unreadable");
                self.status = Some(StatusMessage::error(format!("Autosave ignored: {e}")));
                false
            }
        }
    }

    /// Replaces the current document with the one at `path`. On failure the
    /// previous document stays on screen and the error goes to the status line.
    pub fn open_document(&mut self, path: &Path) -> bool {
        match self.read_document(path) {
            Ok(doc) => {
                info!(path = %path.display(), phases = doc.phases.len(), "opened document");
                self.status = Some(StatusMessage::info(format!(
                    "Loaded {} ({} tasks)",
                    path.display(),
                    doc.task_count()
                )));
                // The autosave always pairs with `last_opened`, so restart restores this file.
                if let Err(e) = self.autosaver.save(&doc) {
                    self.status = Some(StatusMessage::error(format!("Autosave failed: {e}")));
                }
                self.replace_document(doc, Some(path.to_path_buf()));
                self.ui.last_opened = Some(path.to_path_buf());
                self.save_ui();
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not open document");
                self.status = Some(StatusMessage::error(format!("{e:#}")));
                false
            }
        }
    }

    fn read_document(&self, path: &Path) -> anyhow::Result<Document> {
        let text = self.host.read_text_file(path)?;
        let doc = store::load(&text).with_context(|| format!("Could not load {}", path.display()))?;
        Ok(doc)
    }

    fn replace_document(&mut self, doc: Document, source: Option<PathBuf>) {
        self.document = Some(doc);
        self.source = source;
        self.cursor = 0;
    }

    pub fn reload_source(&mut self) -> bool {
        match self.source.clone() {
            Some(path) => self.open_document(&path),
            None => {
                self.status = Some(StatusMessage::error("No file to reload, press o to open one"));
                false
            }
        }
    }

    /// Flips one task and queues the new document for autosave.
    pub fn toggle_task(&mut self, phase: usize, task: usize) -> bool {
        let Some(doc) = &self.document else { return false };
        let next = match store::toggle(doc, phase, task) {
            Ok(next) => next,
            Err(e) => {
                self.status = Some(StatusMessage::error(e.to_string()));
                return false;
            }
        };
        if let Err(e) = self.autosaver.save(&next) {
            self.status = Some(StatusMessage::error(format!("Autosave failed: {e}")));
        }
        self.document = Some(next);
        true
    }

    /// Space on a task flips it; on a phase header it folds the phase.
    pub fn toggle_selected(&mut self) -> bool {
        match self.selected_row() {
            Some(Row::Task(phase, task)) => self.toggle_task(phase, task),
            Some(Row::Phase(phase)) => {
                self.toggle_collapse(phase);
                true
            }
            None => false,
        }
    }

    pub fn toggle_collapse(&mut self, phase: usize) {
        let Some(name) = self.phase_name(phase) else { return };
        self.ui.toggle_collapsed(phase, &name);
        self.cursor = self.visible_rows().iter().position(|r| *r == Row::Phase(phase)).unwrap_or(0);
        self.save_ui();
    }

    /// Folds (`collapsed = true`) or unfolds the phase under the cursor.
    pub fn set_selected_collapsed(&mut self, collapsed: bool) {
        let phase = match self.selected_row() {
            Some(Row::Phase(p)) | Some(Row::Task(p, _)) => p,
            None => return,
        };
        let is_collapsed = self.phase_name(phase).is_some_and(|n| self.ui.is_collapsed(phase, &n));
        if is_collapsed != collapsed {
            self.toggle_collapse(phase);
        }
    }

    fn phase_name(&self, phase: usize) -> Option<String> {
        self.document.as_ref()?.phases.get(phase).map(|p| p.phase.clone())
    }

    pub fn visible_rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        if let Some(doc) = &self.document {
            for (pi, phase) in doc.phases.iter().enumerate() {
                rows.push(Row::Phase(pi));
                if !self.ui.is_collapsed(pi, &phase.phase) {
                    rows.extend((0..phase.tasks.len()).map(|ti| Row::Task(pi, ti)));
                }
            }
        }
        rows
    }

    pub fn selected_row(&self) -> Option<Row> {
        self.visible_rows().get(self.cursor).copied()
    }

    pub fn move_cursor(&mut self, delta: isize) {
        match self.ui.active_tab {
            Tab::Todos => {
                let len = self.visible_rows().len();
                self.cursor = step(self.cursor, delta, len);
            }
            Tab::Git => {
                self.commit_cursor = step(self.commit_cursor, delta, self.commits.len());
            }
        }
    }

    pub fn set_tab(&mut self, tab: Tab) {
        if self.ui.active_tab != tab {
            self.ui.active_tab = tab;
            self.save_ui();
        }
        if tab == Tab::Git && !self.git_loaded {
            self.refresh_git_log();
        }
    }

    /// Re-runs `git log`. On failure the previous commits stay and the error is shown inline.
    pub fn refresh_git_log(&mut self) {
        self.git_loaded = true;
        match self.host.git_log() {
            Ok(raw) => {
                self.commits = parse_git_log(&raw);
                self.git_error = None;
                self.commit_cursor = self.commit_cursor.min(self.commits.len().saturating_sub(1));
                info!(commits = self.commits.len(), "loaded git log");
            }
            Err(e) => {
                warn!(error = %e, "git log unavailable");
                self.git_error = Some(e.to_string());
            }
        }
    }

    pub fn selected_commit(&self) -> Option<&CommitRecord> {
        self.commits.get(self.commit_cursor)
    }

    /// Writes the document as indented JSON to the export path.
    pub fn export_document(&mut self) -> bool {
        let Some(doc) = &self.document else {
            self.status = Some(StatusMessage::error("Nothing to export"));
            return false;
        };
        let result = store::export(doc)
            .map_err(anyhow::Error::from)
            .and_then(|bytes| {
                let text = String::from_utf8(bytes)?;
                self.host.write_text_file(&self.export_path, &text)?;
                Ok(())
            });
        match result {
            Ok(()) => {
                info!(path = %self.export_path.display(), "exported document");
                self.status = Some(StatusMessage::info(format!("Exported to {}", self.export_path.display())));
                true
            }
            Err(e) => {
                warn!(error = %e, "export failed");
                self.status = Some(StatusMessage::error(format!("Export failed: {e}")));
                false
            }
        }
    }

    pub fn open_prompt(&mut self) {
        let seed = self.source.as_ref().map(|p| p.display().to_string()).unwrap_or_default();
        self.prompt = Some(seed);
    }

    /// Opens the path typed into the prompt and closes it.
    pub fn submit_prompt(&mut self) -> bool {
        let Some(input) = self.prompt.take() else { return false };
        match resolve_user_path(&input) {
            Some(path) => self.open_document(&path),
            None => false,
        }
    }

    /// Moves finished autosaves into the status line.
    pub fn poll_saves(&mut self) {
        for outcome in self.autosaver.poll() {
            self.status = Some(match outcome.result {
                Ok(()) => StatusMessage::info(format!("Saved {}", outcome.at.format("%H:%M:%S"))),
                Err(e) => StatusMessage::error(format!("Autosave failed: {e}")),
            });
        }
    }

    /// Waits for queued autosaves before exit.
    pub async fn shutdown(self) {
        for outcome in self.autosaver.flush().await {
            if let Err(e) = outcome.result {
                warn!(error = %e, "final autosave failed");
            }
        }
    }

    pub fn autosave_path(&self) -> &Path {
        self.autosaver.path()
    }

    fn save_ui(&mut self) {
        if let Err(e) = self.state_store.save(&self.ui) {
            warn!(path = %self.state_store.path().display(), error = %e, "could not save ui state");
            self.status = Some(StatusMessage::error(format!("Could not save view settings: {e}")));
        }
    }
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}
