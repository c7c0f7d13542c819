//! Background write-back of the task document.
//!
//! A single writer task owns the autosave file. Snapshots are written in the
//! order they were submitted; when several are queued only the newest one is
//! written. Each write reports a [`SaveOutcome`] back to the UI.

use std::path::PathBuf;
use std::sync::Arc;
use chrono::{DateTime, Local};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};
use tracing::{info, warn};
use crate::error::HostError;
use crate::host::Host;
use crate::models::Document;

#[derive(Debug)]
pub struct SaveOutcome {
    pub path: PathBuf,
    pub result: Result<(), HostError>,
    pub at: DateTime<Local>,
}

pub struct Autosaver {
    path: PathBuf,
    snapshots: UnboundedSender<String>,
    outcomes: UnboundedReceiver<SaveOutcome>,
    writer: JoinHandle<()>,
}

impl Autosaver {
    pub fn spawn(rt: &Handle, host: Arc<dyn Host>, path: PathBuf) -> Self {
        let (snapshots, mut rx) = mpsc::unbounded_channel::<String>();
        let (tx, outcomes) = mpsc::unbounded_channel();
        let target = path.clone();

        let writer = rt.spawn(async move {
            while let Some(mut text) = rx.recv().await {
                // Coalesce to the newest pending snapshot
                while let Ok(newer) = rx.try_recv() {
                    text = newer;
                }
                let host = host.clone();
                let write_path = target.clone();
                let result = tokio::task::spawn_blocking(move || host.write_text_file(&write_path, &text))
                    .await
                    .unwrap_or_else(|e| {
                        Err(HostError::Io { path: target.clone(), source: std::io::Error::other(e) })
                    });
                match &result {
                    Ok(()) => info!(path = %target.display(), "autosaved document"),
                    Err(e) => warn!(path = %target.display(), error = %e, "autosave failed"),
                }
                let outcome = SaveOutcome { path: target.clone(), result, at: Local::now() };
                if tx.send(outcome).is_err() {
                    break;
                }
            }
        });

        Self { path, snapshots, outcomes, writer }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Queues a full snapshot of `document`. Never blocks.
    pub fn save(&self, document: &Document) -> Result<(), HostError> {
        let text = serde_json::to_string_pretty(document)?;
        self.snapshots.send(text).map_err(|_| HostError::Io {
            path: self.path.clone(),
            source: std::io::Error::other("autosave writer has stopped"),
        })
    }

    /// Drains finished writes without waiting.
    pub fn poll(&mut self) -> Vec<SaveOutcome> {
        let mut done = Vec::new();
        loop {
            match self.outcomes.try_recv() {
                Ok(outcome) => done.push(outcome),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        done
    }

    /// Waits for the next finished write.
    pub async fn next_outcome(&mut self) -> Option<SaveOutcome> {
        self.outcomes.recv().await
    }

    /// Stops accepting snapshots and waits until the queued ones are on disk.
    pub async fn flush(self) -> Vec<SaveOutcome> {
        let Autosaver { snapshots, mut outcomes, writer, .. } = self;
        drop(snapshots);
        let _ = writer.await;
        let mut done = Vec::new();
        while let Ok(outcome) = outcomes.try_recv() {
            done.push(outcome);
        }
        done
    }
}
