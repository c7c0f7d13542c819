//! Non-interactive subcommands.

use std::fmt::Write;
use std::path::Path;
use anyhow::{Context, Result};
use tracing::info;
use crate::host::Host;
use crate::models::{CommitRecord, Document};
use crate::store;
use crate::utils::{format_hours, progress_bar};

pub fn read_document(host: &dyn Host, path: &Path) -> Result<Document> {
    let text = host.read_text_file(path)?;
    store::load(&text).with_context(|| format!("Could not load {}", path.display()))
}

/// One line per phase plus a total line.
pub fn progress_report(doc: &Document) -> String {
    let width = doc.phases.iter().map(|p| p.phase.chars().count()).max().unwrap_or(0).max(5);
    let mut out = String::new();
    for phase in &doc.phases {
        let pct = store::percent(&phase.tasks);
        let _ = writeln!(
            out,
            "{:<width$}  {} {:>3}%  {}/{}  {}",
            phase.phase,
            progress_bar(pct, 20),
            pct,
            phase.done_count(),
            phase.tasks.len(),
            format_hours(phase.total_hours()),
        );
    }
    let total = store::document_percent(doc);
    let _ = writeln!(
        out,
        "{:<width$}  {} {:>3}%  {}/{}",
        "Total",
        progress_bar(total, 20),
        total,
        doc.done_count(),
        doc.task_count(),
    );
    out
}

/// Flips one task of the file at `path` and writes the file back.
pub fn toggle_in_file(host: &dyn Host, path: &Path, phase: usize, task: usize) -> Result<bool> {
    let doc = read_document(host, path)?;
    let next = store::toggle(&doc, phase, task)?;
    let text = String::from_utf8(store::export(&next)?)?;
    host.write_text_file(path, &text)?;
    let done = next.task(phase, task).is_some_and(|t| t.done);
    info!(path = %path.display(), phase, task, done, "toggled task");
    Ok(done)
}

pub fn export_text(host: &dyn Host, path: &Path) -> Result<String> {
    let doc = read_document(host, path)?;
    Ok(String::from_utf8(store::export(&doc)?)?)
}

/// Plain-text table: Commit | Message | Date.
pub fn commit_table(commits: &[CommitRecord]) -> String {
    let hash_w = commits.iter().map(|c| c.hash.len()).max().unwrap_or(0).max("Commit".len());
    let msg_w = commits.iter().map(|c| c.message.chars().count()).max().unwrap_or(0).max("Message".len());
    let mut out = String::new();
    let _ = writeln!(out, "{:<hash_w$}  {:<msg_w$}  Date", "Commit", "Message");
    for c in commits {
        let _ = writeln!(out, "{:<hash_w$}  {:<msg_w$}  {}", c.hash, c.message, c.date);
    }
    out
}

/// Interprets a `set` value as TOML (numbers, booleans), falling back to a string.
pub fn parse_setting_value(raw: &str) -> toml::Value {
    format!("v = {raw}")
        .parse::<toml::Table>()
        .ok()
        .and_then(|mut t| t.remove("v"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()))
}
