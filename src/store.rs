//! Loading, editing and exporting the phased task document.
//!
//! All operations are pure: [`toggle`] hands back a fresh [`Document`] and
//! leaves persistence to the caller (see [`crate::autosave`]).

use serde_json::Value;
use crate::error::StoreError;
use crate::models::{Document, TaskEntry};

/// Parses `source` as a task document. The top-level value must be an array.
pub fn load(source: &str) -> Result<Document, StoreError> {
    let value: Value = serde_json::from_str(source).map_err(StoreError::Json)?;
    if !value.is_array() {
        return Err(StoreError::NotAnArray(json_kind(&value)));
    }
    serde_json::from_value(value).map_err(StoreError::InvalidShape)
}

/// Returns a copy of `document` with the `done` flag of one task flipped.
pub fn toggle(document: &Document, phase: usize, task: usize) -> Result<Document, StoreError> {
    let mut next = document.clone();
    let entry = next
        .phases
        .get_mut(phase)
        .and_then(|p| p.tasks.get_mut(task))
        .ok_or(StoreError::OutOfRange { phase, task })?;
    entry.done = !entry.done;
    Ok(next)
}

/// Share of finished tasks, rounded half up. An empty list counts as 0%.
pub fn percent(tasks: &[TaskEntry]) -> u8 {
    ratio(tasks.iter().filter(|t| t.done).count(), tasks.len())
}

/// Progress over every task of every phase.
pub fn document_percent(document: &Document) -> u8 {
    ratio(document.done_count(), document.task_count())
}

fn ratio(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((200 * done + total) / (2 * total)).min(100) as u8
}

/// Serializes the document as JSON with two-space indentation.
pub fn export(document: &Document) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec_pretty(document).map_err(StoreError::Serialize)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
