use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// One line of `git log`, reduced to what the log tab shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub message: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEntry {
    pub title: String,
    #[serde(default)]
    pub description: String,
    // Kept as a raw JSON number so `2` does not come back as `2.0` on export.
    #[serde(default = "zero_hours")]
    pub estimated_hours: Number,
    #[serde(default)]
    pub done: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskEntry {
    pub fn new(title: &str, description: &str, hours: u64, done: bool) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            estimated_hours: Number::from(hours),
            done,
            extra: Map::new(),
        }
    }

    pub fn hours(&self) -> f64 {
        self.estimated_hours.as_f64().unwrap_or(0.0)
    }
}

fn zero_hours() -> Number {
    Number::from(0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub phase: String,
    #[serde(default)]
    pub tasks: Vec<TaskEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Phase {
    pub fn new(name: &str, tasks: Vec<TaskEntry>) -> Self {
        Self { phase: name.to_string(), tasks, extra: Map::new() }
    }

    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.done).count()
    }

    pub fn total_hours(&self) -> f64 {
        self.tasks.iter().map(TaskEntry::hours).sum()
    }
}

/// The whole to-do file: a bare JSON array of phases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub phases: Vec<Phase>,
}

impl Document {
    pub fn task_count(&self) -> usize {
        self.phases.iter().map(|p| p.tasks.len()).sum()
    }

    pub fn done_count(&self) -> usize {
        self.phases.iter().map(Phase::done_count).sum()
    }

    pub fn task(&self, phase: usize, task: usize) -> Option<&TaskEntry> {
        self.phases.get(phase).and_then(|p| p.tasks.get(task))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Todos,
    Git,
}

impl Tab {
    pub fn as_index(self) -> usize {
        match self {
            Tab::Todos => 0,
            Tab::Git => 1,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Todos => Tab::Git,
            Tab::Git => Tab::Todos,
        }
    }
}

/// A row of the flattened, collapsible task list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Row {
    Phase(usize),
    Task(usize, usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Info, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: StatusKind::Error, text: text.into() }
    }
}
