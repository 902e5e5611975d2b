use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Format used for due dates on the wire and in forms
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Task progress state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    #[serde(rename = "inprogress")]
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// The value stored in the `status` column
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "inprogress",
            TaskStatus::Done => "done",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "To-Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    /// Next status in the select list, wrapping around
    pub fn next(self) -> TaskStatus {
        match self {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Todo,
        }
    }

    /// Previous status in the select list, wrapping around
    pub fn prev(self) -> TaskStatus {
        match self {
            TaskStatus::Todo => TaskStatus::Done,
            TaskStatus::InProgress => TaskStatus::Todo,
            TaskStatus::Done => TaskStatus::InProgress,
        }
    }

    /// Decode a stored status. Missing or unrecognised values fall back to `todo`.
    pub fn from_stored(value: Option<&str>) -> TaskStatus {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid status '{0}' (expected todo, inprogress or done)")]
pub struct ParseStatusError(String);

impl FromStr for TaskStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(TaskStatus::Todo),
            "inprogress" | "in-progress" | "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(TaskStatus::from_stored(raw.as_deref()))
    }
}

/// A task as held by the task store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Backend-assigned identifier
    pub id: String,
    pub title: String,
    /// Empty when the task has no description
    pub description: String,
    pub status: TaskStatus,
    /// Calendar date, `YYYY-MM-DD`
    pub due_date: String,
}

impl Task {
    /// The editable fields of this task
    pub fn draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            due_date: self.due_date.clone(),
        }
    }

    /// A copy of this task with the draft's fields and the same id
    pub fn with_draft(&self, draft: TaskDraft) -> Task {
        Task {
            id: self.id.clone(),
            title: draft.title,
            description: draft.description,
            status: draft.status,
            due_date: draft.due_date,
        }
    }

    /// Due date parsed as a calendar date, if well-formed
    pub fn due(&self) -> Option<NaiveDate> {
        parse_date(&self.due_date)
    }
}

/// The four editable fields of a task, without its id
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: String,
}

/// Which tasks the list view shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    /// Filter bar order
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Only(TaskStatus::Todo),
        StatusFilter::Only(TaskStatus::InProgress),
        StatusFilter::Only(TaskStatus::Done),
    ];

    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => task.status == status,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(status) => status.label(),
        }
    }

    /// Filter from a `--status` argument; `all` is the passthrough
    pub fn parse(s: &str) -> Result<StatusFilter, ParseStatusError> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

/// Apply a filter, keeping fetch order
pub fn filter_tasks(tasks: &[Task], filter: StatusFilter) -> Vec<&Task> {
    tasks.iter().filter(|t| filter.matches(t)).collect()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Format a stored due date like `Jun 1, 2024`. Unparseable dates are returned as stored.
pub fn format_due_date(s: &str) -> String {
    match parse_date(s) {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => s.to_string(),
    }
}
