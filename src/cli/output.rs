use serde::Serialize;

use crate::model::{Config, Session, Task, TaskStatus, format_due_date};
use crate::ops::auth_ops::PasswordStrength;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: String,
}

#[derive(Serialize)]
pub struct SessionJson {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

#[derive(Serialize)]
pub struct StrengthJson {
    pub strength: Option<&'static str>,
    pub percent: u16,
}

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        status: task.status,
        due_date: task.due_date.clone(),
    }
}

pub fn session_to_json(session: &Session) -> SessionJson {
    SessionJson {
        user_id: session.user_id.clone(),
        email: session.email.clone(),
        expires_at: session.expires_at.map(|t| t.to_rfc3339()),
    }
}

pub fn strength_to_json(strength: Option<PasswordStrength>) -> StrengthJson {
    StrengthJson {
        strength: strength.map(|s| s.label()),
        percent: strength.map_or(0, |s| s.percent()),
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

fn status_char(status: TaskStatus) -> char {
    match status {
        TaskStatus::Todo => ' ',
        TaskStatus::InProgress => '>',
        TaskStatus::Done => 'x',
    }
}

/// `[>] 12 Buy milk (due Jun 1, 2024)`
pub fn format_task_line(task: &Task) -> String {
    format!(
        "[{}] {} {} (due {})",
        status_char(task.status),
        task.id,
        task.title,
        format_due_date(&task.due_date)
    )
}

/// Task line plus the description, indented, when there is one
pub fn format_task_entry(task: &Task) -> Vec<String> {
    let mut lines = vec![format_task_line(task)];
    for line in task.description.lines() {
        lines.push(format!("    {line}"));
    }
    lines
}

/// Mask all but the last four characters of a key
pub fn redact_key(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}

/// Config as TOML with the API key masked
pub fn format_config(config: &Config) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    shown.backend.anon_key = redact_key(&shown.backend.anon_key);
    toml::to_string_pretty(&shown)
}
