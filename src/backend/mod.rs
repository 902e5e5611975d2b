//! The hosted auth/database service, seen from the client.
//!
//! [`Backend`] is the whole surface the application consumes: session lookup
//! and change notifications, sign-in/up/out, and four row operations on the
//! task table. [`RestBackend`] talks to the real service; [`MemoryBackend`]
//! keeps everything in-process and backs the test suite.

pub mod memory;
pub mod rest;

use std::sync::mpsc::{self, Receiver, Sender};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{Session, SessionEvent, Task, TaskDraft, TaskStatus};

pub use memory::MemoryBackend;
pub use rest::RestBackend;

/// Failure of a backend call. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The service answered and refused (bad credentials, constraint, missing row)
    #[error("{message}")]
    Rejected { status: Option<u16>, message: String },
    /// The request never got an answer
    #[error("network error: {0}")]
    Transport(String),
    /// The answer could not be understood
    #[error("unexpected response: {0}")]
    Decode(String),
    /// A call that needs a session was made without one
    #[error("not logged in")]
    NotAuthenticated,
}

impl BackendError {
    pub fn rejected(message: impl Into<String>) -> Self {
        BackendError::Rejected {
            status: None,
            message: message.into(),
        }
    }
}

/// A task row as stored by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    pub due_date: String,
    pub user_id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// Map to the store's shape: missing description becomes empty
    pub fn into_task(self) -> Task {
        Task {
            id: self.id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            status: self.status,
            due_date: self.due_date,
        }
    }
}

/// Row ids may be text (uuid) or integer columns; both are kept as strings.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid task id: {other}"))),
    }
}

/// Insert payload: a row without backend-assigned columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTaskRecord {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub due_date: String,
    pub user_id: String,
}

impl NewTaskRecord {
    pub fn from_draft(draft: TaskDraft, user_id: &str) -> Self {
        NewTaskRecord {
            title: draft.title,
            description: draft.description,
            status: draft.status,
            due_date: draft.due_date,
            user_id: user_id.to_string(),
        }
    }
}

/// Everything the application asks of the hosted service
pub trait Backend {
    /// Current session, if any. A failed check reads as no session.
    fn get_session(&mut self) -> Option<Session>;

    /// Receive every later sign-in, sign-out and token refresh
    fn subscribe(&mut self) -> Receiver<SessionEvent>;

    fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, BackendError>;

    /// Create an account. Returns a session when the service signs the new
    /// user in straight away (no email confirmation step).
    fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Option<Session>, BackendError>;

    fn sign_out(&mut self) -> Result<(), BackendError>;

    /// All tasks of `user_id`, newest first
    fn list_tasks(&mut self, user_id: &str) -> Result<Vec<TaskRecord>, BackendError>;

    fn insert_task(&mut self, record: NewTaskRecord) -> Result<TaskRecord, BackendError>;

    fn update_task(&mut self, id: &str, fields: &TaskDraft) -> Result<(), BackendError>;

    fn delete_task(&mut self, id: &str) -> Result<(), BackendError>;
}

/// Fan-out of session events to subscribers. Closed receivers are dropped.
#[derive(Debug, Default)]
pub struct SessionHub {
    subscribers: Vec<Sender<SessionEvent>>,
}

impl SessionHub {
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, event: SessionEvent) {
        tracing::info!(?event, "session change");
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_maps_missing_fields() {
        let json = r#"{
            "id": "7",
            "title": "Buy milk",
            "description": null,
            "due_date": "2024-06-01",
            "user_id": "u-1",
            "created_at": "2024-05-30T10:00:00+00:00"
        }"#;
        let record: TaskRecord = serde_json::from_str(json).unwrap();
        let task = record.into_task();
        assert_eq!(task.description, "");
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.id, "7");
    }

    #[test]
    fn record_accepts_numeric_id() {
        let json = r#"{"id": 12, "title": "t", "status": "done", "due_date": "2024-06-01", "user_id": "u"}"#;
        let record: TaskRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "12");
        assert_eq!(record.status, TaskStatus::Done);
        assert!(record.created_at.is_none());
    }

    #[test]
    fn new_record_carries_owner() {
        let draft = TaskDraft {
            title: "Buy milk".into(),
            description: String::new(),
            status: TaskStatus::Todo,
            due_date: "2024-06-01".into(),
        };
        let record = NewTaskRecord::from_draft(draft, "u-1");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["user_id"], "u-1");
        assert_eq!(value["status"], "todo");
        assert!(value.get("id").is_none());
    }

    #[test]
    fn hub_drops_closed_subscribers() {
        let mut hub = SessionHub::default();
        let kept = hub.subscribe();
        drop(hub.subscribe());
        hub.publish(SessionEvent::SignedOut);
        assert_eq!(hub.subscribers.len(), 1);
        assert_eq!(kept.try_recv().unwrap(), SessionEvent::SignedOut);
    }

    #[test]
    fn rejected_displays_message_verbatim() {
        let err = BackendError::rejected("Invalid login credentials");
        assert_eq!(err.to_string(), "Invalid login credentials");
    }
}
