use std::sync::mpsc::Receiver;

use chrono::{DateTime, Duration, Utc};

use super::{Backend, BackendError, NewTaskRecord, SessionHub, TaskRecord};
use crate::model::{Session, SessionEvent, TaskDraft};

#[derive(Debug, Clone)]
struct Account {
    user_id: String,
    email: String,
    password: String,
    full_name: String,
}

/// In-process backend with the same contract as the hosted service.
///
/// Rows are scoped per user, ids are sequential, and `created_at` advances
/// one second per insert so newest-first ordering is deterministic.
#[derive(Debug)]
pub struct MemoryBackend {
    accounts: Vec<Account>,
    rows: Vec<TaskRecord>,
    session: Option<Session>,
    hub: SessionHub,
    next_id: u64,
    clock: DateTime<Utc>,
    /// Every call made, by operation name
    pub calls: Vec<&'static str>,
    /// When set, the next call fails with this rejection
    pub fail_next: Option<String>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        MemoryBackend {
            accounts: Vec::new(),
            rows: Vec::new(),
            session: None,
            hub: SessionHub::default(),
            next_id: 1,
            clock: DateTime::from_timestamp(1_717_200_000, 0).unwrap_or_default(),
            calls: Vec::new(),
            fail_next: None,
        }
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account without going through sign-up
    pub fn with_account(mut self, email: &str, password: &str) -> Self {
        let user_id = format!("user-{}", self.accounts.len() + 1);
        self.accounts.push(Account {
            user_id,
            email: email.to_string(),
            password: password.to_string(),
            full_name: String::new(),
        });
        self
    }

    /// Start with `email` already signed in
    pub fn signed_in_as(mut self, email: &str) -> Self {
        if let Some(account) = self.accounts.iter().find(|a| a.email == email) {
            self.session = Some(session_for(account));
        }
        self
    }

    pub fn full_name(&self, email: &str) -> Option<&str> {
        self.accounts
            .iter()
            .find(|a| a.email == email)
            .map(|a| a.full_name.as_str())
    }

    /// Drop the session without announcing it, as if it expired server-side
    pub fn expire_session(&mut self) {
        self.session = None;
    }

    fn record(&mut self, call: &'static str) -> Result<(), BackendError> {
        self.calls.push(call);
        match self.fail_next.take() {
            Some(message) => Err(BackendError::rejected(message)),
            None => Ok(()),
        }
    }

    fn require_session(&self) -> Result<&Session, BackendError> {
        self.session.as_ref().ok_or(BackendError::NotAuthenticated)
    }

    fn owned_row_mut(&mut self, id: &str) -> Result<&mut TaskRecord, BackendError> {
        let user_id = self.require_session()?.user_id.clone();
        self.rows
            .iter_mut()
            .find(|r| r.id == id && r.user_id == user_id)
            .ok_or_else(|| BackendError::rejected("Task not found"))
    }
}

fn session_for(account: &Account) -> Session {
    Session {
        user_id: account.user_id.clone(),
        email: Some(account.email.clone()),
        access_token: format!("token-{}", account.user_id),
        refresh_token: None,
        expires_at: None,
    }
}

impl Backend for MemoryBackend {
    fn get_session(&mut self) -> Option<Session> {
        self.calls.push("get_session");
        self.session.clone()
    }

    fn subscribe(&mut self) -> Receiver<SessionEvent> {
        self.hub.subscribe()
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, BackendError> {
        self.record("sign_in")?;
        let account = self
            .accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
            .ok_or_else(|| BackendError::rejected("Invalid login credentials"))?;
        let session = session_for(account);
        self.session = Some(session.clone());
        self.hub.publish(SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Option<Session>, BackendError> {
        self.record("sign_up")?;
        if self.accounts.iter().any(|a| a.email == email) {
            return Err(BackendError::rejected("User already registered"));
        }
        let account = Account {
            user_id: format!("user-{}", self.accounts.len() + 1),
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
        };
        let session = session_for(&account);
        self.accounts.push(account);
        self.session = Some(session.clone());
        self.hub.publish(SessionEvent::SignedIn(session.clone()));
        Ok(Some(session))
    }

    fn sign_out(&mut self) -> Result<(), BackendError> {
        self.record("sign_out")?;
        self.session = None;
        self.hub.publish(SessionEvent::SignedOut);
        Ok(())
    }

    fn list_tasks(&mut self, user_id: &str) -> Result<Vec<TaskRecord>, BackendError> {
        self.record("list_tasks")?;
        self.require_session()?;
        let mut rows: Vec<TaskRecord> = self
            .rows
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    fn insert_task(&mut self, record: NewTaskRecord) -> Result<TaskRecord, BackendError> {
        self.record("insert_task")?;
        let owner = self.require_session()?.user_id.clone();
        if record.user_id != owner {
            return Err(BackendError::rejected(
                "new row violates row-level security policy for table \"tasks\"",
            ));
        }
        if record.title.is_empty() {
            return Err(BackendError::rejected(
                "null value in column \"title\" violates not-null constraint",
            ));
        }
        self.clock += Duration::seconds(1);
        let row = TaskRecord {
            id: self.next_id.to_string(),
            title: record.title,
            description: Some(record.description),
            status: record.status,
            due_date: record.due_date,
            user_id: record.user_id,
            created_at: Some(self.clock),
        };
        self.next_id += 1;
        self.rows.push(row.clone());
        Ok(row)
    }

    fn update_task(&mut self, id: &str, fields: &TaskDraft) -> Result<(), BackendError> {
        self.record("update_task")?;
        let row = self.owned_row_mut(id)?;
        row.title = fields.title.clone();
        row.description = Some(fields.description.clone());
        row.status = fields.status;
        row.due_date = fields.due_date.clone();
        Ok(())
    }

    fn delete_task(&mut self, id: &str) -> Result<(), BackendError> {
        self.record("delete_task")?;
        self.owned_row_mut(id)?;
        self.rows.retain(|r| r.id != id);
        Ok(())
    }
}
