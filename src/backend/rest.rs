use std::sync::mpsc::Receiver;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Backend, BackendError, NewTaskRecord, SessionHub, TaskRecord};
use crate::io::session_store::SessionStore;
use crate::model::{BackendConfig, Session, SessionEvent, TaskDraft};

/// Client for a Supabase-style hosted service: `/auth/v1` for accounts and
/// sessions, `/rest/v1/<table>` for rows.
pub struct RestBackend {
    base_url: String,
    anon_key: String,
    table: String,
    agent: ureq::Agent,
    session: Option<Session>,
    store: Option<SessionStore>,
    hub: SessionHub,
}

/// Body of a successful token grant
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: UserResponse,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = match (self.expires_at, self.expires_in) {
            (Some(at), _) => DateTime::from_timestamp(at, 0),
            (None, Some(secs)) => Some(now + chrono::Duration::seconds(secs)),
            (None, None) => None,
        };
        Session {
            user_id: self.user.id,
            email: self.user.email,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
        }
    }
}

impl RestBackend {
    pub fn new(config: &BackendConfig, store: Option<SessionStore>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build();
        let session = store.as_ref().and_then(SessionStore::load);
        RestBackend {
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            table: config.table.clone(),
            agent,
            session,
            store,
            hub: SessionHub::default(),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rows_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn request(&self, method: &str, url: &str, token: Option<&str>) -> ureq::Request {
        let bearer = format!("Bearer {}", token.unwrap_or(&self.anon_key));
        self.agent
            .request(method, url)
            .set("apikey", &self.anon_key)
            .set("Authorization", &bearer)
            .set("Content-Type", "application/json")
    }

    /// Replace the held session, persist it, and announce the change
    fn set_session(&mut self, session: Option<Session>, event: SessionEvent) {
        if let Some(store) = &self.store {
            let result = match &session {
                Some(s) => store.save(s),
                None => store.clear(),
            };
            if let Err(e) = result {
                tracing::warn!(error = %e, "could not persist session");
            }
        }
        self.session = session;
        self.hub.publish(event);
    }

    fn grant(&self, grant_type: &str, body: Value) -> Result<Session, BackendError> {
        let url = self.auth_url("token");
        tracing::debug!(%url, grant_type, "token request");
        let response = self
            .request("POST", &url, None)
            .query("grant_type", grant_type)
            .send_json(body)
            .map_err(map_ureq_error)?;
        let token: TokenResponse = read_json(response)?;
        Ok(token.into_session(Utc::now()))
    }

    /// The session to authorize row calls with, refreshed if it has expired
    fn active_session(&mut self) -> Result<Session, BackendError> {
        self.get_session().ok_or(BackendError::NotAuthenticated)
    }

    /// Rows touched by a PATCH/DELETE; none means the id did not match
    fn expect_rows(response: ureq::Response) -> Result<(), BackendError> {
        let rows: Vec<Value> = read_json(response)?;
        if rows.is_empty() {
            return Err(BackendError::rejected("Task not found"));
        }
        Ok(())
    }
}

impl Backend for RestBackend {
    fn get_session(&mut self) -> Option<Session> {
        let session = self.session.clone()?;
        if !session.is_expired(Utc::now()) {
            return Some(session);
        }
        let refreshed = session.refresh_token.as_deref().map(|token| {
            self.grant("refresh_token", json!({ "refresh_token": token }))
        });
        match refreshed {
            Some(Ok(fresh)) => {
                self.set_session(Some(fresh.clone()), SessionEvent::TokenRefreshed(fresh.clone()));
                Some(fresh)
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "session refresh failed");
                self.set_session(None, SessionEvent::SignedOut);
                None
            }
            None => {
                self.set_session(None, SessionEvent::SignedOut);
                None
            }
        }
    }

    fn subscribe(&mut self) -> Receiver<SessionEvent> {
        self.hub.subscribe()
    }

    fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, BackendError> {
        let session = self.grant("password", json!({ "email": email, "password": password }))?;
        self.set_session(Some(session.clone()), SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Option<Session>, BackendError> {
        let url = self.auth_url("signup");
        tracing::debug!(%url, "signup request");
        let response = self
            .request("POST", &url, None)
            .send_json(json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name },
            }))
            .map_err(map_ureq_error)?;
        let body: Value = read_json(response)?;
        // Without an access token the account awaits email confirmation.
        if body.get("access_token").is_none() {
            return Ok(None);
        }
        let token: TokenResponse =
            serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))?;
        let session = token.into_session(Utc::now());
        self.set_session(Some(session.clone()), SessionEvent::SignedIn(session.clone()));
        Ok(Some(session))
    }

    fn sign_out(&mut self) -> Result<(), BackendError> {
        if let Some(session) = self.session.clone() {
            let url = self.auth_url("logout");
            if let Err(e) = self
                .request("POST", &url, Some(&session.access_token))
                .call()
                .map_err(map_ureq_error)
            {
                // The local session is dropped regardless.
                tracing::warn!(error = %e, "logout request failed");
            }
        }
        self.set_session(None, SessionEvent::SignedOut);
        Ok(())
    }

    fn list_tasks(&mut self, user_id: &str) -> Result<Vec<TaskRecord>, BackendError> {
        let session = self.active_session()?;
        let url = self.rows_url();
        tracing::debug!(%url, user_id, "list tasks");
        let response = self
            .request("GET", &url, Some(&session.access_token))
            .query("select", "*")
            .query("user_id", &format!("eq.{user_id}"))
            .query("order", "created_at.desc")
            .call()
            .map_err(map_ureq_error)?;
        read_json(response)
    }

    fn insert_task(&mut self, record: NewTaskRecord) -> Result<TaskRecord, BackendError> {
        let session = self.active_session()?;
        let url = self.rows_url();
        tracing::debug!(%url, title = %record.title, "insert task");
        let response = self
            .request("POST", &url, Some(&session.access_token))
            .set("Prefer", "return=representation")
            .send_json(&record)
            .map_err(map_ureq_error)?;
        let mut rows: Vec<TaskRecord> = read_json(response)?;
        if rows.is_empty() {
            return Err(BackendError::Decode("insert returned no row".into()));
        }
        Ok(rows.swap_remove(0))
    }

    fn update_task(&mut self, id: &str, fields: &TaskDraft) -> Result<(), BackendError> {
        let session = self.active_session()?;
        let url = self.rows_url();
        tracing::debug!(%url, id, "update task");
        let response = self
            .request("PATCH", &url, Some(&session.access_token))
            .set("Prefer", "return=representation")
            .query("id", &format!("eq.{id}"))
            .send_json(json!({
                "title": fields.title,
                "description": fields.description,
                "status": fields.status,
                "due_date": fields.due_date,
            }))
            .map_err(map_ureq_error)?;
        Self::expect_rows(response)
    }

    fn delete_task(&mut self, id: &str) -> Result<(), BackendError> {
        let session = self.active_session()?;
        let url = self.rows_url();
        tracing::debug!(%url, id, "delete task");
        let response = self
            .request("DELETE", &url, Some(&session.access_token))
            .set("Prefer", "return=representation")
            .query("id", &format!("eq.{id}"))
            .call()
            .map_err(map_ureq_error)?;
        Self::expect_rows(response)
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(response: ureq::Response) -> Result<T, BackendError> {
    let body = response
        .into_string()
        .map_err(|e| BackendError::Transport(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
}

fn map_ureq_error(err: ureq::Error) -> BackendError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            let message = error_message(code, &body);
            tracing::warn!(status = code, %message, "request rejected");
            BackendError::Rejected {
                status: Some(code),
                message,
            }
        }
        ureq::Error::Transport(t) => BackendError::Transport(t.to_string()),
    }
}

/// The human-readable message of an error body. The auth and row endpoints
/// use different field names, so the first one present wins.
pub fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["msg", "error_description", "message", "error"] {
            if let Some(text) = value.get(key).and_then(Value::as_str)
                && !text.is_empty()
            {
                return text.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("request failed with status {status}")
    } else {
        trimmed.to_string()
    }
}
