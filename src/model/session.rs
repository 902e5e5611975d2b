use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend-issued proof of identity.
///
/// The client only reads `user_id` (to scope queries) and whether a session
/// exists at all (for routing). Tokens are carried so requests can be
/// authorized and the session refreshed when it expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// When the access token stops being accepted
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Whether a user is signed in, for routing decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Unauthenticated,
}

impl AuthState {
    pub fn of(session: Option<&Session>) -> AuthState {
        match session {
            Some(_) => AuthState::Authenticated,
            None => AuthState::Unauthenticated,
        }
    }
}

/// A change in session state, announced to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut,
    TokenRefreshed(Session),
}

impl SessionEvent {
    /// The session in effect after this event
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionEvent::SignedIn(s) | SessionEvent::TokenRefreshed(s) => Some(s),
            SessionEvent::SignedOut => None,
        }
    }
}
