use crate::backend::Backend;
use crate::model::{AuthState, Session};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Signup,
    Tasks,
}

/// Where the gate sends the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Stay on the current screen
    Stay,
    /// Go to the login screen
    ToLogin,
    /// Go to the task list and load tasks for this user
    ToTasks { user_id: String },
}

/// The routing rule, applied on entry and on every session change.
///
/// Unauthenticated users may only see Login/Signup; authenticated users are
/// moved off Login/Signup to their tasks.
pub fn route(session: Option<&Session>, current: Screen) -> Route {
    match (AuthState::of(session), current) {
        (AuthState::Unauthenticated, Screen::Tasks) => Route::ToLogin,
        (AuthState::Unauthenticated, _) => Route::Stay,
        (AuthState::Authenticated, Screen::Login | Screen::Signup) => Route::ToTasks {
            user_id: session.map(|s| s.user_id.clone()).unwrap_or_default(),
        },
        (AuthState::Authenticated, Screen::Tasks) => Route::Stay,
    }
}

/// Ask the backend for the session and route. A failed check is "no session".
pub fn check(backend: &mut dyn Backend, current: Screen) -> Route {
    let session = backend.get_session();
    let decision = route(session.as_ref(), current);
    tracing::debug!(?current, ?decision, "session gate");
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    fn session() -> Session {
        Session {
            user_id: "u-1".into(),
            email: None,
            access_token: "t".into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    #[test]
    fn routing_table() {
        let s = session();
        let to_tasks = Route::ToTasks {
            user_id: "u-1".into(),
        };

        assert_eq!(route(None, Screen::Tasks), Route::ToLogin);
        assert_eq!(route(None, Screen::Login), Route::Stay);
        assert_eq!(route(None, Screen::Signup), Route::Stay);
        assert_eq!(route(Some(&s), Screen::Login), to_tasks);
        assert_eq!(route(Some(&s), Screen::Signup), to_tasks);
        assert_eq!(route(Some(&s), Screen::Tasks), Route::Stay);
    }

    #[test]
    fn check_uses_backend_session() {
        let mut backend = MemoryBackend::new().with_account("a@b.com", "secret1");
        assert_eq!(check(&mut backend, Screen::Tasks), Route::ToLogin);

        let mut backend = backend.signed_in_as("a@b.com");
        assert_eq!(
            check(&mut backend, Screen::Login),
            Route::ToTasks {
                user_id: "user-1".into()
            }
        );

        backend.expire_session();
        assert_eq!(check(&mut backend, Screen::Tasks), Route::ToLogin);
    }
}
