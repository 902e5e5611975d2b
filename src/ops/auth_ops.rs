use crate::backend::{Backend, BackendError};
use crate::model::{Notification, Session};

/// Shortest password accepted by the signup form
pub const MIN_PASSWORD_LEN: usize = 6;

/// A form rejected before any backend call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter valid credentials")]
    MissingCredentials,
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
}

impl ValidationError {
    /// Notification title for this rejection
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::MissingCredentials => "Login failed",
            ValidationError::MissingFields => "Signup failed",
            ValidationError::PasswordTooShort => "Weak password",
        }
    }
}

/// Outcome of submitting an auth form
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Password strength band, shown as a hint under the signup password field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    /// Band for a password, or `None` while the field is empty
    pub fn classify(password: &str) -> Option<PasswordStrength> {
        match password.chars().count() {
            0 => None,
            1..=5 => Some(PasswordStrength::Weak),
            6..=9 => Some(PasswordStrength::Fair),
            10..=13 => Some(PasswordStrength::Good),
            _ => Some(PasswordStrength::Strong),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Fair => "Fair",
            PasswordStrength::Good => "Good",
            PasswordStrength::Strong => "Strong",
        }
    }

    /// Meter fill, 0-100
    pub fn percent(self) -> u16 {
        match self {
            PasswordStrength::Weak => 25,
            PasswordStrength::Fair => 50,
            PasswordStrength::Good => 75,
            PasswordStrength::Strong => 100,
        }
    }
}

pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(())
}

pub fn validate_signup(full_name: &str, email: &str, password: &str) -> Result<(), ValidationError> {
    if full_name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Check the form locally, then sign in
pub fn login(
    backend: &mut dyn Backend,
    email: &str,
    password: &str,
) -> Result<Session, AuthError> {
    validate_login(email, password)?;
    tracing::debug!(email, "signing in");
    Ok(backend.sign_in(email, password)?)
}

/// Check the form locally, then create the account
pub fn signup(
    backend: &mut dyn Backend,
    full_name: &str,
    email: &str,
    password: &str,
) -> Result<Option<Session>, AuthError> {
    validate_signup(full_name, email, password)?;
    tracing::debug!(email, "signing up");
    Ok(backend.sign_up(email, password, full_name)?)
}

pub fn login_notification(result: &Result<Session, AuthError>) -> Notification {
    match result {
        Ok(_) => Notification::success("Login successful!", "Welcome back to TaskFlow"),
        Err(AuthError::Invalid(e)) => Notification::failure(e.title(), e.to_string()),
        Err(AuthError::Backend(e)) => Notification::failure("Login failed", e.to_string()),
    }
}

pub fn signup_notification(result: &Result<Option<Session>, AuthError>) -> Notification {
    match result {
        Ok(Some(_)) => Notification::success("Account created!", "Welcome to TaskFlow"),
        Ok(None) => Notification::success(
            "Account created!",
            "Check your email to confirm your account, then log in",
        ),
        Err(AuthError::Invalid(e)) => Notification::failure(e.title(), e.to_string()),
        Err(AuthError::Backend(e)) => Notification::failure("Signup failed", e.to_string()),
    }
}

pub fn logout(backend: &mut dyn Backend) -> Notification {
    match backend.sign_out() {
        Ok(()) => Notification::success("Logged out", "Come back soon!"),
        Err(e) => Notification::failure("Logout failed", e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;

    #[test]
    fn strength_bands() {
        assert_eq!(PasswordStrength::classify(""), None);
        assert_eq!(PasswordStrength::classify("abcde"), Some(PasswordStrength::Weak));
        assert_eq!(PasswordStrength::classify("abcdef"), Some(PasswordStrength::Fair));
        assert_eq!(PasswordStrength::classify("abcdefghi"), Some(PasswordStrength::Fair));
        assert_eq!(PasswordStrength::classify("abcdefghij"), Some(PasswordStrength::Good));
        assert_eq!(
            PasswordStrength::classify("abcdefghijklm"),
            Some(PasswordStrength::Good)
        );
        assert_eq!(
            PasswordStrength::classify("abcdefghijklmn"),
            Some(PasswordStrength::Strong)
        );
        assert_eq!(PasswordStrength::Fair.label(), "Fair");
        assert_eq!(PasswordStrength::Strong.percent(), 100);
    }

    #[test]
    fn strength_counts_characters_not_bytes() {
        // each é is two bytes
        assert_eq!(
            PasswordStrength::classify("ééééé"),
            Some(PasswordStrength::Weak)
        );
        assert_eq!(
            PasswordStrength::classify("éééééé"),
            Some(PasswordStrength::Fair)
        );
    }

    #[test]
    fn login_with_empty_password_makes_no_call() {
        let mut backend = MemoryBackend::new().with_account("a@b.com", "secret1");
        let result = login(&mut backend, "a@b.com", "");
        assert!(matches!(
            result,
            Err(AuthError::Invalid(ValidationError::MissingCredentials))
        ));
        assert!(backend.calls.is_empty());

        let n = login_notification(&result);
        assert!(n.is_failure());
        assert_eq!(n.title, "Login failed");
    }

    #[test]
    fn login_rejection_surfaces_backend_message() {
        let mut backend = MemoryBackend::new().with_account("a@b.com", "secret1");
        let result = login(&mut backend, "a@b.com", "wrong-password");
        let n = login_notification(&result);
        assert_eq!(n.title, "Login failed");
        assert_eq!(n.description, "Invalid login credentials");
    }

    #[test]
    fn login_success() {
        let mut backend = MemoryBackend::new().with_account("a@b.com", "secret1");
        let result = login(&mut backend, "a@b.com", "secret1");
        assert!(result.is_ok());
        assert_eq!(login_notification(&result).title, "Login successful!");
        assert!(backend.get_session().is_some());
    }

    #[test]
    fn signup_short_password_rejected_locally() {
        let mut backend = MemoryBackend::new();
        let result = signup(&mut backend, "Ada", "ada@example.com", "12345");
        assert!(matches!(
            result,
            Err(AuthError::Invalid(ValidationError::PasswordTooShort))
        ));
        assert!(backend.calls.is_empty());
        let n = signup_notification(&result);
        assert_eq!(n.title, "Weak password");
        assert_eq!(n.description, "Password must be at least 6 characters");
    }

    #[test]
    fn signup_requires_all_fields() {
        assert_eq!(
            validate_signup("", "ada@example.com", "secret1"),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            validate_signup("Ada", "ada@example.com", ""),
            Err(ValidationError::MissingFields)
        );
        assert!(validate_signup("Ada", "ada@example.com", "secret1").is_ok());
    }

    #[test]
    fn signup_passes_full_name_and_reports_backend_error() {
        let mut backend = MemoryBackend::new();
        let result = signup(&mut backend, "Ada Lovelace", "ada@example.com", "secret1");
        assert!(matches!(result, Ok(Some(_))));
        assert_eq!(backend.full_name("ada@example.com"), Some("Ada Lovelace"));

        backend.sign_out().unwrap();
        let again = signup(&mut backend, "Ada", "ada@example.com", "secret1");
        let n = signup_notification(&again);
        assert_eq!(n.title, "Signup failed");
        assert_eq!(n.description, "User already registered");
    }

    #[test]
    fn logout_notifies() {
        let mut backend = MemoryBackend::new()
            .with_account("a@b.com", "secret1")
            .signed_in_as("a@b.com");
        let n = logout(&mut backend);
        assert_eq!(n.title, "Logged out");
        assert!(backend.get_session().is_none());
    }
}
