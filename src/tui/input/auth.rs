use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::edit_text;
use crate::ops::session_gate::Screen;
use crate::tui::app::App;

pub(super) fn handle_login(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('r') => app.login.toggle_password_visibility(),
            KeyCode::Char('n') => app.navigate(Screen::Signup),
            _ => {}
        }
        return;
    }
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => app.login.next_field(),
        KeyCode::Enter => app.submit_login(),
        _ => {
            edit_text(app.login.focused_mut(), key);
        }
    }
}

pub(super) fn handle_signup(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('r') => app.signup.toggle_password_visibility(),
            KeyCode::Char('l') => app.navigate(Screen::Login),
            _ => {}
        }
        return;
    }
    match key.code {
        KeyCode::Esc => app.navigate(Screen::Login),
        KeyCode::Tab | KeyCode::Down => app.signup.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.signup.prev_field(),
        KeyCode::Enter => app.submit_signup(),
        _ => {
            edit_text(app.signup.focused_mut(), key);
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::backend::MemoryBackend;
    use crate::model::Config;
    use crate::ops::session_gate::Screen;
    use crate::tui::app::App;
    use crate::tui::input::test_keys::{ctrl, press, type_str};

    fn login_app() -> App {
        let backend = MemoryBackend::new().with_account("a@b.com", "secret1");
        App::new(Box::new(backend), &Config::default())
    }

    #[test]
    fn typing_and_submitting_login() {
        let mut app = login_app();
        type_str(&mut app, "a@b.com");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "secret1");
        assert!(app.login.password.masked);
        ctrl(&mut app, 'r');
        assert!(!app.login.password.masked);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, Screen::Tasks);
    }

    #[test]
    fn empty_login_is_rejected_locally() {
        let mut app = login_app();
        type_str(&mut app, "a@b.com");
        press(&mut app, KeyCode::Enter);
        let n = app.notification.as_ref().unwrap();
        assert_eq!(n.title, "Login failed");
        assert_eq!(n.description, "Please enter valid credentials");
        assert_eq!(app.screen, Screen::Login);
    }

    #[test]
    fn switch_between_login_and_signup() {
        let mut app = login_app();
        ctrl(&mut app, 'n');
        assert_eq!(app.screen, Screen::Signup);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::Login);
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn signup_short_password() {
        let mut app = login_app();
        ctrl(&mut app, 'n');
        type_str(&mut app, "Ada");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "ada@example.com");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "12345");
        press(&mut app, KeyCode::Enter);

        let n = app.notification.as_ref().unwrap();
        assert_eq!(n.title, "Weak password");
        assert_eq!(app.screen, Screen::Signup);
        assert_eq!(app.signup.full_name.value, "Ada");
    }
}
