mod auth;
mod editor;
mod tasks;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::App;
use super::form::TextField;
use crate::ops::session_gate::Screen;

/// Handle a key event for the current screen
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // The editor modal intercepts all input
    if app.editor.is_some() {
        editor::handle_editor(app, key);
        return;
    }

    match app.screen {
        Screen::Login => auth::handle_login(app, key),
        Screen::Signup => auth::handle_signup(app, key),
        Screen::Tasks => tasks::handle_tasks(app, key),
    }
}

/// Insert pasted text into the focused field
pub fn handle_paste(app: &mut App, text: &str) {
    let field = if let Some(editor) = app.editor.as_mut() {
        editor.focused_text_mut()
    } else {
        match app.screen {
            Screen::Login => Some(app.login.focused_mut()),
            Screen::Signup => Some(app.signup.focused_mut()),
            Screen::Tasks => None,
        }
    };
    if let Some(field) = field {
        field.insert_str(text);
    }
}

/// Apply a line-editing key to a text field; other keys are ignored
fn edit_text(field: &mut TextField, key: KeyEvent) {
    let plain = !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match key.code {
        KeyCode::Char(c) if plain => field.insert(c),
        KeyCode::Backspace => field.backspace(),
        KeyCode::Delete => field.delete(),
        KeyCode::Left => field.left(),
        KeyCode::Right => field.right(),
        KeyCode::Home => field.home(),
        KeyCode::End => field.end(),
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => field.home(),
        KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::CONTROL) => field.end(),
        _ => {}
    }
}

#[cfg(test)]
pub(crate) mod test_keys {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::handle_key;
    use crate::tui::app::App;

    pub fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    pub fn ctrl(app: &mut App, c: char) {
        handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    pub fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }
}
