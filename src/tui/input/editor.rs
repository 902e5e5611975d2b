use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::edit_text;
use crate::tui::app::App;
use crate::tui::form::EditorField;

pub(super) fn handle_editor(app: &mut App, key: KeyEvent) {
    let Some(editor) = app.editor.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => app.close_editor(),
        KeyCode::Enter => app.submit_editor(),
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => app.submit_editor(),
        KeyCode::Tab | KeyCode::Down => editor.next_field(),
        KeyCode::BackTab | KeyCode::Up => editor.prev_field(),
        _ if editor.focus == EditorField::Status => match key.code {
            KeyCode::Right | KeyCode::Char(' ') | KeyCode::Char('l') => {
                editor.status = editor.status.next();
            }
            KeyCode::Left | KeyCode::Char('h') => editor.status = editor.status.prev(),
            _ => {}
        },
        _ => {
            if let Some(field) = editor.focused_text_mut() {
                edit_text(field, key);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use crate::backend::MemoryBackend;
    use crate::model::{Config, TaskStatus};
    use crate::tui::app::App;
    use crate::tui::form::EditorField;
    use crate::tui::input::test_keys::{press, type_str};

    fn tasks_app() -> App {
        let backend = MemoryBackend::new()
            .with_account("a@b.com", "secret1")
            .signed_in_as("a@b.com");
        App::new(Box::new(backend), &Config::default())
    }

    #[test]
    fn fill_all_fields_and_submit() {
        let mut app = tasks_app();
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "Buy milk");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "2 litres");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.editor.as_ref().unwrap().status, TaskStatus::Done);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Tab);
        for _ in 0.."2024-06-01".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_str(&mut app, "2024-06-01");
        press(&mut app, KeyCode::Enter);

        assert!(app.editor.is_none());
        let task = app.selected_task().unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "2 litres");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.due_date, "2024-06-01");
    }

    #[test]
    fn typing_in_status_field_does_not_insert() {
        let mut app = tasks_app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        let editor = app.editor.as_ref().unwrap();
        assert_eq!(editor.focus, EditorField::Status);
        type_str(&mut app, "xyz");
        let editor = app.editor.as_ref().unwrap();
        assert!(editor.title.is_empty());
        assert_eq!(editor.status, TaskStatus::Todo);
    }

    #[test]
    fn escape_cancels_without_changes() {
        let mut app = tasks_app();
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "never saved");
        press(&mut app, KeyCode::Esc);
        assert!(app.editor.is_none());
        assert!(app.visible_tasks().is_empty());
    }

    #[test]
    fn edit_keeps_modal_open_when_title_cleared() {
        let mut app = tasks_app();
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "ab");
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        let editor = app.editor.as_ref().unwrap();
        assert_eq!(editor.invalid, Some(EditorField::Title));
        assert_eq!(app.visible_tasks()[0].title, "ab");
    }
}
