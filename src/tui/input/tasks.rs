use crossterm::event::{KeyCode, KeyEvent};

use crate::model::{StatusFilter, TaskStatus};
use crate::tui::app::App;

pub(super) fn handle_tasks(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::Home | KeyCode::Char('g') => app.cursor = 0,
        KeyCode::End | KeyCode::Char('G') => app.move_cursor(isize::MAX),
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.cycle_filter(true),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.cycle_filter(false),
        KeyCode::Char('1') => app.set_filter(StatusFilter::All),
        KeyCode::Char('2') => app.set_filter(StatusFilter::Only(TaskStatus::Todo)),
        KeyCode::Char('3') => app.set_filter(StatusFilter::Only(TaskStatus::InProgress)),
        KeyCode::Char('4') => app.set_filter(StatusFilter::Only(TaskStatus::Done)),
        KeyCode::Char('a') | KeyCode::Char('n') => app.open_create(),
        KeyCode::Char('e') | KeyCode::Enter => app.open_edit(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('L') => app.logout(),
        _ => {}
    }
}
