use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

use crate::backend::MemoryBackend;
use crate::model::{Config, TaskStatus};
use crate::tui::app::App;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();
    buffer_to_string(terminal.backend().buffer())
}

fn buffer_to_string(buf: &Buffer) -> String {
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render the whole app and keep the styled buffer
pub fn render_app_buffer(app: &App, w: u16, h: u16) -> Buffer {
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| crate::tui::render::render(frame, app))
        .unwrap();
    terminal.backend().buffer().clone()
}

/// Render the whole app as plain text
pub fn render_app(app: &App, w: u16, h: u16) -> String {
    buffer_to_string(&render_app_buffer(app, w, h))
}

/// Position of the first cell where `text` starts, scanning rows top to bottom
pub fn find_text(buf: &Buffer, text: &str) -> Option<(u16, u16)> {
    let area = buf.area;
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            let mut rest = text;
            let mut cx = x;
            while !rest.is_empty() && cx < area.right() {
                let symbol = buf[(cx, y)].symbol();
                match rest.strip_prefix(symbol) {
                    Some(r) if !symbol.is_empty() => rest = r,
                    _ => break,
                }
                cx += 1;
            }
            if rest.is_empty() {
                return Some((x, y));
            }
        }
    }
    None
}

/// App on the login screen with one known account
pub fn login_app() -> App {
    let backend = MemoryBackend::new().with_account("a@b.com", "secret1");
    App::new(Box::new(backend), &Config::default())
}

/// App already on the task screen
pub fn signed_in_app() -> App {
    let backend = MemoryBackend::new()
        .with_account("a@b.com", "secret1")
        .signed_in_as("a@b.com");
    App::new(Box::new(backend), &Config::default())
}

/// Create a task through the editor, as a user would
pub fn add_task(app: &mut App, title: &str, description: &str, status: TaskStatus, due: &str) {
    app.open_create();
    let editor = app.editor.as_mut().unwrap();
    editor.title.set(title);
    editor.description.set(description);
    editor.status = status;
    editor.due_date.set(due);
    app.submit_editor();
    assert!(app.editor.is_none(), "task editor should close after saving");
}
