use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::session_gate::Screen;
use crate::tui::app::App;

use super::truncate_to_width;

/// Render the status row (bottom of screen): the current notification if
/// there is one, otherwise key hints for the screen.
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = if let Some(n) = &app.notification {
        let color = if n.is_failure() {
            app.theme.red
        } else {
            app.theme.green
        };
        let title = format!(" {} ", n.title);
        let rest = width.saturating_sub(title.chars().count() + 1);
        Line::from(vec![
            Span::styled(
                title,
                Style::default()
                    .fg(color)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                truncate_to_width(&n.description, rest),
                Style::default().fg(app.theme.text).bg(bg),
            ),
        ])
    } else {
        let hint = hints(app);
        Line::from(Span::styled(
            truncate_to_width(&format!(" {hint}"), width),
            Style::default().fg(app.theme.dim).bg(bg),
        ))
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn hints(app: &App) -> &'static str {
    if app.editor.is_some() {
        return "Tab next field  \u{2190}\u{2192} status  Enter save  Esc cancel";
    }
    match app.screen {
        Screen::Login => "Enter sign in  Tab next field  ^R show password  ^N sign up  Esc quit",
        Screen::Signup => "Enter sign up  Tab next field  ^R show password  Esc back to login",
        Screen::Tasks => "a add  e edit  d delete  Tab filter  r reload  L logout  q quit",
    }
}
