use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::ops::session_gate::Screen;
use crate::tui::app::App;

/// App name on the left; signed-in user and logout hint on the right.
/// The second row is a separator.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = vec![Span::styled(
        " TaskFlow",
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];

    if app.screen == Screen::Tasks {
        let user = app.user_email.as_deref().unwrap_or("");
        let right = format!("{user}  L logout ");
        let used = " TaskFlow".len() + UnicodeWidthStr::width(right.as_str());
        if used < width {
            spans.push(Span::styled(
                " ".repeat(width - used),
                Style::default().bg(bg),
            ));
            spans.push(Span::styled(right, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let separator = Line::from(Span::styled(
        "\u{2500}".repeat(width),
        Style::default().fg(app.theme.surface).bg(bg),
    ));
    let paragraph = Paragraph::new(vec![Line::from(spans), separator])
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
