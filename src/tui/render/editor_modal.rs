use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::model::TaskStatus;
use crate::tui::app::App;
use crate::tui::form::{EditorField, EditorState, TextField};
use crate::tui::theme::Theme;

use super::{centered_rect_fixed, truncate_to_width};

const POPUP_W: u16 = 56;

/// Render the add/edit task modal over the list
pub fn render_editor_modal(frame: &mut Frame, app: &App, editor: &EditorState, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let inner_w = POPUP_W.saturating_sub(2) as usize;
    let input_w = inner_w.saturating_sub(2);

    let (header, submit) = if editor.is_edit() {
        ("Edit Task", "Update Task")
    } else {
        ("Add New Task", "Add Task")
    };

    let mut lines: Vec<Line> = Vec::new();
    let mut cursor: Option<(usize, usize)> = None;

    for (field, label) in [
        (EditorField::Title, "Title *"),
        (EditorField::Description, "Description"),
        (EditorField::Status, "Status *"),
        (EditorField::DueDate, "Due Date * (YYYY-MM-DD)"),
    ] {
        let focused = editor.focus == field;
        lines.push(label_line(theme, label, focused, editor.invalid == Some(field)));
        match field {
            EditorField::Status => lines.push(status_line(theme, editor.status, focused)),
            _ => {
                let text = match field {
                    EditorField::Title => &editor.title,
                    EditorField::Description => &editor.description,
                    _ => &editor.due_date,
                };
                lines.push(input_line(theme, text, input_w));
                if focused {
                    cursor = Some((lines.len() - 1, 1 + text.cursor_col().min(input_w)));
                }
            }
        }
        lines.push(Line::default());
    }

    lines.push(Line::from(vec![
        Span::styled(
            format!(" Enter {submit}"),
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("   Esc Cancel", Style::default().fg(theme.dim)),
    ]));

    let popup_h = lines.len() as u16 + 2;
    let rect = centered_rect_fixed(POPUP_W, popup_h, area);
    frame.render_widget(Clear, rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {header} "),
            Style::default()
                .fg(theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(theme.highlight).bg(bg))
        .style(Style::default().bg(bg));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(theme.text).bg(bg));
    frame.render_widget(paragraph, rect);

    if let Some((line, col)) = cursor {
        let x = rect.x + 1 + col as u16;
        let y = rect.y + 1 + line as u16;
        if x < rect.right() && y < rect.bottom() {
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}

fn label_line<'a>(theme: &Theme, label: &str, focused: bool, invalid: bool) -> Line<'a> {
    let style = if focused {
        Style::default()
            .fg(theme.highlight)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim)
    };
    let mut spans = vec![Span::styled(format!(" {label}"), style)];
    if invalid {
        spans.push(Span::styled(
            "  Please fill out this field.",
            Style::default().fg(theme.red),
        ));
    }
    Line::from(spans)
}

fn input_line<'a>(theme: &Theme, field: &TextField, input_w: usize) -> Line<'a> {
    let shown = truncate_to_width(&field.display(), input_w);
    let pad = input_w.saturating_sub(UnicodeWidthStr::width(shown.as_str()));
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{shown}{}", " ".repeat(pad)),
            Style::default().fg(theme.text_bright).bg(theme.surface),
        ),
    ])
}

/// All three statuses side by side, the chosen one highlighted
fn status_line<'a>(theme: &Theme, current: TaskStatus, focused: bool) -> Line<'a> {
    let mut spans = vec![Span::raw(if focused { "\u{2190}" } else { " " })];
    for status in TaskStatus::ALL {
        let color = theme.status_color(status);
        let style = if status == current {
            Style::default()
                .fg(theme.text_bright)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        spans.push(Span::styled(" \u{25CF}", style.fg(color)));
        spans.push(Span::styled(format!(" {} ", status.label()), style));
    }
    if focused {
        spans.push(Span::raw("\u{2192}"));
    }
    Line::from(spans)
}
