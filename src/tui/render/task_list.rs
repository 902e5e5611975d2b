use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::model::{StatusFilter, Task, TaskStatus, format_due_date};
use crate::tui::app::App;
use crate::tui::theme::Theme;

use super::truncate_to_width;

pub const EMPTY_MESSAGE: &str = "You have no tasks yet. Add one to get started!";

/// Filter bar on top, task cards below
pub fn render_task_list(frame: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }
    let bar_area = Rect::new(area.x, area.y, area.width, 1);
    // one blank row between the bar and the first card
    let list_area = Rect::new(
        area.x,
        (area.y + 2).min(area.bottom()),
        area.width,
        area.height.saturating_sub(2),
    );

    let tasks = app.visible_tasks();
    render_filter_bar(frame, app, tasks.len(), bar_area);

    if tasks.is_empty() {
        let lines = vec![
            Line::default(),
            Line::from(Span::styled(EMPTY_MESSAGE, Style::default().fg(app.theme.dim))),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().bg(app.theme.background));
        frame.render_widget(paragraph, list_area);
        return;
    }

    let width = list_area.width as usize;
    let mut lines: Vec<Line> = Vec::new();
    let mut cursor_end = 0;
    for (i, task) in tasks.iter().enumerate() {
        let selected = i == app.cursor;
        lines.extend(card_lines(&app.theme, task, selected, width));
        if selected {
            cursor_end = lines.len();
        }
        lines.push(Line::default());
    }

    // Scroll so the selected card is fully visible
    let height = list_area.height as usize;
    let skip = cursor_end.saturating_sub(height);
    let visible: Vec<Line> = lines.into_iter().skip(skip).take(height).collect();

    let paragraph = Paragraph::new(visible).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, list_area);
}

fn render_filter_bar(frame: &mut Frame, app: &App, shown: usize, area: Rect) {
    let theme = &app.theme;
    let bg = theme.background;
    let mut spans = vec![Span::styled(" ", Style::default().bg(bg))];
    for filter in StatusFilter::ALL {
        let style = if filter == app.filter {
            Style::default()
                .fg(theme.text_bright)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim).bg(bg)
        };
        spans.push(Span::styled(format!(" {} ", filter.label()), style));
        spans.push(Span::styled(" ", Style::default().bg(bg)));
    }

    let count = match shown {
        1 => "1 task ".to_string(),
        n => format!("{n} tasks "),
    };
    let used: usize = spans
        .iter()
        .map(|s| UnicodeWidthStr::width(s.content.as_ref()))
        .sum();
    let width = area.width as usize;
    if used + count.len() < width {
        spans.push(Span::styled(
            " ".repeat(width - used - count.len()),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(count, Style::default().fg(theme.dim).bg(bg)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Lines for one task card: title row, optional description, due/status row
fn card_lines<'a>(theme: &Theme, task: &Task, selected: bool, width: usize) -> Vec<Line<'a>> {
    let done = task.status == TaskStatus::Done;
    let bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let mut base = Style::default().bg(bg);
    if done {
        base = base.add_modifier(Modifier::DIM);
    }
    let marker = if selected { "\u{258C}" } else { " " };
    let indent = "    ";
    let text_w = width.saturating_sub(indent.len() + 1);

    let mut title_style = base.fg(theme.text_bright).add_modifier(Modifier::BOLD);
    if done {
        title_style = title_style.add_modifier(Modifier::CROSSED_OUT);
    }
    let title = truncate_to_width(&task.title, text_w);
    let mut lines = vec![pad_line(
        vec![
            Span::styled(marker, base.fg(theme.highlight)),
            Span::styled(" ", base),
            Span::styled("\u{25CF}", base.fg(theme.status_color(task.status))),
            Span::styled(" ", base),
            Span::styled(title, title_style),
        ],
        base,
        width,
    )];

    if !task.description.is_empty() {
        lines.push(pad_line(
            vec![
                Span::styled(marker, base.fg(theme.highlight)),
                Span::styled("   ", base),
                Span::styled(
                    truncate_to_width(&task.description, text_w),
                    base.fg(theme.text),
                ),
            ],
            base,
            width,
        ));
    }

    let meta = format!(
        "Due: {}  \u{00B7}  {}",
        format_due_date(&task.due_date),
        task.status.label()
    );
    lines.push(pad_line(
        vec![
            Span::styled(marker, base.fg(theme.highlight)),
            Span::styled("   ", base),
            Span::styled(truncate_to_width(&meta, text_w), base.fg(theme.dim)),
        ],
        base,
        width,
    ));
    lines
}

/// Fill the rest of the row with the card background
fn pad_line<'a>(mut spans: Vec<Span<'a>>, style: Style, width: usize) -> Line<'a> {
    let used: usize = spans
        .iter()
        .map(|s| UnicodeWidthStr::width(s.content.as_ref()))
        .sum();
    if used < width {
        spans.push(Span::styled(" ".repeat(width - used), style));
    }
    Line::from(spans)
}
