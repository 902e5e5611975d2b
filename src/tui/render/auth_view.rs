use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::ops::auth_ops::PasswordStrength;
use crate::tui::app::App;
use crate::tui::form::{LoginField, SignupField, TextField};
use crate::tui::theme::Theme;

use super::{centered_rect_fixed, truncate_to_width};

const CARD_W: u16 = 48;
const METER_W: usize = 20;

/// Lines of an auth card plus where the cursor goes (line index, column)
struct Card<'a> {
    lines: Vec<Line<'a>>,
    cursor: Option<(usize, usize)>,
}

impl<'a> Card<'a> {
    fn new() -> Self {
        Card {
            lines: Vec::new(),
            cursor: None,
        }
    }

    fn text(&mut self, text: impl Into<String>, style: Style) {
        self.lines.push(Line::from(Span::styled(text.into(), style)));
    }

    fn blank(&mut self) {
        self.lines.push(Line::default());
    }

    /// Label line and input line for one field
    fn field(&mut self, theme: &Theme, label: &str, field: &TextField, focused: bool, inner_w: usize) {
        let label_style = if focused {
            Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        self.text(format!(" {label}"), label_style);

        let input_w = inner_w.saturating_sub(2);
        let shown = truncate_to_width(&field.display(), input_w);
        let pad = input_w.saturating_sub(UnicodeWidthStr::width(shown.as_str()));
        let input_style = Style::default().fg(theme.text_bright).bg(theme.surface);
        self.lines.push(Line::from(vec![
            Span::raw(" "),
            Span::styled(format!("{shown}{}", " ".repeat(pad)), input_style),
        ]));
        if focused {
            self.cursor = Some((self.lines.len() - 1, 1 + field.cursor_col().min(input_w)));
        }
    }

    fn render(self, frame: &mut Frame, theme: &Theme, title: &str, area: Rect) {
        let h = self.lines.len() as u16 + 2;
        let rect = centered_rect_fixed(CARD_W, h, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                format!(" {title} "),
                Style::default()
                    .fg(theme.text_bright)
                    .add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(theme.highlight).bg(theme.background))
            .style(Style::default().bg(theme.background));
        let paragraph = Paragraph::new(self.lines)
            .block(block)
            .style(Style::default().fg(theme.text).bg(theme.background));
        frame.render_widget(paragraph, rect);

        if let Some((line, col)) = self.cursor {
            let x = rect.x + 1 + col as u16;
            let y = rect.y + 1 + line as u16;
            if x < rect.right() && y < rect.bottom() {
                frame.set_cursor_position(Position::new(x, y));
            }
        }
    }
}

fn visibility_hint(field: &TextField) -> &'static str {
    if field.masked {
        " ^R show password"
    } else {
        " ^R hide password"
    }
}

pub fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let form = &app.login;
    let inner_w = CARD_W.saturating_sub(2) as usize;
    let dim = Style::default().fg(theme.dim);

    let mut card = Card::new();
    card.text(" Sign in to manage your tasks", dim);
    card.blank();
    card.field(theme, "Email", &form.email, form.focus == LoginField::Email, inner_w);
    card.blank();
    card.field(
        theme,
        "Password",
        &form.password,
        form.focus == LoginField::Password,
        inner_w,
    );
    card.text(visibility_hint(&form.password), dim);
    card.blank();
    card.text(
        " Enter sign in",
        Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD),
    );
    card.text(" Don't have an account? ^N sign up", dim);

    card.render(frame, theme, "Welcome back", area);
}

pub fn render_signup(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let form = &app.signup;
    let inner_w = CARD_W.saturating_sub(2) as usize;
    let dim = Style::default().fg(theme.dim);

    let mut card = Card::new();
    card.text(" Create an account to start organizing", dim);
    card.blank();
    card.field(
        theme,
        "Full Name",
        &form.full_name,
        form.focus == SignupField::FullName,
        inner_w,
    );
    card.blank();
    card.field(theme, "Email", &form.email, form.focus == SignupField::Email, inner_w);
    card.blank();
    card.field(
        theme,
        "Password",
        &form.password,
        form.focus == SignupField::Password,
        inner_w,
    );
    card.text(visibility_hint(&form.password), dim);
    if let Some(strength) = app.signup_strength() {
        card.lines.push(strength_meter(theme, strength));
    }
    card.blank();
    card.text(
        " Enter sign up",
        Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD),
    );
    card.text(" Already have an account? Esc log in", dim);

    card.render(frame, theme, "Create account", area);
}

/// "Strength: Fair ██████████░░░░░░░░░░"
fn strength_meter<'a>(theme: &Theme, strength: PasswordStrength) -> Line<'a> {
    let filled = METER_W * strength.percent() as usize / 100;
    let color = theme.strength_color(strength);
    Line::from(vec![
        Span::styled(" Strength: ", Style::default().fg(theme.dim)),
        Span::styled(
            format!("{:<7}", strength.label()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled("\u{2588}".repeat(filled), Style::default().fg(color)),
        Span::styled(
            "\u{2591}".repeat(METER_W - filled),
            Style::default().fg(theme.surface),
        ),
    ])
}
