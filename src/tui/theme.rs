use ratatui::style::Color;

use crate::model::{TaskStatus, UiConfig};
use crate::ops::auth_ops::PasswordStrength;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub surface: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub amber: Color,
    pub green: Color,
    pub blue: Color,
    pub selection_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0F, 0x17, 0x2A),
            surface: Color::Rgb(0x1E, 0x29, 0x3B),
            text: Color::Rgb(0xCB, 0xD5, 0xE1),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0x38, 0xBD, 0xF8),
            dim: Color::Rgb(0x64, 0x74, 0x8B),
            red: Color::Rgb(0xEF, 0x44, 0x44),
            amber: Color::Rgb(0xF5, 0x9E, 0x0B),
            green: Color::Rgb(0x22, 0xC5, 0x5E),
            blue: Color::Rgb(0x3B, 0x82, 0xF6),
            selection_bg: Color::Rgb(0x33, 0x41, 0x55),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from UI config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "surface" => theme.surface = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "amber" => theme.amber = color,
                "green" => theme.green = color,
                "blue" => theme.blue = color,
                "selection_bg" => theme.selection_bg = color,
                _ => {}
            }
        }
        theme
    }

    /// Indicator color for a task status
    pub fn status_color(&self, status: TaskStatus) -> Color {
        match status {
            TaskStatus::Todo => self.red,
            TaskStatus::InProgress => self.amber,
            TaskStatus::Done => self.green,
        }
    }

    /// Meter color for a password strength band
    pub fn strength_color(&self, strength: PasswordStrength) -> Color {
        match strength.percent() {
            0..=25 => self.red,
            26..=50 => self.amber,
            51..=75 => self.blue,
            _ => self.green,
        }
    }
}
