use ratatui::style::{Color, Modifier, Style};

use crate::config::settings::ThemeColor;

pub const BG: Color = Color::Rgb(16, 18, 18);
pub const SURFACE: Color = Color::Rgb(24, 28, 27);
pub const BORDER: Color = Color::Rgb(48, 58, 55);
pub const TEXT: Color = Color::Rgb(226, 230, 224);
pub const TEXT_DIM: Color = Color::Rgb(122, 134, 128);
pub const GOLD: Color = Color::Rgb(196, 160, 68);
pub const GREEN: Color = Color::Rgb(92, 148, 92);
pub const AMBER: Color = Color::Rgb(210, 138, 60);
pub const RED: Color = Color::Rgb(180, 82, 62);

/// Accent colour picked in settings, lifted a little so the darker swatches
/// stay readable on the dark background.
pub fn accent_color(theme: ThemeColor) -> Color {
    let (r, g, b) = theme.rgb();
    let lift = |c: u8| c.saturating_add(48);
    Color::Rgb(lift(r), lift(g), lift(b))
}

pub fn accent(theme: ThemeColor) -> Style {
    Style::default().fg(accent_color(theme))
}

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn gold() -> Style {
    Style::default().fg(GOLD)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border() -> Style {
    Style::default().fg(BORDER)
}
