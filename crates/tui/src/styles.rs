use ratatui::{
    prelude::Text,
    style::{Color, Modifier, Style},
    text::Span,
};

pub fn error_text(t: impl Into<Text<'static>>) -> Text<'static> {
    let mut t = t.into();
    t.patch_style(Style::default().fg(Color::Red));
    t
}

pub fn success_text(t: impl Into<Text<'static>>) -> Text<'static> {
    let mut t = t.into();
    t.patch_style(Style::default().fg(Color::Green));
    t
}

/// A key the user can press, for help text
pub fn key_hint(k: &'static str) -> Span<'static> {
    Span::styled(k, Style::default().fg(Color::Blue))
}

/// Headings in the viewer
pub fn heading(t: impl Into<String>) -> Span<'static> {
    Span::styled(
        t.into(),
        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
    )
}

/// Five stars, filled up to `rating`
pub fn stars(rating: u8) -> Span<'static> {
    let filled = rating.min(5) as usize;
    Span::styled(
        format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled)),
        Style::default().fg(Color::Yellow),
    )
}
