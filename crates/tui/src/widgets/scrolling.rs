use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::{Margin, Rect},
    widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Vertical scrolling for a paragraph too long for its area, with vim-like keys
#[derive(Debug, Default)]
pub struct Scrolling {
    y_offset: u16,
    jump_y_offset: u16,
}

impl Scrolling {
    pub fn reset(&mut self) {
        self.y_offset = 0;
    }

    /// Render `paragraph` scrolled to the current offset, with a scrollbar on the right
    pub fn render(&mut self, frame: &mut Frame, area: Rect, paragraph: Paragraph<'_>) {
        let line_count = paragraph.line_count(area.width.saturating_sub(2));
        self.jump_y_offset = area.height / 2;

        let max_y_offset = (line_count as u16).saturating_sub(area.height);
        self.y_offset = self.y_offset.min(max_y_offset);

        frame.render_widget(
            paragraph.scroll((self.y_offset, 0)),
            area.inner(&Margin {
                vertical: 0,
                horizontal: 1,
            }),
        );

        if max_y_offset > 0 {
            let scrollbar = Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));
            let mut scrollbar_state =
                ScrollbarState::new(max_y_offset as usize).position(self.y_offset as usize);
            frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
        }
    }

    /// Returns true if the key was a scrolling key
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('g') => self.y_offset = 0,
            KeyCode::Char('G') => self.y_offset = u16::MAX,

            KeyCode::Char('j') | KeyCode::Down => self.y_offset = self.y_offset.saturating_add(1),
            KeyCode::Char('k') | KeyCode::Up => self.y_offset = self.y_offset.saturating_sub(1),

            KeyCode::Char('u') | KeyCode::Char('U')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.y_offset = self.y_offset.saturating_sub(self.jump_y_offset)
            }
            KeyCode::Char('d') | KeyCode::Char('D')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.y_offset = self.y_offset.saturating_add(self.jump_y_offset)
            }
            KeyCode::PageUp => self.y_offset = self.y_offset.saturating_sub(self.jump_y_offset),
            KeyCode::PageDown => self.y_offset = self.y_offset.saturating_add(self.jump_y_offset),

            _ => return false,
        };

        true
    }
}
