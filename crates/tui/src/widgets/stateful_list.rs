use ratatui::{prelude::*, widgets::*};

/// Selection state for a list whose items are rebuilt on every draw
#[derive(Debug, Default)]
pub struct StatefulList {
    state: ListState,
    last_item_count: usize,
}

impl StatefulList {
    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    /// Move the selection down, wrapping around at the end
    pub fn next(&mut self) {
        if self.last_item_count == 0 {
            return;
        }

        let i = match self.state.selected() {
            Some(i) if i + 1 < self.last_item_count => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Move the selection up, wrapping around at the start
    pub fn previous(&mut self) {
        if self.last_item_count == 0 {
            return;
        }

        let i = match self.state.selected() {
            Some(0) | None => self.last_item_count - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn render_to(&mut self, frame: &mut Frame, target: Rect, list: List) {
        self.last_item_count = list.len();
        if self.last_item_count == 0 {
            self.state.select(None);
        } else if self.state.selected().is_none() {
            self.state.select(Some(0));
        } else if let Some(i) = self.state.selected() {
            self.state.select(Some(i.min(self.last_item_count - 1)));
        }

        frame.render_stateful_widget(list, target, &mut self.state);
    }
}
