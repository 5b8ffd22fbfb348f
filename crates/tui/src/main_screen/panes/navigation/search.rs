use std::time::{Duration, Instant};

use aula_client::course::{Level, SearchCriteria, Status};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::{Color, Style, Stylize},
    text::{Line, Span},
};

use crate::styles::key_hint;

/// How long typing has to pause for before we search
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// The text field being typed into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Category,
}

/// Search criteria being edited.
/// Typing is debounced, and a search is only issued when the criteria actually changed.
#[derive(Debug, Default)]
pub struct SearchBar {
    pending: SearchCriteria,
    editing: Option<Field>,
    last_edit: Option<Instant>,
}

impl SearchBar {
    /// Start typing into a field, starting from the criteria in use
    pub fn start(&mut self, field: Field, current: &SearchCriteria) {
        if self.last_edit.is_none() {
            self.pending = current.clone();
        }
        self.editing = Some(field);
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Type into the field being edited.
    /// Returns criteria to search with now, if editing finished and they changed.
    pub fn handle_key(
        &mut self,
        key: &KeyEvent,
        now: Instant,
        current: &SearchCriteria,
    ) -> Option<SearchCriteria> {
        let field = self.editing?;
        let text = match field {
            Field::Title => &mut self.pending.title,
            Field::Category => &mut self.pending.category,
        };

        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.editing = None;
                self.last_edit = None;
                return self.changed_from(current);
            }
            KeyCode::Char(c) => text.push(c),
            KeyCode::Backspace => {
                text.pop();
            }
            _ => return None,
        };

        self.last_edit = Some(now);
        None
    }

    /// Criteria to search with, if typing has paused long enough and they changed
    pub fn due(&mut self, now: Instant, current: &SearchCriteria) -> Option<SearchCriteria> {
        let last_edit = self.last_edit?;
        if now.saturating_duration_since(last_edit) < DEBOUNCE {
            return None;
        }

        self.last_edit = None;
        self.changed_from(current)
    }

    fn changed_from(&self, current: &SearchCriteria) -> Option<SearchCriteria> {
        (self.pending != *current).then(|| self.pending.clone())
    }

    /// Move to the next level filter, returning the new criteria
    pub fn cycle_level(&mut self, current: &SearchCriteria) -> SearchCriteria {
        self.pending = current.clone();
        self.pending.level = cycle(&Level::KNOWN, current.level.as_ref());
        self.last_edit = None;
        self.pending.clone()
    }

    /// Move to the next status filter, returning the new criteria
    pub fn cycle_status(&mut self, current: &SearchCriteria) -> SearchCriteria {
        self.pending = current.clone();
        self.pending.status = cycle(&Status::KNOWN, current.status.as_ref());
        self.last_edit = None;
        self.pending.clone()
    }

    /// Forget all filters
    pub fn clear(&mut self) -> SearchCriteria {
        *self = Self::default();
        self.pending.clone()
    }

    /// A summary of the filters, for showing above the tree
    pub fn line(&self, current: &SearchCriteria) -> Line<'static> {
        let shown = match self.editing.is_some() || self.last_edit.is_some() {
            true => &self.pending,
            false => current,
        };

        if shown.is_empty() && !self.is_editing() {
            return Line::from(vec![key_hint("/"), " search, ".into(), key_hint("?"), " help".into()]);
        }

        let mut spans = vec![];
        let mut push = |name: &'static str, value: String, field: Option<Field>| {
            if value.is_empty() && (field.is_none() || self.editing != field) {
                return;
            }
            spans.push(Span::styled(
                format!("{}: ", name),
                Style::default().fg(Color::DarkGray),
            ));
            match field.is_some() && self.editing == field {
                true => spans.push(format!("{}_", value).reversed()),
                false => spans.push(Span::raw(value)),
            }
            spans.push(Span::raw(" "));
        };

        push("title", shown.title.clone(), Some(Field::Title));
        push("category", shown.category.clone(), Some(Field::Category));
        push(
            "level",
            shown.level.as_ref().map(ToString::to_string).unwrap_or_default(),
            None,
        );
        push(
            "status",
            shown.status.as_ref().map(ToString::to_string).unwrap_or_default(),
            None,
        );

        Line::from(spans)
    }
}

/// The item after `current` in `options`, or nothing after the last one
fn cycle<T: Clone + PartialEq>(options: &[T], current: Option<&T>) -> Option<T> {
    match current {
        None => options.first().cloned(),
        Some(c) => options
            .iter()
            .position(|o| o == c)
            .and_then(|i| options.get(i + 1))
            .cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(bar: &mut SearchBar, s: &str, at: Instant, current: &SearchCriteria) {
        for c in s.chars() {
            assert_eq!(bar.handle_key(&key(KeyCode::Char(c)), at, current), None);
        }
    }

    #[test]
    fn searches_once_typing_pauses() {
        let current = SearchCriteria::default();
        let t0 = Instant::now();
        let mut bar = SearchBar::default();
        bar.start(Field::Title, &current);
        type_str(&mut bar, "rust", t0, &current);

        assert_eq!(bar.due(t0 + Duration::from_millis(100), &current), None);

        let searched = bar.due(t0 + DEBOUNCE, &current).unwrap();
        assert_eq!(searched.title, "rust");

        // already issued
        assert_eq!(bar.due(t0 + DEBOUNCE * 2, &current), None);
    }

    #[test]
    fn later_keys_restart_the_wait() {
        let current = SearchCriteria::default();
        let t0 = Instant::now();
        let mut bar = SearchBar::default();
        bar.start(Field::Title, &current);
        type_str(&mut bar, "ru", t0, &current);
        type_str(&mut bar, "st", t0 + Duration::from_millis(200), &current);

        assert_eq!(bar.due(t0 + DEBOUNCE, &current), None);
        assert!(bar.due(t0 + Duration::from_millis(500), &current).is_some());
    }

    #[test]
    fn unchanged_queries_are_not_reissued() {
        let current = SearchCriteria {
            title: "rust".to_string(),
            ..Default::default()
        };
        let t0 = Instant::now();
        let mut bar = SearchBar::default();
        bar.start(Field::Title, &current);
        type_str(&mut bar, "y", t0, &current);
        bar.handle_key(&key(KeyCode::Backspace), t0, &current);

        assert_eq!(bar.due(t0 + DEBOUNCE, &current), None);
    }

    #[test]
    fn enter_searches_immediately() {
        let current = SearchCriteria::default();
        let t0 = Instant::now();
        let mut bar = SearchBar::default();
        bar.start(Field::Category, &current);
        type_str(&mut bar, "datos", t0, &current);

        let searched = bar.handle_key(&key(KeyCode::Enter), t0, &current).unwrap();
        assert_eq!(searched.category, "datos");
        assert!(!bar.is_editing());
        assert_eq!(bar.due(t0 + DEBOUNCE, &current), None);
    }

    #[test]
    fn levels_cycle_back_to_any() {
        let mut bar = SearchBar::default();
        let mut current = SearchCriteria::default();
        let mut seen = vec![];
        for _ in 0..4 {
            current = bar.cycle_level(&current);
            seen.push(current.level.clone());
        }

        assert_eq!(
            seen,
            vec![
                Some(Level::Basic),
                Some(Level::Intermediate),
                Some(Level::Advanced),
                None
            ]
        );
    }
}
