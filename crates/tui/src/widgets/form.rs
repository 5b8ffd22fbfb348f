use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Secret,
    Toggle,
}

#[derive(Debug, Clone)]
struct Field {
    label: &'static str,
    value: String,
    on: bool,
    kind: FieldKind,
}

/// A column of labelled inputs
#[derive(Debug, Clone, Default)]
pub struct Form {
    fields: Vec<Field>,
    focused: usize,
}

/// The result of giving a key to a [`Form`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Editing,
    Submit,
    Cancel,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, label: &'static str, initial: impl Into<String>) -> Self {
        self.push(label, initial.into(), false, FieldKind::Text);
        self
    }

    /// A text field whose contents aren't shown
    pub fn secret(mut self, label: &'static str) -> Self {
        self.push(label, String::new(), false, FieldKind::Secret);
        self
    }

    /// A yes/no field, changed with space
    pub fn toggle(mut self, label: &'static str, on: bool) -> Self {
        self.push(label, String::new(), on, FieldKind::Toggle);
        self
    }

    fn push(&mut self, label: &'static str, value: String, on: bool, kind: FieldKind) {
        self.fields.push(Field {
            label,
            value,
            on,
            kind,
        });
    }

    fn field(&self, label: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.label == label)
    }

    /// The text entered in the given field, or an empty string if there's no such field
    pub fn value(&self, label: &str) -> &str {
        self.field(label).map(|f| f.value.as_str()).unwrap_or_default()
    }

    pub fn is_on(&self, label: &str) -> bool {
        self.field(label).is_some_and(|f| f.on)
    }

    /// Move focus to the given field
    pub fn focus(&mut self, label: &str) {
        if let Some(i) = self.fields.iter().position(|f| f.label == label) {
            self.focused = i;
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> FormEvent {
        if self.fields.is_empty() {
            return match key.code {
                KeyCode::Esc => FormEvent::Cancel,
                _ => FormEvent::Submit,
            };
        }

        let last = self.fields.len() - 1;
        // toggles after the last text field don't need visiting before submitting
        let only_toggles_left = self.fields[self.focused + 1..]
            .iter()
            .all(|f| f.kind == FieldKind::Toggle);

        let field = &mut self.fields[self.focused];
        match key.code {
            KeyCode::Esc => return FormEvent::Cancel,
            KeyCode::Enter if only_toggles_left => return FormEvent::Submit,
            KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                self.focused = (self.focused + 1).min(last)
            }
            KeyCode::BackTab | KeyCode::Up => self.focused = self.focused.saturating_sub(1),

            KeyCode::Char(' ') if field.kind == FieldKind::Toggle => field.on = !field.on,
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                field.value.clear()
            }
            KeyCode::Char(c) if field.kind != FieldKind::Toggle => field.value.push(c),
            KeyCode::Backspace => {
                field.value.pop();
            }
            _ => (),
        };

        FormEvent::Editing
    }

    /// Draw one line per field, with the focused one highlighted
    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let label_width = self
            .fields
            .iter()
            .map(|f| f.label.chars().count())
            .max()
            .unwrap_or(0) as u16
            + 2;

        let rows = Layout::new(
            Direction::Vertical,
            self.fields.iter().map(|_| Constraint::Length(1)),
        )
        .split(area);

        for (i, (field, row)) in self.fields.iter().zip(rows.iter()).enumerate() {
            let focused = i == self.focused;
            let shown = match field.kind {
                FieldKind::Text => field.value.clone(),
                FieldKind::Secret => "*".repeat(field.value.chars().count()),
                FieldKind::Toggle => match field.on {
                    true => "[x]".to_string(),
                    false => "[ ]".to_string(),
                },
            };

            let label = Span::styled(
                format!("{:>width$} ", field.label, width = label_width as usize - 1),
                Style::default().add_modifier(Modifier::BOLD),
            );
            let value = match focused {
                true => Span::raw(format!("{}_", shown)).reversed(),
                false => Span::raw(shown),
            };

            frame.render_widget(Paragraph::new(Line::from(vec![label, value])), *row);
        }
    }
}
