use std::collections::HashSet;

use aula_client::{
    review::{average_rating, truncate_comment, Review, COMMENT_PREVIEW_CHARS},
    CourseId,
};
use crossterm::event::KeyCode;
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Text},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use crate::{
    event::Event,
    main_screen::{panes::Pane, Action, Dialog},
    store::Store,
    styles::{heading, key_hint, stars},
    widgets::StatefulList,
};

/// What students thought of a course
pub struct ReviewsViewer {
    id: CourseId,
    list: StatefulList,

    /// Indices of reviews shown with their whole comment
    expanded: HashSet<usize>,
}

impl ReviewsViewer {
    pub fn new(id: CourseId) -> Self {
        Self {
            id,
            list: StatefulList::default(),
            expanded: HashSet::new(),
        }
    }
}

impl Pane for ReviewsViewer {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(1),
            ],
        )
        .split(area);

        let title = store
            .course(self.id)
            .map(|c| c.title.clone())
            .unwrap_or_else(|| "this course".to_string());
        let reviews = store.reviews(self.id);

        let summary: Line = match reviews {
            None => "Loading reviews...".into(),
            Some([]) => "No reviews yet, press w to write the first one.".italic().into(),
            Some(rs) => {
                let avg = average_rating(rs);
                vec![
                    stars(avg.round() as u8),
                    format!(" {:.1} from {} reviews", avg, rs.len()).into(),
                ]
                .into()
            }
        };
        frame.render_widget(
            Paragraph::new(vec![heading(format!("Reviews of {}", title)).into(), summary]),
            layout[0],
        );

        let width = layout[1].width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = reviews
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(i, r)| ListItem::new(review_text(r, self.expanded.contains(&i), width)))
            .collect();
        self.list.render_to(
            frame,
            layout[1],
            List::new(items)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> "),
        );

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                key_hint("w"),
                " write a review, ".into(),
                key_hint("Enter"),
                " show all of a review, ".into(),
                key_hint("q"),
                " back".into(),
            ])),
            layout[2],
        );
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.list.next(),
            KeyCode::Up | KeyCode::Char('k') => self.list.previous(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(i) = self.list.selected() {
                    if !self.expanded.remove(&i) {
                        self.expanded.insert(i);
                    }
                }
            }
            KeyCode::Char('w') => {
                let title = store
                    .course(self.id)
                    .map(|c| c.title.as_str())
                    .unwrap_or("course");
                return Action::Open(Dialog::write_review(title, self.id));
            }
            KeyCode::Char('R') => {
                self.expanded.clear();
                store.request_reviews(self.id);
            }
            _ => (),
        };

        Action::None
    }
}

fn review_text(review: &Review, expanded: bool, width: usize) -> Text<'static> {
    let mut header = vec![stars(review.rating)];
    if let Some(title) = review.title.as_ref().filter(|t| !t.is_empty()) {
        header.push(format!(" {}", title).bold());
    }
    if let Some(at) = review.created_at {
        header.push(format!("  {}", at.format("%Y-%m-%d")).gray());
    }

    let comment = match expanded {
        true => review.comment.clone(),
        false => truncate_comment(&review.comment, COMMENT_PREVIEW_CHARS).into_owned(),
    };

    let mut lines = vec![Line::from(header)];
    lines.extend(wrap(&comment, width).into_iter().map(Line::raw));
    lines.push(Line::raw(""));

    Text::from(lines)
}

/// Break text into lines of at most `width` characters, preferring to break at spaces
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(10);
    let mut lines = vec![];
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let len = line.chars().count();
            if len > 0 && len + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }

    lines
}
