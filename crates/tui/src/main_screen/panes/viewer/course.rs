use aula_client::{course::Course, CourseId};
use crossterm::event::KeyCode;
use ratatui::{
    prelude::Rect,
    style::Stylize,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    event::Event,
    main_screen::{
        panes::{enroll, enter_classroom, show_reviews, Pane},
        Action,
    },
    store::Store,
    styles::{heading, key_hint},
    widgets::Scrolling,
};

/// A course's details, with what the student can do with it
pub struct CourseViewer {
    id: CourseId,
    scroll: Scrolling,
}

impl CourseViewer {
    pub fn new(id: CourseId) -> Self {
        Self {
            id,
            scroll: Scrolling::default(),
        }
    }
}

impl Pane for CourseViewer {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        let p = match (store.course(self.id), store.courses()) {
            (Some(course), _) => Paragraph::new(describe(course, store.is_admin())),
            (None, None) => Paragraph::new("Loading..."),
            (None, Some(_)) => Paragraph::new("This course isn't in the list anymore."),
        };

        self.scroll.render(frame, area, p.wrap(Wrap { trim: false }));
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };

        if self.scroll.handle_key(&key) {
            return Action::None;
        }

        match key.code {
            KeyCode::Char('e') => enroll(store, self.id),
            KeyCode::Char('o') | KeyCode::Enter => enter_classroom(store, self.id),
            KeyCode::Char('r') => show_reviews(store, self.id),
            _ => Action::None,
        }
    }
}

fn describe(course: &Course, admin: bool) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = vec![
        heading(course.title.clone()).into(),
        Line::from(
            [
                Some(course.category.clone()).filter(|c| !c.is_empty()),
                Some(course.level.to_string()),
                Some(course.status.to_string()),
                course.instructor.clone().map(|i| format!("taught by {}", i)),
            ]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" · ")
            .gray(),
        ),
        seats_line(course).into(),
        "".into(),
    ];

    if !course.description.is_empty() {
        lines.extend(course.description.lines().map(|l| Line::raw(l.to_string())));
        lines.push("".into());
    }

    lines.push(
        vec![
            heading("Contents"),
            format!(" ({} lessons)", course.lesson_count()).gray(),
        ]
        .into(),
    );
    if course.modules.is_empty() {
        lines.push("No modules yet.".italic().into());
    }
    for module in course.modules.iter() {
        lines.push(Line::from(vec![
            format!("{}. {}", module.position, module.title).bold(),
            format!(" - {} lessons", module.lessons.len()).gray(),
        ]));
        for lesson in module.lessons.iter() {
            lines.push(Line::raw(format!("    {}", lesson.title)));
        }
    }

    lines.push("".into());
    lines.push(actions(course, admin));

    lines
}

fn seats_line(course: &Course) -> Span<'static> {
    let enrolled = course.enrolled.unwrap_or(0);
    match (course.max_seats, course.seats_left()) {
        (Some(max), Some(0)) => format!("Full, {}/{} seats taken", enrolled, max).red(),
        (Some(max), Some(left)) => {
            format!("{}/{} seats taken, {} left", enrolled, max, left).into()
        }
        _ => format!("{} enrolled", enrolled).into(),
    }
}

fn actions(course: &Course, admin: bool) -> Line<'static> {
    let mut spans: Vec<Span> = vec![];
    if course.already_enrolled {
        spans.extend(["You're enrolled. ".green(), key_hint("o"), " open classroom, ".into()]);
    } else {
        spans.extend([key_hint("e"), " enroll, ".into()]);
        if admin {
            spans.extend([key_hint("o"), " preview classroom, ".into()]);
        }
    }
    spans.extend([key_hint("r"), " reviews, ".into(), key_hint("q"), " back".into()]);

    Line::from(spans)
}
