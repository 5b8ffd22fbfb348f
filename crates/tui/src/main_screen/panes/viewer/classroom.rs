use aula_client::{
    lesson::{embed_video_url, Lesson},
    LessonId,
};
use aula_progress::{find_lesson, next_lesson, previous_lesson, Classroom, ExpandedModules};
use crossterm::event::KeyCode;
use log::debug;
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::{
    event::Event,
    main_screen::{
        panes::{show_reviews, Pane},
        Action,
    },
    store::{Request, Store},
    styles::{error_text, heading, key_hint},
    widgets::Scrolling,
};

/// The course open in the class session: progress, an outline, and the current lesson
#[derive(Debug, Default)]
pub struct ClassroomViewer {
    scroll: Scrolling,

    /// The lesson we last drew, so scrolling starts again on a new one
    shown: Option<LessonId>,
}

impl Pane for ClassroomViewer {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        let Some(room) = store.session().classroom() else {
            frame.render_widget(Paragraph::new("No course is open."), area);
            return;
        };

        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(1),
            ],
        )
        .split(area);

        frame.render_widget(
            Paragraph::new(heading(room.course().title.clone())),
            layout[0],
        );
        frame.render_widget(
            Gauge::default()
                .percent(room.percentage().min(100) as u16)
                .label(format!("{}% complete", room.percentage()))
                .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray)),
            layout[1],
        );
        if store.session().is_completed() {
            frame.render_widget(
                Paragraph::new("You've finished this course, well done!".green().bold()),
                layout[2],
            );
        }

        let columns = Layout::new(
            Direction::Horizontal,
            [Constraint::Percentage(35), Constraint::Percentage(65)],
        )
        .split(layout[3]);

        frame.render_widget(
            Paragraph::new(outline(room))
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::RIGHT)),
            columns[0],
        );

        let current = room.current_lesson();
        let current_id = current.and_then(|l| l.id);
        if current_id != self.shown {
            self.shown = current_id;
            self.scroll.reset();
        }

        let content = match current {
            Some(lesson) => lesson_text(room, lesson),
            None => vec![Line::raw("This course has no lessons yet.")],
        };
        self.scroll.render(
            frame,
            columns[1],
            Paragraph::new(content).wrap(Wrap { trim: false }),
        );
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };

        if self.scroll.handle_key(&key) {
            return Action::None;
        }

        let Some(room) = store.session().classroom() else {
            return Action::None;
        };
        let Some(course_id) = room.course().id else {
            return Action::None;
        };
        let current = room.current_lesson().cloned();

        match key.code {
            KeyCode::Char('n') => {
                let Some(lesson_id) = current.and_then(|l| l.id) else {
                    return Action::None;
                };
                store.request(Request::CompleteLesson {
                    course_id,
                    lesson_id,
                });
                Action::Flash("Saving progress...".into())
            }
            KeyCode::Char(']') => {
                let next = current
                    .and_then(|l| l.id)
                    .and_then(|id| {
                        next_lesson(room.course(), id, &mut ExpandedModules::default())
                    })
                    .and_then(|l| l.id);
                match next {
                    Some(id) => {
                        store.session_mut().select_lesson(id);
                        Action::None
                    }
                    None => Action::Flash("This is the last lesson".into()),
                }
            }
            KeyCode::Char('[') => {
                let previous = current
                    .and_then(|l| l.id)
                    .and_then(|id| previous_lesson(room.course(), id))
                    .and_then(|l| l.id);
                match previous {
                    Some(id) => {
                        store.session_mut().select_lesson(id);
                        Action::None
                    }
                    None => Action::Flash("This is the first lesson".into()),
                }
            }
            KeyCode::Char('t') => {
                let module_id = current
                    .and_then(|l| l.id)
                    .and_then(|id| find_lesson(room.course(), id))
                    .and_then(|(m, _)| m.id);
                if let Some(module_id) = module_id {
                    if let Some(room) = store.session_mut().classroom_mut() {
                        room.toggle_module(module_id);
                    }
                }
                Action::None
            }
            KeyCode::Char('b') => open_link(
                current.and_then(|l| l.video_url).map(|u| embed_video_url(&u)),
                "video",
            ),
            KeyCode::Char('p') => open_link(current.and_then(|l| l.pdf_url), "PDF"),
            KeyCode::Char('r') => show_reviews(store, course_id),
            KeyCode::Char('A') => Action::Confirm {
                question: format!(
                    "Leave {}? Your place in the course will be given up.",
                    room.course().title
                ),
                then: Request::Unenroll(course_id),
            },
            _ => Action::None,
        }
    }
}

fn open_link(url: Option<String>, what: &str) -> Action {
    let Some(url) = url else {
        return Action::Flash(format!("This lesson has no {}", what).into());
    };

    debug!("opening {}", url);
    if let Err(e) = open::that(&url) {
        return Action::Flash(error_text(format!("Error opening in browser: {e}")));
    }

    Action::Flash(format!("Opened {url} in browser").into())
}

/// Modules, with the lessons of the expanded ones
fn outline(room: &Classroom) -> Vec<Line<'static>> {
    let current = room.current_lesson().and_then(|l| l.id);
    let mut lines = vec![];
    for module in room.course().modules.iter() {
        let expanded = module.id.is_some_and(|id| room.is_expanded(id));
        lines.push(Line::from(vec![
            Span::raw(match expanded {
                true => "▾ ",
                false => "▸ ",
            }),
            module.title.clone().bold(),
        ]));

        if !expanded {
            continue;
        }

        for lesson in module.lessons.iter() {
            let done = lesson.id.is_some_and(|id| room.is_lesson_completed(id));
            let title = match lesson.id.is_some() && lesson.id == current {
                true => lesson.title.clone().reversed(),
                false => Span::raw(lesson.title.clone()),
            };
            lines.push(Line::from(vec![
                match done {
                    true => "  ✓ ".green(),
                    false => "    ".into(),
                },
                title,
            ]));
        }
    }

    lines
}

fn lesson_text(room: &Classroom, lesson: &Lesson) -> Vec<Line<'static>> {
    let done = lesson.id.is_some_and(|id| room.is_lesson_completed(id));
    let mut lines: Vec<Line> = vec![
        heading(lesson.title.clone()).into(),
        match done {
            true => "Completed".green().into(),
            false => "Not completed yet".gray().into(),
        },
        "".into(),
    ];

    match lesson.content.trim().is_empty() {
        true => lines.push("This lesson has no text.".italic().into()),
        false => lines.extend(lesson.content.lines().map(|l| Line::raw(l.to_string()))),
    }
    lines.push("".into());

    let mut keys: Vec<Span> = vec![];
    if lesson.video_url.is_some() {
        keys.extend([key_hint("b"), " watch video, ".into()]);
    }
    if lesson.pdf_url.is_some() {
        keys.extend([key_hint("p"), " open PDF, ".into()]);
    }
    keys.extend([
        key_hint("n"),
        " complete & continue, ".into(),
        key_hint("[ ]"),
        " previous/next, ".into(),
        key_hint("t"),
        " fold module".into(),
    ]);
    lines.push(keys.into());
    lines.push(
        vec![
            key_hint("r"),
            " reviews, ".into(),
            key_hint("A"),
            " leave course, ".into(),
            key_hint("q"),
            " close classroom".into(),
        ]
        .into(),
    );

    lines
}
