use ratatui::{
    prelude::Rect,
    style::Stylize,
    text::Line,
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::{
    event::Event,
    main_screen::{panes::Pane, Action},
    store::Store,
    widgets::Scrolling,
};

#[derive(Debug, Default)]
pub struct WelcomeViewer {
    scroll: Scrolling,
}

impl Pane for WelcomeViewer {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        self.scroll
            .render(frame, area, welcome_message(store.is_admin()));
    }

    fn handle_event(&mut self, _: &mut Store, event: Event) -> Action {
        if let Event::Key(key) = event {
            self.scroll.handle_key(&key);
        }
        Action::None
    }
}

fn welcome_message(admin: bool) -> Paragraph<'static> {
    let mut lines: Vec<Line> = vec![
        vec!["Welcome to aula!".blue().bold()].into(),
        "".into(),
        vec![
            "Use ".into(),
            "j/k or ↓/↑".blue(),
            " to move through the courses, then ".into(),
            "Enter".blue(),
            " to open a course or module and see its details.".into(),
        ]
        .into(),
        vec![
            "Press ".into(),
            "/".blue(),
            " to search by title, or ".into(),
            "c".blue(),
            " by category. ".into(),
            "v".blue(),
            " and ".into(),
            "s".blue(),
            " cycle through levels and statuses, and ".into(),
            "x".blue(),
            " clears every filter.".into(),
        ]
        .into(),
        vec![
            "With a course selected, ".into(),
            "e".blue(),
            " enrolls you, ".into(),
            "o".blue(),
            " opens its classroom and ".into(),
            "r".blue(),
            " shows its reviews.".into(),
        ]
        .into(),
        "".into(),
        vec!["In the classroom".blue().bold()].into(),
        vec![
            "n".blue(),
            " marks the lesson as completed and moves on, ".into(),
            "[ ]".blue(),
            " go to the previous or next lesson without marking anything.".into(),
        ]
        .into(),
        vec![
            "b".blue(),
            " opens the lesson's video in your browser, and ".into(),
            "p".blue(),
            " its PDF. ".into(),
            "A".blue(),
            " leaves the course.".into(),
        ]
        .into(),
        vec![
            "Scroll the viewer pane with ".into(),
            "j/k ↓/↑ g/G PgUp/PgDn".blue(),
            ", and go back to the navigation pane with ".into(),
            "q".blue(),
            ".".into(),
        ]
        .into(),
    ];

    if admin {
        lines.extend([
            Line::raw(""),
            Line::from(vec!["Administration".blue().bold()]),
            Line::from(vec![
                "N".blue(),
                " creates a course, ".into(),
                "E".blue(),
                " edits the selected course or module, ".into(),
                "m".blue(),
                " adds a module and ".into(),
                "l".blue(),
                " adds a lesson to the selected module.".into(),
            ]),
            Line::from(vec![
                "J/K".blue(),
                " move a module or lesson down or up, ".into(),
                "+/-".blue(),
                " change the seats, and ".into(),
                "D".blue(),
                " deletes what's selected.".into(),
            ]),
        ]);
    }

    lines.extend([
        Line::raw(""),
        Line::from(vec![
            "R".blue(),
            " reloads, ".into(),
            "L".blue(),
            " logs out, and ".into(),
            "Ctrl-C".blue(),
            " quits.".into(),
        ]),
    ]);

    Paragraph::new(lines).wrap(Wrap { trim: false })
}
