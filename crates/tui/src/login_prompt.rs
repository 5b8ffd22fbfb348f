use std::rc::Rc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::Stylize,
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::{
    auth_cache::LoginDetails,
    config::Config,
    event::{Event, EventBus},
    main_screen::MainScreen,
    styles::{error_text, key_hint},
    widgets::{Form, FormEvent},
    ExitState, Screen,
};

const USERNAME: &str = "Username";
const PASSWORD: &str = "Password";
const REMEMBER: &str = "Remember me";

/// Asks for a username and password, then moves on to the [`MainScreen`]
pub struct LoginPrompt {
    events: Rc<EventBus>,
    config: Config,
    form: Form,
    msg: Text<'static>,
}

impl LoginPrompt {
    pub fn new(events: Rc<EventBus>, config: Config) -> Self {
        Self {
            events,
            config,
            form: Form::new()
                .text(USERNAME, "")
                .secret(PASSWORD)
                .toggle(REMEMBER, true),
            msg: Text::raw(""),
        }
    }

    /// Show the prompt with a message, eg because the last login failed
    pub fn new_with_msg(events: Rc<EventBus>, config: Config, msg: impl Into<String>) -> Self {
        Self {
            msg: error_text(msg.into()),
            ..Self::new(events, config)
        }
    }

    fn extract_details(&self) -> Option<LoginDetails> {
        let username = self.form.value(USERNAME).trim();
        let password = self.form.value(PASSWORD);
        if username.is_empty() || password.is_empty() {
            return None;
        }

        Some(LoginDetails {
            creds: (username.to_string(), password.to_string().into()),
            remember: self.form.is_on(REMEMBER),
        })
    }

    fn submit(&mut self) -> Result<ExitState> {
        let Some(details) = self.extract_details() else {
            self.msg = error_text("Enter both a username and a password.");
            self.form.focus(if self.form.value(USERNAME).trim().is_empty() {
                USERNAME
            } else {
                PASSWORD
            });
            return Ok(ExitState::Running);
        };

        Ok(ExitState::ChangeScreen(Box::new(MainScreen::new(
            self.events.clone(),
            self.config.endpoints.clone(),
            details,
        )?)))
    }
}

impl Screen for LoginPrompt {
    fn draw(&mut self, frame: &mut Frame) {
        let area = centered(frame.size(), 60, 11);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Log in to aula ".bold());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(2),
            ],
        )
        .split(inner);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                "Signing in at ".into(),
                self.config.endpoints.issuer.clone().italic(),
            ])),
            layout[0],
        );
        self.form.draw(frame, layout[1]);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                key_hint("Tab"),
                " next field, ".into(),
                key_hint("Space"),
                " toggle, ".into(),
                key_hint("Enter"),
                " log in, ".into(),
                key_hint("Esc"),
                " quit".into(),
            ])),
            layout[2],
        );
        frame.render_widget(
            Paragraph::new(self.msg.clone()).wrap(Wrap { trim: true }),
            layout[3],
        );
    }

    fn handle_event(&mut self, event: Event) -> Result<ExitState> {
        let Event::Key(key) = event else {
            return Ok(ExitState::Running);
        };

        if let KeyEvent {
            code: KeyCode::Char('c') | KeyCode::Char('C'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } = key
        {
            return Ok(ExitState::Quit);
        }

        match self.form.handle_key(&key) {
            FormEvent::Editing => Ok(ExitState::Running),
            FormEvent::Cancel => Ok(ExitState::Quit),
            FormEvent::Submit => self.submit(),
        }
    }
}

/// A rectangle of at most the given size, in the middle of `area`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
