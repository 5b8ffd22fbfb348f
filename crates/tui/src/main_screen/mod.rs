use std::rc::Rc;

use anyhow::Result;
use aula_client::{Client, Endpoints};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, error};
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::{
    auth_cache::{AuthCache, LoginDetails},
    config::Config,
    event::{Event, EventBus},
    login_prompt::{centered, LoginPrompt},
    store::{Request, Store},
    styles::{error_text, key_hint},
    widgets::FormEvent,
    ExitState, Screen,
};

mod dialog;
pub mod panes;

pub use dialog::Dialog;
use panes::{Document, Navigation, Pane, Viewer};

/// An action that a [`Pane`] can request to be taken
pub enum Action {
    /// Do nothing
    None,

    /// Quit the application
    Exit,

    /// Tell the viewer to show something, and focus the viewer
    Show(Document),

    /// Tell the viewer to show something, but keep focus where it is
    Preview(Document),

    /// Focus the navigation pane
    FocusNavigation,

    /// Go back to the login screen
    Reauthenticate,

    /// We've logged out, so go back to the login screen and forget the saved login
    LoggedOut,

    /// Display the given string at the bottom of the screen
    Flash(Text<'static>),

    /// Ask the user a yes/no question, and send the request if they say yes
    Confirm { question: String, then: Request },

    /// Show a dialog over everything else
    Open(Dialog),
}

/// A question waiting for an answer
struct Confirmation {
    question: String,
    then: Request,
}

/// The main screen of the application
/// The bulk of the UI logic is handled by the [`self::panes`], this just contains shared state.
pub struct MainScreen {
    /// Handle to the client we're using, so we can save auth state when we exit
    client: Client,

    /// Underlying data store
    store: Store,

    /// UI Components & State
    navigation: Navigation,
    viewer: Viewer,
    viewer_focused: bool,
    save_auth_state: bool,

    flash: Text<'static>,
    confirmation: Option<Confirmation>,
    dialog: Option<Dialog>,

    events: Rc<EventBus>,
}

impl MainScreen {
    /// Log in using the given details
    pub fn new(events: Rc<EventBus>, endpoints: Endpoints, details: LoginDetails) -> Result<Self> {
        Self::with_client(
            events,
            Client::new(endpoints, details.creds),
            details.remember,
        )
    }

    /// Use an existing client, eg one restored from the auth cache
    pub fn with_client(
        events: Rc<EventBus>,
        client: Client,
        save_auth_state: bool,
    ) -> Result<Self> {
        let mut store = Store::new(&events, client.clone_sharing_state())?;
        store.reload();
        store.request(Request::Roles);

        Ok(Self {
            store,
            events,
            client,
            navigation: Navigation::default(),
            viewer: Viewer::default(),
            viewer_focused: false,
            save_auth_state,
            flash: Text::raw(""),
            confirmation: None,
            dialog: None,
        })
    }

    /// Quit the application, saving the auth state
    pub fn quit(&mut self) -> Result<ExitState> {
        if self.save_auth_state {
            debug!("saving auth state");
            if let Err(e) = AuthCache::from_client(&self.client).save() {
                error!("error saving auth state: {:#}", e);
            }
        }

        Ok(ExitState::Quit)
    }

    fn to_login(&self, msg: Option<&str>) -> ExitState {
        let config = Config {
            endpoints: self.client.endpoints().clone(),
        };
        let prompt = match msg {
            Some(msg) => LoginPrompt::new_with_msg(self.events.clone(), config, msg),
            None => LoginPrompt::new(self.events.clone(), config),
        };

        ExitState::ChangeScreen(Box::new(prompt))
    }

    /// Answer the pending question with the given key
    fn answer(&mut self, confirmation: Confirmation, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.store.request(confirmation.then);
                Action::Flash("Working...".into())
            }
            _ => Action::Flash("Cancelled".into()),
        }
    }

    /// Give a key to the open dialog
    fn fill_dialog(&mut self, mut dialog: Dialog, key: KeyEvent) -> Action {
        match dialog.handle_key(&key) {
            FormEvent::Editing => {
                self.dialog = Some(dialog);
                Action::None
            }
            FormEvent::Cancel => Action::Flash("Cancelled".into()),
            FormEvent::Submit => match dialog.submit() {
                Ok(req) => {
                    self.store.request(req);
                    Action::Flash("Saving...".into())
                }
                Err(msg) => {
                    self.dialog = Some(dialog);
                    Action::Flash(error_text(msg))
                }
            },
        }
    }

    fn draw_confirmation(&self, frame: &mut Frame, question: &str) {
        let area = centered(frame.size(), 60, 5);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(vec![
                Line::styled(
                    question.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::raw(""),
                Line::from(vec![
                    key_hint("y"),
                    " yes, any other key to cancel".into(),
                ]),
            ])
            .block(Block::default().borders(Borders::ALL).title(" Are you sure? ")),
            area,
        );
    }
}

impl Screen for MainScreen {
    fn draw(&mut self, frame: &mut Frame) {
        let size = frame.size();
        if size.width < 4 || size.height < 4 {
            return;
        }

        // Add margin for borders
        let content_rect = Rect {
            x: size.x + 1,
            y: size.y + 1,
            width: size.width - 2,
            height: size.height - 2,
        };

        // 30/70 split the two panes
        let layout = Layout::new(
            Direction::Horizontal,
            [
                Constraint::Percentage(30),
                Constraint::Length(1),
                Constraint::Percentage(70),
            ],
        )
        .split(content_rect);

        self.navigation.draw(&self.store, frame, layout[0]);
        self.viewer.draw(&self.store, frame, layout[2]);

        // Draw a focus rectangle around one of them.
        let focus_rect = if !self.viewer_focused {
            Rect {
                x: size.x,
                y: size.y,
                width: layout[2].x - size.x,
                height: size.height,
            }
        } else {
            Rect {
                x: layout[1].x,
                y: size.y,
                width: size.width - layout[1].x,
                height: size.height,
            }
        };

        frame.render_widget(Block::default().borders(Borders::ALL), focus_rect);

        frame.render_widget(
            Paragraph::new(self.flash.clone()),
            Rect {
                x: layout[2].x + 1,
                y: size.height.saturating_sub(1),
                width: layout[2].width.saturating_sub(1),
                height: 1,
            },
        );

        if let Some(dialog) = &self.dialog {
            dialog.draw(frame);
        } else if let Some(c) = &self.confirmation {
            self.draw_confirmation(frame, &c.question);
        }
    }

    /// Handle the given event
    fn handle_event(&mut self, event: Event) -> Result<ExitState> {
        // C-C always exits
        if matches!(
            event,
            Event::Key(KeyEvent {
                code: KeyCode::Char('c') | KeyCode::Char('C'),
                modifiers: KeyModifiers::CONTROL,
                ..
            })
        ) {
            return self.quit();
        }

        // Dispatch to whatever has the user's attention
        let action = match event {
            Event::Store(s) => self.store.event(s),
            Event::Tick => self.navigation.tick(&mut self.store),
            Event::Key(key) if self.dialog.is_some() => match self.dialog.take() {
                Some(dialog) => self.fill_dialog(dialog, key),
                None => Action::None,
            },
            Event::Key(key) if self.confirmation.is_some() => match self.confirmation.take() {
                Some(c) => self.answer(c, key),
                None => Action::None,
            },
            x => match self.viewer_focused {
                true => self.viewer.handle_event(&mut self.store, x),
                false => self.navigation.handle_event(&mut self.store, x),
            },
        };

        // Perform action if needed
        match action {
            Action::None => (),
            Action::Exit => {
                return self.quit();
            }
            Action::Show(doc) => {
                self.flash = Text::raw("");
                self.viewer.show(doc);
                self.viewer_focused = true;
            }
            Action::Preview(doc) => {
                self.viewer.show(doc);
            }
            Action::FocusNavigation => {
                self.flash = Text::raw("");
                self.viewer_focused = false;
            }
            Action::Reauthenticate => {
                return Ok(self.to_login(Some(
                    "Authentication failed, please double check your username & password.",
                )));
            }
            Action::LoggedOut => {
                if let Err(e) = AuthCache::clear() {
                    error!("error clearing auth cache: {:#}", e);
                }
                return Ok(self.to_login(None));
            }
            Action::Flash(s) => {
                self.flash = s;
            }
            Action::Confirm { question, then } => {
                self.confirmation = Some(Confirmation { question, then });
            }
            Action::Open(dialog) => {
                self.flash = Text::raw("");
                self.dialog = Some(dialog);
            }
        };

        Ok(ExitState::Running)
    }
}
