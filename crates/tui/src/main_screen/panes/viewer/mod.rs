use aula_client::CourseId;
use crossterm::event::KeyCode;
use ratatui::{prelude::Rect, Frame};

use crate::{event::Event, store::Store};

use super::{Action, Pane};

mod classroom;
mod course;
mod reviews;
mod welcome;

use classroom::ClassroomViewer;
use course::CourseViewer;
use reviews::ReviewsViewer;
use welcome::WelcomeViewer;

/// Something we want to show in the viewer
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Document {
    /// The welcome message and key reference
    #[default]
    Welcome,

    /// A course's details
    Course(CourseId),

    /// The course open in the store's class session
    Classroom,

    /// What students thought of a course
    Reviews(CourseId),
}

/// Shows [`Document`]s to the user.
/// Most of the view logic is in submodules, to keep things clean.
pub enum Viewer {
    Welcome(WelcomeViewer),
    Course(CourseViewer),
    Classroom(ClassroomViewer),
    Reviews(ReviewsViewer),
}

impl Default for Viewer {
    fn default() -> Self {
        Self::Welcome(Default::default())
    }
}

impl Viewer {
    /// Set the content that we will show from next draw.
    pub fn show(&mut self, d: Document) {
        match d {
            Document::Welcome => *self = Self::Welcome(Default::default()),
            Document::Course(id) => *self = Self::Course(CourseViewer::new(id)),
            Document::Classroom => *self = Self::Classroom(Default::default()),
            Document::Reviews(id) => *self = Self::Reviews(ReviewsViewer::new(id)),
        };
    }
}

impl Pane for Viewer {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        match self {
            Viewer::Welcome(viewer) => viewer.draw(store, frame, area),
            Viewer::Course(viewer) => viewer.draw(store, frame, area),
            Viewer::Classroom(viewer) => viewer.draw(store, frame, area),
            Viewer::Reviews(viewer) => viewer.draw(store, frame, area),
        }
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };

        if let KeyCode::Char('q') | KeyCode::Esc = key.code {
            // leaving the classroom ends the session, and goes back to the course it was for
            if let Viewer::Classroom(_) = self {
                match store.session_course_id() {
                    Some(id) => self.show(Document::Course(id)),
                    None => self.show(Document::Welcome),
                }
                store.leave_classroom();
            }
            return Action::FocusNavigation;
        };

        match self {
            Viewer::Welcome(viewer) => viewer.handle_event(store, event),
            Viewer::Course(viewer) => viewer.handle_event(store, event),
            Viewer::Classroom(viewer) => viewer.handle_event(store, event),
            Viewer::Reviews(viewer) => viewer.handle_event(store, event),
        }
    }
}
