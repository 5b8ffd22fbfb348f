use aula_client::CourseId;
use ratatui::{prelude::Rect, Frame};

use crate::{
    event::Event,
    main_screen::Action,
    store::{Request, Store},
    styles::error_text,
};

mod navigation;
mod viewer;

pub use navigation::Navigation;
pub use viewer::{Document, Viewer};

/// An individual pane in the main screen
/// This is similar to the [`crate::Screen`] trait, but we draw multiple panes at the same time.
pub trait Pane {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect);
    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action;
}

/// Enroll in a course, unless we already are
fn enroll(store: &Store, id: CourseId) -> Action {
    match store.course(id) {
        Some(c) if c.already_enrolled => {
            Action::Flash("You're already enrolled, press o to open the classroom".into())
        }
        Some(c) if c.seats_left() == Some(0) => {
            Action::Flash(error_text("There are no seats left in this course"))
        }
        Some(_) => {
            store.request(Request::Enroll(id));
            Action::Flash("Enrolling...".into())
        }
        None => Action::None,
    }
}

/// Open the classroom for a course we're enrolled in
fn enter_classroom(store: &mut Store, id: CourseId) -> Action {
    match store.course(id) {
        Some(c) if !c.already_enrolled && !store.is_admin() => {
            return Action::Flash(error_text("Enroll first, by pressing e"))
        }
        None => return Action::None,
        Some(_) => (),
    };

    if store.session_course_id() != Some(id) && !store.open_classroom(id) {
        return Action::None;
    }

    Action::Show(Document::Classroom)
}

/// Show a course's reviews, fetching them again
fn show_reviews(store: &mut Store, id: CourseId) -> Action {
    store.request_reviews(id);
    Action::Show(Document::Reviews(id))
}
