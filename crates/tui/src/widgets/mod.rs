mod form;
mod scrolling;
mod stateful_list;

pub use form::{Form, FormEvent};
pub use scrolling::Scrolling;
pub use stateful_list::StatefulList;
