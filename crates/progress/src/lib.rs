//! Works out how far through a course a student is, and what they should see next.
//!
//! Everything here is synchronous and works on data that has already been fetched.
//! Deciding what to fetch or send is left to the caller.

mod completion;
mod reorder;
mod sequence;
mod session;

pub use completion::{completion_percentage, CompletionSet};
pub use reorder::{reorder_within_parent, sort_by_position, Ordered};
pub use sequence::{find_lesson, first_lesson, next_lesson, previous_lesson, ExpandedModules};
pub use session::{Advance, ClassSession, Classroom};
