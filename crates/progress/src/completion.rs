use std::collections::HashSet;

use aula_client::{course::Course, LessonId};

/// The lessons a student has completed in one course.
/// The gateway may report a lesson more than once, this only counts it once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSet(HashSet<LessonId>);

impl CompletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the lesson was already there
    pub fn insert(&mut self, id: LessonId) -> bool {
        self.0.insert(id)
    }

    pub fn contains(&self, id: LessonId) -> bool {
        self.0.contains(&id)
    }

    /// Number of distinct lessons completed
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = LessonId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<LessonId> for CompletionSet {
    fn from_iter<I: IntoIterator<Item = LessonId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<LessonId> for CompletionSet {
    fn extend<I: IntoIterator<Item = LessonId>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

/// Percentage of the course's lessons that are completed, from 0 to 100.
///
/// A course with no lessons is 0% complete. The result is capped at 100, since the set can
/// mention lessons which have since been removed from the course.
pub fn completion_percentage(course: &Course, completed: &CompletionSet) -> u8 {
    let total = course.lesson_count();
    if total == 0 {
        return 0;
    }

    let pct = (completed.len() as f64 / total as f64 * 100.0).round();
    pct.min(100.0) as u8
}
