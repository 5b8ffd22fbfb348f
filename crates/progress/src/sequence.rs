use std::collections::HashSet;

use aula_client::{course::Course, lesson::Lesson, module::Module, LessonId, ModuleId};
use log::debug;

/// Which modules are shown expanded.
/// This is presentation state, so it's kept apart from the modules themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedModules(HashSet<ModuleId>);

impl ExpandedModules {
    pub fn expand(&mut self, id: ModuleId) {
        self.0.insert(id);
    }

    pub fn collapse(&mut self, id: ModuleId) {
        self.0.remove(&id);
    }

    pub fn toggle(&mut self, id: ModuleId) {
        if !self.0.remove(&id) {
            self.0.insert(id);
        }
    }

    pub fn is_expanded(&self, id: ModuleId) -> bool {
        self.0.contains(&id)
    }

    /// Collapse everything except the course's first module
    pub fn expand_only_first(&mut self, course: &Course) {
        self.0.clear();
        if let Some(id) = course.modules.first().and_then(|m| m.id) {
            self.0.insert(id);
        }
    }
}

/// The first lesson of the course, skipping over modules with no lessons
pub fn first_lesson(course: &Course) -> Option<&Lesson> {
    course.modules.iter().flat_map(|m| m.lessons.iter()).next()
}

/// Find a lesson, and the module it's in
pub fn find_lesson(course: &Course, id: LessonId) -> Option<(&Module, &Lesson)> {
    course.modules.iter().find_map(|m| {
        m.lessons
            .iter()
            .find(|l| l.id == Some(id))
            .map(|l| (m, l))
    })
}

/// The lesson after `current`, in module order then lesson order.
/// The module holding it is expanded, so the learner can see where they are.
///
/// Returns `None` if `current` is the last lesson of the course, or isn't in the course at all.
pub fn next_lesson<'a>(
    course: &'a Course,
    current: LessonId,
    expanded: &mut ExpandedModules,
) -> Option<&'a Lesson> {
    let mut found_current = false;
    for module in course.modules.iter() {
        for lesson in module.lessons.iter() {
            if found_current {
                if let Some(id) = module.id {
                    expanded.expand(id);
                }
                return Some(lesson);
            }

            if lesson.id == Some(current) {
                found_current = true;
            }
        }
    }

    if !found_current {
        debug!("lesson {} isn't in course {:?}", current, course.id);
    }
    None
}

/// The lesson before `current`, or `None` if it's the first or can't be found
pub fn previous_lesson(course: &Course, current: LessonId) -> Option<&Lesson> {
    let mut prev = None;
    for lesson in course.modules.iter().flat_map(|m| m.lessons.iter()) {
        if lesson.id == Some(current) {
            return prev;
        }
        prev = Some(lesson);
    }

    None
}
