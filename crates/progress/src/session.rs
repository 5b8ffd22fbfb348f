use aula_client::{course::Course, lesson::Lesson, LessonId, ModuleId};

use crate::{
    completion::{completion_percentage, CompletionSet},
    sequence::{find_lesson, first_lesson, next_lesson, ExpandedModules},
};

/// A student working through one course
#[derive(Debug, Clone, PartialEq)]
pub struct Classroom {
    course: Course,
    current: Option<LessonId>,
    completed: CompletionSet,
    expanded: ExpandedModules,
    percentage: u8,
}

impl Classroom {
    fn new(course: Course) -> Self {
        let mut expanded = ExpandedModules::default();
        expanded.expand_only_first(&course);
        let current = first_lesson(&course).and_then(|l| l.id);

        Self {
            course,
            current,
            completed: CompletionSet::new(),
            expanded,
            percentage: 0,
        }
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    /// The lesson being shown, if the course has any
    pub fn current_lesson(&self) -> Option<&Lesson> {
        find_lesson(&self.course, self.current?).map(|(_, l)| l)
    }

    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    pub fn completed(&self) -> &CompletionSet {
        &self.completed
    }

    pub fn is_lesson_completed(&self, id: LessonId) -> bool {
        self.completed.contains(id)
    }

    pub fn is_expanded(&self, id: ModuleId) -> bool {
        self.expanded.is_expanded(id)
    }

    pub fn toggle_module(&mut self, id: ModuleId) {
        self.expanded.toggle(id);
    }

    fn recompute(&mut self) {
        self.percentage = completion_percentage(&self.course, &self.completed);
    }
}

/// What happens after a lesson is completed
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Move on to this lesson
    Next(Lesson),

    /// That was the last lesson
    CourseCompleted,
}

/// State of the classroom view
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ClassSession {
    /// Not in a course
    #[default]
    Unopened,

    /// Working through a course
    Opened(Classroom),

    /// Finished the last lesson of a course.
    /// Lessons can still be viewed, but there's nothing left to advance to.
    Completed(Classroom),
}

impl ClassSession {
    /// Enter a course, showing its first lesson with only the first module expanded.
    /// Progress isn't known yet, see [`Self::progress_loaded`].
    pub fn open(&mut self, course: Course) {
        *self = ClassSession::Opened(Classroom::new(course));
    }

    /// Leave the course, whatever state we were in
    pub fn leave(&mut self) {
        *self = ClassSession::Unopened;
    }

    pub fn classroom(&self) -> Option<&Classroom> {
        match self {
            ClassSession::Unopened => None,
            ClassSession::Opened(c) | ClassSession::Completed(c) => Some(c),
        }
    }

    pub fn classroom_mut(&mut self) -> Option<&mut Classroom> {
        match self {
            ClassSession::Unopened => None,
            ClassSession::Opened(c) | ClassSession::Completed(c) => Some(c),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ClassSession::Completed(_))
    }

    /// Replace the set of completed lessons with what the gateway reported
    pub fn progress_loaded(&mut self, ids: impl IntoIterator<Item = LessonId>) {
        let completed_course = self.is_completed();
        if let Some(room) = self.classroom_mut() {
            room.completed = ids.into_iter().collect();
            room.recompute();
            if completed_course {
                room.percentage = 100;
            }
        }
    }

    /// Show a different lesson. Unknown lessons are ignored.
    pub fn select_lesson(&mut self, id: LessonId) -> Option<&Lesson> {
        let room = self.classroom_mut()?;
        let (module, _) = find_lesson(&room.course, id)?;
        if let Some(module_id) = module.id {
            room.expanded.expand(module_id);
        }
        room.current = Some(id);

        room.current_lesson()
    }

    /// Record that a lesson was completed, and move on to the next one.
    /// Returns `None` when no course is open.
    pub fn lesson_completed(&mut self, id: LessonId) -> Option<Advance> {
        let room = self.classroom_mut()?;
        room.completed.insert(id);
        room.recompute();

        let next = next_lesson(&room.course, id, &mut room.expanded).cloned();
        match next {
            Some(lesson) => {
                room.current = lesson.id;
                Some(Advance::Next(lesson))
            }
            None => {
                let (ClassSession::Opened(mut room) | ClassSession::Completed(mut room)) =
                    std::mem::take(self)
                else {
                    return None;
                };
                room.percentage = 100;
                *self = ClassSession::Completed(room);
                Some(Advance::CourseCompleted)
            }
        }
    }
}
