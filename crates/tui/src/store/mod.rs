use std::{collections::HashMap, sync::mpsc::Sender};

use aula_client::{
    course::{Course, CourseDraft, SearchCriteria},
    lesson::LessonRecord,
    module::ModuleDraft,
    review::{Review, ReviewDraft},
    AuthError, Client, CourseId, LessonId, ModuleId,
};
use aula_progress::{sort_by_position, Advance, ClassSession};
use log::{debug, error};
use ratatui::text::Text;

mod worker;
use worker::Worker;

use crate::{
    event::EventBus,
    main_screen::Action,
    styles::{error_text, success_text},
};

/// Data shared by all the panes, plus a handle to the worker which fetches it.
/// Everything here is owned by the UI thread.
pub struct Store {
    courses: Option<Vec<Course>>,
    criteria: SearchCriteria,
    admin: bool,
    session: ClassSession,
    reviews: HashMap<CourseId, Vec<Review>>,

    /// Bumped whenever something shown in the navigation tree changes
    generation: usize,

    worker_channel: Sender<Request>,
}

/// Requests sent to the worker thread
#[derive(Debug)]
pub enum Request {
    Courses(SearchCriteria),
    Roles,
    Enroll(CourseId),
    Unenroll(CourseId),
    Progress(CourseId),
    CompleteLesson {
        course_id: CourseId,
        lesson_id: LessonId,
    },
    Reviews(CourseId),
    CreateReview(ReviewDraft),
    CreateCourse(CourseDraft),
    UpdateCourse(CourseId, CourseDraft),
    DeleteCourse(CourseId),
    UpdateQuota(CourseId, u32),
    AddModule(CourseId, ModuleDraft),
    UpdateModule(ModuleId, ModuleDraft),
    SaveModules(Vec<(ModuleId, ModuleDraft)>),
    DeleteModule(ModuleId),
    AddLesson(ModuleId, LessonRecord),
    DeleteLesson(LessonId),
    Logout,
}

impl Request {
    /// Describes the request, for error messages
    fn failure_message(&self) -> &'static str {
        match self {
            Request::Courses(_) => "Could not load courses",
            Request::Roles => "Could not read your roles",
            Request::Enroll(_) => "Could not enroll",
            Request::Unenroll(_) => "Could not leave the course",
            Request::Progress(_) => "Could not load your progress",
            Request::CompleteLesson { .. } => "Could not save progress",
            Request::Reviews(_) => "Could not load reviews",
            Request::CreateReview(_) => "Could not post review",
            Request::CreateCourse(_) => "Could not create course",
            Request::UpdateCourse(..) => "Could not save course",
            Request::DeleteCourse(_) => "Could not delete course",
            Request::UpdateQuota(..) => "Could not change seats",
            Request::AddModule(..) => "Could not add module",
            Request::UpdateModule(..) => "Could not save module",
            Request::SaveModules(_) => "Could not save module order",
            Request::DeleteModule(_) => "Could not delete module",
            Request::AddLesson(..) => "Could not add lesson",
            Request::DeleteLesson(_) => "Could not delete lesson",
            Request::Logout => "Could not log out",
        }
    }
}

/// Messages received by the app from the worker thread
#[derive(Debug)]
pub enum Event {
    Error {
        message: &'static str,
        error: aula_client::Error,
    },
    Courses(Vec<Course>),
    Roles {
        admin: bool,
    },
    Enrolled(CourseId),
    Unenrolled(CourseId),
    Progress(CourseId, Vec<LessonId>),
    LessonCompleted {
        course_id: CourseId,
        lesson_id: LessonId,
    },
    Reviews(CourseId, Vec<Review>),
    ReviewCreated(Review),

    /// The gateway's data was changed, so the courses should be reloaded
    Changed(&'static str),

    LoggedOut,
}

impl Store {
    /// Create a new store, spawning its worker on the given bus
    pub fn new(bus: &EventBus, client: Client) -> anyhow::Result<Self> {
        let worker_channel = Worker::spawn_on(bus, client)?;

        Ok(Self {
            courses: None,
            criteria: SearchCriteria::default(),
            admin: false,
            session: ClassSession::default(),
            reviews: HashMap::new(),
            generation: 0,
            worker_channel,
        })
    }

    fn send(&self, req: Request) {
        debug!("sending request {:?}", req);
        if let Err(e) = self.worker_channel.send(req) {
            error!("store worker has gone away: {}", e);
        }
    }

    /// Send a request whose result will come back as an [`Event`]
    pub fn request(&self, req: Request) {
        self.send(req)
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    fn changed(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// The courses matching the current search, or `None` if they're still loading
    pub fn courses(&self) -> Option<&[Course]> {
        self.courses.as_deref()
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses()?.iter().find(|c| c.id == Some(id))
    }

    /// Mutable access to a course, for local reordering
    pub fn course_mut(&mut self, id: CourseId) -> Option<&mut Course> {
        self.changed();
        self.courses.as_mut()?.iter_mut().find(|c| c.id == Some(id))
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    /// Search using new criteria
    pub fn search(&mut self, criteria: SearchCriteria) {
        self.criteria = criteria;
        self.reload();
    }

    /// Fetch the courses again, using the current criteria
    pub fn reload(&mut self) {
        self.courses = None;
        self.changed();
        self.send(Request::Courses(self.criteria.clone()));
    }

    pub fn session(&self) -> &ClassSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ClassSession {
        self.changed();
        &mut self.session
    }

    /// The course the classroom is showing, if any
    pub fn session_course_id(&self) -> Option<CourseId> {
        self.session.classroom().and_then(|c| c.course().id)
    }

    /// Enter a course's classroom, and fetch the student's progress in it
    pub fn open_classroom(&mut self, id: CourseId) -> bool {
        let Some(course) = self.course(id).cloned() else {
            return false;
        };

        self.session.open(course);
        self.changed();
        self.send(Request::Progress(id));

        true
    }

    pub fn leave_classroom(&mut self) {
        self.session.leave();
        self.changed();
    }

    pub fn reviews(&self, id: CourseId) -> Option<&[Review]> {
        self.reviews.get(&id).map(Vec::as_slice)
    }

    pub fn request_reviews(&mut self, id: CourseId) {
        self.reviews.remove(&id);
        self.send(Request::Reviews(id));
    }

    /// Handle an event from the worker, returning what the UI should do about it
    pub fn event(&mut self, e: Event) -> Action {
        match e {
            Event::Error {
                error: aula_client::Error::AuthError(AuthError::LoginFailed),
                ..
            } => return Action::Reauthenticate,
            Event::Error { message, error } => {
                error!("{}: {}", message, error);
                if self.courses.is_none() {
                    // don't leave the tree stuck on loading
                    self.courses = Some(vec![]);
                    self.changed();
                }
                return Action::Flash(error_text(format!("{}: {}", message, error)));
            }
            Event::Courses(mut courses) => {
                debug!("loaded {} courses", courses.len());
                for course in courses.iter_mut() {
                    sort_by_position(&mut course.modules);
                    for module in course.modules.iter_mut() {
                        sort_by_position(&mut module.lessons);
                    }
                }
                self.courses = Some(courses);
                self.changed();
            }
            Event::Roles { admin } => {
                self.admin = admin;
            }
            Event::Enrolled(_) => {
                self.reload();
                return Action::Flash(success_text("Enrolled! Press o to start learning."));
            }
            Event::Unenrolled(id) => {
                if self.session_course_id() == Some(id) {
                    self.leave_classroom();
                }
                self.reload();
                return Action::Show(crate::main_screen::panes::Document::Course(id));
            }
            Event::Progress(course_id, ids) => {
                if self.session_course_id() == Some(course_id) {
                    self.session.progress_loaded(ids);
                    self.changed();
                }
            }
            Event::LessonCompleted {
                course_id,
                lesson_id,
            } => {
                if self.session_course_id() != Some(course_id) {
                    return Action::None;
                }

                self.changed();
                return match self.session.lesson_completed(lesson_id) {
                    Some(Advance::Next(next)) => {
                        Action::Flash(format!("Lesson completed, next: {}", next.title).into())
                    }
                    Some(Advance::CourseCompleted) => Action::Flash(success_text(
                        "Course complete! Congratulations on finishing every lesson.",
                    )),
                    None => Action::None,
                };
            }
            Event::Reviews(id, reviews) => {
                self.reviews.insert(id, reviews);
            }
            Event::ReviewCreated(review) => {
                self.reviews
                    .entry(review.course_id)
                    .or_default()
                    .insert(0, review);
                return Action::Flash(success_text("Review posted, thanks!"));
            }
            Event::Changed(message) => {
                self.reload();
                return Action::Flash(Text::raw(message));
            }
            Event::LoggedOut => return Action::LoggedOut,
        };

        Action::None
    }
}
