use aula_client::{
    course::{Course, CourseDraft, Level, Status},
    lesson::LessonRecord,
    module::{Module, ModuleDraft},
    review::ReviewDraft,
    CourseId, ModuleId,
};
use crossterm::event::KeyEvent;
use ratatui::{
    prelude::{Constraint, Direction, Layout},
    style::Stylize,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::{
    login_prompt::centered,
    store::Request,
    styles::key_hint,
    widgets::{Form, FormEvent},
};

const TITLE: &str = "Title";
const DESCRIPTION: &str = "Description";
const CATEGORY: &str = "Category";
const LEVEL: &str = "Level";
const STATUS: &str = "Status";
const SEATS: &str = "Seats";
const CONTENT: &str = "Content";
const VIDEO: &str = "Video URL";
const PDF: &str = "PDF URL";
const RATING: &str = "Rating (1-5)";
const COMMENT: &str = "Comment";

/// What a dialog's form will be turned into
#[derive(Debug, Clone, PartialEq)]
enum Purpose {
    NewCourse,
    EditCourse(CourseId),
    AddModule { course_id: CourseId, position: u32 },
    EditModule(ModuleId, ModuleDraft),
    AddLesson { module_id: ModuleId, position: u32 },
    WriteReview(CourseId),
}

/// A popup form for creating or editing something
pub struct Dialog {
    title: String,
    purpose: Purpose,
    form: Form,
}

impl Dialog {
    pub fn new_course() -> Self {
        Self {
            title: "New course".to_string(),
            purpose: Purpose::NewCourse,
            form: course_form(&CourseDraft::default()),
        }
    }

    pub fn edit_course(course: &Course, id: CourseId) -> Self {
        Self {
            title: format!("Editing {}", course.title),
            purpose: Purpose::EditCourse(id),
            form: course_form(&CourseDraft::from(course)),
        }
    }

    /// Add a module to the end of a course
    pub fn add_module(course: &Course, course_id: CourseId) -> Self {
        Self {
            title: format!("New module in {}", course.title),
            purpose: Purpose::AddModule {
                course_id,
                position: course.modules.len() as u32 + 1,
            },
            form: Form::new().text(TITLE, "").text(DESCRIPTION, ""),
        }
    }

    /// Rename a module or change its description, keeping its place and lessons
    pub fn edit_module(module: &Module, id: ModuleId) -> Self {
        let draft = ModuleDraft::from(module);
        Self {
            title: format!("Editing {}", module.title),
            form: Form::new()
                .text(TITLE, draft.title.clone())
                .text(DESCRIPTION, draft.description.clone()),
            purpose: Purpose::EditModule(id, draft),
        }
    }

    /// Add a lesson to the end of a module
    pub fn add_lesson(module_title: &str, module_id: ModuleId, lesson_count: usize) -> Self {
        Self {
            title: format!("New lesson in {}", module_title),
            purpose: Purpose::AddLesson {
                module_id,
                position: lesson_count as u32 + 1,
            },
            form: Form::new()
                .text(TITLE, "")
                .text(CONTENT, "")
                .text(VIDEO, "")
                .text(PDF, ""),
        }
    }

    pub fn write_review(course_title: &str, course_id: CourseId) -> Self {
        let draft = ReviewDraft::new(course_id);
        Self {
            title: format!("Review {}", course_title),
            purpose: Purpose::WriteReview(course_id),
            form: Form::new()
                .text(RATING, draft.rating.to_string())
                .text(TITLE, "")
                .text(COMMENT, ""),
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> FormEvent {
        self.form.handle_key(key)
    }

    /// Turn the form into a request, or explain what's wrong with it
    pub fn submit(&self) -> Result<Request, String> {
        let text = |label: &str| self.form.value(label).trim().to_string();
        let required = |label: &'static str| {
            let v = text(label);
            match v.is_empty() {
                true => Err(format!("{} is required", label)),
                false => Ok(v),
            }
        };

        Ok(match &self.purpose {
            Purpose::NewCourse | Purpose::EditCourse(_) => {
                let draft = CourseDraft {
                    title: required(TITLE)?,
                    description: text(DESCRIPTION),
                    category: text(CATEGORY),
                    level: Level::from(required(LEVEL)?),
                    status: Status::from(required(STATUS)?),
                    max_seats: parse_optional(&text(SEATS), SEATS)?,
                };

                match &self.purpose {
                    Purpose::EditCourse(id) => Request::UpdateCourse(*id, draft),
                    _ => Request::CreateCourse(draft),
                }
            }
            Purpose::AddModule {
                course_id,
                position,
            } => Request::AddModule(
                *course_id,
                ModuleDraft {
                    id: None,
                    title: required(TITLE)?,
                    description: text(DESCRIPTION),
                    position: *position,
                    lessons: vec![],
                },
            ),
            Purpose::EditModule(id, draft) => Request::UpdateModule(
                *id,
                ModuleDraft {
                    id: Some(*id),
                    title: required(TITLE)?,
                    description: text(DESCRIPTION),
                    ..draft.clone()
                },
            ),
            Purpose::AddLesson {
                module_id,
                position,
            } => {
                let mut record = LessonRecord {
                    module_id: Some(*module_id),
                    title: required(TITLE)?,
                    content: text(CONTENT),
                    position: *position,
                    video_url: Some(text(VIDEO)),
                    pdf_url: Some(text(PDF)),
                    ..Default::default()
                };
                aula_client::lesson::normalize_lesson(&mut record);

                Request::AddLesson(*module_id, record)
            }
            Purpose::WriteReview(course_id) => {
                let rating = parse_optional(&text(RATING), RATING)?.unwrap_or(5);
                let title = text(TITLE);
                let draft = ReviewDraft {
                    rating,
                    title,
                    comment: text(COMMENT),
                    ..ReviewDraft::new(*course_id)
                };
                draft.validate().map_err(|e| e.to_string())?;

                Request::CreateReview(draft)
            }
        })
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = centered(frame.size(), 70, 12);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.title).bold());
        let inner = block.inner(area);

        frame.render_widget(Clear, area);
        frame.render_widget(block, area);

        let layout = Layout::new(
            Direction::Vertical,
            [Constraint::Min(1), Constraint::Length(1)],
        )
        .split(inner);

        self.form.draw(frame, layout[0]);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                key_hint("Tab"),
                " next field, ".into(),
                key_hint("Enter"),
                " save, ".into(),
                key_hint("Esc"),
                " cancel".into(),
            ])),
            layout[1],
        );
    }
}

fn course_form(draft: &CourseDraft) -> Form {
    Form::new()
        .text(TITLE, draft.title.clone())
        .text(DESCRIPTION, draft.description.clone())
        .text(CATEGORY, draft.category.clone())
        .text(LEVEL, draft.level.to_string())
        .text(STATUS, draft.status.to_string())
        .text(
            SEATS,
            draft.max_seats.map(|s| s.to_string()).unwrap_or_default(),
        )
}

/// Parse a number, where an empty field means no value
fn parse_optional<T: std::str::FromStr>(s: &str, label: &str) -> Result<Option<T>, String> {
    if s.is_empty() {
        return Ok(None);
    }

    s.parse()
        .map(Some)
        .map_err(|_| format!("{} must be a whole number", label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;

    fn type_into(dialog: &mut Dialog, fields: &[&str]) {
        for (i, value) in fields.iter().enumerate() {
            if i > 0 {
                dialog.handle_key(&KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
            }
            for c in value.chars() {
                dialog.handle_key(&KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
            }
        }
    }

    #[test]
    fn new_course_needs_a_title() {
        let dialog = Dialog::new_course();
        assert_eq!(dialog.submit().unwrap_err(), "Title is required");
    }

    #[test]
    fn new_course_request() {
        let mut dialog = Dialog::new_course();
        type_into(&mut dialog, &["Rust", "Ownership", "Programación", "", "", "30"]);

        let Ok(Request::CreateCourse(draft)) = dialog.submit() else {
            panic!("expected a create request");
        };
        assert_eq!(draft.title, "Rust");
        assert_eq!(draft.category, "Programación");
        assert_eq!(draft.level, Level::Basic);
        assert_eq!(draft.status, Status::Active);
        assert_eq!(draft.max_seats, Some(30));
    }

    #[test]
    fn seats_must_be_numbers() {
        let mut dialog = Dialog::new_course();
        type_into(&mut dialog, &["Rust", "", "", "", "", "lots"]);
        assert_eq!(
            dialog.submit().unwrap_err(),
            "Seats must be a whole number"
        );
    }

    #[test]
    fn reviews_default_to_five_stars() {
        let mut dialog = Dialog::write_review("Rust", CourseId(3));
        type_into(&mut dialog, &["", "Great", "Loved it"]);

        let Ok(Request::CreateReview(draft)) = dialog.submit() else {
            panic!("expected a review request");
        };
        assert_eq!(draft.rating, 5);
        assert_eq!(draft.course_id, CourseId(3));
        assert_eq!(draft.comment, "Loved it");
    }

    #[test]
    fn reviews_need_a_comment() {
        let dialog = Dialog::write_review("Rust", CourseId(3));
        assert_eq!(dialog.submit().unwrap_err(), "a comment is required");
    }

    #[test]
    fn module_edits_keep_position_and_lessons() {
        let module: Module = serde_json::from_str(
            r#"{"idModulo": 7, "titulo": "Intro", "descripcion": "old", "orden": 2,
                "lecciones": [{"idLeccion": 1, "titulo": "Hola", "orden": 1}]}"#,
        )
        .unwrap();
        let mut dialog = Dialog::edit_module(&module, ModuleId(7));
        assert_eq!(dialog.form.value(TITLE), "Intro");
        assert_eq!(dialog.form.value(DESCRIPTION), "old");

        type_into(&mut dialog, &["duction", "new"]);
        let Ok(Request::UpdateModule(id, draft)) = dialog.submit() else {
            panic!("expected a module update");
        };
        assert_eq!(id, ModuleId(7));
        assert_eq!(draft.id, Some(ModuleId(7)));
        assert_eq!(draft.title, "Introduction");
        assert_eq!(draft.description, "oldnew");
        assert_eq!(draft.position, 2);
        assert_eq!(draft.lessons.len(), 1);
    }

    #[test]
    fn lessons_get_both_link_names() {
        let mut dialog = Dialog::add_lesson("Intro", ModuleId(4), 2);
        type_into(&mut dialog, &["Hello", "", "https://youtu.be/abc", ""]);

        let Ok(Request::AddLesson(module_id, record)) = dialog.submit() else {
            panic!("expected a lesson request");
        };
        assert_eq!(module_id, ModuleId(4));
        assert_eq!(record.position, 3);
        assert_eq!(record.video_url.as_deref(), Some("https://youtu.be/abc"));
        assert_eq!(record.legacy_video_url.as_deref(), Some("https://youtu.be/abc"));
        assert_eq!(record.pdf_url, None);
        assert_eq!(record.legacy_module_id, Some(ModuleId(4)));
    }
}
