use std::fmt;

use chrono::NaiveDateTime;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{
    module::Module,
    wire::{lenient_datetime, nullable_vec},
    Client, CourseId, Result,
};

/// A course, with its full module/lesson tree
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Course {
    #[serde(rename = "idCurso", alias = "id_curso", default)]
    pub id: Option<CourseId>,

    #[serde(rename = "titulo", default)]
    pub title: String,

    #[serde(rename = "descripcion", default)]
    pub description: String,

    #[serde(rename = "categoria", default)]
    pub category: String,

    #[serde(rename = "nivel", default)]
    pub level: Level,

    #[serde(rename = "estado", default)]
    pub status: Status,

    #[serde(
        rename = "fechaCreacion",
        alias = "fecha_creacion",
        default,
        deserialize_with = "lenient_datetime"
    )]
    pub created: Option<NaiveDateTime>,

    /// Modules in the order the gateway gave them
    #[serde(rename = "modulos", default, deserialize_with = "nullable_vec")]
    pub modules: Vec<Module>,

    /// Enrollment capacity
    #[serde(rename = "cuposMaximos", alias = "cupos_maximos", default)]
    pub max_seats: Option<u32>,

    /// Students currently enrolled. The gateway keeps this at or below [`Self::max_seats`].
    #[serde(rename = "inscritosActuales", alias = "inscritos_actuales", default)]
    pub enrolled: Option<u32>,

    /// Whether the logged in user is already enrolled
    #[serde(rename = "yaInscrito", alias = "ya_inscrito", default)]
    pub already_enrolled: bool,

    #[serde(default)]
    pub instructor: Option<String>,
}

impl Course {
    /// Seats left, if the course has a capacity
    pub fn seats_left(&self) -> Option<u32> {
        self.max_seats
            .map(|max| max.saturating_sub(self.enrolled.unwrap_or(0)))
    }

    /// Total number of lessons across all modules
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }
}

/// How advanced a course is
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    #[default]
    Basic,
    Intermediate,
    Advanced,
    Other(String),
}

impl Level {
    /// The levels the gateway knows about, for cycling through in filters
    pub const KNOWN: [Level; 3] = [Level::Basic, Level::Intermediate, Level::Advanced];

    /// The name the gateway uses
    pub fn as_str(&self) -> &str {
        match self {
            Level::Basic => "Basico",
            Level::Intermediate => "Intermedio",
            Level::Advanced => "Avanzado",
            Level::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for Level {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Basico" | "Básico" => Level::Basic,
            "Intermedio" => Level::Intermediate,
            "Avanzado" => Level::Advanced,
            _ => Level::Other(s),
        }
    }
}

impl From<Level> for String {
    fn from(l: Level) -> Self {
        l.as_str().to_string()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a course is open
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    #[default]
    Active,
    Inactive,
    Other(String),
}

impl Status {
    pub const KNOWN: [Status; 2] = [Status::Active, Status::Inactive];

    pub fn as_str(&self) -> &str {
        match self {
            Status::Active => "Activo",
            Status::Inactive => "Inactivo",
            Status::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Activo" => Status::Active,
            "Inactivo" => Status::Inactive,
            _ => Status::Other(s),
        }
    }
}

impl From<Status> for String {
    fn from(s: Status) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The editable parts of a course, sent when creating or updating one
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CourseDraft {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "nivel")]
    pub level: Level,
    #[serde(rename = "estado")]
    pub status: Status,
    #[serde(rename = "cuposMaximos", skip_serializing_if = "Option::is_none")]
    pub max_seats: Option<u32>,
}

impl From<&Course> for CourseDraft {
    fn from(c: &Course) -> Self {
        Self {
            title: c.title.clone(),
            description: c.description.clone(),
            category: c.category.clone(),
            level: c.level.clone(),
            status: c.status.clone(),
            max_seats: c.max_seats,
        }
    }
}

/// Filters for finding courses.
/// Title, level and status are applied by the gateway, category is applied locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub title: String,
    pub level: Option<Level>,
    pub status: Option<Status>,
    pub category: String,
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty()
            && self.level.is_none()
            && self.status.is_none()
            && self.category.trim().is_empty()
    }

    /// Query parameters for the criteria endpoint. Empty filters are left out.
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut q = vec![];
        if !self.title.trim().is_empty() {
            q.push(("titulo", self.title.trim().to_string()));
        }
        if let Some(level) = &self.level {
            q.push(("nivel", level.to_string()));
        }
        if let Some(status) = &self.status {
            q.push(("estado", status.to_string()));
        }
        q
    }
}

/// Keep only courses whose category contains `category`, ignoring case.
/// An empty filter keeps everything.
pub fn filter_by_category(courses: Vec<Course>, category: &str) -> Vec<Course> {
    let needle = category.trim().to_lowercase();
    if needle.is_empty() {
        return courses;
    }

    courses
        .into_iter()
        .filter(|c| c.category.to_lowercase().contains(&needle))
        .collect()
}

impl Client {
    /// All courses, with their modules and lessons
    pub fn courses(&self) -> Result<Vec<Course>> {
        self.get("cursos")
    }

    pub fn search_courses(&self, criteria: &SearchCriteria) -> Result<Vec<Course>> {
        let query = criteria.query();
        let courses = if query.is_empty() {
            self.courses()?
        } else {
            self.get_with_query("cursos/criteria", &query)?
        };

        Ok(filter_by_category(courses, &criteria.category))
    }

    pub fn create_course(&self, course: &CourseDraft) -> Result<Course> {
        self.send(Method::POST, "cursos", course)
    }

    pub fn update_course(&self, id: CourseId, course: &CourseDraft) -> Result<Course> {
        self.send(Method::PUT, &format!("cursos/{}", id), course)
    }

    pub fn delete_course(&self, id: CourseId) -> Result<()> {
        self.send_unit(Method::DELETE, &format!("cursos/{}", id))
    }

    /// Enroll the logged in user
    pub fn enroll(&self, id: CourseId) -> Result<()> {
        self.send_unit(Method::POST, &format!("cursos/{}/inscribir", id))
    }

    /// Abandon a course, giving up the seat
    pub fn unenroll(&self, id: CourseId) -> Result<()> {
        self.send_unit(Method::DELETE, &format!("cursos/{}/inscribir", id))
    }

    /// Change the enrollment capacity
    pub fn update_quota(&self, id: CourseId, seats: u32) -> Result<Course> {
        self.send(
            Method::PATCH,
            &format!("cursos/{}/cupos?cantidad={}", id, seats),
            &serde_json::json!({}),
        )
    }
}
