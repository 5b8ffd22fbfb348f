use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{
    lesson::{Lesson, LessonRecord},
    wire::nullable_vec,
    Client, CourseId, ModuleId, Result,
};

/// An ordered grouping of lessons within a course
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Module {
    #[serde(rename = "idModulo", alias = "id_modulo", default)]
    pub id: Option<ModuleId>,

    #[serde(rename = "titulo", default)]
    pub title: String,

    #[serde(rename = "descripcion", default)]
    pub description: String,

    /// 1-based position within the course
    #[serde(rename = "orden", default)]
    pub position: u32,

    #[serde(rename = "lecciones", default, deserialize_with = "nullable_vec")]
    pub lessons: Vec<Lesson>,
}

/// A module as we send it to the gateway
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModuleDraft {
    #[serde(rename = "idModulo", skip_serializing_if = "Option::is_none")]
    pub id: Option<ModuleId>,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "orden")]
    pub position: u32,

    /// The gateway replaces the lesson list on update, so updates carry it along
    #[serde(rename = "lecciones")]
    pub lessons: Vec<LessonRecord>,
}

impl From<&Module> for ModuleDraft {
    fn from(m: &Module) -> Self {
        Self {
            id: m.id,
            title: m.title.clone(),
            description: m.description.clone(),
            position: m.position,
            lessons: m.lessons.iter().map(Lesson::record).collect(),
        }
    }
}

impl Client {
    /// Add a module to the end of a course
    pub fn add_module(&self, course_id: CourseId, module: &ModuleDraft) -> Result<Module> {
        self.send(Method::POST, &format!("cursos/{}/modulos", course_id), module)
    }

    /// Update a module, including its position
    pub fn update_module(&self, id: ModuleId, module: &ModuleDraft) -> Result<Module> {
        self.send(Method::PUT, &format!("modulos/{}", id), module)
    }

    /// Delete a module along with its lessons
    pub fn delete_module(&self, id: ModuleId) -> Result<()> {
        self.send_unit(Method::DELETE, &format!("modulos/{}", id))
    }
}
