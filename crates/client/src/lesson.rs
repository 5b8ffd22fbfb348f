//! Lessons, and the adapter which reconciles the two naming conventions the gateway uses for them.
//!
//! Depending on which service produced a record, a lesson's identifier and media links arrive
//! as `idLeccion`/`videoUrl`/`pdfUrl` or as `id_leccion`/`video_url`/`pdf_url`.
//! [`LessonRecord`] accepts both, and [`normalize_lesson`] makes them agree.
use regex::Regex;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{Client, CourseId, LessonId, ModuleId, Result};

/// A lesson as it appears on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonRecord {
    #[serde(rename = "idLeccion", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<LessonId>,
    #[serde(rename = "id_leccion", default, skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<LessonId>,

    #[serde(rename = "idModulo", default, skip_serializing_if = "Option::is_none")]
    pub module_id: Option<ModuleId>,
    #[serde(rename = "id_modulo", default, skip_serializing_if = "Option::is_none")]
    pub legacy_module_id: Option<ModuleId>,

    #[serde(rename = "videoUrl", default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(rename = "video_url", default, skip_serializing_if = "Option::is_none")]
    pub legacy_video_url: Option<String>,

    #[serde(rename = "pdfUrl", default, skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
    #[serde(rename = "pdf_url", default, skip_serializing_if = "Option::is_none")]
    pub legacy_pdf_url: Option<String>,

    #[serde(rename = "titulo", default)]
    pub title: String,

    #[serde(rename = "contenido", default)]
    pub content: String,

    #[serde(rename = "orden", default)]
    pub position: u32,
}

/// Make both naming conventions of a record hold the same value.
/// The canonical field wins when both are set. Blank links count as missing.
///
/// Applying this twice is the same as applying it once.
pub fn normalize_lesson(record: &mut LessonRecord) {
    for link in [
        &mut record.video_url,
        &mut record.legacy_video_url,
        &mut record.pdf_url,
        &mut record.legacy_pdf_url,
    ] {
        if link.as_deref().is_some_and(|s| s.trim().is_empty()) {
            *link = None;
        }
    }

    reconcile(&mut record.id, &mut record.legacy_id);
    reconcile(&mut record.module_id, &mut record.legacy_module_id);
    reconcile(&mut record.video_url, &mut record.legacy_video_url);
    reconcile(&mut record.pdf_url, &mut record.legacy_pdf_url);
}

fn reconcile<T: Clone>(canonical: &mut Option<T>, legacy: &mut Option<T>) {
    if canonical.is_none() {
        canonical.clone_from(legacy);
    }
    if legacy.is_none() {
        legacy.clone_from(canonical);
    }
}

/// An atomic unit of course content.
/// Whether it's been completed isn't stored here, since that depends on who's asking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "LessonRecord")]
pub struct Lesson {
    pub id: Option<LessonId>,
    pub module_id: Option<ModuleId>,
    pub title: String,
    pub content: String,

    /// 1-based position within the module
    pub position: u32,

    pub video_url: Option<String>,
    pub pdf_url: Option<String>,
}

impl From<LessonRecord> for Lesson {
    fn from(mut r: LessonRecord) -> Self {
        normalize_lesson(&mut r);
        Self {
            id: r.id,
            module_id: r.module_id,
            title: r.title,
            content: r.content,
            position: r.position,
            video_url: r.video_url,
            pdf_url: r.pdf_url,
        }
    }
}

impl Lesson {
    /// Convert back to the wire format, with both naming conventions filled in
    pub fn record(&self) -> LessonRecord {
        let mut r = LessonRecord {
            id: self.id,
            module_id: self.module_id,
            title: self.title.clone(),
            content: self.content.clone(),
            position: self.position,
            video_url: self.video_url.clone(),
            pdf_url: self.pdf_url.clone(),
            ..Default::default()
        };
        normalize_lesson(&mut r);
        r
    }
}

/// Turn a YouTube watch or share link into its embeddable form.
/// Anything else is returned unchanged.
pub fn embed_video_url(url: &str) -> String {
    match youtube_video_id(url) {
        Some(id) => format!("https://www.youtube.com/embed/{}", id),
        None => url.to_string(),
    }
}

fn youtube_video_id(url: &str) -> Option<&str> {
    let re = Regex::new(r"(?:[?&]v=|youtu\.be/)([^&?#/]+)").unwrap();
    re.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

impl Client {
    /// Add a lesson to the end of a module
    pub fn add_lesson(&self, module_id: ModuleId, lesson: &LessonRecord) -> Result<Lesson> {
        self.send(
            Method::POST,
            &format!("modulos/{}/lecciones", module_id),
            lesson,
        )
    }

    pub fn delete_lesson(&self, id: LessonId) -> Result<()> {
        self.send_unit(Method::DELETE, &format!("modulos/lecciones/{}", id))
    }

    /// Record that the logged in student finished a lesson
    pub fn mark_lesson_completed(&self, course_id: CourseId, lesson_id: LessonId) -> Result<()> {
        self.send_unit(
            Method::POST,
            &format!("cursos/{}/lecciones/{}/completar", course_id, lesson_id),
        )
    }

    /// IDs of the lessons the logged in student has completed in a course.
    /// The same ID may appear more than once.
    pub fn student_progress(&self, course_id: CourseId) -> Result<Vec<LessonId>> {
        self.get(&format!("cursos/{}/progreso", course_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_links_are_embedded() {
        assert_eq!(
            embed_video_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn share_links_are_embedded() {
        assert_eq!(
            embed_video_url("https://youtu.be/dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn other_links_are_untouched() {
        assert_eq!(
            embed_video_url("https://vimeo.com/12345"),
            "https://vimeo.com/12345"
        );
    }
}
