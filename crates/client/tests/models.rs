use aula_client::{
    course::{filter_by_category, Course, Level, Status},
    lesson::{normalize_lesson, Lesson, LessonRecord},
    review::{average_rating, Review, ReviewDraft, ReviewError},
    CourseId, LessonId, ModuleId,
};
use pretty_assertions::assert_eq;

const COURSE: &str = r#"{
    "idCurso": 4,
    "titulo": "Rust desde cero",
    "descripcion": "Ownership y borrowing",
    "categoria": "Programación",
    "nivel": "Intermedio",
    "estado": "Activo",
    "fechaCreacion": "2025-11-27T10:00:00",
    "cuposMaximos": 30,
    "inscritosActuales": 12,
    "yaInscrito": true,
    "modulos": [
        {
            "idModulo": 1,
            "titulo": "Intro",
            "descripcion": "",
            "orden": 1,
            "lecciones": [
                {"idLeccion": 10, "titulo": "Hola", "contenido": "...", "orden": 1, "videoUrl": "https://youtu.be/abc"},
                {"id_leccion": "11", "titulo": "Cargo", "contenido": "...", "orden": 2, "pdf_url": "https://example.org/cargo.pdf"}
            ]
        },
        {
            "id_modulo": 2,
            "titulo": "Traits",
            "orden": 2,
            "lecciones": null
        }
    ]
}"#;

#[test]
fn course_tree_is_read_from_either_convention() {
    let course: Course = serde_json::from_str(COURSE).unwrap();

    assert_eq!(course.id, Some(CourseId(4)));
    assert_eq!(course.level, Level::Intermediate);
    assert_eq!(course.status, Status::Active);
    assert!(course.created.is_some());
    assert!(course.already_enrolled);
    assert_eq!(course.seats_left(), Some(18));

    assert_eq!(course.modules.len(), 2);
    assert_eq!(course.modules[1].id, Some(ModuleId(2)));
    assert!(course.modules[1].lessons.is_empty());
    assert_eq!(course.lesson_count(), 2);

    let lessons = &course.modules[0].lessons;
    assert_eq!(lessons[0].id, Some(LessonId(10)));
    assert_eq!(lessons[0].video_url.as_deref(), Some("https://youtu.be/abc"));
    assert_eq!(lessons[1].id, Some(LessonId(11)));
    assert_eq!(
        lessons[1].pdf_url.as_deref(),
        Some("https://example.org/cargo.pdf")
    );
}

#[test]
fn missing_modules_are_empty() {
    let course: Course = serde_json::from_str(r#"{"titulo": "Vacío"}"#).unwrap();
    assert!(course.modules.is_empty());
    assert_eq!(course.id, None);
    assert_eq!(course.seats_left(), None);
}

#[test]
fn untitled_modules_dont_break_the_course() {
    let course: Course = serde_json::from_str(
        r#"{"idCurso": 1, "modulos": [{"idModulo": 5, "orden": 1}, {"idModulo": 6, "titulo": "B", "orden": 2}]}"#,
    )
    .unwrap();
    assert_eq!(course.title, "");
    assert_eq!(course.modules.len(), 2);
    assert_eq!(course.modules[0].title, "");
    assert_eq!(course.modules[1].title, "B");
}

#[test]
fn unknown_levels_are_kept() {
    let course: Course =
        serde_json::from_str(r#"{"titulo": "x", "nivel": "Experto", "estado": "Pausado"}"#)
            .unwrap();
    assert_eq!(course.level, Level::Other("Experto".to_string()));
    assert_eq!(course.status.to_string(), "Pausado");
}

#[test]
fn normalization_fills_both_names() {
    let mut record = LessonRecord {
        legacy_id: Some(LessonId(3)),
        legacy_video_url: Some("https://youtu.be/x".to_string()),
        pdf_url: Some("https://example.org/a.pdf".to_string()),
        ..Default::default()
    };
    normalize_lesson(&mut record);

    assert_eq!(record.id, Some(LessonId(3)));
    assert_eq!(record.legacy_id, Some(LessonId(3)));
    assert_eq!(record.video_url, record.legacy_video_url);
    assert_eq!(record.legacy_pdf_url.as_deref(), Some("https://example.org/a.pdf"));
    assert_eq!(record.module_id, None);
    assert_eq!(record.legacy_module_id, None);
}

#[test]
fn normalization_prefers_canonical_names() {
    let mut record = LessonRecord {
        id: Some(LessonId(1)),
        legacy_id: Some(LessonId(2)),
        video_url: Some(" ".to_string()),
        legacy_video_url: Some("https://youtu.be/legacy".to_string()),
        ..Default::default()
    };
    normalize_lesson(&mut record);

    assert_eq!(record.id, Some(LessonId(1)));
    assert_eq!(record.video_url.as_deref(), Some("https://youtu.be/legacy"));
}

#[test]
fn normalization_is_idempotent() {
    let inputs = [
        LessonRecord::default(),
        LessonRecord {
            legacy_id: Some(LessonId(5)),
            video_url: Some(String::new()),
            legacy_pdf_url: Some("doc.pdf".to_string()),
            ..Default::default()
        },
        LessonRecord {
            id: Some(LessonId(5)),
            legacy_id: Some(LessonId(6)),
            legacy_module_id: Some(ModuleId(2)),
            ..Default::default()
        },
    ];

    for input in inputs {
        let mut once = input.clone();
        normalize_lesson(&mut once);
        let mut twice = once.clone();
        normalize_lesson(&mut twice);
        assert_eq!(once, twice);
    }
}

#[test]
fn lessons_write_both_names() {
    let lesson: Lesson =
        serde_json::from_str(r#"{"id_leccion": 9, "titulo": "t", "video_url": "v"}"#).unwrap();
    let json = serde_json::to_value(lesson.record()).unwrap();

    assert_eq!(json["idLeccion"], 9);
    assert_eq!(json["id_leccion"], 9);
    assert_eq!(json["videoUrl"], "v");
    assert_eq!(json["video_url"], "v");
    assert!(json.get("pdfUrl").is_none());
}

#[test]
fn course_filter_by_category() {
    let courses: Vec<Course> = serde_json::from_str(
        r#"[{"titulo": "a", "categoria": "Programación"},
            {"titulo": "b", "categoria": "Diseño"},
            {"titulo": "c", "categoria": "programación web"}]"#,
    )
    .unwrap();

    let titles = |cs: Vec<Course>| cs.into_iter().map(|c| c.title).collect::<Vec<_>>();
    assert_eq!(
        titles(filter_by_category(courses.clone(), "PROGRAM")),
        vec!["a", "c"]
    );
    assert_eq!(titles(filter_by_category(courses, "  ")), vec!["a", "b", "c"]);
}

#[test]
fn reviews_average() {
    let reviews: Vec<Review> = serde_json::from_str(
        r#"[{"id": 1, "courseId": 4, "userId": 2, "rating": 5, "comment": "genial", "createdAt": "2025-12-01T09:30:00"},
            {"id": 2, "courseId": "4", "rating": 2, "title": "meh", "comment": "lento"}]"#,
    )
    .unwrap();

    assert_eq!(format!("{:.1}", average_rating(&reviews)), "3.5");
    assert_eq!(format!("{:.1}", average_rating(&[])), "0.0");
    assert!(reviews[0].created_at.is_some());
}

#[test]
fn review_drafts_are_validated() {
    let mut draft = ReviewDraft::new(CourseId(4));
    assert_eq!(draft.validate(), Err(ReviewError::EmptyComment));

    draft.comment = "   ".to_string();
    assert_eq!(draft.validate(), Err(ReviewError::EmptyComment));

    draft.comment = "muy bueno".to_string();
    assert_eq!(draft.validate(), Ok(()));

    draft.rating = 0;
    assert_eq!(draft.validate(), Err(ReviewError::RatingOutOfRange(0)));
    draft.rating = 6;
    assert_eq!(draft.validate(), Err(ReviewError::RatingOutOfRange(6)));
}
