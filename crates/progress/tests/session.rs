use aula_client::{course::Course, LessonId, ModuleId};
use aula_progress::{Advance, ClassSession};
use pretty_assertions::assert_eq;

fn two_module_course() -> Course {
    serde_json::from_str(
        r#"{
            "idCurso": 1,
            "titulo": "Curso",
            "modulos": [
                {"idModulo": 10, "titulo": "A", "orden": 1, "lecciones": [
                    {"idLeccion": 1, "titulo": "uno", "orden": 1},
                    {"idLeccion": 2, "titulo": "dos", "orden": 2}
                ]},
                {"idModulo": 20, "titulo": "B", "orden": 2, "lecciones": [
                    {"idLeccion": 3, "titulo": "tres", "orden": 1}
                ]}
            ]
        }"#,
    )
    .unwrap()
}

fn current_title(s: &ClassSession) -> Option<String> {
    s.classroom()
        .and_then(|c| c.current_lesson())
        .map(|l| l.title.clone())
}

#[test]
fn opening_selects_first_lesson() {
    let mut session = ClassSession::default();
    assert!(session.classroom().is_none());

    session.open(two_module_course());
    let room = session.classroom().unwrap();

    assert_eq!(current_title(&session), Some("uno".to_string()));
    assert!(room.is_expanded(ModuleId(10)));
    assert!(!room.is_expanded(ModuleId(20)));
    assert_eq!(room.percentage(), 0);
}

#[test]
fn progress_sets_percentage() {
    let mut session = ClassSession::default();
    session.open(two_module_course());
    session.progress_loaded([LessonId(1), LessonId(1)]);

    let room = session.classroom().unwrap();
    assert_eq!(room.percentage(), 33);
    assert!(room.is_lesson_completed(LessonId(1)));
    assert!(!room.is_lesson_completed(LessonId(2)));
}

#[test]
fn completing_lessons_walks_to_the_end() {
    let mut session = ClassSession::default();
    session.open(two_module_course());

    assert!(matches!(
        session.lesson_completed(LessonId(1)),
        Some(Advance::Next(l)) if l.id == Some(LessonId(2))
    ));
    assert_eq!(session.classroom().unwrap().percentage(), 33);

    assert!(matches!(
        session.lesson_completed(LessonId(2)),
        Some(Advance::Next(l)) if l.id == Some(LessonId(3))
    ));
    assert!(session.classroom().unwrap().is_expanded(ModuleId(20)));
    assert_eq!(current_title(&session), Some("tres".to_string()));

    assert_eq!(
        session.lesson_completed(LessonId(3)),
        Some(Advance::CourseCompleted)
    );
    assert!(session.is_completed());
    assert_eq!(session.classroom().unwrap().percentage(), 100);
}

#[test]
fn completion_is_forced_to_100() {
    let mut session = ClassSession::default();
    session.open(two_module_course());

    // skipping straight to the last lesson still finishes the course
    session.select_lesson(LessonId(3));
    assert_eq!(
        session.lesson_completed(LessonId(3)),
        Some(Advance::CourseCompleted)
    );
    assert_eq!(session.classroom().unwrap().percentage(), 100);

    session.progress_loaded([LessonId(3)]);
    assert_eq!(session.classroom().unwrap().percentage(), 100);
}

#[test]
fn selecting_expands_module() {
    let mut session = ClassSession::default();
    session.open(two_module_course());

    assert_eq!(
        session.select_lesson(LessonId(3)).map(|l| l.title.clone()),
        Some("tres".to_string())
    );
    assert!(session.classroom().unwrap().is_expanded(ModuleId(20)));

    assert_eq!(session.select_lesson(LessonId(99)), None);
    assert_eq!(current_title(&session), Some("tres".to_string()));
}

#[test]
fn leaving_always_resets() {
    let mut session = ClassSession::default();
    session.leave();
    assert_eq!(session, ClassSession::Unopened);

    session.open(two_module_course());
    session.leave();
    assert_eq!(session, ClassSession::Unopened);

    session.open(two_module_course());
    session.lesson_completed(LessonId(3));
    assert!(session.is_completed());
    session.leave();
    assert_eq!(session, ClassSession::Unopened);
}

#[test]
fn nothing_happens_when_unopened() {
    let mut session = ClassSession::default();
    assert_eq!(session.lesson_completed(LessonId(1)), None);
    assert_eq!(session.select_lesson(LessonId(1)), None);
    session.progress_loaded([LessonId(1)]);
    assert_eq!(session, ClassSession::Unopened);
}

#[test]
fn courses_without_lessons_have_no_current_lesson() {
    let mut session = ClassSession::default();
    session.open(serde_json::from_str(r#"{"titulo": "vacío"}"#).unwrap());

    assert_eq!(current_title(&session), None);
    assert_eq!(session.classroom().unwrap().percentage(), 0);
}
