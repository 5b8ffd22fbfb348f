use aula_client::{course::Course, lesson::Lesson, module::Module, LessonId, ModuleId};
use aula_progress::{completion_percentage, CompletionSet};
use pretty_assertions::assert_eq;

fn course_with(lessons_per_module: &[usize]) -> Course {
    let mut next_id = 1;
    Course {
        title: "c".to_string(),
        modules: lessons_per_module
            .iter()
            .enumerate()
            .map(|(m, &n)| Module {
                id: Some(ModuleId(m as i64 + 1)),
                position: m as u32 + 1,
                lessons: (0..n)
                    .map(|l| {
                        let lesson = Lesson {
                            id: Some(LessonId(next_id)),
                            position: l as u32 + 1,
                            ..Default::default()
                        };
                        next_id += 1;
                        lesson
                    })
                    .collect(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn ids(ids: &[i64]) -> CompletionSet {
    ids.iter().copied().map(LessonId).collect()
}

#[test]
fn one_of_three_is_33() {
    let course = course_with(&[2, 1]);
    assert_eq!(completion_percentage(&course, &ids(&[1])), 33);
}

#[test]
fn two_of_three_rounds_up() {
    let course = course_with(&[2, 1]);
    assert_eq!(completion_percentage(&course, &ids(&[1, 2])), 67);
}

#[test]
fn no_lessons_is_zero() {
    assert_eq!(completion_percentage(&course_with(&[]), &ids(&[1, 2])), 0);
    assert_eq!(completion_percentage(&course_with(&[0, 0]), &ids(&[1])), 0);
}

#[test]
fn duplicates_count_once() {
    let course = course_with(&[2]);
    assert_eq!(completion_percentage(&course, &ids(&[1, 1, 2])), 100);
    assert_eq!(completion_percentage(&course, &ids(&[1, 1])), 50);
}

#[test]
fn removed_lessons_cap_at_100() {
    let course = course_with(&[1]);
    assert_eq!(completion_percentage(&course, &ids(&[1, 7, 8])), 100);
}

#[test]
fn always_between_0_and_100() {
    for shape in [&[][..], &[1], &[3, 0, 2], &[7, 7, 7]] {
        let course = course_with(shape);
        let total = course.lesson_count() as i64;
        for done in 0..=(total + 3) {
            let completed: CompletionSet = (1..=done).map(LessonId).collect();
            let pct = completion_percentage(&course, &completed);
            assert!(pct <= 100);
            if total > 0 && done >= total {
                assert_eq!(pct, 100);
            }
            if total == 0 {
                assert_eq!(pct, 0);
            }
        }
    }
}

#[test]
fn completion_set_tracks_inserts() {
    let mut set = CompletionSet::new();
    assert!(set.is_empty());
    assert!(set.insert(LessonId(4)));
    assert!(!set.insert(LessonId(4)));
    assert!(set.contains(LessonId(4)));
    assert_eq!(set.len(), 1);
}
