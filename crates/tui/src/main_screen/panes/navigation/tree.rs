use std::collections::HashSet;

use aula_client::{
    course::{Course, Status},
    lesson::Lesson,
    module::Module,
    CourseId, LessonId, ModuleId,
};
use log::error;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use tui_tree_widget::TreeItem;

use crate::store::Store;

/// Identifies an item among its siblings in the tree.
/// A full selection is the path of these from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TreeId {
    #[default]
    Loading,
    Welcome,
    Empty,
    Course(CourseId),
    Module(ModuleId),
    Lesson(LessonId),
}

/// What a selection path points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selected {
    Nothing,
    Welcome,
    Course(CourseId),
    Module(CourseId, ModuleId),
    Lesson(CourseId, ModuleId, LessonId),
}

impl Selected {
    pub fn from_path(path: &[TreeId]) -> Self {
        match path {
            [TreeId::Welcome] => Selected::Welcome,
            [TreeId::Course(c)] => Selected::Course(*c),
            [TreeId::Course(c), TreeId::Module(m)] => Selected::Module(*c, *m),
            [TreeId::Course(c), TreeId::Module(m), TreeId::Lesson(l)] => {
                Selected::Lesson(*c, *m, *l)
            }
            _ => Selected::Nothing,
        }
    }

    pub fn course_id(&self) -> Option<CourseId> {
        match self {
            Selected::Course(c) | Selected::Module(c, _) | Selected::Lesson(c, _, _) => Some(*c),
            Selected::Nothing | Selected::Welcome => None,
        }
    }

    pub fn module_id(&self) -> Option<ModuleId> {
        match self {
            Selected::Module(_, m) | Selected::Lesson(_, m, _) => Some(*m),
            _ => None,
        }
    }
}

/// Build the items shown in the navigation tree from the store's courses
pub fn build(store: &Store) -> Vec<TreeItem<'static, TreeId>> {
    let mut items = vec![TreeItem::new_leaf(TreeId::Welcome, "Welcome")];

    let Some(courses) = store.courses() else {
        items.push(TreeItem::new_leaf(TreeId::Loading, "Loading..."));
        return items;
    };

    let mut seen = HashSet::new();
    items.extend(
        courses
            .iter()
            .filter_map(|c| Some((c.id?, c)))
            .filter(|(id, _)| seen.insert(*id))
            .map(|(id, c)| course_item(store, id, c)),
    );

    if items.len() == 1 {
        let msg = match store.criteria().is_empty() {
            true => "No courses yet",
            false => "No courses match your search",
        };
        items.push(TreeItem::new_leaf(TreeId::Empty, msg));
    }

    items
}

fn course_item(store: &Store, id: CourseId, course: &Course) -> TreeItem<'static, TreeId> {
    let mut label = vec![Span::raw(course.title.clone())];
    if course.already_enrolled {
        label.push(Span::styled(" ✓", Style::default().fg(Color::Green)));
    }
    if course.status != Status::Active {
        label.push(Span::styled(
            format!(" ({})", course.status),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let mut seen = HashSet::new();
    let children = course
        .modules
        .iter()
        .filter_map(|m| Some((m.id?, m)))
        .filter(|(id, _)| seen.insert(*id))
        .map(|(module_id, m)| module_item(store, id, module_id, m))
        .collect();

    node(TreeId::Course(id), Line::from(label), children)
}

fn module_item(
    store: &Store,
    course_id: CourseId,
    id: ModuleId,
    module: &Module,
) -> TreeItem<'static, TreeId> {
    let label = Line::raw(format!("{}. {}", module.position, module.title));

    let mut seen = HashSet::new();
    let children = module
        .lessons
        .iter()
        .filter_map(|l| Some((l.id?, l)))
        .filter(|(id, _)| seen.insert(*id))
        .map(|(lesson_id, l)| lesson_item(store, course_id, lesson_id, l))
        .collect();

    node(TreeId::Module(id), label, children)
}

fn lesson_item(
    store: &Store,
    course_id: CourseId,
    id: LessonId,
    lesson: &Lesson,
) -> TreeItem<'static, TreeId> {
    let classroom = store
        .session()
        .classroom()
        .filter(|c| c.course().id == Some(course_id));

    let completed = classroom.is_some_and(|c| c.is_lesson_completed(id));
    let current = classroom
        .and_then(|c| c.current_lesson())
        .is_some_and(|l| l.id == Some(id));

    let mut style = Style::default();
    if current {
        style = style.add_modifier(Modifier::BOLD);
    }

    let label = Line::from(vec![
        match completed {
            true => Span::styled("✓ ", Style::default().fg(Color::Green)),
            false => Span::raw("  "),
        },
        Span::styled(lesson.title.clone(), style),
    ]);

    TreeItem::new_leaf(TreeId::Lesson(id), label)
}

/// An item with children, falling back to a leaf if the children can't be added
fn node(
    id: TreeId,
    label: Line<'static>,
    children: Vec<TreeItem<'static, TreeId>>,
) -> TreeItem<'static, TreeId> {
    match TreeItem::new(id, label.clone(), children) {
        Ok(item) => item,
        Err(e) => {
            error!("couldn't add children to {:?}: {}", id, e);
            TreeItem::new_leaf(id, label)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn paths_map_to_selections() {
        let c = CourseId(1);
        let m = ModuleId(2);
        let l = LessonId(3);

        assert_eq!(Selected::from_path(&[]), Selected::Nothing);
        assert_eq!(Selected::from_path(&[TreeId::Welcome]), Selected::Welcome);
        assert_eq!(Selected::from_path(&[TreeId::Loading]), Selected::Nothing);
        assert_eq!(
            Selected::from_path(&[TreeId::Course(c), TreeId::Module(m)]),
            Selected::Module(c, m)
        );
        assert_eq!(
            Selected::from_path(&[TreeId::Course(c), TreeId::Module(m), TreeId::Lesson(l)])
                .module_id(),
            Some(m)
        );
        assert_eq!(Selected::Lesson(c, m, l).course_id(), Some(c));
    }
}
