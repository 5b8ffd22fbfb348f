use std::time::Instant;

use aula_client::{module::ModuleDraft, CourseId};
use aula_progress::reorder_within_parent;
use crossterm::event::{KeyCode, KeyEvent};
use log::error;
use ratatui::{
    prelude::{Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};
use tui_tree_widget::{Tree, TreeItem, TreeState};

use super::{enroll, enter_classroom, show_reviews, Action, Document, Pane};
use crate::{
    event::Event,
    main_screen::Dialog,
    store::{Request, Store},
    styles::error_text,
};

mod search;
mod tree;

use search::{Field, SearchBar};
use tree::{Selected, TreeId};

/// The navigation pane, which shows the search bar and a tree of courses, modules and lessons
#[derive(Debug, Default)]
pub struct Navigation {
    tree_state: TreeState<TreeId>,
    cached_view_tree: Option<(usize, Vec<TreeItem<'static, TreeId>>)>,
    search: SearchBar,
}

impl Pane for Navigation {
    fn draw(&mut self, store: &Store, frame: &mut Frame, area: Rect) {
        let layout = Layout::new(
            Direction::Vertical,
            [Constraint::Length(1), Constraint::Min(1)],
        )
        .split(area);

        frame.render_widget(
            Paragraph::new(self.search.line(store.criteria())),
            layout[0],
        );

        let items = self.view_tree(store).to_vec();
        match Tree::new(items) {
            Ok(tree) => frame.render_stateful_widget(
                tree.highlight_symbol(">>"),
                layout[1],
                &mut self.tree_state,
            ),
            Err(e) => error!("couldn't draw navigation tree: {}", e),
        }
    }

    fn handle_event(&mut self, store: &mut Store, event: Event) -> Action {
        let Event::Key(key) = event else {
            return Action::None;
        };

        if self.search.is_editing() {
            if let Some(criteria) = self
                .search
                .handle_key(&key, Instant::now(), store.criteria())
            {
                store.search(criteria);
            }
            return Action::None;
        }

        self.handle_key(store, key)
    }
}

impl Navigation {
    /// Issue any search whose debounce has run out
    pub fn tick(&mut self, store: &mut Store) -> Action {
        if let Some(criteria) = self.search.due(Instant::now(), store.criteria()) {
            store.search(criteria);
        }

        Action::None
    }

    /// The items in the tree, rebuilt when the store has changed
    fn view_tree(&mut self, store: &Store) -> &[TreeItem<'static, TreeId>] {
        let stale = !matches!(&self.cached_view_tree, Some((g, _)) if *g == store.generation());
        if stale {
            // keep the selection while loading, since it'll probably come back
            let selected = self.selected();
            let loaded = store.courses().is_some();
            if selected == Selected::Nothing || (loaded && !selection_exists(store, selected)) {
                self.tree_state.select(vec![TreeId::Welcome]);
            }
            self.cached_view_tree = Some((store.generation(), tree::build(store)));
        }

        match &self.cached_view_tree {
            Some((_, items)) => items,
            None => &[],
        }
    }

    fn selected(&self) -> Selected {
        Selected::from_path(&self.tree_state.selected())
    }

    fn handle_key(&mut self, store: &mut Store, key: KeyEvent) -> Action {
        let selected = self.selected();

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Action::Exit,
            KeyCode::Down | KeyCode::Char('j') => {
                let items = self.view_tree(store).to_vec();
                self.tree_state.key_down(&items);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let items = self.view_tree(store).to_vec();
                self.tree_state.key_up(&items);
            }
            KeyCode::Char(' ') => {
                let sel = self.tree_state.selected();
                self.tree_state.toggle(sel);
            }
            KeyCode::Enter | KeyCode::Tab => return self.activate(store, selected),
            KeyCode::Char('?') => return Action::Show(Document::Welcome),

            // searching
            KeyCode::Char('/') => self.search.start(Field::Title, store.criteria()),
            KeyCode::Char('c') => self.search.start(Field::Category, store.criteria()),
            KeyCode::Char('v') => {
                let criteria = self.search.cycle_level(store.criteria());
                store.search(criteria);
            }
            KeyCode::Char('s') => {
                let criteria = self.search.cycle_status(store.criteria());
                store.search(criteria);
            }
            KeyCode::Char('x') => {
                if !store.criteria().is_empty() {
                    let criteria = self.search.clear();
                    store.search(criteria);
                }
            }
            KeyCode::Char('R') => {
                store.reload();
                return Action::Flash("Reloading...".into());
            }

            // students
            KeyCode::Char('e') => {
                if let Some(id) = selected.course_id() {
                    return enroll(store, id);
                }
            }
            KeyCode::Char('o') => {
                if let Some(id) = selected.course_id() {
                    return enter_classroom(store, id);
                }
            }
            KeyCode::Char('r') => {
                if let Some(id) = selected.course_id() {
                    return show_reviews(store, id);
                }
            }
            KeyCode::Char('L') => {
                return Action::Confirm {
                    question: "Log out? Your saved login will be forgotten.".to_string(),
                    then: Request::Logout,
                }
            }

            // administrators
            KeyCode::Char('N' | 'E' | 'm' | 'l' | 'D' | '+' | '-' | 'J' | 'K')
                if !store.is_admin() =>
            {
                return Action::Flash(error_text("Only administrators can do that"));
            }
            KeyCode::Char('N') => return Action::Open(Dialog::new_course()),
            KeyCode::Char('E') => return edit_selected(store, selected),
            KeyCode::Char('m') => {
                if let Some(id) = selected.course_id() {
                    if let Some(course) = store.course(id) {
                        return Action::Open(Dialog::add_module(course, id));
                    }
                }
            }
            KeyCode::Char('l') => return add_lesson(store, selected),
            KeyCode::Char('D') => return confirm_delete(store, selected),
            KeyCode::Char('+') => return change_seats(store, selected, true),
            KeyCode::Char('-') => return change_seats(store, selected, false),
            KeyCode::Char('J') => return move_selected(store, selected, true),
            KeyCode::Char('K') => return move_selected(store, selected, false),
            _ => (),
        };

        Action::None
    }

    /// Enter on an item: open or close branches, and show what's selected
    fn activate(&mut self, store: &mut Store, selected: Selected) -> Action {
        match selected {
            Selected::Welcome => Action::Show(Document::Welcome),
            Selected::Course(c) | Selected::Module(c, _) => {
                let sel = self.tree_state.selected();
                self.tree_state.toggle(sel);
                Action::Preview(Document::Course(c))
            }
            Selected::Lesson(c, _, l) => {
                let action = enter_classroom(store, c);
                if matches!(action, Action::Show(_)) {
                    store.session_mut().select_lesson(l);
                }
                action
            }
            Selected::Nothing => Action::None,
        }
    }
}

/// Whether the selected item is still in the store, after a reload or search
fn selection_exists(store: &Store, selected: Selected) -> bool {
    let course = |id: CourseId| store.course(id);
    match selected {
        Selected::Nothing => false,
        Selected::Welcome => true,
        Selected::Course(c) => course(c).is_some(),
        Selected::Module(c, m) => course(c).is_some_and(|c| c.modules.iter().any(|x| x.id == Some(m))),
        Selected::Lesson(c, m, l) => course(c).is_some_and(|c| {
            c.modules
                .iter()
                .filter(|x| x.id == Some(m))
                .any(|x| x.lessons.iter().any(|y| y.id == Some(l)))
        }),
    }
}

/// Edit the selected module, or else the course the selection is in
fn edit_selected(store: &Store, selected: Selected) -> Action {
    let Some(course_id) = selected.course_id() else {
        return Action::None;
    };
    let Some(course) = store.course(course_id) else {
        return Action::None;
    };

    match selected {
        Selected::Module(_, m) => course
            .modules
            .iter()
            .find(|x| x.id == Some(m))
            .map(|module| Action::Open(Dialog::edit_module(module, m)))
            .unwrap_or(Action::None),
        _ => Action::Open(Dialog::edit_course(course, course_id)),
    }
}

fn add_lesson(store: &Store, selected: Selected) -> Action {
    let (Some(course_id), Some(module_id)) = (selected.course_id(), selected.module_id()) else {
        return Action::Flash("Select a module to add a lesson to".into());
    };

    store
        .course(course_id)
        .and_then(|c| c.modules.iter().find(|m| m.id == Some(module_id)))
        .map(|m| Action::Open(Dialog::add_lesson(&m.title, module_id, m.lessons.len())))
        .unwrap_or(Action::None)
}

fn confirm_delete(store: &Store, selected: Selected) -> Action {
    let Some(course) = selected.course_id().and_then(|id| store.course(id)) else {
        return Action::None;
    };
    let module = |id| course.modules.iter().find(|m| m.id == Some(id));

    let (question, then) = match selected {
        Selected::Course(c) => (
            format!("Delete the course {}, with all its modules?", course.title),
            Request::DeleteCourse(c),
        ),
        Selected::Module(_, m) => match module(m) {
            Some(module) => (
                format!("Delete the module {}, with all its lessons?", module.title),
                Request::DeleteModule(m),
            ),
            None => return Action::None,
        },
        Selected::Lesson(_, m, l) => {
            match module(m).and_then(|m| m.lessons.iter().find(|x| x.id == Some(l))) {
                Some(lesson) => (
                    format!("Delete the lesson {}?", lesson.title),
                    Request::DeleteLesson(l),
                ),
                None => return Action::None,
            }
        }
        Selected::Nothing | Selected::Welcome => return Action::None,
    };

    Action::Confirm { question, then }
}

/// Add or remove one seat from the selected course
fn change_seats(store: &Store, selected: Selected, add: bool) -> Action {
    let Some((id, course)) = selected
        .course_id()
        .and_then(|id| Some((id, store.course(id)?)))
    else {
        return Action::None;
    };

    let enrolled = course.enrolled.unwrap_or(0);
    let current = course.max_seats.unwrap_or(enrolled);
    let seats = match add {
        true => current.saturating_add(1),
        false => current.saturating_sub(1),
    };
    if seats < enrolled {
        return Action::Flash(error_text(format!(
            "{} students are enrolled, so there must be at least that many seats",
            enrolled
        )));
    }

    store.request(Request::UpdateQuota(id, seats));
    Action::Flash(format!("Changing seats to {}...", seats).into())
}

/// Move the selected module or lesson one place up or down
fn move_selected(store: &mut Store, selected: Selected, down: bool) -> Action {
    let step = |from: usize, len: usize| match down {
        true => (from + 1 < len).then_some(from + 1),
        false => from.checked_sub(1),
    };

    match selected {
        Selected::Module(c, m) => {
            let Some(course) = store.course_mut(c) else {
                return Action::None;
            };
            let Some(from) = course.modules.iter().position(|x| x.id == Some(m)) else {
                return Action::None;
            };
            let Some(to) = step(from, course.modules.len()) else {
                return Action::None;
            };

            let changed = reorder_within_parent(&mut course.modules, from, to);
            let drafts: Vec<_> = changed
                .into_iter()
                .filter_map(|i| {
                    let module = &course.modules[i];
                    Some((module.id?, ModuleDraft::from(module)))
                })
                .collect();

            store.request(Request::SaveModules(drafts));
            Action::Flash("Saving module order...".into())
        }
        Selected::Lesson(c, m, l) => {
            let Some(module) = store
                .course_mut(c)
                .and_then(|c| c.modules.iter_mut().find(|x| x.id == Some(m)))
            else {
                return Action::None;
            };
            let Some(from) = module.lessons.iter().position(|x| x.id == Some(l)) else {
                return Action::None;
            };
            let Some(to) = step(from, module.lessons.len()) else {
                return Action::None;
            };

            reorder_within_parent(&mut module.lessons, from, to);
            Action::Flash("Lesson moved here only, the gateway can't save lesson order".into())
        }
        _ => Action::Flash("Select a module or lesson to move it".into()),
    }
}
