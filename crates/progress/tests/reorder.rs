use aula_progress::{reorder_within_parent, sort_by_position, Ordered};
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq)]
struct Item {
    name: char,
    position: u32,
}

impl Ordered for Item {
    fn position(&self) -> u32 {
        self.position
    }

    fn set_position(&mut self, position: u32) {
        self.position = position;
    }
}

fn items(names: &str) -> Vec<Item> {
    names
        .chars()
        .enumerate()
        .map(|(i, name)| Item {
            name,
            position: i as u32 + 1,
        })
        .collect()
}

fn names(items: &[Item]) -> String {
    items.iter().map(|i| i.name).collect()
}

fn positions(items: &[Item]) -> Vec<u32> {
    items.iter().map(|i| i.position).collect()
}

#[test]
fn move_first_to_last() {
    let mut v = items("abc");
    let changed = reorder_within_parent(&mut v, 0, 2);

    assert_eq!(names(&v), "bca");
    assert_eq!(positions(&v), vec![1, 2, 3]);
    assert_eq!(changed, vec![0, 1, 2]);
}

#[test]
fn move_last_to_first() {
    let mut v = items("abcd");
    let changed = reorder_within_parent(&mut v, 3, 0);

    assert_eq!(names(&v), "dabc");
    assert_eq!(positions(&v), vec![1, 2, 3, 4]);
    assert_eq!(changed, vec![0, 1, 2, 3]);
}

#[test]
fn neighbours_swap_only_touches_two() {
    let mut v = items("abcd");
    let changed = reorder_within_parent(&mut v, 1, 2);

    assert_eq!(names(&v), "acbd");
    assert_eq!(changed, vec![1, 2]);
}

#[test]
fn same_index_changes_nothing() {
    let mut v = items("abc");
    assert!(reorder_within_parent(&mut v, 1, 1).is_empty());
    assert_eq!(v, items("abc"));
}

#[test]
fn gaps_are_closed_even_without_a_move() {
    let mut v = items("abc");
    v[0].position = 4;
    v[1].position = 9;
    v[2].position = 3;

    let changed = reorder_within_parent(&mut v, 0, 0);
    assert_eq!(positions(&v), vec![1, 2, 3]);
    assert_eq!(changed, vec![0, 1]);
}

#[test]
fn out_of_range_targets_clamp_to_the_end() {
    let mut v = items("abc");
    reorder_within_parent(&mut v, 0, 10);
    assert_eq!(names(&v), "bca");

    let mut v = items("abc");
    reorder_within_parent(&mut v, 10, 0);
    assert_eq!(names(&v), "cab");
}

#[test]
fn empty_is_untouched() {
    let mut v: Vec<Item> = vec![];
    assert!(reorder_within_parent(&mut v, 0, 3).is_empty());
}

#[test]
fn every_move_keeps_members_and_dense_positions() {
    let original = items("abcdef");
    for from in 0..original.len() {
        for to in 0..original.len() {
            let mut v = original.clone();
            reorder_within_parent(&mut v, from, to);

            let mut sorted: Vec<char> = v.iter().map(|i| i.name).collect();
            sorted.sort();
            assert_eq!(sorted.into_iter().collect::<String>(), "abcdef");
            assert_eq!(positions(&v), (1..=6).collect::<Vec<u32>>());
            assert_eq!(v[to].name, original[from].name);
        }
    }
}

#[test]
fn sorting_follows_positions() {
    let mut v = items("abc");
    v[0].position = 3;
    v[1].position = 1;
    v[2].position = 1;

    sort_by_position(&mut v);
    assert_eq!(names(&v), "bca");
}
