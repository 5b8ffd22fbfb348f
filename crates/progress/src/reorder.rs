use aula_client::{lesson::Lesson, module::Module};

/// Something with a 1-based position among its siblings
pub trait Ordered {
    fn position(&self) -> u32;
    fn set_position(&mut self, position: u32);
}

impl Ordered for Module {
    fn position(&self) -> u32 {
        self.position
    }

    fn set_position(&mut self, position: u32) {
        self.position = position;
    }
}

impl Ordered for Lesson {
    fn position(&self) -> u32 {
        self.position
    }

    fn set_position(&mut self, position: u32) {
        self.position = position;
    }
}

/// Put items in the order of their positions, keeping the gateway's order for ties
pub fn sort_by_position<T: Ordered>(items: &mut [T]) {
    items.sort_by_key(|i| i.position());
}

/// Move the item at `from` to `to`, shifting the items in between, then renumber every item
/// to its new 1-based position.
///
/// Indices past the end are treated as the last index, the way a drag past the end of a list
/// drops onto the end. Returns the indices of the items whose position changed, which are the
/// ones that need saving.
pub fn reorder_within_parent<T: Ordered>(items: &mut [T], from: usize, to: usize) -> Vec<usize> {
    let Some(last) = items.len().checked_sub(1) else {
        return vec![];
    };
    let (from, to) = (from.min(last), to.min(last));

    if from < to {
        items[from..=to].rotate_left(1);
    } else if from > to {
        items[to..=from].rotate_right(1);
    }

    items
        .iter_mut()
        .enumerate()
        .filter_map(|(i, item)| {
            let position = i as u32 + 1;
            if item.position() == position {
                return None;
            }
            item.set_position(position);
            Some(i)
        })
        .collect()
}
