use crate::entities::Item;
use crate::util::assertions;

/// Set of candidate items, in input order. Item identity is their position in this list.
#[derive(Debug, Clone, Default)]
pub struct Instance {
    pub items: Vec<Item>,
}

impl Instance {
    pub fn new(items: Vec<Item>) -> Self {
        assert!(
            assertions::instance_item_ids_correct(&items),
            "All items should have consecutive IDs starting from 0"
        );
        Self { items }
    }

    /// Builds an instance from items in input order, (re)assigning their positional ids.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let items = items
            .into_iter()
            .enumerate()
            .map(|(id, item)| item.clone_with_id(id))
            .collect();
        Self::new(items)
    }

    pub fn item(&self, id: usize) -> &Item {
        &self.items[id]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The first item with the highest value, if any
    pub fn max_value_item(&self) -> Option<&Item> {
        // `max_by_key` returns the last maximum, the first one is wanted
        self.items
            .iter()
            .rev()
            .max_by_key(|item| item.value)
    }
}
