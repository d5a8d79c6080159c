use std::slice::Iter;

use crate::entities::Item;

/// Ordered sequence of chosen items.
/// Order is insertion order; it does not matter for evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    items: Vec<Item>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> Iter<'_, Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_value(&self) -> u64 {
        self.items.iter().fold(0u64, |acc, i| acc.saturating_add(i.value))
    }

    pub fn total_weight(&self) -> u64 {
        self.items.iter().fold(0u64, |acc, i| acc.saturating_add(i.weight))
    }

    pub fn total_volume(&self) -> u64 {
        self.items.iter().fold(0u64, |acc, i| acc.saturating_add(i.volume))
    }

    /// Ids of the items in insertion order
    pub fn item_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.iter().map(|i| i.id)
    }
}

impl FromIterator<Item> for Group {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Group {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Group {
    type Item = &'a Item;
    type IntoIter = Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
