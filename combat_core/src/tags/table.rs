//! TagTable - fixed per-tag storage for damage modifiers

use super::{Tag, TagSet};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One value per [`Tag`], with the `All` wildcard at index 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TagTable<T> {
    values: [T; Tag::COUNT],
}

impl<T: Copy> TagTable<T> {
    /// Table with every entry set to `value`
    pub fn filled(value: T) -> Self {
        TagTable {
            values: [value; Tag::COUNT],
        }
    }

    /// Iterate `(tag, value)` pairs in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (Tag, T)> + '_ {
        Tag::ALL.iter().copied().zip(self.values.iter().copied())
    }
}

impl<T: Copy + Default> Default for TagTable<T> {
    fn default() -> Self {
        TagTable::filled(T::default())
    }
}

impl<T> Index<Tag> for TagTable<T> {
    type Output = T;

    fn index(&self, tag: Tag) -> &T {
        &self.values[tag.index()]
    }
}

impl<T> IndexMut<Tag> for TagTable<T> {
    fn index_mut(&mut self, tag: Tag) -> &mut T {
        &mut self.values[tag.index()]
    }
}

impl TagTable<f32> {
    /// `table[All] + Σ table[tag]` over the specific tags in `tags`
    pub fn sum_for(&self, tags: &TagSet) -> f32 {
        self[Tag::All] + tags.specific().map(|tag| self[tag]).sum::<f32>()
    }

    /// `table[All] * Π table[tag]` over the specific tags in `tags`
    pub fn product_for(&self, tags: &TagSet) -> f32 {
        self[Tag::All] * tags.specific().map(|tag| self[tag]).product::<f32>()
    }
}

impl TagTable<i32> {
    /// `table[All] + Σ table[tag]` over the specific tags in `tags`
    pub fn sum_for(&self, tags: &TagSet) -> i32 {
        self[Tag::All] + tags.specific().map(|tag| self[tag]).sum::<i32>()
    }
}
