#![doc = include_str!("../README.md")]

use bytes::Bytes;
pub use kind::{EquipmentSlot, ItemKind};
pub use stacking::{DefaultStackingRule, StackingRule};

mod kind;
mod stacking;

/// A stack of items in an inventory.
///
/// Stacks are plain values. An empty stack is always represented by
/// [`ItemStack::EMPTY`], so two empty stacks compare equal no matter how they
/// were produced.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct ItemStack {
    item: ItemKind,
    count: i8,
    /// Opaque per-stack data. Stacks only merge when this is equal.
    data: Option<Bytes>,
}

impl ItemStack {
    pub const STACK_MAX: i8 = 127;

    pub const EMPTY: ItemStack = ItemStack {
        item: ItemKind::Air,
        count: 0,
        data: None,
    };

    /// Creates a new stack. The count is clamped to `0..=STACK_MAX`, and a
    /// stack of air or a stack with no items becomes [`ItemStack::EMPTY`].
    ///
    /// ```
    /// # use strongbox_item::*;
    /// assert_eq!(ItemStack::new(ItemKind::Air, 12, None), ItemStack::EMPTY);
    /// assert_eq!(ItemStack::new(ItemKind::Dirt, 0, None), ItemStack::EMPTY);
    /// assert_eq!(ItemStack::new(ItemKind::Dirt, 3, None).count(), 3);
    /// ```
    #[must_use]
    pub fn new(item: ItemKind, count: i8, data: Option<Bytes>) -> Self {
        Self {
            item,
            count: count.clamp(0, Self::STACK_MAX),
            data,
        }
        .normalized()
    }

    #[must_use]
    pub fn with_count(mut self, count: i8) -> Self {
        self.count = count.clamp(0, Self::STACK_MAX);
        self.normalized()
    }

    #[must_use]
    pub fn with_data(mut self, data: Option<Bytes>) -> Self {
        if !self.is_empty() {
            self.data = data;
        }
        self
    }

    pub fn item(&self) -> ItemKind {
        self.item
    }

    /// Gets the number of items in this stack.
    pub fn count(&self) -> i8 {
        self.count
    }

    pub fn data(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.item == ItemKind::Air || self.count <= 0
    }

    fn normalized(self) -> Self {
        if self.is_empty() {
            Self::EMPTY
        } else {
            self
        }
    }
}

impl From<ItemKind> for ItemStack {
    /// A single item of the given kind.
    fn from(item: ItemKind) -> Self {
        Self::new(item, 1, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stacks_are_equal() {
        let a = ItemStack::new(ItemKind::Stone, 4, None).with_count(0);
        let b = ItemStack::new(ItemKind::Air, 1, Some(Bytes::from_static(b"x")));

        assert_eq!(a, ItemStack::EMPTY);
        assert_eq!(b, ItemStack::EMPTY);
        assert_eq!(ItemStack::default(), ItemStack::EMPTY);
    }

    #[test]
    fn count_is_clamped() {
        assert_eq!(ItemStack::new(ItemKind::Stone, -5, None), ItemStack::EMPTY);
        assert_eq!(
            ItemStack::new(ItemKind::Stone, 1, None)
                .with_count(i8::MAX)
                .count(),
            ItemStack::STACK_MAX
        );
    }

    #[test]
    fn data_is_dropped_on_empty_stacks() {
        let stack = ItemStack::EMPTY.with_data(Some(Bytes::from_static(b"name")));
        assert_eq!(stack.data(), None);
    }
}
