//! Slot-to-slot item movement.
//!
//! A [`TransactionOperator`] decides what happens when an item meets a single
//! slot. A [`TransactionType`] walks an ordered list of slots, applying an
//! operator to each and carrying the leftover item forward.

use std::collections::BTreeMap;

use strongbox_item::{ItemStack, StackingRule};

use crate::Inventory;

/// Read and write access to slots, used by transactions.
pub trait SlotAccess {
    fn get(&self, slot: u16) -> ItemStack;

    fn put(&mut self, slot: u16, item: ItemStack);
}

/// Applied to a slot item and an incoming item. Returns the new slot item and
/// the new incoming item, or `None` if nothing changes.
pub trait TransactionOperator {
    fn apply(
        &self,
        rule: &dyn StackingRule,
        slot: &ItemStack,
        incoming: &ItemStack,
    ) -> Option<(ItemStack, ItemStack)>;
}

impl<F> TransactionOperator for F
where
    F: Fn(&dyn StackingRule, &ItemStack, &ItemStack) -> Option<(ItemStack, ItemStack)>,
{
    fn apply(
        &self,
        rule: &dyn StackingRule,
        slot: &ItemStack,
        incoming: &ItemStack,
    ) -> Option<(ItemStack, ItemStack)> {
        self(rule, slot, incoming)
    }
}

/// Moves items from the incoming stack into the slot, up to the slot's max
/// size and at most `limit` items.
#[derive(Copy, Clone, Debug)]
pub struct StackLeft {
    limit: i32,
}

/// Moves items from the slot into the incoming stack, up to the incoming
/// stack's max size and at most `limit` items.
#[derive(Copy, Clone, Debug)]
pub struct StackRight {
    limit: i32,
}

/// Removes as many items from the slot as the incoming stack holds, shrinking
/// both by the amount removed.
#[derive(Copy, Clone, Debug)]
pub struct Take;

pub const STACK_LEFT: StackLeft = StackLeft { limit: i32::MAX };
pub const STACK_RIGHT: StackRight = StackRight { limit: i32::MAX };
pub const TAKE: Take = Take;

/// [`STACK_LEFT`], but moving at most `limit` items.
pub const fn stack_left_n(limit: i32) -> StackLeft {
    StackLeft { limit }
}

impl TransactionOperator for StackLeft {
    fn apply(
        &self,
        rule: &dyn StackingRule,
        slot: &ItemStack,
        incoming: &ItemStack,
    ) -> Option<(ItemStack, ItemStack)> {
        if incoming.is_empty() {
            return None;
        }

        // An empty slot takes on the incoming item's type.
        if !slot.is_empty() && !rule.can_stack(slot, incoming) {
            return None;
        }

        let current = rule.amount(slot);
        let available = rule.amount(incoming);
        let space = rule.max_size(incoming) - current;

        let moved = available.min(self.limit).min(space);
        if moved <= 0 {
            return None;
        }

        Some((
            rule.with_amount(incoming, current + moved),
            rule.with_amount(incoming, available - moved),
        ))
    }
}

impl TransactionOperator for StackRight {
    fn apply(
        &self,
        rule: &dyn StackingRule,
        slot: &ItemStack,
        incoming: &ItemStack,
    ) -> Option<(ItemStack, ItemStack)> {
        stack_left_n(self.limit)
            .apply(rule, incoming, slot)
            .map(|(incoming, slot)| (slot, incoming))
    }
}

impl TransactionOperator for Take {
    fn apply(
        &self,
        rule: &dyn StackingRule,
        slot: &ItemStack,
        incoming: &ItemStack,
    ) -> Option<(ItemStack, ItemStack)> {
        if slot.is_empty() || incoming.is_empty() || !rule.can_stack(slot, incoming) {
            return None;
        }

        let slot_amount = rule.amount(slot);
        let wanted = rule.amount(incoming);
        let taken = slot_amount.min(wanted);

        Some((
            rule.with_amount(slot, slot_amount - taken),
            rule.with_amount(incoming, wanted - taken),
        ))
    }
}

/// An operator that only runs when `predicate(rule, slot, incoming)` holds.
#[derive(Copy, Clone, Debug)]
pub struct Filter<O, P> {
    operator: O,
    predicate: P,
}

pub fn filter<O, P>(operator: O, predicate: P) -> Filter<O, P>
where
    O: TransactionOperator,
    P: Fn(&dyn StackingRule, &ItemStack, &ItemStack) -> bool,
{
    Filter {
        operator,
        predicate,
    }
}

impl<O, P> TransactionOperator for Filter<O, P>
where
    O: TransactionOperator,
    P: Fn(&dyn StackingRule, &ItemStack, &ItemStack) -> bool,
{
    fn apply(
        &self,
        rule: &dyn StackingRule,
        slot: &ItemStack,
        incoming: &ItemStack,
    ) -> Option<(ItemStack, ItemStack)> {
        if (self.predicate)(rule, slot, incoming) {
            self.operator.apply(rule, slot, incoming)
        } else {
            None
        }
    }
}

/// Processes an item against a set of slots, returning what is left of it.
pub trait TransactionType {
    fn process(
        &self,
        rule: &dyn StackingRule,
        item: ItemStack,
        slots: &mut dyn SlotAccess,
    ) -> ItemStack;
}

/// Applies an operator to each slot in order.
#[derive(Clone, Debug)]
pub struct General<O> {
    operator: O,
    slots: Vec<u16>,
}

pub fn general<O, I>(operator: O, slots: I) -> General<O>
where
    O: TransactionOperator,
    I: IntoIterator<Item = u16>,
{
    General {
        operator,
        slots: slots.into_iter().collect(),
    }
}

impl<O: TransactionOperator> TransactionType for General<O> {
    fn process(
        &self,
        rule: &dyn StackingRule,
        mut item: ItemStack,
        slots: &mut dyn SlotAccess,
    ) -> ItemStack {
        for &slot in &self.slots {
            let current = slots.get(slot);

            if let Some((new_slot, rest)) = self.operator.apply(rule, &current, &item) {
                slots.put(slot, new_slot);
                item = rest;
            }
        }

        item
    }
}

/// Runs one transaction, then another on whatever is left.
#[derive(Clone, Debug)]
pub struct Join<A, B> {
    first: A,
    second: B,
}

pub fn join<A: TransactionType, B: TransactionType>(first: A, second: B) -> Join<A, B> {
    Join { first, second }
}

impl<A: TransactionType, B: TransactionType> TransactionType for Join<A, B> {
    fn process(
        &self,
        rule: &dyn StackingRule,
        item: ItemStack,
        slots: &mut dyn SlotAccess,
    ) -> ItemStack {
        let rest = self.first.process(rule, item, slots);
        self.second.process(rule, rest, slots)
    }
}

/// Merges the item into matching stacks in `fill` first, then places what is
/// left into empty slots in `air`.
pub fn add<F, A>(fill: F, air: A) -> impl TransactionType
where
    F: IntoIterator<Item = u16>,
    A: IntoIterator<Item = u16>,
{
    join(
        general(
            filter(STACK_LEFT, |_: &dyn StackingRule, slot: &ItemStack, _: &ItemStack| {
                !slot.is_empty()
            }),
            fill,
        ),
        general(
            filter(STACK_LEFT, |_: &dyn StackingRule, slot: &ItemStack, _: &ItemStack| {
                slot.is_empty()
            }),
            air,
        ),
    )
}

/// Removes the item's amount from the slots, in order.
pub fn take<I: IntoIterator<Item = u16>>(slots: I) -> General<Take> {
    general(TAKE, slots)
}

/// Writes staged on top of an inventory, without touching it.
#[derive(Debug)]
pub struct StagedSlots<'a> {
    inventory: &'a Inventory,
    changes: BTreeMap<u16, ItemStack>,
}

impl<'a> StagedSlots<'a> {
    pub fn new(inventory: &'a Inventory) -> Self {
        Self {
            inventory,
            changes: BTreeMap::new(),
        }
    }

    pub fn into_changes(self) -> BTreeMap<u16, ItemStack> {
        self.changes
    }
}

impl SlotAccess for StagedSlots<'_> {
    fn get(&self, slot: u16) -> ItemStack {
        self.changes
            .get(&slot)
            .unwrap_or_else(|| self.inventory.slot(slot))
            .clone()
    }

    fn put(&mut self, slot: u16, item: ItemStack) {
        self.changes.insert(slot, item);
    }
}

/// What to do with the outcome of a transaction run against an inventory.
pub trait TransactionOption {
    type Output;

    fn finish(
        &self,
        inventory: &mut Inventory,
        changes: BTreeMap<u16, ItemStack>,
        remainder: ItemStack,
    ) -> Self::Output;
}

/// Applies every change and returns the part of the item that did not fit.
#[derive(Copy, Clone, Debug)]
pub struct All;

/// Applies the changes only if the whole item fit. Returns whether it did.
#[derive(Copy, Clone, Debug)]
pub struct AllOrNothing;

/// Applies nothing. Returns whether the whole item would have fit.
#[derive(Copy, Clone, Debug)]
pub struct DryRun;

impl TransactionOption for All {
    type Output = ItemStack;

    fn finish(
        &self,
        inventory: &mut Inventory,
        changes: BTreeMap<u16, ItemStack>,
        remainder: ItemStack,
    ) -> ItemStack {
        for (slot, item) in changes {
            inventory.set_slot(slot, item);
        }
        remainder
    }
}

impl TransactionOption for AllOrNothing {
    type Output = bool;

    fn finish(
        &self,
        inventory: &mut Inventory,
        changes: BTreeMap<u16, ItemStack>,
        remainder: ItemStack,
    ) -> bool {
        if !remainder.is_empty() {
            return false;
        }

        for (slot, item) in changes {
            inventory.set_slot(slot, item);
        }
        true
    }
}

impl TransactionOption for DryRun {
    type Output = bool;

    fn finish(
        &self,
        _inventory: &mut Inventory,
        _changes: BTreeMap<u16, ItemStack>,
        remainder: ItemStack,
    ) -> bool {
        remainder.is_empty()
    }
}
