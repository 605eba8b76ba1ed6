use std::fmt;

use strongbox_item::{DefaultStackingRule, ItemStack, StackingRule};

use super::{ClickAction, ClickResult, ResultBuilder};
use crate::transaction::{
    add, filter, general, join, stack_left_n, TransactionOperator, TransactionType, STACK_LEFT,
    STACK_RIGHT,
};
use crate::{InventoryKind, PlayerInventory};

/// Suggests the window slots a shift-click or double-click may use, in order
/// of priority. Arguments are the builder, the clicked item and the clicked
/// slot.
pub type SlotSuggestor = fn(&ResultBuilder<'_>, &ItemStack, u16) -> Vec<u16>;

/// Computes the result of a [`ClickAction`].
///
/// Processing never touches the live inventories. Everything goes through the
/// [`ResultBuilder`], so the same action can be processed again against the
/// same state with the same outcome.
#[derive(Copy, Clone)]
pub struct ClickHandler {
    shift_click_slots: SlotSuggestor,
    double_click_slots: SlotSuggestor,
    rule: &'static dyn StackingRule,
}

impl ClickHandler {
    /// The handler for the player's own inventory, with no container open.
    pub const PLAYER: Self = Self::new(player_shift_click_slots, player_double_click_slots);

    /// The handler for chests and every other container without special
    /// routing.
    pub const CONTAINER: Self =
        Self::new(container_shift_click_slots, container_double_click_slots);

    /// The handler for furnaces, blast furnaces and smokers.
    pub const FURNACE: Self = Self::new(furnace_shift_click_slots, container_double_click_slots);

    pub const fn new(shift_click_slots: SlotSuggestor, double_click_slots: SlotSuggestor) -> Self {
        Self {
            shift_click_slots,
            double_click_slots,
            rule: &DefaultStackingRule,
        }
    }

    /// Replaces the stacking rule used by every operation of this handler.
    pub const fn with_rule(mut self, rule: &'static dyn StackingRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn rule(&self) -> &'static dyn StackingRule {
        self.rule
    }

    /// The standard handler for an inventory kind.
    pub const fn for_kind(kind: InventoryKind) -> Self {
        match kind {
            InventoryKind::Player => Self::PLAYER,
            InventoryKind::Furnace | InventoryKind::BlastFurnace | InventoryKind::Smoker => {
                Self::FURNACE
            }
            _ => Self::CONTAINER,
        }
    }

    pub fn process(&self, action: &ClickAction, mut builder: ResultBuilder<'_>) -> ClickResult {
        let b = &mut builder;

        match action {
            ClickAction::Left(slot) => self.left(*slot, b),
            ClickAction::Right(slot) => self.right(*slot, b),
            ClickAction::Middle(slot) => self.middle(*slot, b),
            ClickAction::LeftShift(slot) | ClickAction::RightShift(slot) => self.shift(*slot, b),
            ClickAction::Double(slot) => self.double(*slot, b),
            ClickAction::LeftDrag(slots) => {
                let per_slot = match i32::try_from(slots.len()) {
                    Ok(len) if len > 0 => (self.rule.amount(&b.cursor_item()) / len).max(1),
                    _ => 0,
                };
                self.drag(per_slot, slots, b);
            }
            ClickAction::RightDrag(slots) => self.drag(1, slots, b),
            ClickAction::MiddleDrag(slots) => middle_drag(slots, b),
            ClickAction::LeftDropCursor => {
                let all = self.rule.amount(&b.cursor_item());
                self.drop_cursor(all, b);
            }
            ClickAction::RightDropCursor => self.drop_cursor(1, b),
            ClickAction::MiddleDropCursor => {}
            ClickAction::DropSlot { slot, all } => {
                let amount = if *all {
                    self.rule.amount(&b.get(*slot))
                } else {
                    1
                };
                self.drop_slot(*slot, amount, b);
            }
            ClickAction::HotbarSwap { hotbar, slot } => {
                swap_with_player(*slot, PlayerInventory::hotbar_to_slot(*hotbar), b);
            }
            ClickAction::OffhandSwap(slot) => {
                swap_with_player(*slot, PlayerInventory::SLOT_OFFHAND, b);
            }
            ClickAction::CreativeSetItem { slot, item } => {
                b.set(*slot, item.clone());
            }
            ClickAction::CreativeDropItem(item) => {
                if !item.is_empty() {
                    b.drop_item(item.clone());
                }
            }
        }

        builder.build()
    }

    fn left(&self, slot: u16, builder: &mut ResultBuilder) {
        let cursor = builder.cursor_item();
        let clicked = builder.get(slot);

        if let Some((new_slot, new_cursor)) = STACK_LEFT.apply(self.rule, &clicked, &cursor) {
            builder.set(slot, new_slot).cursor(new_cursor);
        } else if !self.rule.can_stack(&cursor, &clicked) {
            builder.set(slot, cursor).cursor(clicked);
        }
    }

    fn right(&self, slot: u16, builder: &mut ResultBuilder) {
        let cursor = builder.cursor_item();
        let clicked = builder.get(slot);

        if cursor.is_empty() && clicked.is_empty() {
            return;
        }

        if cursor.is_empty() {
            // The cursor takes the larger half.
            let half = (self.rule.amount(&clicked) + 1) / 2;
            if let Some((new_cursor, new_slot)) =
                stack_left_n(half).apply(self.rule, &cursor, &clicked)
            {
                builder.cursor(new_cursor).set(slot, new_slot);
            }
        } else if self.rule.can_be_stacked(&clicked, &cursor) {
            if let Some((new_slot, new_cursor)) =
                stack_left_n(1).apply(self.rule, &clicked, &cursor)
            {
                builder.set(slot, new_slot).cursor(new_cursor);
            }
        } else {
            builder.set(slot, cursor).cursor(clicked);
        }
    }

    fn middle(&self, slot: u16, builder: &mut ResultBuilder) {
        let clicked = builder.get(slot);

        if builder.cursor_item().is_empty() && !clicked.is_empty() {
            let full = self.rule.with_amount(&clicked, self.rule.max_size(&clicked));
            builder.cursor(full);
        }
    }

    fn shift(&self, slot: u16, builder: &mut ResultBuilder) {
        let clicked = builder.get(slot);
        if clicked.is_empty() {
            return;
        }

        let mut slots = (self.shift_click_slots)(builder, &clicked, slot);
        slots.retain(|&s| s != slot);

        let rest = add(slots.clone(), slots).process(self.rule, clicked.clone(), builder);

        if rest != clicked {
            builder.set(slot, rest);
        }
    }

    fn double(&self, slot: u16, builder: &mut ResultBuilder) {
        let cursor = builder.cursor_item();
        if cursor.is_empty() {
            return;
        }

        let slots = (self.double_click_slots)(builder, &cursor, slot);

        // Partial stacks are emptied before full ones are broken up.
        let partial = general(
            filter(
                STACK_RIGHT,
                |rule: &dyn StackingRule, slot: &ItemStack, _: &ItemStack| {
                    rule.amount(slot) < rule.max_size(slot)
                },
            ),
            slots.clone(),
        );
        let full = general(
            filter(
                STACK_RIGHT,
                |rule: &dyn StackingRule, slot: &ItemStack, _: &ItemStack| {
                    rule.amount(slot) >= rule.max_size(slot)
                },
            ),
            slots,
        );

        let rest = join(partial, full).process(self.rule, cursor.clone(), builder);

        if rest != cursor {
            builder.cursor(rest);
        }
    }

    fn drag(&self, per_slot: i32, slots: &[u16], builder: &mut ResultBuilder) {
        let cursor = builder.cursor_item();
        if cursor.is_empty() || slots.is_empty() {
            return;
        }

        let rest = general(stack_left_n(per_slot), slots.iter().copied()).process(
            self.rule,
            cursor.clone(),
            builder,
        );

        if rest != cursor {
            builder.cursor(rest);
        }
    }

    fn drop_cursor(&self, amount: i32, builder: &mut ResultBuilder) {
        let cursor = builder.cursor_item();
        if let Some((dropped, rest)) = self.split(&cursor, amount) {
            builder.cursor(rest).drop_item(dropped);
        }
    }

    fn drop_slot(&self, slot: u16, amount: i32, builder: &mut ResultBuilder) {
        let item = builder.get(slot);
        if let Some((dropped, rest)) = self.split(&item, amount) {
            builder.set(slot, rest).drop_item(dropped);
        }
    }

    /// Splits up to `amount` items off a non-empty stack.
    fn split(&self, stack: &ItemStack, amount: i32) -> Option<(ItemStack, ItemStack)> {
        let available = self.rule.amount(stack);
        let amount = amount.min(available);
        if stack.is_empty() || amount <= 0 {
            return None;
        }

        Some((
            self.rule.with_amount(stack, amount),
            self.rule.with_amount(stack, available - amount),
        ))
    }
}

fn middle_drag(slots: &[u16], builder: &mut ResultBuilder) {
    let cursor = builder.cursor_item();
    if cursor.is_empty() {
        return;
    }

    for &slot in slots {
        if builder.get(slot).is_empty() {
            builder.set(slot, cursor.clone());
        }
    }
}

impl fmt::Debug for ClickHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClickHandler").finish_non_exhaustive()
    }
}

fn swap_with_player(slot: u16, player_slot: u16, builder: &mut ResultBuilder) {
    let player_item = builder.get_player(player_slot);
    let clicked = builder.get(slot);

    if player_item == clicked {
        return;
    }

    builder.set_player(player_slot, clicked).set(slot, player_item);
}

fn player_shift_click_slots(_builder: &ResultBuilder, item: &ItemStack, slot: u16) -> Vec<u16> {
    let mut slots = vec![];

    // Armor and shields go to where they are worn first.
    if let Some(target) = item
        .item()
        .equipment_slot()
        .and_then(PlayerInventory::equipment_to_slot)
    {
        if target != slot {
            slots.push(target);
        }
    }

    if !PlayerInventory::SLOTS_STORAGE.contains(&slot) {
        slots.extend(PlayerInventory::SLOTS_STORAGE);
    }

    if !PlayerInventory::SLOTS_HOTBAR.contains(&slot) {
        slots.extend(PlayerInventory::SLOTS_HOTBAR);
    }

    if slot == PlayerInventory::SLOT_CRAFT_RESULT {
        slots.reverse();
    }

    slots
}

fn player_double_click_slots(_builder: &ResultBuilder, _item: &ItemStack, _slot: u16) -> Vec<u16> {
    PlayerInventory::SLOTS_CRAFT_INPUT
        .chain(PlayerInventory::SLOTS_ARMOR)
        .chain(PlayerInventory::SLOTS_STORAGE)
        .chain(PlayerInventory::SLOTS_HOTBAR)
        .chain([PlayerInventory::SLOT_OFFHAND])
        .collect()
}

fn container_shift_click_slots(builder: &ResultBuilder, _item: &ItemStack, slot: u16) -> Vec<u16> {
    let size = builder.clicked_size();

    if slot >= size {
        (0..size).collect()
    } else {
        (size..size + PlayerInventory::MAIN_SIZE).collect()
    }
}

fn container_double_click_slots(
    builder: &ResultBuilder,
    _item: &ItemStack,
    _slot: u16,
) -> Vec<u16> {
    (0..builder.clicked_size() + PlayerInventory::MAIN_SIZE).collect()
}

fn furnace_shift_click_slots(builder: &ResultBuilder, _item: &ItemStack, slot: u16) -> Vec<u16> {
    let size = builder.clicked_size();
    let storage = size..size + 27;
    let hotbar = size + 27..size + PlayerInventory::MAIN_SIZE;

    if slot < size {
        (size..size + PlayerInventory::MAIN_SIZE).collect()
    } else if storage.contains(&slot) {
        hotbar.collect()
    } else {
        storage.collect()
    }
}
