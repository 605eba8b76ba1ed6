use std::collections::BTreeMap;

use bevy_ecs::entity::Entity;
use strongbox_item::ItemStack;

use super::ClickEffects;
use crate::transaction::SlotAccess;
use crate::{convert_to_player_slot_id, CursorItem, Inventory};

/// A non-slot consequence of a click.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SideEffects {
    /// Drop these stacks into the world near the player.
    DropFromPlayer(Vec<ItemStack>),
}

impl SideEffects {
    fn dropped(&self) -> &[ItemStack] {
        match self {
            SideEffects::DropFromPlayer(stacks) => stacks,
        }
    }
}

/// Every change one click makes.
///
/// `changes` is keyed by slots of the clicked inventory: the open container,
/// or the player's inventory when nothing is open. `player_changes` is keyed
/// by slots of the player's inventory.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ClickResult {
    pub changes: BTreeMap<u16, ItemStack>,
    pub player_changes: BTreeMap<u16, ItemStack>,
    /// The new cursor item, or `None` if the cursor does not change.
    pub cursor: Option<ItemStack>,
    pub side_effects: Option<SideEffects>,
}

impl ClickResult {
    /// Whether applying this result would do nothing at all.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
            && self.player_changes.is_empty()
            && self.cursor.is_none()
            && self.side_effects.is_none()
    }

    /// The stacks this result drops into the world.
    pub fn dropped(&self) -> &[ItemStack] {
        match &self.side_effects {
            Some(effects) => effects.dropped(),
            None => &[],
        }
    }

    /// Writes the result into the inventories and runs its side effects.
    ///
    /// `open_inventory` is the clicked container, or `None` when the player
    /// clicked their own inventory. Slots must have been checked against the
    /// inventories beforehand.
    #[track_caller]
    pub fn apply(
        &self,
        player: Entity,
        player_inventory: &mut Inventory,
        open_inventory: Option<&mut Inventory>,
        cursor: &mut CursorItem,
        effects: &mut dyn ClickEffects,
    ) {
        match open_inventory {
            Some(open) => {
                for (&slot, item) in &self.changes {
                    open.set_slot(slot, item.clone());
                }
            }
            None => {
                for (&slot, item) in &self.changes {
                    player_inventory.set_slot(slot, item.clone());
                }
            }
        }

        for (&slot, item) in &self.player_changes {
            player_inventory.set_slot(slot, item.clone());
        }

        if let Some(new_cursor) = &self.cursor {
            cursor.0 = new_cursor.clone();
        }

        for stack in self.dropped() {
            if !stack.is_empty() {
                effects.drop_item(player, stack.clone());
            }
        }
    }
}

/// Stages the writes of a click on top of the live inventories.
///
/// Reads go through the staged changes first and fall back to the live
/// inventories, so nothing has to be copied up front. Window slots past the
/// end of the open container address the player's main inventory.
#[derive(Debug)]
pub struct ResultBuilder<'a> {
    player_inventory: &'a Inventory,
    open_inventory: Option<&'a Inventory>,
    cursor: &'a ItemStack,
    result: ClickResult,
}

impl<'a> ResultBuilder<'a> {
    pub fn new(
        player_inventory: &'a Inventory,
        open_inventory: Option<&'a Inventory>,
        cursor: &'a ItemStack,
    ) -> Self {
        Self {
            player_inventory,
            open_inventory,
            cursor,
            result: ClickResult::default(),
        }
    }

    /// The number of slots of the clicked inventory.
    pub fn clicked_size(&self) -> u16 {
        self.open_or_player().slot_count()
    }

    /// Whether a container is open on top of the player's inventory.
    pub fn has_open_inventory(&self) -> bool {
        self.open_inventory.is_some()
    }

    /// Resolves a window slot to the map and inventory it belongs to.
    fn locate(&self, slot: u16) -> WindowSlot {
        match self.open_inventory {
            Some(open) if slot >= open.slot_count() => {
                WindowSlot::Player(convert_to_player_slot_id(open.kind(), slot))
            }
            Some(_) => WindowSlot::Clicked(slot),
            None => WindowSlot::Player(slot),
        }
    }

    /// Reads a window slot.
    #[track_caller]
    pub fn get(&self, slot: u16) -> ItemStack {
        match self.locate(slot) {
            WindowSlot::Clicked(slot) => self
                .result
                .changes
                .get(&slot)
                .cloned()
                .unwrap_or_else(|| self.open_or_player().slot(slot).clone()),
            WindowSlot::Player(slot) => self.get_player(slot),
        }
    }

    /// Stages a write to a window slot.
    pub fn set(&mut self, slot: u16, item: ItemStack) -> &mut Self {
        match self.locate(slot) {
            WindowSlot::Clicked(slot) => {
                self.result.changes.insert(slot, item);
            }
            WindowSlot::Player(slot) => {
                self.result.player_changes.insert(slot, item);
            }
        }
        self
    }

    /// Reads a slot of the player's inventory.
    #[track_caller]
    pub fn get_player(&self, slot: u16) -> ItemStack {
        self.result
            .player_changes
            .get(&slot)
            .cloned()
            .unwrap_or_else(|| self.player_inventory.slot(slot).clone())
    }

    /// Stages a write to a slot of the player's inventory.
    pub fn set_player(&mut self, slot: u16, item: ItemStack) -> &mut Self {
        self.result.player_changes.insert(slot, item);
        self
    }

    /// The cursor item, including a staged replacement.
    pub fn cursor_item(&self) -> ItemStack {
        self.result
            .cursor
            .clone()
            .unwrap_or_else(|| self.cursor.clone())
    }

    pub fn cursor(&mut self, item: ItemStack) -> &mut Self {
        self.result.cursor = Some(item);
        self
    }

    /// Stages the side effects of this click, replacing any staged before.
    pub fn side_effects(&mut self, effects: SideEffects) -> &mut Self {
        self.result.side_effects = Some(effects);
        self
    }

    /// Adds a stack to the staged drops.
    pub fn drop_item(&mut self, stack: ItemStack) -> &mut Self {
        match &mut self.result.side_effects {
            Some(SideEffects::DropFromPlayer(stacks)) => stacks.push(stack),
            None => self.result.side_effects = Some(SideEffects::DropFromPlayer(vec![stack])),
        }
        self
    }

    pub fn build(self) -> ClickResult {
        self.result
    }

    fn open_or_player(&self) -> &'a Inventory {
        self.open_inventory.unwrap_or(self.player_inventory)
    }
}

#[derive(Copy, Clone, Debug)]
enum WindowSlot {
    Clicked(u16),
    Player(u16),
}

impl SlotAccess for ResultBuilder<'_> {
    fn get(&self, slot: u16) -> ItemStack {
        ResultBuilder::get(self, slot)
    }

    fn put(&mut self, slot: u16, item: ItemStack) {
        self.set(slot, item);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strongbox_item::ItemKind;

    use super::*;
    use crate::{InventoryKind, PlayerInventory};

    fn stack(item: ItemKind, count: i8) -> ItemStack {
        ItemStack::new(item, count, None)
    }

    #[test]
    fn reads_fall_through_to_live_inventories() {
        let mut player = Inventory::new(InventoryKind::Player);
        player.set_slot(9, stack(ItemKind::Apple, 2));
        let mut chest = Inventory::new(InventoryKind::Generic9x3);
        chest.set_slot(0, stack(ItemKind::Bread, 5));

        let builder = ResultBuilder::new(&player, Some(&chest), &ItemStack::EMPTY);

        assert_eq!(builder.clicked_size(), 27);
        assert_eq!(builder.get(0), stack(ItemKind::Bread, 5));
        // The first window slot after the chest is the first storage slot.
        assert_eq!(builder.get(27), stack(ItemKind::Apple, 2));
        assert_eq!(builder.get_player(9), stack(ItemKind::Apple, 2));
    }

    #[test]
    fn writes_are_staged_in_the_right_map() {
        let player = Inventory::new(InventoryKind::Player);
        let chest = Inventory::new(InventoryKind::Generic9x1);
        let cursor = stack(ItemKind::Stone, 1);

        let mut builder = ResultBuilder::new(&player, Some(&chest), &cursor);
        builder
            .set(2, stack(ItemKind::Dirt, 1))
            .set(44, stack(ItemKind::Sand, 1))
            .set_player(PlayerInventory::SLOT_OFFHAND, stack(ItemKind::Shield, 1))
            .cursor(ItemStack::EMPTY);

        assert_eq!(builder.get(2), stack(ItemKind::Dirt, 1));
        assert_eq!(builder.get_player(44), stack(ItemKind::Sand, 1));
        assert_eq!(builder.cursor_item(), ItemStack::EMPTY);

        let result = builder.build();
        assert_eq!(
            result,
            ClickResult {
                changes: BTreeMap::from([(2, stack(ItemKind::Dirt, 1))]),
                player_changes: BTreeMap::from([
                    (44, stack(ItemKind::Sand, 1)),
                    (45, stack(ItemKind::Shield, 1)),
                ]),
                cursor: Some(ItemStack::EMPTY),
                side_effects: None,
            }
        );
        // The live inventories are untouched.
        assert!(chest.slots().all(ItemStack::is_empty));
        assert!(player.slots().all(ItemStack::is_empty));
    }

    #[test]
    fn own_inventory_writes_go_to_player_changes() {
        let player = Inventory::new(InventoryKind::Player);
        let mut builder = ResultBuilder::new(&player, None, &ItemStack::EMPTY);

        builder.set(5, stack(ItemKind::IronHelmet, 1));

        assert_eq!(builder.clicked_size(), 46);
        assert!(!builder.has_open_inventory());
        assert_eq!(builder.get_player(5), stack(ItemKind::IronHelmet, 1));
        assert!(builder.build().changes.is_empty());
    }

    #[test]
    fn drops_accumulate() {
        let player = Inventory::new(InventoryKind::Player);
        let mut builder = ResultBuilder::new(&player, None, &ItemStack::EMPTY);

        builder
            .drop_item(stack(ItemKind::Egg, 1))
            .drop_item(stack(ItemKind::Egg, 2));
        let result = builder.build();

        assert_eq!(
            result.dropped(),
            &[stack(ItemKind::Egg, 1), stack(ItemKind::Egg, 2)]
        );
    }

    #[test]
    fn applying_writes_every_part() {
        struct Drops(Vec<ItemStack>);

        impl ClickEffects for Drops {
            fn drop_item(&mut self, _player: Entity, stack: ItemStack) {
                self.0.push(stack);
            }

            fn resync(&mut self, _player: Entity) {}
        }

        let mut player = Inventory::new(InventoryKind::Player);
        let mut chest = Inventory::new(InventoryKind::Generic9x1);
        let mut cursor = CursorItem(stack(ItemKind::Coal, 3));
        let mut drops = Drops(vec![]);

        let result = ClickResult {
            changes: BTreeMap::from([(1, stack(ItemKind::Coal, 1))]),
            player_changes: BTreeMap::from([(36, stack(ItemKind::Coal, 1))]),
            cursor: Some(ItemStack::EMPTY),
            side_effects: Some(SideEffects::DropFromPlayer(vec![stack(ItemKind::Coal, 1)])),
        };
        result.apply(
            Entity::from_raw(7),
            &mut player,
            Some(&mut chest),
            &mut cursor,
            &mut drops,
        );

        assert_eq!(chest.slot(1), &stack(ItemKind::Coal, 1));
        assert_eq!(player.slot(36), &stack(ItemKind::Coal, 1));
        assert_eq!(cursor.0, ItemStack::EMPTY);
        assert_eq!(drops.0, vec![stack(ItemKind::Coal, 1)]);
    }
}
