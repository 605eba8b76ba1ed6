#![doc = include_str!("../README.md")]

use std::iter::FusedIterator;
use std::ops::Range;
use std::sync::Arc;

use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use derive_more::{Deref, DerefMut};
use strongbox_item::{DefaultStackingRule, EquipmentSlot, ItemStack};
use strongbox_view::SlotView;
use tracing::warn;
use transaction::{add, take, StagedSlots, TransactionOption, TransactionType};

pub use click::{
    handle_creative_action, handle_player_click, ClickAction, ClickContext, ClickDecoder,
    ClickEffects, ClickHandler, ClickHooks, ClickMode, ClickResult, ClickSlotPacket, Clicker,
    Container, HookFlow, ResultBuilder, SideEffects, SlotSuggestor,
};
pub use player_inventory::PlayerInventory;

pub mod click;
pub mod player_inventory;
pub mod regions;
pub mod transaction;
mod validate;

pub struct InventoryPlugin;

impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreUpdate, init_new_client_inventories)
            .add_systems(
                Update,
                (
                    handle_click_slot,
                    handle_creative_inventory_action,
                    handle_close_container,
                )
                    .chain(),
            )
            .init_resource::<InventorySettings>()
            .init_resource::<ClickHooks>()
            .add_event::<ClickSlotEvent>()
            .add_event::<CreativeInventoryActionEvent>()
            .add_event::<CloseContainerEvent>()
            .add_event::<DropItemStackEvent>()
            .add_event::<InventoryResyncEvent>()
            .add_event::<ClickAppliedEvent>()
            .add_event::<EquipmentChangeEvent>();
    }
}

#[derive(Debug, Clone, PartialEq, Component)]
pub struct Inventory {
    kind: InventoryKind,
    slots: Box<[ItemStack]>,
}

impl Inventory {
    pub fn new(kind: InventoryKind) -> Self {
        Inventory {
            kind,
            slots: vec![ItemStack::EMPTY; kind.slot_count()].into(),
        }
    }

    #[track_caller]
    pub fn slot(&self, idx: u16) -> &ItemStack {
        self.slots
            .get(idx as usize)
            .expect("slot index out of range")
    }

    /// Like [`Inventory::slot`], but returns `None` instead of panicking when
    /// the index is out of range.
    pub fn try_slot(&self, idx: u16) -> Option<&ItemStack> {
        self.slots.get(idx as usize)
    }

    /// Sets the slot at the given index to the given item stack.
    ///
    /// See also [`Inventory::replace_slot`].
    ///
    /// ```
    /// # use strongbox_inventory::*;
    /// # use strongbox_item::{ItemStack, ItemKind};
    /// let mut inv = Inventory::new(InventoryKind::Generic9x1);
    /// inv.set_slot(0, ItemStack::new(ItemKind::Diamond, 1, None));
    /// assert_eq!(inv.slot(0).item(), ItemKind::Diamond);
    /// ```
    #[track_caller]
    #[inline]
    pub fn set_slot<I: Into<ItemStack>>(&mut self, idx: u16, item: I) {
        let _ = self.replace_slot(idx, item);
    }

    /// Replaces the slot at the given index with the given item stack, and
    /// returns the old stack in that slot.
    ///
    /// See also [`Inventory::set_slot`].
    #[track_caller]
    #[must_use]
    pub fn replace_slot<I: Into<ItemStack>>(&mut self, idx: u16, item: I) -> ItemStack {
        assert!(idx < self.slot_count(), "slot index of {idx} out of bounds");

        std::mem::replace(&mut self.slots[idx as usize], item.into())
    }

    pub fn slot_count(&self) -> u16 {
        self.slots.len() as u16
    }

    pub fn slots(
        &self,
    ) -> impl ExactSizeIterator<Item = &ItemStack> + DoubleEndedIterator + FusedIterator + Clone + '_
    {
        self.slots.iter()
    }

    pub fn kind(&self) -> InventoryKind {
        self.kind
    }

    /// Returns the first empty slot in the given range, or `None` if there are
    /// no empty slots in the range.
    ///
    /// ```
    /// # use strongbox_inventory::*;
    /// # use strongbox_item::{ItemStack, ItemKind};
    /// let mut inv = Inventory::new(InventoryKind::Generic9x1);
    /// inv.set_slot(0, ItemStack::new(ItemKind::Diamond, 1, None));
    /// inv.set_slot(2, ItemStack::new(ItemKind::GoldIngot, 1, None));
    /// inv.set_slot(3, ItemStack::new(ItemKind::IronIngot, 1, None));
    /// assert_eq!(inv.first_empty_slot_in(0..6), Some(1));
    /// assert_eq!(inv.first_empty_slot_in(2..6), Some(4));
    /// ```
    #[track_caller]
    #[must_use]
    pub fn first_empty_slot_in(&self, mut range: Range<u16>) -> Option<u16> {
        assert!(
            (0..=self.slot_count()).contains(&range.start)
                && (0..=self.slot_count()).contains(&range.end),
            "slot range out of range"
        );

        range.find(|&idx| self.slots[idx as usize].is_empty())
    }

    #[inline]
    pub fn first_empty_slot(&self) -> Option<u16> {
        self.first_empty_slot_in(0..self.slot_count())
    }

    /// Reads the slot at a local index of `view`. Returns `None` when the
    /// view does not map the index to a slot of this inventory.
    ///
    /// ```
    /// # use strongbox_inventory::*;
    /// # use strongbox_inventory::regions::PlayerInventoryView;
    /// # use strongbox_item::{ItemStack, ItemKind};
    /// let mut inv = Inventory::new(InventoryKind::Player);
    /// inv.set_slot(36, ItemStack::new(ItemKind::Bread, 3, None));
    ///
    /// let hotbar = PlayerInventoryView::hotbar();
    /// assert_eq!(inv.view_slot(&hotbar, 0), Some(&ItemStack::new(ItemKind::Bread, 3, None)));
    /// assert_eq!(inv.view_slot(&hotbar, 9), None);
    /// ```
    pub fn view_slot(&self, view: &SlotView, local: usize) -> Option<&ItemStack> {
        self.slots.get(view.local_to_external(local)?)
    }

    /// Writes the slot at a local index of `view`, returning the old stack.
    /// Returns `None` and writes nothing when the view does not map the index
    /// to a slot of this inventory.
    pub fn set_view_slot<I: Into<ItemStack>>(
        &mut self,
        view: &SlotView,
        local: usize,
        item: I,
    ) -> Option<ItemStack> {
        let slot = self.slots.get_mut(view.local_to_external(local)?)?;
        Some(std::mem::replace(slot, item.into()))
    }

    /// Empties every slot of this inventory that `view` covers.
    pub fn clear_view(&mut self, view: &SlotView) {
        for external in view.externals() {
            if let Some(slot) = self.slots.get_mut(external) {
                *slot = ItemStack::EMPTY;
            }
        }
    }

    /// Adds a stack to the inventory, merging it into matching stacks before
    /// using empty slots. What happens with the outcome is up to `option`.
    ///
    /// ```
    /// # use strongbox_inventory::*;
    /// # use strongbox_inventory::transaction::All;
    /// # use strongbox_item::{ItemStack, ItemKind};
    /// let mut inv = Inventory::new(InventoryKind::Hopper);
    /// inv.set_slot(2, ItemStack::new(ItemKind::Coal, 60, None));
    ///
    /// let rest = inv.add_item_stack(ItemStack::new(ItemKind::Coal, 10, None), All);
    /// assert!(rest.is_empty());
    /// assert_eq!(inv.slot(2).count(), 64);
    /// assert_eq!(inv.slot(0).count(), 6);
    /// ```
    pub fn add_item_stack<O: TransactionOption>(&mut self, stack: ItemStack, option: O) -> O::Output {
        let (fill, air) = match self.kind {
            InventoryKind::Player => (PlayerInventory::fill_order(), PlayerInventory::air_order()),
            _ => ((0..self.slot_count()).collect(), (0..self.slot_count()).collect()),
        };

        self.transact(&add(fill, air), stack, option)
    }

    /// Removes as many items as `stack` holds from matching stacks.
    pub fn take_item_stack<O: TransactionOption>(
        &mut self,
        stack: ItemStack,
        option: O,
    ) -> O::Output {
        let order: Vec<u16> = match self.kind {
            InventoryKind::Player => PlayerInventory::take_order(),
            _ => (0..self.slot_count()).collect(),
        };

        self.transact(&take(order), stack, option)
    }

    /// Runs a transaction against this inventory with the default stacking
    /// rule.
    pub fn transact<T, O>(&mut self, transaction: &T, item: ItemStack, option: O) -> O::Output
    where
        T: TransactionType,
        O: TransactionOption,
    {
        let mut staged = StagedSlots::new(self);
        let rest = transaction.process(&DefaultStackingRule, item, &mut staged);
        let changes = staged.into_changes();

        option.finish(self, changes, rest)
    }
}

/// The player's own click decoder. It is used while no container is open.
#[derive(Component, Debug)]
pub struct ClientInventoryState {
    decoder: ClickDecoder,
}

impl ClientInventoryState {
    pub fn decoder(&self) -> &ClickDecoder {
        &self.decoder
    }
}

/// Indicates which hotbar slot the player is currently holding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component, Deref)]
pub struct HeldItem {
    held_item_slot: u16,
}

impl HeldItem {
    /// The slot ID of the currently held item, in the range 36-44 inclusive.
    /// This value is safe to use on the player's inventory directly.
    pub fn slot(&self) -> u16 {
        self.held_item_slot
    }

    pub fn hotbar_idx(&self) -> u8 {
        PlayerInventory::slot_to_hotbar(self.held_item_slot)
    }

    #[track_caller]
    pub fn set_slot(&mut self, slot: u16) {
        assert!(
            PlayerInventory::SLOTS_HOTBAR.contains(&slot),
            "slot index of {slot} out of bounds"
        );

        self.held_item_slot = slot;
    }
}

impl Default for HeldItem {
    fn default() -> Self {
        Self {
            // First slot of the hotbar.
            held_item_slot: *PlayerInventory::SLOTS_HOTBAR.start(),
        }
    }
}

/// The item stack that the client thinks it's holding under the mouse
/// cursor.
#[derive(Component, Clone, PartialEq, Default, Debug, Deref, DerefMut)]
pub struct CursorItem(pub ItemStack);

#[derive(Component, Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum GameMode {
    #[default]
    Survival,
    Creative,
    Adventure,
    Spectator,
}

/// Marks an entity as a client whose inventory is handled by
/// [`InventoryPlugin`]. The rest of the inventory components are added the
/// tick after this one is.
#[derive(Component, Copy, Clone, Default, Debug)]
pub struct InventoryClient;

/// Used to indicate that the client with this component is currently viewing
/// a container. The same container may be open for any number of clients.
#[derive(Component, Clone, Debug, Deref)]
pub struct OpenContainer(pub Arc<Container>);

/// A helper to represent the inventory window that the player is currently
/// viewing. Handles dispatching reads to the correct inventory.
///
/// ```
/// # use strongbox_inventory::*;
/// # use strongbox_item::{ItemStack, ItemKind};
/// let mut player_inventory = Inventory::new(InventoryKind::Player);
/// player_inventory.set_slot(36, ItemStack::new(ItemKind::Diamond, 1, None));
///
/// let target_inventory = Inventory::new(InventoryKind::Generic9x3);
/// let window = InventoryWindow::new(&player_inventory, Some(&target_inventory));
///
/// assert_eq!(window.slot(54), &ItemStack::new(ItemKind::Diamond, 1, None));
/// ```
#[derive(Copy, Clone, Debug)]
pub struct InventoryWindow<'a> {
    player_inventory: &'a Inventory,
    open_inventory: Option<&'a Inventory>,
}

impl<'a> InventoryWindow<'a> {
    pub fn new(player_inventory: &'a Inventory, open_inventory: Option<&'a Inventory>) -> Self {
        Self {
            player_inventory,
            open_inventory,
        }
    }

    #[track_caller]
    pub fn slot(&self, idx: u16) -> &'a ItemStack {
        if let Some(open_inv) = self.open_inventory {
            if idx < open_inv.slot_count() {
                open_inv.slot(idx)
            } else {
                self.player_inventory
                    .slot(convert_to_player_slot_id(open_inv.kind(), idx))
            }
        } else {
            self.player_inventory.slot(idx)
        }
    }

    pub fn slot_count(&self) -> u16 {
        if let Some(open_inv) = &self.open_inventory {
            // when the window is split, we can only access the main slots of player's
            // inventory
            PlayerInventory::MAIN_SIZE + open_inv.slot_count()
        } else {
            self.player_inventory.slot_count()
        }
    }

    pub fn player_inventory(&self) -> &'a Inventory {
        self.player_inventory
    }

    pub fn open_inventory(&self) -> Option<&'a Inventory> {
        self.open_inventory
    }
}

fn init_new_client_inventories(
    clients: Query<(Entity, Has<GameMode>), Added<InventoryClient>>,
    mut commands: Commands,
) {
    for (entity, has_game_mode) in &clients {
        let inventory = Inventory::new(InventoryKind::Player);

        let mut entity = commands.entity(entity);
        entity.insert((
            ClientInventoryState {
                decoder: ClickDecoder::for_inventory(&inventory),
            },
            inventory,
            CursorItem(ItemStack::EMPTY),
            HeldItem::default(),
        ));

        if !has_game_mode {
            entity.insert(GameMode::default());
        }
    }
}

/// A click slot packet received from a client.
#[derive(Event, Clone, Debug)]
pub struct ClickSlotEvent {
    pub client: Entity,
    pub packet: ClickSlotPacket,
}

/// A creative inventory action packet received from a client. A slot of `-1`
/// drops the item.
#[derive(Event, Clone, Debug)]
pub struct CreativeInventoryActionEvent {
    pub client: Entity,
    pub slot: i16,
    pub clicked_item: ItemStack,
}

/// The client closed the container it was viewing.
#[derive(Event, Clone, Debug)]
pub struct CloseContainerEvent {
    pub client: Entity,
}

/// A click dropped a stack into the world. Spawning the item is up to the
/// application.
#[derive(Event, Clone, Debug)]
pub struct DropItemStackEvent {
    pub client: Entity,
    pub stack: ItemStack,
}

/// The client's view of its inventories may be out of date and should be
/// sent again in full.
#[derive(Event, Clone, Debug)]
pub struct InventoryResyncEvent {
    pub client: Entity,
}

#[derive(Event, Clone, Debug)]
pub struct ClickAppliedEvent {
    pub client: Entity,
    pub action: ClickAction,
    pub result: ClickResult,
}

/// A click changed an equipped slot of the player: armor, the offhand or the
/// held hotbar slot.
#[derive(Event, Clone, Debug)]
pub struct EquipmentChangeEvent {
    pub client: Entity,
    pub slot: EquipmentSlot,
    pub stack: ItemStack,
}

/// Collects the effects of clicks so they can be sent as events once the
/// click has been handled.
#[derive(Default)]
struct EventEffects {
    held_slot: u16,
    container_open: bool,
    drops: Vec<DropItemStackEvent>,
    resyncs: Vec<InventoryResyncEvent>,
    applied: Vec<ClickAppliedEvent>,
    equipment: Vec<EquipmentChangeEvent>,
}

impl EventEffects {
    fn new(held_slot: u16, container_open: bool) -> Self {
        Self {
            held_slot,
            container_open,
            ..Default::default()
        }
    }

    fn send(
        self,
        drops: &mut EventWriter<DropItemStackEvent>,
        resyncs: &mut EventWriter<InventoryResyncEvent>,
        applied: &mut EventWriter<ClickAppliedEvent>,
        equipment: &mut EventWriter<EquipmentChangeEvent>,
    ) {
        drops.send_batch(self.drops);
        resyncs.send_batch(self.resyncs);
        applied.send_batch(self.applied);
        equipment.send_batch(self.equipment);
    }
}

impl ClickEffects for EventEffects {
    fn drop_item(&mut self, player: Entity, stack: ItemStack) {
        self.drops.push(DropItemStackEvent {
            client: player,
            stack,
        });
    }

    fn resync(&mut self, player: Entity) {
        self.resyncs.push(InventoryResyncEvent { client: player });
    }

    fn applied(&mut self, player: Entity, action: &ClickAction, result: &ClickResult) {
        // Without a container, the clicked inventory is the player's own.
        let own_changes = (!self.container_open)
            .then_some(&result.changes)
            .into_iter()
            .flatten();

        for (&slot, stack) in own_changes.chain(&result.player_changes) {
            if let Some(equipment) = PlayerInventory::slot_to_equipment(slot, self.held_slot) {
                self.equipment.push(EquipmentChangeEvent {
                    client: player,
                    slot: equipment,
                    stack: stack.clone(),
                });
            }
        }

        self.applied.push(ClickAppliedEvent {
            client: player,
            action: action.clone(),
            result: result.clone(),
        });
    }
}

fn handle_click_slot(
    mut events: EventReader<ClickSlotEvent>,
    mut clients: Query<(
        &mut Inventory,
        &mut CursorItem,
        &ClientInventoryState,
        &GameMode,
        &HeldItem,
        Option<&OpenContainer>,
    )>,
    hooks: Res<ClickHooks>,
    settings: Res<InventorySettings>,
    mut drops: EventWriter<DropItemStackEvent>,
    mut resyncs: EventWriter<InventoryResyncEvent>,
    mut applied: EventWriter<ClickAppliedEvent>,
    mut equipment: EventWriter<EquipmentChangeEvent>,
) {
    for event in events.read() {
        let Ok((mut inventory, mut cursor_item, inv_state, game_mode, held_item, open_container)) =
            clients.get_mut(event.client)
        else {
            // The client does not exist, ignore.
            continue;
        };

        if inventory.kind() != InventoryKind::Player {
            warn!("Inventory on client entity is not a player inventory");
            continue;
        }

        let mut effects = EventEffects::new(held_item.slot(), open_container.is_some());
        let clicker = Clicker {
            entity: event.client,
            game_mode: *game_mode,
            inventory: &mut *inventory,
            cursor: &mut *cursor_item,
        };

        match open_container {
            Some(container) => container.handle_click(
                clicker,
                &event.packet,
                &hooks,
                &settings,
                &mut effects,
            ),
            None => handle_player_click(
                inv_state.decoder(),
                clicker,
                &event.packet,
                &hooks,
                &settings,
                &mut effects,
            ),
        };

        effects.send(&mut drops, &mut resyncs, &mut applied, &mut equipment);
    }
}

fn handle_creative_inventory_action(
    mut events: EventReader<CreativeInventoryActionEvent>,
    mut clients: Query<(
        &mut Inventory,
        &mut CursorItem,
        &ClientInventoryState,
        &GameMode,
        &HeldItem,
    )>,
    hooks: Res<ClickHooks>,
    settings: Res<InventorySettings>,
    mut drops: EventWriter<DropItemStackEvent>,
    mut resyncs: EventWriter<InventoryResyncEvent>,
    mut applied: EventWriter<ClickAppliedEvent>,
    mut equipment: EventWriter<EquipmentChangeEvent>,
) {
    for event in events.read() {
        let Ok((mut inventory, mut cursor_item, inv_state, game_mode, held_item)) =
            clients.get_mut(event.client)
        else {
            continue;
        };

        let mut effects = EventEffects::new(held_item.slot(), false);
        let clicker = Clicker {
            entity: event.client,
            game_mode: *game_mode,
            inventory: &mut *inventory,
            cursor: &mut *cursor_item,
        };

        handle_creative_action(
            inv_state.decoder(),
            clicker,
            event.slot,
            event.clicked_item.clone(),
            &hooks,
            &settings,
            &mut effects,
        );

        effects.send(&mut drops, &mut resyncs, &mut applied, &mut equipment);
    }
}

/// Forgets the client's in-progress drags and removes its [`OpenContainer`].
fn handle_close_container(
    mut events: EventReader<CloseContainerEvent>,
    clients: Query<(&ClientInventoryState, Option<&OpenContainer>)>,
    mut commands: Commands,
) {
    for event in events.read() {
        let Ok((inv_state, open_container)) = clients.get(event.client) else {
            continue;
        };

        inv_state.decoder().clear_cache(event.client);

        if let Some(container) = open_container {
            container.close(event.client);

            if let Some(mut entity) = commands.get_entity(event.client) {
                entity.remove::<OpenContainer>();
            }
        }
    }
}

/// Convert a slot that is outside a target inventory's range to a slot that is
/// inside the player's inventory.
#[doc(hidden)]
pub fn convert_to_player_slot_id(target_kind: InventoryKind, slot_id: u16) -> u16 {
    // the first slot in the player's general inventory
    let offset = target_kind.slot_count() as u16;
    slot_id - offset + *PlayerInventory::SLOTS_MAIN.start()
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum InventoryKind {
    Generic9x1,
    Generic9x2,
    Generic9x3,
    Generic9x4,
    Generic9x5,
    Generic9x6,
    Generic3x3,
    Anvil,
    Beacon,
    BlastFurnace,
    BrewingStand,
    Crafting,
    Enchantment,
    Furnace,
    Grindstone,
    Hopper,
    Lectern,
    Loom,
    Merchant,
    ShulkerBox,
    Smithing,
    Smoker,
    Cartography,
    Stonecutter,
    Player,
}

impl InventoryKind {
    /// The number of slots in this inventory. When the inventory is shown to
    /// clients, this number does not include the player's main inventory slots.
    pub const fn slot_count(self) -> usize {
        match self {
            InventoryKind::Generic9x1 => 9,
            InventoryKind::Generic9x2 => 9 * 2,
            InventoryKind::Generic9x3 => 9 * 3,
            InventoryKind::Generic9x4 => 9 * 4,
            InventoryKind::Generic9x5 => 9 * 5,
            InventoryKind::Generic9x6 => 9 * 6,
            InventoryKind::Generic3x3 => 3 * 3,
            InventoryKind::Anvil => 4,
            InventoryKind::Beacon => 1,
            InventoryKind::BlastFurnace => 3,
            InventoryKind::BrewingStand => 5,
            InventoryKind::Crafting => 10,
            InventoryKind::Enchantment => 2,
            InventoryKind::Furnace => 3,
            InventoryKind::Grindstone => 3,
            InventoryKind::Hopper => 5,
            InventoryKind::Lectern => 1,
            InventoryKind::Loom => 4,
            InventoryKind::Merchant => 3,
            InventoryKind::ShulkerBox => 27,
            InventoryKind::Smithing => 3,
            InventoryKind::Smoker => 3,
            InventoryKind::Cartography => 3,
            InventoryKind::Stonecutter => 2,
            InventoryKind::Player => 46,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Resource)]
pub struct InventorySettings {
    /// Reject click results that create or destroy items, unless the player
    /// is in creative mode.
    pub validate_actions: bool,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            validate_actions: true,
        }
    }
}
