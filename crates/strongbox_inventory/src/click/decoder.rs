use bevy_ecs::entity::Entity;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use strongbox_item::ItemStack;
use tracing::trace;

use super::{ClickAction, ClickMode, ClickSlotPacket};
use crate::{GameMode, Inventory, InventoryKind, PlayerInventory};

/// Turns raw click packets into [`ClickAction`]s for one inventory.
///
/// Drags are sent as a start packet, one packet per slot, and a finish packet.
/// The decoder keeps the slots of in-progress drags for every player viewing
/// the inventory, and only yields an action when the drag finishes.
///
/// Slot bounds differ between inventories, so every open inventory has its
/// own decoder.
#[derive(Debug)]
pub struct ClickDecoder {
    container_size: u16,
    is_player_inventory: bool,
    left_drags: Mutex<FxHashMap<Entity, Vec<u16>>>,
    right_drags: Mutex<FxHashMap<Entity, Vec<u16>>>,
    middle_drags: Mutex<FxHashMap<Entity, Vec<u16>>>,
}

#[derive(Copy, Clone, Debug)]
enum DragKind {
    Left,
    Right,
    Middle,
}

impl ClickDecoder {
    pub fn new(container_size: u16, is_player_inventory: bool) -> Self {
        Self {
            container_size,
            is_player_inventory,
            left_drags: Mutex::default(),
            right_drags: Mutex::default(),
            middle_drags: Mutex::default(),
        }
    }

    pub fn for_inventory(inventory: &Inventory) -> Self {
        Self::new(
            inventory.slot_count(),
            inventory.kind() == InventoryKind::Player,
        )
    }

    /// The number of window slots clicks may refer to.
    pub fn window_size(&self) -> u16 {
        if self.is_player_inventory {
            self.container_size
        } else {
            // The player's main inventory is appended after the container.
            self.container_size + PlayerInventory::MAIN_SIZE
        }
    }

    fn validate(&self, slot: i16) -> Option<u16> {
        u16::try_from(slot)
            .ok()
            .filter(|&slot| slot < self.window_size())
    }

    /// Decodes a click packet. Returns `None` when the packet is malformed,
    /// not allowed in the player's game mode, or only advances a drag.
    pub fn process(
        &self,
        player: Entity,
        game_mode: GameMode,
        packet: &ClickSlotPacket,
    ) -> Option<ClickAction> {
        let action = self.decode(player, game_mode, packet);

        if action.is_none() {
            trace!(?player, ?packet, "click packet yielded no action");
        }

        action
    }

    fn decode(
        &self,
        player: Entity,
        game_mode: GameMode,
        packet: &ClickSlotPacket,
    ) -> Option<ClickAction> {
        let creative = game_mode == GameMode::Creative;
        let button = packet.button;

        match packet.mode {
            ClickMode::Click => {
                if packet.slot_idx == ClickSlotPacket::OUTSIDE_WINDOW {
                    return match button {
                        0 => Some(ClickAction::LeftDropCursor),
                        1 => Some(ClickAction::RightDropCursor),
                        2 => Some(ClickAction::MiddleDropCursor),
                        _ => None,
                    };
                }

                let slot = self.validate(packet.slot_idx)?;
                match button {
                    0 => Some(ClickAction::Left(slot)),
                    1 => Some(ClickAction::Right(slot)),
                    _ => None,
                }
            }
            ClickMode::ShiftClick => {
                let slot = self.validate(packet.slot_idx)?;
                match button {
                    0 => Some(ClickAction::LeftShift(slot)),
                    _ => Some(ClickAction::RightShift(slot)),
                }
            }
            ClickMode::Hotbar => {
                let slot = self.validate(packet.slot_idx)?;
                match button {
                    0..=8 => Some(ClickAction::HotbarSwap {
                        hotbar: button as u8,
                        slot,
                    }),
                    40 => Some(ClickAction::OffhandSwap(slot)),
                    _ => None,
                }
            }
            ClickMode::CreativeMiddleClick => {
                let slot = self.validate(packet.slot_idx)?;
                creative.then_some(ClickAction::Middle(slot))
            }
            ClickMode::DropKey => {
                let slot = self.validate(packet.slot_idx)?;
                Some(ClickAction::DropSlot {
                    slot,
                    all: button == 1,
                })
            }
            ClickMode::Drag => self.decode_drag(player, creative, packet),
            ClickMode::DoubleClick => {
                let slot = self.validate(packet.slot_idx)?;
                Some(ClickAction::Double(slot))
            }
        }
    }

    fn decode_drag(
        &self,
        player: Entity,
        creative: bool,
        packet: &ClickSlotPacket,
    ) -> Option<ClickAction> {
        if !creative && matches!(packet.button, 8..=10) {
            return None;
        }

        match packet.button {
            // Start of a drag.
            0 => self.start_drag(DragKind::Left, player),
            4 => self.start_drag(DragKind::Right, player),
            8 => self.start_drag(DragKind::Middle, player),

            // A slot was dragged over.
            1 => self.add_drag_slot(DragKind::Left, player, packet.slot_idx),
            5 => self.add_drag_slot(DragKind::Right, player, packet.slot_idx),
            9 => self.add_drag_slot(DragKind::Middle, player, packet.slot_idx),

            // End of a drag.
            2 => Some(ClickAction::LeftDrag(self.finish_drag(DragKind::Left, player))),
            6 => Some(ClickAction::RightDrag(self.finish_drag(DragKind::Right, player))),
            10 => Some(ClickAction::MiddleDrag(
                self.finish_drag(DragKind::Middle, player),
            )),

            _ => None,
        }
    }

    fn drags(&self, kind: DragKind) -> &Mutex<FxHashMap<Entity, Vec<u16>>> {
        match kind {
            DragKind::Left => &self.left_drags,
            DragKind::Right => &self.right_drags,
            DragKind::Middle => &self.middle_drags,
        }
    }

    fn start_drag(&self, kind: DragKind, player: Entity) -> Option<ClickAction> {
        self.drags(kind).lock().remove(&player);
        None
    }

    fn add_drag_slot(&self, kind: DragKind, player: Entity, slot: i16) -> Option<ClickAction> {
        let mut drags = self.drags(kind).lock();
        let slots = drags.entry(player).or_default();

        if let Some(slot) = self.validate(slot) {
            if !slots.contains(&slot) {
                slots.push(slot);
            }
        }

        None
    }

    fn finish_drag(&self, kind: DragKind, player: Entity) -> Vec<u16> {
        self.drags(kind)
            .lock()
            .remove(&player)
            .unwrap_or_default()
    }

    /// Decodes a creative inventory action. These always target the player's
    /// own inventory, and are only accepted from players in creative mode.
    pub fn process_creative(
        &self,
        player: Entity,
        game_mode: GameMode,
        slot: i16,
        item: ItemStack,
    ) -> Option<ClickAction> {
        if game_mode != GameMode::Creative {
            trace!(?player, "creative action from a player not in creative mode");
            return None;
        }

        if slot == -1 {
            return Some(ClickAction::CreativeDropItem(item));
        }

        match u16::try_from(slot) {
            Ok(slot) if slot < InventoryKind::Player.slot_count() as u16 => {
                Some(ClickAction::CreativeSetItem { slot, item })
            }
            _ => None,
        }
    }

    /// Forgets every in-progress drag of the player. Call this when the player
    /// stops viewing the inventory.
    pub fn clear_cache(&self, player: Entity) {
        self.left_drags.lock().remove(&player);
        self.right_drags.lock().remove(&player);
        self.middle_drags.lock().remove(&player);
    }

    /// The number of players with an in-progress drag.
    pub fn pending_drags(&self) -> usize {
        self.left_drags.lock().len()
            + self.right_drags.lock().len()
            + self.middle_drags.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strongbox_item::ItemKind;

    use super::*;

    const ALEX: Entity = Entity::from_raw(1);
    const STEVE: Entity = Entity::from_raw(2);

    fn chest_decoder() -> ClickDecoder {
        ClickDecoder::new(27, false)
    }

    fn packet(mode: ClickMode, slot: i16, button: i8) -> ClickSlotPacket {
        ClickSlotPacket::new(mode, slot, button)
    }

    #[test]
    fn simple_clicks() {
        let decoder = chest_decoder();
        let decode = |p| decoder.process(ALEX, GameMode::Survival, &p);

        assert_eq!(decode(packet(ClickMode::Click, 3, 0)), Some(ClickAction::Left(3)));
        assert_eq!(decode(packet(ClickMode::Click, 62, 1)), Some(ClickAction::Right(62)));
        assert_eq!(decode(packet(ClickMode::Click, 3, 2)), None);
        assert_eq!(
            decode(packet(ClickMode::ShiftClick, 30, 1)),
            Some(ClickAction::RightShift(30))
        );
        // Any button other than the primary one is a right shift click.
        assert_eq!(
            decode(packet(ClickMode::ShiftClick, 30, 5)),
            Some(ClickAction::RightShift(30))
        );
        assert_eq!(
            decode(packet(ClickMode::ShiftClick, 30, 0)),
            Some(ClickAction::LeftShift(30))
        );
        assert_eq!(
            decode(packet(ClickMode::DropKey, 4, 1)),
            Some(ClickAction::DropSlot { slot: 4, all: true })
        );
        assert_eq!(
            decode(packet(ClickMode::DoubleClick, 4, 0)),
            Some(ClickAction::Double(4))
        );
    }

    #[test]
    fn slot_bounds() {
        let decoder = chest_decoder();
        let decode = |p| decoder.process(ALEX, GameMode::Survival, &p);

        // 27 container slots followed by 36 player slots.
        assert_eq!(decode(packet(ClickMode::Click, 62, 0)), Some(ClickAction::Left(62)));
        assert_eq!(decode(packet(ClickMode::Click, 63, 0)), None);
        assert_eq!(decode(packet(ClickMode::Click, -1, 0)), None);

        let player = ClickDecoder::new(46, true);
        assert_eq!(
            player.process(ALEX, GameMode::Survival, &packet(ClickMode::Click, 45, 0)),
            Some(ClickAction::Left(45))
        );
        assert_eq!(
            player.process(ALEX, GameMode::Survival, &packet(ClickMode::Click, 46, 0)),
            None
        );
    }

    #[test]
    fn clicks_outside_window_drop_the_cursor() {
        let decoder = chest_decoder();
        let decode = |button| {
            decoder.process(
                ALEX,
                GameMode::Survival,
                &packet(ClickMode::Click, ClickSlotPacket::OUTSIDE_WINDOW, button),
            )
        };

        assert_eq!(decode(0), Some(ClickAction::LeftDropCursor));
        assert_eq!(decode(1), Some(ClickAction::RightDropCursor));
        assert_eq!(decode(2), Some(ClickAction::MiddleDropCursor));
        assert_eq!(decode(3), None);

        // Only plain clicks may target the outside of the window.
        assert_eq!(
            decoder.process(
                ALEX,
                GameMode::Survival,
                &packet(ClickMode::DropKey, ClickSlotPacket::OUTSIDE_WINDOW, 0)
            ),
            None
        );
    }

    #[test]
    fn swaps() {
        let decoder = chest_decoder();
        let decode = |p| decoder.process(ALEX, GameMode::Survival, &p);

        assert_eq!(
            decode(packet(ClickMode::Hotbar, 5, 8)),
            Some(ClickAction::HotbarSwap { hotbar: 8, slot: 5 })
        );
        assert_eq!(
            decode(packet(ClickMode::Hotbar, 5, 40)),
            Some(ClickAction::OffhandSwap(5))
        );
        assert_eq!(decode(packet(ClickMode::Hotbar, 5, 9)), None);
        assert_eq!(decode(packet(ClickMode::Hotbar, 5, -1)), None);
    }

    #[test]
    fn middle_click_requires_creative() {
        let decoder = chest_decoder();
        let middle = packet(ClickMode::CreativeMiddleClick, 2, 2);

        assert_eq!(decoder.process(ALEX, GameMode::Survival, &middle), None);
        assert_eq!(
            decoder.process(ALEX, GameMode::Creative, &middle),
            Some(ClickAction::Middle(2))
        );
    }

    #[test]
    fn drags_accumulate_until_finished() {
        let decoder = chest_decoder();
        let decode = |slot, button| {
            decoder.process(ALEX, GameMode::Survival, &packet(ClickMode::Drag, slot, button))
        };

        assert_eq!(decode(-999, 0), None);
        assert_eq!(decode(1, 1), None);
        assert_eq!(decode(2, 1), None);
        assert_eq!(decode(1, 1), None);
        assert_eq!(decode(500, 1), None);
        assert_eq!(decode(-999, 2), Some(ClickAction::LeftDrag(vec![1, 2])));

        // The accumulator is consumed by the finish packet.
        assert_eq!(decode(-999, 2), Some(ClickAction::LeftDrag(vec![])));
        assert_eq!(decoder.pending_drags(), 0);
    }

    #[test]
    fn drag_start_resets_previous_slots() {
        let decoder = chest_decoder();
        let decode = |slot, button| {
            decoder.process(ALEX, GameMode::Survival, &packet(ClickMode::Drag, slot, button))
        };

        decode(-999, 4);
        decode(7, 5);
        decode(-999, 4);
        decode(8, 5);

        assert_eq!(decode(-999, 6), Some(ClickAction::RightDrag(vec![8])));
    }

    #[test]
    fn drags_are_tracked_per_player() {
        let decoder = chest_decoder();
        let drag = |player, slot, button| {
            decoder.process(player, GameMode::Survival, &packet(ClickMode::Drag, slot, button))
        };

        drag(ALEX, -999, 0);
        drag(STEVE, -999, 0);
        drag(ALEX, 3, 1);
        drag(STEVE, 4, 1);
        drag(ALEX, 5, 1);

        assert_eq!(drag(STEVE, -999, 2), Some(ClickAction::LeftDrag(vec![4])));
        assert_eq!(drag(ALEX, -999, 2), Some(ClickAction::LeftDrag(vec![3, 5])));
    }

    #[test]
    fn creative_drags() {
        let decoder = chest_decoder();

        for button in [8, 9, 10] {
            assert_eq!(
                decoder.process(ALEX, GameMode::Survival, &packet(ClickMode::Drag, 1, button)),
                None
            );
        }
        assert_eq!(decoder.pending_drags(), 0);

        decoder.process(ALEX, GameMode::Creative, &packet(ClickMode::Drag, -999, 8));
        decoder.process(ALEX, GameMode::Creative, &packet(ClickMode::Drag, 6, 9));
        assert_eq!(
            decoder.process(ALEX, GameMode::Creative, &packet(ClickMode::Drag, -999, 10)),
            Some(ClickAction::MiddleDrag(vec![6]))
        );
    }

    #[test]
    fn clearing_the_cache_drops_pending_drags() {
        let decoder = chest_decoder();
        let drag = |slot, button| {
            decoder.process(ALEX, GameMode::Creative, &packet(ClickMode::Drag, slot, button))
        };

        drag(3, 1);
        drag(3, 5);
        drag(3, 9);
        assert_eq!(decoder.pending_drags(), 3);

        decoder.clear_cache(ALEX);
        assert_eq!(decoder.pending_drags(), 0);
        assert_eq!(drag(-999, 2), Some(ClickAction::LeftDrag(vec![])));
    }

    #[test]
    fn creative_actions() {
        let decoder = ClickDecoder::new(46, true);
        let diamond = ItemStack::new(ItemKind::Diamond, 64, None);

        assert_eq!(
            decoder.process_creative(ALEX, GameMode::Survival, 36, diamond.clone()),
            None
        );
        assert_eq!(
            decoder.process_creative(ALEX, GameMode::Creative, 36, diamond.clone()),
            Some(ClickAction::CreativeSetItem {
                slot: 36,
                item: diamond.clone()
            })
        );
        assert_eq!(
            decoder.process_creative(ALEX, GameMode::Creative, -1, diamond.clone()),
            Some(ClickAction::CreativeDropItem(diamond.clone()))
        );
        assert_eq!(
            decoder.process_creative(ALEX, GameMode::Creative, 46, diamond),
            None
        );
    }
}
