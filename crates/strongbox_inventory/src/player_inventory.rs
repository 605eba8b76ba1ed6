use std::ops::RangeInclusive;

use strongbox_item::EquipmentSlot;

/// Slot layout of the player's own inventory.
///
/// This is the layout clients use on the wire, and the only one used by
/// strongbox.
pub struct PlayerInventory;

impl PlayerInventory {
    pub const SLOT_OFFHAND: u16 = 45;
    pub const SLOT_HEAD: u16 = 5;
    pub const SLOT_CHEST: u16 = 6;
    pub const SLOT_LEGS: u16 = 7;
    pub const SLOT_FEET: u16 = 8;
    pub const SLOTS_CRAFT_INPUT: RangeInclusive<u16> = 1..=4;
    pub const SLOT_CRAFT_RESULT: u16 = 0;
    pub const SLOTS_ARMOR: RangeInclusive<u16> = 5..=8;
    pub const SLOTS_STORAGE: RangeInclusive<u16> = 9..=35;
    pub const SLOTS_HOTBAR: RangeInclusive<u16> = 36..=44;
    pub const SLOTS_MAIN: RangeInclusive<u16> = 9..=44;
    pub const MAIN_SIZE: u16 = *Self::SLOTS_MAIN.end() - *Self::SLOTS_MAIN.start() + 1;

    pub const fn hotbar_to_slot(hotbar: u8) -> u16 {
        *Self::SLOTS_HOTBAR.start() + (hotbar as u16)
    }

    pub const fn slot_to_hotbar(slot: u16) -> u8 {
        (slot - *Self::SLOTS_HOTBAR.start()) as u8
    }

    /// The slot an equipment piece is worn in. Returns `None` for the main
    /// hand, which depends on the held hotbar slot.
    pub const fn equipment_to_slot(slot: EquipmentSlot) -> Option<u16> {
        match slot {
            EquipmentSlot::MainHand => None,
            EquipmentSlot::OffHand => Some(Self::SLOT_OFFHAND),
            EquipmentSlot::Feet => Some(Self::SLOT_FEET),
            EquipmentSlot::Legs => Some(Self::SLOT_LEGS),
            EquipmentSlot::Chest => Some(Self::SLOT_CHEST),
            EquipmentSlot::Head => Some(Self::SLOT_HEAD),
        }
    }

    /// The equipment slot backed by the given inventory slot, if any.
    /// `held_slot` is the hotbar slot currently held in the main hand.
    pub fn slot_to_equipment(slot: u16, held_slot: u16) -> Option<EquipmentSlot> {
        match slot {
            Self::SLOT_OFFHAND => Some(EquipmentSlot::OffHand),
            Self::SLOT_FEET => Some(EquipmentSlot::Feet),
            Self::SLOT_LEGS => Some(EquipmentSlot::Legs),
            Self::SLOT_CHEST => Some(EquipmentSlot::Chest),
            Self::SLOT_HEAD => Some(EquipmentSlot::Head),
            s if s == held_slot => Some(EquipmentSlot::MainHand),
            _ => None,
        }
    }

    /// Slots checked for partial stacks when items are added: the offhand,
    /// then the hotbar, then storage.
    pub fn fill_order() -> Vec<u16> {
        std::iter::once(Self::SLOT_OFFHAND)
            .chain(Self::air_order())
            .collect()
    }

    /// Empty slots new stacks are placed in: the hotbar, then storage.
    pub fn air_order() -> Vec<u16> {
        Self::SLOTS_HOTBAR.chain(Self::SLOTS_STORAGE).collect()
    }

    /// Slots items are taken from: the hotbar, storage, the offhand, then the
    /// crafting grid and armor.
    pub fn take_order() -> Vec<u16> {
        Self::SLOTS_HOTBAR
            .chain(Self::SLOTS_STORAGE)
            .chain(std::iter::once(Self::SLOT_OFFHAND))
            .chain(Self::SLOT_CRAFT_RESULT..=*Self::SLOTS_ARMOR.end())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotbar_conversion() {
        assert_eq!(PlayerInventory::hotbar_to_slot(0), 36);
        assert_eq!(PlayerInventory::hotbar_to_slot(8), 44);
        assert_eq!(PlayerInventory::slot_to_hotbar(40), 4);
        assert_eq!(PlayerInventory::MAIN_SIZE, 36);
    }

    #[test]
    fn equipment_mapping() {
        assert_eq!(
            PlayerInventory::equipment_to_slot(EquipmentSlot::Chest),
            Some(PlayerInventory::SLOT_CHEST)
        );
        assert_eq!(
            PlayerInventory::slot_to_equipment(45, 36),
            Some(EquipmentSlot::OffHand)
        );
        assert_eq!(
            PlayerInventory::slot_to_equipment(38, 38),
            Some(EquipmentSlot::MainHand)
        );
        assert_eq!(PlayerInventory::slot_to_equipment(37, 38), None);
    }

    #[test]
    fn transaction_orders_cover_slots_once() {
        let fill = PlayerInventory::fill_order();
        assert_eq!(fill.len(), 37);
        assert_eq!(&fill[..2], &[45, 36]);

        let mut take = PlayerInventory::take_order();
        assert_eq!(take[0], 36);
        take.sort_unstable();
        take.dedup();
        assert_eq!(take, (0..46).collect::<Vec<u16>>());
    }
}
