//! Named regions of common inventories, as [`SlotView`]s.
//!
//! Every region is a join onto the root view of its inventory, so regions can
//! be forked further (a single hotbar slot, the top row of the crafting grid)
//! without recomputing offsets by hand.

use strongbox_view::SlotView;

use crate::{InventoryKind, PlayerInventory};

fn root(kind: InventoryKind) -> SlotView {
    SlotView::span(0, kind.slot_count()).expect("inventory sizes are small")
}

#[track_caller]
fn region(parent: &SlotView, start: usize, len: usize) -> SlotView {
    SlotView::span(start, len)
        .and_then(|child| parent.fork(&child))
        .expect("region must lie inside its parent")
}

/// Regions of the player's own inventory.
///
/// ```
/// # use strongbox_inventory::regions::PlayerInventoryView;
/// let hotbar = PlayerInventoryView::hotbar();
/// assert_eq!(hotbar.size(), 9);
/// assert_eq!(hotbar.local_to_external(0), Some(36));
/// ```
pub struct PlayerInventoryView;

impl PlayerInventoryView {
    pub fn root() -> SlotView {
        root(InventoryKind::Player)
    }

    /// The crafting result followed by the four input slots.
    pub fn crafting() -> SlotView {
        region(&Self::root(), 0, 5)
    }

    pub fn crafting_result() -> SlotView {
        region(&Self::crafting(), 0, 1)
    }

    pub fn crafting_input() -> SlotView {
        region(&Self::crafting(), 1, 4)
    }

    /// Head, chest, legs and feet, in that order.
    pub fn armor() -> SlotView {
        region(&Self::root(), usize::from(*PlayerInventory::SLOTS_ARMOR.start()), 4)
    }

    pub fn head() -> SlotView {
        region(&Self::armor(), 0, 1)
    }

    pub fn chest() -> SlotView {
        region(&Self::armor(), 1, 1)
    }

    pub fn legs() -> SlotView {
        region(&Self::armor(), 2, 1)
    }

    pub fn feet() -> SlotView {
        region(&Self::armor(), 3, 1)
    }

    /// Storage followed by the hotbar.
    pub fn main() -> SlotView {
        region(
            &Self::root(),
            usize::from(*PlayerInventory::SLOTS_MAIN.start()),
            usize::from(PlayerInventory::MAIN_SIZE),
        )
    }

    pub fn storage() -> SlotView {
        region(&Self::main(), 0, 27)
    }

    pub fn hotbar() -> SlotView {
        region(&Self::main(), 27, 9)
    }

    pub fn offhand() -> SlotView {
        region(&Self::root(), usize::from(PlayerInventory::SLOT_OFFHAND), 1)
    }
}

/// Regions of furnaces, blast furnaces and smokers.
pub struct FurnaceView;

impl FurnaceView {
    pub fn root() -> SlotView {
        root(InventoryKind::Furnace)
    }

    pub fn input() -> SlotView {
        region(&Self::root(), 0, 1)
    }

    pub fn fuel() -> SlotView {
        region(&Self::root(), 1, 1)
    }

    pub fn result() -> SlotView {
        region(&Self::root(), 2, 1)
    }
}

/// Regions of a brewing stand.
pub struct BrewingStandView;

impl BrewingStandView {
    pub fn root() -> SlotView {
        root(InventoryKind::BrewingStand)
    }

    /// The three potion slots.
    pub fn results() -> SlotView {
        region(&Self::root(), 0, 3)
    }

    pub fn ingredient() -> SlotView {
        region(&Self::root(), 3, 1)
    }

    pub fn fuel() -> SlotView {
        region(&Self::root(), 4, 1)
    }
}
