use strongbox_item::ItemStack;

/// The click type of a click slot packet.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ClickMode {
    Click,
    ShiftClick,
    Hotbar,
    CreativeMiddleClick,
    DropKey,
    Drag,
    DoubleClick,
}

/// The parts of a click slot packet the decoder looks at.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ClickSlotPacket {
    pub slot_idx: i16,
    pub button: i8,
    pub mode: ClickMode,
}

impl ClickSlotPacket {
    /// The slot index clients send when clicking outside of the window.
    pub const OUTSIDE_WINDOW: i16 = -999;

    pub fn new(mode: ClickMode, slot_idx: i16, button: i8) -> Self {
        Self {
            slot_idx,
            button,
            mode,
        }
    }
}

/// A decoded player interaction with an inventory window.
///
/// Slots are window slots: the open container's slots come first, followed by
/// the player's main inventory. When no container is open, window slots are
/// the player inventory's own slots.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ClickAction {
    Left(u16),
    Right(u16),
    /// Clones the clicked stack onto the cursor. Creative only.
    Middle(u16),
    LeftShift(u16),
    RightShift(u16),
    /// Collects items matching the cursor into the cursor.
    Double(u16),
    LeftDrag(Vec<u16>),
    RightDrag(Vec<u16>),
    /// Copies the cursor into every empty dragged slot. Creative only.
    MiddleDrag(Vec<u16>),
    LeftDropCursor,
    RightDropCursor,
    MiddleDropCursor,
    DropSlot {
        slot: u16,
        all: bool,
    },
    HotbarSwap {
        hotbar: u8,
        slot: u16,
    },
    OffhandSwap(u16),
    CreativeSetItem {
        slot: u16,
        item: ItemStack,
    },
    CreativeDropItem(ItemStack),
}

impl ClickAction {
    /// Whether this action can only come from a player in creative mode.
    pub fn is_creative(&self) -> bool {
        matches!(
            self,
            ClickAction::Middle(_)
                | ClickAction::MiddleDrag(_)
                | ClickAction::CreativeSetItem { .. }
                | ClickAction::CreativeDropItem(_)
        )
    }
}
