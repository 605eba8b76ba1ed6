use anyhow::{bail, ensure};
use strongbox_item::ItemStack;

use crate::click::{ClickAction, ClickResult};
use crate::{GameMode, Inventory, InventorySettings, InventoryWindow, PlayerInventory};

/// Validates an action that did not come out of the decoder, enforcing that
/// every slot it names exists in the window and that creative actions come
/// from creative players.
pub(super) fn validate_click_action(
    action: &ClickAction,
    window: &InventoryWindow<'_>,
    game_mode: GameMode,
) -> anyhow::Result<()> {
    let window_size = window.slot_count();
    let check_slot = |slot: u16| -> anyhow::Result<()> {
        ensure!(
            slot < window_size,
            "slot {slot} out of bounds for window with {window_size} slots"
        );
        Ok(())
    };

    ensure!(
        !action.is_creative() || game_mode == GameMode::Creative,
        "creative action from a player in {game_mode:?} mode"
    );

    match action {
        ClickAction::Left(slot)
        | ClickAction::Right(slot)
        | ClickAction::Middle(slot)
        | ClickAction::LeftShift(slot)
        | ClickAction::RightShift(slot)
        | ClickAction::Double(slot)
        | ClickAction::DropSlot { slot, .. }
        | ClickAction::OffhandSwap(slot)
        | ClickAction::CreativeSetItem { slot, .. } => check_slot(*slot),
        ClickAction::LeftDrag(slots)
        | ClickAction::RightDrag(slots)
        | ClickAction::MiddleDrag(slots) => slots.iter().try_for_each(|&slot| check_slot(slot)),
        ClickAction::HotbarSwap { hotbar, slot } => {
            ensure!(
                PlayerInventory::SLOTS_HOTBAR
                    .contains(&PlayerInventory::hotbar_to_slot(*hotbar)),
                "hotbar index {hotbar} out of bounds"
            );
            check_slot(*slot)
        }
        ClickAction::LeftDropCursor
        | ClickAction::RightDropCursor
        | ClickAction::MiddleDropCursor
        | ClickAction::CreativeDropItem(_) => Ok(()),
    }
}

/// Validates a click result before it is applied, enforcing that every slot
/// exists and that no slot of the player's inventory is written twice.
pub(super) fn validate_click_result(
    result: &ClickResult,
    player_inventory: &Inventory,
    open_inventory: Option<&Inventory>,
) -> anyhow::Result<()> {
    let clicked = open_inventory.unwrap_or(player_inventory);

    // check all slot ids are valid
    if let Some(idx) = result
        .changes
        .keys()
        .find(|&&idx| clicked.try_slot(idx).is_none())
    {
        bail!(
            "slot {idx} out of bounds for {:?} inventory with {} slots",
            clicked.kind(),
            clicked.slot_count()
        );
    }

    if let Some(idx) = result
        .player_changes
        .keys()
        .find(|&&idx| player_inventory.try_slot(idx).is_none())
    {
        bail!("player inventory slot {idx} out of bounds");
    }

    ensure!(
        open_inventory.is_some()
            || result
                .changes
                .keys()
                .all(|idx| !result.player_changes.contains_key(idx)),
        "player inventory slots changed twice"
    );

    Ok(())
}

/// Checks that a result neither creates nor destroys items, other than the
/// ones it drops. Skipped for creative players and when
/// [`InventorySettings::validate_actions`] is off.
pub(super) fn validate_item_conservation(
    result: &ClickResult,
    player_inventory: &Inventory,
    open_inventory: Option<&Inventory>,
    cursor_item: &ItemStack,
    game_mode: GameMode,
    settings: &InventorySettings,
) -> anyhow::Result<()> {
    if settings.validate_actions && game_mode != GameMode::Creative {
        let delta = calculate_net_item_delta(result, player_inventory, open_inventory, cursor_item);
        let dropped: i32 = result.dropped().iter().map(count).sum();

        ensure!(
            delta == -dropped,
            "item count changed by {delta} but {dropped} items were dropped"
        );
    }

    Ok(())
}

fn count(stack: &ItemStack) -> i32 {
    i32::from(stack.count())
}

/// The number of items the result adds to the inventories and the cursor.
fn calculate_net_item_delta(
    result: &ClickResult,
    player_inventory: &Inventory,
    open_inventory: Option<&Inventory>,
    cursor_item: &ItemStack,
) -> i32 {
    let clicked = open_inventory.unwrap_or(player_inventory);
    let mut net_item_delta = 0;

    for (&idx, new) in &result.changes {
        net_item_delta += count(new) - count(clicked.slot(idx));
    }

    for (&idx, new) in &result.player_changes {
        net_item_delta += count(new) - count(player_inventory.slot(idx));
    }

    if let Some(new) = &result.cursor {
        net_item_delta += count(new) - count(cursor_item);
    }

    net_item_delta
}
