use bevy_ecs::prelude::*;
use parking_lot::{Mutex, MutexGuard};
use strongbox_item::ItemStack;
use tracing::{debug, warn};

use super::{ClickAction, ClickDecoder, ClickHandler, ClickResult, ClickSlotPacket, ResultBuilder};
use crate::validate::{validate_click_action, validate_click_result, validate_item_conservation};
use crate::{CursorItem, GameMode, Inventory, InventorySettings, InventoryWindow};

/// What a hook wants the pipeline to do next.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum HookFlow<T> {
    /// Carry on with this value, which may differ from the one passed in.
    Continue(T),
    /// Stop the click. Nothing is applied and the client is resynced.
    Cancel,
}

/// The things a click affects outside of the inventories.
pub trait ClickEffects {
    /// Drops a stack into the world near the player.
    fn drop_item(&mut self, player: Entity, stack: ItemStack);

    /// Sends the player the full state of the inventories they are viewing.
    fn resync(&mut self, player: Entity);

    /// Called once a result has been applied and the post-click hooks have
    /// run.
    fn applied(&mut self, _player: Entity, _action: &ClickAction, _result: &ClickResult) {}
}

/// What hooks can see about the click being handled.
#[derive(Debug)]
pub struct ClickContext<'a> {
    pub player: Entity,
    pub game_mode: GameMode,
    pub window: InventoryWindow<'a>,
    pub cursor: &'a ItemStack,
}

type PreClickHook =
    Box<dyn Fn(&ClickContext<'_>, ClickAction) -> HookFlow<ClickAction> + Send + Sync>;
type ClickHook =
    Box<dyn Fn(&ClickContext<'_>, &ClickAction, ClickResult) -> HookFlow<ClickResult> + Send + Sync>;
type PostClickHook = Box<dyn Fn(&ClickContext<'_>, &ClickAction, &ClickResult) + Send + Sync>;

/// Callbacks run at each stage of a click, in registration order.
///
/// ```
/// # use strongbox_inventory::{ClickAction, ClickHooks, HookFlow};
/// let mut hooks = ClickHooks::default();
///
/// // Nobody may throw items out of their inventory.
/// hooks.on_pre_click(|_, action| match action {
///     ClickAction::DropSlot { .. } => HookFlow::Cancel,
///     action => HookFlow::Continue(action),
/// });
/// ```
#[derive(Resource, Default)]
pub struct ClickHooks {
    pre_click: Vec<PreClickHook>,
    click: Vec<ClickHook>,
    post_click: Vec<PostClickHook>,
}

impl ClickHooks {
    /// Registers a hook that runs before the action is processed. It may
    /// replace the action or cancel the click.
    pub fn on_pre_click<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&ClickContext<'_>, ClickAction) -> HookFlow<ClickAction> + Send + Sync + 'static,
    {
        self.pre_click.push(Box::new(hook));
        self
    }

    /// Registers a hook that runs after the action is processed. It may
    /// replace the result or cancel the click.
    pub fn on_click<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&ClickContext<'_>, &ClickAction, ClickResult) -> HookFlow<ClickResult>
            + Send
            + Sync
            + 'static,
    {
        self.click.push(Box::new(hook));
        self
    }

    /// Registers a hook that runs after the result is applied.
    pub fn on_post_click<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&ClickContext<'_>, &ClickAction, &ClickResult) + Send + Sync + 'static,
    {
        self.post_click.push(Box::new(hook));
        self
    }

    fn run_pre_click(&self, cx: &ClickContext, mut action: ClickAction) -> HookFlow<ClickAction> {
        for hook in &self.pre_click {
            match hook(cx, action) {
                HookFlow::Continue(next) => action = next,
                HookFlow::Cancel => return HookFlow::Cancel,
            }
        }

        HookFlow::Continue(action)
    }

    fn run_click(
        &self,
        cx: &ClickContext,
        action: &ClickAction,
        mut result: ClickResult,
    ) -> HookFlow<ClickResult> {
        for hook in &self.click {
            match hook(cx, action, result) {
                HookFlow::Continue(next) => result = next,
                HookFlow::Cancel => return HookFlow::Cancel,
            }
        }

        HookFlow::Continue(result)
    }

    fn run_post_click(&self, cx: &ClickContext, action: &ClickAction, result: &ClickResult) {
        for hook in &self.post_click {
            hook(cx, action, result);
        }
    }
}

/// The player a click comes from, and the state of theirs it may change.
#[derive(Debug)]
pub struct Clicker<'a> {
    pub entity: Entity,
    pub game_mode: GameMode,
    pub inventory: &'a mut Inventory,
    pub cursor: &'a mut CursorItem,
}

/// An inventory that any number of players may have open at once, such as a
/// chest.
///
/// The inventory is locked for the whole of a click, so concurrent clicks from
/// different players are applied one after another and never interleave.
#[derive(Debug)]
pub struct Container {
    inventory: Mutex<Inventory>,
    decoder: ClickDecoder,
    handler: ClickHandler,
}

impl Container {
    /// Wraps an inventory with the standard handler for its kind.
    pub fn new(inventory: Inventory) -> Self {
        let handler = ClickHandler::for_kind(inventory.kind());
        Self::with_handler(inventory, handler)
    }

    pub fn with_handler(inventory: Inventory, handler: ClickHandler) -> Self {
        Self {
            decoder: ClickDecoder::for_inventory(&inventory),
            inventory: Mutex::new(inventory),
            handler,
        }
    }

    /// Locks the inventory. Do not hold the guard across a call to
    /// [`Container::handle_click`].
    pub fn inventory(&self) -> MutexGuard<'_, Inventory> {
        self.inventory.lock()
    }

    pub fn decoder(&self) -> &ClickDecoder {
        &self.decoder
    }

    pub fn handler(&self) -> &ClickHandler {
        &self.handler
    }

    /// Runs a click packet through the pipeline against this container and the
    /// clicking player's inventory.
    ///
    /// Returns the applied result, or `None` if the packet did not decode to an
    /// action or the click was cancelled or rejected.
    pub fn handle_click(
        &self,
        clicker: Clicker<'_>,
        packet: &ClickSlotPacket,
        hooks: &ClickHooks,
        settings: &InventorySettings,
        effects: &mut dyn ClickEffects,
    ) -> Option<ClickResult> {
        let mut inventory = self.inventory.lock();

        let action = self
            .decoder
            .process(clicker.entity, clicker.game_mode, packet)?;

        run_click(
            &self.handler,
            clicker,
            Some(&mut *inventory),
            action,
            hooks,
            settings,
            effects,
        )
    }

    /// Forgets the player's in-progress drags.
    pub fn close(&self, player: Entity) {
        self.decoder.clear_cache(player);
    }
}

/// Runs a click packet through the pipeline against the player's own
/// inventory, with no container open.
pub fn handle_player_click(
    decoder: &ClickDecoder,
    clicker: Clicker<'_>,
    packet: &ClickSlotPacket,
    hooks: &ClickHooks,
    settings: &InventorySettings,
    effects: &mut dyn ClickEffects,
) -> Option<ClickResult> {
    let action = decoder.process(clicker.entity, clicker.game_mode, packet)?;

    run_click(
        &ClickHandler::PLAYER,
        clicker,
        None,
        action,
        hooks,
        settings,
        effects,
    )
}

/// Runs a creative inventory action through the pipeline. Creative actions
/// always target the player's own inventory.
pub fn handle_creative_action(
    decoder: &ClickDecoder,
    clicker: Clicker<'_>,
    slot: i16,
    item: ItemStack,
    hooks: &ClickHooks,
    settings: &InventorySettings,
    effects: &mut dyn ClickEffects,
) -> Option<ClickResult> {
    let action = decoder.process_creative(clicker.entity, clicker.game_mode, slot, item)?;

    run_click(
        &ClickHandler::PLAYER,
        clicker,
        None,
        action,
        hooks,
        settings,
        effects,
    )
}

fn run_click(
    handler: &ClickHandler,
    clicker: Clicker<'_>,
    mut open_inventory: Option<&mut Inventory>,
    action: ClickAction,
    hooks: &ClickHooks,
    settings: &InventorySettings,
    effects: &mut dyn ClickEffects,
) -> Option<ClickResult> {
    let Clicker {
        entity,
        game_mode,
        inventory,
        cursor,
    } = clicker;

    let (action, result, replaced) = {
        let open = open_inventory.as_deref();
        let cx = ClickContext {
            player: entity,
            game_mode,
            window: InventoryWindow::new(inventory, open),
            cursor: &cursor.0,
        };

        let new_action = match hooks.run_pre_click(&cx, action.clone()) {
            HookFlow::Continue(new_action) => new_action,
            HookFlow::Cancel => {
                debug!(?entity, ?action, "click cancelled before processing");
                effects.resync(entity);
                return None;
            }
        };

        if new_action != action {
            if let Err(e) = validate_click_action(&new_action, &cx.window, game_mode) {
                warn!(?entity, action = ?new_action, "rejected click action: {e:#}");
                effects.resync(entity);
                return None;
            }
        }

        let processed = handler.process(&new_action, ResultBuilder::new(inventory, open, &cursor.0));

        let result = match hooks.run_click(&cx, &new_action, processed.clone()) {
            HookFlow::Continue(result) => result,
            HookFlow::Cancel => {
                debug!(?entity, action = ?new_action, "click cancelled after processing");
                effects.resync(entity);
                return None;
            }
        };

        // Hooks may rewrite a result freely, as long as it stays in bounds.
        let validated = validate_click_result(&result, inventory, open).and_then(|()| {
            if result == processed {
                validate_item_conservation(&result, inventory, open, &cursor.0, game_mode, settings)
            } else {
                Ok(())
            }
        });

        if let Err(e) = validated {
            warn!(?entity, action = ?new_action, "rejected click result: {e:#}");
            effects.resync(entity);
            return None;
        }

        let replaced = new_action != action || result != processed;
        (new_action, result, replaced)
    };

    result.apply(
        entity,
        inventory,
        open_inventory.as_deref_mut(),
        cursor,
        effects,
    );

    let cx = ClickContext {
        player: entity,
        game_mode,
        window: InventoryWindow::new(inventory, open_inventory.as_deref()),
        cursor: &cursor.0,
    };
    hooks.run_post_click(&cx, &action, &result);
    effects.applied(entity, &action, &result);

    // The client predicted the outcome of its own click, not ours.
    if replaced {
        effects.resync(entity);
    }

    Some(result)
}
