use bevy_app::prelude::*;
use bevy_ecs::prelude::*;
use strongbox_inventory::click::{ClickMode, ClickSlotPacket};
use strongbox_inventory::{
    ClickSlotEvent, CloseContainerEvent, CreativeInventoryActionEvent, GameMode, InventoryClient,
};
use strongbox_item::ItemStack;

use crate::DefaultPlugins;

pub struct ScenarioSingleClient {
    /// The new bevy application.
    pub app: App,
    /// Entity handle for the single client.
    pub client: Entity,
}

impl ScenarioSingleClient {
    /// Sets up Strongbox with a single client in survival mode. The client's
    /// inventory components are in place when this returns.
    ///
    /// Reduces boilerplate in unit tests.
    pub fn new() -> Self {
        let mut app = App::new();

        #[allow(unused_mut)]
        let mut plugins = DefaultPlugins.build();
        #[cfg(feature = "log")]
        {
            plugins = plugins.disable::<bevy_log::LogPlugin>();
        }
        app.add_plugins(plugins);

        let client = app
            .world_mut()
            .spawn((InventoryClient, GameMode::Survival))
            .id();

        app.update(); // Initialize the client's inventory.

        ScenarioSingleClient { app, client }
    }

    /// Sends a click slot packet as if the client sent it. It is handled on
    /// the next update.
    pub fn click(&mut self, mode: ClickMode, slot_idx: i16, button: i8) {
        let client = self.client;
        self.app.world_mut().send_event(ClickSlotEvent {
            client,
            packet: ClickSlotPacket::new(mode, slot_idx, button),
        });
    }

    /// Sends a creative inventory action as if the client sent it.
    pub fn creative_action(&mut self, slot: i16, clicked_item: ItemStack) {
        let client = self.client;
        self.app
            .world_mut()
            .send_event(CreativeInventoryActionEvent {
                client,
                slot,
                clicked_item,
            });
    }

    pub fn close_container(&mut self) {
        let client = self.client;
        self.app
            .world_mut()
            .send_event(CloseContainerEvent { client });
    }

    /// Sends a click and runs one update.
    pub fn click_and_update(&mut self, mode: ClickMode, slot_idx: i16, button: i8) {
        self.click(mode, slot_idx, button);
        self.app.update();
    }

    /// Returns the events of type `E` sent during the last update.
    pub fn collect_events<E: Event + Clone>(&self) -> Vec<E> {
        self.app
            .world()
            .resource::<Events<E>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }
}

impl Default for ScenarioSingleClient {
    fn default() -> Self {
        Self::new()
    }
}
