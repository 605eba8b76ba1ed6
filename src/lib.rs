#![doc = include_str!("../README.md")]
#![deny(
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
    rustdoc::missing_crate_level_docs,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls,
    rustdoc::invalid_html_tags
)]
#![warn(
    trivial_casts,
    trivial_numeric_casts,
    unused_lifetimes,
    unused_import_braces,
    unreachable_pub,
    clippy::dbg_macro
)]

use bevy_app::{PluginGroup, PluginGroupBuilder};

#[cfg(any(test, feature = "testing"))]
pub mod testing;


#[cfg(feature = "log")]
pub use bevy_log as log;
pub use strongbox_inventory as inventory;
pub use strongbox_item as item;
pub use strongbox_view as view;

/// Contains the most frequently used items in Strongbox projects.
///
/// This is usually glob imported like so:
///
/// ```
/// use strongbox::prelude::*; // Glob import.
///
/// let mut app = App::new();
/// app.add_plugins(DefaultPlugins.build().disable::<strongbox::log::LogPlugin>());
/// // ...
/// ```
pub mod prelude {
    pub use bevy_app::prelude::*;
    pub use bevy_ecs; // Needed for bevy_ecs macros to function correctly.
    pub use bevy_ecs::prelude::*;
    pub use strongbox_inventory::click::{ClickContext, ClickMode, ClickSlotPacket, HookFlow};
    pub use strongbox_inventory::{
        ClickAction, ClickAppliedEvent, ClickHooks, ClickResult, ClickSlotEvent,
        CloseContainerEvent, Container, CreativeInventoryActionEvent, CursorItem,
        DropItemStackEvent, EquipmentChangeEvent, GameMode, HeldItem, Inventory, InventoryClient,
        InventoryKind, InventoryResyncEvent, InventorySettings, InventoryWindow, OpenContainer,
        PlayerInventory,
    };
    pub use strongbox_item::{EquipmentSlot, ItemKind, ItemStack};
    pub use strongbox_view::SlotView;

    pub use super::DefaultPlugins;
}

/// This plugin group will add all the default plugins for a Strongbox
/// application.
///
/// [`DefaultPlugins`] obeys Cargo feature flags. Users may exert control over
/// this plugin group by disabling `default-features` in their `Cargo.toml` and
/// enabling only those features that they wish to use.
pub struct DefaultPlugins;

impl PluginGroup for DefaultPlugins {
    fn build(self) -> PluginGroupBuilder {
        #[allow(unused_mut)]
        let mut group = PluginGroupBuilder::start::<Self>().add(inventory::InventoryPlugin);

        #[cfg(feature = "log")]
        {
            group = group.add(bevy_log::LogPlugin::default());
        }

        group
    }
}
