//! Decoding, processing and applying inventory clicks.

mod action;
mod decoder;
mod handler;
mod pipeline;
mod result;

pub use action::{ClickAction, ClickMode, ClickSlotPacket};
pub use decoder::ClickDecoder;
pub use handler::{ClickHandler, SlotSuggestor};
pub use pipeline::{
    handle_creative_action, handle_player_click, ClickContext, ClickEffects, ClickHooks, Clicker,
    Container, HookFlow,
};
pub use result::{ClickResult, ResultBuilder, SideEffects};
