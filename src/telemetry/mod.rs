//! Telemetry Feed
//!
//! Websocket channel management, wire message parsing and the card
//! reconciliation step that applies pushed values to the dashboard.

mod channel;
mod message;
mod reconciler;

pub use channel::{
    ChannelHandle, ChannelState, ChannelSupervisor, TelemetryEvent, derive_ws_url, spawn_channel,
};
pub use message::{TelemetryUpdate, parse_update};
pub use reconciler::apply_update;
