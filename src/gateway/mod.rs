//! Gateway Access
//!
//! REST client for the gateway's configuration endpoints and the save
//! coordinator that sequences save-then-reboot cycles.

mod client;
mod sync;

pub use client::GatewayClient;
pub use sync::SaveCoordinator;
