//! SBIOT Console Library
//!
//! Administrative client for SBIOT Modbus-to-network gateway appliances:
//! device and node configuration, dashboard cards with live telemetry,
//! network and system settings, and the raw log feed.

pub mod app;
pub mod connection;
pub mod constants;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod helpers;
pub mod logs;
pub mod store;
pub mod telemetry;
pub mod utils;
