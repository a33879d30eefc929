//! Gateway Domain Constants
//!
//! Limits and timings dictated by the gateway firmware. The caps are hard
//! limits on the appliance side; the console enforces them client-side so a
//! rejected save never reaches the gateway.

/// Maximum number of configured Modbus devices
pub const MAX_DEVICES: usize = 128;

/// Maximum number of polled nodes summed across all devices
pub const MAX_TOTAL_NODES: usize = 300;

/// Maximum number of dashboard display cards
pub const MAX_CARDS: usize = 200;

/// Maximum length of device/node names and card titles (characters)
pub const MAX_NAME_LENGTH: usize = 20;

/// Modbus slave address range
pub const MIN_SLAVE_ADDRESS: u8 = 1;
pub const MAX_SLAVE_ADDRESS: u8 = 247;

/// Polling interval range (milliseconds)
pub const MIN_POLLING_INTERVAL: u16 = 10;
pub const MAX_POLLING_INTERVAL: u16 = 65535;

/// Node read timeout range (milliseconds)
pub const MIN_NODE_TIMEOUT: u16 = 10;
pub const MAX_NODE_TIMEOUT: u16 = 65535;

/// Client-side timeout applied to every gateway API request
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Fixed delay before a telemetry channel reconnect attempt
pub const WS_RECONNECT_DELAY_MS: u64 = 5000;

/// Default websocket port when the system config carries none
pub const DEFAULT_WS_PORT: u16 = 9000;

/// Path of the telemetry websocket endpoint on the gateway
pub const WS_PATH: &str = "/websocket";

/// How long the transient save-success notice stays up
pub const SAVE_NOTICE_MS: u64 = 3000;

/// Delay before resyncing with the gateway after a save-triggered reboot
pub const REBOOT_RESYNC_DELAY_MS: u64 = 5000;

/// Log console line buffer capacity
pub const MAX_LOG_LINES: usize = 1000;
