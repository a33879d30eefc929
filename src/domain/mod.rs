//! Gateway Configuration Domain Model
//!
//! Wire-shaped data types for everything the gateway's REST API exchanges,
//! plus the pure validation helpers that guard them.

pub mod card;
pub mod device;
pub mod network;
pub mod system;
pub mod validate;

pub use card::{DisplayCard, NodeSnapshot};
pub use device::{DataType, Device, FunctionCode, Node};
pub use network::NetworkConfig;
pub use system::SystemConfig;
pub use validate::FieldError;
