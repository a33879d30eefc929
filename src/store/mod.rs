//! Configuration Stores
//!
//! Explicit, UI-free state holders for the device and card registries. Every
//! mutating operation validates first and returns a structured
//! [`ValidationError`] on rejection, leaving the store untouched; callers
//! decide how to present the failure.

mod cards;
mod devices;

pub use cards::{CardStore, TitleEdit};
pub use devices::{DeviceDraft, DeviceStore, NodeDraft};

use snafu::Snafu;

use crate::constants::{
    MAX_CARDS, MAX_DEVICES, MAX_NAME_LENGTH, MAX_NODE_TIMEOUT, MAX_POLLING_INTERVAL,
    MAX_SLAVE_ADDRESS, MAX_TOTAL_NODES, MIN_NODE_TIMEOUT, MIN_POLLING_INTERVAL,
    MIN_SLAVE_ADDRESS,
};

/// Rejection reasons for store mutations.
///
/// Messages match what the gateway's own console shows the operator.
#[derive(Clone, Debug, PartialEq, Eq, Snafu)]
pub enum ValidationError {
    #[snafu(display("Name is required"))]
    NameRequired,

    #[snafu(display("Name cannot exceed {MAX_NAME_LENGTH} characters"))]
    NameTooLong,

    #[snafu(display("A device with this name already exists"))]
    DuplicateDeviceName,

    #[snafu(display("A node with this name already exists in any device"))]
    DuplicateNodeName,

    #[snafu(display(
        "Modbus address must be between {MIN_SLAVE_ADDRESS} and {MAX_SLAVE_ADDRESS}"
    ))]
    SlaveAddressOutOfRange,

    #[snafu(display(
        "Polling interval must be between {MIN_POLLING_INTERVAL} and {MAX_POLLING_INTERVAL} ms"
    ))]
    PollingIntervalOutOfRange,

    #[snafu(display(
        "Timeout must be between {MIN_NODE_TIMEOUT} and {MAX_NODE_TIMEOUT} ms"
    ))]
    TimeoutOutOfRange,

    #[snafu(display("Select a data type"))]
    DataTypeRequired,

    #[snafu(display("Maximum number of devices ({MAX_DEVICES}) reached"))]
    DeviceLimitReached,

    #[snafu(display(
        "Maximum total number of nodes ({MAX_TOTAL_NODES}) reached across all devices"
    ))]
    NodeLimitReached,

    #[snafu(display("Maximum number of display cards ({MAX_CARDS}) reached"))]
    CardLimitReached,

    #[snafu(display("Title is required and must not exceed {MAX_NAME_LENGTH} characters"))]
    TitleInvalid,

    #[snafu(display("No such entry"))]
    UnknownIndex,
}

/// Shared name check for devices and nodes: non-empty, at most
/// [`MAX_NAME_LENGTH`] characters.
fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong);
    }
    Ok(())
}
