//! Network Configuration
//!
//! Wire model for `/api/network/get` and `/api/network/set`. The same shape
//! is read and written; validation runs client-side before a save is allowed
//! to reach the gateway.

use serde::{Deserialize, Serialize};

use crate::domain::validate::{FieldError, is_valid_ipv4, is_valid_subnet_mask};

/// Gateway network settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Static IP address
    pub ip: String,
    /// Subnet mask
    pub sm: String,
    /// Default gateway
    pub gw: String,
    /// Primary DNS server
    pub d1: String,
    /// Secondary DNS server
    pub d2: String,
    /// DHCP enabled; when set, the static fields are ignored by the gateway
    pub dh: bool,
}

impl NetworkConfig {
    /// Validate every field and return all failures.
    ///
    /// Address fields are still validated with DHCP enabled; the gateway
    /// keeps the static configuration around for when DHCP is switched off.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !is_valid_ipv4(&self.ip) {
            errors.push(FieldError::new(
                "ip",
                "Please enter a valid IP address (e.g., 192.168.1.100)",
            ));
        }
        if !is_valid_subnet_mask(&self.sm) {
            errors.push(FieldError::new(
                "sm",
                "Please enter a valid subnet mask (e.g., 255.255.255.0)",
            ));
        }
        if !is_valid_ipv4(&self.gw) {
            errors.push(FieldError::new("gw", "Please enter a valid gateway IP address"));
        }
        if !is_valid_ipv4(&self.d1) {
            errors.push(FieldError::new(
                "d1",
                "Please enter a valid primary DNS IP address",
            ));
        }
        if !is_valid_ipv4(&self.d2) {
            errors.push(FieldError::new(
                "d2",
                "Please enter a valid secondary DNS IP address",
            ));
        }
        errors
    }
}
