//! Field Validation Primitives
//!
//! Small pure checks shared by the network and system form validators. Each
//! form validator returns the full list of failures so the caller can render
//! them per field instead of stopping at the first one.

use std::net::Ipv4Addr;

/// A single field-level validation failure
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    /// Wire name of the offending field (e.g. `ip`, `sm`, `password`)
    pub field: &'static str,
    /// Operator-facing message
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a dotted-quad IPv4 address
pub fn is_valid_ipv4(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

/// Check a subnet mask: a valid IPv4 address whose binary form is all ones
/// followed by all zeros.
pub fn is_valid_subnet_mask(s: &str) -> bool {
    let Ok(addr) = s.parse::<Ipv4Addr>() else {
        return false;
    };
    let bits = u32::from(addr);
    bits.count_ones() == bits.leading_ones()
}
