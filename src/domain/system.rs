//! System Configuration
//!
//! Wire model for `/api/system/get` and `/api/system/set`. The password is
//! write-only: the gateway never returns it, and the console includes it in
//! the save payload only when the operator actually typed a new one.

use serde::{Deserialize, Serialize};

use crate::domain::validate::FieldError;

/// Timezone id → display label, ids 1-26 as defined by the gateway firmware.
pub const TIMEZONE_OPTIONS: [(u8, &str); 26] = [
    (1, "UTC-12:00 (Baker Island)"),
    (2, "UTC-11:00 (American Samoa)"),
    (3, "UTC-10:00 (Hawaii)"),
    (4, "UTC-09:00 (Alaska)"),
    (5, "UTC-08:00 (Pacific Time)"),
    (6, "UTC-07:00 (Mountain Time)"),
    (7, "UTC-06:00 (Central Time)"),
    (8, "UTC-05:00 (Eastern Time)"),
    (9, "UTC-04:00 (Atlantic Time)"),
    (10, "UTC-03:00 (Brasilia)"),
    (11, "UTC-02:00 (South Georgia)"),
    (12, "UTC-01:00 (Azores)"),
    (13, "UTC+00:00 (GMT)"),
    (14, "UTC+01:00 (Central European Time)"),
    (15, "UTC+02:00 (Eastern European Time)"),
    (16, "UTC+03:00 (Moscow)"),
    (17, "UTC+04:00 (Gulf Standard Time)"),
    (18, "UTC+05:00 (Pakistan)"),
    (19, "UTC+05:30 (India)"),
    (20, "UTC+06:00 (Bangladesh)"),
    (21, "UTC+07:00 (Indochina)"),
    (22, "UTC+08:00 (China)"),
    (23, "UTC+09:00 (Japan)"),
    (24, "UTC+10:00 (Eastern Australia)"),
    (25, "UTC+11:00 (Solomon Islands)"),
    (26, "UTC+12:00 (New Zealand)"),
];

/// Look up the display label for a timezone id
pub fn timezone_label(id: u8) -> Option<&'static str> {
    TIMEZONE_OPTIONS
        .iter()
        .find(|(tz, _)| *tz == id)
        .map(|(_, label)| *label)
}

/// Gateway system settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Login username
    pub username: String,
    /// New password; omitted from the payload when unchanged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// NTP servers, tried in order
    pub server1: String,
    pub server2: String,
    pub server3: String,
    /// Timezone id (1-26, see [`TIMEZONE_OPTIONS`])
    pub timezone: u8,
    /// NTP synchronization enabled
    pub enabled: bool,
    /// HTTP server port
    pub hport: u16,
    /// Websocket server port
    pub wport: u16,
    /// Log output selector; interpreted by the gateway, opaque here
    #[serde(rename = "logMethod")]
    pub log_method: u8,
    /// Current gateway time, read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Check password strength. An empty or absent password means "keep the
/// current one" and passes.
pub fn validate_password(password: &str) -> Vec<FieldError> {
    if password.is_empty() {
        return Vec::new();
    }

    let mut errors = Vec::new();
    if password.chars().count() < 8 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters long",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push(FieldError::new(
            "password",
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push(FieldError::new(
            "password",
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push(FieldError::new(
            "password",
            "Password must contain at least one number",
        ));
    }
    if !password.chars().any(|c| "!@#$%^&*(),.?\":{}|<>".contains(c)) {
        errors.push(FieldError::new(
            "password",
            "Password must contain at least one special character",
        ));
    }
    errors
}

impl SystemConfig {
    /// Validate the config before save, returning all failures
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push(FieldError::new("username", "Username is required"));
        }
        if timezone_label(self.timezone).is_none() {
            errors.push(FieldError::new("timezone", "Unknown timezone"));
        }
        if let Some(password) = &self.password {
            errors.extend(validate_password(password));
        }
        errors
    }
}
