//! Error types for the SBIOT console
//!
//! Centralized error handling using snafu for ergonomic error definitions.
//!
//! The taxonomy mirrors what the console surfaces to the operator: validation
//! failures block the mutating action, network and timeout failures are
//! distinguishable (timeouts get their own message), and a reboot failure
//! after a successful save is its own case because the gateway state has
//! already diverged from the client's view at that point.

use snafu::Snafu;

/// Main error type for the console
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// IO error (config file operations)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },

    /// Request exceeded the client-side timeout
    #[snafu(display("Request timed out: {endpoint}"))]
    Timeout { endpoint: String },

    /// Transport-level failure (connect refused, TLS, DNS, ...)
    #[snafu(display("Request failed: {source}"))]
    Http { source: reqwest::Error },

    /// Gateway answered with a non-2xx status
    #[snafu(display("Gateway returned {status} for {endpoint}"))]
    Status { status: u16, endpoint: String },

    /// Telemetry/log channel failure
    #[snafu(display("Connection error: {message}"))]
    Connection { message: String },

    /// Save landed but the reboot request failed; gateway config and running
    /// state are now divergent until the next manual reboot.
    #[snafu(display("Configuration saved but reboot failed: {message}"))]
    RebootAfterSave { message: String },

    /// Another submission is already in flight
    #[snafu(display("Operation already in progress"))]
    Busy,
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        if source.is_timeout() {
            let endpoint = source
                .url()
                .map(|u| u.path().to_string())
                .unwrap_or_else(|| "<unknown>".to_string());
            Error::Timeout { endpoint }
        } else {
            Error::Http { source }
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
