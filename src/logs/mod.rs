//! Log Console
//!
//! Rolling buffer for the gateway's raw log feed plus outbound payload
//! encoding. The feed is the same websocket the gateway serves telemetry on;
//! the console may also write back to it, either as ASCII passthrough or as
//! raw bytes given in hex.

use crate::constants::MAX_LOG_LINES;
use crate::error::{Error, Result};
use crate::helpers::BoundedDeque;

/// Payload to send over the log feed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutboundPayload {
    /// Sent as a text frame, unmodified
    Ascii(String),
    /// Sent as a binary frame
    Binary(Vec<u8>),
}

/// Parse a hex payload like `0x01 0x02` or `01 02` into bytes.
///
/// Tokens are whitespace-separated and must be exactly two hex digits each,
/// with an optional case-insensitive `0x` prefix.
pub fn parse_hex_payload(input: &str) -> Result<Vec<u8>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::Invalid {
            message: "No hex data to send".to_string(),
        });
    }

    trimmed
        .split_whitespace()
        .map(|token| {
            let digits = token
                .strip_prefix("0x")
                .or_else(|| token.strip_prefix("0X"))
                .unwrap_or(token);
            if digits.len() != 2 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(Error::Invalid {
                    message: "Invalid HEX format. Use format: 0x01 0x02 or 01 02 (2 digits per byte)"
                        .to_string(),
                });
            }
            u8::from_str_radix(digits, 16).map_err(|_| Error::Invalid {
                message: format!("Invalid hex value: {token}"),
            })
        })
        .collect()
}

/// Rolling log buffer, capped at the newest [`MAX_LOG_LINES`] lines
#[derive(Debug)]
pub struct LogConsole {
    lines: BoundedDeque<String>,
    enabled: bool,
}

impl Default for LogConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl LogConsole {
    pub fn new() -> Self {
        Self {
            lines: BoundedDeque::new(MAX_LOG_LINES),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Disabling the feed also drops the buffered lines
    pub fn disable(&mut self) {
        self.enabled = false;
        self.lines.clear();
    }

    /// Append a received line; ignored while the feed is disabled
    pub fn push_line(&mut self, line: impl Into<String>) {
        if self.enabled {
            self.lines.push(line.into());
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines newest first, the order the console displays them
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter_rev().map(String::as_str)
    }
}
