//! Telemetry Wire Messages
//!
//! The gateway pushes `{"type":"update","n":<node name>,"v":<value>}` over
//! the websocket, interleaved with raw log lines when logging is switched
//! on. A frame that is not an update is not an error; the channel forwards
//! it to the log console instead.

use serde::Deserialize;

/// A single node value update from the telemetry channel
#[derive(Clone, Debug, PartialEq)]
pub struct TelemetryUpdate {
    /// Node name the value belongs to
    pub node: String,
    /// New value
    pub value: f64,
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    v: Option<f64>,
}

/// Parse one raw frame into an update.
///
/// Returns `None` for anything that is not a well-formed update: non-JSON
/// frames (log lines), other message types, and update frames with missing
/// fields (those are logged at warn).
pub fn parse_update(raw: &str) -> Option<TelemetryUpdate> {
    let message: WireMessage = serde_json::from_str(raw).ok()?;

    if message.kind != "update" {
        tracing::debug!("Ignoring telemetry frame of type {:?}", message.kind);
        return None;
    }

    match (message.n, message.v) {
        (Some(node), Some(value)) => Some(TelemetryUpdate { node, value }),
        _ => {
            tracing::warn!("Dropping update frame with missing fields");
            None
        }
    }
}
