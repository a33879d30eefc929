//! DisplayCard - Dashboard Card Configuration
//!
//! A card snapshots one temperature node and one humidity node from a device.
//! The snapshots are independent copies taken at creation time: editing the
//! underlying node afterwards does not touch existing cards. Only the `v`
//! slot and `lastUpdate` change after creation, driven by telemetry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::device::{DataType, FunctionCode, Node};

/// Copy of a node's metadata frozen into a card
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Node name, used to match telemetry updates
    #[serde(rename = "n")]
    pub name: String,
    /// Register address at snapshot time
    #[serde(rename = "a")]
    pub address: u16,
    /// Function code at snapshot time
    #[serde(rename = "f")]
    pub function: FunctionCode,
    /// Data type at snapshot time
    #[serde(rename = "dt")]
    pub data_type: DataType,
    /// Read timeout at snapshot time
    #[serde(rename = "t")]
    pub timeout: u16,
    /// Live value, fed by telemetry; stripped on save
    #[serde(rename = "v", default, skip_serializing)]
    pub value: Option<f64>,
}

impl From<&Node> for NodeSnapshot {
    fn from(node: &Node) -> Self {
        Self {
            name: node.name.clone(),
            address: node.address,
            function: node.function,
            data_type: node.data_type,
            timeout: node.timeout,
            value: node.value,
        }
    }
}

/// A dashboard tile pairing a temperature and a humidity node
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayCard {
    /// Card title
    #[serde(rename = "t")]
    pub title: String,
    /// Source device name, denormalized at creation time
    #[serde(rename = "dn")]
    pub device_name: String,
    /// Temperature node snapshot
    #[serde(rename = "tn")]
    pub temperature: NodeSnapshot,
    /// Humidity node snapshot
    #[serde(rename = "hn")]
    pub humidity: NodeSnapshot,
    /// When a telemetry update last touched this card; never persisted
    #[serde(skip)]
    pub last_update: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> DisplayCard {
        let snapshot = NodeSnapshot {
            name: "TempSensor1".to_string(),
            address: 100,
            function: FunctionCode::ReadHoldingRegisters,
            data_type: DataType::FloatAbcd,
            timeout: 500,
            value: Some(23.5),
        };
        DisplayCard {
            title: "Greenhouse".to_string(),
            device_name: "D1".to_string(),
            temperature: snapshot.clone(),
            humidity: NodeSnapshot {
                name: "HumSensor1".to_string(),
                ..snapshot
            },
            last_update: Some(Utc::now()),
        }
    }

    #[test]
    fn test_save_strips_runtime_fields() {
        let json = serde_json::to_value(card()).expect("serialize");
        assert_eq!(json["t"], "Greenhouse");
        assert_eq!(json["dn"], "D1");
        assert_eq!(json["tn"]["n"], "TempSensor1");
        assert!(json["tn"].get("v").is_none());
        assert!(json.get("lastUpdate").is_none());
        assert!(json.get("last_update").is_none());
    }

    #[test]
    fn test_snapshot_copies_not_references() {
        let mut node = Node {
            name: "T1".to_string(),
            address: 100,
            function: FunctionCode::ReadHoldingRegisters,
            data_type: DataType::FloatAbcd,
            timeout: 500,
            value: Some(1.0),
        };
        let snapshot = NodeSnapshot::from(&node);

        node.address = 999;
        node.value = Some(42.0);

        assert_eq!(snapshot.address, 100);
        assert_eq!(snapshot.value, Some(1.0));
    }
}
