//! Device - Modbus Device and Node Configuration
//!
//! Wire-shaped models for the gateway's `/api/devices` endpoints. Field names
//! follow the gateway's compact JSON keys (`n`, `da`, `pi`, ...); the structs
//! serialize to exactly what `/api/devices/set` expects, which means
//! runtime-only fields (a node's last polled value) are never written back.

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Modbus read operation selector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum FunctionCode {
    ReadCoils = 1,
    ReadDiscreteInputs = 2,
    ReadHoldingRegisters = 3,
    ReadInputRegisters = 4,
}

impl FunctionCode {
    /// Coil and discrete-input reads only ever yield single bits, so the
    /// gateway stores them as Boolean no matter what data type was picked.
    pub fn forces_boolean(self) -> bool {
        matches!(self, FunctionCode::ReadCoils | FunctionCode::ReadDiscreteInputs)
    }

    /// Display label as shown by the gateway's own console
    pub fn label(self) -> &'static str {
        match self {
            FunctionCode::ReadCoils => "01 - Read Coils",
            FunctionCode::ReadDiscreteInputs => "02 - Read Discrete Inputs",
            FunctionCode::ReadHoldingRegisters => "03 - Read Holding Registers",
            FunctionCode::ReadInputRegisters => "04 - Read Input Registers",
        }
    }
}

/// Register interpretation for a polled node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum DataType {
    Boolean = 1,
    Int8 = 2,
    UInt8 = 3,
    Int16 = 4,
    UInt16 = 5,
    Int32Abcd = 6,
    Int32Cdab = 7,
    UInt32Abcd = 8,
    UInt32Cdab = 9,
    FloatAbcd = 10,
    FloatCdab = 11,
    Double = 12,
}

impl DataType {
    /// Display label as shown by the gateway's own console
    pub fn label(self) -> &'static str {
        match self {
            DataType::Boolean => "Boolean",
            DataType::Int8 => "Int8",
            DataType::UInt8 => "UInt8",
            DataType::Int16 => "Int16",
            DataType::UInt16 => "UInt16",
            DataType::Int32Abcd => "Int32 (ABCD)",
            DataType::Int32Cdab => "Int32 (CDAB)",
            DataType::UInt32Abcd => "UInt32 (ABCD)",
            DataType::UInt32Cdab => "UInt32 (CDAB)",
            DataType::FloatAbcd => "Float (ABCD)",
            DataType::FloatCdab => "Float (CDAB)",
            DataType::Double => "Double",
        }
    }
}

/// A single polled Modbus register mapped to a named value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node name, unique across all devices (case-insensitive)
    #[serde(rename = "n")]
    pub name: String,
    /// Register address
    #[serde(rename = "a")]
    pub address: u16,
    /// Modbus function code
    #[serde(rename = "f")]
    pub function: FunctionCode,
    /// Data type of the register contents
    #[serde(rename = "dt")]
    pub data_type: DataType,
    /// Read timeout in milliseconds
    #[serde(rename = "t")]
    pub timeout: u16,
    /// Last polled value. Populated by the gateway on load and by telemetry
    /// at runtime; never serialized back on save.
    #[serde(default, skip_serializing)]
    pub value: Option<f64>,
}

/// A configured Modbus slave endpoint polled by the gateway
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Device name, unique among devices (case-insensitive)
    #[serde(rename = "n")]
    pub name: String,
    /// Modbus slave address (1-247)
    #[serde(rename = "da")]
    pub address: u8,
    /// Polling interval in milliseconds
    #[serde(rename = "pi")]
    pub polling_interval: u16,
    /// Merge-collection flag; interpreted by the gateway, opaque here
    #[serde(rename = "g")]
    pub merge_collection: bool,
    /// Polled register nodes, owned by this device
    #[serde(rename = "ns", default)]
    pub nodes: Vec<Node>,
}
