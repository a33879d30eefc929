//! Device Store
//!
//! Single source of truth for the configured device/node registry on the
//! Devices screen. Mutations validate against the gateway's caps and
//! uniqueness rules before touching state; a rejected operation leaves the
//! registry exactly as it was.

use crate::constants::{
    MAX_DEVICES, MAX_POLLING_INTERVAL, MAX_SLAVE_ADDRESS, MAX_TOTAL_NODES, MIN_NODE_TIMEOUT,
    MIN_POLLING_INTERVAL, MIN_SLAVE_ADDRESS,
};
use crate::domain::{DataType, Device, FunctionCode, Node};
use crate::store::{ValidationError, validate_name};

/// Form input for creating or editing a device
#[derive(Clone, Debug)]
pub struct DeviceDraft {
    pub name: String,
    pub address: u8,
    pub polling_interval: u16,
    pub merge_collection: bool,
}

/// Form input for creating or editing a node
#[derive(Clone, Debug)]
pub struct NodeDraft {
    pub name: String,
    pub address: u16,
    pub function: FunctionCode,
    /// Operator's data type selection; ignored (forced to Boolean) for
    /// coil and discrete-input reads.
    pub data_type: Option<DataType>,
    pub timeout: u16,
}

impl NodeDraft {
    /// Resolve the effective data type: function codes 1 and 2 force
    /// Boolean regardless of the selection, everything else requires one.
    fn resolve_data_type(&self) -> Result<DataType, ValidationError> {
        if self.function.forces_boolean() {
            return Ok(DataType::Boolean);
        }
        self.data_type.ok_or(ValidationError::DataTypeRequired)
    }
}

/// Registry of configured Modbus devices and their nodes
#[derive(Clone, Debug, Default)]
pub struct DeviceStore {
    devices: Vec<Device>,
    selected: Option<usize>,
}

impl DeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a device list loaded from the gateway. The first device is
    /// selected when the list is non-empty.
    pub fn from_devices(devices: Vec<Device>) -> Self {
        let selected = if devices.is_empty() { None } else { Some(0) };
        Self { devices, selected }
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_device(&self) -> Option<&Device> {
        self.selected.and_then(|i| self.devices.get(i))
    }

    /// Total node count summed across all devices
    pub fn total_nodes(&self) -> usize {
        self.devices.iter().map(|d| d.nodes.len()).sum()
    }

    pub fn select(&mut self, index: usize) -> Result<(), ValidationError> {
        if index >= self.devices.len() {
            return Err(ValidationError::UnknownIndex);
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Add a device at the end of the registry, returning its index
    pub fn add_device(&mut self, draft: &DeviceDraft) -> Result<usize, ValidationError> {
        if self.devices.len() >= MAX_DEVICES {
            return Err(ValidationError::DeviceLimitReached);
        }
        self.validate_device_draft(draft, None)?;

        self.devices.push(Device {
            name: draft.name.clone(),
            address: draft.address,
            polling_interval: draft.polling_interval,
            merge_collection: draft.merge_collection,
            nodes: Vec::new(),
        });
        Ok(self.devices.len() - 1)
    }

    /// Replace a device's own fields; its nodes are untouched
    pub fn update_device(
        &mut self,
        index: usize,
        draft: &DeviceDraft,
    ) -> Result<(), ValidationError> {
        if index >= self.devices.len() {
            return Err(ValidationError::UnknownIndex);
        }
        self.validate_device_draft(draft, Some(index))?;

        let device = &mut self.devices[index];
        device.name = draft.name.clone();
        device.address = draft.address;
        device.polling_interval = draft.polling_interval;
        device.merge_collection = draft.merge_collection;
        Ok(())
    }

    /// Remove a device and all of its nodes.
    ///
    /// Clears the selection when the deleted device was selected; a
    /// selection past the deleted index shifts down so it keeps pointing at
    /// the same device.
    pub fn delete_device(&mut self, index: usize) -> Result<Device, ValidationError> {
        if index >= self.devices.len() {
            return Err(ValidationError::UnknownIndex);
        }
        let removed = self.devices.remove(index);
        self.selected = match self.selected {
            Some(sel) if sel == index => None,
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };
        Ok(removed)
    }

    /// Add a node to a device, returning the node's index within it
    pub fn add_node(
        &mut self,
        device_index: usize,
        draft: &NodeDraft,
    ) -> Result<usize, ValidationError> {
        if device_index >= self.devices.len() {
            return Err(ValidationError::UnknownIndex);
        }
        if self.total_nodes() >= MAX_TOTAL_NODES {
            return Err(ValidationError::NodeLimitReached);
        }
        self.validate_node_draft(draft, None)?;
        let data_type = draft.resolve_data_type()?;

        let nodes = &mut self.devices[device_index].nodes;
        nodes.push(Node {
            name: draft.name.clone(),
            address: draft.address,
            function: draft.function,
            data_type,
            timeout: draft.timeout,
            value: None,
        });
        Ok(nodes.len() - 1)
    }

    /// Replace a node's configuration, keeping its last polled value
    pub fn update_node(
        &mut self,
        device_index: usize,
        node_index: usize,
        draft: &NodeDraft,
    ) -> Result<(), ValidationError> {
        if self
            .devices
            .get(device_index)
            .is_none_or(|d| node_index >= d.nodes.len())
        {
            return Err(ValidationError::UnknownIndex);
        }
        self.validate_node_draft(draft, Some((device_index, node_index)))?;
        let data_type = draft.resolve_data_type()?;

        let node = &mut self.devices[device_index].nodes[node_index];
        node.name = draft.name.clone();
        node.address = draft.address;
        node.function = draft.function;
        node.data_type = data_type;
        node.timeout = draft.timeout;
        Ok(())
    }

    pub fn delete_node(
        &mut self,
        device_index: usize,
        node_index: usize,
    ) -> Result<Node, ValidationError> {
        if self
            .devices
            .get(device_index)
            .is_none_or(|d| node_index >= d.nodes.len())
        {
            return Err(ValidationError::UnknownIndex);
        }
        Ok(self.devices[device_index].nodes.remove(node_index))
    }

    fn validate_device_draft(
        &self,
        draft: &DeviceDraft,
        exclude: Option<usize>,
    ) -> Result<(), ValidationError> {
        validate_name(&draft.name)?;
        if !(MIN_SLAVE_ADDRESS..=MAX_SLAVE_ADDRESS).contains(&draft.address) {
            return Err(ValidationError::SlaveAddressOutOfRange);
        }
        if !(MIN_POLLING_INTERVAL..=MAX_POLLING_INTERVAL).contains(&draft.polling_interval) {
            return Err(ValidationError::PollingIntervalOutOfRange);
        }
        if self.device_name_taken(&draft.name, exclude) {
            return Err(ValidationError::DuplicateDeviceName);
        }
        Ok(())
    }

    fn validate_node_draft(
        &self,
        draft: &NodeDraft,
        exclude: Option<(usize, usize)>,
    ) -> Result<(), ValidationError> {
        validate_name(&draft.name)?;
        if draft.timeout < MIN_NODE_TIMEOUT {
            return Err(ValidationError::TimeoutOutOfRange);
        }
        if self.node_name_taken(&draft.name, exclude) {
            return Err(ValidationError::DuplicateNodeName);
        }
        Ok(())
    }

    fn device_name_taken(&self, name: &str, exclude: Option<usize>) -> bool {
        let folded = name.to_lowercase();
        self.devices
            .iter()
            .enumerate()
            .filter(|(i, _)| exclude != Some(*i))
            .any(|(_, d)| d.name.to_lowercase() == folded)
    }

    /// Node names are unique across ALL devices, not just within one
    fn node_name_taken(&self, name: &str, exclude: Option<(usize, usize)>) -> bool {
        let folded = name.to_lowercase();
        self.devices.iter().enumerate().any(|(di, device)| {
            device
                .nodes
                .iter()
                .enumerate()
                .filter(|(ni, _)| exclude != Some((di, *ni)))
                .any(|(_, node)| node.name.to_lowercase() == folded)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device_draft(name: &str, address: u8, interval: u16) -> DeviceDraft {
        DeviceDraft {
            name: name.to_string(),
            address,
            polling_interval: interval,
            merge_collection: false,
        }
    }

    fn node_draft(name: &str) -> NodeDraft {
        NodeDraft {
            name: name.to_string(),
            address: 100,
            function: FunctionCode::ReadHoldingRegisters,
            data_type: Some(DataType::FloatAbcd),
            timeout: 500,
        }
    }

    #[test]
    fn test_add_device() {
        let mut store = DeviceStore::new();
        let index = store.add_device(&device_draft("D1", 5, 1000)).expect("add");
        assert_eq!(index, 0);
        assert_eq!(store.devices()[0].name, "D1");
        assert!(store.devices()[0].nodes.is_empty());
    }

    #[test]
    fn test_device_name_unique_case_insensitive() {
        let mut store = DeviceStore::new();
        store.add_device(&device_draft("D1", 5, 1000)).expect("add");

        let err = store.add_device(&device_draft("d1", 6, 2000)).expect_err("dup");
        assert_eq!(err, ValidationError::DuplicateDeviceName);
        assert_eq!(store.devices().len(), 1);
    }

    #[test]
    fn test_update_device_excludes_itself_from_uniqueness() {
        let mut store = DeviceStore::new();
        store.add_device(&device_draft("D1", 5, 1000)).expect("add");
        store.add_device(&device_draft("D2", 6, 1000)).expect("add");

        // Renaming D1 to its own name (different case) is fine
        store
            .update_device(0, &device_draft("d1", 5, 2000))
            .expect("rename to self");
        // Renaming D2 to D1's name is not
        let err = store
            .update_device(1, &device_draft("D1", 6, 1000))
            .expect_err("collision");
        assert_eq!(err, ValidationError::DuplicateDeviceName);
    }

    #[test]
    fn test_device_field_ranges() {
        let mut store = DeviceStore::new();
        assert_eq!(
            store.add_device(&device_draft("D1", 0, 1000)),
            Err(ValidationError::SlaveAddressOutOfRange)
        );
        assert_eq!(
            store.add_device(&device_draft("D1", 248, 1000)),
            Err(ValidationError::SlaveAddressOutOfRange)
        );
        assert_eq!(
            store.add_device(&device_draft("D1", 5, 9)),
            Err(ValidationError::PollingIntervalOutOfRange)
        );
        assert!(store.devices().is_empty());
    }

    #[test]
    fn test_name_length_limit() {
        let mut store = DeviceStore::new();
        let long = "X".repeat(21);
        assert_eq!(
            store.add_device(&device_draft(&long, 5, 1000)),
            Err(ValidationError::NameTooLong)
        );
        assert_eq!(
            store.add_device(&device_draft("", 5, 1000)),
            Err(ValidationError::NameRequired)
        );
    }

    #[test]
    fn test_device_cap() {
        let mut store = DeviceStore::new();
        for i in 0..MAX_DEVICES {
            store
                .add_device(&device_draft(&format!("D{i}"), 5, 1000))
                .expect("add");
        }
        let err = store
            .add_device(&device_draft("Overflow", 5, 1000))
            .expect_err("cap");
        assert_eq!(err, ValidationError::DeviceLimitReached);
        assert_eq!(store.devices().len(), MAX_DEVICES);
    }

    #[test]
    fn test_node_name_unique_across_devices() {
        let mut store = DeviceStore::new();
        store.add_device(&device_draft("A", 1, 1000)).expect("add");
        store.add_device(&device_draft("B", 2, 1000)).expect("add");
        store.add_node(0, &node_draft("X")).expect("add node");

        // Same name on a different device is still a collision
        let err = store.add_node(1, &node_draft("x")).expect_err("dup");
        assert_eq!(err, ValidationError::DuplicateNodeName);
        assert_eq!(store.total_nodes(), 1);
    }

    #[test]
    fn test_function_code_forces_boolean_on_add() {
        let mut store = DeviceStore::new();
        store.add_device(&device_draft("A", 1, 1000)).expect("add");

        let draft = NodeDraft {
            function: FunctionCode::ReadCoils,
            data_type: Some(DataType::FloatAbcd),
            ..node_draft("Coil1")
        };
        store.add_node(0, &draft).expect("add node");
        assert_eq!(store.devices()[0].nodes[0].data_type, DataType::Boolean);
    }

    #[test]
    fn test_function_code_forces_boolean_on_edit() {
        let mut store = DeviceStore::new();
        store.add_device(&device_draft("A", 1, 1000)).expect("add");
        store.add_node(0, &node_draft("N1")).expect("add node");
        assert_eq!(store.devices()[0].nodes[0].data_type, DataType::FloatAbcd);

        let draft = NodeDraft {
            function: FunctionCode::ReadDiscreteInputs,
            data_type: Some(DataType::Double),
            ..node_draft("N1")
        };
        store.update_node(0, 0, &draft).expect("edit");
        assert_eq!(store.devices()[0].nodes[0].data_type, DataType::Boolean);
    }

    #[test]
    fn test_data_type_required_for_register_reads() {
        let mut store = DeviceStore::new();
        store.add_device(&device_draft("A", 1, 1000)).expect("add");

        let draft = NodeDraft {
            data_type: None,
            ..node_draft("N1")
        };
        assert_eq!(
            store.add_node(0, &draft),
            Err(ValidationError::DataTypeRequired)
        );
    }

    #[test]
    fn test_node_cap_is_global() {
        let mut store = DeviceStore::new();
        store.add_device(&device_draft("A", 1, 1000)).expect("add");
        store.add_device(&device_draft("B", 2, 1000)).expect("add");
        for i in 0..MAX_TOTAL_NODES {
            store
                .add_node(i % 2, &node_draft(&format!("N{i}")))
                .expect("add node");
        }
        let err = store.add_node(0, &node_draft("Overflow")).expect_err("cap");
        assert_eq!(err, ValidationError::NodeLimitReached);
        assert_eq!(store.total_nodes(), MAX_TOTAL_NODES);
    }

    #[test]
    fn test_delete_device_cascades_and_clears_selection() {
        let mut store = DeviceStore::new();
        store.add_device(&device_draft("D1", 5, 1000)).expect("add");
        store.add_node(0, &node_draft("T1")).expect("add node");
        store.select(0).expect("select");

        let removed = store.delete_device(0).expect("delete");
        assert_eq!(removed.nodes.len(), 1);
        assert_eq!(store.total_nodes(), 0);
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_delete_device_shifts_later_selection() {
        let mut store = DeviceStore::new();
        store.add_device(&device_draft("D1", 1, 1000)).expect("add");
        store.add_device(&device_draft("D2", 2, 1000)).expect("add");
        store.select(1).expect("select");

        store.delete_device(0).expect("delete");
        assert_eq!(store.selected(), Some(0));
        assert_eq!(store.selected_device().map(|d| d.name.as_str()), Some("D2"));
    }

    #[test]
    fn test_delete_frees_node_name() {
        let mut store = DeviceStore::new();
        store.add_device(&device_draft("A", 1, 1000)).expect("add");
        store.add_node(0, &node_draft("X")).expect("add node");
        store.delete_node(0, 0).expect("delete node");

        store.add_node(0, &node_draft("X")).expect("name reusable");
    }

    #[test]
    fn test_duplicate_node_name_same_device() {
        let mut store = DeviceStore::new();
        store.add_device(&device_draft("D1", 5, 1000)).expect("add");
        store.add_node(0, &node_draft("T1")).expect("add node");

        let mut dup = node_draft("T1");
        dup.address = 200;
        assert_eq!(
            store.add_node(0, &dup),
            Err(ValidationError::DuplicateNodeName)
        );
    }

    #[test]
    fn test_update_node_keeps_value() {
        let mut store = DeviceStore::new();
        store.add_device(&device_draft("A", 1, 1000)).expect("add");
        store.add_node(0, &node_draft("N1")).expect("add node");
        store.devices[0].nodes[0].value = Some(7.5);

        let mut draft = node_draft("N1");
        draft.timeout = 900;
        store.update_node(0, 0, &draft).expect("edit");
        assert_eq!(store.devices()[0].nodes[0].timeout, 900);
        assert_eq!(store.devices()[0].nodes[0].value, Some(7.5));
    }

    #[test]
    fn test_from_devices_selects_first() {
        let store = DeviceStore::from_devices(vec![Device {
            name: "D1".to_string(),
            address: 1,
            polling_interval: 1000,
            merge_collection: false,
            nodes: Vec::new(),
        }]);
        assert_eq!(store.selected(), Some(0));
        assert_eq!(DeviceStore::from_devices(Vec::new()).selected(), None);
    }
}
