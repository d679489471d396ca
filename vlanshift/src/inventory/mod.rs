//! Device inventory.
//!
//! The inventory owns every device for the life of the process. Callers
//! look devices up by name, role, or management address and borrow them;
//! nothing hands out ownership.

mod testbed;

pub use testbed::{
    ConnectionEntry, ConnectionSpec, CredentialEntry, Credentials, DeviceEntry, DeviceSpec,
    Testbed, TestbedInfo,
};

use std::path::Path;

use indexmap::IndexMap;
use log::debug;

use crate::device::Device;
use crate::error::Result;
use crate::transport::ConnectOptions;

struct Entry<D> {
    role: String,
    address: String,
    device: D,
}

/// Devices keyed by name, in testbed order, with role and address indexes.
pub struct Inventory<D = Device> {
    entries: IndexMap<String, Entry<D>>,
    by_role: IndexMap<String, Vec<usize>>,
    by_address: IndexMap<String, usize>,
}

impl Inventory<Device> {
    /// Load a testbed file and create an SSH device for each entry.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(path, ConnectOptions::default())
    }

    /// Like [`Inventory::load`], with `options` for every device session.
    pub fn load_with(path: impl AsRef<Path>, options: ConnectOptions) -> Result<Self> {
        let path = path.as_ref();
        debug!("loading testbed {} (timeout {:?})", path.display(), options.timeout);
        Self::from_testbed_with(&Testbed::from_path(path)?, |spec| {
            Device::new(spec).with_options(options.clone())
        })
    }

    pub fn from_testbed(testbed: &Testbed) -> Result<Self> {
        Self::from_testbed_with(testbed, Device::new)
    }
}

impl<D> Inventory<D> {
    /// Build an inventory, creating each device with `make`.
    pub fn from_testbed_with(testbed: &Testbed, make: impl FnMut(DeviceSpec) -> D) -> Result<Self> {
        let specs = testbed.device_specs()?;
        Ok(Self::from_specs(specs, make))
    }

    pub fn from_specs(specs: Vec<DeviceSpec>, mut make: impl FnMut(DeviceSpec) -> D) -> Self {
        let mut inventory = Self {
            entries: IndexMap::with_capacity(specs.len()),
            by_role: IndexMap::new(),
            by_address: IndexMap::new(),
        };
        for spec in specs {
            let name = spec.name.clone();
            let entry = Entry {
                role: spec.role.clone(),
                address: spec.connection.address.clone(),
                device: make(spec),
            };
            inventory.insert(name, entry);
        }
        inventory
    }

    fn insert(&mut self, name: String, entry: Entry<D>) {
        let (index, _) = self.entries.insert_full(name, entry);
        let entry = &self.entries[index];
        self.by_role
            .entry(entry.role.clone())
            .or_default()
            .push(index);
        self.by_address
            .entry(entry.address.clone())
            .or_insert(index);
    }

    /// Devices whose role equals `role`, in inventory order.
    ///
    /// An unknown role yields an empty list.
    pub fn devices_with_role(&self, role: &str) -> Vec<&D> {
        self.role_indexes(role)
            .iter()
            .filter_map(|&i| self.entries.get_index(i))
            .map(|(_, entry)| &entry.device)
            .collect()
    }

    /// Mutable form of [`Inventory::devices_with_role`].
    pub fn devices_with_role_mut(&mut self, role: &str) -> Vec<&mut D> {
        let wanted = self.by_role.get(role).map(Vec::as_slice).unwrap_or_default();
        self.entries
            .values_mut()
            .enumerate()
            .filter(|(i, _)| wanted.contains(i))
            .map(|(_, entry)| &mut entry.device)
            .collect()
    }

    /// First device whose management address is `address`.
    pub fn device_by_management_address(&self, address: &str) -> Option<&D> {
        let index = *self.by_address.get(address)?;
        self.entries.get_index(index).map(|(_, entry)| &entry.device)
    }

    pub fn device_by_management_address_mut(&mut self, address: &str) -> Option<&mut D> {
        let index = *self.by_address.get(address)?;
        self.entries
            .get_index_mut(index)
            .map(|(_, entry)| &mut entry.device)
    }

    pub fn get(&self, name: &str) -> Option<&D> {
        self.entries.get(name).map(|entry| &entry.device)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut D> {
        self.entries.get_mut(name).map(|entry| &mut entry.device)
    }

    /// Device names in inventory order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Roles in order of first appearance.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.by_role.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn role_indexes(&self, role: &str) -> &[usize] {
        self.by_role.get(role).map(Vec::as_slice).unwrap_or_default()
    }
}
