//! An owned collection of known devices.

use std::net::IpAddr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::device::Device;
use crate::errors::Error;
use crate::matcher;

type Result<T> = std::result::Result<T, Error>;

/// The devices known to one client session, in discovery order.
///
/// Locations are unique: inserting a record whose location is already known
/// replaces the old record wholesale. The collection serializes as a plain
/// JSON array so it can be saved and reloaded by the caller.
///
/// # Example
///
/// ```
/// use yeelight_lan::{Device, Devices};
///
/// let mut devices = Devices::new();
/// let mut desk = Device::new("192.168.1.5:55443");
/// desk.set_name("Desk");
/// devices.upsert(desk);
///
/// assert_eq!(devices.resolve("desk").unwrap().location, "192.168.1.5:55443");
/// assert_eq!(devices.resolve("10.0.0.3").unwrap().location, "10.0.0.3:55443");
/// assert!(devices.resolve("kitchen").is_err());
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Devices {
    devices: Vec<Device>,
}

impl Devices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    /// Insert a record, replacing any record with the same location.
    ///
    /// Returns `true` if an existing record was replaced.
    pub fn upsert(&mut self, device: Device) -> bool {
        match self
            .devices
            .iter_mut()
            .find(|known| known.location == device.location)
        {
            Some(known) => {
                *known = device;
                true
            }
            None => {
                self.devices.push(device);
                false
            }
        }
    }

    /// Upsert every record from a discovery run.
    pub fn merge(&mut self, discovered: Vec<Device>) {
        for device in discovered {
            let location = device.location.clone();
            if self.upsert(device) {
                debug!("Refreshed known light at {}", location);
            } else {
                debug!("Added new light at {}", location);
            }
        }
    }

    /// First record matching the token by name or host.
    pub fn find(&self, token: &str) -> Option<&Device> {
        self.devices.iter().find(|d| matcher::matches(d, token))
    }

    pub fn find_mut(&mut self, token: &str) -> Option<&mut Device> {
        self.devices.iter_mut().find(|d| matcher::matches(d, token))
    }

    /// Resolve a user token to a device.
    ///
    /// Known devices are matched first. A token that is a literal IP address
    /// yields an ad-hoc record on the default port so undiscovered bulbs can
    /// still be controlled; anything else is [`Error::NotFound`].
    pub fn resolve(&self, token: &str) -> Result<Device> {
        if let Some(device) = self.find(token) {
            return Ok(device.clone());
        }

        token
            .parse::<IpAddr>()
            .map(Device::from_address)
            .map_err(|_| Error::NotFound(token.to_string()))
    }
}

impl From<Vec<Device>> for Devices {
    fn from(devices: Vec<Device>) -> Self {
        let mut collection = Devices::new();
        collection.merge(devices);
        collection
    }
}

impl IntoIterator for Devices {
    type Item = Device;
    type IntoIter = std::vec::IntoIter<Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.into_iter()
    }
}
