//! Testbed file schema.
//!
//! ```yaml
//! testbed:
//!   name: lab
//!   credentials:
//!     default: { username: admin, password: secret }
//!     enable: { password: enablesecret }
//! devices:
//!   sw1:
//!     os: iosxe
//!     type: switch
//!     role: switch
//!     connections:
//!       ssh: { protocol: ssh, ip: 10.0.0.2, port: 22 }
//! ```

use std::path::Path;

use indexmap::IndexMap;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::error::{InventoryError, Result};
use crate::platform::Platform;

/// A testbed file as written.
#[derive(Debug, Default, Deserialize)]
pub struct Testbed {
    #[serde(default)]
    pub testbed: TestbedInfo,

    #[serde(default)]
    pub devices: IndexMap<String, DeviceEntry>,
}

/// The `testbed:` header.
#[derive(Debug, Default, Deserialize)]
pub struct TestbedInfo {
    #[serde(default)]
    pub name: Option<String>,

    /// Credentials shared by every device, keyed `default` and `enable`.
    #[serde(default)]
    pub credentials: IndexMap<String, CredentialEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CredentialEntry {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default, deserialize_with = "secret")]
    pub password: Option<SecretString>,
}

/// One device under `devices:`.
#[derive(Debug, Deserialize)]
pub struct DeviceEntry {
    pub os: String,

    #[serde(default, rename = "type")]
    pub device_type: Option<String>,

    #[serde(default)]
    pub role: Option<String>,

    /// Overrides for the testbed credentials.
    #[serde(default)]
    pub credentials: IndexMap<String, CredentialEntry>,

    #[serde(default)]
    pub connections: IndexMap<String, ConnectionEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConnectionEntry {
    #[serde(default)]
    pub protocol: Option<String>,

    #[serde(default)]
    pub ip: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,
}

fn secret<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

/// Everything needed to reach and log in to one device.
#[derive(Debug)]
pub struct DeviceSpec {
    pub name: String,

    /// Free-text classification, e.g. `router` or `switch`.
    pub role: String,

    pub device_type: Option<String>,
    pub platform: Platform,
    pub connection: ConnectionSpec,
    pub credentials: Credentials,
}

/// Management connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSpec {
    pub protocol: String,
    pub address: String,
    pub port: u16,
}

#[derive(Debug)]
pub struct Credentials {
    pub username: String,
    pub password: Option<SecretString>,

    /// Secret for `enable`. The login password is used when absent.
    pub enable: Option<SecretString>,
}

impl Testbed {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text).map_err(InventoryError::from)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| InventoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Resolve every device, in file order.
    ///
    /// Fails on the first device with no usable connection, no username,
    /// or an `os` this crate has no platform for.
    pub fn device_specs(&self) -> Result<Vec<DeviceSpec>> {
        self.devices
            .iter()
            .map(|(name, entry)| self.resolve(name, entry))
            .collect()
    }

    fn resolve(&self, name: &str, entry: &DeviceEntry) -> Result<DeviceSpec> {
        let platform = entry
            .os
            .parse::<Platform>()
            .map_err(|_| InventoryError::UnsupportedPlatform {
                device: name.to_string(),
                os: entry.os.clone(),
            })?;

        let connection = management_connection(&entry.connections).ok_or_else(|| {
            InventoryError::NoConnection {
                device: name.to_string(),
            }
        })?;

        let shared = &self.testbed.credentials;
        let login = entry
            .credentials
            .get("default")
            .or_else(|| shared.get("default"));
        let username = login
            .and_then(|c| c.username.clone())
            .ok_or_else(|| InventoryError::NoCredentials {
                device: name.to_string(),
            })?;
        let password = login.and_then(|c| c.password.as_ref()).map(copy_secret);
        let enable = entry
            .credentials
            .get("enable")
            .or_else(|| shared.get("enable"))
            .and_then(|c| c.password.as_ref())
            .map(copy_secret);

        let role = entry
            .role
            .clone()
            .or_else(|| entry.device_type.clone())
            .unwrap_or_default();

        Ok(DeviceSpec {
            name: name.to_string(),
            role,
            device_type: entry.device_type.clone(),
            platform,
            connection,
            credentials: Credentials {
                username,
                password,
                enable,
            },
        })
    }
}

/// `connections.ssh`, or the first connection that has an address.
fn management_connection(connections: &IndexMap<String, ConnectionEntry>) -> Option<ConnectionSpec> {
    let (key, entry) = connections
        .get_key_value("ssh")
        .filter(|(_, c)| c.ip.is_some())
        .or_else(|| connections.iter().find(|(_, c)| c.ip.is_some()))?;
    Some(ConnectionSpec {
        protocol: entry.protocol.clone().unwrap_or_else(|| key.clone()),
        address: entry.ip.clone()?,
        port: entry.port.unwrap_or(22),
    })
}

fn copy_secret(secret: &SecretString) -> SecretString {
    use secrecy::ExposeSecret;
    SecretString::from(secret.expose_secret().to_owned())
}
